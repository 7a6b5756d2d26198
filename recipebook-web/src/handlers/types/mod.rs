//! Request and response types for the HTTP handlers

pub mod accounts;
pub mod common;
pub mod recipes;

pub use accounts::*;
pub use common::*;
pub use recipes::*;
