//! Uploaded image delivery

use super::types::ErrorResponse;
use crate::{AppState, WebResult};
use axum::{
    body::Body,
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
};
use recipebook_core::not_found_error;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Serve a stored upload by name
#[utoipa::path(
    get,
    path = "/api/assets/{filename}",
    tag = "Assets",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "No such file", body = ErrorResponse)
    )
)]
pub async fn get_asset(
    State(app_state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> WebResult<Response> {
    let path = app_state.uploads.resolve(&filename)?;
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(not_found_error!("File", "assets").into());
    }

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    };
    Ok(response)
}
