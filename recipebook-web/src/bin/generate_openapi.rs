//! Write the OpenAPI document to `recipebook-web/docs`

use recipebook_web::openapi::ApiDoc;
use std::fs;
use std::path::Path;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let docs_dir = Path::new("recipebook-web/docs");
    fs::create_dir_all(docs_dir)?;

    let openapi = ApiDoc::openapi();

    let json_path = docs_dir.join("openapi.json");
    fs::write(&json_path, openapi.to_pretty_json()?)?;
    println!("Generated: {}", json_path.display());

    let compact_path = docs_dir.join("openapi.compact.json");
    fs::write(&compact_path, serde_json::to_string(&openapi)?)?;
    println!("Generated: {}", compact_path.display());

    Ok(())
}
