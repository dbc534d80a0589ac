//! `diric docs`

use anyhow::{Context, Result};
use diric_server::http::routes::docs::openapi;

pub fn run_docs() -> Result<()> {
    let json =
        serde_json::to_string_pretty(&openapi()).context("Failed to serialize OpenAPI document")?;
    println!("{}", json);
    Ok(())
}
