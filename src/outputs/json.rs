//! JSON output for the presentation layer.
//!
//! The document is pretty-printed with two-space indentation and non-ASCII
//! characters (author names, Chinese company keywords in abstracts) are kept
//! literally rather than `\u`-escaped. Each write replaces the previous file
//! entirely; there is no merge with earlier runs.

use crate::error::Error;
use crate::models::ResultDocument;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `document` as indented JSON.
pub fn render_document(document: &ResultDocument) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write `document` to `path`, creating the parent directory and overwriting any prior file.
///
/// # Output Path
///
/// Defaults to `data/papers.json`, relative to the working directory.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_document(document: &ResultDocument, path: &Path) -> Result<(), Error> {
    let json = render_document(document)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    info!(bytes = json.len(), papers = document.papers.len(), "Writing JSON");
    fs::write(path, json).await?;
    info!("Wrote result document");

    Ok(())
}
