//! Utility functions for text normalization, logging, and file system checks.
//!
//! - Whitespace collapsing for titles and abstracts
//! - String truncation for log output
//! - Title-casing for keywords without an explicit display name
//! - Output directory validation

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Collapse every run of whitespace (including line breaks) into one space and trim.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  Generative\n   Retrieval "), "Generative Retrieval");
/// ```
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Title-case a keyword: a letter is uppercased when the previous character
/// is not a cased letter, otherwise lowercased.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(title_case("sea group"), "Sea Group");
/// assert_eq!(title_case("x.com"), "X.Com");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

/// Ensure the directory that will hold `output` exists.
///
/// Runs before any network traffic so that a misconfigured path fails fast
/// instead of after a successful fetch.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or `output` has a
/// parent that exists but is not a directory.
#[instrument(level = "info", skip_all, fields(path = %output.display()))]
pub async fn ensure_output_dir(output: &Path) -> std::io::Result<()> {
    let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(dir).await?;
    info!(dir = %dir.display(), "Output directory is ready");
    Ok(())
}
