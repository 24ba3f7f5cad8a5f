//! Small helpers shared by the scraper and cache layers.
//!
//! - URL resolution of relative links against the listing origin
//! - Character-safe truncation for snippets and log previews
//! - Normalizing empty extraction results to "not found"
//! - Cache directory validation

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Resolve a possibly-relative link against `base`.
///
/// Absent or blank input yields `None`. Input that already starts with
/// `http` is returned unchanged. Everything else goes through standard
/// relative resolution; anything that fails to resolve, or resolves to a
/// non-HTTP scheme (`javascript:`, `mailto:`), yields `None`.
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://www.bola.com").unwrap();
/// assert_eq!(
///     resolve_url(Some("/indonesia/read/123"), &base).as_deref(),
///     Some("https://www.bola.com/indonesia/read/123")
/// );
/// ```
pub fn resolve_url(maybe_relative: Option<&str>, base: &Url) -> Option<String> {
    let raw = maybe_relative?.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http") {
        return Some(raw.to_string());
    }
    let resolved = base.join(raw).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// Trim `s` and return it, or `None` when nothing is left.
pub fn non_empty(s: impl AsRef<str>) -> Option<String> {
    let trimmed = s.as_ref().trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Keep at most `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Cache directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
