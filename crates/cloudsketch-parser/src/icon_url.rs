//! Validation of custom icon URLs.
//!
//! Custom icons must live on Google Drive. Users paste the "file view" link
//! Drive hands out, which is an HTML page; it is rewritten to the direct
//! download form so renderers can embed the image.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

const DRIVE_HOST: &str = "drive.google.com";

static DRIVE_FILE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/file/d/([^/]+)/view").expect("drive path regex must compile")
});

/// Why an icon URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconUrlError {
    #[error("invalid icon_url: {0}")]
    Invalid(String),

    #[error("icon_url must be for Google Drive: {0}")]
    NotDrive(String),
}

/// Validates a custom icon URL and returns its direct download form.
///
/// ```
/// # use cloudsketch_parser::normalize_icon_url;
/// assert_eq!(
///     normalize_icon_url("https://drive.google.com/file/d/abc123/view?usp=sharing").unwrap(),
///     "https://drive.google.com/a/google.com/uc?id=abc123",
/// );
/// ```
pub fn normalize_icon_url(icon_url: &str) -> Result<String, IconUrlError> {
    let url = match Url::parse(icon_url) {
        Ok(url) => url,
        // A bare path has no scheme or host at all.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Err(IconUrlError::NotDrive(icon_url.to_string()));
        }
        Err(_) => return Err(IconUrlError::Invalid(icon_url.to_string())),
    };

    let on_drive = url.scheme() == "https"
        && url
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(DRIVE_HOST));
    if !on_drive {
        return Err(IconUrlError::NotDrive(icon_url.to_string()));
    }

    if url.path().ends_with("/uc") && url.query_pairs().any(|(key, _)| key == "id") {
        return Ok(url.to_string());
    }

    let file_id = DRIVE_FILE_PATH
        .captures(url.path())
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| IconUrlError::Invalid(icon_url.to_string()))?;

    Ok(format!(
        "https://{DRIVE_HOST}/a/google.com/uc?id={}",
        file_id.as_str()
    ))
}
