//! Validation of redirect targets.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Checks that `raw` is an absolute `http` or `https` URL with a host.
///
/// The URL is stored exactly as given; search by original URL is an exact
/// string match, so no normalization happens here. For the same reason
/// control characters are rejected rather than stripped: the URL parser
/// drops tabs and newlines, but the stored string must still be a valid
/// `Location` header.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the first problem found.
pub fn validate_target_url(raw: &str) -> Result<(), AppError> {
    if let Some(position) = raw.find(|c: char| c.is_control()) {
        return Err(AppError::bad_request(
            "URL must not contain control characters",
            json!({ "url": raw, "position": position }),
        ));
    }

    let parsed = Url::parse(raw).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "url": raw, "reason": e.to_string() }),
        )
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::bad_request(
                "Only http and https URLs can be shortened",
                json!({ "url": raw, "scheme": other }),
            ));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(AppError::bad_request(
            "URL must include a host",
            json!({ "url": raw }),
        ));
    }

    Ok(())
}
