//! Short code generation and alias validation.
//!
//! Generated codes are 8 characters of URL-safe base64 drawn from the system
//! CSPRNG. Custom aliases are validated against a small grammar and a list of
//! words that would shadow routes under `/links/`.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Random bytes per code. 6 bytes encode to exactly 8 base64 characters.
const CODE_LENGTH_BYTES: usize = 6;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 8;

pub const ALIAS_MIN_LENGTH: usize = 3;
pub const ALIAS_MAX_LENGTH: usize = 32;

/// Aliases that collide with fixed routes under `/links/`.
const RESERVED_ALIASES: &[&str] = &["shorten", "url", "health", "api"];

static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9_-]*[A-Za-z0-9_])?$").expect("alias regex is valid")
});

/// Generates a random 8-character short code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate short code",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < ALIAS_MIN_LENGTH || alias.len() > ALIAS_MAX_LENGTH {
        return Err(AppError::bad_request(
            format!("Alias must be {ALIAS_MIN_LENGTH}-{ALIAS_MAX_LENGTH} characters"),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Alias may only contain letters, digits, '_' and '-', and cannot start or end with '-'",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES.contains(&alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
