//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: category, menu item, customization group/option
pub const MAX_NAME_LEN: usize = 200;

/// URL slugs
pub const MAX_SLUG_LEN: usize = 200;

/// Notes, descriptions, special instructions
pub const MAX_NOTE_LEN: usize = 500;

/// Descriptions shown on the menu
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Setting keys
pub const MAX_KEY_LEN: usize = 100;

/// Largest base price / modifier accepted
pub const MAX_PRICE: f64 = 100_000.0;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a price: finite, non-negative and below [`MAX_PRICE`].
pub fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!("{field} must be non-negative, got {value}")));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a price modifier (may be negative, e.g. "no cheese -$0.50").
pub fn validate_modifier(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value.abs() > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} must be a finite number within ±{MAX_PRICE}"
        )));
    }
    Ok(())
}

/// Validate a slug: lowercase ASCII letters, digits and single dashes.
pub fn validate_slug(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "slug", MAX_SLUG_LEN)?;
    let well_formed = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--");
    if !well_formed {
        return Err(AppError::validation(format!(
            "slug '{value}' must contain only lowercase letters, digits and single dashes"
        )));
    }
    Ok(())
}
