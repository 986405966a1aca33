//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen as reasonable UX limits for names, descriptions and
//! slugs; the datastore has no built-in length enforcement.

use crate::db::models::LocalizedText;
use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: dish and category names, per language
pub const MAX_NAME_LEN: usize = 200;

/// Dish descriptions, per language
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Category slugs
pub const MAX_SLUG_LEN: usize = 100;

/// Allergen tags, search tags
pub const MAX_TAG_LEN: usize = 50;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

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

/// Validate a bilingual field: both languages required and within limits.
pub fn validate_localized_text(
    value: &LocalizedText,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    validate_required_text(&value.pt, &format!("{field}.pt"), max_len)?;
    validate_required_text(&value.en, &format!("{field}.en"), max_len)?;
    Ok(())
}

/// Validate a category slug: lowercase alphanumerics and hyphens only.
pub fn validate_slug(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "slug", MAX_SLUG_LEN)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::validation(
            "slug may only contain lowercase letters, digits and hyphens".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("Samosas", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn slug_rules() {
        assert!(validate_slug("starters").is_ok());
        assert!(validate_slug("main-dishes-2").is_ok());
        assert!(validate_slug("Starters").is_err());
        assert!(validate_slug("star ters").is_err());
    }

    #[test]
    fn localized_text_requires_both_languages() {
        let full = LocalizedText {
            pt: "Entradas".to_string(),
            en: "Starters".to_string(),
        };
        let partial = LocalizedText {
            pt: "Entradas".to_string(),
            en: String::new(),
        };
        assert!(validate_localized_text(&full, "name", MAX_NAME_LEN).is_ok());
        assert!(validate_localized_text(&partial, "name", MAX_NAME_LEN).is_err());
    }
}
