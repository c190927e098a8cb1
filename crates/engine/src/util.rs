//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API (apart from
//! `normalize_farm`, which callers need to build filters). They centralize
//! validation so every record type enforces the same rules.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Canonical form of a farm identifier: trimmed, NFC.
pub fn normalize_farm(value: &str) -> String {
    value.trim().nfc().collect()
}

/// Farm identifier that must not be empty after normalization.
pub(crate) fn require_farm(value: &str) -> ResultEngine<String> {
    let farm = normalize_farm(value);
    if farm.is_empty() {
        return Err(EngineError::Validation(
            "farm must not be empty".to_string(),
        ));
    }
    Ok(farm)
}

pub(crate) fn require_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed: String = value.trim().nfc().collect();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed)
}

pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

pub(crate) fn require_positive(value: i64, label: &str) -> ResultEngine<i64> {
    if value <= 0 {
        return Err(EngineError::Validation(format!("{label} must be > 0")));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(value: i64, label: &str) -> ResultEngine<i64> {
    if value < 0 {
        return Err(EngineError::Validation(format!("{label} must be >= 0")));
    }
    Ok(value)
}

/// `left * right`, rejecting overflow as a validation error.
pub(crate) fn checked_total(left: i64, right: i64, label: &str) -> ResultEngine<i64> {
    left.checked_mul(right)
        .ok_or_else(|| EngineError::Validation(format!("{label} is too large")))
}

/// `left + right`, rejecting overflow as a validation error.
pub(crate) fn checked_sum(left: i64, right: i64, label: &str) -> ResultEngine<i64> {
    left.checked_add(right)
        .ok_or_else(|| EngineError::Validation(format!("{label} is too large")))
}

/// `left - right`, rejecting overflow as a validation error.
pub(crate) fn checked_difference(left: i64, right: i64, label: &str) -> ResultEngine<i64> {
    left.checked_sub(right)
        .ok_or_else(|| EngineError::Validation(format!("{label} is too large")))
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::KeyNotFound(format!("invalid {label} id")))
}
