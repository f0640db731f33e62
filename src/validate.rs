//! Field validation applied at the boundary, before any mutation is issued.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, ApiResult};

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn username(value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    let chars = value.chars().count();
    if chars < 3 {
        return Err(ApiError::Validation(
            "Username must be at least 3 characters".into(),
        ));
    }
    if chars > 20 {
        return Err(ApiError::Validation(
            "Username must be at most 20 characters".into(),
        ));
    }
    Ok(())
}

pub fn password(value: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }
    if value.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

pub fn email(value: &str) -> ApiResult<()> {
    if !is_valid_email(value) {
        return Err(ApiError::Validation("Invalid email address".into()));
    }
    Ok(())
}

/// Short codes (client, state, site) are 2-4 characters.
pub fn short_code(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    if !(2..=4).contains(&value.chars().count()) {
        return Err(ApiError::Validation(format!(
            "{field} must be 2-4 characters"
        )));
    }
    Ok(())
}

pub fn particulars(value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation("Particulars is required".into()));
    }
    if value.chars().count() > 10 {
        return Err(ApiError::Validation(
            "Particulars must be at most 10 characters".into(),
        ));
    }
    Ok(())
}

pub fn capacity_mw(value: f64) -> ApiResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ApiError::Validation(
            "Capacity must be greater than 0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("alice@x.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@x"));
        assert!(!is_valid_email("a lice@x.com"));
    }

    #[test]
    fn username_limits() {
        assert!(username("alice").is_ok());
        assert!(username("ab").is_err());
        assert!(username("  ").is_err());
        assert!(username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(password("secret1").is_ok());
        assert!(password("short").is_err());
        assert!(password("").is_err());
    }

    #[test]
    fn short_code_range() {
        assert!(short_code("KA", "State code").is_ok());
        assert!(short_code("SJPR", "Site code").is_ok());
        assert!(short_code("K", "State code").is_err());
        assert!(short_code("TOOLONG", "Site code").is_err());
    }

    #[test]
    fn lengths_are_counted_in_characters_not_bytes() {
        // Each of these is within the limit by characters but over it (or
        // under it) by bytes.
        assert!(username("áéí").is_ok());
        assert!(password("señora").is_ok());
        assert!(short_code("ÅB", "State code").is_ok());
        assert!(particulars("ÄÖÜÄÖÜÄÖÜÄ").is_ok());
        assert!(short_code("ÅBCDE", "Site code").is_err());
    }

    #[test]
    fn capacity_must_be_positive() {
        assert!(capacity_mw(5.0).is_ok());
        assert!(capacity_mw(0.0).is_err());
        assert!(capacity_mw(-1.0).is_err());
        assert!(capacity_mw(f64::NAN).is_err());
    }
}
