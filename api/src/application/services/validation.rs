use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::error::{ServiceError, ServiceResult};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone regex"));

pub const PASSWORD_MIN_LEN: usize = 8;

/// Returns the trimmed, lowercased address.
pub fn normalize_email(raw: &str) -> ServiceResult<String> {
    let email = raw.trim().to_lowercase();
    if email.len() > 254 || !EMAIL_RE.is_match(&email) {
        return Err(ServiceError::validation("invalid email address"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ServiceError::validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ServiceError::validation(
            "password must contain a letter and a digit",
        ));
    }
    Ok(())
}

/// Empty input means "no phone".
pub fn normalize_phone(raw: Option<&str>) -> ServiceResult<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if compact.is_empty() {
        return Ok(None);
    }
    if !PHONE_RE.is_match(&compact) {
        return Err(ServiceError::validation("invalid phone number"));
    }
    Ok(Some(compact))
}

pub fn required_text(field: &str, value: &str, max_len: usize) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(ServiceError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank strings collapse to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn optional_url(field: &str, value: Option<String>) -> ServiceResult<Option<String>> {
    match optional_text(value) {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(Some(url)),
        Some(_) => Err(ServiceError::validation(format!(
            "{field} must start with http:// or https://"
        ))),
        None => Ok(None),
    }
}
