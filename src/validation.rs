//! Request field checks shared by the HTTP handlers.

use std::sync::LazyLock;

use regex::Regex;

use crate::api_error::ApiError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone pattern"));
static LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]*$").expect("valid name pattern"));

fn bad(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_string())
}

pub fn required(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(bad(message));
    }
    Ok(())
}

pub fn max_chars(value: &str, max: usize, message: &str) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(bad(message));
    }
    Ok(())
}

pub fn username(value: &str) -> Result<(), ApiError> {
    required(value, "Username is required")?;
    let len = value.chars().count();
    if !(4..=20).contains(&len) {
        return Err(bad("Username must be between 4 and 20 characters"));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ApiError> {
    required(value, "Email is required")?;
    if !EMAIL.is_match(value) {
        return Err(bad("Email should be valid"));
    }
    Ok(())
}

pub fn phone(value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(phone) if !PHONE.is_match(phone) => Err(bad("Phone number must be valid")),
        _ => Ok(()),
    }
}

pub fn letters(value: Option<&str>, message: &str) -> Result<(), ApiError> {
    match value {
        Some(name) if !LETTERS.is_match(name) => Err(bad(message)),
        _ => Ok(()),
    }
}
