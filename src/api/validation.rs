//! Client-side input validation.
//!
//! These checks run before any network call; the server remains the
//! authority and may still reject what passes here.

use lazy_static::lazy_static;
use regex::Regex;

use super::models::TaskDraft;

/// Maximum task title length, matching the service's limit
pub const TITLE_MAX_LEN: usize = 500;
/// Maximum task description length
pub const DESCRIPTION_MAX_LEN: usize = 2000;
/// Minimum password length accepted at signup
pub const PASSWORD_MIN_LEN: usize = 8;

lazy_static! {
    /// Loose email shape check: something@something.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.len() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        ));
    }
    Ok(())
}

/// Validate a create/edit draft. An empty or whitespace-only title is
/// rejected here so no request is ever issued for it.
pub fn validate_draft(draft: &TaskDraft) -> Result<(), String> {
    if draft.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if draft.title.chars().count() > TITLE_MAX_LEN {
        return Err(format!("Title is too long (max {} characters)", TITLE_MAX_LEN));
    }
    if let Some(description) = &draft.description {
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(format!(
                "Description is too long (max {} characters)",
                DESCRIPTION_MAX_LEN
            ));
        }
    }
    Ok(())
}
