//! Input validation for the REST API
//!
//! Bounds every client-supplied field before it reaches storage.
//! Validators return `anyhow::Result`; the handler edge adapts failures
//! to `AppError::InvalidInput` via `ValidationErrorExt`.

use anyhow::{anyhow, Result};

use crate::constants::{
    MAX_BOOKMARK_NAME_LENGTH, MAX_CATEGORY_NAME_LENGTH, MAX_CHAT_CONTENT_LENGTH,
    MAX_CHAT_MESSAGES, MAX_CREDENTIAL_LENGTH, MAX_PASSWORD_LENGTH, MAX_URL_LENGTH,
    MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH,
};

/// Validate a username
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(anyhow!("username cannot be empty"));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(anyhow!(
            "username too long: {} chars (max: {})",
            username.len(),
            MAX_USERNAME_LENGTH
        ));
    }

    // Only allow alphanumeric, dash, underscore, @ and dot
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '@' || c == '.')
    {
        return Err(anyhow!(
            "username contains invalid characters (allowed: alphanumeric, -, _, @, .)"
        ));
    }

    Ok(())
}

/// Validate an account password (before hashing)
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(anyhow!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(anyhow!(
            "password too long: {} chars (max: {})",
            password.len(),
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate a bookmark display name
pub fn validate_bookmark_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("name cannot be empty"));
    }

    if name.len() > MAX_BOOKMARK_NAME_LENGTH {
        return Err(anyhow!(
            "name too long: {} chars (max: {})",
            name.len(),
            MAX_BOOKMARK_NAME_LENGTH
        ));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(anyhow!("name contains invalid control characters"));
    }

    Ok(())
}

/// Validate a bookmark URL
///
/// Deliberately lenient: any scheme is accepted, but the value must look
/// like an absolute URL and fit the storage bound.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(anyhow!("url cannot be empty"));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(anyhow!(
            "url too long: {} chars (max: {})",
            url.len(),
            MAX_URL_LENGTH
        ));
    }

    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(anyhow!("url contains whitespace or control characters"));
    }

    if !url.contains("://") {
        return Err(anyhow!("url must be absolute (e.g. https://example.com)"));
    }

    Ok(())
}

/// Validate an optional stored site credential (bookmark username/password)
pub fn validate_credential(value: &str) -> Result<()> {
    if value.len() > MAX_CREDENTIAL_LENGTH {
        return Err(anyhow!(
            "credential too long: {} chars (max: {})",
            value.len(),
            MAX_CREDENTIAL_LENGTH
        ));
    }

    if value.chars().any(|c| c.is_control()) {
        return Err(anyhow!("credential contains invalid control characters"));
    }

    Ok(())
}

/// Validate a category name
pub fn validate_category_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("name cannot be empty"));
    }

    if name.len() > MAX_CATEGORY_NAME_LENGTH {
        return Err(anyhow!(
            "name too long: {} chars (max: {})",
            name.len(),
            MAX_CATEGORY_NAME_LENGTH
        ));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(anyhow!("name contains invalid control characters"));
    }

    Ok(())
}

/// Validate a chat message batch: roles and content bounds
pub fn validate_chat_messages<'a, I>(messages: I) -> Result<()>
where
    I: ExactSizeIterator<Item = (&'a str, &'a str)>,
{
    if messages.len() == 0 {
        return Err(anyhow!("messages cannot be empty"));
    }

    if messages.len() > MAX_CHAT_MESSAGES {
        return Err(anyhow!(
            "too many messages: {} (max: {})",
            messages.len(),
            MAX_CHAT_MESSAGES
        ));
    }

    for (role, content) in messages {
        match role {
            "user" | "assistant" | "system" => {}
            other => {
                return Err(anyhow!(
                    "invalid role '{other}' (allowed: user, assistant, system)"
                ))
            }
        }

        if content.len() > MAX_CHAT_CONTENT_LENGTH {
            return Err(anyhow!(
                "message too long: {} chars (max: {})",
                content.len(),
                MAX_CHAT_CONTENT_LENGTH
            ));
        }
    }

    Ok(())
}
