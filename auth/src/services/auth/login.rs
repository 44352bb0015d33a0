/*
 * Stub authentication: any non-blank username, one shared demo password.
 * There is no user store.
 */
use crate::error::AppError;

pub struct Authenticator {
    password: String,
}

impl Authenticator {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Returns the trimmed username on success.
    pub fn authenticate<'a>(&self, username: &'a str, password: &str) -> Result<&'a str, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::InvalidRequest("username must not be empty".to_string()));
        }

        if !constant_time_eq(password.as_bytes(), self.password.as_bytes()) {
            tracing::info!(username, "login rejected");
            return Err(AppError::Unauthorized);
        }

        Ok(username)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
