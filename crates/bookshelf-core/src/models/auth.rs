//! Authentication payloads.
//!
//! Field names here are the server's contract and must not change:
//! the refresh endpoint takes `{"refresh": ...}` and answers `{"access": ...}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::InvalidInputError;
use crate::tokens::{AccessToken, RefreshToken, TokenPair};

/// Request body for `POST /login/`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response from `POST /login/`.
#[derive(Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

impl LoginResponse {
    pub fn into_tokens(self) -> TokenPair {
        TokenPair {
            access: AccessToken::new(self.access),
            refresh: RefreshToken::new(self.refresh),
        }
    }
}

/// Request body for `POST /token/refresh/`.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response from `POST /token/refresh/`.
#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Request body for `POST /register/`.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Checks what can be checked without the server.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(InvalidInputError::Other {
                message: "username must not be empty".to_string(),
            }
            .into());
        }
        if self.password != self.confirm_password {
            return Err(InvalidInputError::PasswordMismatch.into());
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
