//! Request and response payloads for the registration and login endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "First name is required"))]
    pub firstname: String,

    #[validate(length(min = 1, max = 255, message = "Last name is required"))]
    pub lastname: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl RegisterRequest {
    /// Strips surrounding whitespace so blank names fail validation.
    pub fn trimmed(self) -> Self {
        Self {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct AuthenticationRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned by both registration and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub token: String,
}
