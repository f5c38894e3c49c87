use serde::{Deserialize, Serialize};

use super::ApiError;

/// Body of both `/sign-up` and `/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl TokenResponse {
    /// Parse the body of a successful sign-up or login.
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        serde_json::from_str(body).map_err(ApiError::MalformedToken)
    }
}
