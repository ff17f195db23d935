use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOTPQuery {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateOTPResponse {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ResetSessionResponse {
    pub flag: bool,
}
