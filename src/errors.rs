// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Status returned when no password-reset window is open.
pub const SESSION_EXPIRED_STATUS: u16 = 440;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please use unique username")]
    DuplicateUsername,

    #[error("Please use unique email")]
    DuplicateEmail,

    #[error("Unable to hash password: {0}")]
    HashFailure(String),

    #[error("Username not found")]
    UserNotFound,

    #[error("Couldn't find the user")]
    ProfileNotFound,

    #[error("Password does not match")]
    InvalidPassword,

    #[error("Invalid OTP")]
    InvalidOTP,

    #[error("Session Expired")]
    SessionExpired,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername
            | AppError::DuplicateEmail
            | AppError::HashFailure(_)
            | AppError::Persistence(_)
            | AppError::Token(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::ProfileNotFound => StatusCode::NOT_IMPLEMENTED,
            AppError::InvalidPassword | AppError::InvalidOTP | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::SessionExpired => StatusCode::from_u16(SESSION_EXPIRED_STATUS)
                .unwrap_or(StatusCode::UNAUTHORIZED),
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AppError::DuplicateUsername => "Duplicate username",
            AppError::DuplicateEmail => "Duplicate email",
            AppError::HashFailure(_) => "Unable to hash password",
            AppError::UserNotFound | AppError::ProfileNotFound => "User not found",
            AppError::InvalidPassword => "Invalid password",
            AppError::InvalidOTP => "Invalid OTP",
            AppError::SessionExpired => "Session expired",
            AppError::Unauthorized => "Unauthorized",
            AppError::Persistence(_) => "Database error",
            AppError::Validation(_) => "Validation failed",
            AppError::Token(_) => "Token error",
            AppError::Configuration(_) => "Configuration error",
            AppError::Internal(_) => "Internal error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(json!({
            "error": self.label(),
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::HashFailure(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Token(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        AppError::Persistence(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
