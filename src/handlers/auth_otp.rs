use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dtos::auth_dtos::{
    GenerateOTPResponse, MessageResponse, ResetPasswordRequest, ResetSessionResponse,
    VerifyOTPQuery,
};
use crate::errors::Result;
use crate::state::AppState;

// 1. Generate OTP
pub async fn generate_otp(State(state): State<AppState>) -> (StatusCode, Json<GenerateOTPResponse>) {
    let code = state.otp.generate();
    (StatusCode::CREATED, Json(GenerateOTPResponse { code }))
}

// 2. Verify OTP
pub async fn verify_otp(
    State(state): State<AppState>,
    Query(query): Query<VerifyOTPQuery>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.otp.verify(query.code.as_deref().unwrap_or_default())?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Verify Successfully")),
    ))
}

// 3. Confirm the reset window is open
pub async fn create_reset_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ResetSessionResponse>)> {
    state.otp.require_reset_session()?;
    Ok((StatusCode::CREATED, Json(ResetSessionResponse { flag: true })))
}

// 4. Reset Password
pub async fn reset_password(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    // An expired window wins over malformed input.
    state.otp.require_reset_session()?;
    let Json(req) = payload?;
    req.validate()?;

    state
        .otp
        .consume_and_reset(&req.username, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Password Updated")),
    ))
}
