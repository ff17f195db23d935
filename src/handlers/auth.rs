use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::dtos::auth_dtos::{AuthenticateRequest, MessageResponse};
use crate::errors::Result;
use crate::models::user::{AuthResponse, Claims, CreateUser, LoginUser, ProfileUpdate, UserResponse};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.accounts.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User Register Successfully")),
    ))
}

// Existence check used by clients before starting a password reset
pub async fn authenticate(
    State(state): State<AppState>,
    Json(payload): Json<AuthenticateRequest>,
) -> Result<StatusCode> {
    state.accounts.user_exists(&payload.username).await?;
    Ok(StatusCode::OK)
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginUser>,
) -> Result<Json<AuthResponse>> {
    let auth = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(auth))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.accounts.get_user(&username).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.accounts.update_user(&claims.user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Record Updated"))))
}
