use axum::{
    routing::{get, put},
    Router,
};

use crate::{handlers::auth_otp, state::AppState};

pub fn auth_otp_routes() -> Router<AppState> {
    Router::new()
        .route("/generateOTP", get(auth_otp::generate_otp))
        .route("/verifyOTP", get(auth_otp::verify_otp))
        .route("/createResetSession", get(auth_otp::create_reset_session))
        .route("/resetPassword", put(auth_otp::reset_password))
}
