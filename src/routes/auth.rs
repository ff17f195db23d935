use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::auth;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/authenticate", post(auth::authenticate))
        .route("/login", post(auth::login))
        .route("/user/:username", get(auth::get_user))
        .route(
            "/updateuser",
            put(auth::update_user).layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}
