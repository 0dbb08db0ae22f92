use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handler::user_handler::{
    change_password_handler, forgot_password_handler, get_profile_handler, login_handler,
    refresh_token_handler, reset_password_handler, signup_handler, update_profile_handler,
    verify_otp_handler,
};
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>) -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/refresh-token", post(refresh_token_handler))
        .route("/forgot-password", post(forgot_password_handler))
        .route("/verify-otp", post(verify_otp_handler))
        .route("/reset-password", post(reset_password_handler))
        .route("/user/change-password", post(change_password_handler))
        .route("/user/update-profile", post(update_profile_handler))
        .route("/user/{id}", get(get_profile_handler))
        .with_state(service)
}
