use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, error, warn};

use crate::dto::user_dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest,
    ResetPasswordRequest, SignupRequest, UserEnvelope, VerifyOtpRequest,
};
use crate::dto::MessageResponse;
use crate::handler::{parse_object_id, validate};
use crate::model::user::{ProfileUpdate, Role};
use crate::service::user_service::{UserService, UserServiceImpl, FORGOT_PASSWORD_MESSAGE};
use crate::util::error::{HandlerError, HandlerErrorKind};

pub async fn signup_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let role = match payload.role.as_deref() {
        None => Role::User,
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| HandlerError::bad_request(format!("Unknown role '{}'", raw)))?,
    };
    // Admin accounts come from the bootstrap config only.
    if role == Role::Admin {
        return Err(HandlerError::new(HandlerErrorKind::Forbidden, "Cannot self-register as admin"));
    }
    let user = service.signup(payload.email, payload.password, role, payload.username).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope { message: "User registered successfully".to_string(), user }),
    ))
}

pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let auth = service.login(payload.email, payload.password).await?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: auth.user,
        tokens: auth.tokens,
    }))
}

pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let tokens = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(tokens))
}

pub async fn forgot_password_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    service.forgot_password(payload.email).await?;
    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

pub async fn verify_otp_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    service.verify_otp(payload.email, payload.otp).await?;
    Ok(Json(MessageResponse::new("OTP verified")))
}

pub async fn reset_password_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    service.reset_password(payload.email, payload.otp, payload.new_password).await?;
    Ok(Json(MessageResponse::new("Password reset successful")))
}

pub async fn change_password_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate(&payload)?;
    let user_id = parse_object_id(&payload.user_id)?;
    service.change_password(user_id, payload.old_password, payload.new_password).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

pub async fn get_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.get_profile(parse_object_id(&id)?).await?;
    Ok(Json(user))
}

/// Multipart text fields; file parts are skipped since images are URLs here.
pub async fn update_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut user_id: Option<String> = None;
    let mut update = ProfileUpdate::default();

    while let Some(field) = match multipart.next_field().await {
        Ok(f) => f,
        Err(e) => {
            error!("Error reading multipart field: {}", e);
            return Err(HandlerError::bad_request(format!("Malformed multipart body: {}", e)));
        }
    } {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if field.file_name().is_some() {
            warn!(field = %name, "Ignoring uploaded file in profile update");
            continue;
        }
        let value = match field.text().await {
            Ok(v) => v.trim().to_string(),
            Err(e) => {
                error!("Failed to read field {}: {}", name, e);
                return Err(HandlerError::bad_request(format!("Failed to read field '{}'", name)));
            }
        };
        debug!(field = %name, "Profile field received");
        if value.is_empty() {
            continue;
        }
        match name.as_str() {
            "userId" => user_id = Some(value),
            "username" => update.username = Some(value),
            "nickname" => update.nickname = Some(value),
            "phone" => update.phone = Some(value),
            "address" => update.address = Some(value),
            "image" => update.image = Some(value),
            other => debug!(field = %other, "Unknown profile field ignored"),
        }
    }

    let user_id = user_id.ok_or_else(|| HandlerError::bad_request("userId is required"))?;
    let user = service.update_profile(parse_object_id(&user_id)?, update).await?;
    Ok(Json(UserEnvelope { message: "Profile updated successfully".to_string(), user }))
}
