use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AdminAuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl AdminAuthState {
    pub fn new(jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        AdminAuthState { jwt_utils }
    }
}

/// Admits only requests carrying a valid access token with the `admin` role.
/// The decoded claims are attached to the request extensions.
pub async fn admin_auth(
    State(state): State<Arc<AdminAuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HandlerError::new(HandlerErrorKind::Unauthorized, "Missing authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(header)
        .map_err(|_| HandlerError::new(HandlerErrorKind::Unauthorized, "Invalid authorization header"))?;
    let claims = state.jwt_utils.validate_access_token(&token).map_err(|e| {
        debug!(error = %e, "Rejected access token");
        HandlerError::new(HandlerErrorKind::Unauthorized, "Invalid or expired token")
    })?;

    if !claims.is_admin() {
        warn!(user = %claims.sub, path = %req.uri().path(), "Non-admin request to admin route");
        return Err(HandlerError::new(HandlerErrorKind::Forbidden, "Admin access required"));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
