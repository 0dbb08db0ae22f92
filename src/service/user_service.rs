use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use tracing::{error, info, instrument, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::OtpConfig;
use crate::dto::user_dto::UserResponse;
use crate::model::user::{ProfileUpdate, Role, User};
use crate::repository::user_repo::UserRepository;
use crate::util::email::Mailer;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::otp::generate_numeric_otp;
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

/// Same text for unknown email and wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
/// Same text whether or not the email is registered.
pub const FORGOT_PASSWORD_MESSAGE: &str = "If that email is registered, an OTP has been sent";
const INVALID_OTP: &str = "Invalid or expired OTP";

#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn signup(&self, email: String, password: String, role: Role, username: Option<String>) -> Result<UserResponse, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<AuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
    async fn forgot_password(&self, email: String) -> Result<(), ServiceError>;
    async fn verify_otp(&self, email: String, otp: String) -> Result<(), ServiceError>;
    async fn reset_password(&self, email: String, otp: String, new_password: String) -> Result<(), ServiceError>;
    async fn change_password(&self, user_id: ObjectId, old_password: String, new_password: String) -> Result<(), ServiceError>;
    async fn update_profile(&self, user_id: ObjectId, update: ProfileUpdate) -> Result<UserResponse, ServiceError>;
    async fn get_profile(&self, user_id: ObjectId) -> Result<UserResponse, ServiceError>;
    /// Creates the configured admin account unless the email is already registered.
    async fn ensure_admin(&self, admin: &AdminUserConfig) -> Result<(), ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub mailer: Arc<dyn Mailer>,
    pub otp_config: OtpConfig,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        mailer: Arc<dyn Mailer>,
        otp_config: OtpConfig,
    ) -> Self {
        Self { user_repo, jwt_utils, mailer, otp_config }
    }

    fn hash(password: &str) -> Result<String, ServiceError> {
        PasswordUtilsImpl::validate_password_strength(password)
            .map_err(|errors| ServiceError::InvalidInput(errors.join("; ")))?;
        PasswordUtilsImpl::hash_password(password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))
    }

    /// Loads the user and checks the OTP; every failure reads the same to the caller.
    async fn user_with_valid_otp(&self, email: &str, otp: &str) -> Result<User, ServiceError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput(INVALID_OTP.to_string()))?;
        if !user.otp_matches(otp, bson::DateTime::now()) {
            warn!("OTP rejected");
            return Err(ServiceError::InvalidInput(INVALID_OTP.to_string()));
        }
        Ok(user)
    }

    fn require_id(user: &User) -> Result<ObjectId, ServiceError> {
        user.id
            .ok_or_else(|| ServiceError::InternalError("Stored user has no _id".to_string()))
    }
}

fn default_username(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, password), fields(email = %email, role = role.as_str()))]
    async fn signup(&self, email: String, password: String, role: Role, username: Option<String>) -> Result<UserResponse, ServiceError> {
        let email = email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Signup rejected, email already registered");
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        let hash = Self::hash(&password)?;
        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| default_username(&email));

        let inserted = self.user_repo.insert(User::new(email, hash, username, role)).await;
        match &inserted {
            Ok(_) => info!("User registered"),
            Err(e) => error!("Failed to insert user: {e}"),
        }
        Ok(UserResponse::from(inserted?))
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String) -> Result<AuthResponse, ServiceError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let valid = match PasswordUtilsImpl::verify_password(&password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                error!("Stored password hash unusable: {}", e);
                false
            }
        };
        if !valid {
            warn!("Login failed: wrong password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let id = Self::require_id(&user)?;
        let tokens = self
            .jwt_utils
            .generate_token_pair(&id.to_hex(), &user.email, user.role.as_str())
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        info!("User logged in");
        Ok(AuthResponse { user: UserResponse::from(user), tokens })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        let claims = self.jwt_utils.validate_refresh_token(&refresh_token).map_err(|e| {
            warn!("Refresh token rejected: {}", e);
            ServiceError::Unauthorized("Invalid refresh token".to_string())
        })?;
        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

        // Role and email come from the stored user, not the old token.
        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;
        self.jwt_utils
            .generate_token_pair(&id.to_hex(), &user.email, user.role.as_str())
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn forgot_password(&self, email: String) -> Result<(), ServiceError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };
        let id = Self::require_id(&user)?;

        let otp = generate_numeric_otp(self.otp_config.otp_length);
        let expires = Utc::now() + Duration::seconds(self.otp_config.otp_expiration_secs as i64);
        self.user_repo
            .set_otp(&id, &otp, bson::DateTime::from_chrono(expires))
            .await?;

        if let Err(e) = self
            .mailer
            .send_otp_email(&user.email, &user.username, &otp, self.otp_config.expiration_minutes())
            .await
        {
            error!("Failed to deliver OTP email: {}", e);
        } else {
            info!("OTP email sent");
        }
        Ok(())
    }

    #[instrument(skip(self, otp), fields(email = %email))]
    async fn verify_otp(&self, email: String, otp: String) -> Result<(), ServiceError> {
        self.user_with_valid_otp(&email.trim().to_lowercase(), otp.trim()).await?;
        Ok(())
    }

    #[instrument(skip(self, otp, new_password), fields(email = %email))]
    async fn reset_password(&self, email: String, otp: String, new_password: String) -> Result<(), ServiceError> {
        let user = self.user_with_valid_otp(&email.trim().to_lowercase(), otp.trim()).await?;
        let hash = Self::hash(&new_password)?;
        self.user_repo.reset_password(&Self::require_id(&user)?, &hash).await?;
        info!("Password reset");
        Ok(())
    }

    #[instrument(skip(self, old_password, new_password))]
    async fn change_password(&self, user_id: ObjectId, old_password: String, new_password: String) -> Result<(), ServiceError> {
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let matches = PasswordUtilsImpl::verify_password(&old_password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !matches {
            warn!("Change password rejected: old password mismatch");
            return Err(ServiceError::Unauthorized("Old password is incorrect".to_string()));
        }

        let hash = Self::hash(&new_password)?;
        self.user_repo.update_password(&user_id, &hash).await?;
        info!("Password changed");
        Ok(())
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, user_id: ObjectId, update: ProfileUpdate) -> Result<UserResponse, ServiceError> {
        if update.is_empty() {
            return self.get_profile(user_id).await;
        }
        let updated = self
            .user_repo
            .update_profile(&user_id, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        info!("Profile updated");
        Ok(UserResponse::from(updated))
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: ObjectId) -> Result<UserResponse, ServiceError> {
        self.user_repo
            .find_by_id(&user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self, admin), fields(email = %admin.email))]
    async fn ensure_admin(&self, admin: &AdminUserConfig) -> Result<(), ServiceError> {
        match self.signup(admin.email.clone(), admin.password.clone(), Role::Admin, Some(admin.username.clone())).await {
            Ok(_) => {
                info!("Admin account created");
                Ok(())
            }
            Err(ServiceError::Conflict(_)) => {
                info!("Admin account already exists, skipping creation");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
