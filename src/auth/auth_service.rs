use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    auth::{
        auth_dto::{ChangePasswordRequest, LoginResponse, UpdateProfileRequest},
        create_access_token, hash_password, verify_password,
    },
    error::{AppError, Result},
    state::JwtSettings,
    user::{UserDto, UserRepository},
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt: JwtSettings,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt: JwtSettings, bcrypt_cost: u32) -> Self {
        Self {
            user_repo,
            jwt,
            bcrypt_cost,
        }
    }

    /// `None` covers both an unknown email and a wrong password so callers
    /// cannot tell which one failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<LoginResponse>> {
        let email = normalize_email(email);

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                tracing::warn!("Failed login attempt for email: {}", email);
                return Ok(None);
            }
        };

        let (token, expires_at) =
            create_access_token(user.id, &user.email, &user.name, &self.jwt)?;

        tracing::info!("Successful login for user: {}", user.id);

        Ok(Some(LoginResponse {
            token,
            expires_at,
            user: user.into(),
        }))
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<UserDto> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfileRequest,
    ) -> Result<UserDto> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let name = payload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let email = payload
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty());

        if let Some(ref email) = email {
            if !email.validate_email() {
                return Err(AppError::Validation(vec![
                    "email: A valid email is required".to_string(),
                ]));
            }
            if self.user_repo.email_in_use_by_other(email, user_id).await? {
                tracing::warn!("Email already in use: {}", email);
                return Err(email_in_use());
            }
        }

        let user = self
            .user_repo
            .update_profile(user_id, name, email.as_deref())
            .await
            .map_err(|e| match e {
                AppError::Database(sqlx::Error::Database(ref db_err))
                    if db_err.is_unique_violation() =>
                {
                    email_in_use()
                }
                other => other,
            })?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("Profile updated for user: {}", user_id);
        Ok(user.into())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        payload: ChangePasswordRequest,
    ) -> Result<()> {
        if payload.current_password.trim().is_empty() || payload.new_password.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Current and new passwords are required".to_string(),
            ));
        }

        if payload.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "New password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&payload.current_password, &user.password_hash) {
            tracing::warn!("Incorrect current password for user: {}", user_id);
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(&payload.new_password, self.bcrypt_cost)?;
        self.user_repo.update_password(user_id, &password_hash).await?;

        tracing::info!("Password changed for user: {}", user_id);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_in_use() -> AppError {
    AppError::BadRequest("Email is already in use".to_string())
}
