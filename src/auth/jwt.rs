use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    state::JwtSettings,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub name: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Create a signed access token. Returns the token and its expiry instant.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    name: &str,
    settings: &JwtSettings,
) -> Result<(String, DateTime<Utc>)> {
    let issued_at = Utc::now();
    let expires_at = issued_at
        .checked_add_signed(Duration::hours(settings.expiration_hours))
        .ok_or(AppError::InternalError)?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        iss: settings.issuer.clone(),
        aud: settings.audience.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign access token: {:?}", e);
        AppError::InternalError
    })?;

    Ok((token, expires_at))
}

/// Verify signature, issuer, audience and expiry, then extract claims.
pub fn verify_jwt(token: &str, settings: &JwtSettings) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.set_audience(&[settings.audience.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}
