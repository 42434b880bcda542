use anyhow::Context;
use std::{str::FromStr, sync::Arc};

use crate::{
    auth::auth_service::AuthService,
    db::DbPool,
    notification::{
        notification_repository::NotificationRepository,
        notification_service::NotificationService,
    },
    todo::{todo_repository::TodoRepository, todo_service::TodoService},
    user::user_repository::UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub user_repository: UserRepository,
    pub todo_repository: TodoRepository,
    pub notification_repository: NotificationRepository,
    pub auth_service: AuthService,
    pub todo_service: TodoService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let config = Arc::new(config);

        let user_repository = UserRepository::new(db.clone());
        let todo_repository = TodoRepository::new(db.clone());
        let notification_repository = NotificationRepository::new(db.clone());

        let auth_service = AuthService::new(
            user_repository.clone(),
            config.jwt.clone(),
            config.bcrypt_cost,
        );
        let todo_service = TodoService::new(todo_repository.clone());
        let notification_service =
            NotificationService::new(notification_repository.clone(), todo_repository.clone());

        Self {
            db,
            config,
            user_repository,
            todo_repository,
            notification_repository,
            auth_service,
            todo_service,
            notification_service,
        }
    }
}

/// Signing and validation parameters for access tokens.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiration_hours: i64,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
    pub seed_demo_data: bool,
    pub notification_sweep_cron: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite::memory:"),
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse("PORT", 5000)?,
            jwt: JwtSettings {
                secret,
                issuer: env_or("JWT_ISSUER", "TodoApp.API"),
                audience: env_or("JWT_AUDIENCE", "TodoApp.Client"),
                expiration_hours: env_parse("JWT_EXPIRATION_HOURS", 8)?,
            },
            bcrypt_cost: env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:4200"),
            seed_demo_data: env_parse("SEED_DEMO_DATA", true)?,
            notification_sweep_cron: env_or("NOTIFICATION_SWEEP_CRON", "0 */15 * * * *"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
