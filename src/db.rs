use chrono::{Duration, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;

use crate::{
    auth::hash_password,
    error::Result,
    todo::{todo_models::TodoPriority, todo_repository::TodoRepository},
    user::user_repository::UserRepository,
};

pub type DbPool = Pool<Sqlite>;

pub async fn create_pool(database_url: &str) -> std::result::Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if is_in_memory(database_url) {
        // The in-memory database only lives while a connection to it is open.
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Inserts the demo accounts and a couple of starter todos when the user
/// table is empty. Returns whether anything was written.
pub async fn seed_demo_data(
    users: &UserRepository,
    todos: &TodoRepository,
    bcrypt_cost: u32,
) -> Result<bool> {
    if users.count().await? > 0 {
        return Ok(false);
    }

    let admin = users
        .create(
            "admin@todoapp.com",
            "Administrator",
            &hash_password("Admin123!", bcrypt_cost)?,
        )
        .await?;
    users
        .create(
            "user@todoapp.com",
            "Test User",
            &hash_password("User123!", bcrypt_cost)?,
        )
        .await?;

    todos
        .create(
            admin.id,
            "Finish the technical assessment",
            "Build the complete application, API and client",
            TodoPriority::High,
            Some(Utc::now() + Duration::days(3)),
        )
        .await?;
    todos
        .create(
            admin.id,
            "Review documentation",
            "Review the README and complete the setup instructions",
            TodoPriority::Medium,
            None,
        )
        .await?;

    tracing::info!("Seeded demo users and todos");
    Ok(true)
}
