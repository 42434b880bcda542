use anyhow::Context;
use todo_api::{
    db::{create_pool, run_migrations, seed_demo_data},
    notification::start_notification_scheduler,
    routes::create_router,
    state::{AppState, Config},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Running migrations...");
    run_migrations(&db)
        .await
        .context("failed to run migrations")?;

    let seed = config.seed_demo_data;
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db, config);

    if seed {
        seed_demo_data(
            &state.user_repository,
            &state.todo_repository,
            state.config.bcrypt_cost,
        )
        .await?;
    }

    // Kept alive for the lifetime of the server
    let _scheduler = start_notification_scheduler(state.clone()).await?;

    let app = create_router(state);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
