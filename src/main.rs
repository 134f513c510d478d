use tokio::net::TcpListener;
use tourley::config::AppConfig;
use tourley::db::Database;
use tourley::error::AppError;
use tourley::routes::create_router;
use tourley::services::seed;
use tourley::state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = Database::connect(&config.database_url).await?;

    if config.seed_sample_data {
        seed::populate_sample_data(&db).await?;
    }

    let state = AppState::new(&config, db);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tourley=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
