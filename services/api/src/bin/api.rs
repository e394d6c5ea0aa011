//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        DbAdapter, InMemoryLessonStore, MockCompletionAdapter, OpenAiCompletionAdapter,
        SvgCoverAdapter,
    },
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use teachwave_core::ports::{CompletionService, LessonStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn lesson_store(config: &Config) -> Result<Arc<dyn LessonStore>, ApiError> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL is not set; saved lessons will be kept in memory only.");
        return Ok(Arc::new(InMemoryLessonStore::new()));
    };

    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    let db_adapter = DbAdapter::new(db_pool);
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");
    Ok(Arc::new(db_adapter))
}

fn completion_service(config: &Config) -> Result<Arc<dyn CompletionService>, ApiError> {
    if config.use_mock_completion {
        warn!("USE_MOCK_COMPLETION is enabled; lessons will contain mock content.");
        return Ok(Arc::new(MockCompletionAdapter::new()));
    }

    let api_key = config
        .openai_api_key
        .as_ref()
        .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?;
    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base_url) = &config.completion_base_url {
        openai_config = openai_config.with_api_base(base_url);
    }

    info!("Using completion model {}", config.completion_model);
    Ok(Arc::new(OpenAiCompletionAdapter::new(
        Client::with_config(openai_config),
        config.completion_model.clone(),
        config.completion_max_tokens,
        config.completion_temperature,
    )))
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Adapters ---
    let lessons = lesson_store(&config).await?;
    let completion = completion_service(&config)?;
    let cover = Arc::new(SvgCoverAdapter::new());

    // --- 3. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(config.clone(), lessons, completion, cover));
    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
