use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use solace_api::{
    auth::JwtService,
    build_router,
    config::{Config, StorageBackend},
    state::AppState,
};
use solace_chat::ChatService;
use solace_llm::ClientFactory;
use solace_persist::{InMemoryPersistenceClient, MongoPersistenceClient, PersistenceClient};
use solace_safety::SafetyClassifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Solace API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let persist = connect_storage(&config).await?;

    tracing::info!(
        provider = config.llm.provider.as_str(),
        model = %config.llm.model,
        "Initializing LLM client"
    );
    let llm_client = ClientFactory::create_client(config.llm.provider_config(&config.llm_api_key))?;

    let chat = ChatService::builder()
        .llm_client(llm_client)
        .persistence(persist.clone())
        .classifier(Arc::new(SafetyClassifier::new(&config.safety)))
        .config(config.llm.chat_config())
        .build()?;

    let jwt = JwtService::new(&config.jwt_secret, config.auth.token_ttl_hours);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, persist, chat, jwt));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_storage(config: &Config) -> anyhow::Result<Arc<dyn PersistenceClient>> {
    match config.storage.backend {
        StorageBackend::Mongodb => {
            tracing::info!("Connecting to MongoDB");
            let client =
                MongoPersistenceClient::connect(&config.mongodb_uri, &config.mongodb.database)
                    .await?;
            tracing::info!("MongoDB connected");
            Ok(Arc::new(client))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Ok(Arc::new(InMemoryPersistenceClient::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
