use std::sync::Arc;

use food_assist::api::{AppState, chat_routes, cors_layer};
use food_assist::config::{ServerConfig, WebhookConfig};
use food_assist::flow::ConversationFlow;
use food_assist::store::{LibSqlBackend, SessionStore};
use food_assist::webhook::{NotificationSink, WebhookClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env();
    let webhook_config = WebhookConfig::from_env();

    eprintln!("🥫 Food Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Chat API: http://0.0.0.0:{}/chat", config.port);
    eprintln!("   Health:   http://0.0.0.0:{}/health", config.port);

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<LibSqlBackend> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .unwrap_or_else(|e| {
                eprintln!(
                    "Error: Failed to open database at {}: {}",
                    config.db_path.display(),
                    e
                );
                std::process::exit(1);
            }),
    );
    eprintln!("   Database: {}", config.db_path.display());

    // ── Webhook ──────────────────────────────────────────────────────────
    let webhook = WebhookClient::new(webhook_config);
    if webhook.is_enabled() {
        eprintln!("   Webhook: enabled");
    } else {
        eprintln!("   Webhook: disabled (WEBHOOK_URL not set)");
    }
    let notifier: Arc<dyn NotificationSink> = Arc::new(webhook);

    // ── Conversation flow + HTTP server ──────────────────────────────────
    let store: Arc<dyn SessionStore> = db;
    let flow = Arc::new(ConversationFlow::new(Arc::clone(&store), notifier));

    let app = chat_routes(
        AppState { flow, store },
        cors_layer(&config.allowed_origins),
    );

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Chat API server started");
    axum::serve(listener, app).await?;

    Ok(())
}
