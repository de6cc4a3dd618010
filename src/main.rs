use rollbook::{
    build_router,
    config::{Config, LoggingConfig},
    jobs::{HandlerRegistry, JobQueue, JobRuntime},
    notify::{HttpDelivery, Notifier},
    state::AppState,
    storage::FilesystemStorage,
};
use rollbook_layout::LayoutConfig;
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing(&config.logging);
    tracing::info!("Starting rollbook...");

    let storage = FilesystemStorage::new(
        config.storage.path.clone(),
        config.storage.public_base_url.clone(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;
    let storage: Arc<dyn rollbook::storage::Storage> = Arc::new(storage);
    tracing::info!("Storage initialized at {}", config.storage.path.display());

    let delivery = HttpDelivery::new(Duration::from_millis(config.webhook.timeout_ms))?;
    let notifier = Notifier::new(
        config.webhook.url().map(String::from),
        config.webhook.secret().map(String::from),
        Arc::new(delivery),
    );
    match config.webhook.url() {
        Some(url) => tracing::info!(
            "Callbacks go to {} ({})",
            url,
            if notifier.is_signing() { "signed" } else { "unsigned" }
        ),
        None => tracing::warn!("No webhook URL configured; job outcomes are only logged"),
    }

    let layout = LayoutConfig::new(config.layout.page_capacity)?;
    let registry = HandlerRegistry::with_defaults(layout, config.statistics.required_columns.clone());
    let job_queue = Arc::new(JobQueue::start(
        config.queue.concurrency,
        registry,
        JobRuntime {
            storage: storage.clone(),
            notifier: Arc::new(notifier),
        },
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(job_queue.clone(), storage, config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("rollbook listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /api/v1/jobs");
    tracing::info!("  - GET  /health");
    tracing::info!("  - GET  /files/*key");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    job_queue.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
