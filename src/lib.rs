pub mod api;
pub mod config;
pub mod drugs;
pub mod pipeline;
pub mod stores;

use tracing_subscriber::EnvFilter;

use crate::api::{api_router, start_api_server, ApiContext, HttpSettings, ServerError};
use crate::config::{AppConfig, ConfigError};
use crate::drugs::RegistryError;
use crate::pipeline::extraction::{ExtractionError, OcrProvider};
use crate::pipeline::structuring::StructuringError;
use crate::stores::StoreDirectory;

/// Failures that stop the service before or while it starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Drug registry client: {0}")]
    Registry(#[from] RegistryError),

    #[error("Language model client: {0}")]
    Structuring(#[from] StructuringError),

    #[error("OCR client: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Run the gateway until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration resolved");
    if config.google_api_key.is_none() {
        tracing::warn!(
            "GOOGLE_API_KEY is not set: drug summaries and prescription analysis will fail \
             unless a request supplies its own OCR key"
        );
    }

    // A missing directory degrades store search to empty results.
    let stores = StoreDirectory::load(&config.stores_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Store directory unavailable, serving an empty directory");
        StoreDirectory::default()
    });

    let ctx = ApiContext::from_config(&config, stores)?;
    tracing::info!(
        stores = ctx.stores.len(),
        local_ocr = ctx.text.has_engine(OcrProvider::Tesseract),
        model = %config.gemini_model,
        "Services ready"
    );

    let app = api_router(ctx, &HttpSettings::from_config(&config));
    let mut server = start_api_server(app, config.bind_addr).await?;
    tracing::info!(
        addr = %server.session.server_addr,
        session = %server.session.session_id,
        "Listening"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C, shutting down: {e}");
    }

    server.shutdown();
    server.stopped().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
