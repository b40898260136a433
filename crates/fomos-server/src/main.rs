mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fomos_scraper::{build_extractors, ImageFingerprinter, PageClient};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = fomos_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let sources = match &config.sources_path {
        Some(path) => fomos_core::load_sources(path)?.sources,
        None => fomos_core::default_sources(),
    };

    let page_client = Arc::new(PageClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?);
    let extractors = build_extractors(&sources, &page_client);
    if extractors.is_empty() {
        tracing::warn!("no enabled sources configured; searches will return nothing");
    }

    let fingerprinter = ImageFingerprinter::new(
        config.image_timeout_secs,
        &config.scraper_user_agent,
        config.image_max_bytes,
    )?;

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        sources = extractors.len(),
        fingerprint_images = config.fingerprint_images,
        "starting fomos-server"
    );

    let app = build_app(AppState::new(&config, extractors, Arc::new(fingerprinter)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
