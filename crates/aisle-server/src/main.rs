mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use aisle_api::assistant::Assistant;
use aisle_api::auth::{AppState, AppStateInner};
use aisle_api::files::Storage;
use aisle_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aisle=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;
    let storage = Storage::new(config.storage_dir.clone()).await?;
    let assistant = Assistant::new(config.openai_api_key.clone(), config.llm_url.clone());

    let state: AppState = Arc::new(AppStateInner {
        db,
        storage,
        assistant,
        jwt_secret: config.jwt_secret.clone(),
        admin_password: config.admin_password.clone(),
        read_retry: config.read_retry,
    });

    let mut app = aisle_api::router(state);

    // Unknown paths fall through to the SPA so client-side routes work on reload.
    if let Some(dir) = &config.static_dir {
        info!("Serving site from {}", dir.display());
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).not_found_service(index));
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Aisle listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
