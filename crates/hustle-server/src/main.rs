mod config;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use hustle_api::routes;
use hustle_api::state::AppStateInner;
use hustle_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hustle_server=debug,hustle_api=debug,hustle_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::load()?;

    // Init database
    let db = Database::open(&config.db_path)?;
    let state = AppStateInner::new(db);

    let app = routes::router(state)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = bind(&config.host, config.port).await?;
    info!("Husky Hustle listening on {}", listener.local_addr()?);
    info!("Serving static files from {}", config.public_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Bind to a host name or IP literal (v4 or bare v6).
async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
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
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_accepts_host_names() {
        for host in ["localhost", "127.0.0.1"] {
            let listener = bind(host, 0).await.unwrap();
            assert!(listener.local_addr().unwrap().ip().is_loopback(), "{host}");
        }
    }

    #[tokio::test]
    async fn test_bind_accepts_bare_ipv6() {
        // hosts without IPv6 loopback cannot bind it at all
        if let Ok(listener) = bind("::1", 0).await {
            assert!(listener.local_addr().unwrap().is_ipv6());
        }
    }
}
