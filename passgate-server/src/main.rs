//! Passgate Server - WebAuthn Relying Party ceremony API
//!
//! Exposes passgate-core over HTTP:
//! - POST /webauthn/register/start|finish - credential enrollment
//! - POST /webauthn/authenticate/start|finish - login
//! - GET  /health, /ready - monitoring

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use passgate_server::{create_router_with_config, AppState, Config};

/// How often abandoned sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        rp_id = %config.rp_id,
        rp_origin = %config.rp_origin,
        session_ttl_secs = config.session_ttl_secs,
        "Starting passgate-server"
    );

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to assemble ceremony engine");
            std::process::exit(1);
        }
    };

    // Expired sessions are only dropped lazily on consumption; the sweep
    // keeps abandoned ones from accumulating.
    let sweeper_sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sweeper_sessions.sweep_expired();
            if removed > 0 {
                tracing::debug!(removed, "Swept expired ceremony sessions");
            }
        }
    });

    let app = create_router_with_config(&config, state);
    let addr = config.socket_addr();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
