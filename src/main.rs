use std::net::SocketAddr;
use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use login_gate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting login gate demo server");

    let addr = SocketAddr::new(config.host, config.port);
    let session_ttl = config.session_ttl;
    let (app, state) = login_gate::build_app(config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = tokio::spawn(login_gate::session::run_cleanup(
        state.sessions.clone(),
        session_ttl,
        Duration::from_secs(60),
        shutdown_rx,
    ));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = cleanup.await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
