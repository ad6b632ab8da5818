//! Serve command - Starts the HTTP server.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use axum::Router;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;

use crate::api::{create_router, AppState};
use crate::config::{
    Config, ConfigError, ConfigWatcher, CoreConfig, PING_INTERVAL, SHUTDOWN_GRACE_PERIOD,
};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command.
///
/// Returns once the server has stopped and the database pool is closed.
pub async fn execute(config: Config, config_path: Option<&Path>) -> AppResult<()> {
    if !config.core.enabled {
        tracing::info!("HTTP server is disabled");
        return Ok(());
    }

    reject_tls(&config.core)?;

    // Kept alive for the lifetime of the server
    let _watcher = config_path.and_then(|path| match ConfigWatcher::watch(path) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!("Config watcher not started: {}", e);
            None
        }
    });

    tracing::info!(name = %config.core.name, mode = %config.core.mode, "Starting server...");
    let db = Database::connect(&config.db).await?;

    let app = create_router(AppState::from_database(db.clone()), config.core.is_debug());

    let addr = config.core.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(source) => {
            db.close().await?;
            return Err(AppError::Listen { addr, source });
        }
    };
    let local_addr = listener
        .local_addr()
        .map_err(|source| AppError::Listen { addr: addr.clone(), source })?;
    tracing::info!("Start to listening the incoming requests on http address: {}", local_addr);

    let ping = tokio::spawn(ping_server(ping_target(local_addr), config.core.max_ping_count));

    let result = serve_until(listener, app, shutdown_signal(), SHUTDOWN_GRACE_PERIOD).await;

    ping.abort();
    db.close().await?;
    tracing::info!("Server exiting");

    result
}

/// Serve `app` until `shutdown` resolves, then drain for at most `grace`.
///
/// The listener stops accepting as soon as `shutdown` fires. Requests still
/// running when `grace` elapses are abandoned; their connections die with the
/// runtime.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        outcome = &mut server => server_outcome(outcome),
        _ = shutdown => {
            tracing::info!("Shutting down server...");
            let _ = shutdown_tx.send(());

            match tokio::time::timeout(grace, &mut server).await {
                Ok(outcome) => server_outcome(outcome),
                Err(_) => {
                    tracing::warn!(grace_ms = grace.as_millis() as u64, "Server forced to shutdown");
                    server.abort();
                    Ok(())
                }
            }
        }
    }
}

/// TLS is terminated in front of the server; refuse to start in plain HTTP
/// when the operator asked for certificates.
fn reject_tls(core: &CoreConfig) -> Result<(), ConfigError> {
    if core.tls.is_configured() {
        return Err(ConfigError::Unsupported(format!(
            "core.tls is set (port {}); terminate TLS in a reverse proxy and clear cert_path/key_path",
            core.tls.port
        )));
    }
    if core.auto_tls.enabled {
        return Err(ConfigError::Unsupported(
            "core.auto_tls.enabled; terminate TLS in a reverse proxy".to_string(),
        ));
    }
    Ok(())
}

fn server_outcome(outcome: Result<std::io::Result<()>, JoinError>) -> AppResult<()> {
    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {}", e))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {}", e))),
    }
}

/// Loopback address for a listener bound to all interfaces.
fn ping_target(local: SocketAddr) -> SocketAddr {
    match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), local.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), local.port())
        }
        _ => local,
    }
}

/// Poll `/sd/health` until it answers 200 or the attempts run out.
async fn ping_server(target: SocketAddr, max_ping_count: u32) {
    let client = reqwest::Client::new();
    let url = format!("http://{}/sd/health", target);

    for _ in 0..max_ping_count {
        match client.get(&url).send().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                tracing::info!("The router has been deployed successfully.");
                return;
            }
            _ => {
                tracing::info!("Waiting for the router, retry in 1 second.");
                tokio::time::sleep(PING_INTERVAL).await;
            }
        }
    }

    tracing::error!("The router has no response, or it might took too long to start up.");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        _ = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
