use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use tasks_api::api::create_router;
use tasks_api::app::{AppConfig, AppState};
use tasks_api::infra::SqliteClient;
use tasks_api::infra::observability::{init_metrics_handle, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = AppConfig::load_dotenv() {
        eprintln!("❌ Invalid env file:");
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid env:");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Server terminated with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<()> {
    info!(
        environment = %config.environment,
        port = config.port,
        "Starting Tasks API"
    );

    let metrics = init_metrics_handle();
    if metrics.is_none() {
        warn!("Metrics recorder unavailable; /metrics will return 404");
    }

    if config.database_auth_token.is_some() {
        warn!("DATABASE_AUTH_TOKEN is set but local SQLite connections do not use it");
    }

    let db = SqliteClient::with_defaults(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    db.run_migrations()
        .await
        .context("failed to run database migrations")?;

    let app_state = Arc::new(AppState::new(Arc::new(db)).with_metrics(metrics));
    let router = create_router(app_state);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Server is running on port http://localhost:{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
