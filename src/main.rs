use std::net::SocketAddr;

use todo_api::application::todo_service::TodoServiceImpl;
use todo_api::config::{AppConfig, StoreKind};
use todo_api::domain::repository::TodoRepository;
use todo_api::http::routing::{self, todos};
use todo_api::infrastructure::memory_repo::InMemoryTodoRepository;
use todo_api::infrastructure::sqlite_repo::{prepare_sqlite_file, SqliteTodoRepository};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let config = AppConfig::from_env()?;
    tracing::info!(store = ?config.store, "using todo store");
    match config.store {
        StoreKind::Sqlite => {
            prepare_sqlite_file(&config.database_url)?;
            serve(SqliteTodoRepository::connect(&config.database_url).await?, config.bind_addr).await
        }
        StoreKind::Memory => serve(InMemoryTodoRepository::new(), config.bind_addr).await,
    }
}

async fn serve<R: TodoRepository + Clone>(repo: R, addr: SocketAddr) -> anyhow::Result<()> {
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);
    let router = routing::app(todos::router(todos::AppState { service }));

    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// `RUST_LOG` controls verbosity; defaults to `info` for this crate and warnings elsewhere.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,todo_api=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn shutdown_signal() {
    let interrupted = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminated = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => { sigterm.recv().await; }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminated = std::future::pending::<()>();

    tokio::select! {
        _ = interrupted => tracing::info!("shutdown on interrupt"),
        _ = terminated => tracing::info!("shutdown on terminate"),
    }
}
