use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todo_server::{app, Config, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env()?;
    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %config.addr(), "listening");

    let router = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.db_pool_max).await?;
            store.migrate().await?;
            app(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, rows are kept in memory");
            app(MemoryStore::new())
        }
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
