//! LunaFlow backend: accounts with a menstrual-cycle profile, a per-account
//! cycle log and a projected next cycle.
//!
//! `POST /api/auth` takes `register`, `login` and `update` requests tagged by
//! `action`; every success returns the account plus, when a start date is
//! known, the projected next period, ovulation day and fertile window.
//!
//! Storage is Postgres when `DATABASE_URL` is set and in-memory otherwise.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, EnvFilter};

pub mod accounts;
pub mod client;
pub mod config;
pub mod cycle;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod store;

use accounts::AccountService;
use config::Config;
use store::AccountStore;

pub fn build_router(store: Arc<dyn AccountStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .merge(routes::auth::routes(AccountService::new(store)))
        .route("/health", get(|| async { "✅ Backend up" }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn connect_store(config: &Config) -> Result<Arc<dyn AccountStore>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
        return Ok(store::memory());
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("connect to postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run migrations")?;

    Ok(store::postgres(pool))
}

pub async fn start_server() -> Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    let store = connect_store(&config).await?;
    let app = build_router(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🧠 Server running at {}", addr);

    axum::serve(TcpListener::bind(addr).await?, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("❌ Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
