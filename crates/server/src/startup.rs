use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Router with all routes, docs, static assets and middleware.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}

/// Public entry: load configuration and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

/// Connect, migrate and serve until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.server.static_dir).await?;

    let db = models::db::connect_with_config(&(&cfg.database).into())
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None).await.map_err(|e| StartupError::Database(e.to_string()))?;
    info!("migrations applied");

    let addr = bind_addr(&cfg)?;
    let app = build_app(ServerState::new(db, cfg));

    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
