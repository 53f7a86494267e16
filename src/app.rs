/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → DB 接続 + migration → AppState → Router 組み立て
 * - transport layer (request-id, trace, CORS) の適用
 * - axum::serve() で起動、Ctrl-C で graceful shutdown
 */
use std::{panic, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,appointment_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Handler panics are also turned into a 500 by the pipeline boundary;
        // this makes sure the location reaches the log either way.
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook();

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let pool = connect(&config).await?;
    let state = AppState::from_pool(pool, &config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;
    tracing::info!("database migrations applied");

    Ok(pool)
}

/// Routes plus transport layers. The outermost layer is applied last.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(&state, config).with_state(state);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
