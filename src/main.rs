use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod controllers;
mod db_ops;
mod docs;
mod errors;
mod models;
mod routes;
mod timestamp;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = config::Config::from_env().context("invalid configuration")?;
    tracing::info!(?config, "loaded config");

    let db =
        db_ops::create_pool(&config.database_url, config.max_connections)
            .await?;
    tracing::info!(
        max_connections = config.max_connections,
        "initialized database"
    );

    let state = models::AppState { db };
    let app = routes::get_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "listening; docs at /docs");
    axum::Server::try_bind(&addr)
        .with_context(|| format!("failed to bind to {addr}"))?
        .serve(app.into_make_service())
        .await
        .context("error running server")
}
