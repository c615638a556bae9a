use anyhow::Result;
use dashboard_service::{
    config::AppConfig,
    fetch::{CachedStore, PgDemandStore},
    observability,
    web::{self, AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        observability::init_metrics(&metrics_cfg.bind_addr);
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let store = CachedStore::new(PgDemandStore::new(pool));
    let state = Arc::new(AppState::new(Arc::new(store), cfg.auth.password.clone()));
    let app = web::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.http.bind_addr).await?;
    tracing::info!(addr = %cfg.http.bind_addr, "demand dashboard listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
