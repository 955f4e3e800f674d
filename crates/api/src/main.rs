use anyhow::Result;
use agrolink_api::{build_app, ApiConfig};
use agrolink_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("agrolink_api");

    let config = ApiConfig::from_env();
    let bind = config.bind.clone();
    let app = build_app(config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "agrolink voice api started");

    axum::serve(listener, app).await?;
    Ok(())
}
