//! Sales query server
//!
//! Usage: `sales-server [config.yaml]`
//!
//! The configuration path may also be given through `SALES_CONFIG`. `PORT`
//! overrides the bind port and `RUST_LOG` controls log filtering.

use anyhow::{Context, Result};
use sales_query::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SALES_CONFIG").ok())
    {
        Some(path) => {
            tracing::info!(path = %path, "loading configuration");
            ServiceConfig::from_yaml_file(&path)?
        }
        None => ServiceConfig::default(),
    };

    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port
            .parse()
            .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        config = config.with_port(port);
    }

    let store = SqliteSalesStore::connect(
        &config.database.path,
        &config.database.table,
        config.database.max_connections,
    )
    .await?;

    ServerBuilder::new()
        .with_config(&config)
        .with_store(store)
        .serve(&config.server.bind)
        .await
}
