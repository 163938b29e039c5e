use anyhow::{Context, Result};
use gasdash::{config::Config, dashboard::Dashboard, data::DataStore, logging, server};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config & logging ─────────────────────────────────────────
    let config = Config::from_env()?;
    logging::init(&config.log_level);
    config.log_notices();
    info!(data_root = %config.data_root.display(), "startup");

    // ─── 2) load every resource once ─────────────────────────────────
    let paths = config.resource_paths();
    let store = match DataStore::load(&paths) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("failed to load dashboard data: {e:#}");
            return Err(e);
        }
    };

    // ─── 3) build figures & serve ────────────────────────────────────
    let dash = Dashboard::build(store).context("building figures")?;
    if !dash.join_report().is_clean() {
        info!(
            unmatched = ?dash.join_report().unmatched_provinces,
            "choropleth drawn without some rows"
        );
    }

    server::serve(Arc::new(dash), config.socket_addr()).await
}
