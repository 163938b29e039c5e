use anyhow::{Context, Result};
use gasdash::{
    config::Config,
    dashboard::Dashboard,
    data::DataStore,
    logging,
    page::{PageAssembler, PanelToggles},
};
use std::{env, fs, path::PathBuf, sync::Arc, time::Instant};
use tracing::info;

const DEFAULT_OUTPUT: &str = "gasdash.html";

/// Write the dashboard as one self-contained HTML file with every data
/// panel embedded.
fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_level);
    config.log_notices();

    let out = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let start = Instant::now();
    let store = DataStore::load(&config.resource_paths())?;
    let dash = Dashboard::build(Arc::new(store))?;
    let html = PageAssembler::standalone(&dash).render(PanelToggles::default());

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&out, &html).with_context(|| format!("writing {}", out.display()))?;

    info!(
        path = %out.display(),
        bytes = html.len(),
        elapsed = ?start.elapsed(),
        "wrote static page"
    );
    Ok(())
}
