// src/data/mod.rs
pub mod date_parser;
pub mod error;
pub mod geo;
pub mod linechart;
pub mod paths;
pub mod tables;
pub mod utils;

use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Instant;
use tracing::{info, instrument};

pub use error::LoadError;
pub use geo::MapGeometry;
pub use linechart::LineChartTable;
pub use paths::ResourcePaths;
pub use tables::{ChoroplethTable, CitiesInfoTable, ScatterTable};

/// Every resource the dashboard renders from, loaded once and never mutated.
///
/// Wrap it in an `Arc` and hand the same store to every figure builder and
/// request handler.
#[derive(Debug, Clone, PartialEq)]
pub struct DataStore {
    pub linechart: LineChartTable,
    pub cities: CitiesInfoTable,
    pub choropleth: ChoroplethTable,
    pub scatterplot: ScatterTable,
    pub geometry: MapGeometry,
    /// Lottie document for the page header.
    pub animation: Value,
}

impl DataStore {
    /// Load every resource, failing on the first error.
    #[instrument(level = "info", skip(paths))]
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let start = Instant::now();

        let geometry = MapGeometry::load(&paths.geometry).context("loading province geometry")?;
        let cities = CitiesInfoTable::load(&paths.cities).context("loading cities info")?;
        let choropleth =
            ChoroplethTable::load(&paths.choropleth).context("loading choropleth data")?;
        let scatterplot =
            ScatterTable::load(&paths.scatterplot).context("loading scatterplot data")?;
        let linechart = LineChartTable::load(&paths.linechart).context("loading linechart data")?;
        let animation = load_animation(paths).context("loading header animation")?;

        if let Some(missing) = cities.cities().iter().find(|c| !linechart.has_city(&c.city)) {
            return Err(LoadError::shape(
                &paths.linechart,
                format!("city `{}` from the cities info has no price column", missing.city),
            ))
            .context("validating linechart data");
        }

        info!(
            months = linechart.num_rows(),
            cities = cities.len(),
            choropleth_rows = choropleth.rows().len(),
            scatter_rows = scatterplot.rows().len(),
            elapsed = ?start.elapsed(),
            "data store loaded"
        );

        Ok(Self {
            linechart,
            cities,
            choropleth,
            scatterplot,
            geometry,
            animation,
        })
    }
}

fn load_animation(paths: &ResourcePaths) -> Result<Value> {
    let text = utils::read_resource(&paths.animation)?;
    let value = serde_json::from_str(&text)
        .map_err(|e| LoadError::malformed(&paths.animation, e.to_string()))?;
    Ok(value)
}
