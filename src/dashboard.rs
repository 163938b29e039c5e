use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    charts::{build_choropleth, build_line_chart, build_scatter, Figure, JoinReport},
    data::DataStore,
    page::{table::TableView, ChartKind},
};

/// Figures built once from an immutable store, plus their serialised form.
///
/// Figures are pure functions of the store, so nothing here changes after
/// [`Dashboard::build`]; request handlers only read.
#[derive(Debug)]
pub struct Dashboard {
    store: Arc<DataStore>,
    linechart: Figure,
    choropleth: Figure,
    scatterplot: Figure,
    join: JoinReport,
    figure_json: [String; 3],
    animation_json: String,
}

impl Dashboard {
    #[instrument(level = "info", skip_all)]
    pub fn build(store: Arc<DataStore>) -> Result<Self> {
        let linechart = build_line_chart(&store.linechart, &store.cities);
        let built = build_choropleth(&store.choropleth, &store.geometry);
        let scatterplot = build_scatter(&store.scatterplot);

        let figure_json = [
            linechart.to_json().context("serialising linechart figure")?,
            built.figure.to_json().context("serialising choropleth figure")?,
            scatterplot.to_json().context("serialising scatterplot figure")?,
        ];
        let animation_json =
            serde_json::to_string(&store.animation).context("serialising header animation")?;

        let dash = Self {
            store,
            linechart,
            choropleth: built.figure,
            scatterplot,
            join: built.join,
            figure_json,
            animation_json,
        };
        for kind in ChartKind::ALL {
            let figure = dash.figure(kind);
            info!(
                chart = %kind,
                traces = figure.data.len(),
                frames = figure.frames.len(),
                json_bytes = dash.figure_json(kind).len(),
                "figure built"
            );
        }
        Ok(dash)
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn figure(&self, kind: ChartKind) -> &Figure {
        match kind {
            ChartKind::Linechart => &self.linechart,
            ChartKind::Choropleth => &self.choropleth,
            ChartKind::Scatterplot => &self.scatterplot,
        }
    }

    pub fn figure_json(&self, kind: ChartKind) -> &str {
        let idx = match kind {
            ChartKind::Linechart => 0,
            ChartKind::Choropleth => 1,
            ChartKind::Scatterplot => 2,
        };
        &self.figure_json[idx]
    }

    /// The table behind `kind`'s figure.
    pub fn table(&self, kind: ChartKind) -> &dyn TableView {
        match kind {
            ChartKind::Linechart => &self.store.linechart,
            ChartKind::Choropleth => &self.store.choropleth,
            ChartKind::Scatterplot => &self.store.scatterplot,
        }
    }

    pub fn join_report(&self) -> &JoinReport {
        &self.join
    }

    pub fn animation_json(&self) -> &str {
        &self.animation_json
    }
}
