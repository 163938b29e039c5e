use std::path::{Path, PathBuf};

/// Locations of every resource the dashboard reads, resolved against one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub choropleth: PathBuf,
    pub scatterplot: PathBuf,
    pub linechart: PathBuf,
    pub cities: PathBuf,
    pub geometry: PathBuf,
    pub animation: PathBuf,
}

impl ResourcePaths {
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let processed = root.join("data").join("processed");
        let external = root.join("data").join("external");
        Self {
            choropleth: processed.join("streamlit_data_choroplethmap.csv"),
            scatterplot: processed.join("streamlit_data_scatterplot.csv"),
            linechart: processed.join("streamlit_data_linechart.csv"),
            cities: processed.join("Canadian_cities_info.csv"),
            geometry: external
                .join("Canada_Provinces_Geojson")
                .join("canada_provinces.geojson"),
            animation: external.join("fuel_pump.json"),
        }
    }
}
