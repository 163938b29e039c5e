use anyhow::Result;
use csv::{ReaderBuilder, StringRecord};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

use super::{
    error::LoadError,
    utils::{clean_str, read_resource},
};

/// Yearly mean price per province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethRow {
    pub province: String,
    #[serde(rename = "Year")]
    pub year: i32,
    pub cents: f64,
}

/// Yearly mean price per city with its population and vehicle estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterRow {
    pub city: String,
    pub province: String,
    #[serde(rename = "Year")]
    pub year: i32,
    pub cents: f64,
    pub population: f64,
    pub vehicles: f64,
}

/// A line-chart city and the abbreviation its trace is labelled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityInfo {
    pub city: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethTable {
    rows: Vec<ChoroplethRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterTable {
    rows: Vec<ScatterRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitiesInfoTable {
    cities: Vec<CityInfo>,
}

impl ChoroplethTable {
    pub const COLUMNS: &'static [&'static str] = &["province", "Year", "cents"];

    #[instrument(level = "info", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_rows(path, Self::COLUMNS)?;
        debug!(rows = rows.len(), "loaded choropleth table");
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<ChoroplethRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ChoroplethRow] {
        &self.rows
    }

    pub fn cents(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.cents)
    }
}

impl ScatterTable {
    pub const COLUMNS: &'static [&'static str] =
        &["city", "province", "Year", "cents", "population", "vehicles"];

    #[instrument(level = "info", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_rows(path, Self::COLUMNS)?;
        debug!(rows = rows.len(), "loaded scatterplot table");
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<ScatterRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScatterRow] {
        &self.rows
    }

    pub fn cents(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.cents)
    }
}

impl CitiesInfoTable {
    pub const ABBREVIATION: &'static str = "Abbreviation";

    /// First column is the city identifier, `Abbreviation` the trace label.
    /// Row order is kept.
    #[instrument(level = "info", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_resource(path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers = read_headers(path, &mut rdr)?;

        let abbrev_idx = headers
            .iter()
            .position(|h| clean_str(h) == Self::ABBREVIATION)
            .filter(|&idx| idx > 0)
            .ok_or_else(|| LoadError::shape(path, "missing `Abbreviation` column"))?;

        let mut cities = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| LoadError::malformed(path, format!("record {idx}: {e}")))?;
            cities.push(CityInfo {
                city: clean_str(record.get(0).unwrap_or("")).to_string(),
                abbreviation: clean_str(record.get(abbrev_idx).unwrap_or("")).to_string(),
            });
        }

        debug!(cities = cities.len(), "loaded cities info table");
        Ok(Self { cities })
    }

    pub fn from_cities(cities: Vec<CityInfo>) -> Self {
        Self { cities }
    }

    pub fn cities(&self) -> &[CityInfo] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

fn read_headers(path: &Path, rdr: &mut csv::Reader<&[u8]>) -> Result<StringRecord, LoadError> {
    rdr.headers()
        .cloned()
        .map_err(|e| LoadError::malformed(path, format!("reading header: {e}")))
}

/// Deserialize a long-form CSV into `T` after checking `required` headers exist.
fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>, LoadError> {
    let text = read_resource(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = read_headers(path, &mut rdr)?;
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::shape(
            path,
            format!("missing column(s): {}", missing.join(", ")),
        ));
    }

    rdr.deserialize::<T>()
        .enumerate()
        .map(|(idx, row)| {
            row.map_err(|e| LoadError::malformed(path, format!("record {idx}: {e}")))
        })
        .collect()
}
