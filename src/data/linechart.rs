use anyhow::Result;
use arrow::{
    array::{Array, ArrayRef, Float64Array, Float64Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::{path::Path, sync::Arc};
use tracing::{debug, instrument, warn};

use super::{
    date_parser::parse_month,
    error::LoadError,
    utils::{clean_str, month_label, parse_price_cell, read_resource},
};

/// Header pandas gives an unnamed index column when it is read back.
const INDEX_HEADER: &str = "Unnamed: 0";

/// Monthly prices in wide form: one row per month, one `Float64` column per city.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartTable {
    labels: Vec<String>,
    months: Vec<NaiveDate>,
    batch: RecordBatch,
}

impl LineChartTable {
    /// Read the whole file as text, parse the index into months, then cast
    /// every city column to `f64`.
    #[instrument(level = "info", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_resource(path)?;
        let table = Self::parse(path, &text)?;
        debug!(
            rows = table.num_rows(),
            cities = table.batch.num_columns(),
            "loaded line chart table"
        );
        Ok(table)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| LoadError::malformed(path, format!("reading header: {e}")))?
            .clone();

        match headers.get(0).map(clean_str) {
            Some("") | Some(INDEX_HEADER) => {}
            Some(other) => {
                return Err(LoadError::shape(
                    path,
                    format!("expected an unnamed index column, found `{other}`"),
                ))
            }
            None => return Err(LoadError::shape(path, "empty header row")),
        }
        let cities: Vec<String> = headers.iter().skip(1).map(|h| clean_str(h).to_string()).collect();
        if cities.is_empty() || cities.iter().any(|c| c.is_empty()) {
            return Err(LoadError::shape(path, "missing or blank city column"));
        }

        let mut labels = Vec::new();
        let mut months = Vec::new();
        let mut builders: Vec<Float64Builder> = cities.iter().map(|_| Float64Builder::new()).collect();

        for (idx, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| LoadError::malformed(path, format!("record {idx}: {e}")))?;

            let raw_index = record.get(0).unwrap_or("");
            let month = parse_month(clean_str(raw_index)).ok_or_else(|| {
                LoadError::malformed(path, format!("record {idx}: `{raw_index}` is not a date"))
            })?;
            labels.push(month_label(month));
            months.push(month);

            for (col, builder) in builders.iter_mut().enumerate() {
                let cell = record.get(col + 1).unwrap_or("");
                let value = parse_price_cell(cell).map_err(|detail| {
                    LoadError::malformed(path, format!("record {idx}, `{}`: {detail}", cities[col]))
                })?;
                builder.append_option(value);
            }
        }

        if months.windows(2).any(|w| w[0] > w[1]) {
            warn!(path = %path.display(), "line chart index is not in chronological order");
        }

        let schema = Arc::new(Schema::new(
            cities
                .iter()
                .map(|city| Field::new(city.as_str(), DataType::Float64, true))
                .collect::<Vec<_>>(),
        ));
        let columns: Vec<ArrayRef> = builders
            .iter_mut()
            .map(|b| Arc::new(b.finish()) as ArrayRef)
            .collect();
        let batch = RecordBatch::try_new(schema, columns)
            .map_err(|e| LoadError::malformed(path, e.to_string()))?;

        Ok(Self {
            labels,
            months,
            batch,
        })
    }

    /// `"Mon-YYYY"` index labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// First day of each row's month, in row order.
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn num_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> + '_ {
        self.batch.schema_ref().fields().iter().map(|f| f.name().as_str())
    }

    pub fn has_city(&self, city: &str) -> bool {
        self.batch.column_by_name(city).is_some()
    }

    pub fn column(&self, city: &str) -> Option<&Float64Array> {
        self.batch
            .column_by_name(city)
            .and_then(|arr| arr.as_any().downcast_ref::<Float64Array>())
    }

    /// Prices for `city` with nulls preserved.
    pub fn values(&self, city: &str) -> Option<Vec<Option<f64>>> {
        self.column(city).map(|arr| arr.iter().collect())
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }
}
