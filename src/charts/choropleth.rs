use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{instrument, warn};

use super::{
    animation::{group_by_year, year_controls},
    figure::{
        ChoroplethTrace, ColorAxis, ColorBar, Figure, Frame, Geo, Layout, Projection, Title, Trace,
    },
    range::padded_range,
};
use crate::data::{tables::ChoroplethRow, ChoroplethTable, MapGeometry};

pub const TITLE: &str = "Canadian Yearly Gas Prices (1990-Present)";
pub const SIZE: u32 = 1000;
pub const COLOR_SCALE: &str = "YlOrRd";
pub const FEATURE_ID_KEY: &str = "properties.name";
pub const HOVER_TEMPLATE: &str =
    "<b>%{hovertext}</b><br><br>Year=%{customdata[0]}<br>Cents per Litre=%{z:.1f}<extra></extra>";

/// How the price rows lined up with the province outlines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    /// Row provinces with no outline of the same name.
    pub unmatched_provinces: BTreeSet<String>,
    /// Outlines no row ever fills; drawn without data.
    pub unfilled_features: BTreeSet<String>,
}

impl JoinReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched_rows == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethFigure {
    pub figure: Figure,
    pub join: JoinReport,
}

fn frame_trace(year: i32, rows: &[&ChoroplethRow]) -> ChoroplethTrace {
    ChoroplethTrace {
        locations: rows.iter().map(|r| r.province.clone()).collect(),
        z: rows.iter().map(|r| r.cents).collect(),
        hovertext: Some(rows.iter().map(|r| r.province.clone()).collect()),
        customdata: Some(rows.iter().map(|_| vec![year]).collect()),
        hovertemplate: Some(HOVER_TEMPLATE.into()),
        coloraxis: Some("coloraxis".into()),
        name: Some(String::new()),
        ..Default::default()
    }
}

/// Animated province map, one frame per year in the table.
///
/// Rows are joined to outlines by exact name. Rows that miss the join are
/// left off the map and counted in the [`JoinReport`]; outlines without rows
/// stay unfilled rather than being drawn as zero.
#[instrument(level = "debug", skip_all)]
pub fn build_choropleth(table: &ChoroplethTable, geometry: &MapGeometry) -> ChoroplethFigure {
    let names = geometry.feature_names();

    let mut join = JoinReport::default();
    let mut filled: BTreeSet<&str> = BTreeSet::new();
    for row in table.rows() {
        if names.contains(row.province.as_str()) {
            join.matched_rows += 1;
            filled.insert(row.province.as_str());
        } else {
            join.unmatched_rows += 1;
            join.unmatched_provinces.insert(row.province.clone());
        }
    }
    join.unfilled_features = names
        .iter()
        .filter(|name| !filled.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if !join.is_clean() {
        warn!(
            unmatched_rows = join.unmatched_rows,
            provinces = ?join.unmatched_provinces,
            "choropleth rows without a matching province outline"
        );
    }

    // The color scale covers every row, as the table is loaded.
    let range = padded_range(table.cents());

    // Every year gets a frame, even one whose rows all miss the join.
    let frames: Vec<Frame> = group_by_year(table.rows(), |r| r.year)
        .into_iter()
        .map(|(year, rows)| {
            let rows: Vec<&ChoroplethRow> = rows
                .into_iter()
                .filter(|r| names.contains(r.province.as_str()))
                .collect();
            Frame {
                name: year.to_string(),
                data: vec![Trace::Choropleth(frame_trace(year, &rows))],
            }
        })
        .collect();

    let mut initial = match frames.first().and_then(|f| f.data.first()) {
        Some(Trace::Choropleth(trace)) => trace.clone(),
        _ => frame_trace(0, &[]),
    };
    initial.geojson = Some(geometry.collection().clone());
    initial.featureidkey = Some(FEATURE_ID_KEY.into());
    initial.locationmode = Some("geojson-id".into());

    let frame_names: Vec<String> = frames.iter().map(|f| f.name.clone()).collect();
    let (sliders, updatemenus) = year_controls(&frame_names, true);

    let layout = Layout {
        title: Some(Title::text(TITLE)),
        width: Some(SIZE),
        height: Some(SIZE),
        geo: Some(Geo {
            scope: "north america".into(),
            projection: Projection {
                kind: "mercator".into(),
            },
            bgcolor: "#FEFFFE".into(),
            showlakes: false,
            lakecolor: "#73BFDC".into(),
            showcountries: false,
            showcoastlines: false,
            showland: false,
            fitbounds: "geojson".into(),
            subunitcolor: "white".into(),
        }),
        coloraxis: Some(ColorAxis {
            colorscale: COLOR_SCALE.into(),
            cmin: range.map(|r| r.min as f64),
            cmax: range.map(|r| r.max as f64),
            colorbar: Some(ColorBar {
                title: Title::text("Cents per Litre"),
            }),
        }),
        sliders,
        updatemenus,
        ..Default::default()
    };

    ChoroplethFigure {
        figure: Figure {
            data: vec![Trace::Choropleth(initial)],
            layout,
            frames,
        },
        join,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::FeatureCollection;
    use crate::test_support::{province_geojson, PROVINCES};
    use anyhow::Result;
    use std::path::Path;

    fn geometry() -> Result<MapGeometry> {
        let collection: FeatureCollection = serde_json::from_value(province_geojson(&PROVINCES))?;
        Ok(MapGeometry::from_collection(Path::new("provinces.geojson"), collection)?)
    }

    fn row(province: &str, year: i32, cents: f64) -> ChoroplethRow {
        ChoroplethRow {
            province: province.into(),
            year,
            cents,
        }
    }

    fn frame_locations(frame: &Frame) -> Vec<String> {
        match &frame.data[0] {
            Trace::Choropleth(t) => t.locations.clone(),
            Trace::Scatter(_) => Vec::new(),
        }
    }

    #[test]
    fn one_frame_per_distinct_year() -> Result<()> {
        let table = ChoroplethTable::from_rows(vec![
            row("Ontario", 2001, 70.0),
            row("Yukon", 1999, 80.0),
            row("Ontario", 1999, 60.0),
            row("Yukon", 2001, 90.0),
            row("Alberta", 2000, 55.0),
        ]);
        let built = build_choropleth(&table, &geometry()?);

        let names: Vec<_> = built.figure.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["1999", "2000", "2001"]);
        assert_eq!(frame_locations(&built.figure.frames[0]), ["Yukon", "Ontario"]);
        assert_eq!(built.figure.layout.sliders[0].steps.len(), 3);
        Ok(())
    }

    #[test]
    fn quebec_joins_against_corrected_outline() -> Result<()> {
        let table = ChoroplethTable::from_rows(vec![row("Québec", 2020, 130.0)]);
        let built = build_choropleth(&table, &geometry()?);

        assert!(built.join.is_clean());
        assert_eq!(built.join.matched_rows, 1);
        assert_eq!(frame_locations(&built.figure.frames[0]), ["Québec"]);
        Ok(())
    }

    #[test]
    fn province_without_rows_is_unfilled_not_zero() -> Result<()> {
        let table = ChoroplethTable::from_rows(vec![row("Yukon", 2020, 140.0), row("Ontario", 2020, 120.0)]);
        let built = build_choropleth(&table, &geometry()?);

        assert!(built.join.unfilled_features.contains("Nunavut"));
        for frame in &built.figure.frames {
            match &frame.data[0] {
                Trace::Choropleth(t) => {
                    assert!(!t.locations.iter().any(|l| l == "Nunavut"));
                    assert!(!t.z.contains(&0.0));
                }
                Trace::Scatter(_) => panic!("unexpected scatter trace"),
            }
        }
        Ok(())
    }

    #[test]
    fn unmatched_rows_are_reported_and_dropped() -> Result<()> {
        let table = ChoroplethTable::from_rows(vec![
            row("Quebec", 2020, 131.0),
            row("Ontario", 2020, 120.0),
        ]);
        let built = build_choropleth(&table, &geometry()?);

        assert_eq!(built.join.unmatched_rows, 1);
        assert!(built.join.unmatched_provinces.contains("Quebec"));
        assert_eq!(frame_locations(&built.figure.frames[0]), ["Ontario"]);
        Ok(())
    }

    #[test]
    fn year_with_only_unmatched_rows_keeps_an_empty_frame() -> Result<()> {
        let table = ChoroplethTable::from_rows(vec![
            row("Ontario", 2019, 120.0),
            row("Atlantis", 2020, 101.0),
        ]);
        let built = build_choropleth(&table, &geometry()?);

        let names: Vec<_> = built.figure.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["2019", "2020"]);
        assert!(frame_locations(&built.figure.frames[1]).is_empty());
        assert_eq!(built.figure.layout.sliders[0].steps.len(), 2);
        assert_eq!(built.join.unmatched_rows, 1);
        Ok(())
    }

    #[test]
    fn color_range_and_geometry_on_initial_trace() -> Result<()> {
        let table = ChoroplethTable::from_rows(vec![row("Yukon", 2020, 150.0), row("Ontario", 2020, 100.0)]);
        let built = build_choropleth(&table, &geometry()?);
        let value = serde_json::to_value(&built.figure)?;

        assert_eq!(value["layout"]["coloraxis"]["cmin"], 90.0);
        assert_eq!(value["layout"]["coloraxis"]["cmax"], 160.0);
        assert_eq!(value["layout"]["coloraxis"]["colorscale"], COLOR_SCALE);
        assert_eq!(value["layout"]["geo"]["projection"]["type"], "mercator");
        assert_eq!(value["data"][0]["featureidkey"], FEATURE_ID_KEY);
        assert_eq!(value["data"][0]["geojson"]["features"][5]["properties"]["name"], "Québec");
        assert!(value["frames"][0]["data"][0].get("geojson").is_none());
        Ok(())
    }
}
