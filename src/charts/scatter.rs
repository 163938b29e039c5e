use std::collections::HashSet;
use tracing::{debug, instrument};

use super::{
    animation::{group_by_year, year_controls},
    figure::{Axis, Figure, Font, Frame, Layout, Legend, Marker, ScatterTrace, Title, Trace},
    range::padded_range,
};
use crate::data::{tables::ScatterRow, ScatterTable};

pub const TITLE: &str = "Canadian Yearly Gas Prices (1990-Present)";
pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 1200;
/// Largest rendered marker size, in pixels.
pub const SIZE_MAX: f64 = 150.0;
pub const HOVER_TEMPLATE: &str = "<b>%{hovertext}</b><br>Cents per Litre: %{x:.1f}<br>City Population: %{y}<br>Estimated Vehicles: %{marker.size}";

pub const PALETTE: [&str; 12] = [
    "darkslategray",
    "saddlebrown",
    "forestgreen",
    "navy",
    "red",
    "gold",
    "chartreuse",
    "aqua",
    "fuchsia",
    "dodgerblue",
    "rebeccapurple",
    "hotpink",
];

/// Provinces in order of first appearance, each with its palette color.
/// The palette repeats after twelve provinces.
pub fn province_colors(rows: &[ScatterRow]) -> Vec<(String, &'static str)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if seen.insert(row.province.as_str()) {
            let color = PALETTE[out.len() % PALETTE.len()];
            out.push((row.province.clone(), color));
        }
    }
    out
}

/// Area-mode scale factor mapping the largest value to `size_max`.
pub fn size_ref(max_value: f64, size_max: f64) -> f64 {
    if max_value.is_finite() && max_value > 0.0 {
        2.0 * max_value / (size_max * size_max)
    } else {
        1.0
    }
}

/// Marker size in pixels as the renderer draws it in area mode, clamped to `size_max`.
pub fn rendered_marker_size(value: f64, sizeref: f64, size_max: f64) -> f64 {
    if !(value.is_finite() && value > 0.0 && sizeref > 0.0) {
        return 0.0;
    }
    ((value / 2.0) / sizeref).sqrt().min(size_max)
}

fn province_trace(province: &str, color: &str, rows: &[&ScatterRow], sizeref: f64) -> ScatterTrace {
    ScatterTrace {
        x: rows.iter().map(|r| r.cents).collect::<Vec<_>>().into(),
        y: rows.iter().map(|r| r.population).collect::<Vec<_>>().into(),
        name: Some(province.into()),
        mode: Some("markers".into()),
        ids: Some(rows.iter().map(|r| r.city.clone()).collect()),
        hovertext: Some(rows.iter().map(|r| r.city.clone()).collect()),
        hovertemplate: Some(HOVER_TEMPLATE.into()),
        legendgroup: Some(province.into()),
        showlegend: Some(true),
        marker: Some(Marker {
            color: Some(color.into()),
            size: Some(rows.iter().map(|r| r.vehicles).collect()),
            sizemode: Some("area".into()),
            sizeref: Some(sizeref),
            symbol: Some("circle".into()),
        }),
    }
}

/// Animated bubble chart of price against population, one frame per year.
///
/// Every frame carries one trace per province (empty when a province has no
/// rows that year) so traces line up by index across frames.
#[instrument(level = "debug", skip_all)]
pub fn build_scatter(table: &ScatterTable) -> Figure {
    let colors = province_colors(table.rows());
    let max_vehicles = table
        .rows()
        .iter()
        .map(|r| r.vehicles)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let sizeref = size_ref(max_vehicles, SIZE_MAX);
    debug!(
        max_vehicles,
        largest_marker_px = rendered_marker_size(max_vehicles, sizeref, SIZE_MAX),
        "scatter marker scale"
    );

    let frames: Vec<Frame> = group_by_year(table.rows(), |r| r.year)
        .into_iter()
        .map(|(year, rows)| {
            let data = colors
                .iter()
                .map(|(province, color)| {
                    let in_province: Vec<&ScatterRow> = rows
                        .iter()
                        .copied()
                        .filter(|r| &r.province == province)
                        .collect();
                    Trace::Scatter(province_trace(province, color, &in_province, sizeref))
                })
                .collect();
            Frame {
                name: year.to_string(),
                data,
            }
        })
        .collect();

    let data = match frames.first() {
        Some(frame) => frame.data.clone(),
        None => Vec::new(),
    };

    let frame_names: Vec<String> = frames.iter().map(|f| f.name.clone()).collect();
    let (sliders, updatemenus) = year_controls(&frame_names, false);

    let layout = Layout {
        title: Some(Title::text(TITLE)),
        width: Some(WIDTH),
        height: Some(HEIGHT),
        xaxis: Some(Axis {
            title: Some(Title::sized("Cents per Litre", 22)),
            range: padded_range(table.cents()).map(|r| r.as_axis()),
            tickfont: Some(Font::size(15)),
            ..Default::default()
        }),
        yaxis: Some(Axis {
            title: Some(Title::sized("City Population", 22)),
            kind: Some("log".into()),
            tickfont: Some(Font::size(20)),
            ..Default::default()
        }),
        legend: Some(Legend {
            title: Some(Title::text("Province")),
            font: Some(Font {
                size: Some(15),
                color: Some("black".into()),
            }),
            tracegroupgap: Some(0),
        }),
        sliders,
        updatemenus,
        ..Default::default()
    };

    Figure {
        data,
        layout,
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn row(city: &str, province: &str, year: i32, cents: f64, population: f64) -> ScatterRow {
        ScatterRow {
            city: city.into(),
            province: province.into(),
            year,
            cents,
            population,
            vehicles: population / 2.0,
        }
    }

    #[test]
    fn marker_size_is_monotone_and_capped() {
        let sizeref = size_ref(1_000_000.0, SIZE_MAX);
        let mut last = 0.0;
        for v in [0.0, 1.0, 10.0, 1_000.0, 250_000.0, 1_000_000.0, 5_000_000.0, 1e12] {
            let size = rendered_marker_size(v, sizeref, SIZE_MAX);
            assert!(size >= last, "size shrank at {v}");
            assert!(size <= SIZE_MAX);
            last = size;
        }
        assert_eq!(rendered_marker_size(1e12, sizeref, SIZE_MAX), SIZE_MAX);
        assert_eq!(rendered_marker_size(-5.0, sizeref, SIZE_MAX), 0.0);
    }

    #[test]
    fn palette_cycles_past_twelve_provinces() {
        let rows: Vec<ScatterRow> = (0..14)
            .map(|i| row(&format!("city{i}"), &format!("province{i}"), 2020, 100.0, 1000.0))
            .collect();
        let colors = province_colors(&rows);

        assert_eq!(colors.len(), 14);
        assert_eq!(colors[0].1, "darkslategray");
        assert_eq!(colors[11].1, "hotpink");
        assert_eq!(colors[12].1, "darkslategray");
        assert_eq!(colors[13].1, "saddlebrown");
    }

    #[test]
    fn frames_per_year_with_stable_trace_slots() {
        let table = ScatterTable::from_rows(vec![
            row("Whitehorse", "Yukon", 2019, 121.0, 25_000.0),
            row("Toronto", "Ontario", 2019, 109.0, 2_700_000.0),
            row("Whitehorse", "Yukon", 2020, 110.0, 25_400.0),
        ]);
        let figure = build_scatter(&table);

        let names: Vec<_> = figure.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["2019", "2020"]);
        for frame in &figure.frames {
            assert_eq!(frame.data.len(), 2);
        }
        match &figure.frames[1].data[1] {
            Trace::Scatter(t) => {
                assert_eq!(t.name.as_deref(), Some("Ontario"));
                assert!(t.x.is_empty());
            }
            Trace::Choropleth(_) => panic!("unexpected choropleth trace"),
        }
        assert_eq!(figure.data.len(), 2);
    }

    #[test]
    fn layout_clips_x_and_logs_y() -> Result<()> {
        let table = ScatterTable::from_rows(vec![
            row("Whitehorse", "Yukon", 2019, 150.0, 25_000.0),
            row("Toronto", "Ontario", 2019, 100.0, 2_700_000.0),
        ]);
        let value = serde_json::to_value(build_scatter(&table))?;

        assert_eq!(value["layout"]["xaxis"]["range"], serde_json::json!([90.0, 160.0]));
        assert_eq!(value["layout"]["yaxis"]["type"], "log");
        assert_eq!(value["layout"]["legend"]["title"]["text"], "Province");
        let trace = &value["data"][0];
        assert_eq!(trace["marker"]["color"], "darkslategray");
        assert_eq!(trace["marker"]["sizemode"], "area");
        assert_eq!(trace["ids"], serde_json::json!(["Whitehorse"]));
        assert_eq!(trace["hovertemplate"], HOVER_TEMPLATE);
        Ok(())
    }
}
