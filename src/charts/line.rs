use tracing::{debug, instrument};

use super::figure::{
    Axis, Figure, Layout, RangeButton, RangeSelector, RangeSlider, ScatterTrace, Series, Title,
    Trace,
};
use crate::data::{CitiesInfoTable, LineChartTable};

pub const TITLE: &str = "Canadian Monthly Gas Prices (1990-Present)";
pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 600;
pub const HOVER_TEMPLATE: &str = "Month: %{x}<br>Cents per Litre: %{y:.1f}";

/// Index of the "5 Years" preset in [`date_buttons`].
pub const DEFAULT_BUTTON: usize = 3;

/// Zoom presets shown above the range slider.
pub fn date_buttons() -> Vec<RangeButton> {
    let backward = |count: u32, label: &str, step: &str| RangeButton {
        count: Some(count),
        label: label.into(),
        step: step.into(),
        stepmode: Some("backward".into()),
    };
    vec![
        backward(1, "1 Month", "month"),
        backward(6, "6 Months", "month"),
        backward(1, "1 Year", "year"),
        backward(5, "5 Years", "year"),
        backward(10, "10 Years", "year"),
        backward(20, "20 Years", "year"),
        RangeButton {
            count: None,
            label: "All Years".into(),
            step: "all".into(),
            stepmode: None,
        },
    ]
}

/// One line per city in `cities`, labelled with its abbreviation.
///
/// Price columns with no entry in `cities` are not plotted.
#[instrument(level = "debug", skip_all)]
pub fn build_line_chart(table: &LineChartTable, cities: &CitiesInfoTable) -> Figure {
    let x: Vec<String> = table
        .months()
        .iter()
        .map(|m| m.format("%Y-%m-%d").to_string())
        .collect();

    let data: Vec<Trace> = cities
        .cities()
        .iter()
        .filter_map(|info| {
            let Some(values) = table.values(&info.city) else {
                debug!(city = %info.city, "no price column for city");
                return None;
            };
            Some(Trace::Scatter(ScatterTrace {
                x: Series::Labels(x.clone()),
                y: Series::Numbers(values),
                name: Some(info.abbreviation.clone()),
                hovertemplate: Some(HOVER_TEMPLATE.into()),
                ..Default::default()
            }))
        })
        .collect();

    let buttons = date_buttons();
    let layout = Layout {
        title: Some(Title::text(TITLE)),
        width: Some(WIDTH),
        height: Some(HEIGHT),
        xaxis: Some(Axis {
            title: Some(Title {
                standoff: Some(25),
                ..Title::sized("Year", 20)
            }),
            kind: Some("date".into()),
            rangeslider: Some(RangeSlider { visible: true }),
            rangeselector: Some(RangeSelector {
                buttondefaults: buttons.get(DEFAULT_BUTTON).cloned(),
                buttons,
            }),
            ..Default::default()
        }),
        yaxis: Some(Axis {
            title: Some(Title {
                standoff: Some(5),
                ..Title::sized("Cents per Litre", 20)
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    Figure {
        data,
        layout,
        frames: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tables::CityInfo;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(csv: &str) -> Result<LineChartTable> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(csv.as_bytes())?;
        LineChartTable::load(tmp.path())
    }

    fn cities(pairs: &[(&str, &str)]) -> CitiesInfoTable {
        CitiesInfoTable::from_cities(
            pairs
                .iter()
                .map(|(city, abbreviation)| CityInfo {
                    city: city.to_string(),
                    abbreviation: abbreviation.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn one_trace_per_known_city() -> Result<()> {
        let table = table(",Halifax,Regina,Victoria\n2020-01-01,101.0,99.0,120.0\n")?;
        let figure = build_line_chart(&table, &cities(&[("Victoria", "BC"), ("Halifax", "NS")]));

        assert_eq!(figure.data.len(), 2);
        let names: Vec<_> = figure
            .data
            .iter()
            .map(|t| match t {
                Trace::Scatter(s) => s.name.clone().unwrap_or_default(),
                Trace::Choropleth(_) => String::new(),
            })
            .collect();
        assert_eq!(names, ["BC", "NS"]);
        Ok(())
    }

    #[test]
    fn traces_use_month_dates_and_keep_gaps() -> Result<()> {
        let table = table(",Iqaluit\n2020-01-01,\n2020-02-01,150.2\n")?;
        let figure = build_line_chart(&table, &cities(&[("Iqaluit", "NU")]));
        let value = serde_json::to_value(&figure)?;

        assert_eq!(value["data"][0]["x"], serde_json::json!(["2020-01-01", "2020-02-01"]));
        assert_eq!(value["data"][0]["y"], serde_json::json!([null, 150.2]));
        assert_eq!(value["data"][0]["hovertemplate"], HOVER_TEMPLATE);
        Ok(())
    }

    #[test]
    fn layout_has_slider_and_presets() -> Result<()> {
        let table = table(",Halifax\n2020-01-01,101.0\n")?;
        let figure = build_line_chart(&table, &cities(&[("Halifax", "NS")]));
        let value = serde_json::to_value(&figure)?;
        let xaxis = &value["layout"]["xaxis"];

        assert_eq!(xaxis["rangeslider"]["visible"], true);
        assert_eq!(xaxis["type"], "date");
        assert_eq!(xaxis["rangeselector"]["buttons"].as_array().map(Vec::len), Some(7));
        assert_eq!(xaxis["rangeselector"]["buttondefaults"]["label"], "5 Years");
        assert_eq!(xaxis["title"]["standoff"], 25);
        assert_eq!(value["layout"]["yaxis"]["title"]["text"], "Cents per Litre");
        assert_eq!(value["layout"]["width"], 1000);
        assert!(value.get("frames").is_none());
        Ok(())
    }
}
