//! Typed subset of the Plotly figure schema.
//!
//! Only the attributes the dashboard sets are modelled; everything optional
//! is skipped when unset so the serialised figure stays close to what the
//! plotting library itself would emit.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::data::geo::FeatureCollection;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
}

impl Figure {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Choropleth(ChoroplethTrace),
}

/// Numbers (with gaps) or text labels along one trace dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Numbers(Vec<Option<f64>>),
    Labels(Vec<String>),
}

impl Default for Series {
    fn default() -> Self {
        Series::Numbers(Vec::new())
    }
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Numbers(v) => v.len(),
            Series::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::Numbers(values.into_iter().map(Some).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub x: Series,
    pub y: Series,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizemode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizeref: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    /// Set on the initial trace only; frames inherit it when animated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<Arc<FeatureCollection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featureidkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locationmode: Option<String>,
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<Vec<Vec<i32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub data: Vec<Trace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<ColorAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sliders: Vec<Slider>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updatemenus: Vec<UpdateMenu>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standoff: Option<u32>,
}

impl Title {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn sized(text: impl Into<String>, size: u32) -> Self {
        Self {
            text: text.into(),
            font: Some(Font::size(size)),
            standoff: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Font {
    pub fn size(size: u32) -> Self {
        Self {
            size: Some(size),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeselector: Option<RangeSelector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeSelector {
    pub buttons: Vec<RangeButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttondefaults: Option<RangeButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub label: String,
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Geo {
    pub scope: String,
    pub projection: Projection,
    pub bgcolor: String,
    pub showlakes: bool,
    pub lakecolor: String,
    pub showcountries: bool,
    pub showcoastlines: bool,
    pub showland: bool,
    pub fitbounds: String,
    pub subunitcolor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorAxis {
    pub colorscale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracegroupgap: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slider {
    pub active: usize,
    pub currentvalue: CurrentValue,
    pub len: f64,
    pub x: f64,
    pub xanchor: String,
    pub y: f64,
    pub yanchor: String,
    pub pad: Pad,
    pub steps: Vec<SliderStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentValue {
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderStep {
    pub label: String,
    pub method: String,
    /// Plotly's heterogeneous `[frames, options]` argument list.
    pub args: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: String,
    pub direction: String,
    pub showactive: bool,
    pub x: f64,
    pub xanchor: String,
    pub y: f64,
    pub yanchor: String,
    pub pad: Pad,
    pub buttons: Vec<MenuButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuButton {
    pub label: String,
    pub method: String,
    pub args: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn traces_carry_their_type_tag() -> serde_json::Result<()> {
        let trace = Trace::Scatter(ScatterTrace {
            x: Series::Labels(vec!["2020-01-01".into()]),
            y: Series::Numbers(vec![None]),
            name: Some("ON".into()),
            ..Default::default()
        });
        let value = serde_json::to_value(&trace)?;
        assert_eq!(
            value,
            json!({ "type": "scatter", "x": ["2020-01-01"], "y": [null], "name": "ON" })
        );
        Ok(())
    }

    #[test]
    fn unset_layout_members_are_omitted() -> serde_json::Result<()> {
        let figure = Figure {
            layout: Layout {
                width: Some(1000),
                xaxis: Some(Axis {
                    kind: Some("log".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        let value = serde_json::to_value(&figure)?;
        assert_eq!(
            value,
            json!({ "data": [], "layout": { "width": 1000, "xaxis": { "type": "log" } } })
        );
        Ok(())
    }
}
