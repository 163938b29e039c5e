//! Small on-disk fixture tree shared by the crate's tests.

use anyhow::Result;
use serde_json::{json, Value};
use std::{fs, path::Path};

use crate::data::ResourcePaths;

pub const PROVINCES: [&str; 13] = [
    "British Columbia",
    "Alberta",
    "Saskatchewan",
    "Manitoba",
    "Ontario",
    "Quebec",
    "New Brunswick",
    "Nova Scotia",
    "Prince Edward Island",
    "Newfoundland and Labrador",
    "Yukon",
    "Northwest Territories",
    "Nunavut",
];

pub const LINECHART_CSV: &str = "\
,Whitehorse,Toronto,Québec City,Iqaluit
2019-01-01,121.5,108.2,115.0,
2019-02-01,122.0,109.9,116.4,
2020-01-01,119.8,,118.1,
";

pub const CITIES_CSV: &str = "\
,Abbreviation
Whitehorse,YT
Toronto,ON
Québec City,QC
";

pub const CHOROPLETH_CSV: &str = "\
province,Year,cents
Yukon,2019,120.4
Ontario,2019,112.6
Québec,2019,118.9
Yukon,2020,110.1
Ontario,2020,99.5
Québec,2020,130
Atlantis,2020,101
";

pub const SCATTER_CSV: &str = "\
city,province,Year,cents,population,vehicles
Whitehorse,Yukon,2019,121.2,25085,12542.5
Toronto,Ontario,2019,109.4,2731571,1365785.5
Québec City,Québec,2019,117.0,531902,265951
Whitehorse,Yukon,2020,110.7,25443,12721.5
Toronto,Ontario,2020,95.8,2794356,1397178
";

pub fn province_geojson(names: &[&str]) -> Value {
    let features: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let x = idx as f64;
            json!({
                "type": "Feature",
                "properties": { "name": name, "cartodb_id": idx + 1 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, 50.0], [x + 1.0, 50.0], [x + 1.0, 51.0], [x, 50.0]]]
                }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

pub fn animation_json() -> Value {
    json!({ "v": "5.7.4", "fr": 30, "ip": 0, "op": 60, "w": 200, "h": 200, "layers": [] })
}

/// Write every resource under `root` in the production layout.
pub fn write_fixture_tree(root: &Path) -> Result<ResourcePaths> {
    let paths = ResourcePaths::under(root);
    for path in [
        &paths.linechart,
        &paths.cities,
        &paths.choropleth,
        &paths.scatterplot,
        &paths.geometry,
        &paths.animation,
    ] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&paths.linechart, LINECHART_CSV)?;
    fs::write(&paths.cities, CITIES_CSV)?;
    fs::write(&paths.choropleth, CHOROPLETH_CSV)?;
    fs::write(&paths.scatterplot, SCATTER_CSV)?;
    fs::write(&paths.geometry, province_geojson(&PROVINCES).to_string())?;
    fs::write(&paths.animation, animation_json().to_string())?;
    Ok(paths)
}
