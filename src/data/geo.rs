use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeSet, path::Path, sync::Arc};
use tracing::{debug, instrument};

use super::{error::LoadError, utils::read_resource};

/// Position of Québec in the provinces file; its name ships without the accent.
pub const QUEBEC_FEATURE_INDEX: usize = 5;
pub const QUEBEC_NAME: &str = "Québec";

/// Province outlines as a GeoJSON `FeatureCollection`.
///
/// Members this crate does not read are kept in `extra` so the collection
/// re-serialises into figures unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    /// `properties.name`, the key choropleth rows join on.
    pub fn name(&self) -> Option<&str> {
        self.properties.as_ref()?.get("name")?.as_str()
    }
}

/// Corrected province geometry, shared by reference with every choropleth figure.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGeometry {
    collection: Arc<FeatureCollection>,
}

impl MapGeometry {
    #[instrument(level = "info", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_resource(path)?;
        let collection: FeatureCollection = serde_json::from_str(&text)
            .map_err(|e| LoadError::malformed(path, e.to_string()))?;
        let geometry = Self::from_collection(path, collection)?;
        debug!(
            features = geometry.collection.features.len(),
            "loaded province geometry"
        );
        Ok(geometry)
    }

    /// Validate the collection and apply the Québec name correction.
    pub fn from_collection(path: &Path, mut collection: FeatureCollection) -> Result<Self, LoadError> {
        if collection.kind != "FeatureCollection" {
            return Err(LoadError::shape(
                path,
                format!("expected a FeatureCollection, found `{}`", collection.kind),
            ));
        }

        let feature_count = collection.features.len();
        let quebec = collection
            .features
            .get_mut(QUEBEC_FEATURE_INDEX)
            .ok_or_else(|| {
                LoadError::shape(
                    path,
                    format!("expected at least {} features, found {feature_count}", QUEBEC_FEATURE_INDEX + 1),
                )
            })?;
        let properties = quebec.properties.as_mut().ok_or_else(|| {
            LoadError::shape(path, format!("feature {QUEBEC_FEATURE_INDEX} has no properties"))
        })?;
        properties.insert("name".into(), Value::String(QUEBEC_NAME.into()));

        Ok(Self {
            collection: Arc::new(collection),
        })
    }

    pub fn collection(&self) -> &Arc<FeatureCollection> {
        &self.collection
    }

    /// Every `properties.name` present in the collection.
    pub fn feature_names(&self) -> BTreeSet<&str> {
        self.collection.features.iter().filter_map(Feature::name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collection.features.iter().any(|f| f.name() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn provinces(names: &[&str]) -> Value {
        let features: Vec<Value> = names
            .iter()
            .map(|name| {
                json!({
                    "type": "Feature",
                    "properties": { "name": name, "cartodb_id": 1 },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] }
                })
            })
            .collect();
        json!({ "type": "FeatureCollection", "crs": { "type": "name" }, "features": features })
    }

    fn write_json(value: &Value) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(value.to_string().as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn sixth_feature_is_renamed() -> Result<()> {
        let tmp = write_json(&provinces(&[
            "British Columbia",
            "Alberta",
            "Saskatchewan",
            "Manitoba",
            "Ontario",
            "Quebec",
            "Nunavut",
        ]))?;
        let geometry = MapGeometry::load(tmp.path())?;

        assert!(geometry.contains("Québec"));
        assert!(!geometry.contains("Quebec"));
        assert_eq!(geometry.feature_names().len(), 7);
        Ok(())
    }

    #[test]
    fn unknown_members_survive_reserialisation() -> Result<()> {
        let tmp = write_json(&provinces(&["a", "b", "c", "d", "e", "f"]))?;
        let geometry = MapGeometry::load(tmp.path())?;
        let out = serde_json::to_value(geometry.collection().as_ref())?;

        assert_eq!(out["crs"]["type"], "name");
        assert_eq!(out["features"][0]["properties"]["cartodb_id"], 1);
        assert_eq!(out["features"][5]["properties"]["name"], "Québec");
        Ok(())
    }

    #[test]
    fn too_few_features_is_shape_mismatch() -> Result<()> {
        let tmp = write_json(&provinces(&["Alberta", "Ontario"]))?;
        let err = MapGeometry::load(tmp.path()).unwrap_err();
        assert_eq!(LoadError::classify(&err).map(LoadError::as_str), Some("shape_mismatch"));
        Ok(())
    }

    #[test]
    fn invalid_json_is_malformed() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"{ \"type\": \"FeatureCollection\", ")?;
        let err = MapGeometry::load(tmp.path()).unwrap_err();
        assert_eq!(LoadError::classify(&err).map(LoadError::as_str), Some("malformed"));
        Ok(())
    }
}
