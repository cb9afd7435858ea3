//! Region boundaries for the state choropleth.
//!
//! Boundaries come from a GeoJSON `FeatureCollection`; each feature's `NAME`
//! property is the join key against a record's `state_name`. Geometry is kept
//! as raw JSON and handed back untouched to whatever draws the map.

use crate::{
    error::{DataLoadError, Result},
    schema::REGION_NAME_PROPERTY,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::HashMap, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub geometry: Value,
}

#[derive(Debug, Clone, Default)]
pub struct RegionBoundaries {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Value,
}

impl RegionBoundaries {
    /// Parse a GeoJSON FeatureCollection.
    ///
    /// Features without a string `NAME` property cannot be joined and are
    /// skipped. When two features share a name, the first one wins.
    pub fn from_geojson(text: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(text)?;
        if collection.kind != "FeatureCollection" {
            return Err(DataLoadError::InvalidFormat(format!(
                "expected a GeoJSON FeatureCollection, found {:?}",
                collection.kind
            )));
        }

        let mut boundaries = RegionBoundaries::default();
        let mut skipped = 0u32;
        for feature in collection.features {
            let name = feature
                .properties
                .as_ref()
                .and_then(|p| p.get(REGION_NAME_PROPERTY))
                .and_then(Value::as_str)
                .map(str::to_string);
            match name {
                Some(name) if !boundaries.index.contains_key(&name) => {
                    boundaries.index.insert(name.clone(), boundaries.regions.len());
                    boundaries.regions.push(Region {
                        name,
                        geometry: feature.geometry,
                    });
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!(
                "[ATD] regions: skipped {} features without a unique {} property",
                skipped,
                REGION_NAME_PROPERTY
            );
        }
        log::info!("[ATD] regions: Loaded {} region boundaries", boundaries.len());
        Ok(boundaries)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        RegionBoundaries::from_geojson(&text)
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&idx| &self.regions[idx])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
