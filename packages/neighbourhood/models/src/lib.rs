#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighbourhood boundary source definition types.
//!
//! Defines the configuration schema for the boundary source and the
//! normalized boundary set the choropleth joins tree counts onto.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where the neighbourhood polygons come from and how to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundarySource {
    /// Fetcher configuration.
    pub fetcher: BoundaryFetcherConfig,
    /// Field mapping for extracting the neighbourhood name.
    #[serde(default)]
    pub fields: BoundaryFieldMapping,
}

/// How to fetch the boundary `GeoJSON`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryFetcherConfig {
    /// A URL returning a `GeoJSON` `FeatureCollection`.
    GeojsonUrl {
        /// Full URL of the collection.
        url: String,
    },
    /// A local `GeoJSON` `FeatureCollection` file.
    GeojsonFile {
        /// Path to the file.
        path: String,
    },
}

/// Field mapping for extracting the neighbourhood name from a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryFieldMapping {
    /// Property holding the neighbourhood name.
    pub name: String,
}

impl Default for BoundaryFieldMapping {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
        }
    }
}

/// A normalized neighbourhood polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighbourhoodBoundary {
    /// Title-cased neighbourhood name, the join key for tree counts.
    pub name: String,
    /// `Polygon` or `MultiPolygon` geometry.
    pub geometry: geojson::Geometry,
    /// `[lon, lat]` of the polygon centroid, for labels and tooltips.
    pub centroid: Option<[f64; 2]>,
}

/// All known neighbourhood boundaries, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    by_name: BTreeMap<String, NeighbourhoodBoundary>,
}

impl BoundarySet {
    /// Builds a set from normalized boundaries. A later boundary with the
    /// same name replaces an earlier one.
    #[must_use]
    pub fn new(boundaries: impl IntoIterator<Item = NeighbourhoodBoundary>) -> Self {
        Self {
            by_name: boundaries
                .into_iter()
                .map(|b| (b.name.clone(), b))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NeighbourhoodBoundary> {
        self.by_name.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Boundaries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &NeighbourhoodBoundary> {
        self.by_name.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
