#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighbourhood boundary fetching and normalization.
//!
//! Downloads (or reads) the city's neighbourhood polygons as a `GeoJSON`
//! `FeatureCollection` and normalizes them into a [`BoundarySet`] keyed by
//! the same title-cased names the tree inventory uses, so the choropleth
//! can join on name directly.

pub mod fetchers;
pub mod normalize;

use blossom_map_neighbourhood_models::{BoundarySet, BoundarySource};
use thiserror::Error;

/// Errors that can occur during neighbourhood operations.
#[derive(Debug, Error)]
pub enum NeighbourhoodError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local boundary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data conversion or normalization error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Fetches and normalizes the boundaries described by `source`.
///
/// # Errors
///
/// Returns [`NeighbourhoodError`] if fetching or parsing the collection
/// fails. Individual unusable features are skipped, not errors.
pub async fn load_boundaries(
    client: &reqwest::Client,
    source: &BoundarySource,
) -> Result<BoundarySet, NeighbourhoodError> {
    let features = fetchers::fetch_features(client, source).await?;
    log::info!("Fetched {} raw boundary features", features.len());

    let boundaries = normalize::normalize_features(&features, &source.fields);
    log::info!(
        "Normalized {} boundaries from {} features",
        boundaries.len(),
        features.len()
    );

    Ok(BoundarySet::new(boundaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_map_neighbourhood_models::{BoundaryFetcherConfig, BoundaryFieldMapping};

    #[tokio::test]
    async fn missing_boundary_file_is_an_io_error() {
        let source = BoundarySource {
            fetcher: BoundaryFetcherConfig::GeojsonFile {
                path: "does/not/exist.geojson".to_string(),
            },
            fields: BoundaryFieldMapping::default(),
        };
        let err = load_boundaries(&reqwest::Client::new(), &source)
            .await
            .unwrap_err();
        assert!(matches!(err, NeighbourhoodError::Io(_)));
    }
}
