//! Local `GeoJSON` file fetcher.

use crate::NeighbourhoodError;

/// Reads all features from a local `FeatureCollection` file.
///
/// # Errors
///
/// Returns [`NeighbourhoodError`] if the file cannot be read or parsed.
pub async fn fetch(path: &str) -> Result<Vec<serde_json::Value>, NeighbourhoodError> {
    log::info!("Reading neighbourhood boundaries from {path}");

    let body = tokio::fs::read_to_string(path).await?;
    super::features_from_collection(&body)
}
