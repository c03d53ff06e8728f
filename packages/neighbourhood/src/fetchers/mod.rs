//! Fetcher dispatch and implementations for the boundary sources.
//!
//! Each fetcher yields the raw `features` array of a `GeoJSON`
//! `FeatureCollection`.

pub mod geojson_file;
pub mod geojson_url;

use blossom_map_neighbourhood_models::{BoundaryFetcherConfig, BoundarySource};

use crate::NeighbourhoodError;

/// Fetches raw `GeoJSON` features for the source.
///
/// # Errors
///
/// Returns [`NeighbourhoodError`] if the request, file read, or response
/// parsing fails.
pub async fn fetch_features(
    client: &reqwest::Client,
    source: &BoundarySource,
) -> Result<Vec<serde_json::Value>, NeighbourhoodError> {
    match &source.fetcher {
        BoundaryFetcherConfig::GeojsonUrl { url } => geojson_url::fetch(client, url).await,
        BoundaryFetcherConfig::GeojsonFile { path } => geojson_file::fetch(path).await,
    }
}

/// Extracts the `features` array from a `FeatureCollection` body.
///
/// # Errors
///
/// Returns [`NeighbourhoodError::Conversion`] if the body is not JSON or
/// has no `features` array.
pub fn features_from_collection(body: &str) -> Result<Vec<serde_json::Value>, NeighbourhoodError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| NeighbourhoodError::Conversion {
            message: format!("Failed to parse GeoJSON: {e}"),
        })?;

    match json {
        serde_json::Value::Object(mut map) => match map.remove("features") {
            Some(serde_json::Value::Array(features)) => Ok(features),
            _ => Err(NeighbourhoodError::Conversion {
                message: "No features array in GeoJSON".to_string(),
            }),
        },
        _ => Err(NeighbourhoodError::Conversion {
            message: "GeoJSON root is not an object".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_features_array() {
        let features = features_from_collection(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature"},{"type":"Feature"}]}"#,
        )
        .unwrap();
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn rejects_collection_without_features() {
        let err = features_from_collection(r#"{"type":"FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, NeighbourhoodError::Conversion { .. }));
    }

    #[test]
    fn rejects_non_json_body() {
        assert!(features_from_collection("<html>").is_err());
    }
}
