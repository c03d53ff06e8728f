//! Direct `GeoJSON` URL fetcher.

use crate::NeighbourhoodError;

/// Fetches all features from a URL that returns a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`NeighbourhoodError`] if the request fails, the server answers
/// with a non-success status, or the body cannot be parsed.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, NeighbourhoodError> {
    log::info!("Fetching neighbourhood boundaries from {url}");

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(NeighbourhoodError::Conversion {
            message: format!("GeoJSON request failed with status {}", resp.status()),
        });
    }
    let body = resp.text().await?;

    super::features_from_collection(&body)
}
