//! Normalizes raw `GeoJSON` features into [`NeighbourhoodBoundary`] values.
//!
//! Names are title-cased the same way the tree loader normalizes
//! `NEIGHBOURHOOD_NAME`, so both sides of the choropleth join agree.

use blossom_map_neighbourhood_models::{BoundaryFieldMapping, NeighbourhoodBoundary};
use blossom_map_tree_models::title_case;
use geo::{Centroid, MultiPolygon};

/// Normalizes a list of raw `GeoJSON` features into boundaries.
///
/// Skips features with missing names or non-polygonal geometry.
#[must_use]
pub fn normalize_features(
    features: &[serde_json::Value],
    fields: &BoundaryFieldMapping,
) -> Vec<NeighbourhoodBoundary> {
    features
        .iter()
        .filter_map(|feature| {
            let boundary = normalize_feature(feature, fields);
            if boundary.is_none() {
                log::debug!(
                    "Skipping unusable boundary feature: {}",
                    feature.get("id").unwrap_or(&serde_json::Value::Null)
                );
            }
            boundary
        })
        .collect()
}

/// Normalizes a single `GeoJSON` feature.
fn normalize_feature(
    feature: &serde_json::Value,
    fields: &BoundaryFieldMapping,
) -> Option<NeighbourhoodBoundary> {
    let props = feature.get("properties")?;

    let name = props
        .get(&fields.name)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;

    let geom = feature.get("geometry")?;
    if geom.is_null() {
        return None;
    }
    let geometry = geojson::Geometry::from_json_value(geom.clone()).ok()?;
    let polygons = to_multipolygon(&geometry)?;

    Some(NeighbourhoodBoundary {
        name: title_case(name),
        geometry,
        centroid: polygons.centroid().map(|p| [p.x(), p.y()]),
    })
}

/// Converts `Polygon`/`MultiPolygon` geometry to a [`MultiPolygon`].
/// Any other geometry type yields `None`.
fn to_multipolygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
