//! Point map of individual trees.

use blossom_map_chart_models::{MapBounds, MapPoint, Marker, PointMap};
use blossom_map_filter_models::{MapSelection, SelectedPoint};
use blossom_map_tree_models::TreeView;
use geo::{BoundingRect as _, Centroid as _, MultiPoint, Point};

/// Marker colour.
pub const MARKER_COLOR: &str = "#B665A4";

/// One marker per tree with coordinates, centred on the markers.
///
/// Rows without a latitude or longitude are skipped. With no markers the
/// map has no centre or bounds.
#[must_use]
pub fn point_map(view: &TreeView<'_>, zoom: f64) -> PointMap {
    let markers: Vec<Marker> = view
        .iter()
        .filter_map(|tree| {
            let (lat, lon) = tree.coordinates()?;
            Some(Marker {
                tree_id: tree.tree_id,
                lat,
                lon,
                common_name: tree.common_name.clone(),
                neighbourhood_name: tree.neighbourhood_name.clone(),
                diameter_cm: tree.diameter_cm(),
            })
        })
        .collect();

    let points: MultiPoint<f64> = markers.iter().map(|m| Point::new(m.lon, m.lat)).collect();

    let center = points.centroid().map(|c| MapPoint {
        lat: c.y(),
        lon: c.x(),
    });
    let bounds = points.bounding_rect().map(|rect| MapBounds {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    });

    PointMap {
        center,
        bounds,
        zoom,
        marker_color: MARKER_COLOR.to_string(),
        markers,
    }
}

/// The map selection for a set of picked markers.
#[must_use]
pub fn select_markers<'a>(markers: impl IntoIterator<Item = &'a Marker>) -> MapSelection {
    MapSelection {
        points: Some(
            markers
                .into_iter()
                .map(|marker| SelectedPoint {
                    tree_id: marker.tree_id,
                })
                .collect(),
        ),
    }
}
