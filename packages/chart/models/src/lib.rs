#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Declarative chart artifact types.
//!
//! Each chart builder produces one of these plain data structures. They
//! carry everything the presentation layer needs to draw the chart (data,
//! axis bounds, titles, colours) and serialize to camelCase JSON. An empty
//! input produces the same structure with no data points.

use blossom_map_tree_models::TreeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Field the count bar chart groups by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BarGrouping {
    /// Group by cultivar name.
    #[default]
    Cultivar,
    /// Group by species common name.
    CommonName,
}

/// One bar of the count chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Group label (cultivar or common name).
    pub label: String,
    /// Number of trees in the group.
    pub count: u64,
}

/// Horizontal bar chart of tree counts per group, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    /// Field the bars are grouped by.
    pub grouping: BarGrouping,
    /// Groups below this count were dropped.
    pub min_count: Option<u64>,
    /// Count axis title.
    pub x_title: String,
    /// Group axis title.
    pub y_title: String,
    /// Bars sorted by descending count.
    pub bars: Vec<Bar>,
}

/// A labelled tick on a time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    /// Tick position.
    pub date: NaiveDate,
    /// Tick label (abbreviated month name).
    pub label: String,
}

/// A bounded time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxis {
    /// Left edge.
    pub start: NaiveDate,
    /// Right edge.
    pub end: NaiveDate,
    /// Month-end ticks.
    pub ticks: Vec<AxisTick>,
}

/// One cultivar's bloom period on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBar {
    /// Cultivar name.
    pub cultivar: String,
    /// First bloom day.
    pub start: NaiveDate,
    /// Last bloom day.
    pub end: NaiveDate,
}

/// Bloom periods per cultivar on a shared seasonal axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Shared time axis.
    pub axis: TimeAxis,
    /// Bars ordered by bloom start.
    pub bars: Vec<TimelineBar>,
}

/// A sample of the density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityPoint {
    /// Trunk diameter in centimeters.
    pub diameter_cm: f64,
    /// Estimated probability density.
    pub density: f64,
}

/// Smoothed distribution of trunk diameters.
///
/// The density axis is relative only and carries no labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityCurve {
    /// Diameter axis title.
    pub x_title: String,
    /// Diameter axis domain in centimeters.
    pub x_domain: [f64; 2],
    /// Number of diameters the estimate is built from.
    pub sample_size: usize,
    /// Kernel bandwidth in centimeters; `None` when there is no data.
    pub bandwidth: Option<f64>,
    /// Curve samples in ascending diameter order.
    pub points: Vec<DensityPoint>,
}

/// Per-neighbourhood aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighbourhoodCount {
    /// Neighbourhood name.
    pub name: String,
    /// Number of trees.
    pub count: u64,
    /// Mean trunk diameter in centimeters of trees with a diameter.
    pub mean_diameter_cm: Option<f64>,
}

/// One polygon of the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethRegion {
    /// Neighbourhood name.
    pub name: String,
    /// Number of trees (zero when no tree joined).
    pub count: u64,
    /// Mean trunk diameter in centimeters.
    pub mean_diameter_cm: Option<f64>,
    /// Fill colour as `#rrggbb`.
    pub fill: String,
    /// `[lon, lat]` label position.
    pub centroid: Option<[f64; 2]>,
    /// Region outline.
    pub geometry: geojson::Geometry,
}

/// Tree density per neighbourhood drawn over the boundary polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choropleth {
    /// Legend title.
    pub legend_title: String,
    /// Name of the sequential colour scheme.
    pub scheme: String,
    /// Bottom of the colour scale domain: the smallest count joined onto
    /// a polygon.
    pub min_count: u64,
    /// Top of the colour scale domain.
    pub max_count: u64,
    /// Every boundary polygon, in name order.
    pub regions: Vec<ChoroplethRegion>,
    /// Neighbourhoods with trees but no boundary polygon.
    pub unmatched: Vec<NeighbourhoodCount>,
}

/// A geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

/// One tree on the point map.
///
/// Carries the tree ID so a selection of markers can be turned back into
/// a map selection filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Tree ID.
    pub tree_id: TreeId,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Species common name.
    pub common_name: Option<String>,
    /// Neighbourhood name.
    pub neighbourhood_name: Option<String>,
    /// Trunk diameter in centimeters.
    pub diameter_cm: Option<f64>,
}

/// Street map with one marker per tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMap {
    /// Initial view centre; `None` when there are no markers.
    pub center: Option<MapPoint>,
    /// Extent of the markers.
    pub bounds: Option<MapBounds>,
    /// Initial zoom level.
    pub zoom: f64,
    /// Marker colour as `#rrggbb`.
    pub marker_color: String,
    /// Markers in dataset order.
    pub markers: Vec<Marker>,
}

/// The charts the dashboard renders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Count bar chart.
    Bar,
    /// Bloom timeline.
    Timeline,
    /// Diameter density curve.
    Diameter,
    /// Neighbourhood density choropleth.
    Density,
    /// Point map.
    Map,
}

impl ChartKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bar,
            Self::Timeline,
            Self::Diameter,
            Self::Density,
            Self::Map,
        ]
    }
}

/// Every chart for one filter state, published together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartArtifacts {
    /// Increments with every recompute in a session.
    pub generation: u64,
    /// Trees in the whole dataset.
    pub total_trees: usize,
    /// Trees passing the filter.
    pub filtered_trees: usize,
    /// Count bar chart.
    pub bar: BarChart,
    /// Bloom timeline.
    pub timeline: Timeline,
    /// Diameter density curve.
    pub diameter: DensityCurve,
    /// Neighbourhood density choropleth.
    pub density: Choropleth,
    /// Point map.
    pub map: PointMap,
}
