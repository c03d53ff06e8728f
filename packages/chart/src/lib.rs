#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart builders for the cherry blossom dashboard.
//!
//! Every builder is a pure function from a filtered [`TreeView`] to a
//! declarative artifact in [`blossom_map_chart_models`]. Builders never
//! mutate their input, skip rows missing the fields they need, and return
//! an empty chart rather than failing when nothing is left.
//!
//! [`TreeView`]: blossom_map_tree_models::TreeView

pub mod bar;
pub mod density;
pub mod diameter;
pub mod map;
pub mod timeline;

use blossom_map_chart_models::BarGrouping;
use serde::{Deserialize, Serialize};

/// Tunables shared by the chart builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Field the count bar chart groups by.
    pub bar_grouping: BarGrouping,
    /// Drop bar groups with fewer trees than this.
    pub min_count: Option<u64>,
    /// Diameters above this many centimeters are left out of the density
    /// curve.
    pub diameter_max_cm: f64,
    /// Diameter axis domain in centimeters.
    pub diameter_domain_cm: [f64; 2],
    /// Initial zoom level of the point map.
    pub map_zoom: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bar_grouping: BarGrouping::Cultivar,
            min_count: None,
            diameter_max_cm: 150.0,
            diameter_domain_cm: [0.0, 160.0],
            map_zoom: 10.9,
        }
    }
}
