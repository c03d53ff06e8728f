#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state types for the cherry blossom dashboard.
//!
//! A [`FilterState`] holds the current value of every dashboard input.
//! Each dimension is independently optional; how an unset dimension is
//! defaulted is decided by the filter engine, not here.

use std::borrow::Borrow;
use std::collections::BTreeSet;

use blossom_map_tree_models::TreeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A multi-value filter dimension.
///
/// `Any` means the dimension places no restriction. `Only` restricts to
/// the given members; an empty `Only` set matches nothing. Multi-select
/// inputs go through [`Selection::from_multi_select`], which maps an empty
/// selection to `Any`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T: Ord> {
    /// No restriction.
    Any,
    /// Restricted to these members.
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T: Ord> Selection<T> {
    /// Builds a selection from a multi-select widget value. Nothing
    /// selected means the dimension is unset.
    pub fn from_multi_select(values: impl IntoIterator<Item = T>) -> Self {
        let set: BTreeSet<T> = values.into_iter().collect();
        if set.is_empty() {
            Self::Any
        } else {
            Self::Only(set)
        }
    }

    /// Builds an explicit selection. An empty set matches nothing.
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Self::Only(values.into_iter().collect())
    }

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Whether a row value passes this dimension. A missing value only
    /// passes when the dimension is unset.
    pub fn matches<Q>(&self, value: Option<&Q>) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self {
            Self::Any => true,
            Self::Only(set) => value.is_some_and(|v| set.contains(v)),
        }
    }
}

/// The bloom date query window. Either end may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day of the window.
    pub start: Option<NaiveDate>,
    /// Last day of the window.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// A trunk diameter range in centimeters, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiameterRange {
    /// Lower bound in centimeters.
    pub min_cm: f64,
    /// Upper bound in centimeters.
    pub max_cm: f64,
}

impl DiameterRange {
    #[must_use]
    pub const fn new(min_cm: f64, max_cm: f64) -> Self {
        Self { min_cm, max_cm }
    }
}

/// The default bloom date window, used for unset date range ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    /// First day of the season.
    pub start: NaiveDate,
    /// Last day of the season.
    pub end: NaiveDate,
}

impl Default for Season {
    /// The 2022 blossom season covered by the sample data.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2022, 5, 30).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// The current value of every dashboard filter input.
///
/// `Default` is the all-unset state: no restriction beyond the default
/// date window and diameter range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Bloom date query window.
    #[serde(default)]
    pub date_range: DateRange,
    /// Selected neighbourhoods.
    #[serde(default)]
    pub neighbourhoods: Selection<String>,
    /// Selected cultivars.
    #[serde(default)]
    pub cultivars: Selection<String>,
    /// Trunk diameter range in centimeters.
    #[serde(default)]
    pub diameter_range: Option<DiameterRange>,
    /// Trees picked on the point map.
    #[serde(default)]
    pub map_selection: Selection<TreeId>,
}

/// A marker picked on the point map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPoint {
    /// ID of the tree behind the marker.
    pub tree_id: TreeId,
}

/// A selection gesture on the point map.
///
/// `points` is `None` when the gesture enclosed no markers; that still
/// counts as a selection and restricts the view to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSelection {
    /// The markers inside the selection.
    #[serde(default)]
    pub points: Option<Vec<SelectedPoint>>,
}

impl From<MapSelection> for Selection<TreeId> {
    fn from(selection: MapSelection) -> Self {
        Self::only(
            selection
                .points
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.tree_id),
        )
    }
}
