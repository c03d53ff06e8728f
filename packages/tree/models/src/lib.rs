#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street tree record types and the shared read-only dataset.
//!
//! A [`Dataset`] is built once at startup and never mutated afterwards.
//! Every filtered subset is a [`TreeView`] that borrows rows from the
//! dataset, so row identity and source order are preserved without
//! copying records.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a street tree in the city inventory.
pub type TreeId = u64;

/// Centimeters per native diameter unit (the inventory records inches).
pub const CM_PER_DIAMETER_UNIT: f64 = 2.54;

/// Converts a native diameter to centimeters.
#[must_use]
pub fn diameter_to_cm(diameter: f64) -> f64 {
    diameter * CM_PER_DIAMETER_UNIT
}

/// Converts a diameter in centimeters to the native unit.
#[must_use]
pub fn diameter_from_cm(cm: f64) -> f64 {
    cm / CM_PER_DIAMETER_UNIT
}

/// A single flowering tree as loaded from the processed inventory.
///
/// Everything except the ID is optional: the preprocessing join leaves
/// gaps (e.g. cultivars without a known bloom period) and those rows stay
/// in the dataset. Charts drop rows missing the fields they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRecord {
    /// Inventory ID.
    pub tree_id: TreeId,
    /// Species common name, title-cased (e.g. "Kwanzan Flowering Cherry").
    pub common_name: Option<String>,
    /// Cultivar name, title-cased (e.g. "Kwanzan").
    pub cultivar_name: Option<String>,
    /// Neighbourhood name, title-cased (e.g. "Kensington-Cedar Cottage").
    pub neighbourhood_name: Option<String>,
    /// Trunk diameter in the native unit (inches).
    pub diameter: Option<f64>,
    /// First day of the cultivar's bloom period.
    pub bloom_start: Option<NaiveDate>,
    /// Last day of the cultivar's bloom period.
    pub bloom_end: Option<NaiveDate>,
    /// Latitude (WGS84).
    pub lat: Option<f64>,
    /// Longitude (WGS84).
    pub lon: Option<f64>,
}

impl TreeRecord {
    /// Creates a record with only an ID set.
    #[must_use]
    pub const fn new(tree_id: TreeId) -> Self {
        Self {
            tree_id,
            common_name: None,
            cultivar_name: None,
            neighbourhood_name: None,
            diameter: None,
            bloom_start: None,
            bloom_end: None,
            lat: None,
            lon: None,
        }
    }

    /// Trunk diameter in centimeters.
    #[must_use]
    pub fn diameter_cm(&self) -> Option<f64> {
        self.diameter.map(diameter_to_cm)
    }

    /// The bloom interval, if both ends are known.
    #[must_use]
    pub const fn bloom_interval(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bloom_start, self.bloom_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// `(lat, lon)`, if both are known.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// The full tree inventory, immutable after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<TreeRecord>,
}

impl Dataset {
    /// Wraps loaded records. Order is kept as given.
    #[must_use]
    pub const fn new(records: Vec<TreeRecord>) -> Self {
        Self { records }
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[TreeRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A view over every row.
    #[must_use]
    pub fn view(&self) -> TreeView<'_> {
        TreeView::from_rows(self.records.iter().collect())
    }

    /// Sorted distinct neighbourhood names.
    #[must_use]
    pub fn neighbourhoods(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.neighbourhood_name.as_deref()))
    }

    /// Sorted distinct cultivar names.
    #[must_use]
    pub fn cultivars(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.cultivar_name.as_deref()))
    }

    /// Smallest and largest native diameter, ignoring missing values.
    #[must_use]
    pub fn diameter_extent(&self) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.diameter)
            .filter(|d| !d.is_nan())
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }

    /// Earliest bloom start and latest bloom end over rows with both dates.
    #[must_use]
    pub fn bloom_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.records
            .iter()
            .filter_map(TreeRecord::bloom_interval)
            .fold(None, |acc, (start, end)| match acc {
                None => Some((start, end)),
                Some((lo, hi)) => Some((lo.min(start), hi.max(end))),
            })
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// An ordered subset of a [`Dataset`].
///
/// Rows are borrowed, so a view is cheap to build and always refers to
/// the original records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeView<'a> {
    rows: Vec<&'a TreeRecord>,
}

impl<'a> TreeView<'a> {
    #[must_use]
    pub const fn from_rows(rows: Vec<&'a TreeRecord>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[&'a TreeRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TreeRecord> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// IDs of the rows in view order.
    #[must_use]
    pub fn tree_ids(&self) -> Vec<TreeId> {
        self.rows.iter().map(|r| r.tree_id).collect()
    }
}

/// Title-cases a name the way the inventory's display names are written.
///
/// A letter is upper-cased when it follows a non-letter (start of string,
/// space, hyphen, apostrophe, digit) and lower-cased otherwise, so
/// `"KENSINGTON-CEDAR COTTAGE"` becomes `"Kensington-Cedar Cottage"`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut after_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }

    out
}
