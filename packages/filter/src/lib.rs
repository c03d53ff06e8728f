#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine for the cherry blossom dashboard.
//!
//! Turns a [`FilterState`] into a single row predicate and applies it to
//! the tree inventory. Unset inputs are resolved to concrete defaults
//! first ([`ResolvedFilter::resolve`]); only then is any row evaluated.
//!
//! Dimensions combine with AND. Members within a multi-select dimension
//! combine with OR.

pub mod predicates;

use blossom_map_filter_models::{FilterState, Season, Selection};
use blossom_map_tree_models::{Dataset, TreeId, TreeRecord, TreeView, diameter_from_cm};
use chrono::NaiveDate;

/// A filter state with every default filled in.
///
/// Date bounds are concrete and the diameter range is in the native unit,
/// so evaluating a row never needs to consult the dataset or convert
/// units.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter<'s> {
    /// First day of the bloom query window.
    pub start: NaiveDate,
    /// Last day of the bloom query window.
    pub end: NaiveDate,
    /// Lower diameter bound, native unit.
    pub diameter_min: f64,
    /// Upper diameter bound, native unit.
    pub diameter_max: f64,
    /// Neighbourhood dimension.
    pub neighbourhoods: &'s Selection<String>,
    /// Cultivar dimension.
    pub cultivars: &'s Selection<String>,
    /// Map selection dimension.
    pub map_selection: &'s Selection<TreeId>,
}

impl<'s> ResolvedFilter<'s> {
    /// Fills in the defaults for every unset input.
    ///
    /// * A missing date end takes the matching end of `season`, widened to
    ///   the dataset's observed bloom extent.
    /// * A missing diameter range becomes the observed diameter extent.
    /// * A supplied diameter range is converted from centimeters once,
    ///   here.
    #[must_use]
    pub fn resolve(state: &'s FilterState, dataset: &Dataset, season: &Season) -> Self {
        let (default_start, default_end) = dataset.bloom_extent().map_or(
            (season.start, season.end),
            |(lo, hi)| (season.start.min(lo), season.end.max(hi)),
        );

        let (diameter_min, diameter_max) = state.diameter_range.map_or_else(
            || dataset.diameter_extent().unwrap_or((0.0, f64::INFINITY)),
            |range| (diameter_from_cm(range.min_cm), diameter_from_cm(range.max_cm)),
        );

        Self {
            start: state.date_range.start.unwrap_or(default_start),
            end: state.date_range.end.unwrap_or(default_end),
            diameter_min,
            diameter_max,
            neighbourhoods: &state.neighbourhoods,
            cultivars: &state.cultivars,
            map_selection: &state.map_selection,
        }
    }

    /// Whether a row passes every dimension.
    #[must_use]
    pub fn includes(&self, tree: &TreeRecord) -> bool {
        self.map_selection.matches(Some(&tree.tree_id))
            && self
                .neighbourhoods
                .matches(tree.neighbourhood_name.as_deref())
            && tree.bloom_interval().is_some_and(|(bloom_start, bloom_end)| {
                predicates::bloom_overlaps(bloom_start, bloom_end, self.start, self.end)
            })
            && tree.diameter.is_some_and(|d| {
                predicates::diameter_within(d, self.diameter_min, self.diameter_max)
            })
            && self.cultivars.matches(tree.cultivar_name.as_deref())
    }

    /// Keeps the rows of `view` that pass, in order.
    #[must_use]
    pub fn filter<'a>(&self, view: &TreeView<'a>) -> TreeView<'a> {
        TreeView::from_rows(view.iter().filter(|tree| self.includes(tree)).collect())
    }
}

/// Filters the dataset by the given state.
///
/// Returns the matching rows in source order. Never mutates the dataset.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, state: &FilterState, season: &Season) -> TreeView<'a> {
    apply_to(&dataset.view(), dataset, state, season)
}

/// Filters an existing view of `dataset`. Defaults are still resolved
/// against the whole dataset, so re-filtering a result with the same
/// state returns it unchanged.
#[must_use]
pub fn apply_to<'a>(
    view: &TreeView<'a>,
    dataset: &Dataset,
    state: &FilterState,
    season: &Season,
) -> TreeView<'a> {
    let resolved = ResolvedFilter::resolve(state, dataset, season);
    let filtered = resolved.filter(view);

    log::debug!(
        "Filtered {} -> {} trees (bloom {}..{}, diameter {:.2}..{:.2})",
        view.len(),
        filtered.len(),
        resolved.start,
        resolved.end,
        resolved.diameter_min,
        resolved.diameter_max,
    );

    filtered
}
