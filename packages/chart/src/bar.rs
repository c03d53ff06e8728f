//! Tree count bar chart.

use std::collections::BTreeMap;

use blossom_map_chart_models::{Bar, BarChart, BarGrouping};
use blossom_map_tree_models::{TreeRecord, TreeView};

/// Counts trees per group, largest first.
///
/// Grouping by cultivar skips rows without a cultivar or neighbourhood;
/// grouping by common name skips rows without a common name. Ties are
/// broken by label so the order is stable. With `min_count` set, groups
/// with fewer trees are dropped.
#[must_use]
pub fn count_bar(view: &TreeView<'_>, grouping: BarGrouping, min_count: Option<u64>) -> BarChart {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();

    for tree in view.iter() {
        if let Some(label) = group_label(tree, grouping) {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut bars: Vec<Bar> = counts
        .into_iter()
        .filter(|(_, count)| min_count.is_none_or(|min| *count >= min))
        .map(|(label, count)| Bar {
            label: label.to_string(),
            count,
        })
        .collect();

    bars.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    BarChart {
        grouping,
        min_count,
        x_title: "Number of Trees".to_string(),
        y_title: "Tree Name".to_string(),
        bars,
    }
}

fn group_label(tree: &TreeRecord, grouping: BarGrouping) -> Option<&str> {
    match grouping {
        BarGrouping::Cultivar => {
            tree.neighbourhood_name.as_ref()?;
            tree.cultivar_name.as_deref()
        }
        BarGrouping::CommonName => tree.common_name.as_deref(),
    }
}
