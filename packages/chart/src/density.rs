//! Neighbourhood density choropleth.

use std::collections::BTreeMap;

use blossom_map_chart_models::{Choropleth, ChoroplethRegion, NeighbourhoodCount};
use blossom_map_neighbourhood_models::BoundarySet;
use blossom_map_tree_models::TreeView;

/// Fill for polygons no tree joined to.
pub const DEFAULT_FILL: &str = "#d3d3d3";

/// Name of the sequential scheme the fills are drawn from.
pub const SCHEME: &str = "redpurple";

/// Stops of the red-purple sequential scheme, light to dark.
const RED_PURPLE: [[u8; 3]; 9] = [
    [0xff, 0xf7, 0xf3],
    [0xfd, 0xe0, 0xdd],
    [0xfc, 0xc5, 0xc0],
    [0xfa, 0x9f, 0xb5],
    [0xf7, 0x68, 0xa1],
    [0xdd, 0x34, 0x97],
    [0xae, 0x01, 0x7e],
    [0x7a, 0x01, 0x77],
    [0x49, 0x00, 0x6a],
];

#[derive(Default)]
struct Tally {
    count: u64,
    diameter_sum: f64,
    diameter_n: u32,
}

impl Tally {
    fn mean_diameter_cm(&self) -> Option<f64> {
        (self.diameter_n > 0).then(|| self.diameter_sum / f64::from(self.diameter_n))
    }
}

/// Counts trees per neighbourhood and joins the counts onto the boundary
/// polygons by name.
///
/// Every boundary yields one region. Regions with no trees keep
/// [`DEFAULT_FILL`]; the rest are shaded on a `[min_count, max_count]`
/// scale spanning the matched counts, so the least dense shaded region
/// takes the lightest stop.
/// Neighbourhoods that have trees but no polygon are reported in
/// `unmatched` and do not affect the scale.
#[must_use]
pub fn neighbourhood_density(view: &TreeView<'_>, boundaries: &BoundarySet) -> Choropleth {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();

    for tree in view.iter() {
        let Some(name) = tree.neighbourhood_name.as_deref() else {
            continue;
        };
        let tally = tallies.entry(name).or_default();
        tally.count += 1;
        if let Some(cm) = tree.diameter_cm() {
            tally.diameter_sum += cm;
            tally.diameter_n += 1;
        }
    }

    let (min_count, max_count) = tallies
        .iter()
        .filter(|(name, _)| boundaries.contains(name))
        .map(|(_, tally)| tally.count)
        .fold(None, |acc, count| match acc {
            None => Some((count, count)),
            Some((lo, hi)) => Some((lo.min(count), hi.max(count))),
        })
        .unwrap_or((0, 0));

    let regions = boundaries
        .iter()
        .map(|boundary| {
            let tally = tallies.get(boundary.name.as_str());
            let count = tally.map_or(0, |t| t.count);
            ChoroplethRegion {
                name: boundary.name.clone(),
                count,
                mean_diameter_cm: tally.and_then(Tally::mean_diameter_cm),
                fill: if count == 0 {
                    DEFAULT_FILL.to_string()
                } else {
                    sequential_fill(count, min_count, max_count)
                },
                centroid: boundary.centroid,
                geometry: boundary.geometry.clone(),
            }
        })
        .collect();

    let unmatched: Vec<NeighbourhoodCount> = tallies
        .iter()
        .filter(|(name, _)| !boundaries.contains(name))
        .map(|(name, tally)| NeighbourhoodCount {
            name: (*name).to_string(),
            count: tally.count,
            mean_diameter_cm: tally.mean_diameter_cm(),
        })
        .collect();

    if !unmatched.is_empty() {
        log::debug!(
            "{} neighbourhood(s) have trees but no boundary polygon",
            unmatched.len()
        );
    }

    Choropleth {
        legend_title: "Number of Trees".to_string(),
        scheme: SCHEME.to_string(),
        min_count,
        max_count,
        regions,
        unmatched,
    }
}

/// Colour for `count` on a linear `[min, max]` red-purple scale.
///
/// A single-value domain maps to the middle of the scheme.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn sequential_fill(count: u64, min: u64, max: u64) -> String {
    let t = if max <= min {
        0.5
    } else {
        ((count as f64 - min as f64) / (max - min) as f64).clamp(0.0, 1.0)
    };

    let scaled = t * (RED_PURPLE.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(RED_PURPLE.len() - 2);
    let frac = scaled - lower as f64;
    let (from, to) = (RED_PURPLE[lower], RED_PURPLE[lower + 1]);

    let channel = |i: usize| {
        let (a, b) = (f64::from(from[i]), f64::from(to[i]));
        frac.mul_add(b - a, a).round() as u8
    };

    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_map_neighbourhood_models::NeighbourhoodBoundary;
    use blossom_map_tree_models::{Dataset, TreeRecord, diameter_from_cm};

    fn square() -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]))
    }

    fn boundaries(names: &[&str]) -> BoundarySet {
        BoundarySet::new(names.iter().map(|name| NeighbourhoodBoundary {
            name: (*name).to_string(),
            geometry: square(),
            centroid: Some([0.5, 0.5]),
        }))
    }

    fn tree(id: u64, neighbourhood: &str, diameter_cm: Option<f64>) -> TreeRecord {
        TreeRecord {
            neighbourhood_name: Some(neighbourhood.to_string()),
            diameter: diameter_cm.map(diameter_from_cm),
            ..TreeRecord::new(id)
        }
    }

    #[test]
    fn scale_endpoints_match_scheme() {
        assert_eq!(sequential_fill(0, 0, 10), "#fff7f3");
        assert_eq!(sequential_fill(10, 0, 10), "#49006a");
        assert_eq!(sequential_fill(3, 3, 11), "#fff7f3");
        assert_eq!(sequential_fill(11, 3, 11), "#49006a");
    }

    #[test]
    fn scale_hits_interior_stops() {
        // Halfway is exactly the middle stop.
        assert_eq!(sequential_fill(4, 0, 8), "#f768a1");
        assert_eq!(sequential_fill(7, 3, 11), "#f768a1");
    }

    #[test]
    fn single_value_domain_takes_the_middle_stop() {
        assert_eq!(sequential_fill(5, 5, 5), "#f768a1");
        assert_eq!(sequential_fill(0, 0, 0), "#f768a1");
    }

    #[test]
    fn lowest_matched_count_takes_the_lightest_stop() {
        let mut trees: Vec<TreeRecord> = (0..40).map(|id| tree(id, "Sunset", None)).collect();
        trees.extend((40..80).map(|id| tree(id, "Kitsilano", None)));
        trees.extend((80..120).map(|id| tree(id, "Marpole", None)));
        trees.extend((120..124).map(|id| tree(id, "Sunset", None)));
        let dataset = Dataset::new(trees);
        let chart = neighbourhood_density(
            &dataset.view(),
            &boundaries(&["Kitsilano", "Sunset", "Marpole"]),
        );

        assert_eq!((chart.min_count, chart.max_count), (40, 44));
        let fill = |name: &str| {
            chart
                .regions
                .iter()
                .find(|r| r.name == name)
                .unwrap()
                .fill
                .clone()
        };
        assert_eq!(fill("Kitsilano"), "#fff7f3");
        assert_eq!(fill("Marpole"), "#fff7f3");
        assert_eq!(fill("Sunset"), "#49006a");
    }

    #[test]
    fn joins_counts_onto_boundaries() {
        let dataset = Dataset::new(vec![
            tree(1, "Sunset", Some(20.0)),
            tree(2, "Sunset", Some(40.0)),
            tree(3, "Kitsilano", None),
        ]);
        let chart = neighbourhood_density(
            &dataset.view(),
            &boundaries(&["Kitsilano", "Sunset", "Marpole"]),
        );

        assert_eq!((chart.min_count, chart.max_count), (1, 2));
        assert_eq!(chart.regions.len(), 3);

        let sunset = chart.regions.iter().find(|r| r.name == "Sunset").unwrap();
        assert_eq!(sunset.count, 2);
        assert_eq!(sunset.fill, "#49006a");
        assert!((sunset.mean_diameter_cm.unwrap() - 30.0).abs() < 1e-9);

        let kits = chart.regions.iter().find(|r| r.name == "Kitsilano").unwrap();
        assert_eq!(kits.count, 1);
        assert_eq!(kits.fill, "#fff7f3");
        assert_eq!(kits.mean_diameter_cm, None);

        let marpole = chart.regions.iter().find(|r| r.name == "Marpole").unwrap();
        assert_eq!(marpole.count, 0);
        assert_eq!(marpole.fill, DEFAULT_FILL);
    }

    #[test]
    fn unmatched_neighbourhoods_are_reported_not_scaled() {
        let dataset = Dataset::new(vec![
            tree(1, "Sunset", None),
            tree(2, "Atlantis", None),
            tree(3, "Atlantis", None),
            tree(4, "Atlantis", None),
        ]);
        let chart = neighbourhood_density(&dataset.view(), &boundaries(&["Sunset"]));

        assert_eq!((chart.min_count, chart.max_count), (1, 1));
        assert_eq!(chart.regions[0].fill, "#f768a1");
        assert_eq!(chart.unmatched.len(), 1);
        assert_eq!(chart.unmatched[0].name, "Atlantis");
        assert_eq!(chart.unmatched[0].count, 3);
    }

    #[test]
    fn empty_view_leaves_every_region_default() {
        let chart = neighbourhood_density(&TreeView::default(), &boundaries(&["Sunset"]));
        assert_eq!((chart.min_count, chart.max_count), (0, 0));
        assert_eq!(chart.regions[0].fill, DEFAULT_FILL);
        assert!(chart.unmatched.is_empty());
    }

    #[test]
    fn no_boundaries_reports_everything_unmatched() {
        let dataset = Dataset::new(vec![tree(1, "Sunset", None)]);
        let chart = neighbourhood_density(&dataset.view(), &BoundarySet::default());
        assert!(chart.regions.is_empty());
        assert_eq!(chart.unmatched.len(), 1);
    }
}
