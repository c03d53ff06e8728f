#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reactive controller for the cherry blossom dashboard.
//!
//! A [`Dashboard`] holds the immutable tree inventory and neighbourhood
//! boundaries behind [`Arc`]s. [`Dashboard::render`] is the whole
//! pipeline: filter once, run every chart builder once, return one bundle.
//! Each [`Session`] owns a filter state and re-renders on every input
//! event, so any number of sessions can share one dashboard.

pub mod config;
pub mod session;

use std::sync::Arc;

use blossom_map_chart::{
    ChartOptions, bar::count_bar, density::neighbourhood_density, diameter::diameter_density,
    map::point_map, timeline::bloom_timeline,
};
use blossom_map_chart_models::ChartArtifacts;
use blossom_map_dataset::LoadError;
use blossom_map_filter_models::{DiameterRange, FilterState, Season};
use blossom_map_neighbourhood_models::BoundarySet;
use blossom_map_tree_models::{Dataset, diameter_to_cm};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, DashboardConfig};
pub use session::{FilterEvent, Session};

/// Errors that can occur while opening or driving the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Loading the tree inventory failed.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Loading the configuration failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An input event could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the filter widgets offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Neighbourhood multi-select options, sorted.
    pub neighbourhoods: Vec<String>,
    /// Cultivar multi-select options, sorted.
    pub cultivars: Vec<String>,
    /// Initial date picker window.
    pub season: Season,
    /// Diameter slider bounds in centimeters; `None` without diameters.
    pub diameter_range: Option<DiameterRange>,
}

/// The shared, read-only dashboard core.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    boundaries: Arc<BoundarySet>,
    season: Season,
    charts: ChartOptions,
}

impl Dashboard {
    #[must_use]
    pub const fn new(
        dataset: Arc<Dataset>,
        boundaries: Arc<BoundarySet>,
        season: Season,
        charts: ChartOptions,
    ) -> Self {
        Self {
            dataset,
            boundaries,
            season,
            charts,
        }
    }

    /// Loads the tree inventory and boundaries described by `config`.
    ///
    /// A failed boundary fetch is not fatal: the dashboard starts with no
    /// polygons and every neighbourhood is reported as unmatched.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Load`] if the tree inventory cannot be
    /// loaded.
    pub async fn open(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let dataset = blossom_map_dataset::load(&config.data.trees_path)?;

        let client = reqwest::Client::new();
        let boundaries =
            match blossom_map_neighbourhood::load_boundaries(&client, &config.boundaries).await {
                Ok(boundaries) => boundaries,
                Err(e) => {
                    log::warn!("Failed to load neighbourhood boundaries, continuing without: {e}");
                    BoundarySet::default()
                }
            };

        let dashboard = Self::new(
            Arc::new(dataset),
            Arc::new(boundaries),
            config.season,
            config.charts.clone(),
        );
        dashboard.log_unmatched_neighbourhoods();

        Ok(dashboard)
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    #[must_use]
    pub const fn season(&self) -> &Season {
        &self.season
    }

    /// Filters once and builds every chart from the result.
    ///
    /// The bundle's generation is zero; sessions number their own renders.
    #[must_use]
    pub fn render(&self, state: &FilterState) -> ChartArtifacts {
        let view = blossom_map_filter::apply(&self.dataset, state, &self.season);

        ChartArtifacts {
            generation: 0,
            total_trees: self.dataset.len(),
            filtered_trees: view.len(),
            bar: count_bar(&view, self.charts.bar_grouping, self.charts.min_count),
            timeline: bloom_timeline(&view, &self.season),
            diameter: diameter_density(
                &view,
                self.charts.diameter_max_cm,
                self.charts.diameter_domain_cm,
            ),
            density: neighbourhood_density(&view, &self.boundaries),
            map: point_map(&view, self.charts.map_zoom),
        }
    }

    /// Option lists and bounds for the filter widgets.
    #[must_use]
    pub fn options(&self) -> FilterOptions {
        FilterOptions {
            neighbourhoods: self.dataset.neighbourhoods(),
            cultivars: self.dataset.cultivars(),
            season: self.season,
            diameter_range: self
                .dataset
                .diameter_extent()
                .map(|(lo, hi)| DiameterRange::new(diameter_to_cm(lo), diameter_to_cm(hi))),
        }
    }

    /// Starts a new session with every filter unset.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }

    fn log_unmatched_neighbourhoods(&self) {
        if self.boundaries.is_empty() {
            return;
        }
        let unmatched: Vec<String> = self
            .dataset
            .neighbourhoods()
            .into_iter()
            .filter(|name| !self.boundaries.contains(name))
            .collect();
        if !unmatched.is_empty() {
            log::warn!(
                "{} neighbourhood(s) have no boundary polygon: {}",
                unmatched.len(),
                unmatched.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_map_filter_models::{DateRange, Selection};
    use blossom_map_neighbourhood_models::NeighbourhoodBoundary;
    use chrono::NaiveDate;

    const TREES_CSV: &str = "\
,TREE_ID,CULTIVAR_NAME,COMMON_NAME,NEIGHBOURHOOD_NAME,DIAMETER,BLOOM_START,BLOOM_END,lat,lon
0,1,KWANZAN,KWANZAN FLOWERING CHERRY,SUNSET,10,01/04/2022,30/04/2022,49.22,-123.09
1,2,AKEBONO,YOSHINO CHERRY,SUNSET,6,10/03/2022,31/03/2022,49.23,-123.10
2,3,KWANZAN,KWANZAN FLOWERING CHERRY,KITSILANO,12,01/04/2022,30/04/2022,49.26,-123.16
3,4,AKEBONO,YOSHINO CHERRY,MARPOLE,4,10/03/2022,31/03/2022,49.21,-123.13
4,5,,CHERRY,KITSILANO,8,,,49.27,-123.15";

    pub fn dashboard() -> Dashboard {
        let dataset = blossom_map_dataset::load_from_reader(TREES_CSV.as_bytes()).unwrap();
        let square = geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![-123.2, 49.2],
            vec![-123.0, 49.2],
            vec![-123.0, 49.3],
            vec![-123.2, 49.2],
        ]]));
        let boundaries = BoundarySet::new(["Sunset", "Kitsilano"].map(|name| NeighbourhoodBoundary {
            name: name.to_string(),
            geometry: square.clone(),
            centroid: None,
        }));
        Dashboard::new(
            Arc::new(dataset),
            Arc::new(boundaries),
            Season::default(),
            ChartOptions::default(),
        )
    }

    #[test]
    fn unset_state_keeps_every_complete_row() {
        let artifacts = dashboard().render(&FilterState::default());
        assert_eq!(artifacts.total_trees, 5);
        // Tree 5 has no bloom dates.
        assert_eq!(artifacts.filtered_trees, 4);
        assert_eq!(artifacts.map.markers.len(), 4);
        assert_eq!(artifacts.timeline.bars.len(), 2);
    }

    #[test]
    fn every_chart_sees_the_same_subset() {
        let state = FilterState {
            neighbourhoods: Selection::from_multi_select(["Sunset".to_string()]),
            ..FilterState::default()
        };
        let artifacts = dashboard().render(&state);

        assert_eq!(artifacts.filtered_trees, 2);
        assert_eq!(artifacts.map.markers.len(), 2);
        assert_eq!(artifacts.diameter.sample_size, 2);
        assert_eq!(artifacts.bar.bars.iter().map(|b| b.count).sum::<u64>(), 2);
        let sunset = artifacts
            .density
            .regions
            .iter()
            .find(|r| r.name == "Sunset")
            .unwrap();
        assert_eq!(sunset.count, 2);
    }

    #[test]
    fn empty_result_renders_empty_charts() {
        let state = FilterState {
            date_range: DateRange::new(
                NaiveDate::from_ymd_opt(2022, 7, 1),
                NaiveDate::from_ymd_opt(2022, 7, 31),
            ),
            ..FilterState::default()
        };
        let artifacts = dashboard().render(&state);

        assert_eq!(artifacts.filtered_trees, 0);
        assert!(artifacts.bar.bars.is_empty());
        assert!(artifacts.timeline.bars.is_empty());
        assert!(artifacts.diameter.points.is_empty());
        assert!(artifacts.map.markers.is_empty());
        assert!(artifacts.density.regions.iter().all(|r| r.count == 0));
    }

    #[test]
    fn options_list_the_filter_choices() {
        let options = dashboard().options();
        assert_eq!(options.neighbourhoods, vec!["Kitsilano", "Marpole", "Sunset"]);
        assert_eq!(options.cultivars, vec!["Akebono", "Kwanzan"]);
        assert_eq!(options.season, Season::default());

        let range = options.diameter_range.unwrap();
        assert!((range.min_cm - 4.0 * 2.54).abs() < 1e-9);
        assert!((range.max_cm - 12.0 * 2.54).abs() < 1e-9);
    }

    #[test]
    fn undiametered_row_is_listed_but_not_charted() {
        let csv = format!(
            "{TREES_CSV}\n5,6,SHIROTAE,MOUNT FUJI CHERRY,GRANDVIEW-WOODLAND,,01/04/2022,30/04/2022,49.27,-123.07"
        );
        let dataset = blossom_map_dataset::load_from_reader(csv.as_bytes()).unwrap();
        let dashboard = Dashboard::new(
            Arc::new(dataset),
            Arc::new(BoundarySet::default()),
            Season::default(),
            ChartOptions::default(),
        );

        let artifacts = dashboard.render(&FilterState::default());
        assert_eq!(artifacts.total_trees, 6);
        assert_eq!(artifacts.filtered_trees, 4);
        assert!(artifacts.map.markers.iter().all(|m| m.tree_id != 6));

        let options = dashboard.options();
        assert!(options.neighbourhoods.contains(&"Grandview-Woodland".to_string()));
        assert!(options.cultivars.contains(&"Shirotae".to_string()));
        let range = options.diameter_range.unwrap();
        assert!((range.min_cm - 4.0 * 2.54).abs() < 1e-9);
        assert!((range.max_cm - 12.0 * 2.54).abs() < 1e-9);
    }

    #[test]
    fn artifacts_serialize_as_camel_case() {
        let json = serde_json::to_value(dashboard().render(&FilterState::default())).unwrap();
        assert_eq!(json["filteredTrees"], 4);
        assert!(json["map"]["markerColor"].is_string());
        assert!(json["density"]["maxCount"].is_number());
    }

    #[tokio::test]
    async fn missing_trees_file_fails_to_open() {
        let mut config = DashboardConfig::embedded().unwrap();
        config.data.trees_path = "does/not/exist.csv".into();

        let err = Dashboard::open(&config).await.unwrap_err();
        assert!(matches!(err, DashboardError::Load(LoadError::Open { .. })));
    }

    #[tokio::test]
    async fn boundary_failure_opens_without_polygons() {
        let path = std::env::temp_dir().join(format!(
            "blossom_map_dashboard_trees_{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, TREES_CSV).unwrap();

        let mut config = DashboardConfig::embedded().unwrap();
        config.data.trees_path = path.clone();
        config.boundaries.fetcher =
            blossom_map_neighbourhood_models::BoundaryFetcherConfig::GeojsonFile {
                path: "does/not/exist.geojson".to_string(),
            };

        let dashboard = Dashboard::open(&config).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(dashboard.boundaries().is_empty());
        let artifacts = dashboard.render(&FilterState::default());
        assert!(artifacts.density.regions.is_empty());
        assert_eq!(artifacts.density.unmatched.len(), 3);
    }
}
