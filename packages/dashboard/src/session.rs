//! Per-user filter state and the recompute loop.

use std::sync::Arc;

use blossom_map_chart_models::ChartArtifacts;
use blossom_map_filter_models::{DateRange, DiameterRange, FilterState, MapSelection, Selection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Dashboard, DashboardError};

/// A change to one filter input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterEvent {
    /// Either date picker changed. An absent end is unset.
    SetDateRange {
        #[serde(default)]
        start: Option<NaiveDate>,
        #[serde(default)]
        end: Option<NaiveDate>,
    },
    /// The neighbourhood multi-select changed. No values means all.
    SetNeighbourhoods {
        #[serde(default)]
        values: Vec<String>,
    },
    /// The cultivar multi-select changed. No values means all.
    SetCultivars {
        #[serde(default)]
        values: Vec<String>,
    },
    /// The diameter slider moved, in centimeters.
    SetDiameterRange {
        #[serde(default)]
        range: Option<DiameterRange>,
    },
    /// Points were picked on the map. No points selects nothing.
    SelectOnMap(MapSelection),
    /// The map selection was cleared.
    ClearMapSelection,
    /// Every filter back to unset.
    Reset,
}

impl FilterEvent {
    /// Applies this event to `state`.
    pub fn apply(self, state: &mut FilterState) {
        match self {
            Self::SetDateRange { start, end } => state.date_range = DateRange::new(start, end),
            Self::SetNeighbourhoods { values } => {
                state.neighbourhoods = Selection::from_multi_select(values);
            }
            Self::SetCultivars { values } => {
                state.cultivars = Selection::from_multi_select(values);
            }
            Self::SetDiameterRange { range } => state.diameter_range = range,
            Self::SelectOnMap(selection) => state.map_selection = selection.into(),
            Self::ClearMapSelection => state.map_selection = Selection::Any,
            Self::Reset => *state = FilterState::default(),
        }
    }
}

/// One user's view of the dashboard.
///
/// Every event replaces the whole artifact bundle; charts are never
/// updated one at a time.
#[derive(Debug)]
pub struct Session {
    dashboard: Dashboard,
    state: FilterState,
    generation: u64,
    latest: Option<Arc<ChartArtifacts>>,
}

impl Session {
    #[must_use]
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            state: FilterState::default(),
            generation: 0,
            latest: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// The most recently published bundle.
    #[must_use]
    pub const fn latest(&self) -> Option<&Arc<ChartArtifacts>> {
        self.latest.as_ref()
    }

    /// Renders the current state and publishes the bundle.
    pub fn refresh(&mut self) -> Arc<ChartArtifacts> {
        self.generation += 1;

        let mut artifacts = self.dashboard.render(&self.state);
        artifacts.generation = self.generation;
        log::debug!(
            "Generation {}: {} of {} trees",
            self.generation,
            artifacts.filtered_trees,
            artifacts.total_trees
        );

        let artifacts = Arc::new(artifacts);
        self.latest = Some(Arc::clone(&artifacts));
        artifacts
    }

    /// Applies an input event and re-renders.
    pub fn handle(&mut self, event: FilterEvent) -> Arc<ChartArtifacts> {
        event.apply(&mut self.state);
        self.refresh()
    }

    /// Decodes one JSON event and handles it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Json`] if `line` is not a valid event. The
    /// state is left unchanged.
    pub fn handle_json(&mut self, line: &str) -> Result<Arc<ChartArtifacts>, DashboardError> {
        let event: FilterEvent = serde_json::from_str(line)?;
        Ok(self.handle(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dashboard;
    use blossom_map_filter_models::SelectedPoint;

    fn marker_ids(artifacts: &ChartArtifacts) -> Vec<u64> {
        artifacts.map.markers.iter().map(|m| m.tree_id).collect()
    }

    #[test]
    fn generations_increase_and_latest_is_published() {
        let mut session = dashboard().session();
        assert!(session.latest().is_none());

        let first = session.refresh();
        let second = session.handle(FilterEvent::Reset);

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert!(Arc::ptr_eq(session.latest().unwrap(), &second));
    }

    #[test]
    fn map_selection_intersects_with_neighbourhood() {
        let mut session = dashboard().session();
        session.handle(FilterEvent::SelectOnMap(MapSelection {
            points: Some(vec![
                SelectedPoint { tree_id: 1 },
                SelectedPoint { tree_id: 3 },
            ]),
        }));
        let artifacts = session.handle(FilterEvent::SetNeighbourhoods {
            values: vec!["Sunset".to_string()],
        });

        assert_eq!(marker_ids(&artifacts), vec![1]);
    }

    #[test]
    fn empty_map_selection_selects_nothing_until_cleared() {
        let mut session = dashboard().session();
        let artifacts = session.handle(FilterEvent::SelectOnMap(MapSelection { points: None }));
        assert_eq!(artifacts.filtered_trees, 0);

        let artifacts = session.handle(FilterEvent::ClearMapSelection);
        assert_eq!(artifacts.filtered_trees, 4);
    }

    #[test]
    fn clearing_a_multi_select_removes_the_restriction() {
        let mut session = dashboard().session();
        session.handle(FilterEvent::SetCultivars {
            values: vec!["Akebono".to_string()],
        });
        assert_eq!(session.latest().unwrap().filtered_trees, 2);

        let artifacts = session.handle(FilterEvent::SetCultivars { values: vec![] });
        assert_eq!(artifacts.filtered_trees, 4);
    }

    #[test]
    fn date_and_diameter_events_narrow_the_subset() {
        let mut session = dashboard().session();
        session.handle(FilterEvent::SetDateRange {
            start: NaiveDate::from_ymd_opt(2022, 4, 5),
            end: None,
        });
        assert_eq!(marker_ids(session.latest().unwrap()), vec![1, 3]);

        // 10 in is 25.4 cm, 12 in is 30.48 cm.
        let artifacts = session.handle(FilterEvent::SetDiameterRange {
            range: Some(DiameterRange::new(20.0, 26.0)),
        });
        assert_eq!(marker_ids(&artifacts), vec![1]);
    }

    #[test]
    fn reset_restores_the_unset_state() {
        let mut session = dashboard().session();
        session.handle(FilterEvent::SetNeighbourhoods {
            values: vec!["Marpole".to_string()],
        });
        let artifacts = session.handle(FilterEvent::Reset);

        assert_eq!(session.state(), &FilterState::default());
        assert_eq!(artifacts.filtered_trees, 4);
    }

    #[test]
    fn decodes_json_events() {
        let mut session = dashboard().session();
        let artifacts = session
            .handle_json(r#"{"type":"set_neighbourhoods","values":["Kitsilano"]}"#)
            .unwrap();
        assert_eq!(marker_ids(&artifacts), vec![3]);

        let artifacts = session
            .handle_json(r#"{"type":"select_on_map","points":[{"treeId":2}]}"#)
            .unwrap();
        assert_eq!(artifacts.filtered_trees, 0);

        let artifacts = session.handle_json(r#"{"type":"reset"}"#).unwrap();
        assert_eq!(artifacts.filtered_trees, 4);
    }

    #[test]
    fn bad_json_leaves_state_unchanged() {
        let mut session = dashboard().session();
        session.handle(FilterEvent::SetCultivars {
            values: vec!["Kwanzan".to_string()],
        });
        let before = session.state().clone();

        let err = session.handle_json(r#"{"type":"paint_it_black"}"#).unwrap_err();
        assert!(matches!(err, DashboardError::Json(_)));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn sessions_are_independent() {
        let dashboard = dashboard();
        let mut a = dashboard.session();
        let mut b = dashboard.session();

        a.handle(FilterEvent::SetNeighbourhoods {
            values: vec!["Sunset".to_string()],
        });
        let artifacts = b.refresh();

        assert_eq!(artifacts.filtered_trees, 4);
        assert_eq!(a.latest().unwrap().filtered_trees, 2);
    }

    #[test]
    fn sessions_render_in_parallel() {
        let dashboard = dashboard();
        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = ["Sunset", "Kitsilano", "Marpole"]
                .into_iter()
                .map(|name| {
                    let mut session = dashboard.session();
                    scope.spawn(move || {
                        session
                            .handle(FilterEvent::SetNeighbourhoods {
                                values: vec![name.to_string()],
                            })
                            .filtered_trees
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(counts, vec![2, 1, 1]);
    }
}
