//! Filter flags for one-shot rendering.

use blossom_map_filter_models::{DateRange, DiameterRange, FilterState, Selection};
use blossom_map_tree_models::{TreeId, title_case};
use chrono::NaiveDate;
use clap::Args;

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// First bloom day to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last bloom day to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Neighbourhood to include; repeat or comma-separate for several
    #[arg(long = "neighbourhood", value_delimiter = ',')]
    pub neighbourhoods: Vec<String>,
    /// Cultivar to include; repeat or comma-separate for several
    #[arg(long = "cultivar", value_delimiter = ',')]
    pub cultivars: Vec<String>,
    /// Smallest trunk diameter in centimeters
    #[arg(long, requires = "diameter_max")]
    pub diameter_min: Option<f64>,
    /// Largest trunk diameter in centimeters
    #[arg(long, requires = "diameter_min")]
    pub diameter_max: Option<f64>,
    /// Only these trees, as if picked on the map
    #[arg(long = "tree-id", value_delimiter = ',')]
    pub tree_ids: Vec<TreeId>,
}

impl FilterArgs {
    /// Names are title-cased to match the inventory.
    pub fn into_state(self) -> FilterState {
        FilterState {
            date_range: DateRange::new(self.start, self.end),
            neighbourhoods: Selection::from_multi_select(
                self.neighbourhoods.iter().map(|n| title_case(n.trim())),
            ),
            cultivars: Selection::from_multi_select(
                self.cultivars.iter().map(|c| title_case(c.trim())),
            ),
            diameter_range: self
                .diameter_min
                .zip(self.diameter_max)
                .map(|(min, max)| DiameterRange::new(min, max)),
            map_selection: if self.tree_ids.is_empty() {
                Selection::Any
            } else {
                Selection::only(self.tree_ids)
            },
        }
    }
}
