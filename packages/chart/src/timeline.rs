//! Bloom timeline.

use std::collections::BTreeMap;

use blossom_map_chart_models::{AxisTick, TimeAxis, Timeline, TimelineBar};
use blossom_map_filter_models::Season;
use blossom_map_tree_models::TreeView;
use chrono::{Datelike as _, Months, NaiveDate};

/// One bar per cultivar spanning its bloom period.
///
/// A cultivar's bar runs from the earliest start to the latest end among
/// its rows. Rows without a cultivar or either bloom date are skipped.
/// Bars are ordered by start date, then name.
#[must_use]
pub fn bloom_timeline(view: &TreeView<'_>, season: &Season) -> Timeline {
    let mut spans: BTreeMap<&str, (NaiveDate, NaiveDate)> = BTreeMap::new();

    for tree in view.iter() {
        let (Some(cultivar), Some((start, end))) =
            (tree.cultivar_name.as_deref(), tree.bloom_interval())
        else {
            continue;
        };

        spans
            .entry(cultivar)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(start);
                *hi = (*hi).max(end);
            })
            .or_insert((start, end));
    }

    let mut bars: Vec<TimelineBar> = spans
        .into_iter()
        .map(|(cultivar, (start, end))| TimelineBar {
            cultivar: cultivar.to_string(),
            start,
            end,
        })
        .collect();
    bars.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.cultivar.cmp(&b.cultivar)));

    Timeline {
        axis: season_axis(season),
        bars,
    }
}

/// The timeline axis for a season.
///
/// Runs from the first day of the season's start month to the last day of
/// its end month, with a tick at the end of every month.
#[must_use]
pub fn season_axis(season: &Season) -> TimeAxis {
    let start = first_of_month(season.start);
    let end = last_of_month(season.end);

    let mut ticks = Vec::new();
    let mut month = start;
    while month <= end {
        let tick = last_of_month(month);
        ticks.push(AxisTick {
            date: tick,
            label: tick.format("%b").to_string(),
        });
        let Some(next) = month.checked_add_months(Months::new(1)) else {
            break;
        };
        month = next;
    }

    TimeAxis { start, end, ticks }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}
