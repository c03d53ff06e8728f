//! Cell parsing helpers for the inventory columns.

use blossom_map_tree_models::TreeId;
use chrono::NaiveDate;

/// Day-first format of the bloom period columns.
pub const BLOOM_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a `DD/MM/YYYY` bloom date.
///
/// # Errors
///
/// Returns the `chrono` parse error if the text is not a valid day-first
/// date.
pub fn parse_bloom_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, BLOOM_DATE_FORMAT)
}

/// Parses a tree ID. Accepts integral floats (`"12345.0"`) since the
/// preprocessing step sometimes writes IDs through a float column.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_tree_id(s: &str) -> Option<TreeId> {
    if let Ok(id) = s.parse::<TreeId>() {
        return Some(id);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then(|| f as TreeId)
}
