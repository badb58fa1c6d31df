//! "Newest first" ordering for report lists.
//!
//! Edited reports sort ahead of unedited ones. Inside each group the key is the
//! last edit time for edited reports and the creation time otherwise, descending.

use crate::features::reports::models::Report;

/// SQL equivalent of [`sort_newest_first`] for paginated queries
pub const NEWEST_FIRST_ORDER_SQL: &str =
    "ORDER BY is_edited DESC, COALESCE(edited_at, created_at) DESC, id";

/// Stable in-place sort; reports with equal keys keep their input order
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        b.is_edited
            .cmp(&a.is_edited)
            .then_with(|| b.sort_timestamp().cmp(&a.sort_timestamp()))
    });
}
