use std::cmp::Reverse;

use crate::models::HistoryEntry;

/// Upserts `entry` into `history` by calendar day and returns the log newest first.
///
/// An existing entry for the same day is overwritten in place; otherwise the
/// entry is appended. The result never holds two entries for one day.
pub fn merge(mut history: Vec<HistoryEntry>, entry: HistoryEntry) -> Vec<HistoryEntry> {
    match history.iter().position(|e| e.start_date == entry.start_date) {
        Some(i) => history[i] = entry,
        None => history.push(entry),
    }

    history.sort_by_key(|e| Reverse(e.start_date));
    history
}
