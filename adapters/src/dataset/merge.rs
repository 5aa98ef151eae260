use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use corelib::Bar;

/// Union of two bar sets trimmed to the newest `keep` rows.
///
/// Rows sharing a timestamp collapse to the last one seen, `incoming`
/// after `existing`, so a re-fetched minute replaces the stored one.
/// The result is sorted oldest first.
pub fn merge_rolling(existing: Vec<Bar>, incoming: Vec<Bar>, keep: usize) -> Vec<Bar> {
    let mut by_ts: BTreeMap<NaiveDateTime, Bar> = BTreeMap::new();

    for b in existing.into_iter().chain(incoming) {
        by_ts.insert(b.timestamp, b);
    }

    let skip = by_ts.len().saturating_sub(keep);
    by_ts.into_values().skip(skip).collect()
}
