//! Level-based filtering of the visible history.

use std::collections::HashSet;

use super::log::{LogEntry, LogLevel};

/// Entries whose level is in `selection`, in their original order.
///
/// An empty selection means no filter: all levels are visible.
pub fn filter_by_level(entries: &[LogEntry], selection: &HashSet<LogLevel>) -> Vec<LogEntry> {
    if selection.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| selection.contains(&entry.level))
        .cloned()
        .collect()
}
