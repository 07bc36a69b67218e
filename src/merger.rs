//! Merging discovered names into the existing whitelist.
//!
//! Existing entries keep their review state. Names found in source but not
//! yet listed are appended disabled, and the combined list is sorted by
//! name, ignoring case.

use crate::whitelist::{Entry, Whitelist};
use std::collections::HashSet;

/// Result of merging discovered names into a whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Every entry, sorted case-insensitively by name.
    pub entries: Vec<Entry>,
    /// Names that were not in the whitelist before, in the same order.
    pub added: Vec<String>,
}

/// Merges `discovered` into `existing`.
///
/// New names are always disabled; nothing is ever promoted to enabled.
/// Entries whose names compare equal ignoring case keep their input order.
pub fn merge(existing: &Whitelist, discovered: &HashSet<String>) -> Merged {
    let mut added: Vec<String> = discovered
        .iter()
        .filter(|name| !existing.contains(name))
        .cloned()
        .collect();
    sort_case_insensitive(&mut added, |name| name.as_str());

    let mut entries = existing.entries().to_vec();
    entries.extend(added.iter().cloned().map(Entry::disabled));
    sort_case_insensitive(&mut entries, |entry| entry.name.as_str());

    Merged { entries, added }
}

fn sort_case_insensitive<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| key(item).to_lowercase());
}
