//! Descriptive attribute lookup and staleness

use crate::config::DedupPolicy;
use crate::types::{Descriptor, Opportunity};
use chrono::{Duration, NaiveDateTime};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Build contact → descriptor, keeping one descriptor per contact.
///
/// Records with a blank contact name are ignored.
pub fn build_descriptors(
    records: &[Opportunity],
    policy: DedupPolicy,
) -> HashMap<String, Descriptor> {
    let mut lookup: HashMap<String, Descriptor> = HashMap::new();

    for record in records.iter().filter(|r| !r.contact.is_empty()) {
        let candidate = Descriptor {
            milestone: record.milestone.clone(),
            owner: record.owner.clone(),
            updated: record.updated,
            status: record.status.clone(),
        };

        match lookup.entry(record.contact.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if policy == DedupPolicy::LatestUpdated
                    && is_newer(candidate.updated, slot.get().updated)
                {
                    slot.insert(candidate);
                }
            }
        }
    }

    lookup
}

/// Strictly newer; a missing timestamp is older than any present one
fn is_newer(candidate: Option<NaiveDateTime>, current: Option<NaiveDateTime>) -> bool {
    match (candidate, current) {
        (Some(c), Some(k)) => c > k,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// True when `updated` is strictly before `now - stale_after_days`.
///
/// A missing timestamp is always stale.
pub fn is_stale(updated: Option<NaiveDateTime>, now: NaiveDateTime, stale_after_days: i64) -> bool {
    match updated {
        Some(ts) => ts < now - Duration::days(stale_after_days),
        None => true,
    }
}
