//! Malware family aggregation.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::models::{DomainRecord, MalwareFamilyCount};

/// Counts distinct domains per malware label.
///
/// Ordered by count descending, then label ascending.
pub fn malware_family_counts(records: &[DomainRecord]) -> Vec<MalwareFamilyCount> {
    let mut by_label: HashMap<&str, HashSet<&str>> = HashMap::new();
    for record in records {
        by_label
            .entry(record.malware.as_str())
            .or_default()
            .insert(record.domain.as_str());
    }

    let mut counts: Vec<MalwareFamilyCount> = by_label
        .into_iter()
        .map(|(label, domains)| MalwareFamilyCount {
            label: label.to_string(),
            domains: domains.len(),
        })
        .collect();
    counts.sort_by(|a, b| {
        (Reverse(a.domains), &a.label).cmp(&(Reverse(b.domains), &b.label))
    });
    counts
}
