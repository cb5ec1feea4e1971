//! Per-domain deduplication.

use std::collections::HashMap;

use crate::models::DomainRecord;

/// Whether `candidate` replaces `current` as the surviving record for a domain.
///
/// Later dates win. On equal dates a DGA record beats a ranking record;
/// otherwise the record seen first stays.
fn supersedes(candidate: &DomainRecord, current: &DomainRecord) -> bool {
    candidate.date > current.date || (candidate.date == current.date && candidate.dga > current.dga)
}

/// Keeps one record per domain, keeping survivors in append order.
pub fn deduplicate_records(records: Vec<DomainRecord>) -> Vec<DomainRecord> {
    let keep = {
        let mut winners: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            winners
                .entry(record.domain.as_str())
                .and_modify(|best| {
                    if supersedes(record, &records[*best]) {
                        *best = idx;
                    }
                })
                .or_insert(idx);
        }

        let mut keep = vec![false; records.len()];
        for idx in winners.into_values() {
            keep[idx] = true;
        }
        keep
    };

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, kept)| kept.then_some(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_latest_date_survives() {
        let records = vec![
            DomainRecord::dga("evil.tv", "zeus", day(1)),
            DomainRecord::ranking("example.com", day(1)),
            DomainRecord::dga("evil.tv", "tinba", day(5)),
        ];
        let deduped = deduplicate_records(records);
        assert_eq!(
            deduped,
            vec![
                DomainRecord::ranking("example.com", day(1)),
                DomainRecord::dga("evil.tv", "tinba", day(5)),
            ]
        );
    }

    #[test]
    fn test_earlier_date_later_in_order_loses() {
        let records = vec![
            DomainRecord::dga("evil.tv", "tinba", day(5)),
            DomainRecord::dga("evil.tv", "zeus", day(1)),
        ];
        assert_eq!(
            deduplicate_records(records),
            vec![DomainRecord::dga("evil.tv", "tinba", day(5))]
        );
    }

    #[test]
    fn test_tie_prefers_dga_then_first_seen() {
        let records = vec![
            DomainRecord::ranking("both.com", day(2)),
            DomainRecord::dga("both.com", "banjori", day(2)),
            DomainRecord::dga("both.com", "zeus", day(2)),
        ];
        assert_eq!(
            deduplicate_records(records),
            vec![DomainRecord::dga("both.com", "banjori", day(2))]
        );
    }

    #[test]
    fn test_unique_records_untouched() {
        let records = vec![
            DomainRecord::ranking("b.com", day(1)),
            DomainRecord::ranking("a.com", day(1)),
        ];
        assert_eq!(deduplicate_records(records.clone()), records);
        assert!(deduplicate_records(Vec::new()).is_empty());
    }
}
