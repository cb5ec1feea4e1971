//! Timing and memory figures for the processing journal.

use std::time::{Duration, Instant};

use crate::config::MB;
use crate::models::DomainRecord;

/// Converts a duration to fractional seconds.
pub fn duration_to_secs(duration: Duration) -> f64 {
    duration.as_secs_f64()
}

/// Runs `f` and returns its result together with the elapsed seconds.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, duration_to_secs(start.elapsed()))
}

/// Converts a byte count to megabytes.
pub fn bytes_to_megabytes(bytes: usize) -> f64 {
    bytes as f64 / MB
}

/// Approximate in-memory size of a record batch in megabytes.
///
/// Counts the vector's reserved slots plus each record's heap strings.
#[allow(clippy::ptr_arg)] // capacity is part of the footprint
pub fn records_megabytes(records: &Vec<DomainRecord>) -> f64 {
    let spare = records.capacity() - records.len();
    let bytes = std::mem::size_of::<Vec<DomainRecord>>()
        + spare * std::mem::size_of::<DomainRecord>()
        + records.iter().map(DomainRecord::footprint).sum::<usize>();
    bytes_to_megabytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_duration_to_secs() {
        assert_eq!(duration_to_secs(Duration::from_millis(1500)), 1.5);
    }

    #[test]
    fn test_timed_returns_value() {
        let (value, secs) = timed(|| 40 + 2);
        assert_eq!(value, 42);
        assert!(secs >= 0.0);
    }

    #[test]
    fn test_bytes_to_megabytes() {
        assert_eq!(bytes_to_megabytes(1024 * 1024), 1.0);
        assert_eq!(bytes_to_megabytes(0), 0.0);
    }

    #[test]
    fn test_records_megabytes_grows_with_batch() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let small: Vec<DomainRecord> = vec![DomainRecord::ranking("a.com", date)];
        let large: Vec<DomainRecord> = (0..1000)
            .map(|i| DomainRecord::ranking(format!("domain{}.com", i), date))
            .collect();
        assert!(records_megabytes(&large) > records_megabytes(&small));
        assert!(records_megabytes(&Vec::new()) > 0.0);
    }
}
