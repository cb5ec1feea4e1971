//! Pipeline orchestration.
//!
//! Two independently invocable pipelines:
//! - daily: fetch → extract → datestamp → archive, over the download directory
//! - merge: stage → parse → merge → dedup → count → write, over the processing directory
//!
//! Both run strictly sequentially and stop at the first fatal error.

mod daily;
mod merge;

pub use daily::{run_daily, run_daily_for_date, DailyReport};
pub use merge::{run_merge, run_merge_for_date, MergeReport};
