//! Approval Scanner
//!
//! Drives the scan pipeline: fetch approval logs over the scan window,
//! parse and fold them into the effective approval state, confirm each
//! surviving entry against live chain reads, enrich with token and
//! spender metadata, then score and bucket the results into a report.

pub mod orchestrator;
pub mod report;

pub use orchestrator::ApprovalScanner;
pub use report::{assemble, share_card, ScanResult, ShareCard};
