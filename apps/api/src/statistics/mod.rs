// Reporting: SQL aggregates per report, then pure post-processing
// (zero-filled distributions, guarded ratios, ascending trends).

pub mod aggregates;
pub mod handlers;
pub mod keywords;
pub mod period;
pub mod reports;
pub mod reviews;
