//! Data models for accredify-api

pub mod compliance;
pub mod import_result;
pub mod import_row;
pub mod status;
pub mod task;

pub use compliance::ComplianceReport;
pub use import_result::{ImportSummary, RowError};
pub use import_row::IndicatorRow;
pub use status::IndicatorStatus;
pub use task::UpcomingTask;
