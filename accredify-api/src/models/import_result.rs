//! Import operation results and row-level errors

use serde::{Deserialize, Serialize};

/// A skipped row with its 1-based row number and reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based row number in the uploaded file (header = row 1)
    pub row: usize,
    /// Human-readable error message
    pub error: String,
}

/// Import completion summary
///
/// Row-level failures land in `errors` without aborting the import;
/// `unmatched_users` is informational (raw assignee text that matched no
/// account), not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Sections created during this import
    pub sections_created: usize,
    /// Standards created during this import
    pub standards_created: usize,
    /// Indicators newly created
    pub indicators_created: usize,
    /// Indicators updated in place via their idempotency key
    pub indicators_updated: usize,
    /// Rows skipped due to row-level errors
    pub rows_skipped: usize,
    /// Total rows processed (created + updated + skipped)
    pub total_rows_processed: usize,
    /// Row-level errors, in input order
    pub errors: Vec<RowError>,
    /// Assignee strings that matched no user account (deduplicated)
    pub unmatched_users: Vec<String>,
}

impl ImportSummary {
    /// Record a skipped row
    pub fn record_skip(&mut self, row: usize, error: String) {
        self.rows_skipped += 1;
        self.errors.push(RowError { row, error });
    }

    /// Record an assignee string that matched no account, deduplicating while
    /// preserving first-seen order
    pub fn record_unmatched_user(&mut self, assigned_to: &str) {
        if !self.unmatched_users.iter().any(|u| u == assigned_to) {
            self.unmatched_users.push(assigned_to.to_string());
        }
    }

    /// Finalize the aggregate row count
    pub fn finalize(&mut self) {
        self.total_rows_processed =
            self.indicators_created + self.indicators_updated + self.rows_skipped;
    }
}
