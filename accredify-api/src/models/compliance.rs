//! Compliance report for a single indicator

use accredify_common::schedule::Period;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::IndicatorStatus;

/// Derived compliance state for one indicator, used by dashboards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Derived status
    pub status: IndicatorStatus,
    /// Number of periods with a logged submission (recurring) or evidence
    /// submissions (one-time)
    pub evidence_count: usize,
    /// Number of periods expected between the anchor date and today
    /// (0 for one-time indicators)
    pub expected_count: usize,
    /// Expected periods with no covering submission, for gap visualization
    pub missing_periods: Vec<Period>,
    /// Date of the most recent submission, if any
    pub last_submitted: Option<NaiveDate>,
    /// Next due date, if applicable
    pub next_due_date: Option<NaiveDate>,
    /// Covered share of expected periods, 0-100
    pub coverage_percentage: f64,
}
