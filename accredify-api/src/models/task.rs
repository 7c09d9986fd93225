//! Upcoming task entries

use accredify_common::ScheduleType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A projected due item surfaced in the upcoming-tasks feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingTask {
    /// Indicator identity
    pub indicator_id: i64,
    /// Requirement text
    pub requirement: String,
    /// Section name
    pub section: String,
    /// Standard name
    pub standard: String,
    /// When the task is due
    pub due_date: NaiveDate,
    /// Whether the due date has passed
    pub is_overdue: bool,
    /// Signed days until due (negative when overdue)
    pub days_until_due: i64,
    /// Assignee (raw text; may be an unmatched name)
    pub assigned_to: String,
    /// Current compliance status
    pub status: String,
    /// One-time or recurring
    pub schedule_type: ScheduleType,
    /// Canonical frequency label, empty for one-time indicators
    pub frequency: String,
}
