//! Upcoming-tasks feed assembly
//!
//! Combines one-time and recurring indicators with their logged submissions
//! into a sorted task list for a project. Recurring indicators drop out of
//! the feed while a frequency log covers the current anchor-aligned period
//! and reappear when the period rolls over.

use accredify_common::schedule::{days_until_due, is_overdue, period_containing};
use accredify_common::ScheduleType;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

use crate::db::{frequency_logs, indicators};
use crate::models::UpcomingTask;

/// Default look-ahead window in days
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;

/// Assemble the upcoming-tasks feed for a project.
///
/// Items due within `today + lookahead_days` are included; overdue items are
/// always included regardless of the window. Sorted by due date ascending, so
/// overdue items lead the list, most overdue first.
pub async fn upcoming_tasks(
    pool: &SqlitePool,
    project_id: i64,
    lookahead_days: i64,
    today: NaiveDate,
) -> Result<Vec<UpcomingTask>> {
    let window_end = today + Duration::days(lookahead_days);
    let active = indicators::list_active_with_names(pool, project_id).await?;

    let mut tasks = Vec::new();

    for indicator in active {
        let schedule_type = indicator.schedule_type();

        let due_date = match (schedule_type, indicator.normalized_frequency()) {
            (ScheduleType::Recurring, Some(frequency)) => {
                let period = period_containing(indicator.anchor_date(), today, frequency);
                let covered =
                    frequency_logs::exists_for_period(pool, indicator.id, period.start, period.end)
                        .await?;
                if covered {
                    // A submission already covers the active period
                    continue;
                }
                // An explicitly set due date takes precedence over the
                // period boundary
                indicator.next_due_date.unwrap_or(period.end)
            }
            _ => {
                // One-time (or recurring without a canonical frequency):
                // include until marked compliant
                if indicator.status == "compliant" {
                    continue;
                }
                indicator.next_due_date.unwrap_or_else(|| indicator.anchor_date())
            }
        };

        let overdue = is_overdue(due_date, today);
        if !overdue && due_date > window_end {
            continue;
        }

        tasks.push(UpcomingTask {
            indicator_id: indicator.id,
            requirement: indicator.requirement.clone(),
            section: indicator.section_name.clone(),
            standard: indicator.standard_name.clone(),
            due_date,
            is_overdue: overdue,
            days_until_due: days_until_due(due_date, today),
            assigned_to: indicator.assigned_to.clone(),
            status: indicator.status.clone(),
            schedule_type,
            frequency: indicator.normalized_frequency.clone(),
        });
    }

    // Ascending due dates put overdue items first, earliest due leading
    tasks.sort_by_key(|task| (task.due_date, task.indicator_id));

    Ok(tasks)
}
