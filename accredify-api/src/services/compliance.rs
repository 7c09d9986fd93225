//! Compliance-status derivation
//!
//! Derives a dashboard-facing compliance report for a single indicator. For
//! recurring indicators, coverage is computed against the anchor-aligned
//! expected periods; a logged submission covers an expected period when the
//! two ranges overlap. One-time indicators reflect their stored status
//! directly.

use accredify_common::schedule::{expected_periods, period_containing, Period};
use accredify_common::ScheduleType;
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db::{frequency_logs, indicators, status_history};
use crate::db::indicators::Indicator;
use crate::models::{ComplianceReport, IndicatorStatus};

/// Note attached to automatic status transitions
const AUTO_RECALC_NOTE: &str = "Auto-updated from evidence compliance recalculation";

/// Derive the compliance report for an indicator as of `today`
pub async fn compliance_report(
    pool: &SqlitePool,
    indicator: &Indicator,
    today: NaiveDate,
) -> Result<ComplianceReport> {
    let stored_status =
        IndicatorStatus::parse(&indicator.status).unwrap_or(IndicatorStatus::NotCompliant);

    // Recurring without a canonical frequency degrades to one-time semantics
    // for reporting purposes.
    let frequency = match (indicator.schedule_type(), indicator.normalized_frequency()) {
        (ScheduleType::Recurring, Some(freq)) => Some(freq),
        _ => None,
    };

    let logged = frequency_logs::logged_periods(pool, indicator.id).await?;
    let last_submitted = frequency_logs::last_submitted_at(pool, indicator.id)
        .await?
        .map(|ts| ts.date_naive());

    let Some(frequency) = frequency else {
        return Ok(ComplianceReport {
            status: stored_status,
            evidence_count: logged.len(),
            expected_count: 0,
            missing_periods: Vec::new(),
            last_submitted,
            next_due_date: indicator.next_due_date,
            coverage_percentage: if stored_status == IndicatorStatus::Compliant {
                100.0
            } else {
                0.0
            },
        });
    };
    let anchor = indicator.anchor_date();
    let expected = expected_periods(anchor, today, frequency);

    let missing: Vec<Period> = expected
        .iter()
        .filter(|period| !logged.iter().any(|&(start, end)| period.overlaps(start, end)))
        .copied()
        .collect();

    let covered = expected.len() - missing.len();
    let status = if missing.is_empty() {
        IndicatorStatus::Compliant
    } else if covered > 0 {
        IndicatorStatus::InProcess
    } else {
        IndicatorStatus::NotCompliant
    };

    let next_due = indicator
        .next_due_date
        .unwrap_or_else(|| period_containing(anchor, today, frequency).end);

    let coverage_percentage = if expected.is_empty() {
        0.0
    } else {
        covered as f64 / expected.len() as f64 * 100.0
    };

    Ok(ComplianceReport {
        status,
        evidence_count: logged.len(),
        expected_count: expected.len(),
        missing_periods: missing,
        last_submitted,
        next_due_date: Some(next_due),
        coverage_percentage,
    })
}

/// Recalculate an indicator's compliance and persist a status transition
/// (with an audit-trail entry) when the derived status differs
pub async fn recalculate_status(
    pool: &SqlitePool,
    indicator_id: i64,
    today: NaiveDate,
) -> Result<ComplianceReport> {
    let indicator = indicators::get_indicator(pool, indicator_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Indicator {} not found", indicator_id))?;

    let report = compliance_report(pool, &indicator, today).await?;

    // One-time indicators reflect their stored status, so only recurring
    // indicators ever transition here.
    if indicator.schedule_type() == ScheduleType::Recurring
        && report.status.as_str() != indicator.status
    {
        status_history::append_entry(
            pool,
            indicator_id,
            &indicator.status,
            report.status.as_str(),
            None,
            AUTO_RECALC_NOTE,
        )
        .await?;
        indicators::update_status(pool, indicator_id, report.status.as_str(), None).await?;
        tracing::debug!(
            indicator_id,
            old = %indicator.status,
            new = %report.status.as_str(),
            "Indicator status recalculated"
        );
    }

    Ok(report)
}
