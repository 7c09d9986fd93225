//! Period and due-date calendar arithmetic
//!
//! Pure functions over `NaiveDate`. Month-based frequencies use true calendar
//! months with end-of-month clamping (Jan 31 + 1 month = Feb 28/29) so that
//! monthly, quarterly, semi-annual and annual indicators stay aligned to
//! calendar boundaries instead of drifting by naive day addition.
//!
//! Periods are half-open `[start, end)` buckets anchored at the indicator's
//! creation date, not at a calendar epoch, so different indicators do not all
//! reset on the same boundary.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;

/// A half-open compliance period `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Whether this period overlaps the half-open range `[start, end)`
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && start < self.end
    }
}

/// Number of days in the given month
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always valid");
    first_of_next.pred_opt().expect("day before a month start exists").day()
}

/// Add calendar months, clamping the day-of-month to the last valid day of
/// the target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is valid for target month")
}

/// Compute the next due date one frequency interval after the anchor date
pub fn next_due_date(anchor: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => anchor + Duration::days(1),
        Frequency::Weekly => anchor + Duration::days(7),
        Frequency::BiWeekly => anchor + Duration::days(14),
        Frequency::Monthly => add_months_clamped(anchor, 1),
        Frequency::Quarterly => add_months_clamped(anchor, 3),
        Frequency::SemiAnnually => add_months_clamped(anchor, 6),
        Frequency::Annual => add_months_clamped(anchor, 12),
    }
}

/// Find the half-open period containing `reference`, walking frequency-sized
/// buckets forward from `anchor`.
///
/// When `reference` precedes the anchor the first bucket is returned.
pub fn period_containing(anchor: NaiveDate, reference: NaiveDate, frequency: Frequency) -> Period {
    let mut start = anchor;
    loop {
        let end = next_due_date(start, frequency);
        if reference < end {
            return Period { start, end };
        }
        start = end;
    }
}

/// All periods whose start falls on or before `through`, beginning at the
/// anchor bucket. Supports missing-period reporting.
pub fn expected_periods(anchor: NaiveDate, through: NaiveDate, frequency: Frequency) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut start = anchor;
    while start <= through {
        let end = next_due_date(start, frequency);
        periods.push(Period { start, end });
        start = end;
    }
    periods
}

/// Whether the due date has passed
pub fn is_overdue(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date < today
}

/// Signed days until the due date (negative when overdue)
pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_end_of_month_clamping() {
        // Leap year February
        assert_eq!(
            next_due_date(date(2024, 1, 31), Frequency::Monthly),
            date(2024, 2, 29)
        );
        // Fresh anchor at end of March keeps the 31st
        assert_eq!(
            next_due_date(date(2024, 2, 29), Frequency::Monthly),
            date(2024, 3, 29)
        );
        assert_eq!(
            next_due_date(date(2024, 3, 31), Frequency::Monthly),
            date(2024, 4, 30)
        );
    }

    #[test]
    fn test_non_leap_february_clamping() {
        assert_eq!(
            next_due_date(date(2023, 1, 31), Frequency::Monthly),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn test_annual_from_leap_day() {
        assert_eq!(
            next_due_date(date(2024, 2, 29), Frequency::Annual),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_quarterly_crosses_year_boundary() {
        assert_eq!(
            next_due_date(date(2024, 11, 30), Frequency::Quarterly),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_fixed_interval_frequencies() {
        assert_eq!(next_due_date(date(2024, 6, 1), Frequency::Daily), date(2024, 6, 2));
        assert_eq!(next_due_date(date(2024, 6, 1), Frequency::Weekly), date(2024, 6, 8));
        assert_eq!(next_due_date(date(2024, 6, 1), Frequency::BiWeekly), date(2024, 6, 15));
        assert_eq!(
            next_due_date(date(2024, 6, 1), Frequency::SemiAnnually),
            date(2024, 12, 1)
        );
    }

    #[test]
    fn test_period_containing_is_anchor_aligned() {
        // Anchored mid-month, the monthly bucket runs the 15th to the 15th,
        // not calendar month boundaries.
        let anchor = date(2024, 1, 15);
        let period = period_containing(anchor, date(2024, 3, 20), Frequency::Monthly);
        assert_eq!(period.start, date(2024, 3, 15));
        assert_eq!(period.end, date(2024, 4, 15));
    }

    #[test]
    fn test_period_containing_first_bucket() {
        let anchor = date(2024, 5, 1);
        let period = period_containing(anchor, date(2024, 5, 1), Frequency::Quarterly);
        assert_eq!(period.start, anchor);
        assert_eq!(period.end, date(2024, 8, 1));
    }

    #[test]
    fn test_period_end_is_exclusive() {
        let anchor = date(2024, 5, 1);
        // Reference exactly at the bucket boundary belongs to the next bucket
        let period = period_containing(anchor, date(2024, 8, 1), Frequency::Quarterly);
        assert_eq!(period.start, date(2024, 8, 1));
        assert_eq!(period.end, date(2024, 11, 1));
    }

    #[test]
    fn test_expected_periods_counts() {
        let anchor = date(2024, 1, 1);
        let periods = expected_periods(anchor, date(2024, 4, 10), Frequency::Monthly);
        // Buckets starting Jan 1, Feb 1, Mar 1, Apr 1
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].start, date(2024, 1, 1));
        assert_eq!(periods[3].start, date(2024, 4, 1));
        assert_eq!(periods[3].end, date(2024, 5, 1));
    }

    #[test]
    fn test_overdue_boundary() {
        let today = date(2024, 6, 15);
        assert!(is_overdue(date(2024, 6, 14), today));
        assert!(!is_overdue(today, today));
        assert!(!is_overdue(date(2024, 6, 16), today));
    }

    #[test]
    fn test_days_until_due_signed() {
        let today = date(2024, 6, 15);
        assert_eq!(days_until_due(date(2024, 6, 20), today), 5);
        assert_eq!(days_until_due(date(2024, 6, 10), today), -5);
        assert_eq!(days_until_due(today, today), 0);
    }

    #[test]
    fn test_period_overlap() {
        let period = Period { start: date(2024, 1, 1), end: date(2024, 2, 1) };
        assert!(period.overlaps(date(2024, 1, 20), date(2024, 2, 20)));
        assert!(!period.overlaps(date(2024, 2, 1), date(2024, 3, 1)));
    }
}
