//! Upcoming-tasks feed integration tests
//!
//! Indicators are inserted directly through the db layer so the tests control
//! anchors and due dates exactly, then the feed is asserted against fixed
//! reference dates.

mod helpers;

use accredify_api::db::{self, indicators::ImportFields};
use accredify_api::services::task_feed::{upcoming_tasks, DEFAULT_LOOKAHEAD_DAYS};
use accredify_common::ScheduleType;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use helpers::{create_project, set_indicator_anchor, setup_pool};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    pool: SqlitePool,
    project_id: i64,
    section_id: i64,
    standard_id: i64,
}

async fn fixture() -> Fixture {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic Accreditation").await;
    let section_id = db::sections::try_insert(&pool, project_id, "Safety")
        .await
        .unwrap()
        .unwrap();
    let standard_id = db::standards::try_insert(&pool, section_id, "Fire Drills")
        .await
        .unwrap()
        .unwrap();
    Fixture {
        pool,
        project_id,
        section_id,
        standard_id,
    }
}

impl Fixture {
    /// Insert an indicator with a controlled anchor date
    async fn insert_indicator(
        &self,
        requirement: &str,
        schedule_type: ScheduleType,
        normalized_frequency: &str,
        next_due_date: Option<NaiveDate>,
        anchor: NaiveDate,
    ) -> i64 {
        let fields = ImportFields {
            section_id: self.section_id,
            standard_id: self.standard_id,
            requirement: requirement.to_string(),
            evidence_required: String::new(),
            responsible_person: String::new(),
            frequency: normalized_frequency.to_string(),
            schedule_type,
            normalized_frequency: normalized_frequency.to_string(),
            assigned_to: String::new(),
            assigned_user_id: None,
            compliance_notes: String::new(),
            score: 10,
            ai_confidence_score: None,
        };
        let id = db::indicators::try_insert_from_import(
            &self.pool,
            self.project_id,
            requirement,
            &fields,
            next_due_date,
        )
        .await
        .unwrap()
        .unwrap();
        set_indicator_anchor(&self.pool, id, anchor).await;
        id
    }
}

#[tokio::test]
async fn test_recurring_hidden_while_period_logged() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);
    let id = fx
        .insert_indicator("Conduct fire drill", ScheduleType::Recurring, "Monthly", None, date(2024, 6, 1))
        .await;

    // No submission yet: due at the current period boundary
    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].indicator_id, id);
    assert_eq!(tasks[0].due_date, date(2024, 7, 1));
    assert!(!tasks[0].is_overdue);
    assert_eq!(tasks[0].days_until_due, 16);
    assert_eq!(tasks[0].section, "Safety");
    assert_eq!(tasks[0].standard, "Fire Drills");

    // Log a submission for the current period [Jun 1, Jul 1)
    db::frequency_logs::insert_log(&fx.pool, id, date(2024, 6, 1), date(2024, 7, 1), None, "")
        .await
        .unwrap();

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert!(tasks.is_empty());

    // The period rolls over and the indicator reappears
    let next_month = date(2024, 7, 10);
    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, next_month)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].due_date, date(2024, 8, 1));
}

#[tokio::test]
async fn test_partial_period_log_does_not_hide() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);
    let id = fx
        .insert_indicator("Conduct fire drill", ScheduleType::Recurring, "Monthly", None, date(2024, 6, 1))
        .await;

    // A log for a different period does not cover the current one
    db::frequency_logs::insert_log(&fx.pool, id, date(2024, 5, 1), date(2024, 6, 1), None, "")
        .await
        .unwrap();

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn test_overdue_items_lead_the_feed() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);

    fx.insert_indicator(
        "File incident report",
        ScheduleType::OneTime,
        "",
        Some(date(2024, 6, 1)),
        date(2024, 5, 1),
    )
    .await;
    fx.insert_indicator(
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        None,
        date(2024, 6, 1),
    )
    .await;

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 2);

    // Ascending due dates: the overdue one-time item comes first
    assert_eq!(tasks[0].requirement, "File incident report");
    assert!(tasks[0].is_overdue);
    assert_eq!(tasks[0].days_until_due, -14);
    assert_eq!(tasks[1].requirement, "Conduct fire drill");
    assert!(!tasks[1].is_overdue);
}

#[tokio::test]
async fn test_lookahead_window_bounds_the_feed() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);

    // Quarterly period [Jun 1, Sep 1) puts the due date past a 30-day window
    fx.insert_indicator(
        "Quarterly compliance audit",
        ScheduleType::Recurring,
        "Quarterly",
        None,
        date(2024, 6, 1),
    )
    .await;

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, 30, today).await.unwrap();
    assert!(tasks.is_empty());

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, 90, today).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].due_date, date(2024, 9, 1));
}

#[tokio::test]
async fn test_explicit_due_date_takes_precedence() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);

    fx.insert_indicator(
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        Some(date(2024, 6, 20)),
        date(2024, 6, 1),
    )
    .await;

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].due_date, date(2024, 6, 20));
}

#[tokio::test]
async fn test_compliant_one_time_excluded() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);

    let id = fx
        .insert_indicator(
            "File incident report",
            ScheduleType::OneTime,
            "",
            None,
            date(2024, 6, 1),
        )
        .await;

    // Included while open (due falls back to the anchor, so it is overdue)
    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].is_overdue);
    assert_eq!(tasks[0].due_date, date(2024, 6, 1));

    db::indicators::update_status(&fx.pool, id, "compliant", None).await.unwrap();

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_inactive_indicators_excluded() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);

    let id = fx
        .insert_indicator(
            "Conduct fire drill",
            ScheduleType::Recurring,
            "Monthly",
            None,
            date(2024, 6, 1),
        )
        .await;

    db::indicators::set_active(&fx.pool, id, false).await.unwrap();

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_recurring_without_canonical_frequency_treated_as_one_time() {
    let fx = fixture().await;
    let today = date(2024, 6, 15);

    // Low-confidence numeric frequency: recurring but unnormalizable
    fx.insert_indicator(
        "Rotate backup tapes",
        ScheduleType::Recurring,
        "",
        Some(date(2024, 6, 25)),
        date(2024, 6, 1),
    )
    .await;

    let tasks = upcoming_tasks(&fx.pool, fx.project_id, DEFAULT_LOOKAHEAD_DAYS, today)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].due_date, date(2024, 6, 25));
    assert_eq!(tasks[0].frequency, "");
}
