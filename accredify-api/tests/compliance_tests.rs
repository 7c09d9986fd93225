//! Compliance-status derivation integration tests

mod helpers;

use accredify_api::db::{self, indicators::ImportFields};
use accredify_api::models::IndicatorStatus;
use accredify_api::services::compliance::{compliance_report, recalculate_status};
use accredify_common::ScheduleType;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use helpers::{create_project, set_indicator_anchor, setup_pool};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn insert_indicator(
    pool: &SqlitePool,
    project_id: i64,
    requirement: &str,
    schedule_type: ScheduleType,
    normalized_frequency: &str,
    anchor: NaiveDate,
) -> i64 {
    let section_id = match db::sections::find_by_name(pool, project_id, "Safety").await.unwrap() {
        Some(section) => section.id,
        None => db::sections::try_insert(pool, project_id, "Safety")
            .await
            .unwrap()
            .unwrap(),
    };
    let standard_id = match db::standards::find_by_name(pool, section_id, "Fire Drills")
        .await
        .unwrap()
    {
        Some(standard) => standard.id,
        None => db::standards::try_insert(pool, section_id, "Fire Drills")
            .await
            .unwrap()
            .unwrap(),
    };

    let fields = ImportFields {
        section_id,
        standard_id,
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
    let id = db::indicators::try_insert_from_import(pool, project_id, requirement, &fields, None)
        .await
        .unwrap()
        .unwrap();
    set_indicator_anchor(pool, id, anchor).await;
    id
}

async fn log_period(pool: &SqlitePool, indicator_id: i64, start: NaiveDate, end: NaiveDate) {
    db::frequency_logs::insert_log(pool, indicator_id, start, end, None, "")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_recurring_with_no_evidence_is_not_compliant() {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic").await;
    let id = insert_indicator(
        &pool,
        project_id,
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        date(2024, 1, 1),
    )
    .await;

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    let report = compliance_report(&pool, &indicator, date(2024, 3, 15)).await.unwrap();

    assert_eq!(report.status, IndicatorStatus::NotCompliant);
    assert_eq!(report.evidence_count, 0);
    // Periods starting Jan 1, Feb 1, Mar 1
    assert_eq!(report.expected_count, 3);
    assert_eq!(report.missing_periods.len(), 3);
    assert_eq!(report.coverage_percentage, 0.0);
    // Next due falls at the current period boundary
    assert_eq!(report.next_due_date, Some(date(2024, 4, 1)));
}

#[tokio::test]
async fn test_partial_coverage_is_in_process() {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic").await;
    let id = insert_indicator(
        &pool,
        project_id,
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        date(2024, 1, 1),
    )
    .await;

    // Cover January and March, leave February missing
    log_period(&pool, id, date(2024, 1, 1), date(2024, 2, 1)).await;
    log_period(&pool, id, date(2024, 3, 1), date(2024, 4, 1)).await;

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    let report = compliance_report(&pool, &indicator, date(2024, 3, 15)).await.unwrap();

    assert_eq!(report.status, IndicatorStatus::InProcess);
    assert_eq!(report.evidence_count, 2);
    assert_eq!(report.expected_count, 3);
    assert_eq!(report.missing_periods.len(), 1);
    assert_eq!(report.missing_periods[0].start, date(2024, 2, 1));
    assert!((report.coverage_percentage - 200.0 / 3.0).abs() < 0.01);
}

#[tokio::test]
async fn test_full_coverage_is_compliant() {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic").await;
    let id = insert_indicator(
        &pool,
        project_id,
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        date(2024, 1, 1),
    )
    .await;

    log_period(&pool, id, date(2024, 1, 1), date(2024, 2, 1)).await;
    log_period(&pool, id, date(2024, 2, 1), date(2024, 3, 1)).await;

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    let report = compliance_report(&pool, &indicator, date(2024, 2, 15)).await.unwrap();

    assert_eq!(report.status, IndicatorStatus::Compliant);
    assert_eq!(report.expected_count, 2);
    assert!(report.missing_periods.is_empty());
    assert_eq!(report.coverage_percentage, 100.0);
}

#[tokio::test]
async fn test_overlapping_log_covers_expected_period() {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic").await;
    let id = insert_indicator(
        &pool,
        project_id,
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        date(2024, 1, 1),
    )
    .await;

    // A log recorded against calendar-month bounds still overlaps the
    // anchor-aligned January period
    log_period(&pool, id, date(2024, 1, 15), date(2024, 1, 20)).await;

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    let report = compliance_report(&pool, &indicator, date(2024, 1, 25)).await.unwrap();

    assert_eq!(report.status, IndicatorStatus::Compliant);
    assert_eq!(report.expected_count, 1);
    assert!(report.missing_periods.is_empty());
}

#[tokio::test]
async fn test_one_time_reflects_stored_status() {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic").await;
    let id = insert_indicator(
        &pool,
        project_id,
        "File incident report",
        ScheduleType::OneTime,
        "",
        date(2024, 1, 1),
    )
    .await;

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    let report = compliance_report(&pool, &indicator, date(2024, 6, 15)).await.unwrap();
    assert_eq!(report.status, IndicatorStatus::NotCompliant);
    assert_eq!(report.expected_count, 0);
    assert_eq!(report.coverage_percentage, 0.0);

    db::indicators::update_status(&pool, id, "compliant", None).await.unwrap();

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    let report = compliance_report(&pool, &indicator, date(2024, 6, 15)).await.unwrap();
    assert_eq!(report.status, IndicatorStatus::Compliant);
    assert_eq!(report.coverage_percentage, 100.0);
}

#[tokio::test]
async fn test_recalculation_transitions_status_with_audit_trail() {
    let pool = setup_pool().await;
    let project_id = create_project(&pool, "Clinic").await;
    let id = insert_indicator(
        &pool,
        project_id,
        "Conduct fire drill",
        ScheduleType::Recurring,
        "Monthly",
        date(2024, 1, 1),
    )
    .await;

    log_period(&pool, id, date(2024, 1, 1), date(2024, 2, 1)).await;

    // Full coverage as of January: not_compliant -> compliant
    let report = recalculate_status(&pool, id, date(2024, 1, 15)).await.unwrap();
    assert_eq!(report.status, IndicatorStatus::Compliant);

    let indicator = db::indicators::get_indicator(&pool, id).await.unwrap().unwrap();
    assert_eq!(indicator.status, "compliant");

    let history = db::status_history::list_for_indicator(&pool, id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_status, "not_compliant");
    assert_eq!(history[0].new_status, "compliant");

    // February opens uncovered: compliant -> in_process
    let report = recalculate_status(&pool, id, date(2024, 2, 15)).await.unwrap();
    assert_eq!(report.status, IndicatorStatus::InProcess);

    let history = db::status_history::list_for_indicator(&pool, id).await.unwrap();
    assert_eq!(history.len(), 2);

    // Recalculating again without change appends nothing
    let report = recalculate_status(&pool, id, date(2024, 2, 15)).await.unwrap();
    assert_eq!(report.status, IndicatorStatus::InProcess);
    let history = db::status_history::list_for_indicator(&pool, id).await.unwrap();
    assert_eq!(history.len(), 2);
}
