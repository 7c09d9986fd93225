//! Indicator database operations
//!
//! Indicators are the atomic compliance requirements. The `indicator_key`
//! column carries the deterministic idempotency key; imports upsert through
//! it so re-uploading a checklist never duplicates rows.

use accredify_common::{Frequency, ScheduleType};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Sqlite};

/// Indicator record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Indicator {
    pub id: i64,
    pub project_id: i64,
    pub section_id: Option<i64>,
    pub standard_id: Option<i64>,
    pub requirement: String,
    pub evidence_required: String,
    pub responsible_person: String,
    pub frequency: String,
    pub schedule_type: String,
    pub normalized_frequency: String,
    pub next_due_date: Option<NaiveDate>,
    pub is_active: bool,
    pub status: String,
    pub score: i64,
    pub assigned_to: String,
    pub assigned_user_id: Option<i64>,
    pub compliance_notes: String,
    pub indicator_key: String,
    pub ai_confidence_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Indicator {
    /// Typed schedule type (unknown values read as one-time)
    pub fn schedule_type(&self) -> ScheduleType {
        ScheduleType::parse(&self.schedule_type).unwrap_or(ScheduleType::OneTime)
    }

    /// Typed normalized frequency, when one is set and canonical
    pub fn normalized_frequency(&self) -> Option<Frequency> {
        Frequency::from_label(&self.normalized_frequency)
    }

    /// Period-alignment anchor: the indicator's creation date
    pub fn anchor_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

const INDICATOR_COLUMNS: &str = "id, project_id, section_id, standard_id, requirement, \
    evidence_required, responsible_person, frequency, schedule_type, normalized_frequency, \
    next_due_date, is_active, status, score, assigned_to, assigned_user_id, compliance_notes, \
    indicator_key, ai_confidence_score, created_at, updated_at";

/// Fields written by the import engine
#[derive(Debug, Clone)]
pub struct ImportFields {
    pub section_id: i64,
    pub standard_id: i64,
    pub requirement: String,
    pub evidence_required: String,
    pub responsible_person: String,
    pub frequency: String,
    pub schedule_type: ScheduleType,
    pub normalized_frequency: String,
    pub assigned_to: String,
    pub assigned_user_id: Option<i64>,
    pub compliance_notes: String,
    pub score: i64,
    pub ai_confidence_score: Option<f64>,
}

/// Load an indicator by idempotency key
pub async fn find_by_key<'a, E>(executor: E, indicator_key: &str) -> Result<Option<Indicator>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let indicator = sqlx::query_as::<_, Indicator>(&format!(
        "SELECT {INDICATOR_COLUMNS} FROM indicators WHERE indicator_key = ?"
    ))
    .bind(indicator_key)
    .fetch_optional(executor)
    .await?;

    Ok(indicator)
}

/// Load an indicator by id
pub async fn get_indicator<'a, E>(executor: E, indicator_id: i64) -> Result<Option<Indicator>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let indicator = sqlx::query_as::<_, Indicator>(&format!(
        "SELECT {INDICATOR_COLUMNS} FROM indicators WHERE id = ?"
    ))
    .bind(indicator_id)
    .fetch_optional(executor)
    .await?;

    Ok(indicator)
}

/// Insert a new indicator from an import row, returning its id, or None when
/// the key already exists (concurrent creation)
pub async fn try_insert_from_import<'a, E>(
    executor: E,
    project_id: i64,
    indicator_key: &str,
    fields: &ImportFields,
    next_due_date: Option<NaiveDate>,
) -> Result<Option<i64>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let now = Utc::now();
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO indicators (
            project_id, section_id, standard_id, requirement, evidence_required,
            responsible_person, frequency, schedule_type, normalized_frequency,
            next_due_date, assigned_to, assigned_user_id, compliance_notes, score,
            ai_confidence_score, indicator_key, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(indicator_key) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(project_id)
    .bind(fields.section_id)
    .bind(fields.standard_id)
    .bind(&fields.requirement)
    .bind(&fields.evidence_required)
    .bind(&fields.responsible_person)
    .bind(&fields.frequency)
    .bind(fields.schedule_type.as_str())
    .bind(&fields.normalized_frequency)
    .bind(next_due_date)
    .bind(&fields.assigned_to)
    .bind(fields.assigned_user_id)
    .bind(&fields.compliance_notes)
    .bind(fields.score)
    .bind(fields.ai_confidence_score)
    .bind(indicator_key)
    .bind(now)
    .bind(now)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|(id,)| id))
}

/// Refresh mutable fields on an existing indicator during re-import.
///
/// The creation date and next_due_date are deliberately untouched so a
/// re-import does not reset compliance clocks.
pub async fn update_from_import<'a, E>(
    executor: E,
    indicator_id: i64,
    fields: &ImportFields,
) -> Result<()>
where
    E: Executor<'a, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE indicators SET
            section_id = ?, standard_id = ?, requirement = ?, evidence_required = ?,
            responsible_person = ?, frequency = ?, schedule_type = ?,
            normalized_frequency = ?, assigned_to = ?, assigned_user_id = ?,
            compliance_notes = ?, score = ?, ai_confidence_score = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(fields.section_id)
    .bind(fields.standard_id)
    .bind(&fields.requirement)
    .bind(&fields.evidence_required)
    .bind(&fields.responsible_person)
    .bind(&fields.frequency)
    .bind(fields.schedule_type.as_str())
    .bind(&fields.normalized_frequency)
    .bind(&fields.assigned_to)
    .bind(fields.assigned_user_id)
    .bind(&fields.compliance_notes)
    .bind(fields.score)
    .bind(fields.ai_confidence_score)
    .bind(Utc::now())
    .bind(indicator_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Update status (and optionally score) on an indicator
pub async fn update_status<'a, E>(
    executor: E,
    indicator_id: i64,
    status: &str,
    score: Option<i64>,
) -> Result<()>
where
    E: Executor<'a, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE indicators SET status = ?, score = COALESCE(?, score), updated_at = ? WHERE id = ?",
    )
    .bind(status)
    .bind(score)
    .bind(Utc::now())
    .bind(indicator_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Set the active flag on an indicator
pub async fn set_active<'a, E>(executor: E, indicator_id: i64, is_active: bool) -> Result<()>
where
    E: Executor<'a, Database = Sqlite>,
{
    sqlx::query("UPDATE indicators SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(Utc::now())
        .bind(indicator_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Indicator joined with its section and standard names (for task feeds)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IndicatorWithNames {
    pub id: i64,
    pub requirement: String,
    pub schedule_type: String,
    pub normalized_frequency: String,
    pub next_due_date: Option<NaiveDate>,
    pub status: String,
    pub assigned_to: String,
    pub created_at: DateTime<Utc>,
    pub section_name: String,
    pub standard_name: String,
}

impl IndicatorWithNames {
    pub fn schedule_type(&self) -> ScheduleType {
        ScheduleType::parse(&self.schedule_type).unwrap_or(ScheduleType::OneTime)
    }

    pub fn normalized_frequency(&self) -> Option<Frequency> {
        Frequency::from_label(&self.normalized_frequency)
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// List all active indicators for a project with their grouping names
pub async fn list_active_with_names<'a, E>(
    executor: E,
    project_id: i64,
) -> Result<Vec<IndicatorWithNames>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let indicators = sqlx::query_as::<_, IndicatorWithNames>(
        r#"
        SELECT i.id, i.requirement, i.schedule_type, i.normalized_frequency,
               i.next_due_date, i.status, i.assigned_to, i.created_at,
               COALESCE(sec.name, '') AS section_name,
               COALESCE(std.name, '') AS standard_name
        FROM indicators i
        LEFT JOIN sections sec ON sec.id = i.section_id
        LEFT JOIN standards std ON std.id = i.standard_id
        WHERE i.project_id = ? AND i.is_active = 1
        ORDER BY i.id
        "#,
    )
    .bind(project_id)
    .fetch_all(executor)
    .await?;

    Ok(indicators)
}

/// Count indicators in a project (test and dashboard support)
pub async fn count_for_project<'a, E>(executor: E, project_id: i64) -> Result<i64>
where
    E: Executor<'a, Database = Sqlite>,
{
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM indicators WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(executor)
            .await?;

    Ok(count)
}
