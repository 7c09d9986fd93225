//! CSV import/reconciliation engine
//!
//! Parses a tabular checklist description and performs an idempotent upsert
//! into the Section -> Standard -> Indicator hierarchy.
//!
//! Failure policy is two-tier: structural failures (header mismatch, database
//! unavailable) abort the whole import with zero side effects; row-content
//! failures are recorded with their 1-based row number and skipped while the
//! rest of the file still commits. The whole import runs in one transaction.

use accredify_common::indicator_key::derive_indicator_key;
use accredify_common::schedule::next_due_date;
use accredify_common::ScheduleType;
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use thiserror::Error;

use crate::db::{indicators, sections, standards, users};
use crate::models::import_row::EXPECTED_HEADERS;
use crate::models::{ImportSummary, IndicatorRow};
use crate::services::frequency_analyzer::FrequencyAnalyzer;

/// Structural import failures (abort the whole import, no side effects)
#[derive(Debug, Error)]
pub enum ImportError {
    /// Header contract violation
    #[error("Invalid CSV headers. Expected: {0}")]
    InvalidHeader(String),

    /// Unreadable CSV input
    #[error("Failed to process CSV file: {0}")]
    Csv(#[from] csv::Error),

    /// Persistence failure (transaction rolled back)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Importer for one project's indicator checklist
pub struct CsvImporter<'a> {
    pool: &'a SqlitePool,
    analyzer: &'a FrequencyAnalyzer,
    project_id: i64,
}

impl<'a> CsvImporter<'a> {
    pub fn new(pool: &'a SqlitePool, analyzer: &'a FrequencyAnalyzer, project_id: i64) -> Self {
        Self {
            pool,
            analyzer,
            project_id,
        }
    }

    /// Import indicators from CSV bytes.
    ///
    /// `today` anchors due-date computation for newly created indicators
    /// (existing indicators keep their anchor so re-imports never reset
    /// compliance clocks).
    pub async fn import(
        &self,
        csv_bytes: &[u8],
        today: NaiveDate,
    ) -> Result<ImportSummary, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv_bytes);

        validate_headers(reader.headers()?)?;

        // Collect records up front; per-record CSV errors are row-level.
        let records: Vec<Result<csv::StringRecord, csv::Error>> = reader.into_records().collect();

        let mut summary = ImportSummary::default();
        // Request-scoped lookup caches: a name introduced by an earlier row
        // must be reused by later rows in the same call.
        let mut section_cache: HashMap<String, i64> = HashMap::new();
        let mut standard_cache: HashMap<(i64, String), i64> = HashMap::new();

        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;

        for (index, record) in records.into_iter().enumerate() {
            // Row 1 is the header
            let row_num = index + 2;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    summary.record_skip(row_num, e.to_string());
                    continue;
                }
            };

            let row = match IndicatorRow::parse(&record) {
                Ok(row) => row,
                Err(message) => {
                    summary.record_skip(row_num, message);
                    continue;
                }
            };

            self.process_row(
                &mut tx,
                &mut section_cache,
                &mut standard_cache,
                &mut summary,
                &row,
                today,
            )
            .await?;
        }

        tx.commit().await.map_err(anyhow::Error::from)?;

        summary.finalize();
        tracing::info!(
            project_id = self.project_id,
            created = summary.indicators_created,
            updated = summary.indicators_updated,
            skipped = summary.rows_skipped,
            "CSV import complete"
        );

        Ok(summary)
    }

    /// Upsert one validated row inside the import transaction
    async fn process_row(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        section_cache: &mut HashMap<String, i64>,
        standard_cache: &mut HashMap<(i64, String), i64>,
        summary: &mut ImportSummary,
        row: &IndicatorRow,
        today: NaiveDate,
    ) -> Result<(), ImportError> {
        let section_id =
            get_or_create_section(tx, self.project_id, &row.section, section_cache, summary)
                .await?;
        let standard_id =
            get_or_create_standard(tx, section_id, &row.standard, standard_cache, summary).await?;

        let indicator_key =
            derive_indicator_key(self.project_id, &row.section, &row.standard, &row.requirement);

        let analysis = self.analyzer.analyze(&row.frequency, &row.requirement).await;

        let assigned_user_id = if row.assigned_to.is_empty() {
            None
        } else {
            match resolve_assignee(&mut **tx, &row.assigned_to).await? {
                Some(user_id) => Some(user_id),
                None => {
                    summary.record_unmatched_user(&row.assigned_to);
                    None
                }
            }
        };

        let fields = indicators::ImportFields {
            section_id,
            standard_id,
            requirement: row.requirement.clone(),
            evidence_required: row.evidence_required.clone(),
            responsible_person: row.responsible_person.clone(),
            frequency: row.frequency.clone(),
            schedule_type: analysis.schedule_type,
            normalized_frequency: analysis.frequency_label().to_string(),
            assigned_to: row.assigned_to.clone(),
            assigned_user_id,
            compliance_notes: row.compliance_notes.clone(),
            score: row.score,
            ai_confidence_score: Some(analysis.confidence),
        };

        match indicators::find_by_key(&mut **tx, &indicator_key).await? {
            Some(existing) => {
                indicators::update_from_import(&mut **tx, existing.id, &fields).await?;
                summary.indicators_updated += 1;
            }
            None => {
                let next_due = match (analysis.schedule_type, analysis.normalized_frequency) {
                    (ScheduleType::Recurring, Some(frequency)) => {
                        Some(next_due_date(today, frequency))
                    }
                    _ => None,
                };
                match indicators::try_insert_from_import(
                    &mut **tx,
                    self.project_id,
                    &indicator_key,
                    &fields,
                    next_due,
                )
                .await?
                {
                    Some(_) => summary.indicators_created += 1,
                    // A concurrent import created the same key after our
                    // lookup; resolve to the update path.
                    None => {
                        let existing = indicators::find_by_key(&mut **tx, &indicator_key)
                            .await?
                            .ok_or_else(|| {
                                anyhow::anyhow!(
                                    "Indicator '{}' vanished after insert conflict",
                                    row.requirement
                                )
                            })?;
                        indicators::update_from_import(&mut **tx, existing.id, &fields).await?;
                        summary.indicators_updated += 1;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Validate the fixed, ordered header contract
fn validate_headers(headers: &csv::StringRecord) -> Result<(), ImportError> {
    let actual: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
    if actual != EXPECTED_HEADERS {
        return Err(ImportError::InvalidHeader(EXPECTED_HEADERS.join(", ")));
    }
    Ok(())
}

/// Get or create a section by case-insensitive name within the project.
///
/// A unique-constraint hit from a concurrent import resolves by re-fetch.
async fn get_or_create_section(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    project_id: i64,
    name: &str,
    cache: &mut HashMap<String, i64>,
    summary: &mut ImportSummary,
) -> Result<i64, ImportError> {
    let cache_key = name.to_lowercase();
    if let Some(&id) = cache.get(&cache_key) {
        return Ok(id);
    }

    let id = match sections::find_by_name(&mut **tx, project_id, name).await? {
        Some(section) => section.id,
        None => match sections::try_insert(&mut **tx, project_id, name).await? {
            Some(id) => {
                summary.sections_created += 1;
                id
            }
            None => sections::find_by_name(&mut **tx, project_id, name)
                .await?
                .map(|s| s.id)
                .ok_or_else(|| {
                    anyhow::anyhow!("Section '{}' vanished after insert conflict", name)
                })?,
        },
    };

    cache.insert(cache_key, id);
    Ok(id)
}

/// Get or create a standard by case-insensitive name within the section
async fn get_or_create_standard(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    section_id: i64,
    name: &str,
    cache: &mut HashMap<(i64, String), i64>,
    summary: &mut ImportSummary,
) -> Result<i64, ImportError> {
    let cache_key = (section_id, name.to_lowercase());
    if let Some(&id) = cache.get(&cache_key) {
        return Ok(id);
    }

    let id = match standards::find_by_name(&mut **tx, section_id, name).await? {
        Some(standard) => standard.id,
        None => match standards::try_insert(&mut **tx, section_id, name).await? {
            Some(id) => {
                summary.standards_created += 1;
                id
            }
            None => standards::find_by_name(&mut **tx, section_id, name)
                .await?
                .map(|s| s.id)
                .ok_or_else(|| {
                    anyhow::anyhow!("Standard '{}' vanished after insert conflict", name)
                })?,
        },
    };

    cache.insert(cache_key, id);
    Ok(id)
}

/// Resolve assignee text against user accounts: exact case-insensitive email
/// first, then username
async fn resolve_assignee(
    conn: &mut SqliteConnection,
    assigned_to: &str,
) -> Result<Option<i64>, ImportError> {
    if let Some(user) = users::find_by_email(&mut *conn, assigned_to).await? {
        return Ok(Some(user.id));
    }
    if let Some(user) = users::find_by_username(&mut *conn, assigned_to).await? {
        return Ok(Some(user.id));
    }
    Ok(None)
}
