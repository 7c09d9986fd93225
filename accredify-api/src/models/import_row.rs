//! Typed import row
//!
//! Each CSV row is parsed into this record exactly once, so the row-level
//! validation rules live in one place and the importer works with named,
//! typed fields instead of positional strings.

use serde::{Deserialize, Serialize};

/// The fixed, ordered header contract for indicator imports.
///
/// Any deviation in names or order is a structural failure that aborts the
/// whole import before any row is processed.
pub const EXPECTED_HEADERS: [&str; 9] = [
    "Section",
    "Standard",
    "Indicator",
    "Evidence Required",
    "Responsible Person",
    "Frequency",
    "Assigned to",
    "Compliance Evidence",
    "Score",
];

/// Default score applied when the Score column is empty
pub const DEFAULT_SCORE: i64 = 10;

/// One validated row of an indicator import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub section: String,
    pub standard: String,
    pub requirement: String,
    pub evidence_required: String,
    pub responsible_person: String,
    pub frequency: String,
    pub assigned_to: String,
    pub compliance_notes: String,
    pub score: i64,
}

impl IndicatorRow {
    /// Parse and validate a CSV record.
    ///
    /// Returns a human-readable message on row-level failure (empty required
    /// field, malformed or out-of-range score); the caller records it and
    /// skips the row.
    pub fn parse(record: &csv::StringRecord) -> Result<Self, String> {
        let field = |index: usize| record.get(index).unwrap_or("").trim().to_string();

        let section = field(0);
        let standard = field(1);
        let requirement = field(2);

        if section.is_empty() || standard.is_empty() || requirement.is_empty() {
            return Err("Section, Standard, and Indicator are required fields".to_string());
        }

        let score_text = field(8);
        let score = if score_text.is_empty() {
            DEFAULT_SCORE
        } else {
            let value: i64 = score_text
                .parse()
                .map_err(|_| format!("Score must be an integer, got '{}'", score_text))?;
            if !(0..=100).contains(&value) {
                return Err(format!("Score must be between 0 and 100, got {}", value));
            }
            value
        };

        Ok(Self {
            section,
            standard,
            requirement,
            evidence_required: field(3),
            responsible_person: field(4),
            frequency: field(5),
            assigned_to: field(6),
            compliance_notes: field(7),
            score,
        })
    }
}
