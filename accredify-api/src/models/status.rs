//! Indicator compliance status

use serde::{Deserialize, Serialize};

/// Compliance status of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStatus {
    /// No acceptable evidence for the requirement
    NotCompliant,
    /// Work underway, partial coverage
    InProcess,
    /// Evidence submitted but judged insufficient
    NeedsMoreEvidence,
    /// Requirement satisfied
    Compliant,
}

impl IndicatorStatus {
    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorStatus::NotCompliant => "not_compliant",
            IndicatorStatus::InProcess => "in_process",
            IndicatorStatus::NeedsMoreEvidence => "needs_more_evidence",
            IndicatorStatus::Compliant => "compliant",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_compliant" => Some(IndicatorStatus::NotCompliant),
            "in_process" => Some(IndicatorStatus::InProcess),
            "needs_more_evidence" => Some(IndicatorStatus::NeedsMoreEvidence),
            "compliant" => Some(IndicatorStatus::Compliant),
            _ => None,
        }
    }
}
