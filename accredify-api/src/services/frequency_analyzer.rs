//! Frequency normalization
//!
//! Maps free-text frequency strings ("Every 3 months", "Annual", "") to a
//! schedule type plus canonical frequency with a confidence score.
//!
//! Rule-based keyword matching runs first and decides the common cases on its
//! own. When the rules are not confident (<= 0.8) and an AI classifier is
//! configured, the analyzer delegates to it with the candidate label set; any
//! AI failure falls back to the best rule-based guess. Analysis never returns
//! an error to the caller.

use accredify_common::config::AppConfig;
use accredify_common::frequency::{has_one_time_signal, match_recurring_keyword};
use accredify_common::{Frequency, ScheduleType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::gemini_client::GeminiClient;

/// How an analysis result was produced (retained for audit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    RuleBased,
    Ai,
    Default,
}

/// Result of analyzing a frequency string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyAnalysis {
    pub schedule_type: ScheduleType,
    /// Canonical frequency; None when one-time or unnormalizable
    pub normalized_frequency: Option<Frequency>,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub method: AnalysisMethod,
}

impl FrequencyAnalysis {
    fn one_time(confidence: f64, method: AnalysisMethod) -> Self {
        Self {
            schedule_type: ScheduleType::OneTime,
            normalized_frequency: None,
            confidence,
            method,
        }
    }

    fn recurring(frequency: Option<Frequency>, confidence: f64, method: AnalysisMethod) -> Self {
        Self {
            schedule_type: ScheduleType::Recurring,
            normalized_frequency: frequency,
            confidence,
            method,
        }
    }

    /// Storage label for the normalized frequency ("" when none)
    pub fn frequency_label(&self) -> &'static str {
        self.normalized_frequency.map(|f| f.as_str()).unwrap_or("")
    }
}

/// Rule-based keyword classification.
///
/// Empty text and one-time signals resolve to one-time; canonical keyword
/// matches resolve to the corresponding recurring frequency; bare numeric
/// content is assumed recurring but not confidently so.
pub fn rule_based_analysis(frequency_text: &str) -> FrequencyAnalysis {
    let trimmed = frequency_text.trim();

    if trimmed.is_empty() {
        return FrequencyAnalysis::one_time(0.9, AnalysisMethod::RuleBased);
    }

    if has_one_time_signal(trimmed) {
        return FrequencyAnalysis::one_time(0.95, AnalysisMethod::RuleBased);
    }

    if let Some(frequency) = match_recurring_keyword(trimmed) {
        return FrequencyAnalysis::recurring(Some(frequency), 0.95, AnalysisMethod::RuleBased);
    }

    // Numeric content ("every 45 days") suggests recurrence but the value
    // cannot be normalized by keyword rules alone.
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        return FrequencyAnalysis::recurring(None, 0.7, AnalysisMethod::RuleBased);
    }

    FrequencyAnalysis::one_time(0.5, AnalysisMethod::RuleBased)
}

/// Confidence below which the analyzer consults the AI classifier
const AI_DELEGATION_THRESHOLD: f64 = 0.8;

/// Frequency analyzer with optional AI-assisted fallback.
///
/// The rule-based path is always available; the AI classifier is attached
/// only when enabled and configured with an API key.
pub struct FrequencyAnalyzer {
    ai: Option<GeminiClient>,
}

impl FrequencyAnalyzer {
    /// Analyzer using keyword rules only
    pub fn rule_based_only() -> Self {
        Self { ai: None }
    }

    /// Analyzer with an AI classifier attached
    pub fn with_ai(client: GeminiClient) -> Self {
        Self { ai: Some(client) }
    }

    /// Build from configuration, attaching the AI classifier when usable
    pub fn from_config(config: &AppConfig) -> Self {
        let Some(api_key) = config.gemini.api_key.clone().filter(|_| config.gemini_available())
        else {
            return Self::rule_based_only();
        };
        match GeminiClient::new(
            api_key,
            config.gemini.model.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
        ) {
            Ok(client) => {
                tracing::info!("AI frequency classifier enabled (model: {})", config.gemini.model);
                Self::with_ai(client)
            }
            Err(e) => {
                tracing::warn!("AI classifier unavailable, using rule-based only: {}", e);
                Self::rule_based_only()
            }
        }
    }

    /// Analyze a frequency string, with the requirement text as a weak
    /// secondary signal for the AI path. Always returns a best-effort result.
    pub async fn analyze(&self, frequency_text: &str, requirement: &str) -> FrequencyAnalysis {
        let rule_result = rule_based_analysis(frequency_text);
        if rule_result.confidence > AI_DELEGATION_THRESHOLD {
            return rule_result;
        }

        let Some(client) = &self.ai else {
            return rule_result;
        };

        let mut labels: Vec<&str> = vec!["one_time"];
        labels.extend(Frequency::ALL.iter().map(|f| f.as_str()));

        let text = format!(
            "Frequency: {}\nRequirement: {}",
            frequency_text.trim(),
            requirement.trim()
        );

        match client.classify(&text, &labels).await {
            Ok((label, confidence)) => {
                if label == "one_time" {
                    FrequencyAnalysis::one_time(confidence, AnalysisMethod::Ai)
                } else if let Some(frequency) = Frequency::from_label(&label) {
                    FrequencyAnalysis::recurring(Some(frequency), confidence, AnalysisMethod::Ai)
                } else {
                    // classify() validates labels, so this is unreachable in
                    // practice; keep the rule result rather than trusting it.
                    rule_result
                }
            }
            Err(e) => {
                tracing::warn!(
                    "AI frequency classification failed, using rule-based result: {}",
                    e
                );
                rule_result
            }
        }
    }
}

impl Default for FrequencyAnalyzer {
    fn default() -> Self {
        Self::rule_based_only()
    }
}
