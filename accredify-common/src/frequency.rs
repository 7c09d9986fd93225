//! Canonical frequency vocabulary
//!
//! Indicators are either one-time or recurring. Recurring indicators carry one
//! of seven canonical frequency values; free-text frequency strings from
//! uploaded checklists are normalized to this vocabulary by keyword matching
//! (with an optional AI-assisted fallback in the service layer).

use serde::{Deserialize, Serialize};

/// Whether an indicator is a one-off requirement or repeats on a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// Single requirement, satisfied once
    OneTime,
    /// Repeats every period at the indicator's normalized frequency
    Recurring,
}

impl ScheduleType {
    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::OneTime => "one_time",
            ScheduleType::Recurring => "recurring",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "one_time" => Some(ScheduleType::OneTime),
            "recurring" => Some(ScheduleType::Recurring),
            _ => None,
        }
    }
}

/// Canonical recurrence frequency for a recurring indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "Daily")]
    Daily,
    #[serde(rename = "Weekly")]
    Weekly,
    #[serde(rename = "Bi-weekly")]
    BiWeekly,
    #[serde(rename = "Monthly")]
    Monthly,
    #[serde(rename = "Quarterly")]
    Quarterly,
    #[serde(rename = "Semi-annually")]
    SemiAnnually,
    #[serde(rename = "Annual")]
    Annual,
}

impl Frequency {
    /// All canonical frequencies, shortest interval first
    pub const ALL: [Frequency; 7] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::BiWeekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnually,
        Frequency::Annual,
    ];

    /// Canonical display/storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::BiWeekly => "Bi-weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::SemiAnnually => "Semi-annually",
            Frequency::Annual => "Annual",
        }
    }

    /// Parse a canonical label (case-insensitive, tolerant of common aliases)
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "daily" | "day" => Some(Frequency::Daily),
            "weekly" | "week" => Some(Frequency::Weekly),
            "bi-weekly" | "biweekly" | "fortnightly" => Some(Frequency::BiWeekly),
            "monthly" | "month" => Some(Frequency::Monthly),
            "quarterly" | "quarter" => Some(Frequency::Quarterly),
            "semi-annually" | "semiannually" | "semi-annual" | "semiannual" => {
                Some(Frequency::SemiAnnually)
            }
            "annual" | "annually" | "yearly" | "year" => Some(Frequency::Annual),
            _ => None,
        }
    }

    /// Keyword phrases that identify this frequency in free text
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Frequency::Daily => &["daily", "every day", "each day"],
            Frequency::Weekly => &["weekly", "every week", "each week"],
            Frequency::BiWeekly => &[
                "bi-weekly",
                "biweekly",
                "every 2 weeks",
                "every two weeks",
                "fortnightly",
            ],
            Frequency::Monthly => &["monthly", "every month", "each month"],
            Frequency::Quarterly => &[
                "quarterly",
                "qtrly",
                "every quarter",
                "every 3 months",
                "every three months",
            ],
            Frequency::SemiAnnually => &[
                "semi-annual",
                "semiannual",
                "twice a year",
                "every 6 months",
                "every six months",
            ],
            Frequency::Annual => &["annual", "annually", "yearly", "every year", "each year"],
        }
    }
}

/// Phrases that mark a requirement as one-time rather than recurring
pub const ONE_TIME_PHRASES: [&str; 7] = [
    "one time",
    "onetime",
    "once",
    "one-time",
    "initial",
    "setup",
    "not applicable",
];

/// Short one-time markers matched as whole tokens only, so that "na" does
/// not fire inside words like "maintenance" or "seminar"
pub const ONE_TIME_TOKENS: [&str; 3] = ["n/a", "na", "none"];

/// Match free text against the recurring keyword tables.
///
/// Longer-interval frequencies are checked first so that phrases such as
/// "bi-weekly" are not shadowed by the bare "weekly" keyword.
pub fn match_recurring_keyword(text: &str) -> Option<Frequency> {
    let lower = text.to_lowercase();
    let ordered = [
        Frequency::SemiAnnually,
        Frequency::BiWeekly,
        Frequency::Quarterly,
        Frequency::Annual,
        Frequency::Monthly,
        Frequency::Weekly,
        Frequency::Daily,
    ];
    for freq in ordered {
        for keyword in freq.keywords() {
            if lower.contains(keyword) {
                return Some(freq);
            }
        }
    }
    None
}

/// Check whether free text carries a one-time signal
pub fn has_one_time_signal(text: &str) -> bool {
    let lower = text.to_lowercase();
    if ONE_TIME_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return true;
    }
    // '/' stays inside tokens so "n/a" survives the split
    lower
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '/')
        .any(|token| ONE_TIME_TOKENS.contains(&token))
}
