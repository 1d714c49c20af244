// src/compliance/rules.rs
//! Static rule tables driving classification and deadline computation.
//!
//! A `RuleSet` is plain immutable data: it is built once (either the DART
//! defaults or a JSON file) and passed by reference into every engine call.

use crate::utils::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Filing months up to and including this one are attributed to Q1.
pub const QUARTER_SPLIT_MONTH: u32 = 5;

/// How the end of the reported period is derived from the filing date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodEndRule {
    /// Fixed month/day in the filing year (e.g. Dec-31 for annual reports).
    Fixed { month: u32, day: u32 },
    /// Mar-31 for filings in months 1..=5, Sep-30 otherwise.
    QuarterByFilingMonth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: String,
    pub keyword: String,
    pub period_end: PeriodEndRule,
    pub deadline_offset_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub id: String,
    pub marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub categories: Vec<CategoryRule>,
    pub tags: Vec<TagRule>,
    pub governance_keywords: Vec<String>,
    pub sustainability_keywords: Vec<String>,
    pub discretionary_keyword: String,
}

impl CategoryRule {
    pub fn new(id: &str, keyword: &str, period_end: PeriodEndRule, deadline_offset_days: u32) -> Self {
        Self {
            id: id.to_string(),
            keyword: keyword.to_string(),
            period_end,
            deadline_offset_days,
        }
    }
}

impl TagRule {
    /// A tag whose marker is its id wrapped in square brackets, e.g. `[기재정정]`.
    pub fn bracketed(id: &str) -> Self {
        Self {
            id: id.to_string(),
            marker: format!("[{}]", id),
        }
    }
}

impl RuleSet {
    /// Rule tables for periodic reports filed on OpenDART.
    pub fn dart() -> Self {
        Self {
            categories: vec![
                CategoryRule::new("사업보고서", "사업보고서", PeriodEndRule::Fixed { month: 12, day: 31 }, 90),
                CategoryRule::new("분기보고서", "분기보고서", PeriodEndRule::QuarterByFilingMonth, 45),
                CategoryRule::new("반기보고서", "반기보고서", PeriodEndRule::Fixed { month: 6, day: 30 }, 45),
            ],
            tags: [
                "기재정정",
                "첨부정정",
                "첨부추가",
                "변경등록",
                "연장결정",
                "발행조건확정",
                "정정명령부과",
                "정정제출요구",
            ]
            .iter()
            .map(|id| TagRule::bracketed(id))
            .collect(),
            governance_keywords: vec!["기업지배구조보고서".to_string()],
            sustainability_keywords: vec!["지속가능경영보고서".to_string(), "통합보고서".to_string()],
            discretionary_keyword: "자율공시".to_string(),
        }
    }

    /// Loads and validates a rule set from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let rules: RuleSet = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        rules.validate()?;
        tracing::info!(
            "Loaded rule set from {} ({} categories, {} tags)",
            path.display(),
            rules.categories.len(),
            rules.tags.len()
        );
        Ok(rules)
    }

    /// Rejects tables that would make matching or date arithmetic meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for rule in &self.categories {
            if rule.keyword.is_empty() {
                return Err(ConfigError::InvalidRules(format!("category '{}' has an empty keyword", rule.id)));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::InvalidRules(format!("duplicate category id '{}'", rule.id)));
            }
            if let PeriodEndRule::Fixed { month, day } = rule.period_end {
                // Checked against a non-leap year so every filing year can resolve it
                if NaiveDate::from_ymd_opt(2023, month, day).is_none() {
                    return Err(ConfigError::InvalidRules(format!(
                        "category '{}' has an invalid period end {:02}-{:02}",
                        rule.id, month, day
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for tag in &self.tags {
            if tag.marker.is_empty() {
                return Err(ConfigError::InvalidRules(format!("tag '{}' has an empty marker", tag.id)));
            }
            if !seen.insert(tag.id.as_str()) {
                return Err(ConfigError::InvalidRules(format!("duplicate tag id '{}'", tag.id)));
            }
        }

        let keywords = self
            .governance_keywords
            .iter()
            .chain(&self.sustainability_keywords)
            .chain(std::iter::once(&self.discretionary_keyword));
        for keyword in keywords {
            if keyword.is_empty() {
                return Err(ConfigError::InvalidRules("empty report keyword".to_string()));
            }
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::dart()
    }
}
