// src/compliance/classifier.rs
use crate::compliance::rules::{CategoryRule, RuleSet, TagRule};

/// Categories and tags whose keyword/marker occurs in a report name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'r> {
    pub categories: Vec<&'r CategoryRule>,
    pub tags: Vec<&'r TagRule>,
}

impl Classification<'_> {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }
}

/// Matches a report name against every category and tag rule.
///
/// Matching is plain substring containment with no normalization, so a name
/// can land in several categories at once. An empty name matches nothing.
pub fn classify<'r>(report_name: &str, rules: &'r RuleSet) -> Classification<'r> {
    if report_name.is_empty() {
        return Classification { categories: Vec::new(), tags: Vec::new() };
    }

    Classification {
        categories: rules
            .categories
            .iter()
            .filter(|rule| report_name.contains(rule.keyword.as_str()))
            .collect(),
        tags: matching_tags(report_name, rules).collect(),
    }
}

pub fn matching_tags<'a, 'r: 'a>(report_name: &'a str, rules: &'r RuleSet) -> impl Iterator<Item = &'r TagRule> + 'a {
    rules
        .tags
        .iter()
        .filter(move |tag| !report_name.is_empty() && report_name.contains(tag.marker.as_str()))
}

pub fn is_governance_report(report_name: &str, rules: &RuleSet) -> bool {
    contains_any(report_name, &rules.governance_keywords)
}

pub fn is_sustainability_report(report_name: &str, rules: &RuleSet) -> bool {
    contains_any(report_name, &rules.sustainability_keywords)
}

pub fn is_discretionary_disclosure(report_name: &str, rules: &RuleSet) -> bool {
    report_name.contains(rules.discretionary_keyword.as_str())
}

fn contains_any(report_name: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| report_name.contains(kw.as_str()))
}
