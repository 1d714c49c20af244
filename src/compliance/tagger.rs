// src/compliance/tagger.rs
use crate::compliance::classifier;
use crate::compliance::rules::RuleSet;
use crate::dart::models::FilingRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Counts tag occurrences across every filing, in rule-table order.
///
/// Runs independently of date parsing: a filing with a malformed date still
/// contributes its tags.
pub fn count_tags(filings: &[FilingRecord], rules: &RuleSet) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = rules
        .tags
        .iter()
        .map(|tag| TagCount { tag: tag.id.clone(), count: 0 })
        .collect();

    for filing in filings {
        for tag in classifier::matching_tags(&filing.report_name, rules) {
            if let Some(entry) = counts.iter_mut().find(|c| c.tag == tag.id) {
                entry.count += 1;
            }
        }
    }
    counts
}
