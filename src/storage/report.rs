// src/storage/report.rs
use crate::compliance::aggregator::{CategoryStats, CompanySummary};
use crate::compliance::rules::RuleSet;
use crate::utils::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::Path;

const FIXED_COLUMNS: &[&str] = &[
    "company",
    "total_filings",
    "regulatory_filings",
    "timely_filing_pct",
    "discretionary_disclosures",
    "governance_reports",
    "sustainability_reports",
    "total_corrections",
    "correction_ratio_pct",
];

/// Header row: fixed columns, then `<category>_filed` per category and one column per tag.
pub fn summary_header(rules: &RuleSet) -> Vec<String> {
    FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(rules.categories.iter().map(|c| format!("{}_filed", c.id)))
        .chain(rules.tags.iter().map(|t| t.id.clone()))
        .collect()
}

fn summary_row(summary: &CompanySummary, rules: &RuleSet) -> Vec<String> {
    // Always at least one decimal place: 50.0, not 50
    let ratio = |v: Option<f64>| v.map(|x| format!("{:?}", x)).unwrap_or_default();

    let mut row = vec![
        summary.company.clone(),
        summary.total_filings.to_string(),
        summary.regulatory_filings().to_string(),
        ratio(summary.timely_filing_pct),
        summary.discretionary_disclosures.to_string(),
        summary.governance_reports.to_string(),
        summary.sustainability_reports.to_string(),
        summary.total_corrections.to_string(),
        ratio(summary.correction_ratio_pct),
    ];
    row.extend(
        rules
            .categories
            .iter()
            .map(|c| summary.category(&c.id).map(|s| s.filed).unwrap_or(0).to_string()),
    );
    row.extend(
        rules
            .tags
            .iter()
            .map(|t| summary.tag_count(&t.id).unwrap_or(0).to_string()),
    );
    row
}

/// Writes one CSV row per company summary.
pub fn write_summary_csv<P: AsRef<Path>>(
    path: P,
    summaries: &[CompanySummary],
    rules: &RuleSet,
) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(summary_header(rules))?;
    for summary in summaries {
        writer.write_record(summary_row(summary, rules))?;
    }
    writer.flush()?;

    tracing::info!("Saved {} summary rows to {}", summaries.len(), path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct LateReportEntry<'a> {
    company: &'a str,
    late_filings: usize,
    categories: Vec<&'a CategoryStats>,
}

/// Writes the per-category late-filing details as pretty JSON.
pub fn write_late_report<P: AsRef<Path>>(path: P, summaries: &[CompanySummary]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let entries: Vec<LateReportEntry<'_>> = summaries
        .iter()
        .map(|s| LateReportEntry {
            company: &s.company,
            late_filings: s.late_filing_count(),
            categories: s.categories.iter().filter(|c| !c.late.is_empty()).collect(),
        })
        .collect();

    fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    tracing::info!("Saved late-filing report to {}", path.display());
    Ok(())
}
