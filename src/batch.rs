// src/batch.rs
use crate::compliance::{analyze_company, CompanySummary, RuleSet};
use crate::dart::models::{Company, DateRange, FilingRecord};
use crate::dart::FilingSource;
use crate::storage::StorageManager;
use crate::utils::error::DartError;

/// A company that produced no summary, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCompany {
    pub company: String,
    pub cause: String,
}

/// Outcome of one batch run: summaries in input order plus skipped companies.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub summaries: Vec<CompanySummary>,
    pub skipped: Vec<SkippedCompany>,
}

/// Where filings come from for one run.
pub struct BatchContext<'a, S: FilingSource> {
    pub source: &'a S,
    pub storage: &'a StorageManager,
    pub rules: &'a RuleSet,
    pub range: DateRange,
    /// Use the cache only; a cache miss skips the company.
    pub offline: bool,
}

/// Analyzes every company independently. A failing company is skipped with its
/// cause and never turns into an empty summary.
pub async fn run_batch<S: FilingSource>(companies: &[Company], ctx: &BatchContext<'_, S>) -> BatchReport {
    let mut report = BatchReport::default();

    for company in companies {
        tracing::info!("Analyzing {} ({})", company.name, company.corp_code);

        let filings = match load_or_fetch(company, ctx).await {
            Ok(filings) => filings,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", company.name, e);
                report.skipped.push(SkippedCompany {
                    company: company.name.clone(),
                    cause: e.to_string(),
                });
                continue;
            }
        };

        let summary = analyze_company(&company.name, &filings, ctx.rules);
        tracing::info!(
            "{}: {} filings, {}/{} regulatory on time ({:?}%), corrections {:?}%",
            summary.company,
            summary.total_filings,
            summary.on_time_filings(),
            summary.regulatory_filings(),
            summary.timely_filing_pct,
            summary.correction_ratio_pct
        );
        report.summaries.push(summary);
    }

    tracing::info!(
        "Batch finished. Analyzed: {}, Skipped: {}",
        report.summaries.len(),
        report.skipped.len()
    );
    report
}

/// Cache first; on a miss, fetch from the source and write the cache.
async fn load_or_fetch<S: FilingSource>(
    company: &Company,
    ctx: &BatchContext<'_, S>,
) -> Result<Vec<FilingRecord>, DartError> {
    match ctx.storage.load_filings(company) {
        Ok(Some(filings)) => {
            tracing::info!("Using {} cached filings for {}", filings.len(), company.name);
            return Ok(filings);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring unreadable cache for {}: {}", company.name, e),
    }

    if ctx.offline {
        return Err(DartError::NotCached(company.name.clone()));
    }

    let filings = ctx.source.fetch_all_filings(&company.corp_code, &ctx.range).await?;
    if let Err(e) = ctx.storage.save_filings(company, &filings) {
        tracing::error!("Failed to cache filings for {}: {}", company.name, e);
    }
    Ok(filings)
}
