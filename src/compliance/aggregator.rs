// src/compliance/aggregator.rs
use crate::compliance::classifier;
use crate::compliance::deadline::{self, ComplianceWindow};
use crate::compliance::rules::RuleSet;
use crate::compliance::tagger::{self, TagCount};
use crate::compliance::timeliness::Verdict;
use crate::dart::models::FilingRecord;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LateFiling {
    pub report_name: String,
    pub filed: NaiveDate,
    pub deadline: NaiveDate,
    pub delay_days: i64,
}

/// Filing counts for one statutory category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub filed: usize,
    pub on_time: usize,
    /// Late filings in source order.
    pub late: Vec<LateFiling>,
}

/// Compliance metrics for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanySummary {
    pub company: String,
    pub total_filings: usize,
    /// One entry per category rule, in rule-table order.
    pub categories: Vec<CategoryStats>,
    /// `None` when no filing matched a category.
    pub timely_filing_pct: Option<f64>,
    pub discretionary_disclosures: usize,
    pub governance_reports: usize,
    pub sustainability_reports: usize,
    /// One entry per tag rule, in rule-table order.
    pub tag_counts: Vec<TagCount>,
    pub total_corrections: usize,
    /// `None` when the company has no filings at all.
    pub correction_ratio_pct: Option<f64>,
}

impl CompanySummary {
    pub fn regulatory_filings(&self) -> usize {
        self.categories.iter().map(|c| c.filed).sum()
    }

    pub fn on_time_filings(&self) -> usize {
        self.categories.iter().map(|c| c.on_time).sum()
    }

    pub fn category(&self, id: &str) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.category == id)
    }

    pub fn tag_count(&self, id: &str) -> Option<usize> {
        self.tag_counts.iter().find(|t| t.tag == id).map(|t| t.count)
    }

    pub fn late_filing_count(&self) -> usize {
        self.categories.iter().map(|c| c.late.len()).sum()
    }
}

/// Runs classification, deadline evaluation and tagging over one company's
/// filings and folds the results into a summary.
///
/// Never fails: a filing whose date is not a valid `YYYYMMDD` value counts
/// toward the total (and its tags and keyword counts) but is left out of every
/// category and timeliness counter.
pub fn analyze_company(company: &str, filings: &[FilingRecord], rules: &RuleSet) -> CompanySummary {
    let mut categories: Vec<CategoryStats> = rules
        .categories
        .iter()
        .map(|rule| CategoryStats {
            category: rule.id.clone(),
            filed: 0,
            on_time: 0,
            late: Vec::new(),
        })
        .collect();
    let mut malformed = 0usize;

    for filing in filings {
        let Some(filed) = deadline::parse_filing_date(&filing.filing_date) else {
            malformed += 1;
            tracing::trace!("Skipping deadline check for '{}': bad date '{}'", filing.report_name, filing.filing_date);
            continue;
        };

        let classification = classifier::classify(&filing.report_name, rules);
        if classification.is_empty() {
            continue;
        }
        for rule in classification.categories {
            let Some(stats) = categories.iter_mut().find(|c| c.category == rule.id) else {
                continue;
            };
            stats.filed += 1;

            let Some(ComplianceWindow { deadline, verdict, .. }) = deadline::compute_window(rule, filed) else {
                tracing::warn!("Could not compute deadline for '{}' filed {}", filing.report_name, filed);
                continue;
            };
            tracing::trace!("{} '{}' filed {} deadline {}: {:?}", rule.id, filing.report_name, filed, deadline, verdict);
            match verdict {
                Verdict::OnTime => stats.on_time += 1,
                Verdict::Late { delay_days } => stats.late.push(LateFiling {
                    report_name: filing.report_name.clone(),
                    filed,
                    deadline,
                    delay_days,
                }),
            }
        }
    }

    if malformed > 0 {
        tracing::debug!("{}: {} filings with malformed dates left out of timeliness", company, malformed);
    }

    let count_matching = |pred: fn(&str, &RuleSet) -> bool| {
        filings.iter().filter(|f| pred(&f.report_name, rules)).count()
    };

    let tag_counts = tagger::count_tags(filings, rules);
    let total_corrections: usize = tag_counts.iter().map(|t| t.count).sum();
    let regulatory: usize = categories.iter().map(|c| c.filed).sum();
    let on_time: usize = categories.iter().map(|c| c.on_time).sum();

    CompanySummary {
        company: company.to_string(),
        total_filings: filings.len(),
        timely_filing_pct: percentage(on_time, regulatory),
        categories,
        discretionary_disclosures: count_matching(classifier::is_discretionary_disclosure),
        governance_reports: count_matching(classifier::is_governance_report),
        sustainability_reports: count_matching(classifier::is_sustainability_report),
        correction_ratio_pct: percentage(total_corrections, filings.len()),
        total_corrections,
        tag_counts,
    }
}

/// `part / whole * 100` rounded to two decimals, `None` for an empty whole.
///
/// Rounds the exact binary value, with exact ties going to the even
/// neighbour (1/32 gives 3.12, not 3.13).
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    let pct = part as f64 / whole as f64 * 100.0;
    format!("{:.2}", pct).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filings(rows: &[(&str, &str)]) -> Vec<FilingRecord> {
        rows.iter().map(|(name, dt)| FilingRecord::new(name, dt)).collect()
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(0, 5), Some(0.0));
        assert_eq!(percentage(2, 3), Some(66.67));
        assert_eq!(percentage(1, 3), Some(33.33));
        assert_eq!(percentage(3, 3), Some(100.0));
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        assert_eq!(percentage(1, 32), Some(3.12));
        assert_eq!(percentage(3, 32), Some(9.38));
        assert_eq!(percentage(5, 32), Some(15.62));
        assert_eq!(percentage(1, 64), Some(1.56));
    }

    #[test]
    fn test_correction_ratio_with_32_filings() {
        let rules = RuleSet::dart();
        let mut input: Vec<FilingRecord> = (0..31)
            .map(|_| FilingRecord::new("주요사항보고서(자기주식취득결정)", "20240102"))
            .collect();
        input.push(FilingRecord::new("[기재정정]사업보고서 (2023.12)", "20240320"));

        let summary = analyze_company("테스트증권", &input, &rules);
        assert_eq!(summary.total_corrections, 1);
        assert_eq!(summary.correction_ratio_pct, Some(3.12));
    }

    #[test]
    fn test_two_annual_reports_scenario() {
        let rules = RuleSet::dart();
        let input = filings(&[("사업보고서", "20240328"), ("사업보고서(기재정정)", "20250405")]);
        let summary = analyze_company("테스트증권", &input, &rules);

        let annual = summary.category("사업보고서").unwrap();
        assert_eq!(annual.filed, 2);
        // 20240328 -> period end 2024-12-31, deadline 2025-03-31: early, so on time
        // 20250405 -> period end 2025-12-31, deadline 2026-03-31: on time
        assert_eq!(annual.on_time, 2);
        assert!(annual.late.is_empty());
        assert_eq!(summary.timely_filing_pct, Some(100.0));
        // "(기재정정)" has no brackets, so it is not a correction tag
        assert_eq!(summary.total_corrections, 0);
        assert_eq!(summary.correction_ratio_pct, Some(0.0));
    }

    #[test]
    fn test_late_filings_keep_source_order() {
        let rules = RuleSet::dart();
        let input = filings(&[
            ("반기보고서 (2024.06)", "20240820"),
            ("분기보고서 (2024.09)", "20241115"),
            ("분기보고서 (2024.03)", "20240515"),
            ("분기보고서 (2024.03)", "20240517"),
        ]);
        let summary = analyze_company("테스트증권", &input, &rules);

        let quarterly = summary.category("분기보고서").unwrap();
        assert_eq!(quarterly.filed, 3);
        assert_eq!(quarterly.on_time, 1);
        assert_eq!(
            quarterly.late,
            vec![
                LateFiling {
                    report_name: "분기보고서 (2024.09)".to_string(),
                    filed: date(2024, 11, 15),
                    deadline: date(2024, 11, 14),
                    delay_days: 1,
                },
                LateFiling {
                    report_name: "분기보고서 (2024.03)".to_string(),
                    filed: date(2024, 5, 17),
                    deadline: date(2024, 5, 15),
                    delay_days: 2,
                },
            ]
        );

        let semi = summary.category("반기보고서").unwrap();
        assert_eq!(semi.late[0].delay_days, 6);
        assert_eq!(summary.regulatory_filings(), 4);
        assert_eq!(summary.on_time_filings(), 1);
        assert_eq!(summary.late_filing_count(), 3);
        assert_eq!(summary.timely_filing_pct, Some(25.0));
    }

    #[test]
    fn test_malformed_dates_only_count_toward_total() {
        let rules = RuleSet::dart();
        let input = filings(&[
            ("[기재정정]사업보고서 (2023.12)", "2024031"),
            ("사업보고서 (2023.12)", ""),
            ("분기보고서 (2024.03)", "20240514"),
        ]);
        let summary = analyze_company("테스트증권", &input, &rules);

        assert_eq!(summary.total_filings, 3);
        assert_eq!(summary.category("사업보고서").unwrap().filed, 0);
        assert_eq!(summary.category("분기보고서").unwrap().filed, 1);
        assert_eq!(summary.timely_filing_pct, Some(100.0));
        // Tags are counted regardless of date
        assert_eq!(summary.tag_count("기재정정"), Some(1));
        assert_eq!(summary.correction_ratio_pct, Some(33.33));
    }

    #[test]
    fn test_no_regulatory_filings_gives_null_percentage() {
        let rules = RuleSet::dart();
        let input = filings(&[("주요사항보고서(자기주식취득결정)", "20240102")]);
        let summary = analyze_company("테스트증권", &input, &rules);

        assert_eq!(summary.regulatory_filings(), 0);
        assert_eq!(summary.timely_filing_pct, None);
        assert_eq!(summary.correction_ratio_pct, Some(0.0));
    }

    #[test]
    fn test_no_filings_gives_null_ratios() {
        let rules = RuleSet::dart();
        let summary = analyze_company("테스트증권", &[], &rules);

        assert_eq!(summary.total_filings, 0);
        assert_eq!(summary.timely_filing_pct, None);
        assert_eq!(summary.correction_ratio_pct, None);
        assert_eq!(summary.categories.len(), 3);
        assert_eq!(summary.tag_counts.len(), 8);
    }

    #[test]
    fn test_keyword_counts_and_corrections() {
        let rules = RuleSet::dart();
        let input = filings(&[
            ("기업지배구조보고서공시", "20240531"),
            ("지속가능경영보고서 등 관련사항(자율공시)", "20240628"),
            ("[기재정정][첨부정정]반기보고서 (2024.06)", "20240814"),
            ("[정정명령부과]증권신고서(채무증권)", "20240910"),
        ]);
        let summary = analyze_company("테스트증권", &input, &rules);

        assert_eq!(summary.governance_reports, 1);
        assert_eq!(summary.sustainability_reports, 1);
        assert_eq!(summary.discretionary_disclosures, 1);
        assert_eq!(summary.total_corrections, 3);
        assert_eq!(summary.correction_ratio_pct, Some(75.0));
        assert_eq!(summary.category("반기보고서").unwrap().on_time, 1);
    }

    #[test]
    fn test_filed_count_never_below_on_time() {
        let rules = RuleSet::dart();
        let input = filings(&[
            ("사업보고서 (2023.12)", "20240320"),
            ("사업보고서 (2023.12)", "20240101"),
            ("반기보고서 (2023.06)", "20231001"),
            ("분기보고서 (2024.09)", "20241231"),
            ("분기보고서 (2024.03)", "2024-05-15"),
        ]);
        let summary = analyze_company("테스트증권", &input, &rules);
        for stats in &summary.categories {
            assert!(stats.filed >= stats.on_time);
            assert_eq!(stats.filed, stats.on_time + stats.late.len());
        }
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let rules = RuleSet::dart();
        let input = filings(&[
            ("[첨부추가]분기보고서 (2024.09)", "20241120"),
            ("사업보고서 (2023.12)", "20240320"),
            ("자율공시", "bad"),
        ]);
        let first = analyze_company("테스트증권", &input, &rules);
        let second = analyze_company("테스트증권", &input, &rules);
        assert_eq!(first, second);
    }
}
