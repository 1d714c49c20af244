// src/compliance/deadline.rs
//! Period-end and statutory-deadline arithmetic.
//!
//! Registry records carry no explicit reporting period, so the period year is
//! always the filing year. An annual report filed in March for the previous
//! fiscal year is therefore attributed to the *current* year's Dec-31 and
//! looks early rather than on time. This is the observed behavior of the
//! registry analysis and is kept as a known limitation.

use crate::compliance::rules::{CategoryRule, PeriodEndRule, QUARTER_SPLIT_MONTH};
use crate::compliance::timeliness::{self, Verdict};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Period end, deadline and verdict for one (category, filing) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplianceWindow {
    pub period_end: NaiveDate,
    pub deadline: NaiveDate,
    pub verdict: Verdict,
}

/// Parses an 8-digit `YYYYMMDD` registry date.
///
/// Returns `None` for anything else (wrong length, non-digits, impossible
/// calendar dates). A `None` here is a per-record skip, never a batch failure.
pub fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

/// Last day of the period a filing is attributed to.
pub fn period_end(rule: PeriodEndRule, filing_date: NaiveDate) -> Option<NaiveDate> {
    let year = filing_date.year();
    let (month, day) = match rule {
        PeriodEndRule::Fixed { month, day } => (month, day),
        PeriodEndRule::QuarterByFilingMonth if filing_date.month() <= QUARTER_SPLIT_MONTH => (3, 31),
        PeriodEndRule::QuarterByFilingMonth => (9, 30),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Period end plus the category's grace period, in calendar days.
pub fn deadline(rule: &CategoryRule, period_end: NaiveDate) -> Option<NaiveDate> {
    period_end.checked_add_days(Days::new(u64::from(rule.deadline_offset_days)))
}

pub fn compute_window(rule: &CategoryRule, filing_date: NaiveDate) -> Option<ComplianceWindow> {
    let period_end = period_end(rule.period_end, filing_date)?;
    let deadline = deadline(rule, period_end)?;
    Some(ComplianceWindow {
        period_end,
        deadline,
        verdict: timeliness::evaluate(filing_date, deadline),
    })
}
