// src/compliance/timeliness.rs
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    OnTime,
    /// Filed after the deadline; `delay_days` is always at least 1.
    Late { delay_days: i64 },
}

/// A filing on the deadline day itself is on time.
pub fn evaluate(filing_date: NaiveDate, deadline: NaiveDate) -> Verdict {
    if filing_date <= deadline {
        Verdict::OnTime
    } else {
        Verdict::Late {
            delay_days: (filing_date - deadline).num_days(),
        }
    }
}
