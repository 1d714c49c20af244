// src/dart/models.rs
use crate::utils::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status code OpenDART returns on success.
pub const STATUS_OK: &str = "000";
/// Status code for "no data found": an empty result, not a failure.
pub const STATUS_NO_DATA: &str = "013";

/// Envelope of one page of the disclosure search endpoint
/// Example: https://opendart.fss.or.kr/api/list.json?corp_code=00120182&page_no=1
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub total_page: Option<u32>,
    #[serde(default)]
    pub list: Vec<FilingRecord>,
}

/// One disclosure event as returned by the registry.
///
/// Only `report_nm` and `rcept_dt` feed the compliance engine; the other
/// fields are carried through so cached files keep the registry's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    #[serde(rename = "report_nm", default)]
    pub report_name: String,
    #[serde(rename = "rcept_dt", default)]
    pub filing_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corp_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corp_cls: Option<String>,
    #[serde(rename = "rcept_no", default, skip_serializing_if = "Option::is_none")]
    pub receipt_no: Option<String>,
    #[serde(rename = "flr_nm", default, skip_serializing_if = "Option::is_none")]
    pub filer_name: Option<String>,
    #[serde(rename = "rm", default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[cfg(test)]
impl FilingRecord {
    pub fn new(report_name: &str, filing_date: &str) -> Self {
        Self {
            report_name: report_name.to_string(),
            filing_date: filing_date.to_string(),
            corp_code: None,
            corp_name: None,
            stock_code: None,
            corp_cls: None,
            receipt_no: None,
            filer_name: None,
            remarks: None,
        }
    }
}

/// A company to analyze: display name plus its 8-digit OpenDART corp code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub corp_code: String,
}

impl Company {
    pub fn new(name: &str, corp_code: &str) -> Self {
        Self {
            name: name.to_string(),
            corp_code: corp_code.to_string(),
        }
    }

    /// Brokers analyzed when no company list is given.
    pub fn defaults() -> Vec<Company> {
        vec![
            Company::new("상상인증권", "00112059"),
            Company::new("NH투자증권", "00120182"),
            Company::new("미래에셋증권", "00111722"),
            Company::new("유진증권", "00131054"),
        ]
    }
}

/// Parses the `NAME=CORP_CODE` form accepted on the command line.
impl FromStr for Company {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, code) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidCompany(s.to_string()))?;
        let (name, code) = (name.trim(), code.trim());
        if name.is_empty() || code.len() != 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidCompany(s.to_string()));
        }
        Ok(Company::new(name, code))
    }
}

/// Inclusive receipt-date window for the disclosure search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Parses two `YYYYMMDD` strings; the start must not be after the end.
    pub fn parse(start: &str, end: &str) -> Result<Self, ConfigError> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw, "%Y%m%d")
                .ok()
                .filter(|_| raw.len() == 8)
                .ok_or_else(|| ConfigError::InvalidDate(raw.to_string()))
        };
        let range = Self { start: parse(start)?, end: parse(end)? };
        if range.start > range.end {
            return Err(ConfigError::InvalidDate(format!("{} is after {}", start, end)));
        }
        Ok(range)
    }

    pub fn begin_param(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_page() {
        let json = r#"{
            "status": "000",
            "message": "정상",
            "page_no": 1,
            "page_count": 100,
            "total_count": 2,
            "total_page": 1,
            "list": [
                {"corp_code": "00120182", "corp_name": "NH투자증권", "stock_code": "005940",
                 "corp_cls": "Y", "report_nm": "사업보고서 (2023.12)", "rcept_no": "20240320000123",
                 "flr_nm": "NH투자증권", "rcept_dt": "20240320", "rm": "연"},
                {"report_nm": "[기재정정]분기보고서 (2024.03)", "rcept_dt": "20240516"}
            ]
        }"#;
        let page: ListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.status, STATUS_OK);
        assert_eq!(page.total_page, Some(1));
        assert_eq!(page.list.len(), 2);
        assert_eq!(page.list[0].report_name, "사업보고서 (2023.12)");
        assert_eq!(page.list[0].receipt_no.as_deref(), Some("20240320000123"));
        assert_eq!(page.list[1], FilingRecord::new("[기재정정]분기보고서 (2024.03)", "20240516"));
    }

    #[test]
    fn test_no_data_page_has_no_list() {
        let json = r#"{"status": "013", "message": "조회된 데이타가 없습니다."}"#;
        let page: ListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.status, STATUS_NO_DATA);
        assert!(page.list.is_empty());
        assert_eq!(page.total_page, None);
    }

    #[test]
    fn test_company_from_arg() {
        let company: Company = "NH투자증권=00120182".parse().unwrap();
        assert_eq!(company, Company::new("NH투자증권", "00120182"));

        assert!("NH투자증권".parse::<Company>().is_err());
        assert!("NH투자증권=120182".parse::<Company>().is_err());
        assert!("=00120182".parse::<Company>().is_err());
    }

    #[test]
    fn test_date_range_parse() {
        let range = DateRange::parse("20240101", "20241231").unwrap();
        assert_eq!(range.begin_param(), "20240101");
        assert_eq!(range.end_param(), "20241231");

        assert!(DateRange::parse("2024-01-01", "20241231").is_err());
        assert!(DateRange::parse("20241231", "20240101").is_err());
    }

    #[test]
    fn test_missing_date_defaults_to_empty() {
        let record: FilingRecord = serde_json::from_str(r#"{"report_nm": "자율공시"}"#).unwrap();
        assert_eq!(record.filing_date, "");
    }
}
