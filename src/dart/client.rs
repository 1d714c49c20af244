// src/dart/client.rs
use crate::dart::models::{DateRange, FilingRecord, ListResponse, STATUS_NO_DATA, STATUS_OK};
use crate::dart::FilingSource;
use crate::utils::error::DartError;
use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;

const DART_LIST_URL: &str = "https://opendart.fss.or.kr/api/list.json";
const PAGE_SIZE: u32 = 100;
// OpenDART caps keys at 20,000 requests/day and throttles bursts. Stay polite.
const DART_REQUEST_DELAY_MS: u64 = 200;
const DART_TIMEOUT_SECS: u64 = 30;

/// Client for the OpenDART disclosure search endpoint.
pub struct DartClient {
    http: reqwest::Client,
    api_key: String,
}

impl DartClient {
    pub fn new(api_key: &str) -> Result<Self, DartError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DART_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
        })
    }

    /// Fetches one page of disclosures for a company.
    async fn fetch_page(&self, corp_code: &str, range: &DateRange, page_no: u32) -> Result<ListResponse, DartError> {
        // --- Basic Rate Limiting ---
        tokio::time::sleep(Duration::from_millis(DART_REQUEST_DELAY_MS)).await;

        let page_no = page_no.to_string();
        let page_count = PAGE_SIZE.to_string();
        let begin = range.begin_param();
        let end = range.end_param();
        let params = [
            ("crtfc_key", self.api_key.as_str()),
            ("corp_code", corp_code),
            ("bgn_de", begin.as_str()),
            ("end_de", end.as_str()),
            ("last_reprt_at", "Y"),
            ("page_no", page_no.as_str()),
            ("page_count", page_count.as_str()),
        ];

        tracing::debug!("Requesting page {} for corp_code {}", page_no, corp_code);
        let response = self
            .http
            .get(DART_LIST_URL)
            .header(header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await?; // Propagates reqwest::Error as DartError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for corp_code {}", status, corp_code);
            return Err(DartError::Http(status));
        }

        let page: ListResponse = response
            .json()
            .await
            .map_err(|e| DartError::Parse(e.to_string()))?;
        Ok(page)
    }
}

#[async_trait]
impl FilingSource for DartClient {
    /// Walks every page of the search result and returns the full list.
    async fn fetch_all_filings(&self, corp_code: &str, range: &DateRange) -> Result<Vec<FilingRecord>, DartError> {
        let mut filings = Vec::new();
        let mut page_no = 1;

        loop {
            let page = self.fetch_page(corp_code, range, page_no).await?;
            let total_page = check_page(&page)?;
            tracing::debug!(
                "Page {}/{} for {}: {} filings ({} total)",
                page_no,
                total_page,
                corp_code,
                page.list.len(),
                page.total_count.unwrap_or(0)
            );
            filings.extend(page.list);

            if page_no >= total_page {
                break;
            }
            page_no += 1;
        }

        tracing::info!("Fetched {} filings for corp_code {}", filings.len(), corp_code);
        Ok(filings)
    }
}

/// Validates a page's status and returns the total page count.
///
/// A "no data" status is an empty single-page result.
fn check_page(page: &ListResponse) -> Result<u32, DartError> {
    match page.status.as_str() {
        STATUS_OK => Ok(page.total_page.unwrap_or(1).max(1)),
        STATUS_NO_DATA => Ok(1),
        _ => Err(DartError::Api {
            status: page.status.clone(),
            message: page.message.clone(),
        }),
    }
}
