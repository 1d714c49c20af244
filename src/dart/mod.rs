// src/dart/mod.rs
pub mod client;
pub mod models;

use crate::utils::error::DartError;
use async_trait::async_trait;
use models::{DateRange, FilingRecord};

/// Anything that can produce a company's complete, already-paginated filing list.
#[async_trait]
pub trait FilingSource: Send + Sync {
    async fn fetch_all_filings(&self, corp_code: &str, range: &DateRange) -> Result<Vec<FilingRecord>, DartError>;
}
