// src/storage/mod.rs
pub mod report;

use crate::dart::models::{Company, FilingRecord};
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk cache of fetched filing lists, one JSON file per company.
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Path of the cache file for a company, e.g. `cache/NH투자증권_disclosures.json`
    pub fn cache_path(&self, company: &Company) -> PathBuf {
        let safe_name: String = company
            .name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.base_dir.join(format!("{}_disclosures.json", safe_name))
    }

    /// Loads a previously cached filing list. `Ok(None)` means a cache miss.
    pub fn load_filings(&self, company: &Company) -> Result<Option<Vec<FilingRecord>>, StorageError> {
        let path = self.cache_path(company);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let filings: Vec<FilingRecord> = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded {} cached filings from {}", filings.len(), path.display());
        Ok(Some(filings))
    }

    /// Writes a company's filing list to its cache file (pretty-printed, UTF-8).
    pub fn save_filings(&self, company: &Company, filings: &[FilingRecord]) -> Result<PathBuf, StorageError> {
        let path = self.cache_path(company);
        let json = serde_json::to_string_pretty(filings)?;
        fs::write(&path, json)?;

        tracing::info!("Cached {} filings to {}", filings.len(), path.display());
        Ok(path)
    }
}
