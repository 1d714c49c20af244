// src/main.rs
mod batch;
mod compliance;
mod dart;
mod storage;
mod utils;

use batch::BatchContext;
use clap::Parser;
use compliance::RuleSet;
use dart::client::DartClient;
use dart::models::{Company, DateRange};
use std::path::{Path, PathBuf};
use storage::StorageManager;
use utils::error::ConfigError;
use utils::AppError;

/// Disclosure compliance metrics for companies filing on OpenDART
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Company to analyze as NAME=CORP_CODE (repeatable)
    #[arg(short, long = "company")]
    companies: Vec<Company>,

    /// JSON file with a list of {"name", "corp_code"} objects
    #[arg(long)]
    companies_file: Option<PathBuf>,

    /// First receipt date to include (YYYYMMDD)
    #[arg(long, default_value = "20240101")]
    start_date: String,

    /// Last receipt date to include (YYYYMMDD)
    #[arg(long, default_value = "20241231")]
    end_date: String,

    /// OpenDART API key
    #[arg(long, env = "DART_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory for cached filing lists
    #[arg(long, default_value = "./cache")]
    cache_dir: PathBuf,

    /// Output CSV with one row per company
    #[arg(short, long, default_value = "disclosure_metrics.csv")]
    output: PathBuf,

    /// Optional JSON file for per-category late-filing details
    #[arg(long)]
    late_report: Option<PathBuf>,

    /// Optional JSON rule set replacing the built-in DART tables
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Only use cached filings, never call the registry
    #[arg(long)]
    offline: bool,

    /// Default to debug logging when RUST_LOG is unset
    #[arg(short, long)]
    verbose: bool,
}

fn load_companies(args: &Args) -> Result<Vec<Company>, ConfigError> {
    let mut companies = args.companies.clone();
    if let Some(path) = &args.companies_file {
        companies.extend(read_companies_file(path)?);
    }
    if companies.is_empty() {
        tracing::info!("No companies given, using the default list");
        companies = Company::defaults();
    }
    Ok(companies)
}

fn read_companies_file(path: &Path) -> Result<Vec<Company>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: output={:?} cache_dir={:?}", args.output, args.cache_dir);

    // 2. Resolve configuration
    let range = DateRange::parse(&args.start_date, &args.end_date)?;
    let companies = load_companies(&args)?;
    let rules = match &args.rules {
        Some(path) => RuleSet::from_json_file(path)?,
        None => RuleSet::dart(),
    };
    let api_key = match (&args.api_key, args.offline) {
        (Some(key), _) => key.clone(),
        (None, true) => String::new(),
        (None, false) => return Err(ConfigError::MissingApiKey.into()),
    };

    // 3. Initialize storage and registry client
    let storage = StorageManager::new(&args.cache_dir)?;
    let client = DartClient::new(&api_key)?;

    // 4. Run the batch
    tracing::info!(
        "Analyzing {} companies for {} to {}",
        companies.len(),
        range.begin_param(),
        range.end_param()
    );
    let ctx = BatchContext {
        source: &client,
        storage: &storage,
        rules: &rules,
        range,
        offline: args.offline,
    };
    let report = batch::run_batch(&companies, &ctx).await;

    if report.summaries.is_empty() {
        let causes: Vec<String> = report
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.company, s.cause))
            .collect();
        return Err(AppError::Processing(format!(
            "No company could be analyzed ({})",
            causes.join("; ")
        )));
    }

    // 5. Write outputs
    storage::report::write_summary_csv(&args.output, &report.summaries, &rules)?;
    if let Some(path) = &args.late_report {
        storage::report::write_late_report(path, &report.summaries)?;
    }

    tracing::info!("Saved: {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_companies() {
        let args = Args::parse_from([
            "disclosure-metrics",
            "-c",
            "NH투자증권=00120182",
            "--company",
            "유진증권=00131054",
            "--offline",
        ]);
        let companies = load_companies(&args).unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[1], Company::new("유진증권", "00131054"));
        assert!(args.offline);
    }

    #[test]
    fn test_defaults_when_no_companies() {
        let args = Args::parse_from(["disclosure-metrics"]);
        assert_eq!(load_companies(&args).unwrap(), Company::defaults());
        assert_eq!(args.start_date, "20240101");
        assert_eq!(args.end_date, "20241231");
    }

    #[test]
    fn test_rejects_malformed_company_arg() {
        assert!(Args::try_parse_from(["disclosure-metrics", "-c", "NH투자증권"]).is_err());
    }

    #[test]
    fn test_companies_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.json");
        std::fs::write(&path, r#"[{"name": "미래에셋증권", "corp_code": "00111722"}]"#).unwrap();

        let args = Args::parse_from(["disclosure-metrics", "--companies-file", path.to_str().unwrap()]);
        assert_eq!(load_companies(&args).unwrap(), vec![Company::new("미래에셋증권", "00111722")]);
    }
}
