// src/compliance/mod.rs
//! Disclosure classification and deadline-compliance engine.
pub mod aggregator;
pub mod classifier;
pub mod deadline;
pub mod rules;
pub mod tagger;
pub mod timeliness;

// Re-export key engine types for convenience
pub use aggregator::{analyze_company, CompanySummary};
pub use rules::RuleSet;
