//! testlens-core: item analysis and student performance engine.
//!
//! This crate defines the assessment data model, the Classical Test Theory
//! indices (difficulty and discrimination), per-student performance
//! analysis, and the read interfaces the engine consumes its records through.

pub mod config;
pub mod difficulty;
pub mod discrimination;
pub mod engine;
pub mod error;
pub mod item_analysis;
pub mod model;
pub mod parser;
pub mod performance;
pub mod report;
pub mod statistics;
pub mod store;
pub mod traits;

pub use config::AnalysisConfig;
pub use engine::AnalysisEngine;
pub use error::AnalysisError;
pub use performance::{render_summary, PerformanceAnalyzer, PerformanceReport};

/// Round a ratio to four decimal places.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
