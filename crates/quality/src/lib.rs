//! `pricematch-quality` — Match quality engine for cross-store price comparison.
//!
//! Pure engine crate: receives pre-loaded match groups, returns per-group
//! evaluations and a review report. No CLI or file IO.

pub mod classify;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod model;
pub mod price;
pub mod report;
pub mod rules;
pub mod similarity;

pub use config::QualityConfig;
pub use engine::{evaluate_group, run};
pub use error::{GroupError, QualityError};
pub use model::{GroupEvaluation, Issue, IssueKind, Listing, MatchGroup, QualityReport, QualityRun, QualityTier};
