//! Analysis pipeline: progress events, result types, and the orchestrator.
//!
//! # Module Structure
//!
//! - [`progress`] - Progress events, callbacks, and the percent mapping
//! - [`types`] - `AnalysisResult` and aggregate stats
//! - [`engine`] - The `Analyzer` state machine and pipeline

pub mod engine;
pub mod progress;
pub mod types;

pub use engine::{AnalysisError, AnalysisState, Analyzer};
pub use progress::{emit, stage, stage_percent, AnalysisProgress, ListKind, ProgressCallback, ProgressFn};
pub use types::{AnalysisResult, AnalysisStats};
