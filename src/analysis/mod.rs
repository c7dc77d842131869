//! Analysis Module
//!
//! Everything after the curve fit:
//! - `quality_filter` - five heuristic screens on the raw trace
//! - `anomaly` - curve pathology tags
//! - `classifier` - base criteria, enhanced verdict and rejection reason
//! - `pipeline` - one well end to end
//! - `batch` - a plate of wells, upload validation and processing metadata

pub mod anomaly;
pub mod batch;
pub mod classifier;
pub mod pipeline;
pub mod quality_filter;
pub mod stats;

pub use anomaly::detect_curve_anomalies;
pub use batch::{batch_analyze, process_wells, validate_wells};
pub use classifier::classify;
pub use pipeline::analyze_well;
pub use quality_filter::run_quality_filters;

use thiserror::Error;

/// Errors for a whole upload; per-well problems become failure records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("No data provided")]
    NoData,
}
