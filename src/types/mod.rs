//! Shared data structures for qPCR curve analysis
//!
//! This module defines the types that flow through the analysis pipeline:
//! - Input: WellTrace (cycles + RFU) and the Plate map
//! - Fitting: SigmoidParams, SigmoidFit
//! - Screening: QualityFilterReport and its five checks, AnomalyTag
//! - Output: WellResult (analysis or failure), BatchReport

mod anomaly;
mod fit;
mod quality;
mod report;
mod well;

pub use anomaly::*;
pub use fit::*;
pub use quality::*;
pub use report::*;
pub use well::*;
