//! qpcr-scurve: qPCR amplification curve analysis
//!
//! Decides, per well, whether a fluorescence trace is a genuine sigmoidal
//! amplification curve.
//!
//! ## Architecture
//!
//! - **Curve Fit**: bounded Levenberg-Marquardt fit of `L / (1 + exp(-k (x - x0))) + B`
//! - **Quality Filters**: start cycle, amplitude, plateau, SNR and growth screens
//! - **Anomaly Detector**: pathology tags on the raw trace
//! - **Classifier**: base criteria, enhanced verdict and first rejection reason
//! - **Batch Driver**: a plate of wells in parallel, with summary and export

pub mod analysis;
pub mod config;
pub mod curve_fit;
pub mod export;
pub mod synthetic;
pub mod types;

// Re-export configuration
pub use config::{AnalysisConfig, ConfigError, QualityOverrides};

// Re-export commonly used types
pub use types::{
    AnomalyTag, BatchReport, Classification, Plate, ProcessedBatch, QualityFilterReport,
    SigmoidFit, SigmoidParams, ValidationReport, WellAnalysis, WellFailure, WellResult,
    WellTrace,
};

// Re-export the analysis entry points
pub use analysis::{
    analyze_well, batch_analyze, classify, detect_curve_anomalies, process_wells,
    run_quality_filters, validate_wells, ProcessError,
};
pub use curve_fit::{fit_sigmoid, FitError};
