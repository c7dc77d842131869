//! Per-well results and batch aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AnomalyTag, QualityFilterReport, SigmoidFit};
use crate::config::QualityFilterConfig;

// ============================================================================
// Classification
// ============================================================================

/// Final verdict for a fitted well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Fit-only criteria (R², steepness, fitted amplitude)
    pub original_s_curve_criteria: bool,
    /// Fit criteria AND every quality filter
    pub is_good_scurve: bool,
    /// First violated rule when the curve is rejected
    pub rejection_reason: Option<String>,
}

// ============================================================================
// Well Results
// ============================================================================

/// Full analysis record for a well that could be fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellAnalysis {
    #[serde(flatten)]
    pub fit: SigmoidFit,
    #[serde(flatten)]
    pub classification: Classification,
    pub quality_filters: QualityFilterReport,
    pub anomalies: Vec<AnomalyTag>,
    pub raw_cycles: Vec<f64>,
    pub raw_rfu: Vec<f64>,
}

/// Why a well produced no fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InsufficientData,
    LengthMismatch,
    FitFailed,
    /// Analysis panicked and was isolated by the batch driver
    Panicked,
}

/// Error record for a well that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellFailure {
    pub error: String,
    pub kind: FailureKind,
    /// Always false; present so every result carries the flag
    pub is_good_scurve: bool,
    #[serde(default)]
    pub anomalies: Vec<AnomalyTag>,
}

impl WellFailure {
    pub fn new(kind: FailureKind, error: impl Into<String>, anomalies: Vec<AnomalyTag>) -> Self {
        Self {
            error: error.into(),
            kind,
            is_good_scurve: false,
            anomalies,
        }
    }
}

/// Outcome for one well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WellResult {
    Analyzed(Box<WellAnalysis>),
    Failed(WellFailure),
}

impl WellResult {
    pub fn is_good_scurve(&self) -> bool {
        match self {
            WellResult::Analyzed(a) => a.classification.is_good_scurve,
            WellResult::Failed(_) => false,
        }
    }

    pub fn anomalies(&self) -> &[AnomalyTag] {
        match self {
            WellResult::Analyzed(a) => &a.anomalies,
            WellResult::Failed(f) => &f.anomalies,
        }
    }

    pub fn analysis(&self) -> Option<&WellAnalysis> {
        match self {
            WellResult::Analyzed(a) => Some(a),
            WellResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&WellFailure> {
        match self {
            WellResult::Analyzed(_) => None,
            WellResult::Failed(f) => Some(f),
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.analysis()
            .and_then(|a| a.classification.rejection_reason.as_deref())
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Cycle span of the plate, taken from the first well with cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleInfo {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_wells: usize,
    pub good_curves_count: usize,
    pub success_rate_percent: f64,
    /// Quality thresholds in effect for this batch
    pub quality_filter_params: QualityFilterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub individual_results: BTreeMap<String, WellResult>,
    /// Wells classified as good S-curves, in identifier order
    pub good_curves: Vec<String>,
    pub cycle_info: Option<CycleInfo>,
    pub summary: BatchSummary,
}

/// Upload-level metadata attached by [`crate::analysis::process_wells`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    /// Point count of the first well
    pub data_points_per_well: usize,
    pub processing_timestamp: DateTime<Utc>,
    pub total_wells_processed: usize,
    /// Quality thresholds the batch ran with
    pub quality_filters_applied: QualityFilterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedBatch {
    #[serde(flatten)]
    pub report: BatchReport,
    pub processing_info: ProcessingInfo,
}
