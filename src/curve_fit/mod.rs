//! Curve Fitting Module
//!
//! Deterministic nonlinear least squares for qPCR amplification curves.
//!
//! - `model` - logistic curve, slope and parameter gradient
//! - `optimizer` - bounded Levenberg-Marquardt over `[L, k, x0, B]`
//! - `fitter` - per-well cleaning, guesses, bounds and fit statistics

pub mod fitter;
pub mod model;
pub mod optimizer;

pub use fitter::{fit_sigmoid, threshold_value};
pub use model::{sigmoid, sigmoid_derivative};

use thiserror::Error;

use crate::types::FailureKind;

// ============================================================================
// Error Types
// ============================================================================

/// Why a well could not be fitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("Insufficient data points: {available} provided, {required} required")]
    InsufficientData { available: usize, required: usize },

    #[error("Insufficient valid data points: {valid} finite, {required} required")]
    InsufficientValidData { valid: usize, required: usize },

    #[error("Cycle and RFU lengths differ: {cycles} cycles, {rfu} readings")]
    LengthMismatch { cycles: usize, rfu: usize },

    #[error("Degenerate {parameter} bounds: lower {lower} is not below upper {upper}")]
    DegenerateBounds {
        parameter: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("Fit did not converge within {evaluations} function evaluations")]
    NotConverged { evaluations: usize },

    #[error("Fit produced non-finite values")]
    NonFinite,
}

impl FitError {
    pub const fn kind(&self) -> FailureKind {
        match self {
            FitError::InsufficientData { .. } | FitError::InsufficientValidData { .. } => {
                FailureKind::InsufficientData
            }
            FitError::LengthMismatch { .. } => FailureKind::LengthMismatch,
            FitError::DegenerateBounds { .. } | FitError::NotConverged { .. } | FitError::NonFinite => {
                FailureKind::FitFailed
            }
        }
    }
}
