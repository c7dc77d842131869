//! Sigmoid parameters and fit outputs.

use serde::{Deserialize, Serialize};

/// Parameters of `L / (1 + exp(-k (x - x0))) + B`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SigmoidParams {
    /// L: span between baseline and plateau
    pub amplitude: f64,
    /// k: slope of the exponential phase
    pub steepness: f64,
    /// x0: cycle at half amplitude
    pub midpoint: f64,
    /// B: pre-amplification fluorescence
    pub baseline: f64,
}

impl SigmoidParams {
    pub const fn new(amplitude: f64, steepness: f64, midpoint: f64, baseline: f64) -> Self {
        Self {
            amplitude,
            steepness,
            midpoint,
            baseline,
        }
    }

    /// `[L, k, x0, B]`
    pub const fn to_array(self) -> [f64; 4] {
        [self.amplitude, self.steepness, self.midpoint, self.baseline]
    }

    pub const fn from_array(p: [f64; 4]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Result of fitting the sigmoid model to one well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmoidFit {
    #[serde(flatten)]
    pub params: SigmoidParams,
    /// One-sigma errors in `[L, k, x0, B]` order; NaN when the covariance is singular
    pub parameter_errors: [f64; 4],
    pub r2_score: f64,
    pub rmse: f64,
    /// Model evaluated at each finite cycle
    pub fitted_curve: Vec<f64>,
    /// Observed minus fitted
    pub residuals: Vec<f64>,
    /// Fluorescence level used for threshold-crossing downstream
    pub threshold_value: f64,
    /// Peak slope of the curve after cycle 8
    pub post_cycle8_steepness: f64,
    /// Finite points used in the fit
    pub data_points: usize,
    /// Last minus first finite cycle
    pub cycle_range: f64,
    /// Model evaluations spent by the solver
    pub evaluations: usize,
}
