//! Four-parameter logistic amplification model.
//!
//! `f(x) = L / (1 + exp(-k (x - x0))) + B`
//!
//! Every function evaluates the logistic through [`logistic`], which never
//! forms `exp` of a large positive argument, so extreme `k (x - x0)` saturates
//! to 0 or 1 instead of overflowing.

use crate::types::SigmoidParams;

/// Standard logistic `1 / (1 + exp(-z))`, overflow-free.
#[inline]
pub fn logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Model value at cycle `x`.
#[inline]
pub fn sigmoid(x: f64, p: &SigmoidParams) -> f64 {
    p.amplitude * logistic(p.steepness * (x - p.midpoint)) + p.baseline
}

/// Analytic slope `df/dx = L k s (1 - s)` with `s` the logistic at `x`.
///
/// Equal to `L k e / (1 + e)^2` with `e = exp(-k (x - x0))`, and 0 where that
/// form would be `inf / inf`.
#[inline]
pub fn sigmoid_derivative(x: f64, p: &SigmoidParams) -> f64 {
    let s = logistic(p.steepness * (x - p.midpoint));
    p.amplitude * p.steepness * s * (1.0 - s)
}

/// Partial derivatives of the model at `x` with respect to `[L, k, x0, B]`.
#[inline]
pub fn parameter_gradient(x: f64, p: &SigmoidParams) -> [f64; 4] {
    let dx = x - p.midpoint;
    let s = logistic(p.steepness * dx);
    let slope = p.amplitude * s * (1.0 - s);
    [s, slope * dx, -slope * p.steepness, 1.0]
}

/// Model evaluated at every cycle.
pub fn evaluate(cycles: &[f64], p: &SigmoidParams) -> Vec<f64> {
    cycles.iter().map(|&x| sigmoid(x, p)).collect()
}
