//! Sigmoid fit for a single well: cleaning, data-driven guesses and bounds,
//! the bounded solve, then goodness-of-fit and derived values.

use nalgebra::Matrix4;
use tracing::debug;

use super::model::{evaluate, sigmoid_derivative};
use super::optimizer::{minimize, Bounds, SolverSettings};
use super::FitError;
use crate::config::FitConfig;
use crate::types::{SigmoidFit, SigmoidParams};

const PARAMETER_NAMES: [&str; 4] = ["amplitude", "steepness", "midpoint", "baseline"];

/// Min and max of a non-empty finite slice.
fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Fit `L / (1 + exp(-k (x - x0))) + B` to one well.
///
/// Non-finite points are dropped from both sequences before fitting. Errors
/// are local to the well; the caller turns them into failure records.
pub fn fit_sigmoid(cycles: &[f64], rfu: &[f64], config: &FitConfig) -> Result<SigmoidFit, FitError> {
    if cycles.len() != rfu.len() {
        return Err(FitError::LengthMismatch {
            cycles: cycles.len(),
            rfu: rfu.len(),
        });
    }
    if cycles.len() < config.min_points {
        return Err(FitError::InsufficientData {
            available: cycles.len(),
            required: config.min_points,
        });
    }

    let (x, y): (Vec<f64>, Vec<f64>) = cycles
        .iter()
        .zip(rfu)
        .filter(|(c, r)| c.is_finite() && r.is_finite())
        .map(|(&c, &r)| (c, r))
        .unzip();
    if x.len() < config.min_points {
        return Err(FitError::InsufficientValidData {
            valid: x.len(),
            required: config.min_points,
        });
    }

    let n = x.len();
    let (rfu_min, rfu_max) = min_max(&y);
    let (cycle_min, cycle_max) = min_max(&x);
    let rfu_range = rfu_max - rfu_min;

    let lower = [
        rfu_range * config.amplitude_lower_factor,
        config.steepness_lower,
        cycle_min,
        rfu_min - rfu_range * config.baseline_margin_fraction,
    ];
    let upper = [
        rfu_range * config.amplitude_upper_factor,
        config.steepness_upper,
        cycle_max,
        rfu_max,
    ];
    for (i, &name) in PARAMETER_NAMES.iter().enumerate() {
        if !(lower[i] < upper[i]) {
            return Err(FitError::DegenerateBounds {
                parameter: name,
                lower: lower[i],
                upper: upper[i],
            });
        }
    }

    let initial = SigmoidParams::new(
        rfu_range * config.amplitude_guess_factor,
        config.initial_steepness,
        x[n / 2],
        rfu_min,
    );
    let settings = SolverSettings {
        max_evaluations: config.max_evaluations,
        ftol: config.ftol,
        xtol: config.xtol,
        gtol: config.gtol,
    };
    let solution = minimize(&x, &y, &initial, &Bounds::new(lower, upper), &settings)?;
    let params = solution.params;

    let fitted_curve = evaluate(&x, &params);
    let residuals: Vec<f64> = y.iter().zip(&fitted_curve).map(|(o, f)| o - f).collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let mean = y.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let r2_score = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };
    let rmse = (ss_res / n as f64).sqrt();

    let parameter_errors = parameter_errors(&solution.jtj, ss_res, n);
    let threshold_value = threshold_value(&params);
    let post_cycle8_steepness = post_cycle_steepness(&x, &params, config);

    debug!(
        points = n,
        evaluations = solution.evaluations,
        iterations = solution.iterations,
        r2 = r2_score,
        amplitude = params.amplitude,
        steepness = params.steepness,
        midpoint = params.midpoint,
        "Sigmoid fit converged"
    );

    Ok(SigmoidFit {
        params,
        parameter_errors,
        r2_score,
        rmse,
        fitted_curve,
        residuals,
        threshold_value,
        post_cycle8_steepness,
        data_points: n,
        cycle_range: cycle_max - cycle_min,
        evaluations: solution.evaluations,
    })
}

/// One-sigma errors from `(JᵀJ)⁻¹ · SSR / (n − 4)`; NaN when not estimable.
fn parameter_errors(jtj: &Matrix4<f64>, ss_res: f64, n: usize) -> [f64; 4] {
    let dof = n.saturating_sub(4);
    if dof == 0 {
        return [f64::NAN; 4];
    }
    let s_sq = ss_res / dof as f64;
    match jtj.try_inverse() {
        Some(cov) => std::array::from_fn(|i| {
            let var = cov[(i, i)] * s_sq;
            if var.is_finite() && var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        }),
        None => {
            debug!("Singular JᵀJ, parameter errors unavailable");
            [f64::NAN; 4]
        }
    }
}

/// Half-amplitude level, kept within 10–90% of the fitted span.
pub fn threshold_value(p: &SigmoidParams) -> f64 {
    let low = p.baseline + 0.10 * p.amplitude;
    let high = p.baseline + 0.90 * p.amplitude;
    (p.amplitude / 2.0 + p.baseline).max(low).min(high)
}

/// Max model slope over cycles at or after the window start, or `k` when the
/// window holds too few cycles.
fn post_cycle_steepness(cycles: &[f64], p: &SigmoidParams, config: &FitConfig) -> f64 {
    let window: Vec<f64> = cycles
        .iter()
        .copied()
        .filter(|&c| c >= config.steepness_window_start_cycle)
        .collect();
    if window.len() < config.steepness_window_min_points {
        return p.steepness;
    }
    window
        .iter()
        .map(|&c| sigmoid_derivative(c, p))
        .fold(f64::NEG_INFINITY, f64::max)
}
