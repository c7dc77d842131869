//! Bounded Levenberg-Marquardt for the four-parameter sigmoid.
//!
//! Each iteration solves the damped normal equations
//! `(JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr` over the free parameters, projects the
//! trial point back into the box and keeps it only if the residual sum of
//! squares drops. A parameter sitting on a bound whose descent direction
//! points out of the box is held fixed for that iteration (active set).
//!
//! Amplitude and baseline enter the model linearly. After every accepted
//! step they are re-solved in closed form for the current steepness and
//! midpoint; on flat traces the two are nearly collinear and damped steps
//! alone only crawl along that valley.
//!
//! Three stops, each checked on the free parameters only:
//! - `gtol`: the residual vector is orthogonal to every Jacobian column
//!   (largest column cosine, scale free)
//! - `ftol`: an accepted step reduced SSR by less than `ftol × SSR`
//! - `xtol`: an accepted step was shorter than `xtol × (xtol + |p|)`

use nalgebra::{Matrix4, Vector4};
use tracing::trace;

use super::model::{logistic, parameter_gradient, sigmoid};
use super::FitError;
use crate::types::SigmoidParams;

const INITIAL_DAMPING: f64 = 1e-3;
const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e16;

/// Diagonal floor so a flat direction still gets damped.
const DIAGONAL_FLOOR: f64 = 1e-12;

/// Box constraints in `[L, k, x0, B]` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: Vector4<f64>,
    pub upper: Vector4<f64>,
}

impl Bounds {
    pub fn new(lower: [f64; 4], upper: [f64; 4]) -> Self {
        Self {
            lower: Vector4::from(lower),
            upper: Vector4::from(upper),
        }
    }

    /// Project a point into the box.
    pub fn clamp(&self, p: &Vector4<f64>) -> Vector4<f64> {
        Vector4::from_fn(|i, _| p[i].max(self.lower[i]).min(self.upper[i]))
    }

    pub fn contains(&self, p: &Vector4<f64>) -> bool {
        (0..4).all(|i| p[i] >= self.lower[i] && p[i] <= self.upper[i])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SolverSettings {
    pub max_evaluations: usize,
    /// Stop when an accepted step reduces SSR by less than `ftol × SSR`
    pub ftol: f64,
    /// Stop when an accepted step is shorter than `xtol × (xtol + |p|)`
    pub xtol: f64,
    /// Stop when no free Jacobian column has a cosine with the residual
    /// vector above `gtol`
    pub gtol: f64,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub params: SigmoidParams,
    /// Residual sum of squares at `params`
    pub ssr: f64,
    /// Undamped `JᵀJ` at `params`, for the covariance estimate
    pub jtj: Matrix4<f64>,
    pub evaluations: usize,
    pub iterations: usize,
}

fn to_params(p: &Vector4<f64>) -> SigmoidParams {
    SigmoidParams::new(p[0], p[1], p[2], p[3])
}

fn sum_squared_residuals(cycles: &[f64], rfu: &[f64], p: &Vector4<f64>) -> f64 {
    let params = to_params(p);
    cycles
        .iter()
        .zip(rfu)
        .map(|(&x, &y)| {
            let r = y - sigmoid(x, &params);
            r * r
        })
        .sum()
}

/// `JᵀJ` and `Jᵀr` with `J` the model Jacobian and `r = y - f`.
pub fn normal_equations(cycles: &[f64], rfu: &[f64], params: &SigmoidParams) -> (Matrix4<f64>, Vector4<f64>) {
    let mut jtj = Matrix4::zeros();
    let mut jtr = Vector4::zeros();
    for (&x, &y) in cycles.iter().zip(rfu) {
        let j = Vector4::from(parameter_gradient(x, params));
        let r = y - sigmoid(x, params);
        jtj += j * j.transpose();
        jtr += j * r;
    }
    (jtj, jtr)
}

/// Parameters free to move this iteration.
///
/// `jtr` is the descent direction for SSR; a parameter pinned at a bound
/// stays fixed while that direction points outside the box.
fn free_parameters(p: &Vector4<f64>, jtr: &Vector4<f64>, bounds: &Bounds) -> [bool; 4] {
    std::array::from_fn(|i| {
        let at_lower = p[i] <= bounds.lower[i] && jtr[i] < 0.0;
        let at_upper = p[i] >= bounds.upper[i] && jtr[i] > 0.0;
        !(at_lower || at_upper)
    })
}

/// Largest `|J_iᵀr| / (|J_i| |r|)` over the free parameters.
fn gradient_orthogonality(
    jtj: &Matrix4<f64>,
    jtr: &Vector4<f64>,
    ssr: f64,
    free: &[bool; 4],
) -> f64 {
    let residual_norm = ssr.sqrt();
    (0..4)
        .filter(|&i| free[i] && jtj[(i, i)] > 0.0)
        .map(|i| jtr[i].abs() / (jtj[(i, i)].sqrt() * residual_norm))
        .fold(0.0, f64::max)
}

/// Least-squares amplitude and baseline for the steepness and midpoint of
/// `p`, projected into the box. `None` when the logistic is constant over
/// the cycles and the two are not separable.
fn refine_linear(
    cycles: &[f64],
    rfu: &[f64],
    p: &Vector4<f64>,
    bounds: &Bounds,
) -> Option<Vector4<f64>> {
    let n = cycles.len() as f64;
    let shape: Vec<f64> = cycles.iter().map(|&x| logistic(p[1] * (x - p[2]))).collect();
    let shape_mean = shape.iter().sum::<f64>() / n;
    let rfu_mean = rfu.iter().sum::<f64>() / n;

    let (mut covariance, mut variance) = (0.0, 0.0);
    for (&s, &y) in shape.iter().zip(rfu) {
        covariance += (s - shape_mean) * (y - rfu_mean);
        variance += (s - shape_mean) * (s - shape_mean);
    }
    if !(variance > 0.0) {
        return None;
    }

    let amplitude = (covariance / variance).max(bounds.lower[0]).min(bounds.upper[0]);
    let baseline = (rfu_mean - amplitude * shape_mean)
        .max(bounds.lower[3])
        .min(bounds.upper[3]);
    let refined = Vector4::new(amplitude, p[1], p[2], baseline);
    refined.iter().all(|v| v.is_finite()).then_some(refined)
}

fn damped_step(
    jtj: &Matrix4<f64>,
    jtr: &Vector4<f64>,
    lambda: f64,
    free: &[bool; 4],
) -> Option<Vector4<f64>> {
    let mut m = *jtj;
    let mut rhs = *jtr;
    for i in 0..4 {
        if free[i] {
            m[(i, i)] += lambda * jtj[(i, i)].max(DIAGONAL_FLOOR);
        } else {
            for j in 0..4 {
                m[(i, j)] = 0.0;
                m[(j, i)] = 0.0;
            }
            m[(i, i)] = 1.0;
            rhs[i] = 0.0;
        }
    }
    m.lu().solve(&rhs).filter(|step| step.iter().all(|v| v.is_finite()))
}

enum StepOutcome {
    Accepted { converged: bool },
    /// Damping saturated without finding a downhill step
    Stalled,
    BudgetExhausted,
}

/// Minimize the residual sum of squares inside `bounds`, starting at `initial`.
pub fn minimize(
    cycles: &[f64],
    rfu: &[f64],
    initial: &SigmoidParams,
    bounds: &Bounds,
    settings: &SolverSettings,
) -> Result<Solution, FitError> {
    let mut p = bounds.clamp(&Vector4::from(initial.to_array()));
    let mut ssr = sum_squared_residuals(cycles, rfu, &p);
    let mut evaluations = 1;
    if !ssr.is_finite() {
        return Err(FitError::NonFinite);
    }

    let mut lambda = INITIAL_DAMPING;
    let mut iterations = 0;

    while ssr > 0.0 {
        let (jtj, jtr) = normal_equations(cycles, rfu, &to_params(&p));
        let free = free_parameters(&p, &jtr, bounds);
        if gradient_orthogonality(&jtj, &jtr, ssr, &free) <= settings.gtol {
            break;
        }
        iterations += 1;

        let outcome = loop {
            if evaluations >= settings.max_evaluations {
                break StepOutcome::BudgetExhausted;
            }
            let Some(step) = damped_step(&jtj, &jtr, lambda, &free) else {
                lambda *= 10.0;
                if lambda > MAX_DAMPING {
                    break StepOutcome::Stalled;
                }
                continue;
            };

            let candidate = bounds.clamp(&(p + step));
            let candidate_ssr = sum_squared_residuals(cycles, rfu, &candidate);
            evaluations += 1;

            if candidate_ssr.is_finite() && candidate_ssr < ssr {
                let (candidate, candidate_ssr) =
                    match refine_linear(cycles, rfu, &candidate, bounds) {
                        Some(refined) if evaluations < settings.max_evaluations => {
                            let refined_ssr = sum_squared_residuals(cycles, rfu, &refined);
                            evaluations += 1;
                            if refined_ssr < candidate_ssr {
                                (refined, refined_ssr)
                            } else {
                                (candidate, candidate_ssr)
                            }
                        }
                        _ => (candidate, candidate_ssr),
                    };
                let reduction = ssr - candidate_ssr;
                let step_norm = (candidate - p).norm();
                let converged = reduction <= settings.ftol * ssr
                    || step_norm <= settings.xtol * (settings.xtol + p.norm());
                p = candidate;
                ssr = candidate_ssr;
                lambda = (lambda / 10.0).max(MIN_DAMPING);
                break StepOutcome::Accepted { converged };
            }

            lambda *= 10.0;
            if lambda > MAX_DAMPING {
                break StepOutcome::Stalled;
            }
        };

        match outcome {
            StepOutcome::Accepted { converged: true } | StepOutcome::Stalled => break,
            StepOutcome::Accepted { converged: false } => {}
            StepOutcome::BudgetExhausted => {
                return Err(FitError::NotConverged { evaluations });
            }
        }
        trace!(iterations, evaluations, ssr, lambda, "LM iteration");
    }

    let params = to_params(&p);
    if !params.is_finite() || !ssr.is_finite() {
        return Err(FitError::NonFinite);
    }
    let (jtj, _) = normal_equations(cycles, rfu, &params);
    Ok(Solution {
        params,
        ssr,
        jtj,
        evaluations,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve_fit::model::evaluate;

    fn settings() -> SolverSettings {
        SolverSettings {
            max_evaluations: 5_000,
            ftol: 1e-12,
            xtol: 1e-12,
            gtol: 1e-12,
        }
    }

    fn wide_bounds() -> Bounds {
        Bounds::new([1.0, 0.01, 1.0, -500.0], [5_000.0, 10.0, 40.0, 500.0])
    }

    #[test]
    fn test_recovers_exact_parameters() {
        let truth = SigmoidParams::new(900.0, 0.6, 22.0, 40.0);
        let cycles: Vec<f64> = (1..=40).map(f64::from).collect();
        let rfu = evaluate(&cycles, &truth);
        let start = SigmoidParams::new(1_000.0, 0.5, 20.0, 40.0);

        let sol = minimize(&cycles, &rfu, &start, &wide_bounds(), &settings()).unwrap();
        assert!((sol.params.amplitude - 900.0).abs() < 1e-3, "{:?}", sol.params);
        assert!((sol.params.steepness - 0.6).abs() < 1e-6);
        assert!((sol.params.midpoint - 22.0).abs() < 1e-5);
        assert!((sol.params.baseline - 40.0).abs() < 1e-3);
        assert!(sol.ssr < 1e-6);
    }

    #[test]
    fn test_solution_respects_bounds() {
        // True amplitude 900 lies above the cap of 500
        let truth = SigmoidParams::new(900.0, 0.6, 22.0, 40.0);
        let cycles: Vec<f64> = (1..=40).map(f64::from).collect();
        let rfu = evaluate(&cycles, &truth);
        let bounds = Bounds::new([1.0, 0.01, 1.0, -500.0], [500.0, 10.0, 40.0, 500.0]);
        let start = SigmoidParams::new(300.0, 0.5, 20.0, 40.0);

        let sol = minimize(&cycles, &rfu, &start, &bounds, &settings()).unwrap();
        assert!(sol.params.amplitude > 499.0, "{:?}", sol.params);
        assert!(bounds.contains(&Vector4::from(sol.params.to_array())));
    }

    #[test]
    fn test_out_of_box_start_is_projected() {
        let bounds = wide_bounds();
        let p = bounds.clamp(&Vector4::new(10_000.0, 0.0, 50.0, 0.0));
        assert!(bounds.contains(&p));
        assert!((p[0] - 5_000.0).abs() < f64::EPSILON);
        assert!((p[1] - 0.01).abs() < f64::EPSILON);
        assert!((p[2] - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_budget_exhaustion_is_an_error() {
        let truth = SigmoidParams::new(900.0, 0.6, 22.0, 40.0);
        let cycles: Vec<f64> = (1..=40).map(f64::from).collect();
        let rfu = evaluate(&cycles, &truth);
        let start = SigmoidParams::new(4_000.0, 5.0, 5.0, -300.0);
        let tight = SolverSettings {
            max_evaluations: 2,
            ..settings()
        };

        let err = minimize(&cycles, &rfu, &start, &wide_bounds(), &tight).unwrap_err();
        assert!(matches!(err, FitError::NotConverged { evaluations: 2 }));
    }

    #[test]
    fn test_linear_refinement_recovers_amplitude_and_baseline() {
        let truth = SigmoidParams::new(700.0, 0.45, 19.0, 25.0);
        let cycles: Vec<f64> = (1..=40).map(f64::from).collect();
        let rfu = evaluate(&cycles, &truth);
        let off = Vector4::new(300.0, 0.45, 19.0, 90.0);

        let refined = refine_linear(&cycles, &rfu, &off, &wide_bounds()).unwrap();
        assert!((refined[0] - 700.0).abs() < 1e-6);
        assert!((refined[3] - 25.0).abs() < 1e-6);
        assert!((refined[1] - 0.45).abs() < f64::EPSILON);
        assert!((refined[2] - 19.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_constant_shape_is_not_refined() {
        // Every cycle sits deep on the upper tail of the logistic
        let cycles: Vec<f64> = (30..=40).map(f64::from).collect();
        let rfu = vec![10.0; cycles.len()];
        let p = Vector4::new(100.0, 10.0, 1.0, 0.0);
        assert!(refine_linear(&cycles, &rfu, &p, &wide_bounds()).is_none());
    }

    #[test]
    fn test_flat_noisy_traces_converge() {
        use rand::prelude::*;

        let cycles: Vec<f64> = (1..=40).map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let settings = SolverSettings {
            max_evaluations: 5_000,
            ftol: 1e-8,
            xtol: 1e-8,
            gtol: 1e-8,
        };

        for _ in 0..200 {
            let rfu: Vec<f64> = cycles
                .iter()
                .map(|_| 50.0 + rng.gen_range(-5.0..5.0))
                .collect();
            let lo = rfu.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = rfu.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = hi - lo;
            let bounds = Bounds::new(
                [0.1 * range, 0.01, 1.0, lo - range],
                [5.0 * range, 10.0, 40.0, hi],
            );
            let start = SigmoidParams::new(1.1 * range, 0.5, 21.0, lo);

            let sol = minimize(&cycles, &rfu, &start, &bounds, &settings).unwrap();
            assert!(sol.evaluations < 1_000, "{} evaluations", sol.evaluations);
        }
    }

    #[test]
    fn test_orthogonality_ignores_held_parameters() {
        let jtj = Matrix4::identity() * 4.0;
        let jtr = Vector4::new(0.0, 3.0, 0.0, 0.0);
        assert!((gradient_orthogonality(&jtj, &jtr, 9.0, &[true; 4]) - 0.5).abs() < 1e-12);
        let held = [true, false, true, true];
        assert!(gradient_orthogonality(&jtj, &jtr, 9.0, &held).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pinned_parameter_is_held() {
        let p = Vector4::new(5_000.0, 0.5, 20.0, 0.0);
        let jtr = Vector4::new(1.0, -1.0, 1.0, 1.0);
        let free = free_parameters(&p, &jtr, &wide_bounds());
        assert_eq!(free, [false, true, true, true]);
    }
}
