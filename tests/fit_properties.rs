//! Curve fit properties on seeded synthetic curves.
//!
//! Parameter recovery under noise, the threshold window, determinism, and
//! R² falling as injected noise grows.

use qpcr_scurve::config::FitConfig;
use qpcr_scurve::curve_fit::{fit_sigmoid, threshold_value};
use qpcr_scurve::synthetic::{synthetic_plate, SyntheticCurve, DEFAULT_CYCLES};
use qpcr_scurve::SigmoidParams;
use rand::prelude::*;
use rand_distr::{Distribution, StandardNormal};

fn family() -> Vec<SigmoidParams> {
    vec![
        SigmoidParams::new(500.0, 0.5, 20.0, 40.0),
        SigmoidParams::new(800.0, 0.7, 24.0, 60.0),
        SigmoidParams::new(1000.0, 0.4, 18.0, 30.0),
        SigmoidParams::new(1500.0, 0.6, 26.0, 80.0),
        SigmoidParams::new(1200.0, 0.9, 22.0, 50.0),
    ]
}

#[test]
fn noise_free_family_is_recovered() {
    for truth in family() {
        let trace = SyntheticCurve::new(truth, DEFAULT_CYCLES, 0.0).noiseless();
        let fit = fit_sigmoid(&trace.cycles, &trace.rfu, &FitConfig::default()).unwrap();

        assert!(fit.r2_score > 0.95, "{truth:?}: R² = {}", fit.r2_score);
        assert!((fit.params.amplitude - truth.amplitude).abs() < 0.01 * truth.amplitude);
        assert!((fit.params.steepness - truth.steepness).abs() < 0.01 * truth.steepness);
        assert!((fit.params.midpoint - truth.midpoint).abs() < 0.05);
        assert!((fit.params.baseline - truth.baseline).abs() < 1.0);
    }
}

#[test]
fn noisy_parameters_recovered_within_noise_tolerance() {
    let mut rng = StdRng::seed_from_u64(11);
    for truth in family() {
        let noise_sd = 0.01 * truth.amplitude;
        let trace = SyntheticCurve::new(truth, DEFAULT_CYCLES, noise_sd).generate(&mut rng);
        let fit = fit_sigmoid(&trace.cycles, &trace.rfu, &FitConfig::default()).unwrap();

        assert!(fit.r2_score > 0.99, "{truth:?}: R² = {}", fit.r2_score);
        assert!(
            (fit.params.amplitude - truth.amplitude).abs() < 0.05 * truth.amplitude,
            "{truth:?} vs {:?}",
            fit.params
        );
        assert!((fit.params.steepness - truth.steepness).abs() < 0.15 * truth.steepness);
        assert!((fit.params.midpoint - truth.midpoint).abs() < 0.5);
        assert!((fit.params.baseline - truth.baseline).abs() < 5.0 * noise_sd);
        assert!(fit.parameter_errors.iter().all(|e| e.is_finite() && *e >= 0.0));
        assert!(fit.rmse < 2.0 * noise_sd);
    }
}

#[test]
fn threshold_value_stays_in_growth_window() {
    let plate = synthetic_plate(99, 48, DEFAULT_CYCLES, &[]);
    let config = FitConfig::default();
    let mut fitted = 0;

    for trace in plate.values() {
        let Ok(fit) = fit_sigmoid(&trace.cycles, &trace.rfu, &config) else {
            continue;
        };
        fitted += 1;
        let p = fit.params;
        let low = p.baseline + 0.10 * p.amplitude;
        let high = p.baseline + 0.90 * p.amplitude;
        assert!(
            fit.threshold_value >= low - 1e-9 && fit.threshold_value <= high + 1e-9,
            "threshold {} outside [{low}, {high}]",
            fit.threshold_value
        );
        assert!((threshold_value(&p) - fit.threshold_value).abs() < f64::EPSILON);
    }
    assert!(fitted > 0);
}

#[test]
fn fitting_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(5);
    let trace = SyntheticCurve::new(SigmoidParams::new(900.0, 0.55, 21.0, 45.0), 40, 15.0)
        .generate(&mut rng);
    let a = fit_sigmoid(&trace.cycles, &trace.rfu, &FitConfig::default()).unwrap();
    let b = fit_sigmoid(&trace.cycles, &trace.rfu, &FitConfig::default()).unwrap();
    assert_eq!(a.params, b.params);
    assert_eq!(a.evaluations, b.evaluations);
    assert_eq!(a.residuals, b.residuals);
}

#[test]
fn mean_r2_does_not_rise_with_noise() {
    let config = FitConfig::default();
    let curves: Vec<_> = family()
        .into_iter()
        .map(|p| SyntheticCurve::new(p, DEFAULT_CYCLES, 0.0).noiseless())
        .collect();

    // One fixed standard-normal draw per point, scaled by each noise level
    let mut rng = StdRng::seed_from_u64(17);
    let draws: Vec<Vec<f64>> = curves
        .iter()
        .map(|c| {
            (0..c.len())
                .map(|_| -> f64 { StandardNormal.sample(&mut rng) })
                .collect()
        })
        .collect();

    let mean_r2 = |sigma: f64| -> f64 {
        let total: f64 = curves
            .iter()
            .zip(&draws)
            .map(|(curve, z)| {
                let rfu: Vec<f64> = curve.rfu.iter().zip(z).map(|(y, z)| y + sigma * z).collect();
                fit_sigmoid(&curve.cycles, &rfu, &config).map_or(0.0, |f| f.r2_score)
            })
            .sum();
        total / curves.len() as f64
    };

    let levels = [0.0, 5.0, 20.0, 50.0];
    let scores: Vec<f64> = levels.iter().map(|&s| mean_r2(s)).collect();
    for pair in scores.windows(2) {
        assert!(pair[1] <= pair[0], "mean R² rose with noise: {scores:?}");
    }
}
