//! Curve pathology scan.
//!
//! Runs independently of the fit and never changes the classification; the
//! tags are attached to the well result for the analyst.
//!
//! The data-sufficiency short circuit uses the same point minimum as the
//! fitter, so a well too short to fit always carries `insufficient_data`.
//!
//! Thresholds adapt to the trace: each uses `max(floor, fraction × range)` so
//! high-signal wells are judged on their own scale.
//!
//! `negative_rfu_values` and `negative_amplification` are computed but always
//! withheld from the returned list. Background-subtracted instruments produce
//! negative readings routinely and the tags flooded result tables. This needs
//! product-owner review before the tags are surfaced again.

use tracing::debug;

use super::stats::{diffs, head, max_value, min_value, population_std};
use crate::config::AnomalyConfig;
use crate::types::AnomalyTag;

/// Reported anomaly tags for one well.
pub fn detect_curve_anomalies(
    cycles: &[f64],
    rfu: &[f64],
    min_points: usize,
    config: &AnomalyConfig,
) -> Vec<AnomalyTag> {
    let (reported, suppressed): (Vec<AnomalyTag>, Vec<AnomalyTag>) =
        scan_anomalies(cycles, rfu, min_points, config)
            .into_iter()
            .partition(|tag| tag.is_reported());
    if !suppressed.is_empty() {
        debug!(?suppressed, "Negative-value anomaly tags suppressed");
    }
    reported
}

/// Every tag the scan raises, suppressed ones included.
///
/// `min_points` is the fitter's minimum; fewer points short-circuit the scan.
pub fn scan_anomalies(
    cycles: &[f64],
    rfu: &[f64],
    min_points: usize,
    config: &AnomalyConfig,
) -> Vec<AnomalyTag> {
    if cycles.len() < min_points || rfu.len() < min_points {
        return vec![AnomalyTag::InsufficientData];
    }

    let rfu: Vec<f64> = cycles
        .iter()
        .zip(rfu)
        .filter(|(c, r)| c.is_finite() && r.is_finite())
        .map(|(_, &r)| r)
        .collect();
    let n = rfu.len();
    if n < min_points {
        return vec![AnomalyTag::InsufficientValidData];
    }

    let mut tags = Vec::new();
    let max = max_value(&rfu);
    let range = max - min_value(&rfu);

    // No exponential phase at all
    if range < config.low_amplitude_floor.max(range * config.low_amplitude_range_fraction) {
        tags.push(AnomalyTag::LowAmplitude);
    }

    // Flat from the middle of the run onward
    let plateau_start = (n / 2).min(n - min_points);
    if plateau_start > 0 {
        let plateau_std = population_std(&rfu[plateau_start..]);
        if plateau_std < config.plateau_std_floor.max(range * config.plateau_std_range_fraction) {
            tags.push(AnomalyTag::EarlyPlateau);
        }
    }

    // First 20% of the run, at least `min_baseline_window` points
    let baseline_points = config.min_baseline_window.max(n / 5);
    let baseline_std = population_std(head(&rfu, baseline_points));
    if baseline_std > config.baseline_std_ceiling.max(range * config.baseline_std_range_fraction) {
        tags.push(AnomalyTag::UnstableBaseline);
    }

    // Drops inside the window where exponential growth is expected
    let exp_start = baseline_points.max(n / 4);
    let exp_end = (n - 1).min(exp_start + n / 3);
    if exp_end > exp_start {
        let window = &rfu[exp_start..exp_end];
        if window.len() > 2 {
            let max_decrease = min_value(&diffs(window));
            let limit = config.negative_step_floor.max(range * config.negative_step_range_fraction);
            if max_decrease < -limit {
                tags.push(AnomalyTag::NegativeAmplification);
            }
        }
    }

    // Negatives are expected for a consistent baseline offset, for real
    // amplification with a negative baseline, and for near-zero wells
    if rfu.iter().any(|&v| v < 0.0) {
        let all_negative = rfu.iter().all(|&v| v < 0.0);
        let substantial = range > config.negative_rfu_substantial_range;
        let low_maximum = max < config.negative_rfu_low_max;
        if !(all_negative || substantial || low_maximum) {
            tags.push(AnomalyTag::NegativeRfuValues);
        }
    }

    if n > min_points {
        let noise = population_std(&diffs(&rfu));
        if noise > range * config.noise_range_fraction {
            tags.push(AnomalyTag::HighNoise);
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycles(n: usize) -> Vec<f64> {
        (1..=n).map(|c| c as f64).collect()
    }

    fn config() -> AnomalyConfig {
        AnomalyConfig::default()
    }

    const MIN: usize = crate::config::defaults::MIN_FIT_POINTS;

    #[test]
    fn test_short_trace_short_circuits() {
        let tags = detect_curve_anomalies(&cycles(4), &[1.0, 2.0, 3.0, 4.0], MIN, &config());
        assert_eq!(tags, vec![AnomalyTag::InsufficientData]);
    }

    #[test]
    fn test_short_circuit_follows_fit_minimum() {
        let rfu: Vec<f64> = (0..7).map(|i| 10.0 * f64::from(i)).collect();
        assert!(!detect_curve_anomalies(&cycles(7), &rfu, MIN, &config())
            .contains(&AnomalyTag::InsufficientData));
        assert_eq!(
            detect_curve_anomalies(&cycles(7), &rfu, 10, &config()),
            vec![AnomalyTag::InsufficientData]
        );
    }

    #[test]
    fn test_nan_heavy_trace_short_circuits() {
        let rfu = [1.0, f64::NAN, f64::NAN, 4.0, 5.0, 6.0];
        let tags = detect_curve_anomalies(&cycles(6), &rfu, MIN, &config());
        assert_eq!(tags, vec![AnomalyTag::InsufficientValidData]);
    }

    #[test]
    fn test_flat_trace_is_low_amplitude_and_early_plateau() {
        let tags = detect_curve_anomalies(&cycles(40), &[100.0; 40], MIN, &config());
        assert_eq!(tags, vec![AnomalyTag::LowAmplitude, AnomalyTag::EarlyPlateau]);
    }

    #[test]
    fn test_clean_sigmoid_has_no_anomalies() {
        let rfu: Vec<f64> = cycles(40)
            .iter()
            .map(|&x| 1000.0 / (1.0 + (-0.5 * (x - 20.0)).exp()) + 50.0)
            .collect();
        let tags = detect_curve_anomalies(&cycles(40), &rfu, MIN, &config());
        assert!(tags.is_empty(), "{tags:?}");
    }

    #[test]
    fn test_scattered_baseline_is_unstable() {
        let mut rfu = vec![0.0, 400.0, 0.0, 400.0, 0.0, 400.0, 0.0, 400.0];
        rfu.extend((0..32).map(|i| 200.0 + 25.0 * f64::from(i)));
        let tags = detect_curve_anomalies(&cycles(40), &rfu, MIN, &config());
        assert!(tags.contains(&AnomalyTag::UnstableBaseline), "{tags:?}");
    }

    #[test]
    fn test_small_negative_trace_tag_is_computed_then_suppressed() {
        // Range 40, max 30: none of the exemptions apply
        let rfu = [-10.0, 0.0, 10.0, 20.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0];
        let all = scan_anomalies(&cycles(10), &rfu, MIN, &config());
        assert!(all.contains(&AnomalyTag::NegativeRfuValues));

        let reported = detect_curve_anomalies(&cycles(10), &rfu, MIN, &config());
        assert!(!reported.contains(&AnomalyTag::NegativeRfuValues));
    }

    #[test]
    fn test_negative_exemptions() {
        let all_negative = [-50.0, -40.0, -45.0, -42.0, -48.0, -41.0];
        let low_max = [-5.0, 0.0, 5.0, 10.0, 15.0, 15.0];
        let substantial = [-20.0, 0.0, 100.0, 200.0, 300.0, 300.0];
        for rfu in [all_negative, low_max, substantial] {
            let all = scan_anomalies(&cycles(6), &rfu, MIN, &config());
            assert!(!all.contains(&AnomalyTag::NegativeRfuValues), "{rfu:?}");
        }
    }

    #[test]
    fn test_drop_in_growth_window_is_computed_then_suppressed() {
        // n = 40: window is indices 10..23
        let mut rfu: Vec<f64> = (0..40).map(|i| 10.0 * f64::from(i)).collect();
        rfu[15] = 0.0;
        let all = scan_anomalies(&cycles(40), &rfu, MIN, &config());
        assert!(all.contains(&AnomalyTag::NegativeAmplification));

        let reported = detect_curve_anomalies(&cycles(40), &rfu, MIN, &config());
        assert!(!reported.contains(&AnomalyTag::NegativeAmplification));
    }

    #[test]
    fn test_alternating_trace_is_high_noise() {
        let rfu: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 0.0 } else { 200.0 })
            .collect();
        let tags = detect_curve_anomalies(&cycles(20), &rfu, MIN, &config());
        assert!(tags.contains(&AnomalyTag::HighNoise));
    }
}
