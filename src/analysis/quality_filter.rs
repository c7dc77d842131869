//! Quality Filter Bank
//!
//! Five independent heuristics on the raw (finite) trace that catch curves a
//! sigmoid can fit well but which are not real amplification:
//! - Start cycle: amplification must not begin before `min_start_cycle`
//! - Amplitude: max reading must rise `min_amplitude` above baseline
//! - Plateau: trailing quarter must average at least `min_plateau_rfu`
//! - SNR: plateau over baseline scatter must reach `min_snr`
//! - Growth: largest cycle-to-cycle step must reach `min_growth_rate`
//!
//! The baseline is the mean of the first `baseline_points` readings.

use super::stats::{diffs, head, max_value, mean, population_std};
use crate::config::QualityFilterConfig;
use crate::types::{
    AmplitudeCheck, GrowthCheck, PlateauCheck, QualityFilterReport, SnrCheck, StartCycleCheck,
};

/// Run all five checks.
pub fn run_quality_filters(
    cycles: &[f64],
    rfu: &[f64],
    config: &QualityFilterConfig,
) -> QualityFilterReport {
    QualityFilterReport::new(
        detect_amplification_start(cycles, rfu, config),
        check_minimum_amplitude(rfu, config),
        check_plateau_significance(rfu, config),
        check_signal_to_noise(rfu, config),
        check_exponential_growth(rfu, config),
    )
}

/// First cycle of a run of `start_run_length` readings strictly above
/// `baseline + start_threshold_fraction × max`. Falls back to the last cycle.
pub fn detect_amplification_start(
    cycles: &[f64],
    rfu: &[f64],
    config: &QualityFilterConfig,
) -> StartCycleCheck {
    let baseline = mean(head(rfu, config.baseline_points));
    let threshold_rfu = baseline + config.start_threshold_fraction * max_value(rfu);

    let run = config.start_run_length.max(1);
    let start_cycle = rfu
        .windows(run)
        .position(|w| w.iter().all(|&v| v > threshold_rfu))
        .and_then(|i| cycles.get(i))
        .or_else(|| cycles.last())
        .copied()
        .unwrap_or(f64::NAN);

    StartCycleCheck {
        start_cycle,
        threshold_rfu,
        threshold: config.min_start_cycle,
        passes_start_cycle_filter: start_cycle >= config.min_start_cycle,
    }
}

pub fn check_minimum_amplitude(rfu: &[f64], config: &QualityFilterConfig) -> AmplitudeCheck {
    let baseline = mean(head(rfu, config.baseline_points));
    let max_signal = max_value(rfu);
    let amplitude = max_signal - baseline;
    AmplitudeCheck {
        amplitude,
        baseline,
        max_signal,
        threshold: config.min_amplitude,
        passes_amplitude_filter: amplitude >= config.min_amplitude,
    }
}

/// Trailing window: from index `floor(n × (1 − plateau_fraction))` to the end.
fn plateau_window<'a>(rfu: &'a [f64], config: &QualityFilterConfig) -> &'a [f64] {
    let start = (rfu.len() as f64 * (1.0 - config.plateau_fraction)).floor() as usize;
    &rfu[start.min(rfu.len())..]
}

pub fn check_plateau_significance(rfu: &[f64], config: &QualityFilterConfig) -> PlateauCheck {
    let window = plateau_window(rfu, config);
    let plateau_level = mean(window);
    PlateauCheck {
        plateau_level,
        plateau_cycles: window.len(),
        threshold: config.min_plateau_rfu,
        passes_plateau_filter: plateau_level >= config.min_plateau_rfu,
    }
}

/// `(plateau − baseline_mean) / baseline_std`, or the raw difference when the
/// baseline is perfectly flat.
pub fn check_signal_to_noise(rfu: &[f64], config: &QualityFilterConfig) -> SnrCheck {
    let baseline = head(rfu, config.baseline_points);
    let baseline_mean = mean(baseline);
    let baseline_std = population_std(baseline);
    let signal_level = mean(plateau_window(rfu, config));

    let snr = if baseline_std > 0.0 {
        (signal_level - baseline_mean) / baseline_std
    } else {
        signal_level - baseline_mean
    };

    SnrCheck {
        snr,
        baseline_mean,
        baseline_std,
        signal_level,
        threshold: config.min_snr,
        passes_snr_filter: snr >= config.min_snr,
    }
}

pub fn check_exponential_growth(rfu: &[f64], config: &QualityFilterConfig) -> GrowthCheck {
    let steps = diffs(rfu);
    let max_growth_rate = max_value(&steps);
    let cutoff = max_growth_rate * config.significant_growth_fraction;
    GrowthCheck {
        max_growth_rate,
        significant_growth_cycles: steps.iter().filter(|&&s| s > cutoff).count(),
        threshold: config.min_growth_rate,
        passes_growth_filter: max_growth_rate >= config.min_growth_rate,
    }
}
