//! Quality filter sub-reports.
//!
//! Each check carries its measured statistic, the threshold it was compared
//! against and the pass flag, plus the supporting statistics an analyst needs
//! to see why a curve was screened out.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartCycleCheck {
    /// First cycle of a sustained rise above the start threshold
    pub start_cycle: f64,
    /// RFU level that marks the start of amplification
    pub threshold_rfu: f64,
    pub threshold: f64,
    pub passes_start_cycle_filter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeCheck {
    /// Max reading minus baseline
    pub amplitude: f64,
    pub baseline: f64,
    pub max_signal: f64,
    pub threshold: f64,
    pub passes_amplitude_filter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauCheck {
    pub plateau_level: f64,
    /// Points averaged into the plateau level
    pub plateau_cycles: usize,
    pub threshold: f64,
    pub passes_plateau_filter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnrCheck {
    pub snr: f64,
    pub baseline_mean: f64,
    pub baseline_std: f64,
    pub signal_level: f64,
    pub threshold: f64,
    pub passes_snr_filter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCheck {
    pub max_growth_rate: f64,
    /// Steps above 30% of the largest step
    pub significant_growth_cycles: usize,
    pub threshold: f64,
    pub passes_growth_filter: bool,
}

/// All five heuristic checks for one well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFilterReport {
    pub start_cycle_check: StartCycleCheck,
    pub amplitude_check: AmplitudeCheck,
    pub plateau_check: PlateauCheck,
    pub snr_check: SnrCheck,
    pub growth_check: GrowthCheck,
    pub all_quality_checks_pass: bool,
}

impl QualityFilterReport {
    pub fn new(
        start_cycle_check: StartCycleCheck,
        amplitude_check: AmplitudeCheck,
        plateau_check: PlateauCheck,
        snr_check: SnrCheck,
        growth_check: GrowthCheck,
    ) -> Self {
        let all_quality_checks_pass = start_cycle_check.passes_start_cycle_filter
            && amplitude_check.passes_amplitude_filter
            && plateau_check.passes_plateau_filter
            && snr_check.passes_snr_filter
            && growth_check.passes_growth_filter;
        Self {
            start_cycle_check,
            amplitude_check,
            plateau_check,
            snr_check,
            growth_check,
            all_quality_checks_pass,
        }
    }
}
