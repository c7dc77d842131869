//! S-curve classification.
//!
//! A well is good when the fit itself looks like amplification (R², steepness,
//! fitted amplitude) AND every quality filter passes. A rejected well gets the
//! message of the first violated rule, in this order:
//!
//! 1. R² at or below the length-dependent threshold
//! 2. Steepness at or below `min_steepness`
//! 3. Fitted amplitude at or below `max(min_fit_amplitude, fraction × range)`
//! 4. Amplification start cycle too early
//! 5. Filter amplitude too low
//! 6. Plateau too low
//! 7. Signal-to-noise too low
//! 8. Growth rate too low
//!
//! Each violation predicate is the exact negation of its pass condition, so a
//! rejected well always matches a rule.

use crate::config::ClassifierConfig;
use crate::types::{Classification, QualityFilterReport, SigmoidFit};

/// Everything the rules look at for one well.
struct RuleContext<'a> {
    fit: &'a SigmoidFit,
    quality: &'a QualityFilterReport,
    r2_threshold: f64,
    min_steepness: f64,
    min_fit_amplitude: f64,
}

/// Whether a rule judges the fit or the raw-trace screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleStage {
    Fit,
    Quality,
}

struct RejectionRule {
    stage: RuleStage,
    violated: fn(&RuleContext<'_>) -> bool,
    message: fn(&RuleContext<'_>) -> String,
}

fn rejection_rules() -> [RejectionRule; 8] {
    [
        RejectionRule {
            stage: RuleStage::Fit,
            violated: |c| !(c.fit.r2_score > c.r2_threshold),
            message: |c| format!("Poor R² fit ({:.3} <= {})", c.fit.r2_score, c.r2_threshold),
        },
        RejectionRule {
            stage: RuleStage::Fit,
            violated: |c| !(c.fit.params.steepness > c.min_steepness),
            message: |c| {
                format!(
                    "Insufficient steepness ({:.4} <= {})",
                    c.fit.params.steepness, c.min_steepness
                )
            },
        },
        RejectionRule {
            stage: RuleStage::Fit,
            violated: |c| !(c.fit.params.amplitude > c.min_fit_amplitude),
            message: |c| {
                format!(
                    "Insufficient amplitude ({:.1} <= {:.1})",
                    c.fit.params.amplitude, c.min_fit_amplitude
                )
            },
        },
        RejectionRule {
            stage: RuleStage::Quality,
            violated: |c| !c.quality.start_cycle_check.passes_start_cycle_filter,
            message: |c| {
                let s = &c.quality.start_cycle_check;
                format!(
                    "Amplification starts too early (cycle {:.1} < {})",
                    s.start_cycle, s.threshold
                )
            },
        },
        RejectionRule {
            stage: RuleStage::Quality,
            violated: |c| !c.quality.amplitude_check.passes_amplitude_filter,
            message: |c| {
                let a = &c.quality.amplitude_check;
                format!("Insufficient amplitude ({:.1} < {})", a.amplitude, a.threshold)
            },
        },
        RejectionRule {
            stage: RuleStage::Quality,
            violated: |c| !c.quality.plateau_check.passes_plateau_filter,
            message: |c| {
                let p = &c.quality.plateau_check;
                format!("Plateau too low ({:.1} < {})", p.plateau_level, p.threshold)
            },
        },
        RejectionRule {
            stage: RuleStage::Quality,
            violated: |c| !c.quality.snr_check.passes_snr_filter,
            message: |c| {
                let s = &c.quality.snr_check;
                format!("Poor signal-to-noise ratio ({:.1} < {})", s.snr, s.threshold)
            },
        },
        RejectionRule {
            stage: RuleStage::Quality,
            violated: |c| !c.quality.growth_check.passes_growth_filter,
            message: |c| {
                let g = &c.quality.growth_check;
                format!(
                    "Insufficient growth rate ({:.1} < {})",
                    g.max_growth_rate, g.threshold
                )
            },
        },
    ]
}

/// Classify one fitted well.
///
/// `rfu_range` is `max − min` of the finite readings the fit used.
pub fn classify(
    fit: &SigmoidFit,
    quality: &QualityFilterReport,
    rfu_range: f64,
    config: &ClassifierConfig,
) -> Classification {
    let ctx = RuleContext {
        fit,
        quality,
        r2_threshold: config.r2_threshold(fit.data_points),
        min_steepness: config.min_steepness,
        min_fit_amplitude: config
            .min_fit_amplitude
            .max(rfu_range * config.fit_amplitude_range_fraction),
    };
    let rules = rejection_rules();

    let original_s_curve_criteria = rules
        .iter()
        .filter(|r| r.stage == RuleStage::Fit)
        .all(|r| !(r.violated)(&ctx));
    let is_good_scurve = original_s_curve_criteria && quality.all_quality_checks_pass;

    let rejection_reason = if is_good_scurve {
        None
    } else {
        rules
            .iter()
            .find(|r| (r.violated)(&ctx))
            .map(|r| (r.message)(&ctx))
    };
    debug_assert!(
        is_good_scurve || rejection_reason.is_some(),
        "rejected well matched no rejection rule"
    );

    Classification {
        original_s_curve_criteria,
        is_good_scurve,
        rejection_reason,
    }
}
