//! Per-well pipeline: fit → quality filters → classification, with the
//! anomaly scan run on the raw trace alongside.
//!
//! Never fails: a well that cannot be fitted produces a
//! [`WellResult::Failed`] record carrying the error and any anomaly tags.

use tracing::{debug, warn};

use super::anomaly::detect_curve_anomalies;
use super::classifier::classify;
use super::quality_filter::run_quality_filters;
use super::stats;
use crate::config::AnalysisConfig;
use crate::curve_fit::fit_sigmoid;
use crate::types::{WellAnalysis, WellFailure, WellResult, WellTrace};

/// Analyze one well.
pub fn analyze_well(well_id: &str, trace: &WellTrace, config: &AnalysisConfig) -> WellResult {
    let anomalies = detect_curve_anomalies(
        &trace.cycles,
        &trace.rfu,
        config.fit.min_points,
        &config.anomaly,
    );

    let fit = match fit_sigmoid(&trace.cycles, &trace.rfu, &config.fit) {
        Ok(fit) => fit,
        Err(e) => {
            warn!(well = %well_id, error = %e, "Well could not be fitted");
            return WellResult::Failed(WellFailure::new(e.kind(), e.to_string(), anomalies));
        }
    };

    let (cycles, rfu) = trace.finite_points();
    let quality_filters = run_quality_filters(&cycles, &rfu, &config.quality);
    let classification = classify(&fit, &quality_filters, stats::range(&rfu), &config.classifier);

    debug!(
        well = %well_id,
        r2 = fit.r2_score,
        good = classification.is_good_scurve,
        reason = classification.rejection_reason.as_deref().unwrap_or(""),
        "Well analyzed"
    );

    WellResult::Analyzed(Box::new(WellAnalysis {
        fit,
        classification,
        quality_filters,
        anomalies,
        raw_cycles: cycles,
        raw_rfu: rfu,
    }))
}
