//! Batch driver: every well through the per-well pipeline, then the plate
//! summary.
//!
//! Wells are independent, so they are mapped on the rayon pool and collected
//! into an identifier-ordered map. Each well runs under `catch_unwind`; a
//! panic becomes that well's failure record and the rest of the plate is
//! unaffected. Output is identical for parallel and sequential runs.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Utc;
use rayon::prelude::*;
use tracing::{error, info};

use super::pipeline::analyze_well;
use super::ProcessError;
use crate::config::AnalysisConfig;
use crate::types::{
    BatchReport, BatchSummary, CycleInfo, FailureKind, Plate, ProcessedBatch, ProcessingInfo,
    ValidationReport, WellFailure, WellResult, WellTrace,
};

// ============================================================================
// Batch Analysis
// ============================================================================

/// Analyze every well on the plate.
///
/// An empty plate yields an empty report with a 0% success rate.
pub fn batch_analyze(wells: &Plate, config: &AnalysisConfig) -> BatchReport {
    let individual_results: BTreeMap<String, WellResult> = if config.batch.parallel {
        wells
            .par_iter()
            .map(|(id, trace)| (id.clone(), analyze_isolated(id, trace, config)))
            .collect()
    } else {
        wells
            .iter()
            .map(|(id, trace)| (id.clone(), analyze_isolated(id, trace, config)))
            .collect()
    };

    let good_curves: Vec<String> = individual_results
        .iter()
        .filter(|(_, r)| r.is_good_scurve())
        .map(|(id, _)| id.clone())
        .collect();

    let total_wells = individual_results.len();
    let good_curves_count = good_curves.len();
    let success_rate_percent = if total_wells > 0 {
        good_curves_count as f64 / total_wells as f64 * 100.0
    } else {
        0.0
    };

    info!(
        total_wells,
        good_curves = good_curves_count,
        success_rate = %format!("{success_rate_percent:.1}%"),
        "Batch analysis completed"
    );

    BatchReport {
        individual_results,
        good_curves,
        cycle_info: cycle_info(wells),
        summary: BatchSummary {
            total_wells,
            good_curves_count,
            success_rate_percent,
            quality_filter_params: config.quality.clone(),
        },
    }
}

fn analyze_isolated(well_id: &str, trace: &WellTrace, config: &AnalysisConfig) -> WellResult {
    match catch_unwind(AssertUnwindSafe(|| analyze_well(well_id, trace, config))) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(well = %well_id, panic = %message, "Well analysis panicked");
            WellResult::Failed(WellFailure::new(
                FailureKind::Panicked,
                format!("Analysis panicked: {message}"),
                Vec::new(),
            ))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Cycle span of the first well (by identifier) that has any cycles.
fn cycle_info(wells: &Plate) -> Option<CycleInfo> {
    wells
        .values()
        .find(|w| !w.cycles.is_empty())
        .map(|w| CycleInfo {
            min: w.cycles.iter().copied().fold(f64::INFINITY, f64::min),
            max: w.cycles.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count: w.cycles.len(),
        })
}

// ============================================================================
// Upload Entry Point
// ============================================================================

/// Analyze an uploaded plate and attach processing metadata.
///
/// Unlike [`batch_analyze`], an empty upload is an error here.
pub fn process_wells(wells: &Plate, config: &AnalysisConfig) -> Result<ProcessedBatch, ProcessError> {
    if wells.is_empty() {
        return Err(ProcessError::NoData);
    }
    info!(wells = wells.len(), "Processing wells for analysis");

    let report = batch_analyze(wells, config);
    let processing_info = ProcessingInfo {
        data_points_per_well: wells.values().next().map_or(0, |w| w.cycles.len()),
        processing_timestamp: Utc::now(),
        total_wells_processed: wells.len(),
        quality_filters_applied: config.quality.clone(),
    };
    Ok(ProcessedBatch {
        report,
        processing_info,
    })
}

// ============================================================================
// Upload Validation
// ============================================================================

/// Structural checks on an upload before analysis.
///
/// Errors: empty upload, mismatched lengths. Warnings: fewer than 5 points,
/// cycles outside 0–100, negative RFU.
pub fn validate_wells(wells: &Plate) -> ValidationReport {
    let mut report = ValidationReport::default();
    if wells.is_empty() {
        report.errors.push("No data provided".to_string());
        return report;
    }

    for (id, well) in wells {
        if !well.lengths_match() {
            report.errors.push(format!(
                "Well {id}: Cycles and RFU data length mismatch ({} vs {})",
                well.cycles.len(),
                well.rfu.len()
            ));
            continue;
        }

        if well.cycles.len() < crate::config::defaults::MIN_FIT_POINTS {
            report
                .warnings
                .push(format!("Well {id}: Very few data points ({})", well.cycles.len()));
        }

        if !well.cycles.is_empty() {
            let min = well.cycles.iter().copied().fold(f64::INFINITY, f64::min);
            let max = well.cycles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if min < 0.0 || max > 100.0 {
                report
                    .warnings
                    .push(format!("Well {id}: Unusual cycle range ({min}-{max})"));
            }
        }

        if well.rfu.iter().any(|&v| v < 0.0) {
            report
                .warnings
                .push(format!("Well {id}: Contains negative RFU values"));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(cycles: Vec<f64>, rfu: Vec<f64>) -> WellTrace {
        WellTrace::new(cycles, rfu)
    }

    #[test]
    fn test_empty_plate_report() {
        let report = batch_analyze(&Plate::new(), &AnalysisConfig::default());
        assert_eq!(report.summary.total_wells, 0);
        assert_eq!(report.summary.good_curves_count, 0);
        assert!((report.summary.success_rate_percent - 0.0).abs() < f64::EPSILON);
        assert!(report.cycle_info.is_none());
        assert!(report.good_curves.is_empty());
    }

    #[test]
    fn test_cycle_info_from_first_well_with_cycles() {
        let mut plate = Plate::new();
        plate.insert("A1".to_string(), well(Vec::new(), Vec::new()));
        plate.insert("A2".to_string(), well(vec![3.0, 4.0, 5.0], vec![1.0, 1.0, 1.0]));
        plate.insert("A3".to_string(), well(vec![1.0, 2.0], vec![1.0, 1.0]));

        let info = cycle_info(&plate).unwrap();
        assert!((info.min - 3.0).abs() < f64::EPSILON);
        assert!((info.max - 5.0).abs() < f64::EPSILON);
        assert_eq!(info.count, 3);
    }

    #[test]
    fn test_process_rejects_empty_upload() {
        let err = process_wells(&Plate::new(), &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "No data provided");
    }

    #[test]
    fn test_process_attaches_metadata() {
        let mut plate = Plate::new();
        plate.insert("A1".to_string(), well(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]));
        let processed = process_wells(&plate, &AnalysisConfig::default()).unwrap();
        assert_eq!(processed.processing_info.data_points_per_well, 3);
        assert_eq!(processed.processing_info.total_wells_processed, 1);
        assert_eq!(processed.report.summary.total_wells, 1);
    }

    #[test]
    fn test_validation_errors_and_warnings() {
        let mut plate = Plate::new();
        plate.insert("A1".to_string(), well(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]));
        plate.insert("A2".to_string(), well(vec![1.0, 2.0, 3.0], vec![1.0, -2.0, 3.0]));
        plate.insert(
            "A3".to_string(),
            well((95..=105).map(f64::from).collect(), vec![10.0; 11]),
        );

        let report = validate_wells(&plate);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Well A1"));
        assert!(report
            .warnings
            .contains(&"Well A2: Very few data points (3)".to_string()));
        assert!(report
            .warnings
            .contains(&"Well A2: Contains negative RFU values".to_string()));
        assert!(report
            .warnings
            .contains(&"Well A3: Unusual cycle range (95-105)".to_string()));
    }

    #[test]
    fn test_validation_of_empty_upload() {
        let report = validate_wells(&Plate::new());
        assert_eq!(report.errors, vec!["No data provided".to_string()]);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
