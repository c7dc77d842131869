//! Flat per-well result table and CSV writer.
//!
//! One row per well in identifier order. Wells that could not be fitted get
//! `N/A` for every fit and filter column.

use std::io::{self, Write};

use crate::types::{BatchReport, WellResult};

const NOT_AVAILABLE: &str = "N/A";

pub const CSV_HEADER: [&str; 18] = [
    "Well",
    "Status",
    "Original_S_Curve",
    "Enhanced_Classification",
    "Rejection_Reason",
    "R2_Score",
    "RMSE",
    "Amplitude",
    "Steepness",
    "Midpoint",
    "Baseline",
    "Data_Points",
    "Cycle_Range",
    "Start_Cycle",
    "Plateau_Level",
    "SNR",
    "Max_Growth_Rate",
    "Anomalies",
];

/// One exported well.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub well: String,
    pub is_good: bool,
    pub original_s_curve: Option<bool>,
    pub rejection_reason: String,
    pub r2_score: Option<f64>,
    pub rmse: Option<f64>,
    pub amplitude: Option<f64>,
    pub steepness: Option<f64>,
    pub midpoint: Option<f64>,
    pub baseline: Option<f64>,
    pub data_points: Option<usize>,
    pub cycle_range: Option<f64>,
    pub start_cycle: Option<f64>,
    pub plateau_level: Option<f64>,
    pub snr: Option<f64>,
    pub max_growth_rate: Option<f64>,
    pub anomalies: String,
}

impl ResultRow {
    fn from_result(well: &str, result: &WellResult) -> Self {
        let anomalies = result
            .anomalies()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(";");

        match result {
            WellResult::Analyzed(a) => {
                let q = &a.quality_filters;
                Self {
                    well: well.to_string(),
                    is_good: a.classification.is_good_scurve,
                    original_s_curve: Some(a.classification.original_s_curve_criteria),
                    rejection_reason: a.classification.rejection_reason.clone().unwrap_or_default(),
                    r2_score: Some(a.fit.r2_score),
                    rmse: Some(a.fit.rmse),
                    amplitude: Some(a.fit.params.amplitude),
                    steepness: Some(a.fit.params.steepness),
                    midpoint: Some(a.fit.params.midpoint),
                    baseline: Some(a.fit.params.baseline),
                    data_points: Some(a.fit.data_points),
                    cycle_range: Some(a.fit.cycle_range),
                    start_cycle: Some(q.start_cycle_check.start_cycle),
                    plateau_level: Some(q.plateau_check.plateau_level),
                    snr: Some(q.snr_check.snr),
                    max_growth_rate: Some(q.growth_check.max_growth_rate),
                    anomalies,
                }
            }
            WellResult::Failed(_) => Self {
                well: well.to_string(),
                is_good: false,
                original_s_curve: None,
                rejection_reason: String::new(),
                r2_score: None,
                rmse: None,
                amplitude: None,
                steepness: None,
                midpoint: None,
                baseline: None,
                data_points: None,
                cycle_range: None,
                start_cycle: None,
                plateau_level: None,
                snr: None,
                max_growth_rate: None,
                anomalies,
            },
        }
    }

    /// Cells in [`CSV_HEADER`] order, unescaped.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.well.clone(),
            if self.is_good { "Good" } else { "Poor" }.to_string(),
            opt(self.original_s_curve),
            self.is_good.to_string(),
            self.rejection_reason.clone(),
            opt(self.r2_score),
            opt(self.rmse),
            opt(self.amplitude),
            opt(self.steepness),
            opt(self.midpoint),
            opt(self.baseline),
            opt(self.data_points),
            opt(self.cycle_range),
            opt(self.start_cycle),
            opt(self.plateau_level),
            opt(self.snr),
            opt(self.max_growth_rate),
            self.anomalies.clone(),
        ]
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Quote a cell when it holds a delimiter, quote or line break.
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Flatten a batch report into rows, one per well.
pub fn result_rows(report: &BatchReport) -> Vec<ResultRow> {
    report
        .individual_results
        .iter()
        .map(|(id, result)| ResultRow::from_result(id, result))
        .collect()
}

/// Write the batch report as CSV with a header row.
pub fn write_csv<W: Write>(report: &BatchReport, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for row in result_rows(report) {
        let cells: Vec<String> = row.cells().iter().map(|c| escape(c)).collect();
        writeln!(writer, "{}", cells.join(","))?;
    }
    writer.flush()
}
