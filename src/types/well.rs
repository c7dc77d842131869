//! Well input traces and upload validation results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A plate: well identifier → trace, ordered by identifier.
pub type Plate = BTreeMap<String, WellTrace>;

/// One well's amplification trace: cycle numbers and parallel RFU readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellTrace {
    /// Cycle numbers, normally 1..N
    #[serde(default)]
    pub cycles: Vec<f64>,
    /// Relative fluorescence units, may be negative after background subtraction
    #[serde(default)]
    pub rfu: Vec<f64>,
}

impl WellTrace {
    pub fn new(cycles: Vec<f64>, rfu: Vec<f64>) -> Self {
        Self { cycles, rfu }
    }

    /// Number of raw points (the shorter sequence on a length mismatch).
    pub fn len(&self) -> usize {
        self.cycles.len().min(self.rfu.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lengths_match(&self) -> bool {
        self.cycles.len() == self.rfu.len()
    }

    /// Points where both the cycle and the reading are finite, dropped in lockstep.
    pub fn finite_points(&self) -> (Vec<f64>, Vec<f64>) {
        self.cycles
            .iter()
            .zip(&self.rfu)
            .filter(|(c, r)| c.is_finite() && r.is_finite())
            .map(|(&c, &r)| (c, r))
            .unzip()
    }
}

/// Outcome of upload validation: errors block analysis, warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_points_drop_in_lockstep() {
        let trace = WellTrace::new(
            vec![1.0, 2.0, f64::NAN, 4.0, 5.0],
            vec![10.0, f64::INFINITY, 30.0, 40.0, 50.0],
        );
        let (cycles, rfu) = trace.finite_points();
        assert_eq!(cycles, vec![1.0, 4.0, 5.0]);
        assert_eq!(rfu, vec![10.0, 40.0, 50.0]);
    }

    #[test]
    fn test_deserialize_from_json() {
        let trace: WellTrace =
            serde_json::from_str(r#"{"cycles": [1, 2, 3], "rfu": [5.5, 6.0, -1.0]}"#).unwrap();
        assert_eq!(trace.len(), 3);
        assert!(trace.lengths_match());
    }

    #[test]
    fn test_len_uses_shorter_sequence() {
        let trace = WellTrace::new(vec![1.0, 2.0, 3.0], vec![1.0]);
        assert_eq!(trace.len(), 1);
        assert!(!trace.lengths_match());
    }
}
