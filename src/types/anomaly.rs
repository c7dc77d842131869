//! Curve pathology tags.

use serde::{Deserialize, Serialize};

/// A pathology detected on a raw trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyTag {
    /// Fewer than 5 raw points
    InsufficientData,
    /// Fewer than 5 finite points
    InsufficientValidData,
    LowAmplitude,
    /// Signal flat from the middle of the run onward
    EarlyPlateau,
    /// Leading cycles scatter too much to define a baseline
    UnstableBaseline,
    /// Large drop inside the expected exponential window
    NegativeAmplification,
    NegativeRfuValues,
    HighNoise,
}

impl AnomalyTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            AnomalyTag::InsufficientData => "insufficient_data",
            AnomalyTag::InsufficientValidData => "insufficient_valid_data",
            AnomalyTag::LowAmplitude => "low_amplitude",
            AnomalyTag::EarlyPlateau => "early_plateau",
            AnomalyTag::UnstableBaseline => "unstable_baseline",
            AnomalyTag::NegativeAmplification => "negative_amplification",
            AnomalyTag::NegativeRfuValues => "negative_rfu_values",
            AnomalyTag::HighNoise => "high_noise",
        }
    }

    /// Negative-value tags are computed but withheld from results; see the
    /// anomaly module for the review note.
    pub const fn is_reported(self) -> bool {
        !matches!(
            self,
            AnomalyTag::NegativeAmplification | AnomalyTag::NegativeRfuValues
        )
    }
}

impl std::fmt::Display for AnomalyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
