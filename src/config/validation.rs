//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `AnalysisConfig`.
///
/// Maintained by hand to match the struct hierarchy in `analysis_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [quality]
        "quality",
        "quality.min_start_cycle",
        "quality.min_amplitude",
        "quality.min_plateau_rfu",
        "quality.min_snr",
        "quality.min_growth_rate",
        "quality.baseline_points",
        "quality.start_threshold_fraction",
        "quality.start_run_length",
        "quality.plateau_fraction",
        "quality.significant_growth_fraction",
        // [classifier]
        "classifier",
        "classifier.r2_threshold_long_run",
        "classifier.r2_threshold_short_run",
        "classifier.long_run_min_points",
        "classifier.min_steepness",
        "classifier.min_fit_amplitude",
        "classifier.fit_amplitude_range_fraction",
        // [fit]
        "fit",
        "fit.min_points",
        "fit.max_evaluations",
        "fit.ftol",
        "fit.xtol",
        "fit.gtol",
        "fit.amplitude_guess_factor",
        "fit.initial_steepness",
        "fit.amplitude_lower_factor",
        "fit.amplitude_upper_factor",
        "fit.steepness_lower",
        "fit.steepness_upper",
        "fit.baseline_margin_fraction",
        "fit.steepness_window_start_cycle",
        "fit.steepness_window_min_points",
        // [anomaly]
        "anomaly",
        "anomaly.low_amplitude_floor",
        "anomaly.low_amplitude_range_fraction",
        "anomaly.plateau_std_floor",
        "anomaly.plateau_std_range_fraction",
        "anomaly.baseline_std_ceiling",
        "anomaly.baseline_std_range_fraction",
        "anomaly.min_baseline_window",
        "anomaly.negative_step_floor",
        "anomaly.negative_step_range_fraction",
        "anomaly.negative_rfu_substantial_range",
        "anomaly.negative_rfu_low_max",
        "anomaly.noise_range_fraction",
        // [batch]
        "batch",
        "batch.parallel",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails on unknown keys; existing configs keep loading.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| {
            let suggestion = suggest_correction(&key, &known);
            ValidationWarning {
                message: format!("Unknown config key '{key}'"),
                field: key,
                suggestion,
            }
        })
        .collect()
}

// ============================================================================
// Plausibility Range Validation
// ============================================================================

/// Check thresholds against ranges that make sense for qPCR runs.
///
/// Returns (errors, warnings): errors are impossible values, warnings are
/// legal but unusual settings worth a second look.
pub fn validate_ranges(config: &super::AnalysisConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let q = &config.quality;

    for (name, value) in [
        ("quality.min_amplitude", q.min_amplitude),
        ("quality.min_plateau_rfu", q.min_plateau_rfu),
        ("quality.min_snr", q.min_snr),
        ("quality.min_growth_rate", q.min_growth_rate),
    ] {
        if value < 0.0 {
            errors.push(format!("{name} = {value:.2} cannot be negative"));
        }
    }

    // Typical runs are 35-50 cycles; a start gate past 45 rejects every well
    if q.min_start_cycle < 0.0 || q.min_start_cycle > 45.0 {
        warnings.push(ValidationWarning {
            field: "quality.min_start_cycle".to_string(),
            message: format!(
                "min_start_cycle = {:.1} is outside typical range (0-45 cycles)",
                q.min_start_cycle
            ),
            suggestion: None,
        });
    }

    if q.plateau_fraction > 0.5 {
        warnings.push(ValidationWarning {
            field: "quality.plateau_fraction".to_string(),
            message: format!(
                "plateau_fraction = {:.2} averages more than half the trace as plateau",
                q.plateau_fraction
            ),
            suggestion: None,
        });
    }

    let c = &config.classifier;
    if c.r2_threshold_short_run > c.r2_threshold_long_run {
        warnings.push(ValidationWarning {
            field: "classifier.r2_threshold_short_run".to_string(),
            message: format!(
                "short-run R² threshold ({:.3}) is stricter than long-run ({:.3})",
                c.r2_threshold_short_run, c.r2_threshold_long_run
            ),
            suggestion: None,
        });
    }
    if c.r2_threshold_long_run < 0.5 {
        warnings.push(ValidationWarning {
            field: "classifier.r2_threshold_long_run".to_string(),
            message: format!(
                "r2_threshold_long_run = {:.3} accepts very poor fits",
                c.r2_threshold_long_run
            ),
            suggestion: None,
        });
    }

    if config.fit.max_evaluations < 100 {
        warnings.push(ValidationWarning {
            field: "fit.max_evaluations".to_string(),
            message: format!(
                "max_evaluations = {} is likely too small for the solver to converge",
                config.fit.max_evaluations
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
