//! Analysis Configuration - every curve-screening threshold as a TOML value
//!
//! Each struct implements `Default` with values from [`super::defaults`], so a
//! missing file or a partial file behaves exactly like the built-in screen.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one analysis run.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$QPCR_CONFIG` env var
/// 2. `./qpcr_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Heuristic quality filters applied after fitting
    #[serde(default)]
    pub quality: QualityFilterConfig,

    /// Base S-curve criteria on the fitted parameters
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Sigmoid fitting guesses, bounds and solver budget
    #[serde(default)]
    pub fit: FitConfig,

    /// Curve pathology detection
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Batch execution
    #[serde(default)]
    pub batch: BatchConfig,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order.
    ///
    /// Never fails: an unreadable or invalid file is logged and skipped.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analysis config from QPCR_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from QPCR_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "QPCR_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./qpcr_config.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analysis config from ./qpcr_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./qpcr_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No analysis config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Two-pass: unknown keys are warnings, not errors
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Analysis config saved");
        Ok(())
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Every numeric threshold must be finite
    /// - R² thresholds lie in (0, 1]
    /// - Lower bounds sit strictly below upper bounds
    /// - Point counts and budgets are large enough to fit four parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let q = &self.quality;
        for (name, value) in [
            ("quality.min_start_cycle", q.min_start_cycle),
            ("quality.min_amplitude", q.min_amplitude),
            ("quality.min_plateau_rfu", q.min_plateau_rfu),
            ("quality.min_snr", q.min_snr),
            ("quality.min_growth_rate", q.min_growth_rate),
        ] {
            Self::check_finite(value, name, &mut errors);
        }
        Self::check_fraction(q.start_threshold_fraction, "quality.start_threshold_fraction", &mut errors);
        Self::check_fraction(q.plateau_fraction, "quality.plateau_fraction", &mut errors);
        Self::check_fraction(
            q.significant_growth_fraction,
            "quality.significant_growth_fraction",
            &mut errors,
        );
        if q.baseline_points == 0 {
            errors.push("quality.baseline_points must be > 0".to_string());
        }
        if q.start_run_length == 0 {
            errors.push("quality.start_run_length must be > 0".to_string());
        }

        let c = &self.classifier;
        for (name, value) in [
            ("classifier.r2_threshold_long_run", c.r2_threshold_long_run),
            ("classifier.r2_threshold_short_run", c.r2_threshold_short_run),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                errors.push(format!("{name} must be in (0, 1] (got {value})"));
            }
        }
        Self::check_finite(c.min_steepness, "classifier.min_steepness", &mut errors);
        Self::check_finite(c.min_fit_amplitude, "classifier.min_fit_amplitude", &mut errors);
        Self::check_fraction(
            c.fit_amplitude_range_fraction,
            "classifier.fit_amplitude_range_fraction",
            &mut errors,
        );

        let f = &self.fit;
        if f.min_points < defaults::MIN_FIT_POINTS {
            errors.push(format!(
                "fit.min_points must be >= {} (got {})",
                defaults::MIN_FIT_POINTS,
                f.min_points
            ));
        }
        if f.max_evaluations == 0 {
            errors.push("fit.max_evaluations must be > 0".to_string());
        }
        for (name, value) in [
            ("fit.ftol", f.ftol),
            ("fit.xtol", f.xtol),
            ("fit.gtol", f.gtol),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be a positive finite tolerance (got {value})"));
            }
        }
        Self::check_ordered(
            f.steepness_lower,
            f.steepness_upper,
            "fit.steepness",
            &mut errors,
        );
        if f.steepness_lower <= 0.0 {
            errors.push(format!(
                "fit.steepness_lower must be > 0 (got {})",
                f.steepness_lower
            ));
        }
        Self::check_ordered(
            f.amplitude_lower_factor,
            f.amplitude_upper_factor,
            "fit.amplitude_factor",
            &mut errors,
        );
        if f.amplitude_lower_factor <= 0.0 {
            errors.push(format!(
                "fit.amplitude_lower_factor must be > 0 (got {})",
                f.amplitude_lower_factor
            ));
        }
        if !(f.initial_steepness >= f.steepness_lower && f.initial_steepness <= f.steepness_upper) {
            errors.push(format!(
                "fit.initial_steepness ({}) must lie within [{}, {}]",
                f.initial_steepness, f.steepness_lower, f.steepness_upper
            ));
        }
        Self::check_finite(f.amplitude_guess_factor, "fit.amplitude_guess_factor", &mut errors);
        Self::check_finite(f.baseline_margin_fraction, "fit.baseline_margin_fraction", &mut errors);
        Self::check_finite(
            f.steepness_window_start_cycle,
            "fit.steepness_window_start_cycle",
            &mut errors,
        );

        let a = &self.anomaly;
        for (name, value) in [
            ("anomaly.low_amplitude_floor", a.low_amplitude_floor),
            ("anomaly.plateau_std_floor", a.plateau_std_floor),
            ("anomaly.baseline_std_ceiling", a.baseline_std_ceiling),
            ("anomaly.negative_step_floor", a.negative_step_floor),
            ("anomaly.negative_rfu_substantial_range", a.negative_rfu_substantial_range),
            ("anomaly.negative_rfu_low_max", a.negative_rfu_low_max),
        ] {
            Self::check_finite(value, name, &mut errors);
        }
        for (name, value) in [
            ("anomaly.low_amplitude_range_fraction", a.low_amplitude_range_fraction),
            ("anomaly.plateau_std_range_fraction", a.plateau_std_range_fraction),
            ("anomaly.baseline_std_range_fraction", a.baseline_std_range_fraction),
            ("anomaly.negative_step_range_fraction", a.negative_step_range_fraction),
            ("anomaly.noise_range_fraction", a.noise_range_fraction),
        ] {
            Self::check_fraction(value, name, &mut errors);
        }

        // Plausibility ranges
        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Return a copy with any per-call threshold overrides applied.
    pub fn with_overrides(&self, overrides: &QualityOverrides) -> Self {
        let mut config = self.clone();
        let q = &mut config.quality;
        if let Some(v) = overrides.min_start_cycle {
            q.min_start_cycle = v;
        }
        if let Some(v) = overrides.min_amplitude {
            q.min_amplitude = v;
        }
        if let Some(v) = overrides.min_plateau_rfu {
            q.min_plateau_rfu = v;
        }
        if let Some(v) = overrides.min_snr {
            q.min_snr = v;
        }
        if let Some(v) = overrides.min_growth_rate {
            q.min_growth_rate = v;
        }
        let c = &mut config.classifier;
        if let Some(v) = overrides.r2_threshold_long_run {
            c.r2_threshold_long_run = v;
        }
        if let Some(v) = overrides.r2_threshold_short_run {
            c.r2_threshold_short_run = v;
        }
        if let Some(v) = overrides.min_steepness {
            c.min_steepness = v;
        }
        config
    }

    fn check_finite(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() {
            errors.push(format!("{name} must be finite (got {value})"));
        }
    }

    fn check_fraction(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            errors.push(format!("{name} must be in (0, 1] (got {value})"));
        }
    }

    fn check_ordered(lower: f64, upper: f64, name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass, so catch them explicitly
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!(
                "{name}: bounds must be finite (got lower={lower}, upper={upper})"
            ));
            return;
        }
        if lower >= upper {
            errors.push(format!(
                "{name}: lower ({lower:.3}) must be < upper ({upper:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Per-call Overrides
// ============================================================================

/// Optional threshold overrides supplied alongside a single batch request.
///
/// `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityOverrides {
    #[serde(default)]
    pub min_start_cycle: Option<f64>,
    #[serde(default)]
    pub min_amplitude: Option<f64>,
    #[serde(default)]
    pub min_plateau_rfu: Option<f64>,
    #[serde(default)]
    pub min_snr: Option<f64>,
    #[serde(default)]
    pub min_growth_rate: Option<f64>,
    #[serde(default)]
    pub r2_threshold_long_run: Option<f64>,
    #[serde(default)]
    pub r2_threshold_short_run: Option<f64>,
    #[serde(default)]
    pub min_steepness: Option<f64>,
}

impl QualityOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Quality Filters
// ============================================================================

/// Heuristic screens applied to the raw trace after a successful fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFilterConfig {
    /// Amplification must not start before this cycle
    #[serde(default = "default_min_start_cycle")]
    pub min_start_cycle: f64,

    /// Minimum rise of the max reading over the baseline (RFU)
    #[serde(default = "default_min_amplitude")]
    pub min_amplitude: f64,

    /// Minimum mean of the trailing plateau window (RFU)
    #[serde(default = "default_min_plateau_rfu")]
    pub min_plateau_rfu: f64,

    #[serde(default = "default_min_snr")]
    pub min_snr: f64,

    /// Minimum largest cycle-to-cycle increase (RFU/cycle)
    #[serde(default = "default_min_growth_rate")]
    pub min_growth_rate: f64,

    /// Leading points treated as pre-amplification baseline
    #[serde(default = "default_baseline_points")]
    pub baseline_points: usize,

    #[serde(default = "default_start_threshold_fraction")]
    pub start_threshold_fraction: f64,

    /// Consecutive points that must clear the start threshold
    #[serde(default = "default_start_run_length")]
    pub start_run_length: usize,

    /// Trailing fraction of the trace averaged as plateau
    #[serde(default = "default_plateau_fraction")]
    pub plateau_fraction: f64,

    #[serde(default = "default_significant_growth_fraction")]
    pub significant_growth_fraction: f64,
}

fn default_min_start_cycle() -> f64 {
    defaults::MIN_START_CYCLE
}
fn default_min_amplitude() -> f64 {
    defaults::MIN_AMPLITUDE
}
fn default_min_plateau_rfu() -> f64 {
    defaults::MIN_PLATEAU_RFU
}
fn default_min_snr() -> f64 {
    defaults::MIN_SNR
}
fn default_min_growth_rate() -> f64 {
    defaults::MIN_GROWTH_RATE
}
fn default_baseline_points() -> usize {
    defaults::BASELINE_POINTS
}
fn default_start_threshold_fraction() -> f64 {
    defaults::START_THRESHOLD_FRACTION
}
fn default_start_run_length() -> usize {
    defaults::START_RUN_LENGTH
}
fn default_plateau_fraction() -> f64 {
    defaults::PLATEAU_FRACTION
}
fn default_significant_growth_fraction() -> f64 {
    defaults::SIGNIFICANT_GROWTH_FRACTION
}

impl Default for QualityFilterConfig {
    fn default() -> Self {
        Self {
            min_start_cycle: default_min_start_cycle(),
            min_amplitude: default_min_amplitude(),
            min_plateau_rfu: default_min_plateau_rfu(),
            min_snr: default_min_snr(),
            min_growth_rate: default_min_growth_rate(),
            baseline_points: default_baseline_points(),
            start_threshold_fraction: default_start_threshold_fraction(),
            start_run_length: default_start_run_length(),
            plateau_fraction: default_plateau_fraction(),
            significant_growth_fraction: default_significant_growth_fraction(),
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// R² threshold once a run has `long_run_min_points` points
    #[serde(default = "default_r2_long")]
    pub r2_threshold_long_run: f64,

    #[serde(default = "default_r2_short")]
    pub r2_threshold_short_run: f64,

    #[serde(default = "default_long_run_min_points")]
    pub long_run_min_points: usize,

    /// Fitted `k` must exceed this
    #[serde(default = "default_min_steepness")]
    pub min_steepness: f64,

    /// Fitted `L` must exceed max(this, fraction × range)
    #[serde(default = "default_min_fit_amplitude")]
    pub min_fit_amplitude: f64,

    #[serde(default = "default_fit_amplitude_range_fraction")]
    pub fit_amplitude_range_fraction: f64,
}

fn default_r2_long() -> f64 {
    defaults::R2_THRESHOLD_LONG_RUN
}
fn default_r2_short() -> f64 {
    defaults::R2_THRESHOLD_SHORT_RUN
}
fn default_long_run_min_points() -> usize {
    defaults::LONG_RUN_MIN_POINTS
}
fn default_min_steepness() -> f64 {
    defaults::MIN_STEEPNESS
}
fn default_min_fit_amplitude() -> f64 {
    defaults::FIT_AMPLITUDE_FLOOR
}
fn default_fit_amplitude_range_fraction() -> f64 {
    defaults::FIT_AMPLITUDE_RANGE_FRACTION
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            r2_threshold_long_run: default_r2_long(),
            r2_threshold_short_run: default_r2_short(),
            long_run_min_points: default_long_run_min_points(),
            min_steepness: default_min_steepness(),
            min_fit_amplitude: default_min_fit_amplitude(),
            fit_amplitude_range_fraction: default_fit_amplitude_range_fraction(),
        }
    }
}

impl ClassifierConfig {
    /// R² threshold that applies to a trace with `points` finite points.
    pub fn r2_threshold(&self, points: usize) -> f64 {
        if points >= self.long_run_min_points {
            self.r2_threshold_long_run
        } else {
            self.r2_threshold_short_run
        }
    }
}

// ============================================================================
// Fitting
// ============================================================================

/// Initial guesses, parameter bounds and solver budget for the sigmoid fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    #[serde(default = "default_min_points")]
    pub min_points: usize,

    /// Function evaluations before the solver gives up
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: usize,

    #[serde(default = "default_ftol")]
    pub ftol: f64,

    #[serde(default = "default_xtol")]
    pub xtol: f64,

    #[serde(default = "default_gtol")]
    pub gtol: f64,

    #[serde(default = "default_amplitude_guess_factor")]
    pub amplitude_guess_factor: f64,

    #[serde(default = "default_initial_steepness")]
    pub initial_steepness: f64,

    #[serde(default = "default_amplitude_lower_factor")]
    pub amplitude_lower_factor: f64,

    #[serde(default = "default_amplitude_upper_factor")]
    pub amplitude_upper_factor: f64,

    #[serde(default = "default_steepness_lower")]
    pub steepness_lower: f64,

    #[serde(default = "default_steepness_upper")]
    pub steepness_upper: f64,

    /// Baseline may drop this fraction of the range below the min reading
    #[serde(default = "default_baseline_margin_fraction")]
    pub baseline_margin_fraction: f64,

    #[serde(default = "default_steepness_window_start_cycle")]
    pub steepness_window_start_cycle: f64,

    #[serde(default = "default_steepness_window_min_points")]
    pub steepness_window_min_points: usize,
}

fn default_min_points() -> usize {
    defaults::MIN_FIT_POINTS
}
fn default_max_evaluations() -> usize {
    defaults::MAX_FIT_EVALUATIONS
}
fn default_ftol() -> f64 {
    defaults::FIT_FTOL
}
fn default_xtol() -> f64 {
    defaults::FIT_XTOL
}
fn default_gtol() -> f64 {
    defaults::FIT_GTOL
}
fn default_amplitude_guess_factor() -> f64 {
    defaults::AMPLITUDE_GUESS_FACTOR
}
fn default_initial_steepness() -> f64 {
    defaults::INITIAL_STEEPNESS
}
fn default_amplitude_lower_factor() -> f64 {
    defaults::AMPLITUDE_LOWER_FACTOR
}
fn default_amplitude_upper_factor() -> f64 {
    defaults::AMPLITUDE_UPPER_FACTOR
}
fn default_steepness_lower() -> f64 {
    defaults::STEEPNESS_LOWER_BOUND
}
fn default_steepness_upper() -> f64 {
    defaults::STEEPNESS_UPPER_BOUND
}
fn default_baseline_margin_fraction() -> f64 {
    defaults::BASELINE_MARGIN_FRACTION
}
fn default_steepness_window_start_cycle() -> f64 {
    defaults::STEEPNESS_WINDOW_START_CYCLE
}
fn default_steepness_window_min_points() -> usize {
    defaults::STEEPNESS_WINDOW_MIN_POINTS
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_points: default_min_points(),
            max_evaluations: default_max_evaluations(),
            ftol: default_ftol(),
            xtol: default_xtol(),
            gtol: default_gtol(),
            amplitude_guess_factor: default_amplitude_guess_factor(),
            initial_steepness: default_initial_steepness(),
            amplitude_lower_factor: default_amplitude_lower_factor(),
            amplitude_upper_factor: default_amplitude_upper_factor(),
            steepness_lower: default_steepness_lower(),
            steepness_upper: default_steepness_upper(),
            baseline_margin_fraction: default_baseline_margin_fraction(),
            steepness_window_start_cycle: default_steepness_window_start_cycle(),
            steepness_window_min_points: default_steepness_window_min_points(),
        }
    }
}

// ============================================================================
// Anomaly Detection
// ============================================================================

/// Adaptive floors and range fractions for the curve pathology scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    #[serde(default = "default_low_amplitude_floor")]
    pub low_amplitude_floor: f64,
    #[serde(default = "default_low_amplitude_range_fraction")]
    pub low_amplitude_range_fraction: f64,

    #[serde(default = "default_plateau_std_floor")]
    pub plateau_std_floor: f64,
    #[serde(default = "default_plateau_std_range_fraction")]
    pub plateau_std_range_fraction: f64,

    #[serde(default = "default_baseline_std_ceiling")]
    pub baseline_std_ceiling: f64,
    #[serde(default = "default_baseline_std_range_fraction")]
    pub baseline_std_range_fraction: f64,
    #[serde(default = "default_min_baseline_window")]
    pub min_baseline_window: usize,

    #[serde(default = "default_negative_step_floor")]
    pub negative_step_floor: f64,
    #[serde(default = "default_negative_step_range_fraction")]
    pub negative_step_range_fraction: f64,

    #[serde(default = "default_negative_rfu_substantial_range")]
    pub negative_rfu_substantial_range: f64,
    #[serde(default = "default_negative_rfu_low_max")]
    pub negative_rfu_low_max: f64,

    #[serde(default = "default_noise_range_fraction")]
    pub noise_range_fraction: f64,
}

fn default_low_amplitude_floor() -> f64 {
    defaults::LOW_AMPLITUDE_FLOOR
}
fn default_low_amplitude_range_fraction() -> f64 {
    defaults::LOW_AMPLITUDE_RANGE_FRACTION
}
fn default_plateau_std_floor() -> f64 {
    defaults::PLATEAU_STD_FLOOR
}
fn default_plateau_std_range_fraction() -> f64 {
    defaults::PLATEAU_STD_RANGE_FRACTION
}
fn default_baseline_std_ceiling() -> f64 {
    defaults::BASELINE_STD_CEILING
}
fn default_baseline_std_range_fraction() -> f64 {
    defaults::BASELINE_STD_RANGE_FRACTION
}
fn default_min_baseline_window() -> usize {
    defaults::MIN_BASELINE_WINDOW
}
fn default_negative_step_floor() -> f64 {
    defaults::NEGATIVE_STEP_FLOOR
}
fn default_negative_step_range_fraction() -> f64 {
    defaults::NEGATIVE_STEP_RANGE_FRACTION
}
fn default_negative_rfu_substantial_range() -> f64 {
    defaults::NEGATIVE_RFU_SUBSTANTIAL_RANGE
}
fn default_negative_rfu_low_max() -> f64 {
    defaults::NEGATIVE_RFU_LOW_MAX
}
fn default_noise_range_fraction() -> f64 {
    defaults::NOISE_RANGE_FRACTION
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            low_amplitude_floor: default_low_amplitude_floor(),
            low_amplitude_range_fraction: default_low_amplitude_range_fraction(),
            plateau_std_floor: default_plateau_std_floor(),
            plateau_std_range_fraction: default_plateau_std_range_fraction(),
            baseline_std_ceiling: default_baseline_std_ceiling(),
            baseline_std_range_fraction: default_baseline_std_range_fraction(),
            min_baseline_window: default_min_baseline_window(),
            negative_step_floor: default_negative_step_floor(),
            negative_step_range_fraction: default_negative_step_range_fraction(),
            negative_rfu_substantial_range: default_negative_rfu_substantial_range(),
            negative_rfu_low_max: default_negative_rfu_low_max(),
            noise_range_fraction: default_noise_range_fraction(),
        }
    }
}

// ============================================================================
// Batch
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Analyze wells on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
