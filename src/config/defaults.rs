//! System-wide default constants.
//!
//! Every tunable in [`super::AnalysisConfig`] defaults to one of these values,
//! so behaviour is unchanged when no config file is present.

// ============================================================================
// Fitting
// ============================================================================

/// Minimum number of finite points required to attempt a sigmoid fit.
pub const MIN_FIT_POINTS: usize = 5;

/// Function-evaluation budget for the bounded least-squares solver.
pub const MAX_FIT_EVALUATIONS: usize = 5_000;

/// Relative cost-reduction tolerance for solver convergence.
pub const FIT_FTOL: f64 = 1e-8;

/// Relative step-size tolerance for solver convergence.
pub const FIT_XTOL: f64 = 1e-8;

/// Residual/Jacobian-column orthogonality tolerance for solver convergence.
pub const FIT_GTOL: f64 = 1e-8;

/// Initial amplitude guess as a multiple of the fluorescence range.
pub const AMPLITUDE_GUESS_FACTOR: f64 = 1.1;

/// Initial steepness guess.
pub const INITIAL_STEEPNESS: f64 = 0.5;

/// Amplitude bounds as multiples of the fluorescence range.
pub const AMPLITUDE_LOWER_FACTOR: f64 = 0.1;
pub const AMPLITUDE_UPPER_FACTOR: f64 = 5.0;

/// Steepness bounds.
pub const STEEPNESS_LOWER_BOUND: f64 = 0.01;
pub const STEEPNESS_UPPER_BOUND: f64 = 10.0;

/// Baseline may sit this fraction of the range below the minimum reading.
///
/// A full range lets a straight-line trace settle on its shallow
/// least-squares optimum, where the steepness rule rejects it.
pub const BASELINE_MARGIN_FRACTION: f64 = 1.0;

/// First cycle considered for post-cycle-8 steepness.
pub const STEEPNESS_WINDOW_START_CYCLE: f64 = 8.0;

/// Minimum cycles in the steepness window before falling back to `k`.
pub const STEEPNESS_WINDOW_MIN_POINTS: usize = 3;

// ============================================================================
// Quality filters
// ============================================================================

pub const MIN_START_CYCLE: f64 = 8.0;
pub const MIN_AMPLITUDE: f64 = 100.0;
pub const MIN_PLATEAU_RFU: f64 = 50.0;
pub const MIN_SNR: f64 = 3.0;
pub const MIN_GROWTH_RATE: f64 = 5.0;

/// Leading points used as the pre-amplification baseline.
pub const BASELINE_POINTS: usize = 5;

/// Start-cycle threshold sits this fraction of the max reading above baseline.
pub const START_THRESHOLD_FRACTION: f64 = 0.1;

/// Consecutive points that must exceed the start threshold.
pub const START_RUN_LENGTH: usize = 3;

/// Trailing fraction of the trace averaged as the plateau.
pub const PLATEAU_FRACTION: f64 = 0.25;

/// Growth steps above this fraction of the max step count as significant.
pub const SIGNIFICANT_GROWTH_FRACTION: f64 = 0.3;

// ============================================================================
// Classifier
// ============================================================================

/// R² threshold for runs with at least `LONG_RUN_MIN_POINTS` points.
pub const R2_THRESHOLD_LONG_RUN: f64 = 0.90;

/// R² threshold for shorter runs.
pub const R2_THRESHOLD_SHORT_RUN: f64 = 0.85;

pub const LONG_RUN_MIN_POINTS: usize = 20;

pub const MIN_STEEPNESS: f64 = 0.05;

/// Fitted amplitude must exceed max(floor, fraction × range).
pub const FIT_AMPLITUDE_FLOOR: f64 = 50.0;
pub const FIT_AMPLITUDE_RANGE_FRACTION: f64 = 0.3;

// ============================================================================
// Anomaly detection
// ============================================================================

pub const LOW_AMPLITUDE_FLOOR: f64 = 50.0;
pub const LOW_AMPLITUDE_RANGE_FRACTION: f64 = 0.1;

pub const PLATEAU_STD_FLOOR: f64 = 20.0;
pub const PLATEAU_STD_RANGE_FRACTION: f64 = 0.05;

pub const BASELINE_STD_CEILING: f64 = 50.0;
pub const BASELINE_STD_RANGE_FRACTION: f64 = 0.15;

/// Minimum leading points inspected for baseline stability.
pub const MIN_BASELINE_WINDOW: usize = 3;

pub const NEGATIVE_STEP_FLOOR: f64 = 30.0;
pub const NEGATIVE_STEP_RANGE_FRACTION: f64 = 0.1;

/// Negative readings are ignored when the range exceeds this value.
pub const NEGATIVE_RFU_SUBSTANTIAL_RANGE: f64 = 50.0;

/// Negative readings are ignored when the maximum stays below this value.
pub const NEGATIVE_RFU_LOW_MAX: f64 = 20.0;

pub const NOISE_RANGE_FRACTION: f64 = 0.3;

// ============================================================================
// Config file discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "QPCR_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "qpcr_config.toml";
