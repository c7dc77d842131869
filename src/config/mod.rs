//! Analysis Configuration Module
//!
//! Every threshold used by the fitter, the quality filters, the anomaly scan
//! and the classifier, loaded from TOML with per-field defaults.
//!
//! ## Loading Order
//!
//! 1. `QPCR_CONFIG` environment variable (path to TOML file)
//! 2. `qpcr_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The analysis core never reads global state; callers pass the config in:
//!
//! ```ignore
//! let config = AnalysisConfig::load();
//! let report = analysis::batch_analyze(&wells, &config);
//! ```

mod analysis_config;
pub mod defaults;
pub mod validation;

pub use analysis_config::*;
