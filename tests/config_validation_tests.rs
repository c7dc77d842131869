//! Config Validation Tests
//!
//! Typo detection, range validation and file round trips for the analysis
//! configuration, exercised independently from the analysis pipeline.

use qpcr_scurve::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use qpcr_scurve::config::{AnalysisConfig, ConfigError, QualityOverrides};
use std::io::Write;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_quality_threshold_warns_with_suggestion() {
    let toml_str = r#"
[quality]
min_snrr = 4.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "quality.min_snrr");
    assert_eq!(warnings[0].suggestion.as_deref(), Some("quality.min_snr"));
}

#[test]
fn valid_keys_produce_no_warnings() {
    let toml_str = r#"
[quality]
min_start_cycle = 10.0
min_snr = 4.0

[classifier]
r2_threshold_long_run = 0.95

[batch]
parallel = false
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
}

#[test]
fn unknown_section_has_no_close_match() {
    let warnings = validate_unknown_keys("[completely_unrelated]\nvalue = 1\n");
    assert!(!warnings.is_empty());
    assert!(warnings.iter().all(|w| w.suggestion.is_none()));
}

#[test]
fn suggestion_requires_a_near_miss() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("fit.max_evaluation", &known).as_deref(),
        Some("fit.max_evaluations")
    );
    assert!(suggest_correction("nothing.like.this.at.all", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn defaults_pass_validation() {
    let config = AnalysisConfig::default();
    assert!(config.validate().is_ok());
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn negative_thresholds_are_errors() {
    let mut config = AnalysisConfig::default();
    config.quality.min_amplitude = -1.0;
    let (errors, _) = validate_ranges(&config);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("quality.min_amplitude"));
}

#[test]
fn invalid_config_is_rejected_with_every_problem() {
    let mut config = AnalysisConfig::default();
    config.classifier.r2_threshold_long_run = 1.5;
    config.fit.min_points = 3;
    config.fit.steepness_lower = 2.0;
    config.fit.steepness_upper = 1.0;
    config.fit.gtol = 0.0;

    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("fit.gtol")));
            assert!(errors.iter().any(|e| e.contains("classifier.r2_threshold_long_run")));
            assert!(errors.iter().any(|e| e.contains("fit.min_points")));
            assert!(errors.iter().any(|e| e.contains("fit.steepness")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn unusual_settings_only_warn() {
    let mut config = AnalysisConfig::default();
    config.classifier.r2_threshold_short_run = 0.95;
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "classifier.r2_threshold_short_run");
    assert!(config.validate().is_ok());
}

// ============================================================================
// File Round Trips
// ============================================================================

#[test]
fn save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qpcr_config.toml");

    let mut config = AnalysisConfig::default();
    config.quality.min_snr = 5.0;
    config.batch.parallel = false;
    config.save_to_file(&path).unwrap();

    let loaded = AnalysisConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_file_fills_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[quality]\nmin_start_cycle = 12.0").unwrap();

    let loaded = AnalysisConfig::load_from_file(file.path()).unwrap();
    assert!((loaded.quality.min_start_cycle - 12.0).abs() < f64::EPSILON);
    assert_eq!(loaded.classifier, AnalysisConfig::default().classifier);
    assert_eq!(loaded.fit, AnalysisConfig::default().fit);
}

#[test]
fn invalid_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[classifier]\nr2_threshold_short_run = 0.0").unwrap();
    let err = AnalysisConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[quality\nmin_snr = ").unwrap();
    let err = AnalysisConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AnalysisConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn overrides_replace_only_given_thresholds() {
    let base = AnalysisConfig::default();
    let overrides = QualityOverrides {
        min_snr: Some(10.0),
        min_steepness: Some(0.2),
        ..Default::default()
    };
    assert!(!overrides.is_empty());

    let config = base.with_overrides(&overrides);
    assert!((config.quality.min_snr - 10.0).abs() < f64::EPSILON);
    assert!((config.classifier.min_steepness - 0.2).abs() < f64::EPSILON);
    assert!((config.quality.min_amplitude - base.quality.min_amplitude).abs() < f64::EPSILON);
    assert_eq!(base.with_overrides(&QualityOverrides::default()), base);
}
