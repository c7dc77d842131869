//! Descriptive statistics over RFU slices.
//!
//! Empty input yields NaN rather than a panic; callers compare with `>=`,
//! so a NaN statistic fails its check.

use statrs::statistics::Statistics;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation (divides by `n`).
pub fn population_std(values: &[f64]) -> f64 {
    values.iter().population_std_dev()
}

pub fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// `max - min`; 0 for an empty slice.
pub fn range(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        max_value(values) - min_value(values)
    }
}

/// Consecutive differences `v[i+1] - v[i]`.
pub fn diffs(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Leading `n` values, or all of them when the slice is shorter.
pub fn head(values: &[f64], n: usize) -> &[f64] {
    &values[..n.min(values.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_std_divides_by_n() {
        // Sample std would be sqrt(2.5); population std is sqrt(2)
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((population_std(&v) - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((mean(&v) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_values_have_zero_std() {
        assert!(population_std(&[50.0; 5]).abs() < 1e-12);
    }

    #[test]
    fn test_empty_mean_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!((range(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_diffs_and_head() {
        assert_eq!(diffs(&[1.0, 4.0, 2.0]), vec![3.0, -2.0]);
        assert_eq!(head(&[1.0, 2.0], 5), &[1.0, 2.0]);
        assert_eq!(head(&[1.0, 2.0, 3.0], 2), &[1.0, 2.0]);
    }
}
