//! Seeded synthetic amplification curves.
//!
//! Used by the `simulation` binary and the integration tests. The same seed
//! always produces the same plate.

use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use crate::curve_fit::sigmoid;
use crate::types::{Plate, SigmoidParams, WellTrace};

/// Cycle count of a standard run.
pub const DEFAULT_CYCLES: usize = 40;

/// A sigmoid sampled at cycles `1..=cycles` with additive Gaussian noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticCurve {
    pub params: SigmoidParams,
    pub cycles: usize,
    /// Standard deviation of the additive noise in RFU
    pub noise_sd: f64,
}

impl SyntheticCurve {
    pub fn new(params: SigmoidParams, cycles: usize, noise_sd: f64) -> Self {
        Self {
            params,
            cycles,
            noise_sd,
        }
    }

    fn cycle_axis(&self) -> Vec<f64> {
        (1..=self.cycles).map(|c| c as f64).collect()
    }

    /// The curve without noise.
    pub fn noiseless(&self) -> WellTrace {
        let cycles = self.cycle_axis();
        let rfu = cycles.iter().map(|&x| sigmoid(x, &self.params)).collect();
        WellTrace::new(cycles, rfu)
    }

    /// Sample the curve. A non-positive or non-finite `noise_sd` gives the
    /// noiseless trace.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> WellTrace {
        let Ok(noise) = Normal::new(0.0, self.noise_sd) else {
            return self.noiseless();
        };
        if self.noise_sd <= 0.0 {
            return self.noiseless();
        }
        let mut trace = self.noiseless();
        for v in &mut trace.rfu {
            *v += noise.sample(rng);
        }
        trace
    }
}

/// Shapes the plate generator can lay down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Clean late-rising amplification
    Positive,
    /// Flat noisy baseline
    Negative,
    /// Amplification already under way in the first cycles
    EarlyStart,
    /// Straight-line drift with no sigmoid shape
    LinearDrift,
    /// Real amplification buried in heavy noise
    Noisy,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Positive,
        Scenario::Negative,
        Scenario::EarlyStart,
        Scenario::LinearDrift,
        Scenario::Noisy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Positive => "positive",
            Scenario::Negative => "negative",
            Scenario::EarlyStart => "early_start",
            Scenario::LinearDrift => "linear_drift",
            Scenario::Noisy => "noisy",
        }
    }

    fn trace(&self, rng: &mut StdRng, cycles: usize) -> WellTrace {
        match self {
            Scenario::Positive => {
                let amplitude = rng.gen_range(600.0..1500.0);
                let midpoint = rng.gen_range(18.0..28.0);
                let steepness = rng.gen_range(0.4..0.9);
                let baseline = rng.gen_range(20.0..80.0);
                SyntheticCurve::new(
                    SigmoidParams::new(amplitude, steepness, midpoint, baseline),
                    cycles,
                    amplitude * 0.005,
                )
                .generate(rng)
            }
            Scenario::Negative => {
                let level = rng.gen_range(20.0..80.0);
                let curve = SyntheticCurve::new(SigmoidParams::new(0.0, 0.5, 20.0, level), cycles, 3.0);
                curve.generate(rng)
            }
            Scenario::EarlyStart => SyntheticCurve::new(
                SigmoidParams::new(800.0, 0.8, 5.0, 20.0),
                cycles,
                2.0,
            )
            .generate(rng),
            Scenario::LinearDrift => {
                let slope = rng.gen_range(5.0..15.0);
                let cycles: Vec<f64> = (1..=cycles).map(|c| c as f64).collect();
                let rfu = cycles.iter().map(|&x| 100.0 + slope * (x - 1.0)).collect();
                WellTrace::new(cycles, rfu)
            }
            Scenario::Noisy => SyntheticCurve::new(
                SigmoidParams::new(200.0, 0.5, 22.0, 50.0),
                cycles,
                60.0,
            )
            .generate(rng),
        }
    }
}

/// Row-major well identifier on a 96-well plate: `A1`..`H12`.
pub fn well_id(index: usize) -> String {
    let row = (b'A' + (index / 12 % 8) as u8) as char;
    format!("{row}{}", index % 12 + 1)
}

/// Wells on a standard plate.
pub const PLATE_WELLS: usize = 96;

/// Build a plate of up to [`PLATE_WELLS`] traces, cycling through
/// `scenarios` in order. An empty scenario list means all of them.
pub fn synthetic_plate(seed: u64, wells: usize, cycles: usize, scenarios: &[Scenario]) -> Plate {
    let mut rng = StdRng::seed_from_u64(seed);
    let scenarios = if scenarios.is_empty() {
        &Scenario::ALL[..]
    } else {
        scenarios
    };

    (0..wells.min(PLATE_WELLS))
        .map(|i| {
            let scenario = scenarios[i % scenarios.len()];
            (well_id(i), scenario.trace(&mut rng, cycles))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_plate() {
        let a = synthetic_plate(42, 10, DEFAULT_CYCLES, &[]);
        let b = synthetic_plate(42, 10, DEFAULT_CYCLES, &[]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_well_ids() {
        assert_eq!(well_id(0), "A1");
        assert_eq!(well_id(11), "A12");
        assert_eq!(well_id(12), "B1");
        assert_eq!(well_id(95), "H12");
    }

    #[test]
    fn test_zero_noise_is_noiseless() {
        let curve = SyntheticCurve::new(SigmoidParams::new(500.0, 0.5, 20.0, 30.0), 30, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(curve.generate(&mut rng), curve.noiseless());
    }

    #[test]
    fn test_noiseless_hits_midpoint_level() {
        let curve = SyntheticCurve::new(SigmoidParams::new(500.0, 0.5, 20.0, 30.0), 40, 0.0);
        let trace = curve.noiseless();
        assert_eq!(trace.len(), 40);
        assert!((trace.rfu[19] - 280.0).abs() < 1e-9);
    }
}
