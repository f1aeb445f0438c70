//! Tabulated periodic signal with linear interpolation.

use crate::error::{BenchError, Result};

/// One period of a signal stored as `N` equally spaced samples.
///
/// Sample `j` holds the value at `t = period * j / N`. Values between samples
/// are linearly interpolated, and the last sample interpolates towards the
/// first one so the signal wraps without a seam.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSignal {
    period: f64,
    samples: Vec<f64>,
}

impl SampledSignal {
    /// Minimum number of samples needed to interpolate.
    pub const MIN_SAMPLES: usize = 2;

    /// Create a sampled signal covering exactly one period.
    pub fn new(period: f64, samples: Vec<f64>) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(BenchError::invalid_signal(format!(
                "period must be positive and finite, got {period}"
            )));
        }
        if samples.len() < Self::MIN_SAMPLES {
            return Err(BenchError::invalid_signal(format!(
                "sampled signal needs at least {} samples, got {}",
                Self::MIN_SAMPLES,
                samples.len()
            )));
        }
        Ok(Self { period, samples })
    }

    /// Period in seconds.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// The raw sample table.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples per period.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; construction rejects short tables.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated value at time `t`.
    pub fn sample(&self, t: f64) -> f64 {
        let n = self.samples.len();
        let position = t.rem_euclid(self.period) / self.period * n as f64;
        let floor = position.floor();
        let frac = position - floor;

        // rem_euclid can round up to exactly `period`, so wrap the index too
        let i0 = (floor as usize) % n;
        let i1 = (i0 + 1) % n;

        let a = self.samples[i0];
        let b = self.samples[i1];
        a + (b - a) * frac
    }

    /// Smallest and largest sample.
    pub fn bounds(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_interpolates_between_samples() {
        let s = SampledSignal::new(1.0, vec![0.0, 1.0, 0.0, -1.0]).unwrap();
        assert_relative_eq!(s.sample(0.0), 0.0);
        assert_relative_eq!(s.sample(0.125), 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.sample(0.25), 1.0, epsilon = 1e-12);
        // last sample interpolates back towards the first
        assert_relative_eq!(s.sample(0.875), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_time_wraps() {
        let s = SampledSignal::new(2.0, vec![1.0, 3.0]).unwrap();
        assert_relative_eq!(s.sample(-0.5), s.sample(1.5), epsilon = 1e-12);
        assert_relative_eq!(s.sample(-2.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_short_table() {
        assert!(matches!(
            SampledSignal::new(1.0, vec![1.0]),
            Err(BenchError::InvalidSignal { .. })
        ));
        assert!(SampledSignal::new(1.0, Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_bad_period() {
        assert!(SampledSignal::new(0.0, vec![0.0, 1.0]).is_err());
        assert!(SampledSignal::new(-1.0, vec![0.0, 1.0]).is_err());
        assert!(SampledSignal::new(f64::NAN, vec![0.0, 1.0]).is_err());
    }

    proptest! {
        #[test]
        fn sample_stays_within_table_bounds(
            samples in prop::collection::vec(-10.0_f64..10.0, 2..64),
            period in 1e-4_f64..10.0,
            t in -1e3_f64..1e3,
        ) {
            let s = SampledSignal::new(period, samples).unwrap();
            let (lo, hi) = s.bounds();
            let v = s.sample(t);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }
}
