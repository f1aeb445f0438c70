//! Periodic signals.
//!
//! Every voltage on the bench is a [`PeriodicSignal`]: a pure function of
//! time with a fixed repeat period. Two representations exist:
//!
//! - [`Sine`] - analytic sinusoid, solvable in closed form by the circuit models
//! - [`SampledSignal`] - one period tabulated and linearly interpolated
//!
//! Signals are immutable once built. A node that needs a new waveform builds a
//! new signal and publishes it, so readers can keep a [`SignalRef`] without
//! seeing it change underneath them.

mod generator;
mod sampled;
mod sine;

pub use generator::{FunctionGenerator, Waveform};
pub use sampled::SampledSignal;
pub use sine::Sine;

use std::f64::consts::PI;
use std::sync::Arc;

/// Shared handle to an immutable signal.
pub type SignalRef = Arc<PeriodicSignal>;

/// A function of time with a fixed period.
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodicSignal {
    Sine(Sine),
    Sampled(SampledSignal),
}

impl PeriodicSignal {
    /// Period in seconds.
    pub fn period(&self) -> f64 {
        match self {
            PeriodicSignal::Sine(s) => s.period(),
            PeriodicSignal::Sampled(s) => s.period(),
        }
    }

    /// Value at time `t`. Defined for every finite `t`, including negative times.
    pub fn sample(&self, t: f64) -> f64 {
        match self {
            PeriodicSignal::Sine(s) => s.sample(t),
            PeriodicSignal::Sampled(s) => s.sample(t),
        }
    }

    /// The analytic sinusoid, if this is one.
    pub fn as_sine(&self) -> Option<&Sine> {
        match self {
            PeriodicSignal::Sine(s) => Some(s),
            PeriodicSignal::Sampled(_) => None,
        }
    }

    /// Evenly spaced samples over `periods` periods, starting at `t = 0`.
    pub fn render(&self, samples: usize, periods: f64) -> Vec<f64> {
        let span = self.period() * periods;
        (0..samples)
            .map(|j| self.sample(span * j as f64 / samples as f64))
            .collect()
    }

    /// Amplitude and phase of the first harmonic.
    ///
    /// Sampled signals are projected onto `sin`/`cos` over their own table,
    /// so the result is exact for a tabulated sinusoid.
    pub fn fundamental(&self) -> Phasor {
        match self {
            PeriodicSignal::Sine(s) => {
                if s.amplitude() < 0.0 {
                    Phasor::new(-s.amplitude(), s.phase() + PI)
                } else {
                    Phasor::new(s.amplitude(), s.phase())
                }
            }
            PeriodicSignal::Sampled(s) => {
                let n = s.len() as f64;
                let (sin_sum, cos_sum) = s.samples().iter().enumerate().fold(
                    (0.0, 0.0),
                    |(a, b), (j, &v)| {
                        let x = 2.0 * PI * j as f64 / n;
                        (a + v * x.sin(), b + v * x.cos())
                    },
                );
                let a = 2.0 * sin_sum / n;
                let b = 2.0 * cos_sum / n;
                Phasor::new(a.hypot(b), b.atan2(a))
            }
        }
    }
}

impl From<Sine> for PeriodicSignal {
    fn from(s: Sine) -> Self {
        PeriodicSignal::Sine(s)
    }
}

impl From<SampledSignal> for PeriodicSignal {
    fn from(s: SampledSignal) -> Self {
        PeriodicSignal::Sampled(s)
    }
}

/// Amplitude and phase of a sinusoid `amplitude * sin(omega * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phasor {
    pub amplitude: f64,
    /// Phase in radians, wrapped into `(-pi, pi]`
    pub phase: f64,
}

impl Phasor {
    /// Create a phasor, wrapping the phase.
    pub fn new(amplitude: f64, phase: f64) -> Self {
        Self {
            amplitude,
            phase: wrap_phase(phase),
        }
    }

    /// Phase of `self` relative to `other`, wrapped into `(-pi, pi]`.
    pub fn phase_relative_to(&self, other: &Phasor) -> f64 {
        wrap_phase(self.phase - other.phase)
    }
}

/// Wrap an angle into `(-pi, pi]`.
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = (phase + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn tabulated_sine(amplitude: f64, phase: f64, n: usize) -> PeriodicSignal {
        let samples = (0..n)
            .map(|j| amplitude * (2.0 * PI * j as f64 / n as f64 + phase).sin())
            .collect();
        SampledSignal::new(1e-3, samples).unwrap().into()
    }

    #[test]
    fn test_fundamental_of_tabulated_sine() {
        let s = tabulated_sine(0.7, 0.4, 1000);
        let p = s.fundamental();
        assert_relative_eq!(p.amplitude, 0.7, epsilon = 1e-9);
        assert_relative_eq!(p.phase, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_fundamental_of_negative_sine() {
        let s: PeriodicSignal = Sine::new(-2.0, 10.0, 0.0, 0.0).unwrap().into();
        let p = s.fundamental();
        assert_relative_eq!(p.amplitude, 2.0);
        assert_relative_eq!(p.phase, PI, epsilon = 1e-12);
    }

    #[test]
    fn test_render_covers_periods() {
        let s: PeriodicSignal = Sine::with_frequency(1.0, 1.0).unwrap().into();
        let trace = s.render(8, 2.0);
        assert_eq!(trace.len(), 8);
        assert_relative_eq!(trace[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(trace[2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(trace[7], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_phase() {
        assert_relative_eq!(wrap_phase(3.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_phase(-PI), PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_phase(-0.5), -0.5, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn sine_is_periodic(
            amplitude in -10.0_f64..10.0,
            omega in 1.0_f64..1e5,
            phase in -10.0_f64..10.0,
            offset in -5.0_f64..5.0,
            cycles in -200.0_f64..200.0,
        ) {
            let s: PeriodicSignal = Sine::new(amplitude, omega, phase, offset).unwrap().into();
            let t = cycles * s.period();
            let tol = 1e-9 * (1.0 + amplitude.abs() + offset.abs());
            prop_assert!((s.sample(t) - s.sample(t + s.period())).abs() <= tol);
        }

        #[test]
        fn sampled_is_periodic(
            samples in prop::collection::vec(-1.0_f64..1.0, 2..256),
            period in 1e-4_f64..1.0,
            cycles in -100.0_f64..100.0,
        ) {
            let s: PeriodicSignal = SampledSignal::new(period, samples).unwrap().into();
            let t = cycles * period;
            prop_assert!((s.sample(t) - s.sample(t + period)).abs() <= 1e-9);
        }
    }
}
