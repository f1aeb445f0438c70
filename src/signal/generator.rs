//! Function generator waveforms.
//!
//! The generator produces the bench's drive signal. A sine stays analytic so
//! the circuit models can take their closed-form path; the other shapes are
//! tabulated over one period.

use std::f64::consts::PI;
use std::fmt;

use super::{PeriodicSignal, SampledSignal, Sine};
use crate::error::{BenchError, Result};

/// Samples per period for tabulated waveforms.
pub const TABLE_POINTS: usize = 1000;

/// Function generator waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    /// Analytic sine
    #[default]
    Sine,
    /// +A for the first half period, -A for the second
    Square,
    /// Rises from 0 to +A, falls to -A, returns to 0
    Triangle,
    /// Rises linearly from -A to +A
    Sawtooth,
}

impl Waveform {
    /// Parse shape from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Some(Self::Sine),
            "square" | "sq" => Some(Self::Square),
            "triangle" | "tri" => Some(Self::Triangle),
            "sawtooth" | "saw" => Some(Self::Sawtooth),
            _ => None,
        }
    }

    /// Normalized shape at phase `x` in `[0, 1)`, ranging over `[-1, 1]`.
    fn shape(&self, x: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * x).sin(),
            Waveform::Square => {
                if x < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                if x < 0.25 {
                    4.0 * x
                } else if x < 0.75 {
                    2.0 - 4.0 * x
                } else {
                    4.0 * x - 4.0
                }
            }
            Waveform::Sawtooth => 2.0 * x - 1.0,
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        };
        write!(f, "{name}")
    }
}

/// Settings of the bench's function generator.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionGenerator {
    pub waveform: Waveform,
    /// Peak amplitude in volts
    pub amplitude: f64,
    /// Frequency in Hz
    pub frequency: f64,
    /// DC offset in volts
    pub offset: f64,
}

impl Default for FunctionGenerator {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            amplitude: 1.0,
            frequency: 1000.0,
            offset: 0.0,
        }
    }
}

impl FunctionGenerator {
    /// Create a generator with default settings (1 V, 1 kHz sine).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the waveform.
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Set the peak amplitude in volts.
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the frequency in Hz.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the DC offset in volts.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Build the signal for the current settings.
    pub fn signal(&self) -> Result<PeriodicSignal> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(BenchError::invalid_signal(format!(
                "generator frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.amplitude.is_finite() && self.offset.is_finite()) {
            return Err(BenchError::invalid_signal(
                "generator amplitude and offset must be finite",
            ));
        }

        match self.waveform {
            Waveform::Sine => Ok(Sine::new(
                self.amplitude,
                2.0 * PI * self.frequency,
                0.0,
                self.offset,
            )?
            .into()),
            shape => {
                let samples = (0..TABLE_POINTS)
                    .map(|j| {
                        let x = j as f64 / TABLE_POINTS as f64;
                        self.amplitude * shape.shape(x) + self.offset
                    })
                    .collect();
                Ok(SampledSignal::new(1.0 / self.frequency, samples)?.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_waveform_from_str() {
        assert_eq!(Waveform::from_str("SIN"), Some(Waveform::Sine));
        assert_eq!(Waveform::from_str("tri"), Some(Waveform::Triangle));
        assert_eq!(Waveform::from_str("saw"), Some(Waveform::Sawtooth));
        assert_eq!(Waveform::from_str("noise"), None);
    }

    #[test]
    fn test_sine_stays_analytic() {
        let s = FunctionGenerator::new().with_frequency(50.0).signal().unwrap();
        let sine = s.as_sine().expect("sine should be analytic");
        assert_relative_eq!(sine.frequency(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_is_tabulated() {
        let s = FunctionGenerator::new()
            .with_waveform(Waveform::Square)
            .with_amplitude(2.0)
            .with_frequency(100.0)
            .signal()
            .unwrap();
        assert!(s.as_sine().is_none());
        assert_relative_eq!(s.period(), 0.01, epsilon = 1e-15);
        assert_relative_eq!(s.sample(0.002), 2.0);
        assert_relative_eq!(s.sample(0.007), -2.0);
    }

    #[test]
    fn test_triangle_shape() {
        let s = FunctionGenerator::new()
            .with_waveform(Waveform::Triangle)
            .with_frequency(1.0)
            .with_offset(1.0)
            .signal()
            .unwrap();
        assert_relative_eq!(s.sample(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.sample(0.25), 2.0, epsilon = 1e-9);
        assert_relative_eq!(s.sample(0.75), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_zero_frequency() {
        let err = FunctionGenerator::new().with_frequency(0.0).signal();
        assert!(matches!(err, Err(BenchError::InvalidSignal { .. })));
    }
}
