//! Analytic sinusoid.

use std::f64::consts::PI;

use crate::error::{BenchError, Result};

/// A sinusoid `amplitude * sin(omega * t + phase) + offset`.
///
/// This is the only signal shape the circuit models can solve in closed form,
/// so it is kept analytic instead of being tabulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sine {
    amplitude: f64,
    omega: f64,
    phase: f64,
    offset: f64,
}

impl Sine {
    /// Create a new sine.
    ///
    /// # Arguments
    /// * `amplitude` - Peak amplitude in volts
    /// * `omega` - Angular frequency in rad/s, must be positive
    /// * `phase` - Phase in radians
    /// * `offset` - DC offset in volts
    pub fn new(amplitude: f64, omega: f64, phase: f64, offset: f64) -> Result<Self> {
        if !(omega.is_finite() && omega > 0.0) {
            return Err(BenchError::invalid_signal(format!(
                "sine angular frequency must be positive and finite, got {omega}"
            )));
        }
        if !(amplitude.is_finite() && phase.is_finite() && offset.is_finite()) {
            return Err(BenchError::invalid_signal(
                "sine amplitude, phase and offset must be finite",
            ));
        }
        Ok(Self {
            amplitude,
            omega,
            phase,
            offset,
        })
    }

    /// Create a zero-phase, zero-offset sine from a frequency in Hz.
    pub fn with_frequency(amplitude: f64, frequency: f64) -> Result<Self> {
        Self::new(amplitude, 2.0 * PI * frequency, 0.0, 0.0)
    }

    /// Peak amplitude.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Angular frequency in rad/s.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// DC offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.omega / (2.0 * PI)
    }

    /// Period in seconds.
    pub fn period(&self) -> f64 {
        2.0 * PI / self.omega
    }

    /// Value at time `t`.
    pub fn sample(&self, t: f64) -> f64 {
        self.amplitude * (self.omega * t + self.phase).sin() + self.offset
    }
}
