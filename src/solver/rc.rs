//! Series R-C circuit (the capacitor experiment).
//!
//! The drive voltage sits across the resistor `R` in series with the capacitor
//! `C`. Both component voltages are observed.

use std::f64::consts::{FRAC_PI_2, PI};

use tracing::info;

use super::integrator::{first_non_finite, relax};
use super::SolverConfig;
use crate::error::{BenchError, Result};
use crate::signal::{PeriodicSignal, SampledSignal, Sine};

/// Component values of a series RC circuit, in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RcParams {
    /// Ohms
    pub resistance: f64,
    /// Farads
    pub capacitance: f64,
}

impl RcParams {
    /// Create a parameter set from SI values.
    pub fn new(resistance: f64, capacitance: f64) -> Self {
        Self {
            resistance,
            capacitance,
        }
    }

    /// Time constant `R·C` in seconds.
    pub fn time_constant(&self) -> f64 {
        self.resistance * self.capacitance
    }

    /// Corner frequency `1/(2π·R·C)` in Hz.
    pub fn corner_frequency(&self) -> f64 {
        1.0 / (2.0 * PI * self.time_constant())
    }

    /// Reject values for which the circuit has no finite response.
    pub fn validate(&self, model: &str) -> Result<()> {
        if !(self.resistance.is_finite() && self.capacitance.is_finite()) {
            return Err(BenchError::degenerate(model, "component values must be finite"));
        }
        if self.capacitance <= 0.0 {
            return Err(BenchError::degenerate(
                model,
                format!("capacitance must be positive, got {} F", self.capacitance),
            ));
        }
        if self.resistance < 0.0 {
            return Err(BenchError::degenerate(
                model,
                format!("resistance must not be negative, got {} Ω", self.resistance),
            ));
        }
        Ok(())
    }
}

/// Capacitor and resistor voltage of an RC circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct RcOutputs {
    pub capacitor: PeriodicSignal,
    pub resistor: PeriodicSignal,
}

/// Component voltages for an arbitrary periodic drive.
///
/// The capacitor voltage is advanced with the exact step response of an RC
/// low-pass to a drive held constant over the step, which stays stable for any
/// ratio of step size to time constant.
pub fn solve_numeric(
    model: &str,
    params: &RcParams,
    input: &PeriodicSignal,
    config: &SolverConfig,
) -> Result<RcOutputs> {
    params.validate(model)?;

    let period = input.period();
    let tau = params.time_constant();
    let points = config.point_budget.points(period, 2.0 * PI * tau);
    info!(
        model,
        fc = params.corner_frequency(),
        points,
        passes = config.relaxation_passes,
        "recalculate rc circuit"
    );

    let mut capacitor_voltage = 0.0;
    let [uc, ur] = relax(input, points, config.relaxation_passes, |u, dt| {
        let observed = [capacitor_voltage, u - capacitor_voltage];
        let settle = -(-dt / tau).exp_m1();
        capacitor_voltage += (u - capacitor_voltage) * settle;
        observed
    });

    let tables = [uc, ur];
    if let Some((index, value)) = first_non_finite(&tables) {
        return Err(BenchError::degenerate(
            model,
            format!("integration produced {value} at point {index}"),
        ));
    }
    let [uc, ur] = tables;

    Ok(RcOutputs {
        capacitor: SampledSignal::new(period, uc)?.into(),
        resistor: SampledSignal::new(period, ur)?.into(),
    })
}

/// Steady-state component voltages for a sinusoidal drive.
///
/// The capacitor passes the drive's DC offset; the resistor does not.
pub fn solve_analytic(
    model: &str,
    params: &RcParams,
    input: &Sine,
    _config: &SolverConfig,
) -> Result<RcOutputs> {
    params.validate(model)?;
    info!(model, frequency = input.frequency(), "create rc sines");

    let w = input.omega();
    let reactance = 1.0 / (w * params.capacitance);
    let impedance = params.resistance.hypot(reactance);
    let current = input.amplitude() / impedance;
    // the current leads the drive
    let lead = reactance.atan2(params.resistance);
    let phase = input.phase() + lead;

    let degenerate =
        |e: BenchError| BenchError::degenerate(model, format!("analytic solution is not finite: {e}"));
    let resistor = Sine::new(current * params.resistance, w, phase, 0.0).map_err(degenerate)?;
    let capacitor = Sine::new(current * reactance, w, phase - FRAC_PI_2, input.offset())
        .map_err(degenerate)?;

    Ok(RcOutputs {
        capacitor: capacitor.into(),
        resistor: resistor.into(),
    })
}

/// Component voltages for `input`, taking the analytic path for sines unless `force_numeric`.
pub fn solve(
    model: &str,
    params: &RcParams,
    input: &PeriodicSignal,
    force_numeric: bool,
    config: &SolverConfig,
) -> Result<RcOutputs> {
    match input.as_sine() {
        Some(sine) if !force_numeric => solve_analytic(model, params, sine, config),
        _ => solve_numeric(model, params, input, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{FunctionGenerator, Waveform};
    use approx::assert_relative_eq;

    #[test]
    fn test_analytic_at_corner() {
        // 1 kΩ, 100 nF: fc ≈ 1591.5 Hz
        let p = RcParams::new(1000.0, 100e-9);
        let drive = Sine::with_frequency(1.0, p.corner_frequency()).unwrap();
        let out = solve_analytic("rc", &p, &drive, &SolverConfig::default()).unwrap();

        let ur = out.resistor.fundamental();
        let uc = out.capacitor.fundamental();
        assert_relative_eq!(ur.amplitude, 1.0 / 2f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(uc.amplitude, 1.0 / 2f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(ur.phase, PI / 4.0, epsilon = 1e-9);
        assert_relative_eq!(uc.phase, -PI / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_voltages_sum_to_drive() {
        let p = RcParams::new(470.0, 220e-9);
        let drive = Sine::new(2.0, 2.0 * PI * 900.0, 0.7, 0.5).unwrap();
        let out = solve_analytic("rc", &p, &drive, &SolverConfig::default()).unwrap();
        for k in 0..20 {
            let t = k as f64 * 7.3e-5;
            let sum = out.capacitor.sample(t) + out.resistor.sample(t);
            assert_relative_eq!(sum, drive.sample(t), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_numeric_matches_analytic() {
        let p = RcParams::new(1000.0, 100e-9);
        let config = SolverConfig::default();
        let drive = Sine::new(1.0, 2.0 * PI * 1000.0, 0.0, 0.25).unwrap();
        let analytic = solve_analytic("rc", &p, &drive, &config).unwrap();
        let numeric = solve_numeric("rc", &p, &drive.into(), &config).unwrap();

        for (a, n) in [
            (&analytic.capacitor, &numeric.capacitor),
            (&analytic.resistor, &numeric.resistor),
        ] {
            let a = a.fundamental();
            let n = n.fundamental();
            assert_relative_eq!(n.amplitude, a.amplitude, max_relative = 0.02);
            assert!(n.phase_relative_to(&a).abs() < 0.02 * PI);
        }
    }

    #[test]
    fn test_square_wave_charges_capacitor() {
        // time constant much shorter than the half period: the capacitor follows the drive
        let p = RcParams::new(100.0, 10e-9);
        let drive = FunctionGenerator::new()
            .with_waveform(Waveform::Square)
            .with_frequency(100.0)
            .signal()
            .unwrap();
        let out = solve("rc", &p, &drive, false, &SolverConfig::default()).unwrap();
        assert_relative_eq!(out.capacitor.sample(0.004), 1.0, epsilon = 1e-6);
        assert_relative_eq!(out.capacitor.sample(0.009), -1.0, epsilon = 1e-6);
        assert_relative_eq!(out.resistor.sample(0.004), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_capacitance_is_degenerate() {
        let p = RcParams::new(1000.0, 0.0);
        let drive: PeriodicSignal = Sine::with_frequency(1.0, 50.0).unwrap().into();
        assert!(matches!(
            solve("rc", &p, &drive, false, &SolverConfig::default()),
            Err(BenchError::DegenerateParameters { .. })
        ));
    }
}
