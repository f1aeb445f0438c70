//! Series R-L-C resonant circuit.
//!
//! The drive voltage sits across a series loop of the resistor `R`, the
//! inductor `L` (with its loss resistance `R_L`) and the capacitor `C`. The
//! observed output is the voltage across `R`.
//!
//! Differentiating the loop equation once gives the second-order ODE for the
//! loop current `i`:
//!
//! ```text
//! d²i/dt² = -(R + R_L)/L · di/dt - i/(L·C) - (du/dt)/L
//! ```
//!
//! With this sign convention `i` counts against the drive, so the resistor
//! voltage is `-i·R`.

use std::f64::consts::PI;

use tracing::info;

use super::integrator::{first_non_finite, relax};
use super::SolverConfig;
use crate::error::{BenchError, Result};
use crate::signal::{PeriodicSignal, SampledSignal, Sine};

/// Component values of a series resonant circuit, in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResonantParams {
    /// Ohms
    pub resistance: f64,
    /// Henries
    pub inductance: f64,
    /// Farads
    pub capacitance: f64,
}

impl ResonantParams {
    /// Create a parameter set from SI values.
    pub fn new(resistance: f64, inductance: f64, capacitance: f64) -> Self {
        Self {
            resistance,
            inductance,
            capacitance,
        }
    }

    /// Natural (undamped) period `2π·sqrt(L·C)`.
    pub fn natural_period(&self) -> f64 {
        2.0 * PI * (self.inductance * self.capacitance).sqrt()
    }

    /// Natural frequency in Hz.
    pub fn natural_frequency(&self) -> f64 {
        1.0 / self.natural_period()
    }

    /// Reject values for which the loop equation has no finite solution.
    pub fn validate(&self, model: &str, config: &SolverConfig) -> Result<()> {
        let finite = self.resistance.is_finite()
            && self.inductance.is_finite()
            && self.capacitance.is_finite()
            && config.inductor_loss.is_finite();
        if !finite {
            return Err(BenchError::degenerate(model, "component values must be finite"));
        }
        if self.inductance <= 0.0 {
            return Err(BenchError::degenerate(
                model,
                format!("inductance must be positive, got {} H", self.inductance),
            ));
        }
        if self.capacitance <= 0.0 {
            return Err(BenchError::degenerate(
                model,
                format!("capacitance must be positive, got {} F", self.capacitance),
            ));
        }
        if self.resistance < 0.0 || config.inductor_loss < 0.0 {
            return Err(BenchError::degenerate(model, "resistances must not be negative"));
        }
        Ok(())
    }
}

/// Integration state carried across relaxation passes.
#[derive(Debug, Default)]
struct LoopState {
    current: f64,
    current_slope: f64,
    last_drive: f64,
}

/// Resistor voltage for an arbitrary periodic drive, by explicit Euler integration.
pub fn solve_numeric(
    model: &str,
    params: &ResonantParams,
    input: &PeriodicSignal,
    config: &SolverConfig,
) -> Result<PeriodicSignal> {
    params.validate(model, config)?;

    let period = input.period();
    let natural_period = params.natural_period();
    let points = config.point_budget.points(period, natural_period);
    info!(
        model,
        f0 = 1.0 / natural_period,
        points,
        passes = config.relaxation_passes,
        "recalculate resonant circuit"
    );

    let ResonantParams {
        resistance: r,
        inductance: l,
        capacitance: c,
    } = *params;
    let damping = (r + config.inductor_loss) / l;

    let mut state = LoopState::default();
    let [resistor_voltage] = relax(input, points, config.relaxation_passes, |u, dt| {
        let observed = -state.current * r;

        let d2i = -damping * state.current_slope
            - state.current / (l * c)
            - (u - state.last_drive) / dt / l;
        state.current += state.current_slope * dt;
        state.current_slope += d2i * dt;
        state.last_drive = u;

        [observed]
    });

    if let Some((index, value)) = first_non_finite(std::slice::from_ref(&resistor_voltage)) {
        return Err(BenchError::degenerate(
            model,
            format!("integration diverged at point {index} (value {value}); step too coarse for f0"),
        ));
    }

    Ok(SampledSignal::new(period, resistor_voltage)?.into())
}

/// Steady-state resistor voltage for a sinusoidal drive, from the series impedance.
pub fn solve_analytic(
    model: &str,
    params: &ResonantParams,
    input: &Sine,
    config: &SolverConfig,
) -> Result<Sine> {
    params.validate(model, config)?;
    info!(model, frequency = input.frequency(), "create sine");

    let w = input.omega();
    let r_total = params.resistance + config.inductor_loss;
    let reactance = w * params.inductance - 1.0 / (w * params.capacitance);
    let impedance = r_total.hypot(reactance);

    let amplitude = input.amplitude() * params.resistance / impedance;
    let shift = reactance.atan2(r_total);

    Sine::new(amplitude, w, input.phase() - shift, 0.0).map_err(|e| {
        BenchError::degenerate(model, format!("analytic solution is not finite: {e}"))
    })
}

/// Resistor voltage for `input`, taking the analytic path for sines unless `force_numeric`.
pub fn solve(
    model: &str,
    params: &ResonantParams,
    input: &PeriodicSignal,
    force_numeric: bool,
    config: &SolverConfig,
) -> Result<PeriodicSignal> {
    match input.as_sine() {
        Some(sine) if !force_numeric => Ok(solve_analytic(model, params, sine, config)?.into()),
        _ => solve_numeric(model, params, input, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{FunctionGenerator, Waveform};
    use approx::assert_relative_eq;

    fn reference_params() -> ResonantParams {
        // 100 Ω, 10 mH, 100 nF
        ResonantParams::new(100.0, 10e-3, 100e-9)
    }

    #[test]
    fn test_natural_frequency() {
        let p = ResonantParams::new(50.0, 1e-3, 1e-6);
        assert_relative_eq!(p.natural_frequency(), 5032.92, epsilon = 0.01);
    }

    #[test]
    fn test_analytic_at_resonance() {
        let p = ResonantParams::new(50.0, 1e-3, 1e-6);
        let config = SolverConfig::default();
        let drive = Sine::new(1.0, 1.0 / (p.inductance * p.capacitance).sqrt(), 0.3, 0.0).unwrap();
        let out = solve_analytic("rlc", &p, &drive, &config).unwrap();
        // reactances cancel: R / (R + R_L)
        assert_relative_eq!(out.amplitude(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(out.phase(), 0.3, epsilon = 1e-9);
        assert_relative_eq!(out.offset(), 0.0);
    }

    #[test]
    fn test_analytic_phase_sign() {
        let p = reference_params();
        let config = SolverConfig::default();
        let f0 = p.natural_frequency();
        // below resonance the capacitor dominates and the current leads
        let low = Sine::with_frequency(1.0, f0 / 4.0).unwrap();
        assert!(solve_analytic("rlc", &p, &low, &config).unwrap().phase() > 0.0);
        // above resonance the inductor dominates and the current lags
        let high = Sine::with_frequency(1.0, f0 * 4.0).unwrap();
        assert!(solve_analytic("rlc", &p, &high, &config).unwrap().phase() < 0.0);
    }

    #[test]
    fn test_numeric_matches_analytic() {
        let p = reference_params();
        let config = SolverConfig::default();
        for frequency in [2000.0, 5000.0, 8000.0] {
            let drive = Sine::new(1.0, 2.0 * PI * frequency, 0.2, 0.0).unwrap();
            let analytic: PeriodicSignal = solve_analytic("rlc", &p, &drive, &config).unwrap().into();
            let numeric = solve_numeric("rlc", &p, &drive.into(), &config).unwrap();

            let a = analytic.fundamental();
            let n = numeric.fundamental();
            assert_relative_eq!(n.amplitude, a.amplitude, max_relative = 0.02);
            assert!(n.phase_relative_to(&a).abs() < 0.02 * PI, "phase at {frequency} Hz");
        }
    }

    #[test]
    fn test_numeric_resonance_scenario() {
        let p = ResonantParams::new(50.0, 1e-3, 1e-6);
        let config = SolverConfig::default();
        let drive = Sine::with_frequency(1.0, p.natural_frequency()).unwrap();
        let out = solve_numeric("rlc", &p, &drive.into(), &config).unwrap();
        assert_relative_eq!(out.fundamental().amplitude, 0.5, max_relative = 0.02);
    }

    #[test]
    fn test_dc_offset_is_blocked() {
        let p = reference_params();
        let config = SolverConfig::default();
        let drive = Sine::new(1.0, 2.0 * PI * 5000.0, 0.0, 3.0).unwrap();
        let out = solve_numeric("rlc", &p, &drive.into(), &config).unwrap();
        let PeriodicSignal::Sampled(table) = out else {
            panic!("numeric path should produce a sampled signal");
        };
        let mean = table.samples().iter().sum::<f64>() / table.len() as f64;
        assert!(mean.abs() < 1e-3, "mean = {mean}");
    }

    #[test]
    fn test_square_drive_uses_numeric_path() {
        let p = reference_params();
        let drive = FunctionGenerator::new()
            .with_waveform(Waveform::Square)
            .with_frequency(500.0)
            .signal()
            .unwrap();
        let out = solve("rlc", &p, &drive, false, &SolverConfig::default()).unwrap();
        assert!(out.as_sine().is_none());
        assert_relative_eq!(out.period(), drive.period());
    }

    #[test]
    fn test_force_numeric_for_sine() {
        let p = reference_params();
        let drive: PeriodicSignal = Sine::with_frequency(1.0, 3000.0).unwrap().into();
        let config = SolverConfig::default();
        assert!(solve("rlc", &p, &drive, false, &config).unwrap().as_sine().is_some());
        assert!(solve("rlc", &p, &drive, true, &config).unwrap().as_sine().is_none());
    }

    #[test]
    fn test_zero_passes_still_integrates() {
        let config = SolverConfig {
            relaxation_passes: 0,
            ..SolverConfig::default()
        };
        let drive: PeriodicSignal = Sine::with_frequency(1.0, 5000.0).unwrap().into();
        let out = solve_numeric("rlc", &reference_params(), &drive, &config).unwrap();
        assert!(out.fundamental().amplitude > 0.1);
    }

    #[test]
    fn test_zero_parameters_are_degenerate() {
        let p = ResonantParams::default();
        let drive: PeriodicSignal = Sine::with_frequency(1.0, 1000.0).unwrap().into();
        let config = SolverConfig::default();
        for force in [false, true] {
            assert!(matches!(
                solve("rlc", &p, &drive, force, &config),
                Err(BenchError::DegenerateParameters { .. })
            ));
        }
    }

    #[test]
    fn test_divergence_is_degenerate() {
        // f0 far above what 2 points per period can resolve
        let p = ResonantParams::new(1.0, 1e-9, 1e-12);
        let config = SolverConfig::new()
            .with_inductor_loss(0.0)
            .with_point_budget(crate::solver::PointBudget::fixed(2))
            .with_relaxation_passes(2000);
        let drive: PeriodicSignal = Sine::new(1.0, 2.0 * PI, 0.5, 0.0).unwrap().into();
        assert!(matches!(
            solve_numeric("rlc", &p, &drive, &config),
            Err(BenchError::DegenerateParameters { .. })
        ));
    }
}
