//! Resonant circuit model.

use crate::error::Result;
use crate::graph::{ProviderId, SwitchId};
use crate::signal::PeriodicSignal;
use crate::solver::{resonant, ResonantParams, SolverConfig};

/// Series R-L-C circuit driven by one input, publishing the resistor voltage.
///
/// Component setters take the units printed on the bench's knobs (Ω, nF, mH)
/// and store SI values.
#[derive(Debug, Clone)]
pub struct ResonantCircuitModel {
    pub name: String,
    input: ProviderId,
    resistor_voltage: ProviderId,
    params: ResonantParams,
    debug_switch: Option<SwitchId>,
    config: SolverConfig,
}

impl ResonantCircuitModel {
    /// Create a model reading `input` and publishing to `resistor_voltage`.
    pub fn new(name: impl Into<String>, input: ProviderId, resistor_voltage: ProviderId) -> Self {
        Self {
            name: name.into(),
            input,
            resistor_voltage,
            params: ResonantParams::default(),
            debug_switch: None,
            config: SolverConfig::default(),
        }
    }

    /// Set the resistor in ohms.
    pub fn set_resistor(&mut self, ohms: f64) {
        self.params.resistance = ohms;
    }

    /// Set the capacitor in nanofarads.
    pub fn set_capacitor(&mut self, nanofarads: f64) {
        self.params.capacitance = nanofarads * 1e-9;
    }

    /// Set the inductor in millihenries.
    pub fn set_inductor(&mut self, millihenries: f64) {
        self.params.inductance = millihenries * 1e-3;
    }

    pub fn set_debug_switch(&mut self, switch: SwitchId) {
        self.debug_switch = Some(switch);
    }

    pub fn set_solver_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    /// Current component values in SI units.
    pub fn params(&self) -> &ResonantParams {
        &self.params
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn input(&self) -> ProviderId {
        self.input
    }

    /// Provider carrying the resistor voltage.
    pub fn resistor_voltage(&self) -> ProviderId {
        self.resistor_voltage
    }

    pub fn debug_switch(&self) -> Option<SwitchId> {
        self.debug_switch
    }

    /// Resistor voltage for the given input.
    pub fn recompute(&self, input: &PeriodicSignal, force_numeric: bool) -> Result<PeriodicSignal> {
        resonant::solve(&self.name, &self.params, input, force_numeric, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_conversion() {
        let mut m = ResonantCircuitModel::new("rlc", ProviderId(0), ProviderId(1));
        m.set_capacitor(100.0);
        m.set_inductor(10.0);
        m.set_resistor(47.0);
        assert_relative_eq!(m.params().capacitance, 1e-7, max_relative = 1e-12);
        assert_relative_eq!(m.params().inductance, 1e-2, max_relative = 1e-12);
        assert_relative_eq!(m.params().resistance, 47.0);
    }

    #[test]
    fn test_defaults_are_zero() {
        let m = ResonantCircuitModel::new("rlc", ProviderId(0), ProviderId(1));
        assert_eq!(*m.params(), ResonantParams::default());
        assert_eq!(m.debug_switch(), None);
    }
}
