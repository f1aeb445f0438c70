//! RC circuit model (the capacitor experiment).

use crate::error::Result;
use crate::graph::{ProviderId, SwitchId};
use crate::signal::PeriodicSignal;
use crate::solver::{rc, RcOutputs, RcParams, SolverConfig};

/// Series R-C circuit driven by one input, publishing both component voltages.
#[derive(Debug, Clone)]
pub struct RcCircuitModel {
    pub name: String,
    input: ProviderId,
    capacitor_voltage: ProviderId,
    resistor_voltage: ProviderId,
    params: RcParams,
    debug_switch: Option<SwitchId>,
    config: SolverConfig,
}

impl RcCircuitModel {
    /// Create a model reading `input`.
    pub fn new(
        name: impl Into<String>,
        input: ProviderId,
        capacitor_voltage: ProviderId,
        resistor_voltage: ProviderId,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            capacitor_voltage,
            resistor_voltage,
            params: RcParams::default(),
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

    pub fn set_debug_switch(&mut self, switch: SwitchId) {
        self.debug_switch = Some(switch);
    }

    pub fn set_solver_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    /// Current component values in SI units.
    pub fn params(&self) -> &RcParams {
        &self.params
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn input(&self) -> ProviderId {
        self.input
    }

    /// Provider carrying the capacitor voltage.
    pub fn capacitor_voltage(&self) -> ProviderId {
        self.capacitor_voltage
    }

    /// Provider carrying the resistor voltage.
    pub fn resistor_voltage(&self) -> ProviderId {
        self.resistor_voltage
    }

    pub fn debug_switch(&self) -> Option<SwitchId> {
        self.debug_switch
    }

    /// Both component voltages for the given input.
    pub fn recompute(&self, input: &PeriodicSignal, force_numeric: bool) -> Result<RcOutputs> {
        rc::solve(&self.name, &self.params, input, force_numeric, &self.config)
    }
}
