//! Circuit models.
//!
//! A circuit model owns component values, reads one input provider, and
//! derives its output providers from the current input signal:
//! - [`ResonantCircuitModel`]: series R-L-C, resistor voltage
//! - [`RcCircuitModel`]: series R-C, capacitor and resistor voltage
//!
//! Models are plain data. The solve itself is a pure function of the
//! component values and the input; the [`Bench`](crate::graph::Bench) decides
//! when to call it and publishes the results.

mod rc;
mod resonant;

pub use rc::RcCircuitModel;
pub use resonant::ResonantCircuitModel;

use crate::error::{BenchError, Result};
use crate::graph::{ProviderId, SwitchId};
use crate::signal::PeriodicSignal;
use crate::solver::SolverConfig;

/// A circuit model.
#[derive(Debug, Clone)]
pub enum Model {
    Resonant(ResonantCircuitModel),
    Rc(RcCircuitModel),
}

impl Model {
    /// Get the model name.
    pub fn name(&self) -> &str {
        match self {
            Model::Resonant(m) => &m.name,
            Model::Rc(m) => &m.name,
        }
    }

    /// The provider this model reads.
    pub fn input(&self) -> ProviderId {
        match self {
            Model::Resonant(m) => m.input(),
            Model::Rc(m) => m.input(),
        }
    }

    /// Providers this model publishes to.
    pub fn outputs(&self) -> Vec<ProviderId> {
        match self {
            Model::Resonant(m) => vec![m.resistor_voltage()],
            Model::Rc(m) => vec![m.capacitor_voltage(), m.resistor_voltage()],
        }
    }

    /// Provider carrying the resistor voltage.
    pub fn resistor_voltage(&self) -> ProviderId {
        match self {
            Model::Resonant(m) => m.resistor_voltage(),
            Model::Rc(m) => m.resistor_voltage(),
        }
    }

    /// Provider carrying the capacitor voltage, if the model exposes one.
    pub fn capacitor_voltage(&self) -> Option<ProviderId> {
        match self {
            Model::Resonant(_) => None,
            Model::Rc(m) => Some(m.capacitor_voltage()),
        }
    }

    pub fn debug_switch(&self) -> Option<SwitchId> {
        match self {
            Model::Resonant(m) => m.debug_switch(),
            Model::Rc(m) => m.debug_switch(),
        }
    }

    pub fn solver_config(&self) -> &SolverConfig {
        match self {
            Model::Resonant(m) => m.solver_config(),
            Model::Rc(m) => m.solver_config(),
        }
    }

    /// Set the resistor in ohms.
    pub fn set_resistor(&mut self, ohms: f64) -> Result<()> {
        match self {
            Model::Resonant(m) => m.set_resistor(ohms),
            Model::Rc(m) => m.set_resistor(ohms),
        }
        Ok(())
    }

    /// Set the capacitor in nanofarads.
    pub fn set_capacitor(&mut self, nanofarads: f64) -> Result<()> {
        match self {
            Model::Resonant(m) => m.set_capacitor(nanofarads),
            Model::Rc(m) => m.set_capacitor(nanofarads),
        }
        Ok(())
    }

    /// Set the inductor in millihenries.
    pub fn set_inductor(&mut self, millihenries: f64) -> Result<()> {
        match self {
            Model::Resonant(m) => {
                m.set_inductor(millihenries);
                Ok(())
            }
            Model::Rc(m) => Err(BenchError::unsupported(&m.name, "inductor")),
        }
    }

    pub fn set_debug_switch(&mut self, switch: SwitchId) {
        match self {
            Model::Resonant(m) => m.set_debug_switch(switch),
            Model::Rc(m) => m.set_debug_switch(switch),
        }
    }

    pub fn set_solver_config(&mut self, config: SolverConfig) {
        match self {
            Model::Resonant(m) => m.set_solver_config(config),
            Model::Rc(m) => m.set_solver_config(config),
        }
    }

    /// Solve for `input` and pair each output signal with its provider.
    pub fn recompute(
        &self,
        input: &PeriodicSignal,
        force_numeric: bool,
    ) -> Result<Vec<(ProviderId, PeriodicSignal)>> {
        match self {
            Model::Resonant(m) => {
                let ur = m.recompute(input, force_numeric)?;
                Ok(vec![(m.resistor_voltage(), ur)])
            }
            Model::Rc(m) => {
                let out = m.recompute(input, force_numeric)?;
                Ok(vec![
                    (m.capacitor_voltage(), out.capacitor),
                    (m.resistor_voltage(), out.resistor),
                ])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_has_no_inductor() {
        let mut m = Model::Rc(RcCircuitModel::new(
            "rc",
            ProviderId(0),
            ProviderId(1),
            ProviderId(2),
        ));
        assert!(matches!(
            m.set_inductor(10.0),
            Err(BenchError::UnsupportedParameter { .. })
        ));
        assert_eq!(m.outputs(), vec![ProviderId(1), ProviderId(2)]);
        assert_eq!(m.capacitor_voltage(), Some(ProviderId(1)));
    }

    #[test]
    fn test_resonant_outputs() {
        let m = Model::Resonant(ResonantCircuitModel::new("rlc", ProviderId(3), ProviderId(4)));
        assert_eq!(m.name(), "rlc");
        assert_eq!(m.input(), ProviderId(3));
        assert_eq!(m.outputs(), vec![ProviderId(4)]);
        assert_eq!(m.capacitor_voltage(), None);
    }
}
