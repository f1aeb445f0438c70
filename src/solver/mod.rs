//! Circuit response solvers.
//!
//! Each circuit model has a pure solve function that maps its component
//! values and an input signal to output signal(s):
//!
//! - Sinusoidal input takes the **analytic** path: the steady-state phasor
//!   solution from the series impedance.
//! - Any other input (or a forced numeric solve) takes the **numeric** path:
//!   explicit integration of the loop equation over one input period,
//!   repeated for several relaxation passes without resetting the state so the
//!   start-up transient decays and only the periodic response remains.
//!
//! ## Point budget
//!
//! The step size is `dt = period / N`. The number of points per period `N`
//! is estimated from the ratio of the input period to the circuit's natural
//! period and clamped into [`PointBudget`]'s range. The default range is the
//! single value [`DEFAULT_POINTS`], which fixes `N` regardless of the estimate.

mod integrator;
pub mod rc;
pub mod resonant;

pub use integrator::relax;
pub use rc::{RcOutputs, RcParams};
pub use resonant::ResonantParams;

/// Default number of points per period (both ends of the default budget).
pub const DEFAULT_POINTS: usize = 10_000;

/// Default number of simulated periods before the final pass is kept.
pub const DEFAULT_RELAXATION_PASSES: usize = 8;

/// Points per natural period used for the point estimate.
pub const DEFAULT_POINTS_PER_NATURAL_PERIOD: f64 = 1000.0;

/// Series loss resistance of the inductor in ohms.
pub const DEFAULT_INDUCTOR_LOSS: f64 = 50.0;

/// How many integration points to use per input period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointBudget {
    /// Points per natural period of the circuit
    pub per_natural_period: f64,
    /// Lower clamp
    pub min: usize,
    /// Upper clamp
    pub max: usize,
}

impl Default for PointBudget {
    fn default() -> Self {
        Self::fixed(DEFAULT_POINTS)
    }
}

impl PointBudget {
    /// Always use exactly `points` points.
    pub fn fixed(points: usize) -> Self {
        Self {
            per_natural_period: DEFAULT_POINTS_PER_NATURAL_PERIOD,
            min: points,
            max: points,
        }
    }

    /// Scale with the input/natural period ratio, clamped into `[min, max]`.
    pub fn adaptive(min: usize, max: usize) -> Self {
        Self {
            per_natural_period: DEFAULT_POINTS_PER_NATURAL_PERIOD,
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Points for an input of `period` driving a circuit whose natural period is `natural_period`.
    ///
    /// Never returns fewer than two points.
    pub fn points(&self, period: f64, natural_period: f64) -> usize {
        // saturating cast: NaN becomes 0, infinity becomes usize::MAX
        let estimate = (period / natural_period * self.per_natural_period) as usize;
        estimate.clamp(self.min, self.max).max(2)
    }
}

/// Configuration shared by the circuit solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Simulated periods per numeric solve; only the last one is kept.
    pub relaxation_passes: usize,
    /// Integration points per period.
    pub point_budget: PointBudget,
    /// Parasitic series resistance of the inductor (ohms).
    pub inductor_loss: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            relaxation_passes: DEFAULT_RELAXATION_PASSES,
            point_budget: PointBudget::default(),
            inductor_loss: DEFAULT_INDUCTOR_LOSS,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of relaxation passes (at least one).
    ///
    /// More passes let slow transients decay further at a linear cost.
    pub fn with_relaxation_passes(mut self, passes: usize) -> Self {
        self.relaxation_passes = passes.max(1);
        self
    }

    /// Set the point budget.
    pub fn with_point_budget(mut self, budget: PointBudget) -> Self {
        self.point_budget = budget;
        self
    }

    /// Set the inductor loss resistance (ohms).
    pub fn with_inductor_loss(mut self, ohms: f64) -> Self {
        self.inductor_loss = ohms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_fixed() {
        let budget = PointBudget::default();
        assert_eq!(budget.points(1e-3, 1e-4), DEFAULT_POINTS);
        assert_eq!(budget.points(1.0, 1e-6), DEFAULT_POINTS);
        assert_eq!(budget.points(1e-6, 1.0), DEFAULT_POINTS);
    }

    #[test]
    fn test_adaptive_budget_clamps() {
        let budget = PointBudget::adaptive(2000, 20_000);
        // 4 natural periods per input period -> 4000 points
        assert_eq!(budget.points(0.5, 0.125), 4000);
        assert_eq!(budget.points(1e-3, 1.0), 2000);
        assert_eq!(budget.points(1.0, 1e-6), 20_000);
        assert_eq!(budget.points(1.0, 0.0), 20_000);
        assert_eq!(budget.points(1.0, f64::NAN), 2000);
    }

    #[test]
    fn test_adaptive_budget_orders_bounds() {
        let budget = PointBudget::adaptive(500, 100);
        assert_eq!((budget.min, budget.max), (100, 500));
    }

    #[test]
    fn test_passes_at_least_one() {
        let config = SolverConfig::new().with_relaxation_passes(0);
        assert_eq!(config.relaxation_passes, 1);
    }
}
