//! Steady-state relaxation driver.

use crate::signal::PeriodicSignal;

/// Drive a stepper with one period of `input`, `passes` times in a row.
///
/// `step` receives the input voltage at the current point and the step size,
/// advances its own state, and returns the `K` observed values for that point.
/// The state lives in the closure and is never reset between passes, so the
/// returned tables hold the response of the final pass only. At least one
/// pass always runs.
pub fn relax<const K: usize, F>(
    input: &PeriodicSignal,
    points: usize,
    passes: usize,
    mut step: F,
) -> [Vec<f64>; K]
where
    F: FnMut(f64, f64) -> [f64; K],
{
    let period = input.period();
    let dt = period / points as f64;
    let mut tables: [Vec<f64>; K] = std::array::from_fn(|_| vec![0.0; points]);

    for _ in 0..passes.max(1) {
        for j in 0..points {
            let u = input.sample(period * j as f64 / points as f64);
            let observed = step(u, dt);
            for (table, value) in tables.iter_mut().zip(observed) {
                table[j] = value;
            }
        }
    }

    tables
}

/// First non-finite value in any table, if one exists.
pub(crate) fn first_non_finite(tables: &[Vec<f64>]) -> Option<(usize, f64)> {
    tables
        .iter()
        .flat_map(|t| t.iter().copied().enumerate())
        .find(|(_, v)| !v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SampledSignal;
    use approx::assert_relative_eq;

    #[test]
    fn test_keeps_last_pass_only() {
        let input: PeriodicSignal = SampledSignal::new(1.0, vec![1.0, 1.0]).unwrap().into();
        let mut calls = 0usize;
        let [out] = relax(&input, 4, 3, |u, dt| {
            calls += 1;
            [u * dt * calls as f64]
        });
        assert_eq!(calls, 12);
        // last pass sees calls 9..=12 with dt = 0.25
        assert_relative_eq!(out[0], 9.0 * 0.25);
        assert_relative_eq!(out[3], 12.0 * 0.25);
    }

    #[test]
    fn test_zero_passes_runs_once() {
        let input: PeriodicSignal = SampledSignal::new(1.0, vec![1.0, -1.0]).unwrap().into();
        let [seen] = relax(&input, 2, 0, |u, _| [u]);
        assert_eq!(seen, vec![1.0, -1.0]);
    }

    #[test]
    fn test_samples_input_on_grid() {
        let input: PeriodicSignal = SampledSignal::new(2.0, vec![0.0, 1.0, 2.0, 3.0])
            .unwrap()
            .into();
        let [seen] = relax(&input, 4, 1, |u, _| [u]);
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_first_non_finite() {
        let tables = vec![vec![1.0, 2.0], vec![3.0, f64::NAN]];
        let (idx, v) = first_non_finite(&tables).unwrap();
        assert_eq!(idx, 1);
        assert!(v.is_nan());
        assert!(first_non_finite(&[vec![0.0]]).is_none());
    }
}
