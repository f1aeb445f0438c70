//! # Analog Bench
//!
//! Signal dataflow and circuit simulation engine for a virtual analog test
//! bench (function generator, circuit boards, oscilloscope).
//!
//! This library provides:
//! - Periodic signals: closed-form sines and sampled one-period tables
//! - A push-based signal graph that propagates changes synchronously
//! - Circuit models (series RLC, series RC) with a numeric solver for any
//!   periodic drive and an analytic fast path for sines
//! - Trace output for the CLI
//!
//! ## Architecture
//!
//! - [`signal`] - Periodic signal representations and the function generator
//! - [`graph`] - The [`Bench`] arena: providers, switches, models, observers
//! - [`models`] - Circuit models and their component values
//! - [`solver`] - Pure solve functions and solver configuration
//! - [`controls`] - Switch and selector knob state
//! - [`trace`] - Rendered trace output (CLI only)
//!
//! ## Usage
//!
//! ```
//! use analog_bench::{Bench, FunctionGenerator};
//!
//! # fn main() -> analog_bench::Result<()> {
//! let mut bench = Bench::new();
//! let generator = bench.add_provider("generator");
//! let rlc = bench.add_resonant_circuit("rlc", generator)?;
//! bench.batch(|b| {
//!     b.set_resistor(rlc, 100.0)?;
//!     b.set_capacitor(rlc, 100.0)?;
//!     b.set_inductor(rlc, 10.0)
//! })?;
//!
//! bench.set_signal(generator, FunctionGenerator::new().with_frequency(5000.0).signal()?)?;
//! let output = bench.model(rlc)?.resistor_voltage();
//! assert!(bench.signal(output)?.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Simulation Method
//!
//! A sinusoidal drive into a linear circuit has a closed-form steady state,
//! so sines take the analytic path. Any other periodic drive (or a model
//! whose debug switch is on) is integrated with explicit Euler over one
//! period of the drive, repeated for a fixed number of relaxation passes so
//! the start-up transient decays; the last pass becomes the output table.

pub mod controls;
pub mod error;
pub mod graph;
pub mod models;
pub mod signal;
pub mod solver;

#[cfg(feature = "cli")]
pub mod trace;

// Re-export main types for convenience
pub use error::{BenchError, Result};
pub use graph::{Bench, ModelId, Observer, ObserverId, ProviderId, SwitchId};
pub use models::Model;
pub use signal::{FunctionGenerator, PeriodicSignal, SampledSignal, SignalRef, Sine, Waveform};
pub use solver::{PointBudget, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmResonantBench;
