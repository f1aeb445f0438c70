//! Reactive signal graph.
//!
//! The bench is a push-based dataflow graph. Nodes live in index-addressed
//! arenas inside [`Bench`]:
//!
//! - signal providers (the edges' sources: points in the circuit)
//! - on/off switches
//! - circuit models
//! - external observers
//!
//! Every provider keeps its [`Subscriber`] list. Assigning a signal notifies
//! the subscribers synchronously, in registration order, depth-first: a
//! subscribed model recomputes and publishes its outputs, which notify their
//! own subscribers, all before the assignment returns.
//!
//! ```text
//!   generator ──Forward──> rlc.input ──Model──> [rlc] ──> rlc.resistor ──Observer──> scope
//!                                                 ^
//!                                  debug switch ──┘
//! ```

mod bench;
mod provider;
mod types;

pub use bench::Bench;
pub use provider::{Observer, SignalProvider};
pub use types::{ModelId, ObserverId, ProviderId, Subscriber, SwitchId};
