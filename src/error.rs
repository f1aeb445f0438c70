//! Error types for the analog bench.
//!
//! This module provides a unified error type [`BenchError`] that covers
//! all error conditions that can occur while building signals, wiring the
//! dataflow graph, and recomputing circuit models.

use thiserror::Error;

/// Result type alias using [`BenchError`].
pub type Result<T> = std::result::Result<T, BenchError>;

/// Unified error type for all bench operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    // ============ Signal Errors ============
    /// A periodic signal could not be constructed
    #[error("Invalid signal: {message}")]
    InvalidSignal { message: String },

    // ============ Graph Errors ============
    /// Provider id does not belong to this bench
    #[error("Signal provider {id} not found")]
    UnknownProvider { id: usize },

    /// Model id does not belong to this bench
    #[error("Circuit model {id} not found")]
    UnknownModel { id: usize },

    /// Switch id does not belong to this bench
    #[error("Switch {id} not found")]
    UnknownSwitch { id: usize },

    /// Observer id does not belong to this bench
    #[error("Observer {id} not found")]
    UnknownObserver { id: usize },

    /// A node would (directly or indirectly) feed its own input
    #[error("Feedback loop detected at '{node}' - the signal graph must be acyclic")]
    FeedbackLoop { node: String },

    // ============ Model Errors ============
    /// Component values produce no meaningful (finite) response
    #[error("Degenerate parameters in '{model}': {message}")]
    DegenerateParameters { model: String, message: String },

    /// The model has no such component
    #[error("Model '{model}' has no {parameter}")]
    UnsupportedParameter { model: String, parameter: String },

    // ============ Notification Errors ============
    /// An observer failed while handling a change notification
    #[error("Observer '{observer}' failed: {message}")]
    ObserverFailure { observer: String, message: String },

    // ============ I/O Errors ============
    /// Error writing a rendered trace
    #[error("Trace output error: {message}")]
    TraceOutputError { message: String },
}

impl BenchError {
    /// Create an invalid signal error
    pub fn invalid_signal(message: impl Into<String>) -> Self {
        Self::InvalidSignal {
            message: message.into(),
        }
    }

    /// Create a degenerate parameter error
    pub fn degenerate(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DegenerateParameters {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create an observer failure
    pub fn observer_failure(observer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ObserverFailure {
            observer: observer.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported parameter error
    pub fn unsupported(model: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::UnsupportedParameter {
            model: model.into(),
            parameter: parameter.into(),
        }
    }
}
