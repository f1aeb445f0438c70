//! Observable signal holders.

use super::types::{ProviderId, Subscriber};
use crate::error::Result;
use crate::signal::SignalRef;

/// Receives change notifications from a [`SignalProvider`].
///
/// Returning an error aborts the remaining fan-out of the notification that
/// triggered it, and the error is returned from the mutating bench call.
pub trait Observer: Send {
    /// Called after `provider` received a new signal.
    fn has_changed(&mut self, provider: ProviderId, signal: &SignalRef) -> Result<()>;
}

impl<F> Observer for F
where
    F: FnMut(ProviderId, &SignalRef) -> Result<()> + Send,
{
    fn has_changed(&mut self, provider: ProviderId, signal: &SignalRef) -> Result<()> {
        self(provider, signal)
    }
}

/// Holder of the current signal at one point of the circuit.
///
/// A provider starts without a signal. Every assignment notifies all
/// subscribers in registration order, even when the new signal equals the old.
#[derive(Debug, Clone)]
pub struct SignalProvider {
    name: String,
    signal: Option<SignalRef>,
    subscribers: Vec<Subscriber>,
}

impl SignalProvider {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signal: None,
            subscribers: Vec::new(),
        }
    }

    /// Provider name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current signal, or `None` if none was ever assigned.
    pub fn signal(&self) -> Option<&SignalRef> {
        self.signal.as_ref()
    }

    /// Subscribers in registration order.
    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub(crate) fn replace(&mut self, signal: SignalRef) {
        self.signal = Some(signal);
    }

    /// Duplicates are kept; a duplicate is notified once per registration.
    pub(crate) fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }
}
