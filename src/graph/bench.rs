//! The bench: arena of providers, switches, circuit models and observers.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use super::provider::{Observer, SignalProvider};
use super::types::{ModelId, ObserverId, ProviderId, Subscriber, SwitchId};
use crate::controls::OnOffSwitch;
use crate::error::{BenchError, Result};
use crate::models::{Model, RcCircuitModel, ResonantCircuitModel};
use crate::signal::SignalRef;
use crate::solver::SolverConfig;

/// A switch and the models that read it.
struct SwitchNode {
    switch: OnOffSwitch,
    subscribers: Vec<ModelId>,
}

struct ModelNode {
    model: Model,
    /// Set while the model publishes its outputs
    recomputing: bool,
}

/// The signal graph of one test bench.
///
/// All mutation goes through `&mut self`, so a bench shared between threads
/// needs a single lock around the whole graph.
pub struct Bench {
    providers: Vec<SignalProvider>,
    switches: Vec<SwitchNode>,
    models: Vec<ModelNode>,
    observers: Vec<Box<dyn Observer>>,
    /// Models touched inside the open batch
    batch: Option<BTreeSet<ModelId>>,
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bench")
            .field("providers", &self.providers)
            .field("switches", &self.switches.len())
            .field("models", &self.models.len())
            .field("observers", &self.observers.len())
            .field("batch", &self.batch)
            .finish()
    }
}

impl Bench {
    /// Create an empty bench.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            switches: Vec::new(),
            models: Vec::new(),
            observers: Vec::new(),
            batch: None,
        }
    }

    // ============ Providers ============

    /// Add a provider without a signal.
    pub fn add_provider(&mut self, name: impl Into<String>) -> ProviderId {
        let id = ProviderId(self.providers.len());
        self.providers.push(SignalProvider::new(name));
        id
    }

    pub fn provider(&self, id: ProviderId) -> Result<&SignalProvider> {
        self.providers
            .get(id.0)
            .ok_or(BenchError::UnknownProvider { id: id.0 })
    }

    fn provider_mut(&mut self, id: ProviderId) -> Result<&mut SignalProvider> {
        self.providers
            .get_mut(id.0)
            .ok_or(BenchError::UnknownProvider { id: id.0 })
    }

    /// Find a provider by name.
    pub fn find_provider(&self, name: &str) -> Option<ProviderId> {
        self.providers
            .iter()
            .position(|p| p.name() == name)
            .map(ProviderId)
    }

    /// The current signal of a provider, `None` if it never received one.
    pub fn signal(&self, id: ProviderId) -> Result<Option<SignalRef>> {
        Ok(self.provider(id)?.signal().cloned())
    }

    /// Replace a provider's signal and notify its subscribers in registration order.
    ///
    /// Every call notifies, even if the signal did not change. An observer
    /// failure stops the fan-out and is returned. A model that fails to
    /// recompute keeps its previous outputs; the remaining subscribers are
    /// still notified and the first such error is returned afterwards.
    pub fn set_signal(&mut self, id: ProviderId, signal: impl Into<SignalRef>) -> Result<()> {
        let signal = signal.into();
        let provider = self.provider_mut(id)?;
        provider.replace(SignalRef::clone(&signal));
        let subscribers = provider.subscribers().to_vec();

        debug!(provider = %id, subscribers = subscribers.len(), "signal changed");
        let mut deferred = None;
        for subscriber in subscribers {
            match self.dispatch(id, &signal, subscriber) {
                Ok(()) => {}
                Err(e @ BenchError::ObserverFailure { .. }) => return Err(e),
                Err(e) => {
                    deferred.get_or_insert(e);
                }
            }
        }
        deferred.map_or(Ok(()), Err)
    }

    fn dispatch(&mut self, source: ProviderId, signal: &SignalRef, subscriber: Subscriber) -> Result<()> {
        match subscriber {
            Subscriber::Model(model) => self.model_changed(model),
            Subscriber::Observer(observer) => self
                .observers
                .get_mut(observer.0)
                .ok_or(BenchError::UnknownObserver { id: observer.0 })?
                .has_changed(source, signal),
            Subscriber::Forward(target) => self.set_signal(target, SignalRef::clone(signal)),
        }
    }

    /// Register an observer on a provider.
    pub fn add_observer(
        &mut self,
        provider: ProviderId,
        observer: impl Observer + 'static,
    ) -> Result<ObserverId> {
        self.provider(provider)?;
        let id = ObserverId(self.observers.len());
        self.observers.push(Box::new(observer));
        self.provider_mut(provider)?.subscribe(Subscriber::Observer(id));
        Ok(id)
    }

    /// Register an existing observer on another provider.
    ///
    /// Registering twice on the same provider notifies twice.
    pub fn attach_observer(&mut self, provider: ProviderId, observer: ObserverId) -> Result<()> {
        if observer.0 >= self.observers.len() {
            return Err(BenchError::UnknownObserver { id: observer.0 });
        }
        self.provider_mut(provider)?.subscribe(Subscriber::Observer(observer));
        Ok(())
    }

    /// Cable `from` to `to`: every signal on `from` is copied onto `to`.
    ///
    /// If `from` already carries a signal it is copied immediately. Connections
    /// that would close a loop are rejected.
    pub fn connect(&mut self, from: ProviderId, to: ProviderId) -> Result<()> {
        self.provider(to)?;
        let signal = self.provider(from)?.signal().cloned();
        if self.reaches(to, from) {
            return Err(BenchError::FeedbackLoop {
                node: format!("{} -> {}", self.providers[from.0].name(), self.providers[to.0].name()),
            });
        }

        self.provider_mut(from)?.subscribe(Subscriber::Forward(to));
        match signal {
            Some(signal) => self.set_signal(to, signal),
            None => Ok(()),
        }
    }

    /// Whether a change on `start` propagates to `target`.
    fn reaches(&self, start: ProviderId, target: ProviderId) -> bool {
        let mut seen = vec![false; self.providers.len()];
        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            if p == target {
                return true;
            }
            if std::mem::replace(&mut seen[p.0], true) {
                continue;
            }
            for subscriber in self.providers[p.0].subscribers() {
                match subscriber {
                    Subscriber::Forward(next) => stack.push(*next),
                    Subscriber::Model(m) => stack.extend(self.models[m.0].model.outputs()),
                    Subscriber::Observer(_) => {}
                }
            }
        }
        false
    }

    // ============ Switches ============

    /// Add an on/off switch.
    pub fn add_switch(&mut self, name: impl Into<String>, on: bool) -> SwitchId {
        let id = SwitchId(self.switches.len());
        self.switches.push(SwitchNode {
            switch: OnOffSwitch::new(name, on),
            subscribers: Vec::new(),
        });
        id
    }

    pub fn switch(&self, id: SwitchId) -> Result<&OnOffSwitch> {
        self.switches
            .get(id.0)
            .map(|node| &node.switch)
            .ok_or(BenchError::UnknownSwitch { id: id.0 })
    }

    /// Set a switch. Models reading it recompute only if the state changed.
    pub fn set_switch(&mut self, id: SwitchId, on: bool) -> Result<()> {
        let node = self
            .switches
            .get_mut(id.0)
            .ok_or(BenchError::UnknownSwitch { id: id.0 })?;
        if !node.switch.set(on) {
            return Ok(());
        }
        debug!(switch = %node.switch.name, on, "switch changed");
        let subscribers = node.subscribers.clone();
        for model in subscribers {
            self.model_changed(model)?;
        }
        Ok(())
    }

    /// Flip a switch.
    pub fn toggle_switch(&mut self, id: SwitchId) -> Result<()> {
        let on = self.switch(id)?.is_on();
        self.set_switch(id, !on)
    }

    // ============ Circuit models ============

    /// Add a resonant circuit reading `input`. Its resistor voltage provider is created with it.
    pub fn add_resonant_circuit(&mut self, name: impl Into<String>, input: ProviderId) -> Result<ModelId> {
        self.provider(input)?;
        let name = name.into();
        let resistor = self.add_provider(format!("{name}.resistor"));
        Ok(self.insert_model(Model::Resonant(ResonantCircuitModel::new(name, input, resistor))))
    }

    /// Add an RC circuit reading `input`. Its two output providers are created with it.
    pub fn add_rc_circuit(&mut self, name: impl Into<String>, input: ProviderId) -> Result<ModelId> {
        self.provider(input)?;
        let name = name.into();
        let capacitor = self.add_provider(format!("{name}.capacitor"));
        let resistor = self.add_provider(format!("{name}.resistor"));
        Ok(self.insert_model(Model::Rc(RcCircuitModel::new(name, input, capacitor, resistor))))
    }

    fn insert_model(&mut self, model: Model) -> ModelId {
        let id = ModelId(self.models.len());
        let input = model.input();
        self.models.push(ModelNode {
            model,
            recomputing: false,
        });
        self.providers[input.0].subscribe(Subscriber::Model(id));
        id
    }

    pub fn model(&self, id: ModelId) -> Result<&Model> {
        self.models
            .get(id.0)
            .map(|node| &node.model)
            .ok_or(BenchError::UnknownModel { id: id.0 })
    }

    fn model_mut(&mut self, id: ModelId) -> Result<&mut Model> {
        self.models
            .get_mut(id.0)
            .map(|node| &mut node.model)
            .ok_or(BenchError::UnknownModel { id: id.0 })
    }

    /// Set a model's resistor in ohms and recompute.
    pub fn set_resistor(&mut self, id: ModelId, ohms: f64) -> Result<()> {
        self.model_mut(id)?.set_resistor(ohms)?;
        self.model_changed(id)
    }

    /// Set a model's capacitor in nanofarads and recompute.
    pub fn set_capacitor(&mut self, id: ModelId, nanofarads: f64) -> Result<()> {
        self.model_mut(id)?.set_capacitor(nanofarads)?;
        self.model_changed(id)
    }

    /// Set a model's inductor in millihenries and recompute.
    pub fn set_inductor(&mut self, id: ModelId, millihenries: f64) -> Result<()> {
        self.model_mut(id)?.set_inductor(millihenries)?;
        self.model_changed(id)
    }

    /// Replace a model's solver configuration and recompute.
    pub fn set_solver_config(&mut self, id: ModelId, config: SolverConfig) -> Result<()> {
        self.model_mut(id)?.set_solver_config(config);
        self.model_changed(id)
    }

    /// Bind the switch that forces the numeric path, subscribe to it, and recompute.
    pub fn set_debug_switch(&mut self, id: ModelId, switch: SwitchId) -> Result<()> {
        self.switch(switch)?;
        let previous = self.model(id)?.debug_switch();
        if previous != Some(switch) {
            if let Some(previous) = previous {
                self.switches[previous.0].subscribers.retain(|m| *m != id);
            }
            self.switches[switch.0].subscribers.push(id);
        }
        self.model_mut(id)?.set_debug_switch(switch);
        self.model_changed(id)
    }

    // ============ Recompute ============

    /// Run `f` with model recomputes deferred.
    ///
    /// Each model touched inside `f` recomputes once when `f` returns, in
    /// model id order, even if `f` or an earlier model fails. Observers and cables still fire
    /// immediately. Nested calls join the outer batch.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.batch.is_some() {
            return f(self);
        }

        self.batch = Some(BTreeSet::new());
        let result = f(self);
        let dirty = self.batch.take().unwrap_or_default();

        debug!(models = dirty.len(), "commit batch");
        let mut committed = Ok(());
        for id in dirty {
            if let Err(e) = self.recompute(id) {
                if committed.is_ok() {
                    committed = Err(e);
                }
            }
        }
        let value = result?;
        committed?;
        Ok(value)
    }

    /// Whether a batch is open.
    pub fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    fn model_changed(&mut self, id: ModelId) -> Result<()> {
        if let Some(dirty) = self.batch.as_mut() {
            dirty.insert(id);
            return Ok(());
        }
        self.recompute(id)
    }

    /// Recompute a model from its current input and publish its outputs.
    ///
    /// A model whose input has no signal yet is left untouched. If the solve
    /// fails, nothing is published and the previous outputs stay in place.
    pub fn recompute(&mut self, id: ModelId) -> Result<()> {
        let node = self
            .models
            .get(id.0)
            .ok_or(BenchError::UnknownModel { id: id.0 })?;
        let model = &node.model;
        if node.recomputing {
            return Err(BenchError::FeedbackLoop {
                node: model.name().to_string(),
            });
        }

        let Some(input) = self.providers[model.input().0].signal().cloned() else {
            debug!(model = model.name(), "input has no signal yet");
            return Ok(());
        };
        let force_numeric = model
            .debug_switch()
            .is_some_and(|s| self.switches[s.0].switch.is_on());

        let outputs = match model.recompute(&input, force_numeric) {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!(model = model.name(), error = %e, "recompute rejected");
                return Err(e);
            }
        };

        self.models[id.0].recomputing = true;
        let mut published = Ok(());
        for (provider, signal) in outputs {
            match self.set_signal(provider, signal) {
                Ok(()) => {}
                Err(e @ BenchError::ObserverFailure { .. }) => {
                    published = Err(e);
                    break;
                }
                Err(e) => {
                    if published.is_ok() {
                        published = Err(e);
                    }
                }
            }
        }
        self.models[id.0].recomputing = false;
        published
    }
}
