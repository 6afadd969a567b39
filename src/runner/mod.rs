//! The tick-driven scheduler.
//!
//! A [`Runner`] owns the signal queue and the registered machines. Producers
//! publish from anywhere through a [`Publisher`]; one driver thread calls
//! [`Runner::tick`] at whatever cadence it likes. Every tick:
//!
//! 1. bumps the tick counter and appends the heartbeat `"tick"` carrying it,
//! 2. fixes the batch: every signal present at that instant,
//! 3. hands each signal of the batch, in FIFO order, to every machine in
//!    registration order.
//!
//! Signals published while the batch is dispatched wait for the next tick, so
//! one tick performs at most `batch × machines` handler calls no matter what
//! the handlers publish.

mod builder;
mod config;
mod error;
mod report;

pub use builder::RunnerBuilder;
pub use config::{FaultPolicy, RunnerConfig, DEFAULT_CAPACITY};
pub use error::{BuildError, ConfigError, RegisterError, TickError};
pub use report::{Fault, TickReport, TransitionRecord};

use crate::core::{Signal, StateHistory};
use crate::machine::slot::{Dispatch, Slot};
use crate::machine::{Context, Machine, MachineId};
use crate::observe::{Observer, RunnerEvent, TracingObserver};
use crate::queue::publisher::checked_name;
use crate::queue::{PublishError, Publisher, SignalQueue};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Deterministic single-threaded scheduler for signal-driven machines.
///
/// # Example
///
/// ```rust
/// use tickwork::machines::{Indicator, StatusIndicator};
/// use tickwork::Runner;
///
/// let mut runner = Runner::new();
/// let lamp = runner.register(StatusIndicator::new()).unwrap();
///
/// runner.publish("file_change").unwrap();
/// runner.tick().unwrap();
/// assert_eq!(runner.state(lamp), Some(&Indicator::Gray));
///
/// runner.publish_with("test_run_finished", &(10, 10)).unwrap();
/// runner.tick().unwrap();
/// assert_eq!(runner.state(lamp), Some(&Indicator::Green));
/// ```
pub struct Runner {
    run_id: Uuid,
    machines: Vec<Box<dyn Dispatch>>,
    queue: SignalQueue,
    publisher: Publisher,
    ticks: u64,
    on_fault: FaultPolicy,
    observer: Arc<dyn Observer>,
}

impl Runner {
    /// Runner with the default configuration, logging through `tracing`.
    pub fn new() -> Self {
        Self::from_parts(RunnerConfig::default(), Arc::new(TracingObserver))
    }

    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub(crate) fn from_parts(config: RunnerConfig, observer: Arc<dyn Observer>) -> Self {
        let queue = SignalQueue::new(config.capacity, config.overflow, Arc::clone(&observer));
        let publisher = queue.publisher();
        Self {
            run_id: Uuid::new_v4(),
            machines: Vec::new(),
            queue,
            publisher,
            ticks: 0,
            on_fault: config.on_fault,
            observer,
        }
    }

    /// Identifier of this runner, attached to its tick events.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Number of ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Signals that will join the next batch.
    pub fn pending(&self) -> usize {
        self.queue.pending_len() + self.queue.carried_over()
    }

    /// Producer handle for other threads. Stops working once the runner is
    /// dropped.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// Register a machine. Dispatch follows registration order.
    pub fn register<M: Machine>(&mut self, machine: M) -> Result<MachineId<M>, RegisterError> {
        if self.ticks > 0 {
            return Err(RegisterError::AlreadyStarted { tick: self.ticks });
        }
        let slot = Slot::new(machine);
        info!(run_id = %self.run_id, machine = %slot.name, "adding machine");
        let id = MachineId::new(self.run_id, self.machines.len());
        self.machines.push(Box::new(slot));
        Ok(id)
    }

    /// Publish a signal without payload. Panics on an invalid name.
    ///
    /// Never waits: the caller is the only one who could tick, so under
    /// [`OverflowPolicy::Block`](crate::queue::OverflowPolicy) a full buffer
    /// yields [`PublishError::QueueFull`].
    #[track_caller]
    pub fn publish(&self, name: &str) -> Result<(), PublishError> {
        self.publisher
            .push(Signal::new(checked_name(name), None), false)
    }

    /// Publish a signal with a JSON-encoded payload. Panics on an invalid name.
    /// Never waits, like [`publish`](Self::publish).
    #[track_caller]
    pub fn publish_with<T: Serialize + ?Sized>(
        &self,
        name: &str,
        payload: &T,
    ) -> Result<(), PublishError> {
        let name = checked_name(name);
        let payload = serde_json::to_value(payload)?;
        self.publisher.push(Signal::new(name, Some(payload)), false)
    }

    /// Perform one scheduling step.
    pub fn tick(&mut self) -> Result<TickReport, TickError> {
        self.ticks += 1;
        let tick = self.ticks;
        let batch = self.queue.begin_batch(Signal::heartbeat(tick));
        self.observer.on_event(&RunnerEvent::TickStarted {
            run_id: self.run_id,
            tick,
            batch,
        });

        let mut report = TickReport::new(tick, batch);
        for _ in 0..batch {
            let Some(signal) = self.queue.next_signal() else {
                break;
            };
            report.dispatched += 1;

            for slot in self.machines.iter_mut() {
                let machine = Arc::clone(slot.name());
                self.observer.on_event(&RunnerEvent::Dispatched {
                    tick,
                    signal: signal.name().clone(),
                    machine: Arc::clone(&machine),
                    state: slot.state_name().to_string(),
                });

                let ctx = Context::new(tick, &machine, &self.publisher, &*self.observer);
                report.deliveries += 1;
                match slot.dispatch(&signal, &ctx) {
                    Ok(Some(applied)) => {
                        self.observer.on_event(&RunnerEvent::Transitioned {
                            tick,
                            signal: signal.name().clone(),
                            machine: Arc::clone(&machine),
                            from: applied.from.clone(),
                            to: applied.to.clone(),
                        });
                        report.transitions.push(TransitionRecord {
                            machine: machine.to_string(),
                            signal: signal.name().clone(),
                            from: applied.from,
                            to: applied.to,
                        });
                    }
                    Ok(None) => {}
                    Err(source) => {
                        self.observer.on_event(&RunnerEvent::HandlerFailed {
                            tick,
                            signal: signal.name().clone(),
                            machine: Arc::clone(&machine),
                            error: source.to_string(),
                        });
                        if self.on_fault == FaultPolicy::Abort {
                            return Err(TickError::Handler {
                                tick,
                                machine: machine.to_string(),
                                signal: signal.name().clone(),
                                source,
                            });
                        }
                        report.faults.push(Fault {
                            machine: machine.to_string(),
                            signal: signal.name().clone(),
                            error: source.to_string(),
                        });
                        if self.on_fault == FaultPolicy::SkipSignal {
                            break;
                        }
                    }
                }
            }
        }

        self.observer.on_event(&RunnerEvent::TickFinished {
            tick,
            dispatched: report.dispatched,
            deliveries: report.deliveries,
            transitions: report.transitions.len(),
            faults: report.faults.len(),
        });
        Ok(report)
    }

    /// Current state of a registered machine.
    pub fn state<M: Machine>(&self, id: MachineId<M>) -> Option<&M::State> {
        self.slot(id).map(|slot| &slot.state)
    }

    /// Name of the current state of a registered machine.
    pub fn state_name<M: Machine>(&self, id: MachineId<M>) -> Option<&str> {
        self.slot(id).map(|slot| slot.state_name())
    }

    /// The machine itself, for reading data it keeps besides its state.
    pub fn machine<M: Machine>(&self, id: MachineId<M>) -> Option<&M> {
        self.slot(id).map(|slot| &slot.machine)
    }

    /// Transitions a machine made so far.
    pub fn history<M: Machine>(&self, id: MachineId<M>) -> Option<&StateHistory<M::State>> {
        self.slot(id).map(|slot| &slot.history)
    }

    /// `(machine, state)` names of every machine, in registration order.
    pub fn states(&self) -> Vec<(&str, &str)> {
        self.machines
            .iter()
            .map(|slot| (&**slot.name(), slot.state_name()))
            .collect()
    }

    fn slot<M: Machine>(&self, id: MachineId<M>) -> Option<&Slot<M>> {
        if id.run_id != self.run_id {
            return None;
        }
        self.machines
            .get(id.index)
            .and_then(|slot| slot.as_any().downcast_ref::<Slot<M>>())
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
