use crate::core::Signal;
use crate::observe::{Observer, RunnerEvent};
use crate::queue::publisher::checked_name;
use crate::queue::{PublishError, Publisher};
use serde::Serialize;
use std::sync::Arc;

/// What a handler can reach while it runs.
///
/// Signals published through the context join the pending buffer and are
/// delivered from the next tick on, never during the current one. Publishing
/// never blocks: under [`OverflowPolicy::Block`](crate::queue::OverflowPolicy)
/// a full buffer yields [`PublishError::QueueFull`].
pub struct Context<'a> {
    tick: u64,
    machine: &'a Arc<str>,
    publisher: &'a Publisher,
    observer: &'a dyn Observer,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        tick: u64,
        machine: &'a Arc<str>,
        publisher: &'a Publisher,
        observer: &'a dyn Observer,
    ) -> Self {
        Self {
            tick,
            machine,
            publisher,
            observer,
        }
    }

    /// Number of the tick being processed.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Name of the machine handling the signal.
    pub fn machine(&self) -> &str {
        self.machine
    }

    /// Publish a signal without payload for the next tick.
    ///
    /// Panics on an invalid name, like [`Publisher::publish`].
    #[track_caller]
    pub fn publish(&self, name: &str) -> Result<(), PublishError> {
        self.publisher
            .push(Signal::new(checked_name(name), None), false)
    }

    /// Publish a signal with a JSON-encoded payload for the next tick.
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

    pub fn publish_signal(&self, signal: Signal) -> Result<(), PublishError> {
        self.publisher.push(signal, false)
    }

    /// Emit a diagnostic through the runner's observer.
    pub fn note(&self, message: impl Into<String>) {
        self.observer.on_event(&RunnerEvent::Note {
            tick: self.tick,
            machine: Arc::clone(self.machine),
            message: message.into(),
        });
    }
}
