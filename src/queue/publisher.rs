use super::{OverflowPolicy, PublishError, Shared};
use crate::core::{Signal, SignalName};
use crate::observe::RunnerEvent;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Producer-side handle to a runner's signal queue.
///
/// Cheap to clone and safe to use from any thread. Ordering between
/// concurrent producers is unspecified; signals from one producer keep their
/// order.
///
/// # Blocking
///
/// Under [`OverflowPolicy::Block`] a full buffer makes `publish*` wait for the
/// next tick. Only call it from threads other than the one driving
/// [`Runner::tick`](crate::Runner::tick); publishing through the runner itself
/// or a handler's [`Context`](crate::machine::Context) never waits and yields
/// [`PublishError::QueueFull`] instead.
///
/// # Panics
///
/// Every `publish*` method that takes a `&str` name panics when the name is
/// empty or contains whitespace or control characters. That is a bug at the
/// call site, not a runtime condition. Use [`SignalName::new`] and
/// [`Publisher::publish_signal`] to validate untrusted names.
#[derive(Clone)]
pub struct Publisher {
    shared: Arc<Shared>,
}

impl Publisher {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Publish a signal without payload.
    #[track_caller]
    pub fn publish(&self, name: &str) -> Result<(), PublishError> {
        self.push(Signal::new(checked_name(name), None), true)
    }

    /// Publish a signal whose payload is `payload` encoded as JSON.
    #[track_caller]
    pub fn publish_with<T: Serialize + ?Sized>(
        &self,
        name: &str,
        payload: &T,
    ) -> Result<(), PublishError> {
        let name = checked_name(name);
        let payload = serde_json::to_value(payload)?;
        self.push(Signal::new(name, Some(payload)), true)
    }

    /// Publish an already built signal.
    pub fn publish_signal(&self, signal: Signal) -> Result<(), PublishError> {
        self.push(signal, true)
    }

    /// Number of signals waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.shared.buffers.lock().pending.len()
    }

    /// Append to the pending buffer. `may_block` is false on the tick thread,
    /// which would otherwise wait on itself.
    pub(crate) fn push(&self, signal: Signal, may_block: bool) -> Result<(), PublishError> {
        let shared = &*self.shared;
        let mut dropped = None;
        let mut buffers = shared.buffers.lock();
        loop {
            if buffers.closed {
                return Err(PublishError::Closed);
            }
            let Some(capacity) = shared.capacity else {
                break;
            };
            if buffers.pending.len() < capacity {
                break;
            }
            match shared.overflow {
                OverflowPolicy::Reject => return Err(PublishError::QueueFull { capacity }),
                OverflowPolicy::DropOldest => {
                    dropped = buffers.pending.pop_front();
                    break;
                }
                OverflowPolicy::Block if may_block => shared.drained.wait(&mut buffers),
                OverflowPolicy::Block => return Err(PublishError::QueueFull { capacity }),
            }
        }
        let name = signal.name().clone();
        buffers.pending.push_back(signal);
        let pending = buffers.pending.len();
        drop(buffers);

        if let (Some(old), Some(capacity)) = (dropped, shared.capacity) {
            shared.observer.on_event(&RunnerEvent::SignalDropped {
                signal: old.name().clone(),
                capacity,
            });
        }
        shared.observer.on_event(&RunnerEvent::SignalEnqueued {
            signal: name,
            pending,
        });
        Ok(())
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("capacity", &self.shared.capacity)
            .field("overflow", &self.shared.overflow)
            .field("pending", &self.pending())
            .finish()
    }
}

#[track_caller]
pub(crate) fn checked_name(name: &str) -> SignalName {
    match SignalName::new(name) {
        Ok(name) => name,
        Err(err) => panic!("{err}"),
    }
}
