//! The signal queue: many producers, one draining tick thread.
//!
//! The queue is a double buffer. Producers append to the *pending* buffer
//! behind a lock; the runner owns the *active* batch outright. At the start of
//! every tick the pending buffer is moved behind the active batch in one lock
//! acquisition and the heartbeat is appended, which fixes the batch for that
//! tick. Anything published afterwards lands in the pending buffer again and
//! waits for the next tick.
//!
//! ```text
//!   producer threads ──publish──► pending (Mutex<VecDeque>)
//!                                     │  begin_batch: move + heartbeat
//!                                     ▼
//!   tick thread ◄──next_signal── active (VecDeque, lock-free)
//! ```

mod error;
pub(crate) mod publisher;

pub use error::PublishError;
pub use publisher::Publisher;

use crate::core::Signal;
use crate::observe::Observer;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// What `publish` does when the pending buffer is at capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Refuse the new signal with [`PublishError::QueueFull`].
    #[default]
    Reject,
    /// Evict the oldest pending signal to make room.
    DropOldest,
    /// Make the producer wait for the next tick. Handlers never wait; they
    /// get [`PublishError::QueueFull`] instead.
    Block,
}

struct Buffers {
    pending: VecDeque<Signal>,
    closed: bool,
}

pub(crate) struct Shared {
    buffers: Mutex<Buffers>,
    drained: Condvar,
    capacity: Option<usize>,
    overflow: OverflowPolicy,
    observer: Arc<dyn Observer>,
}

/// Runner-owned end of the queue.
pub(crate) struct SignalQueue {
    shared: Arc<Shared>,
    active: VecDeque<Signal>,
}

impl SignalQueue {
    pub(crate) fn new(
        capacity: Option<usize>,
        overflow: OverflowPolicy,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let shared = Shared {
            buffers: Mutex::new(Buffers {
                pending: VecDeque::new(),
                closed: false,
            }),
            drained: Condvar::new(),
            capacity,
            overflow,
            observer,
        };
        Self {
            shared: Arc::new(shared),
            active: VecDeque::new(),
        }
    }

    pub(crate) fn publisher(&self) -> Publisher {
        Publisher::new(Arc::clone(&self.shared))
    }

    /// Fix the batch for a tick: move every pending signal behind the active
    /// batch, then append the heartbeat. Returns the batch size.
    pub(crate) fn begin_batch(&mut self, heartbeat: Signal) -> usize {
        {
            let mut buffers = self.shared.buffers.lock();
            self.active.extend(buffers.pending.drain(..));
        }
        self.shared.drained.notify_all();
        self.active.push_back(heartbeat);
        self.active.len()
    }

    /// Next signal of the current batch.
    pub(crate) fn next_signal(&mut self) -> Option<Signal> {
        self.active.pop_front()
    }

    /// Signals left over in the active batch (only after an aborted tick).
    pub(crate) fn carried_over(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.shared.buffers.lock().pending.len()
    }
}

impl Drop for SignalQueue {
    fn drop(&mut self) {
        self.shared.buffers.lock().closed = true;
        self.shared.drained.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SignalName, HEARTBEAT};
    use crate::observe::{Recorder, RunnerEvent, Silent};

    fn queue(capacity: Option<usize>, overflow: OverflowPolicy) -> SignalQueue {
        SignalQueue::new(capacity, overflow, Arc::new(Silent))
    }

    fn names(queue: &mut SignalQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.next_signal())
            .map(|s| s.name().to_string())
            .collect()
    }

    #[test]
    fn batch_is_fifo_with_heartbeat_last() {
        let mut queue = queue(None, OverflowPolicy::Reject);
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();
        publisher.publish("b").unwrap();

        assert_eq!(queue.begin_batch(Signal::heartbeat(1)), 3);
        assert_eq!(names(&mut queue), vec!["a", "b", HEARTBEAT]);
    }

    #[test]
    fn signals_published_mid_batch_wait_for_next_batch() {
        let mut queue = queue(None, OverflowPolicy::Reject);
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();

        queue.begin_batch(Signal::heartbeat(1));
        let first = queue.next_signal().unwrap();
        assert!(first.is("a"));
        publisher.publish("late").unwrap();

        assert_eq!(names(&mut queue), vec![HEARTBEAT]);
        assert_eq!(queue.pending_len(), 1);
        assert_eq!(queue.begin_batch(Signal::heartbeat(2)), 2);
    }

    #[test]
    fn leftovers_come_before_new_pending_signals() {
        let mut queue = queue(None, OverflowPolicy::Reject);
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();
        publisher.publish("b").unwrap();
        queue.begin_batch(Signal::heartbeat(1));
        queue.next_signal();
        assert_eq!(queue.carried_over(), 2);

        publisher.publish("c").unwrap();
        queue.begin_batch(Signal::heartbeat(2));
        assert_eq!(names(&mut queue), vec!["b", HEARTBEAT, "c", HEARTBEAT]);
    }

    #[test]
    fn reject_policy_refuses_when_full() {
        let queue = queue(Some(1), OverflowPolicy::Reject);
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();

        let err = publisher.publish("b").unwrap_err();
        assert!(matches!(err, PublishError::QueueFull { capacity: 1 }));
        assert_eq!(queue.pending_len(), 1);
    }

    #[test]
    fn drop_oldest_policy_evicts_and_reports() {
        let recorder = Arc::new(Recorder::new());
        let mut queue = SignalQueue::new(Some(2), OverflowPolicy::DropOldest, recorder.clone());
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();
        publisher.publish("b").unwrap();
        publisher.publish("c").unwrap();

        queue.begin_batch(Signal::heartbeat(1));
        assert_eq!(names(&mut queue), vec!["b", "c", HEARTBEAT]);
        assert!(recorder.events().contains(&RunnerEvent::SignalDropped {
            signal: SignalName::new("a").unwrap(),
            capacity: 2,
        }));
    }

    #[test]
    fn heartbeat_ignores_capacity() {
        let mut queue = queue(Some(1), OverflowPolicy::Reject);
        queue.publisher().publish("a").unwrap();
        assert_eq!(queue.begin_batch(Signal::heartbeat(1)), 2);
    }

    #[test]
    fn blocked_producer_resumes_after_drain() {
        let mut queue = queue(Some(1), OverflowPolicy::Block);
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();

        let producer = {
            let publisher = publisher.clone();
            std::thread::spawn(move || publisher.publish("b"))
        };

        // Give the producer time to park on the full buffer.
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(queue.pending_len(), 1);

        queue.begin_batch(Signal::heartbeat(1));
        producer.join().unwrap().unwrap();
        assert_eq!(queue.pending_len(), 1);
    }

    #[test]
    fn dropping_the_queue_closes_publishers() {
        let queue = queue(None, OverflowPolicy::Reject);
        let publisher = queue.publisher();
        drop(queue);

        assert!(matches!(publisher.publish("a"), Err(PublishError::Closed)));
    }

    #[test]
    fn dropping_the_queue_wakes_blocked_producers() {
        let queue = queue(Some(1), OverflowPolicy::Block);
        let publisher = queue.publisher();
        publisher.publish("a").unwrap();

        let producer = {
            let publisher = publisher.clone();
            std::thread::spawn(move || publisher.publish("b"))
        };
        std::thread::sleep(std::time::Duration::from_millis(50));
        drop(queue);

        assert!(matches!(producer.join().unwrap(), Err(PublishError::Closed)));
    }

    #[test]
    fn overflow_policy_config_names() {
        let policy: OverflowPolicy = serde_json::from_str("\"drop_oldest\"").unwrap();
        assert_eq!(policy, OverflowPolicy::DropOldest);
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Reject);
    }
}
