//! Events reported by the runner.

use crate::core::SignalName;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Something that happened inside a runner.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunnerEvent {
    /// A producer or handler appended a signal to the pending buffer.
    SignalEnqueued { signal: SignalName, pending: usize },

    /// `DropOldest` evicted a pending signal to make room.
    SignalDropped { signal: SignalName, capacity: usize },

    /// A tick took its snapshot; `batch` includes the heartbeat.
    TickStarted { run_id: Uuid, tick: u64, batch: usize },

    /// A signal is about to be handed to a machine.
    Dispatched {
        tick: u64,
        signal: SignalName,
        machine: Arc<str>,
        state: String,
    },

    Transitioned {
        tick: u64,
        signal: SignalName,
        machine: Arc<str>,
        from: String,
        to: String,
    },

    HandlerFailed {
        tick: u64,
        signal: SignalName,
        machine: Arc<str>,
        error: String,
    },

    /// Free-form diagnostic emitted by a handler through its context.
    Note {
        tick: u64,
        machine: Arc<str>,
        message: String,
    },

    TickFinished {
        tick: u64,
        dispatched: usize,
        deliveries: usize,
        transitions: usize,
        faults: usize,
    },
}

impl RunnerEvent {
    /// Tick the event belongs to, if it happened inside one.
    pub fn tick(&self) -> Option<u64> {
        match self {
            Self::SignalEnqueued { .. } | Self::SignalDropped { .. } => None,
            Self::TickStarted { tick, .. }
            | Self::Dispatched { tick, .. }
            | Self::Transitioned { tick, .. }
            | Self::HandlerFailed { tick, .. }
            | Self::Note { tick, .. }
            | Self::TickFinished { tick, .. } => Some(*tick),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_events_are_outside_ticks() {
        let event = RunnerEvent::SignalEnqueued {
            signal: SignalName::new("file_change").unwrap(),
            pending: 1,
        };
        assert_eq!(event.tick(), None);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let event = RunnerEvent::Note {
            tick: 4,
            machine: Arc::from("TestRunTracker"),
            message: "Running test 3 of 10.".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "note");
        assert_eq!(json["tick"], 4);
        assert_eq!(json["machine"], "TestRunTracker");
    }
}
