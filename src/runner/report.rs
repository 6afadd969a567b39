use crate::core::SignalName;
use serde::Serialize;

/// What a single tick did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    /// Signals in the batch, heartbeat included.
    pub batch: usize,
    /// Signals taken from the batch and dispatched.
    pub dispatched: usize,
    /// Handler invocations, at most `batch × machines`.
    pub deliveries: usize,
    pub transitions: Vec<TransitionRecord>,
    /// Handler errors isolated by the fault policy.
    pub faults: Vec<Fault>,
}

impl TickReport {
    pub(crate) fn new(tick: u64, batch: usize) -> Self {
        Self {
            tick,
            batch,
            dispatched: 0,
            deliveries: 0,
            transitions: Vec::new(),
            faults: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionRecord {
    pub machine: String,
    pub signal: SignalName,
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fault {
    pub machine: String,
    pub signal: SignalName,
    pub error: String,
}
