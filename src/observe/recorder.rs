use super::{Observer, RunnerEvent};
use parking_lot::Mutex;

/// Observer that keeps every event in memory, in arrival order.
///
/// Useful for asserting on dispatch order and for comparing two runs.
///
/// ```rust
/// use std::sync::Arc;
/// use tickwork::observe::Recorder;
/// use tickwork::RunnerBuilder;
///
/// let recorder = Arc::new(Recorder::new());
/// let mut runner = RunnerBuilder::new().observer(recorder.clone()).build().unwrap();
/// runner.tick().unwrap();
/// assert_eq!(recorder.started_batches(), vec![(1, 1)]);
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<RunnerEvent>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<RunnerEvent> {
        self.events.lock().clone()
    }

    /// Take the recorded events, leaving the recorder empty.
    pub fn drain(&self) -> Vec<RunnerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// `(tick, signal, machine)` for every delivery, in dispatch order.
    pub fn deliveries(&self) -> Vec<(u64, String, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RunnerEvent::Dispatched {
                    tick,
                    signal,
                    machine,
                    ..
                } => Some((*tick, signal.to_string(), machine.to_string())),
                _ => None,
            })
            .collect()
    }

    /// `(tick, batch)` for every tick started.
    pub fn started_batches(&self) -> Vec<(u64, usize)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RunnerEvent::TickStarted { tick, batch, .. } => Some((*tick, *batch)),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Observer for Recorder {
    fn on_event(&self, event: &RunnerEvent) {
        self.events.lock().push(event.clone());
    }
}
