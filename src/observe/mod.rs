//! Observability injected into the runner.
//!
//! The runner and its queue never log through a global facade directly; they
//! report [`RunnerEvent`]s to the [`Observer`] they were built with. The
//! default [`TracingObserver`] forwards to `tracing`, [`Recorder`] keeps the
//! events in memory.
//!
//! ```text
//!   Publisher::publish ──┐
//!   Runner::tick ────────┼──► Arc<dyn Observer> ──► TracingObserver (tracing)
//!   Context::note ───────┘                      └─► Recorder (tests)
//! ```

mod event;
mod recorder;
mod tracing_observer;

pub use event::RunnerEvent;
pub use recorder::Recorder;
pub use tracing_observer::TracingObserver;

/// Receives every event produced by a runner and its publishers.
///
/// Called synchronously, possibly from producer threads, so implementations
/// must be cheap and must not call back into the runner.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &RunnerEvent);
}

/// Observer that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Observer for Silent {
    fn on_event(&self, _event: &RunnerEvent) {}
}
