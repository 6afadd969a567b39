use super::{Observer, RunnerEvent};
use tracing::{debug, info, trace, warn};

/// Forwards runner events to `tracing` as structured records.
///
/// Per-delivery events are logged at `trace`, transitions and handler notes at
/// `debug`, faults and drops at `warn`. Installing a subscriber is left to the
/// application.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &RunnerEvent) {
        match event {
            RunnerEvent::SignalEnqueued { signal, pending } => {
                trace!(%signal, pending, "enqueueing signal");
            }
            RunnerEvent::SignalDropped { signal, capacity } => {
                warn!(%signal, capacity, "signal queue full, dropped oldest pending signal");
            }
            RunnerEvent::TickStarted { run_id, tick, batch } => {
                trace!(%run_id, tick, batch, "tick started");
            }
            RunnerEvent::Dispatched {
                tick,
                signal,
                machine,
                state,
            } => {
                trace!(tick, "{signal} -> {machine} [{state}]");
            }
            RunnerEvent::Transitioned {
                tick,
                signal,
                machine,
                from,
                to,
            } => {
                debug!(tick, %signal, %machine, %from, %to, "machine transitioned");
            }
            RunnerEvent::HandlerFailed {
                tick,
                signal,
                machine,
                error,
            } => {
                warn!(tick, %signal, %machine, %error, "handler failed");
            }
            RunnerEvent::Note {
                tick,
                machine,
                message,
            } => {
                debug!(tick, %machine, "{message}");
            }
            RunnerEvent::TickFinished {
                tick,
                dispatched,
                deliveries,
                transitions,
                faults,
            } => {
                if *faults > 0 {
                    info!(tick, dispatched, deliveries, transitions, faults, "tick finished with faults");
                } else {
                    trace!(tick, dispatched, deliveries, transitions, "tick finished");
                }
            }
        }
    }
}
