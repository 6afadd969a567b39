//! Errors raised by the runner.

use crate::core::SignalName;
use crate::machine::HandlerError;
use crate::queue::OverflowPolicy;
use thiserror::Error;

/// A tick stopped early under [`FaultPolicy::Abort`](super::FaultPolicy::Abort).
#[derive(Debug, Error)]
pub enum TickError {
    #[error("Machine '{machine}' failed on signal '{signal}' during tick {tick}: {source}")]
    Handler {
        tick: u64,
        machine: String,
        signal: SignalName,
        #[source]
        source: HandlerError,
    },
}

/// Errors that can occur when registering a machine.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Machines must be registered before the first tick (runner is at tick {tick})")]
    AlreadyStarted { tick: u64 },
}

/// A single rule broken by a [`RunnerConfig`](super::RunnerConfig).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Queue capacity must be at least 1")]
    ZeroCapacity,

    #[error("Overflow policy {policy:?} requires a bounded queue capacity")]
    PolicyNeedsCapacity { policy: OverflowPolicy },
}

/// Errors that can occur when building a runner or loading its configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to parse runner configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid runner configuration: {}", joined(.0))]
    Invalid(Vec<ConfigError>),
}

fn joined(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
