//! Core types: states, signals and transition history.
//!
//! Nothing in this module touches the queue or the runner; these are the
//! values the rest of the crate passes around.

mod error;
mod history;
mod macros;
mod signal;
mod state;

pub use error::SignalError;
pub use history::{StateHistory, StateTransition};
pub use signal::{Signal, SignalName, HEARTBEAT};
pub use state::State;
