//! Tickwork: a deterministic tick scheduler for signal-driven state machines.
//!
//! Producers on any thread publish named signals; a single driver calls
//! [`Runner::tick`] periodically. Each tick publishes a heartbeat, takes a
//! snapshot of the queue and dispatches exactly that batch to every machine in
//! registration order. Signals published during a tick wait for the next one,
//! so a tick does bounded work and identical inputs replay identically.
//!
//! # Core Concepts
//!
//! - **Signal**: immutable `(name, payload)` pair, see [`core::Signal`]
//! - **Machine**: a fixed set of states plus a handler, see [`machine::Machine`]
//! - **Runner**: owns the queue and the machines, see [`Runner`]
//! - **Observer**: injected diagnostics, see [`observe::Observer`]
//!
//! # Example
//!
//! ```rust
//! use tickwork::machines::{
//!     Indicator, StatusIndicator, TestRunTracker, Tracker, FILE_CHANGE,
//! };
//! use tickwork::Runner;
//!
//! let mut runner = Runner::new();
//! let tracker = runner.register(TestRunTracker::with_total(3)).unwrap();
//! let lamp = runner.register(StatusIndicator::new()).unwrap();
//!
//! // A file watcher on another thread would hold a clone of this.
//! let publisher = runner.publisher();
//! publisher.publish(FILE_CHANGE).unwrap();
//!
//! runner.tick().unwrap();
//! assert_eq!(runner.state(tracker), Some(&Tracker::Running));
//! assert_eq!(runner.state(lamp), Some(&Indicator::Gray));
//!
//! for _ in 0..4 {
//!     runner.tick().unwrap();
//! }
//! assert_eq!(runner.state(tracker), Some(&Tracker::Dormant));
//! assert_eq!(runner.state(lamp), Some(&Indicator::Green));
//! ```

pub mod core;
pub mod machine;
pub mod machines;
pub mod observe;
pub mod queue;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{Signal, SignalName, State, StateHistory, StateTransition, HEARTBEAT};
pub use machine::{Context, HandlerError, Machine, MachineId};
pub use queue::{OverflowPolicy, PublishError, Publisher};
pub use runner::{FaultPolicy, Runner, RunnerBuilder, RunnerConfig, TickError, TickReport};
