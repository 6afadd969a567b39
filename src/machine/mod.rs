//! The contract every participant of a runner satisfies.
//!
//! A machine owns whatever data it needs (counters, configuration) but not its
//! current state: the runner keeps that and passes it in. A handler looks at
//! the signal, may publish new signals through the [`Context`], and answers
//! with the next state, or `None` to stay put. Machines never see each other;
//! all communication goes through published signals.
//!
//! # Example
//!
//! ```rust
//! use tickwork::core::Signal;
//! use tickwork::machine::{Context, HandlerError, Machine};
//! use tickwork::state_set;
//!
//! state_set! {
//!     pub enum Door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! struct FrontDoor;
//!
//! impl Machine for FrontDoor {
//!     type State = Door;
//!
//!     fn name(&self) -> &str {
//!         "FrontDoor"
//!     }
//!
//!     fn initial_state(&self) -> Door {
//!         Door::Closed
//!     }
//!
//!     fn handle(
//!         &mut self,
//!         state: &Door,
//!         signal: &Signal,
//!         ctx: &Context<'_>,
//!     ) -> Result<Option<Door>, HandlerError> {
//!         match state {
//!             Door::Closed if signal.is("knock") => {
//!                 ctx.publish("door_opened")?;
//!                 Ok(Some(Door::Open))
//!             }
//!             Door::Open if signal.is("tick") => Ok(Some(Door::Closed)),
//!             _ => Ok(None),
//!         }
//!     }
//! }
//! ```

mod context;
mod error;
pub(crate) mod slot;

pub use context::Context;
pub use error::HandlerError;

use crate::core::{Signal, State};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A finite-state machine driven by signals.
pub trait Machine: Send + 'static {
    /// The fixed set of states this machine moves between.
    type State: State + 'static;

    /// Identity used in diagnostics.
    fn name(&self) -> &str;

    /// State the machine starts in when registered.
    fn initial_state(&self) -> Self::State;

    /// React to one signal.
    ///
    /// Returns `Some(next)` to transition. Returning the current state, or
    /// `None`, leaves the machine where it is. On `Err` the state is left
    /// unchanged.
    fn handle(
        &mut self,
        state: &Self::State,
        signal: &Signal,
        ctx: &Context<'_>,
    ) -> Result<Option<Self::State>, HandlerError>;
}

/// Typed handle to a machine registered with a runner.
///
/// Only resolves against the runner that issued it.
pub struct MachineId<M> {
    pub(crate) run_id: Uuid,
    pub(crate) index: usize,
    _machine: PhantomData<fn() -> M>,
}

impl<M> MachineId<M> {
    pub(crate) fn new(run_id: Uuid, index: usize) -> Self {
        Self {
            run_id,
            index,
            _machine: PhantomData,
        }
    }

    /// Position in registration (and dispatch) order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<M> Clone for MachineId<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MachineId<M> {}

impl<M> PartialEq for MachineId<M> {
    fn eq(&self, other: &Self) -> bool {
        self.run_id == other.run_id && self.index == other.index
    }
}

impl<M> Eq for MachineId<M> {}

impl<M> fmt::Debug for MachineId<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineId")
            .field("run_id", &self.run_id)
            .field("index", &self.index)
            .finish()
    }
}
