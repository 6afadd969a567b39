//! Type-erased holder for a registered machine.

use super::{Context, HandlerError, Machine};
use crate::core::{Signal, State, StateHistory, StateTransition};
use chrono::Utc;
use std::any::Any;
use std::sync::Arc;

/// Names of the states on either side of an applied transition.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Applied {
    pub(crate) from: String,
    pub(crate) to: String,
}

/// Object-safe view of a [`Slot`], so machines of different types can share
/// one list.
pub(crate) trait Dispatch: Send {
    fn name(&self) -> &Arc<str>;

    fn state_name(&self) -> &str;

    /// Hand `signal` to the machine and apply the transition it asks for.
    fn dispatch(
        &mut self,
        signal: &Signal,
        ctx: &Context<'_>,
    ) -> Result<Option<Applied>, HandlerError>;

    fn as_any(&self) -> &dyn Any;
}

/// A machine together with the state the runner keeps for it.
pub(crate) struct Slot<M: Machine> {
    pub(crate) machine: M,
    pub(crate) name: Arc<str>,
    pub(crate) state: M::State,
    pub(crate) history: StateHistory<M::State>,
}

impl<M: Machine> Slot<M> {
    pub(crate) fn new(machine: M) -> Self {
        let name = Arc::from(machine.name());
        let state = machine.initial_state();
        Self {
            machine,
            name,
            state,
            history: StateHistory::new(),
        }
    }
}

impl<M: Machine> Dispatch for Slot<M> {
    fn name(&self) -> &Arc<str> {
        &self.name
    }

    fn state_name(&self) -> &str {
        self.state.name()
    }

    fn dispatch(
        &mut self,
        signal: &Signal,
        ctx: &Context<'_>,
    ) -> Result<Option<Applied>, HandlerError> {
        let next = match self.machine.handle(&self.state, signal, ctx)? {
            Some(next) if next != self.state => next,
            _ => return Ok(None),
        };

        let applied = Applied {
            from: self.state.name().to_string(),
            to: next.name().to_string(),
        };
        let from = std::mem::replace(&mut self.state, next);
        self.history.record(StateTransition {
            from,
            to: self.state.clone(),
            tick: ctx.tick(),
            signal: signal.name().clone(),
            timestamp: Utc::now(),
        });
        Ok(Some(applied))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SignalName;
    use crate::observe::Silent;
    use crate::queue::{OverflowPolicy, SignalQueue};
    use crate::state_set;

    state_set! {
        enum Switch {
            Off,
            On,
        }
    }

    struct Toggle;

    impl Machine for Toggle {
        type State = Switch;

        fn name(&self) -> &str {
            "Toggle"
        }

        fn initial_state(&self) -> Switch {
            Switch::Off
        }

        fn handle(
            &mut self,
            state: &Switch,
            signal: &Signal,
            _ctx: &Context<'_>,
        ) -> Result<Option<Switch>, HandlerError> {
            Ok(match (state, signal.name().as_str()) {
                (Switch::Off, "flip") => Some(Switch::On),
                (Switch::On, "flip") => Some(Switch::Off),
                (_, "stay") => Some(*state),
                _ => None,
            })
        }
    }

    fn run(slot: &mut Slot<Toggle>, name: &str, tick: u64) -> Option<Applied> {
        let queue = SignalQueue::new(None, OverflowPolicy::Reject, Arc::new(Silent));
        let publisher = queue.publisher();
        let machine = Arc::clone(&slot.name);
        let ctx = Context::new(tick, &machine, &publisher, &Silent);
        let signal = Signal::new(SignalName::new(name).unwrap(), None);
        slot.dispatch(&signal, &ctx).unwrap()
    }

    #[test]
    fn transition_is_applied_and_recorded() {
        let mut slot = Slot::new(Toggle);
        let applied = run(&mut slot, "flip", 3);

        assert_eq!(
            applied,
            Some(Applied {
                from: "Off".to_string(),
                to: "On".to_string()
            })
        );
        assert_eq!(slot.state, Switch::On);
        assert_eq!(slot.history.ticks(), vec![3]);
        assert_eq!(slot.history.transitions()[0].signal, "flip");
    }

    #[test]
    fn returning_current_state_is_not_a_transition() {
        let mut slot = Slot::new(Toggle);
        assert_eq!(run(&mut slot, "stay", 1), None);
        assert!(slot.history.is_empty());
    }

    #[test]
    fn ignored_signal_leaves_state_alone() {
        let mut slot = Slot::new(Toggle);
        assert_eq!(run(&mut slot, "noise", 1), None);
        assert_eq!(slot.state_name(), "Off");
    }
}
