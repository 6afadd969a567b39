//! State transition history tracking.
//!
//! Each registered machine keeps the ordered list of transitions it made,
//! stamped with the tick and the signal that caused them. Comparing paths of
//! two runs is how reproducibility is checked.

use super::signal::SignalName;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use tickwork::core::{SignalName, State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Green,
///     Gray,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Green => "Green",
///             Self::Gray => "Gray",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Lamp::Green,
///     to: Lamp::Gray,
///     tick: 1,
///     signal: SignalName::new("file_change").unwrap(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.tick, 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// Tick during which the transition happened
    pub tick: u64,
    /// Signal whose handling caused the transition
    pub signal: SignalName,
    /// Wall-clock time of the transition
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// Compare two transitions ignoring the wall-clock timestamp.
    pub fn same_step(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.tick == other.tick
            && self.signal == other.signal
    }
}

/// Ordered history of state transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a transition.
    pub fn record(&mut self, transition: StateTransition<S>) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the first `from` state, then
    /// the `to` state of each transition. Empty when nothing was recorded.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall-clock time between the first and last transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Ticks at which transitions happened, in order.
    pub fn ticks(&self) -> Vec<u64> {
        self.transitions.iter().map(|t| t.tick).collect()
    }

    /// True when both histories hold the same steps, ignoring timestamps.
    pub fn same_trajectory(&self, other: &Self) -> bool {
        self.transitions.len() == other.transitions.len()
            && self
                .transitions
                .iter()
                .zip(&other.transitions)
                .all(|(a, b)| a.same_step(b))
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Light {
        Green,
        Gray,
        Red,
    }

    impl State for Light {
        fn name(&self) -> &str {
            match self {
                Self::Green => "Green",
                Self::Gray => "Gray",
                Self::Red => "Red",
            }
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Red)
        }
    }

    fn step(from: Light, to: Light, tick: u64, signal: &str) -> StateTransition<Light> {
        StateTransition {
            from,
            to,
            tick,
            signal: SignalName::new(signal).unwrap(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<Light> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::new();
        history.record(step(Light::Green, Light::Gray, 1, "file_change"));
        history.record(step(Light::Gray, Light::Red, 12, "test_run_finished"));

        let path = history.get_path();
        assert_eq!(path, vec![&Light::Green, &Light::Gray, &Light::Red]);
        assert_eq!(history.ticks(), vec![1, 12]);
    }

    #[test]
    fn same_trajectory_ignores_timestamps() {
        let mut a = StateHistory::new();
        a.record(step(Light::Green, Light::Gray, 1, "file_change"));

        std::thread::sleep(std::time::Duration::from_millis(2));

        let mut b = StateHistory::new();
        b.record(step(Light::Green, Light::Gray, 1, "file_change"));

        assert!(a.same_trajectory(&b));
    }

    #[test]
    fn same_trajectory_detects_different_ticks() {
        let mut a = StateHistory::new();
        a.record(step(Light::Green, Light::Gray, 1, "file_change"));
        let mut b = StateHistory::new();
        b.record(step(Light::Green, Light::Gray, 2, "file_change"));

        assert!(!a.same_trajectory(&b));
    }

    #[test]
    fn duration_spans_first_to_last() {
        let mut history = StateHistory::new();
        history.record(step(Light::Green, Light::Gray, 1, "file_change"));
        std::thread::sleep(std::time::Duration::from_millis(10));
        history.record(step(Light::Gray, Light::Green, 2, "test_run_finished"));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::new();
        history.record(step(Light::Green, Light::Gray, 3, "file_change"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<Light> = serde_json::from_str(&json).unwrap();

        assert!(history.same_trajectory(&deserialized));
    }
}
