//! Runner configuration.

use super::error::{BuildError, ConfigError};
use crate::queue::OverflowPolicy;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default bound of the pending buffer.
pub const DEFAULT_CAPACITY: usize = 1024;

/// What a tick does when a handler returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Stop the tick and return the error. The faulting signal is consumed;
    /// the rest of the batch is dispatched first by the next tick.
    Abort,
    /// Record the fault and keep delivering the signal to the remaining
    /// machines.
    #[default]
    SkipMachine,
    /// Record the fault and move on to the next signal; machines after the
    /// faulting one do not see this signal.
    SkipSignal,
}

/// Settings of a [`Runner`](super::Runner).
///
/// ```rust
/// use tickwork::runner::{FaultPolicy, RunnerConfig};
/// use tickwork::queue::OverflowPolicy;
///
/// let config = RunnerConfig::from_json(
///     r#"{ "capacity": 64, "overflow": "drop_oldest", "on_fault": "abort" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.capacity, Some(64));
/// assert_eq!(config.overflow, OverflowPolicy::DropOldest);
/// assert_eq!(config.on_fault, FaultPolicy::Abort);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Bound of the pending buffer; `None` leaves it unbounded.
    pub capacity: Option<usize>,
    pub overflow: OverflowPolicy,
    pub on_fault: FaultPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_CAPACITY),
            overflow: OverflowPolicy::Reject,
            on_fault: FaultPolicy::SkipMachine,
        }
    }
}

impl RunnerConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Check every rule, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();

        checks.push(if self.capacity == Some(0) {
            Validation::fail(ConfigError::ZeroCapacity)
        } else {
            Validation::success(())
        });

        let needs_capacity = matches!(
            self.overflow,
            OverflowPolicy::DropOldest | OverflowPolicy::Block
        );
        checks.push(if needs_capacity && self.capacity.is_none() {
            Validation::fail(ConfigError::PolicyNeedsCapacity {
                policy: self.overflow,
            })
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`validate`](Self::validate) folded into a `Result`.
    pub(crate) fn check(&self) -> Result<(), BuildError> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(BuildError::Invalid(errors.iter().cloned().collect())),
        }
    }
}
