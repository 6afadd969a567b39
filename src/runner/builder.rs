//! Builder for constructing runners.

use super::config::{FaultPolicy, RunnerConfig};
use super::error::BuildError;
use super::Runner;
use crate::observe::{Observer, TracingObserver};
use crate::queue::OverflowPolicy;
use std::sync::Arc;

/// Builder for constructing runners with a fluent API.
///
/// ```rust
/// use tickwork::RunnerBuilder;
/// use tickwork::queue::OverflowPolicy;
/// use tickwork::runner::FaultPolicy;
///
/// let runner = RunnerBuilder::new()
///     .capacity(256)
///     .overflow(OverflowPolicy::DropOldest)
///     .on_fault(FaultPolicy::Abort)
///     .build()
///     .unwrap();
/// assert_eq!(runner.ticks(), 0);
/// ```
pub struct RunnerBuilder {
    config: RunnerConfig,
    observer: Option<Arc<dyn Observer>>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
            observer: None,
        }
    }

    /// Replace every setting with `config`.
    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound the pending buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = Some(capacity);
        self
    }

    /// Let the pending buffer grow without bound.
    pub fn unbounded(mut self) -> Self {
        self.config.capacity = None;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow = policy;
        self
    }

    pub fn on_fault(mut self, policy: FaultPolicy) -> Self {
        self.config.on_fault = policy;
        self
    }

    /// Observer receiving every runner event. Defaults to [`TracingObserver`].
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the runner.
    /// Returns an error listing every configuration problem.
    pub fn build(self) -> Result<Runner, BuildError> {
        self.config.check()?;
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver));
        Ok(Runner::from_parts(self.config, observer))
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
