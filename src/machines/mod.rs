//! Ready-made machines for a test-driven-development monitor.
//!
//! A file watcher publishes [`FILE_CHANGE`]; the [`TestRunTracker`] runs a
//! (simulated) suite one unit per heartbeat and reports the outcome; the
//! [`StatusIndicator`] turns that into a green, gray or red light.

mod indicator;
mod tracker;

pub use indicator::{Indicator, StatusIndicator};
pub use tracker::{TestRunTracker, Tracker, DEFAULT_TOTAL};

use serde::{Deserialize, Serialize};

/// Published by a file watcher when sources change.
pub const FILE_CHANGE: &str = "file_change";
/// Published by the tracker when a run begins.
pub const TEST_RUN_STARTED: &str = "test_run_started";
/// Published by the tracker when a run ends, with a [`RunOutcome`] payload.
pub const TEST_RUN_FINISHED: &str = "test_run_finished";

/// Result of a test run, encoded on the wire as `[completed, total]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct RunOutcome {
    pub completed: u32,
    pub total: u32,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.completed >= self.total
    }
}

impl From<(u32, u32)> for RunOutcome {
    fn from((completed, total): (u32, u32)) -> Self {
        Self { completed, total }
    }
}

impl From<RunOutcome> for (u32, u32) {
    fn from(outcome: RunOutcome) -> Self {
        (outcome.completed, outcome.total)
    }
}
