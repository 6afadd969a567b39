use super::{RunOutcome, FILE_CHANGE, TEST_RUN_FINISHED, TEST_RUN_STARTED};
use crate::core::Signal;
use crate::machine::{Context, HandlerError, Machine};
use crate::state_set;

/// Units in a run unless configured otherwise.
pub const DEFAULT_TOTAL: u32 = 10;

state_set! {
    /// States of the [`TestRunTracker`].
    pub enum Tracker {
        Dormant,
        Running,
    }
}

/// Runs a suite piecewise, one unit per heartbeat.
///
/// A file change wakes it up; it announces `test_run_started`, advances on
/// every heartbeat of a later tick, and publishes `test_run_finished` with
/// `[completed, total]` once done. File changes during a run are ignored.
#[derive(Debug)]
pub struct TestRunTracker {
    total: u32,
    completed: u32,
    started_tick: u64,
    runs: u64,
}

impl TestRunTracker {
    pub fn new() -> Self {
        Self::with_total(DEFAULT_TOTAL)
    }

    /// Tracker whose runs have `total` units (at least one).
    pub fn with_total(total: u32) -> Self {
        Self {
            total: total.max(1),
            completed: 0,
            started_tick: 0,
            runs: 0,
        }
    }

    /// `(completed, total)` of the current or last run.
    pub fn progress(&self) -> (u32, u32) {
        (self.completed, self.total)
    }

    /// Runs finished since construction.
    pub fn runs_finished(&self) -> u64 {
        self.runs
    }

    fn start(&mut self, ctx: &Context<'_>) -> Result<Option<Tracker>, HandlerError> {
        ctx.publish(TEST_RUN_STARTED)?;
        self.completed = 0;
        self.started_tick = ctx.tick();
        ctx.note("Got file change signal, transitioning to running.");
        Ok(Some(Tracker::Running))
    }

    fn advance(&mut self, beat: u64, ctx: &Context<'_>) -> Result<Option<Tracker>, HandlerError> {
        // The heartbeat of the starting tick belongs to the batch that woke us.
        if beat <= self.started_tick {
            return Ok(None);
        }
        let completed = self.completed + 1;
        if completed < self.total {
            self.completed = completed;
            ctx.note(format!("Running test {} of {}.", completed, self.total));
            return Ok(None);
        }

        let outcome = RunOutcome {
            completed,
            total: self.total,
        };
        ctx.publish_with(TEST_RUN_FINISHED, &outcome)?;
        self.completed = completed;
        self.runs += 1;
        ctx.note("All tests run. Publishing result and going dormant.");
        Ok(Some(Tracker::Dormant))
    }
}

impl Default for TestRunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for TestRunTracker {
    type State = Tracker;

    fn name(&self) -> &str {
        "TestRunTracker"
    }

    fn initial_state(&self) -> Tracker {
        Tracker::Dormant
    }

    fn handle(
        &mut self,
        state: &Tracker,
        signal: &Signal,
        ctx: &Context<'_>,
    ) -> Result<Option<Tracker>, HandlerError> {
        match state {
            Tracker::Dormant if signal.is(FILE_CHANGE) => self.start(ctx),
            Tracker::Dormant => Ok(None),
            Tracker::Running => match signal.tick_number() {
                Some(beat) => self.advance(beat, ctx),
                None => Ok(None),
            },
        }
    }
}
