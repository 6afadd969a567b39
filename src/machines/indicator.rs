use super::{RunOutcome, FILE_CHANGE, TEST_RUN_FINISHED, TEST_RUN_STARTED};
use crate::core::Signal;
use crate::machine::{Context, HandlerError, Machine};
use crate::state_set;

state_set! {
    /// Colour shown by the [`StatusIndicator`].
    pub enum Indicator {
        /// Last run passed and nothing changed since.
        Green,
        /// A change is in flight; the result is not known yet.
        Gray,
        /// Last run failed.
        Red,
    }
    error: [Red]
}

/// Traffic light over test runs.
///
/// | state | signal                     | next  |
/// |-------|----------------------------|-------|
/// | Green | `file_change`              | Gray  |
/// | Green | `test_run_finished` failed | Red   |
/// | Gray  | `test_run_finished` passed | Green |
/// | Gray  | `test_run_finished` failed | Red   |
/// | Red   | `test_run_started`         | Gray  |
/// | Red   | `test_run_finished` passed | Green |
#[derive(Debug, Default)]
pub struct StatusIndicator {
    last_outcome: Option<RunOutcome>,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome of the most recent finished run seen.
    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome
    }
}

impl Machine for StatusIndicator {
    type State = Indicator;

    fn name(&self) -> &str {
        "StatusIndicator"
    }

    fn initial_state(&self) -> Indicator {
        Indicator::Green
    }

    fn handle(
        &mut self,
        state: &Indicator,
        signal: &Signal,
        ctx: &Context<'_>,
    ) -> Result<Option<Indicator>, HandlerError> {
        if signal.is(TEST_RUN_FINISHED) {
            let outcome: RunOutcome = signal.payload_as()?;
            self.last_outcome = Some(outcome);
            let next = if outcome.passed() {
                Indicator::Green
            } else {
                Indicator::Red
            };
            match (state, next) {
                (Indicator::Red, Indicator::Red) => ctx.note("It's a failed test run; staying red."),
                (Indicator::Green, Indicator::Green) => {
                    ctx.note("It's a successful test run; staying green.")
                }
                (_, Indicator::Red) => ctx.note("It's a failed test run; going red."),
                _ => ctx.note("It's a successful test run; going green."),
            }
            return Ok(Some(next));
        }

        Ok(match state {
            Indicator::Green if signal.is(FILE_CHANGE) => Some(Indicator::Gray),
            Indicator::Red if signal.is(TEST_RUN_STARTED) => Some(Indicator::Gray),
            _ => None,
        })
    }
}
