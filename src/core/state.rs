//! Core State trait for machine states.
//!
//! Every machine picks its current state from a fixed set of named states.
//! The set is modelled as an enum implementing this trait, so transitions are
//! exhaustively checked by the compiler.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for machine states.
///
/// All methods are pure. A state value describes where a machine currently is;
/// it may carry data (for example progress counters) as long as that data is
/// cloneable and serializable.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transition history
/// - `PartialEq`: trajectories are compared for reproducibility
/// - `Debug`: states show up in diagnostics
/// - `Serialize` + `Deserialize`: histories can be exported
///
/// # Example
///
/// ```rust
/// use tickwork::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Jammed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Jammed => "Jammed",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// assert!(Door::Jammed.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name of the state for display and logging.
    ///
    /// Data-carrying variants report the variant name only.
    fn name(&self) -> &str;

    /// Check if this state signals a problem (e.g. a red indicator).
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
