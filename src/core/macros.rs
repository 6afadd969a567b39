//! Macro for declaring a fixed set of named states.

/// Declare a unit-variant state enum together with its `State` impl.
///
/// The enum also gets an `ALL` constant listing every state in declaration
/// order, which is handy for exhaustive tests over the state set.
///
/// # Example
///
/// ```
/// use tickwork::state_set;
/// use tickwork::core::State;
///
/// state_set! {
///     pub enum Valve {
///         Open,
///         Closed,
///         Stuck,
///     }
///     error: [Stuck]
/// }
///
/// assert_eq!(Valve::ALL.len(), 3);
/// assert_eq!(Valve::Closed.name(), "Closed");
/// assert!(Valve::Stuck.is_error());
/// ```
#[macro_export]
macro_rules! state_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every state of this machine, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
