//! Typed handles into a machine's arena.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a copyable arena handle newtype.
macro_rules! handle {
    (
        $(#[$meta:meta])*
        $name:ident => $label:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub(crate) usize);

        impl $name {
            pub(crate) fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

handle! {
    /// Handle to a state node owned by a [`Machine`](crate::engine::Machine).
    StateId => "state"
}

handle! {
    /// Handle to a region owned by a [`Machine`](crate::engine::Machine).
    RegionId => "region"
}

handle! {
    /// Handle to a transition owned by a [`Machine`](crate::engine::Machine).
    TransitionId => "transition"
}
