//! Error taxonomy of the engine.

use crate::core::{RegionId, StateId, StateKind, TransitionId};
use thiserror::Error;

/// Fatal modelling mistakes. The operation that hit one is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("transition '{transition}' is not registered in any region")]
    UnregisteredTransition { transition: String },

    #[error("region '{region}' containing transition '{transition}' is inactive")]
    InactiveContainer { transition: String, region: String },

    #[error("region '{region}' has no initial transition")]
    MissingInitialTransition { region: String },

    #[error("initial transition '{transition}' was rejected by its guard")]
    InitialTransitionRejected { transition: String },

    #[error("source state '{state}' of transition '{transition}' is not a child of region '{region}'")]
    UnknownSource {
        transition: String,
        state: String,
        region: String,
    },

    #[error("target state '{state}' of transition '{transition}' is not reachable from region '{region}'")]
    UnknownTarget {
        transition: String,
        state: String,
        region: String,
    },

    #[error("transition '{transition}' cannot leave a final state")]
    FinalSource { transition: String },

    #[error("transition '{transition}' cannot target an initial pseudostate")]
    InitialTarget { transition: String },

    #[error("choice '{state}' did not produce a target name")]
    ChoiceUndecided { state: String },

    #[error("choice '{state}' selected unreachable target '{target}'")]
    ChoiceTargetUnreachable { state: String, target: String },

    #[error("region '{region}' already contains an entity named '{name}'")]
    DuplicateName { region: String, name: String },

    #[error("state '{state}' already belongs to region '{region}'")]
    AlreadyContained { state: String, region: String },

    #[error("transition '{transition}' is already registered in region '{region}'")]
    AlreadyRegistered { transition: String, region: String },

    #[error("adding state '{state}' to region '{region}' would make it its own ancestor")]
    ContainmentCycle { state: String, region: String },

    #[error("machine root '{state}' cannot be added to a region")]
    RootNotInsertable { state: String },

    #[error("{kind:?} state '{state}' cannot own regions")]
    NotComposite { state: String, kind: StateKind },

    #[error("unknown state handle {0}")]
    UnknownState(StateId),

    #[error("unknown region handle {0}")]
    UnknownRegion(RegionId),

    #[error("unknown transition handle {0}")]
    UnknownTransition(TransitionId),

    #[error("no transition named '{name}'")]
    UnknownTransitionName { name: String },
}

/// Duplicate activation or deactivation. Reported, then ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("state '{state}' is already active")]
    StateAlreadyActive { state: String },

    #[error("state '{state}' is already inactive")]
    StateAlreadyInactive { state: String },

    #[error("region '{region}' is already active")]
    RegionAlreadyActive { region: String },

    #[error("region '{region}' is already inactive")]
    RegionAlreadyInactive { region: String },

    #[error("timer of state '{state}' has not run yet")]
    TimerNotStarted { state: String },
}

/// Everything a machine operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("action failed: {message}")]
    Action { message: String },
}

impl MachineError {
    /// Failure raised by a user callback.
    pub fn action(message: impl Into<String>) -> Self {
        Self::Action {
            message: message.into(),
        }
    }
}

pub type Result<T, E = MachineError> = std::result::Result<T, E>;
