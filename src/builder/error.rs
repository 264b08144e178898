//! Build errors for state and transition builders.
//!
//! Builders check every rule and report all violations at once instead of
//! stopping at the first one.

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single rule a definition breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("name must not be empty when given")]
    EmptyName,

    #[error("{role} state name must not be empty when given")]
    EmptyStateName { role: &'static str },

    #[error("auto-transition cannot be combined with a periodic timer")]
    TimerWithAutoTransition,

    #[error("timer interval must be greater than zero")]
    ZeroInterval,

    #[error("internal transitions need a source state")]
    InternalWithoutSource,
}

/// Errors that can occur when building states and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid state definition: {}", summarize(.0))]
    InvalidState(Vec<Violation>),

    #[error("invalid transition definition: {}", summarize(.0))]
    InvalidTransition(Vec<Violation>),
}

impl BuildError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidState(violations) | Self::InvalidTransition(violations) => violations,
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) type Check = Validation<(), NonEmptyVec<Violation>>;

pub(crate) fn require(holds: bool, violation: Violation) -> Check {
    if holds {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}

/// Run every check, collecting all failures.
pub(crate) fn collect(checks: Vec<Check>) -> Result<(), Vec<Violation>> {
    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}
