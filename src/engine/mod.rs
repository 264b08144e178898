//! The runtime: machine arena, entry and exit algorithms, triggering,
//! timed activities and diagnostics.
//!
//! Everything that mutates a statechart lives here. The value types it works
//! with are in [`crate::core`]; validated definitions come from
//! [`crate::builder`].

mod activity;
pub mod callbacks;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod machine;
mod region;
pub mod scheduler;
pub mod state;
pub mod transition;

pub use callbacks::{Action, Decision, Effect, Guard};
pub use context::Context;
pub use diagnostics::{Diagnostic, DiagnosticLog, Level, Observer};
pub use error::{ConfigurationError, MachineError, Result, UsageError};
pub use machine::Machine;
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use state::StateDef;
pub use transition::{TransitionDef, TriggerOutcome};
