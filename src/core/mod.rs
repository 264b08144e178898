//! Core statechart types and logic.
//!
//! This module contains the pure building blocks the engine is assembled from:
//! - Entity identity and the key/value data bag
//! - State kinds as a tagged union instead of independent flags
//! - Typed arena handles for states, regions and transitions
//! - The periodic-activity step function
//! - Immutable transition log
//!
//! Nothing in here performs I/O or invokes user callbacks.

mod config;
mod entity;
mod history;
mod ids;
mod kind;
mod timer;

pub use config::StateConfig;
pub use entity::{Entity, NameGenerator, SequentialNames, UuidNames};
pub use history::{TransitionLog, TransitionRecord};
pub use ids::{RegionId, StateId, TransitionId};
pub use kind::{HistoryDepth, StateKind, Status};
pub use timer::TimerState;
