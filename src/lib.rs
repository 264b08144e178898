//! Statechart: a hierarchical state machine engine
//!
//! Statecharts extend flat state machines with nesting, orthogonal regions,
//! history and choice pseudostates. This crate keeps the pure parts (kinds,
//! handles, timer arithmetic, transition log) in [`core`] and the
//! interpreter that runs user callbacks in [`engine`].
//!
//! # Core Concepts
//!
//! - **Machine**: owns every state, region and transition, addressed by handles
//! - **Regions**: concurrent containers; a state with several is orthogonal
//! - **Pseudostates**: initial, final, history and choice nodes that resolve
//!   to a concrete configuration before control returns
//! - **Run to completion**: `trigger` returns only once every cascade it
//!   caused has settled
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{initial, simple_transition, StateBuilder};
//! use statechart::engine::Machine;
//! use serde_json::Value;
//!
//! let mut machine = Machine::new("turnstile");
//! let locked = machine.create_state(StateBuilder::new("Locked").build().unwrap());
//! let unlocked = machine.create_state(
//!     StateBuilder::new("Unlocked")
//!         .entry(|ctx| {
//!             let passes = ctx.get("passes").and_then(Value::as_u64).unwrap_or(0);
//!             ctx.set("passes", passes + 1);
//!             Ok(())
//!         })
//!         .build()
//!         .unwrap(),
//! );
//! machine.add_state(locked).unwrap();
//! machine.add_state(unlocked).unwrap();
//!
//! for def in [
//!     initial("Locked"),
//!     simple_transition("coin", "Locked", "Unlocked"),
//!     simple_transition("push", "Unlocked", "Locked"),
//! ] {
//!     let transition = machine.create_transition(def);
//!     machine.add_transition(transition).unwrap();
//! }
//!
//! machine.start().unwrap();
//! machine.trigger_named("coin", &Value::Null).unwrap();
//! machine.trigger_named("push", &Value::Null).unwrap();
//!
//! assert!(machine.is_state_active(locked));
//! assert_eq!(machine.get("passes"), Some(&Value::from(1)));
//! assert_eq!(machine.transition_log().path().last(), Some(&"Locked"));
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, TransitionBuilder};
pub use core::{HistoryDepth, RegionId, StateConfig, StateId, StateKind, TransitionId};
pub use engine::{Context, Machine, MachineError, TriggerOutcome};
