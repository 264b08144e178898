//! Builder API for ergonomic statechart construction.
//!
//! Builders validate definitions up front and report every problem at
//! once. The shorthand functions below cover the common cases that cannot
//! fail validation.

pub mod error;
pub mod state;
pub mod transition;

pub use error::{BuildError, Violation};
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

use crate::engine::{Context, Guard, StateDef, TransitionDef};
use serde_json::Value;

/// A plain state with no behavior.
///
/// # Example
///
/// ```
/// use statechart::builder::state;
/// use statechart::engine::Machine;
///
/// let mut machine = Machine::new("m");
/// let idle = machine.create_state(state("Idle"));
/// assert_eq!(machine.state_name(idle), Some("Idle"));
/// ```
pub fn state(name: impl Into<String>) -> StateDef {
    StateDef {
        name: Some(name.into()),
        ..StateDef::default()
    }
}

/// The initial transition of a region, leading to `target`.
pub fn initial(target: impl Into<String>) -> TransitionDef {
    TransitionDef {
        target: Some(target.into()),
        ..TransitionDef::default()
    }
}

/// An unconditional external transition.
///
/// # Example
///
/// ```
/// use statechart::builder::simple_transition;
///
/// let def = simple_transition("go", "A", "B");
/// assert_eq!(def.source(), Some("A"));
/// assert_eq!(def.target(), Some("B"));
/// ```
pub fn simple_transition(
    name: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
) -> TransitionDef {
    TransitionDef {
        name: Some(name.into()),
        source: Some(from.into()),
        target: Some(to.into()),
        ..TransitionDef::default()
    }
}

/// An external transition with a guard predicate.
///
/// # Example
///
/// ```
/// use statechart::builder::guarded_transition;
/// use serde_json::Value;
///
/// let def = guarded_transition("go", "A", "B", |ctx, _memo: &Value| {
///     ctx.get("ready").and_then(Value::as_bool).unwrap_or(false)
/// });
/// assert_eq!(def.name(), Some("go"));
/// ```
pub fn guarded_transition<F>(
    name: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
    guard: F,
) -> TransitionDef
where
    F: Fn(&Context<'_>, &Value) -> bool + Send + Sync + 'static,
{
    TransitionDef {
        guard: Some(Guard::new(guard)),
        ..simple_transition(name, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Machine, TriggerOutcome};
    use serde_json::json;

    #[test]
    fn helpers_build_a_working_machine() {
        let mut machine = Machine::new("m");
        let a = machine.create_state(state("A"));
        let b = machine.create_state(state("B"));
        machine.add_state(a).unwrap();
        machine.add_state(b).unwrap();
        let init = machine.create_transition(initial("A"));
        let go = machine.create_transition(simple_transition("go", "A", "B"));
        machine.add_transition(init).unwrap();
        machine.add_transition(go).unwrap();

        machine.start().unwrap();
        machine.trigger(go, &Value::Null).unwrap();

        assert!(machine.is_state_active(b));
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let mut machine = Machine::new("m");
        let a = machine.create_state(state("A"));
        let b = machine.create_state(state("B"));
        machine.add_state(a).unwrap();
        machine.add_state(b).unwrap();
        let init = machine.create_transition(initial("A"));
        let go = machine.create_transition(guarded_transition("go", "A", "B", |_, memo| {
            memo.as_bool().unwrap_or(false)
        }));
        machine.add_transition(init).unwrap();
        machine.add_transition(go).unwrap();
        machine.start().unwrap();

        assert_eq!(
            machine.trigger(go, &json!(false)).unwrap(),
            TriggerOutcome::GuardRejected
        );
        assert_eq!(
            machine.trigger(go, &json!(true)).unwrap(),
            TriggerOutcome::Fired
        );
    }
}
