//! Restricted view of a machine handed to callbacks.

use crate::core::{StateId, TransitionId};
use crate::engine::error::Result;
use crate::engine::machine::Machine;
use crate::engine::transition::TriggerOutcome;
use serde_json::Value;

/// What a guard, effect, action or decision can see and do.
///
/// Structural changes are not reachable from here: callbacks may read and
/// write the shared data bag and trigger transitions, nothing more.
pub struct Context<'m> {
    machine: &'m mut Machine,
    state: Option<StateId>,
}

impl<'m> Context<'m> {
    pub(crate) fn new(machine: &'m mut Machine, state: Option<StateId>) -> Self {
        Self { machine, state }
    }

    pub fn machine_name(&self) -> &str {
        self.machine.name()
    }

    /// State whose behavior is running, or the source of the firing transition.
    pub fn state(&self) -> Option<StateId> {
        self.state
    }

    pub fn state_name(&self) -> Option<&str> {
        self.state.and_then(|state| self.machine.state_name(state))
    }

    /// Read the machine's shared data bag.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.machine.get(key)
    }

    /// Write the machine's shared data bag.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.machine.set(key, value)
    }

    /// Read the current state's own data bag.
    pub fn state_data(&self, key: &str) -> Option<&Value> {
        self.state
            .and_then(|state| self.machine.state_get(state, key))
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.machine
            .find_state(name)
            .is_some_and(|state| self.machine.is_state_active(state))
    }

    pub fn trigger(&mut self, transition: TransitionId, memo: &Value) -> Result<TriggerOutcome> {
        self.machine.trigger(transition, memo)
    }

    pub fn trigger_named(&mut self, name: &str, memo: &Value) -> Result<TriggerOutcome> {
        self.machine.trigger_named(name, memo)
    }
}
