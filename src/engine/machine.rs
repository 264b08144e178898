//! The machine: arena owner and public facade.

use crate::core::{
    Entity, NameGenerator, RegionId, StateId, StateKind, TransitionId, TransitionLog, UuidNames,
};
use crate::engine::callbacks::Decision;
use crate::engine::context::Context;
use crate::engine::diagnostics::{self, Level, Observer};
use crate::engine::error::{ConfigurationError, MachineError, Result, UsageError};
use crate::engine::region::Region;
use crate::engine::scheduler::{FrameScheduler, ManualScheduler};
use crate::engine::state::{StateDef, StateNode};
use crate::engine::transition::{Transition, TransitionDef};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A statechart: one root state with a default region, plus every state,
/// region and transition reachable from it.
///
/// The graph lives in an arena owned by the machine and is addressed through
/// copyable handles. It is built once, then driven with [`start`](Self::start),
/// [`trigger`](Self::trigger) and [`finish`](Self::finish); every trigger runs
/// to completion, cascades included, before returning.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{StateBuilder, TransitionBuilder};
/// use statechart::engine::{Machine, TriggerOutcome};
/// use serde_json::Value;
///
/// let mut machine = Machine::new("door");
/// let closed = machine.create_state(StateBuilder::new("Closed").build().unwrap());
/// let opened = machine.create_state(StateBuilder::new("Opened").build().unwrap());
/// machine.add_state(closed).unwrap();
/// machine.add_state(opened).unwrap();
///
/// let init = machine.create_transition(TransitionBuilder::initial().to("Closed").build().unwrap());
/// let open = machine.create_transition(
///     TransitionBuilder::named("open").from("Closed").to("Opened").build().unwrap(),
/// );
/// machine.add_transition(init).unwrap();
/// machine.add_transition(open).unwrap();
///
/// machine.start().unwrap();
/// assert!(machine.is_state_active(closed));
///
/// let outcome = machine.trigger(open, &Value::Null).unwrap();
/// assert_eq!(outcome, TriggerOutcome::Fired);
/// assert!(machine.is_state_active(opened));
/// ```
pub struct Machine {
    pub(crate) states: Vec<StateNode>,
    pub(crate) regions: Vec<Region>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) scheduler: Box<dyn FrameScheduler>,
    pub(crate) names: Arc<dyn NameGenerator>,
    pub(crate) log: TransitionLog,
    observer: Option<Arc<dyn Observer>>,
    root: StateId,
    default_region: RegionId,
}

impl Machine {
    /// Create a machine whose root carries `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut machine = Self {
            states: vec![StateNode::synthesized(name.into(), StateKind::Root)],
            regions: Vec::new(),
            transitions: Vec::new(),
            scheduler: Box::new(ManualScheduler::new()),
            names: Arc::new(UuidNames),
            log: TransitionLog::new(),
            observer: None,
            root: StateId(0),
            default_region: RegionId(0),
        };
        machine.default_region = machine.push_region(machine.root);
        machine
    }

    /// Create a machine with a generated name.
    pub fn anonymous() -> Self {
        Self::new(UuidNames.generate())
    }

    pub fn with_scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn with_name_generator(mut self, names: impl NameGenerator + 'static) -> Self {
        self.names = Arc::new(names);
        self
    }

    pub fn name(&self) -> &str {
        self.states[self.root.index()].entity.name()
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn default_region(&self) -> RegionId {
        self.default_region
    }

    /// Create a detached state. It takes part in nothing until added to a region.
    pub fn create_state(&mut self, def: StateDef) -> StateId {
        let name = def.name.clone().unwrap_or_else(|| self.names.generate());
        self.push_state(StateNode::from_def(name, def))
    }

    /// Create an unregistered transition. Triggering it before it is added
    /// to a region is a configuration error.
    pub fn create_transition(&mut self, def: TransitionDef) -> TransitionId {
        let name = def.name.clone().unwrap_or_else(|| self.names.generate());
        self.push_transition(Transition::from_def(name, def))
    }

    /// Add a state to the machine's default region.
    pub fn add_state(&mut self, state: StateId) -> Result<StateId, ConfigurationError> {
        self.region_add_state(self.default_region, state)
    }

    /// Add a transition to the machine's default region.
    pub fn add_transition(
        &mut self,
        transition: TransitionId,
    ) -> Result<TransitionId, ConfigurationError> {
        self.region_add_transition(self.default_region, transition)
    }

    /// Add `child` to the first region of `parent`, creating that region if needed.
    pub fn add_child_state(
        &mut self,
        parent: StateId,
        child: StateId,
    ) -> Result<StateId, ConfigurationError> {
        let region = self.first_region(parent)?;
        self.region_add_state(region, child)
    }

    /// Add a transition to the first region of `parent`, creating that region if needed.
    pub fn add_child_transition(
        &mut self,
        parent: StateId,
        transition: TransitionId,
    ) -> Result<TransitionId, ConfigurationError> {
        let region = self.first_region(parent)?;
        self.region_add_transition(region, transition)
    }

    /// Install a history pseudostate in the first region of `parent`.
    pub fn add_history_state(
        &mut self,
        parent: StateId,
        deep: bool,
    ) -> Result<StateId, ConfigurationError> {
        let region = self.first_region(parent)?;
        self.region_add_history_state(region, deep)
    }

    /// Add a choice pseudostate named `name` to the first region of `parent`.
    ///
    /// Each time the choice is entered `decision` is asked for a target name;
    /// the engine then fires a synthesized transition from the choice to
    /// that target.
    pub fn add_choice_pseudostate<F>(
        &mut self,
        parent: StateId,
        name: impl Into<String>,
        decision: F,
    ) -> Result<StateId, ConfigurationError>
    where
        F: Fn(&Context<'_>) -> Option<String> + Send + Sync + 'static,
    {
        let region = self.first_region(parent)?;
        let choice = self.push_state(StateNode::choice(name.into(), Decision::new(decision)));
        self.region_add_state(region, choice)
    }

    /// Enter the root and resolve its default configuration.
    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            let error = UsageError::StateAlreadyActive {
                state: self.name().to_owned(),
            };
            self.report_usage(&error);
            return Err(error.into());
        }
        self.enter_state(self.root, false)
    }

    /// Exit every active state, innermost first, then the root.
    pub fn finish(&mut self) -> Result<()> {
        if !self.is_active() {
            let error = UsageError::StateAlreadyInactive {
                state: self.name().to_owned(),
            };
            self.report_usage(&error);
            return Err(error.into());
        }
        self.exit_state(self.root)
    }

    pub fn is_active(&self) -> bool {
        self.states[self.root.index()].status.is_active()
    }

    /// Read the machine's shared data bag.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.states[self.root.index()].entity.get(key)
    }

    /// Write the machine's shared data bag, returning the replaced value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.states[self.root.index()].entity.set(key, value)
    }

    pub fn state_get(&self, state: StateId, key: &str) -> Option<&Value> {
        self.states.get(state.index())?.entity.get(key)
    }

    pub fn state_set(
        &mut self,
        state: StateId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ConfigurationError> {
        let node = self
            .states
            .get_mut(state.index())
            .ok_or(ConfigurationError::UnknownState(state))?;
        Ok(node.entity.set(key, value))
    }

    /// Log of every transition fired so far.
    pub fn transition_log(&self) -> &TransitionLog {
        &self.log
    }

    /// Find a state by name: the root itself, then each root region using
    /// the same resolution order transitions use for their targets.
    pub fn find_state(&self, name: &str) -> Option<StateId> {
        if self.name() == name {
            return Some(self.root);
        }
        self.states[self.root.index()]
            .regions
            .iter()
            .find_map(|&region| self.resolve_state(region, name))
    }

    /// Find a registered transition by name, same order as [`find_state`](Self::find_state).
    pub fn find_transition(&self, name: &str) -> Option<TransitionId> {
        self.states[self.root.index()]
            .regions
            .iter()
            .find_map(|&region| self.lookup_transition(region, name))
    }

    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.states.get(state.index()).map(|node| node.entity.name())
    }

    pub fn state_kind(&self, state: StateId) -> Option<StateKind> {
        self.states.get(state.index()).map(|node| node.kind)
    }

    /// Number of ancestor states; the root is level 0.
    pub fn level(&self, state: StateId) -> Option<usize> {
        self.states.get(state.index()).map(|node| node.level)
    }

    pub fn is_state_active(&self, state: StateId) -> bool {
        self.states
            .get(state.index())
            .is_some_and(|node| node.status.is_active())
    }

    pub fn regions_of(&self, state: StateId) -> &[RegionId] {
        self.states
            .get(state.index())
            .map(|node| node.regions.as_slice())
            .unwrap_or_default()
    }

    pub fn container_of(&self, state: StateId) -> Option<RegionId> {
        self.states.get(state.index())?.container
    }

    pub fn transition_name(&self, transition: TransitionId) -> Option<&str> {
        self.transitions
            .get(transition.index())
            .map(|t| t.entity.name())
    }

    /// Synthesized transition a choice cached for `target`, if it was ever taken.
    pub fn cached_choice_transition(&self, choice: StateId, target: &str) -> Option<TransitionId> {
        self.states.get(choice.index())?.choices.get(target).copied()
    }

    /// Every active state in pre-order, root first.
    pub fn active_states(&self) -> Vec<StateId> {
        let mut active = Vec::new();
        self.collect_active(self.root, &mut active);
        active
    }

    /// Names of active states below the root, in pre-order.
    pub fn configuration(&self) -> Vec<&str> {
        self.active_states()
            .into_iter()
            .filter(|&state| state != self.root)
            .map(|state| self.states[state.index()].entity.name())
            .collect()
    }

    fn collect_active(&self, state: StateId, out: &mut Vec<StateId>) {
        let node = &self.states[state.index()];
        if !node.status.is_active() {
            return;
        }
        out.push(state);
        for &region in &node.regions {
            let region = &self.regions[region.index()];
            if region.status.is_active() {
                for &child in &region.states {
                    self.collect_active(child, out);
                }
            }
        }
    }

    pub(crate) fn push_state(&mut self, node: StateNode) -> StateId {
        self.states.push(node);
        StateId(self.states.len() - 1)
    }

    pub(crate) fn push_transition(&mut self, transition: Transition) -> TransitionId {
        self.transitions.push(transition);
        TransitionId(self.transitions.len() - 1)
    }

    pub(crate) fn check_state(&self, state: StateId) -> Result<&StateNode, ConfigurationError> {
        self.states
            .get(state.index())
            .ok_or(ConfigurationError::UnknownState(state))
    }

    pub(crate) fn check_region(&self, region: RegionId) -> Result<&Region, ConfigurationError> {
        self.regions
            .get(region.index())
            .ok_or(ConfigurationError::UnknownRegion(region))
    }

    pub(crate) fn label(&self, state: StateId) -> &str {
        self.states[state.index()].entity.name()
    }

    pub(crate) fn report(&self, level: Level, message: impl Into<String>) {
        diagnostics::emit(self.name(), self.observer.as_ref(), level, message.into());
    }

    pub(crate) fn report_usage(&self, error: &UsageError) {
        self.report(Level::Warn, error.to_string());
    }

    /// Report a fatal configuration error and hand it back for propagation.
    pub(crate) fn fail(&self, error: ConfigurationError) -> MachineError {
        self.report(Level::Error, error.to_string());
        error.into()
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.name())
            .field("active", &self.is_active())
            .field("states", &self.states.len())
            .field("regions", &self.regions.len())
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

/// Name-only entity used by synthesized regions.
pub(crate) fn region_entity(owner: &str, index: usize) -> Entity {
    Entity::new(format!("{owner}-region-{index}"))
}
