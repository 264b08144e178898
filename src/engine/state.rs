//! State nodes and the entry, exit and completion algorithms.
//!
//! Entering or exiting a subtree happens in two phases. First the affected
//! states and regions are collected into a plan, then the plan is executed
//! step by step. A step whose enclosing scope was deactivated by an earlier
//! callback is skipped, which keeps cascades triggered from inside entry
//! and exit behavior from resurrecting states that were already left.

use crate::core::{
    Entity, RegionId, StateConfig, StateId, StateKind, Status, TimerState, TransitionId,
};
use crate::engine::callbacks::{Action, Decision};
use crate::engine::context::Context;
use crate::engine::diagnostics::Level;
use crate::engine::error::{ConfigurationError, Result, UsageError};
use crate::engine::machine::Machine;
use crate::engine::scheduler::FrameHandle;
use crate::engine::transition::{Transition, TriggerOutcome};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Definition of a normal state, produced by [`StateBuilder`](crate::builder::StateBuilder).
#[derive(Clone, Debug, Default)]
pub struct StateDef {
    pub(crate) name: Option<String>,
    pub(crate) config: StateConfig,
    pub(crate) entry: Option<Action>,
    pub(crate) exit: Option<Action>,
    pub(crate) do_activity: Option<Action>,
    pub(crate) data: Map<String, Value>,
}

impl StateDef {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }
}

/// A state as stored in the machine's arena.
#[derive(Debug)]
pub(crate) struct StateNode {
    pub(crate) entity: Entity,
    pub(crate) kind: StateKind,
    pub(crate) status: Status,
    pub(crate) level: usize,
    pub(crate) container: Option<RegionId>,
    pub(crate) regions: Vec<RegionId>,
    pub(crate) config: StateConfig,
    pub(crate) entry: Option<Action>,
    pub(crate) exit: Option<Action>,
    pub(crate) do_activity: Option<Action>,
    pub(crate) timer: TimerState,
    pub(crate) frame: Option<FrameHandle>,
    pub(crate) decision: Option<Decision>,
    pub(crate) choices: HashMap<String, TransitionId>,
}

impl StateNode {
    pub(crate) fn synthesized(name: String, kind: StateKind) -> Self {
        Self {
            entity: Entity::new(name),
            kind,
            status: Status::Inactive,
            level: 0,
            container: None,
            regions: Vec::new(),
            config: StateConfig::default(),
            entry: None,
            exit: None,
            do_activity: None,
            timer: TimerState::default(),
            frame: None,
            decision: None,
            choices: HashMap::new(),
        }
    }

    pub(crate) fn from_def(name: String, def: StateDef) -> Self {
        Self {
            entity: Entity::with_data(name, def.data),
            config: def.config,
            entry: def.entry,
            exit: def.exit,
            do_activity: def.do_activity,
            ..Self::synthesized(String::new(), StateKind::Normal)
        }
    }

    pub(crate) fn choice(name: String, decision: Decision) -> Self {
        Self {
            decision: Some(decision),
            ..Self::synthesized(name, StateKind::Choice)
        }
    }
}

/// One unit of an entry or exit plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    State(StateId),
    Region(RegionId),
}

impl Machine {
    /// Enter `target` and everything its activation implies.
    ///
    /// With `explicit` set, every inactive ancestor of `target` is entered
    /// first, outermost first, and sibling regions along that chain resume
    /// through their history or initial pseudostate.
    pub(crate) fn enter_state(&mut self, target: StateId, explicit: bool) -> Result<()> {
        let mut plan = Vec::new();
        if explicit {
            self.plan_explicit_entry(target, &mut plan);
        } else {
            self.plan_default_entry(target, &mut plan);
        }

        for step in plan {
            match step {
                Step::State(state) => {
                    let detached = self.states[state.index()]
                        .container
                        .is_some_and(|region| !self.regions[region.index()].status.is_active());
                    if detached {
                        self.report(
                            Level::Info,
                            format!("skipping entry of '{}': region left", self.label(state)),
                        );
                        continue;
                    }
                    self.activate_state(state)?;
                }
                Step::Region(region) => {
                    let owner = self.regions[region.index()].super_state;
                    if !self.states[owner.index()].status.is_active() {
                        self.report(
                            Level::Info,
                            format!(
                                "skipping activation of '{}': owner left",
                                self.regions[region.index()].name()
                            ),
                        );
                        continue;
                    }
                    self.activate_region(region);
                }
            }
        }
        Ok(())
    }

    /// Plan: the state, all of its inactive regions, then each region's
    /// entry marker. Regions come before markers so that a region completing
    /// straight away cannot satisfy the join while a sibling is still pending.
    fn plan_default_entry(&self, state: StateId, plan: &mut Vec<Step>) {
        plan.push(Step::State(state));
        let pending = self.inactive_regions(state);
        plan.extend(pending.iter().map(|&region| Step::Region(region)));
        plan.extend(
            pending
                .iter()
                .map(|&region| Step::State(self.regions[region.index()].entry_marker())),
        );
    }

    fn plan_explicit_entry(&self, target: StateId, plan: &mut Vec<Step>) {
        let mut chain = vec![target];
        let mut current = target;
        while let Some(region) = self.states[current.index()].container {
            let owner = self.regions[region.index()].super_state;
            if self.states[owner.index()].status.is_active() {
                break;
            }
            chain.push(owner);
            current = owner;
        }
        chain.reverse();

        if let Some(region) = self.states[chain[0].index()].container {
            if !self.regions[region.index()].status.is_active() {
                plan.push(Step::Region(region));
            }
        }
        self.plan_chain(&chain, plan);
    }

    /// Plan the entry of an ancestor chain, outermost first. The region
    /// leading to the next link recurses; its siblings enter their marker.
    fn plan_chain(&self, chain: &[StateId], plan: &mut Vec<Step>) {
        let Some((&state, rest)) = chain.split_first() else {
            return;
        };
        let Some(&next) = rest.first() else {
            self.plan_default_entry(state, plan);
            return;
        };

        let via = self.states[next.index()].container;
        plan.push(Step::State(state));
        let pending = self.inactive_regions(state);
        plan.extend(pending.iter().map(|&region| Step::Region(region)));
        for region in pending {
            if Some(region) == via {
                self.plan_chain(rest, plan);
            } else {
                plan.push(Step::State(self.regions[region.index()].entry_marker()));
            }
        }
    }

    fn inactive_regions(&self, state: StateId) -> Vec<RegionId> {
        self.states[state.index()]
            .regions
            .iter()
            .copied()
            .filter(|region| !self.regions[region.index()].status.is_active())
            .collect()
    }

    /// Exit `state` and its active descendants, innermost first.
    pub(crate) fn exit_state(&mut self, state: StateId) -> Result<()> {
        let mut plan = Vec::new();
        self.plan_exit(state, &mut plan);
        for step in plan.into_iter().rev() {
            match step {
                Step::State(state) => self.deactivate_state(state)?,
                Step::Region(region) => {
                    self.deactivate_region(region);
                }
            }
        }
        Ok(())
    }

    fn plan_exit(&self, state: StateId, plan: &mut Vec<Step>) {
        plan.push(Step::State(state));
        for &region in &self.states[state.index()].regions {
            if !self.regions[region.index()].status.is_active() {
                continue;
            }
            plan.push(Step::Region(region));
            if let Some(child) = self.active_child(region) {
                self.plan_exit(child, plan);
            }
        }
    }

    /// Mark `state` active and run its kind-specific activation.
    pub(crate) fn activate_state(&mut self, state: StateId) -> Result<()> {
        let node = &mut self.states[state.index()];
        if node.status.is_active() {
            let error = UsageError::StateAlreadyActive {
                state: node.entity.name().to_owned(),
            };
            self.report_usage(&error);
            return Ok(());
        }
        node.status = Status::Active;
        let kind = node.kind;
        self.report(Level::Info, format!("entered '{}'", self.label(state)));

        match kind {
            StateKind::Normal => self.run_entry(state),
            StateKind::Initial => self.follow_initial(state),
            StateKind::History(_) => self.resume_history(state),
            StateKind::Choice => self.follow_choice(state),
            StateKind::Final => self.reach_final(state),
            StateKind::Root => Ok(()),
        }
    }

    /// Mark `state` inactive. Normal states stop their timer, become their
    /// region's last active child and run their exit behavior.
    pub(crate) fn deactivate_state(&mut self, state: StateId) -> Result<()> {
        let node = &mut self.states[state.index()];
        if !node.status.is_active() {
            let error = UsageError::StateAlreadyInactive {
                state: node.entity.name().to_owned(),
            };
            self.report_usage(&error);
            return Ok(());
        }
        node.status = Status::Inactive;
        let (kind, container) = (node.kind, node.container);
        self.report(Level::Info, format!("left '{}'", self.label(state)));

        if kind == StateKind::Normal {
            self.stop_timer(state);
            if let Some(region) = container {
                self.regions[region.index()].last_active = Some(state);
            }
            if let Some(exit) = self.states[state.index()].exit.clone() {
                exit.run(&mut Context::new(self, Some(state)))?;
            }
        }
        Ok(())
    }

    /// Entry behavior, then either the periodic timer or the one-shot
    /// do-activity, then completion for auto-transition states. Stops early
    /// whenever a callback has already moved the machine out of `state`.
    fn run_entry(&mut self, state: StateId) -> Result<()> {
        let node = &self.states[state.index()];
        let (entry, activity, config) = (node.entry.clone(), node.do_activity.clone(), node.config);

        if let Some(entry) = entry {
            entry.run(&mut Context::new(self, Some(state)))?;
            if !self.is_state_active(state) {
                return Ok(());
            }
        }

        if config.timer {
            self.start_timer(state);
            return Ok(());
        }

        if let Some(activity) = activity {
            activity.run(&mut Context::new(self, Some(state)))?;
            if !self.is_state_active(state) {
                return Ok(());
            }
        }

        if config.auto_transition {
            self.complete_state(state)?;
        }
        Ok(())
    }

    /// Fire the region's first sourceless transition.
    fn follow_initial(&mut self, state: StateId) -> Result<()> {
        let Some(region) = self.states[state.index()].container else {
            return Ok(());
        };
        let initial = self.regions[region.index()]
            .transitions
            .iter()
            .copied()
            .find(|t| self.transitions[t.index()].source.is_none());

        let Some(transition) = initial else {
            return Err(self.fail(ConfigurationError::MissingInitialTransition {
                region: self.regions[region.index()].name().to_owned(),
            }));
        };

        match self.trigger(transition, &Value::Null)? {
            TriggerOutcome::Fired => Ok(()),
            _ => Err(self.fail(ConfigurationError::InitialTransitionRejected {
                transition: self.transitions[transition.index()].entity.name().to_owned(),
            })),
        }
    }

    /// Resolve a history pseudostate: resume the region's last active child,
    /// or fall back to the initial pseudostate when there is none.
    fn resume_history(&mut self, state: StateId) -> Result<()> {
        let Some(region) = self.states[state.index()].container else {
            return Ok(());
        };
        self.deactivate_state(state)?;

        match self.regions[region.index()].last_active {
            Some(last) => {
                self.report(
                    Level::Info,
                    format!("history resumes '{}'", self.label(last)),
                );
                self.enter_state(last, false)
            }
            None => {
                let initial = self.regions[region.index()].initial;
                self.activate_state(initial)
            }
        }
    }

    /// Ask the decision for a target and fire the cached or freshly
    /// synthesized transition leading there.
    fn follow_choice(&mut self, state: StateId) -> Result<()> {
        let name = self.label(state).to_owned();
        let Some(decision) = self.states[state.index()].decision.clone() else {
            return Err(self.fail(ConfigurationError::ChoiceUndecided { state: name }));
        };
        let Some(target) = decision.decide(&Context::new(self, Some(state))) else {
            return Err(self.fail(ConfigurationError::ChoiceUndecided { state: name }));
        };
        let Some(region) = self.states[state.index()].container else {
            return Ok(());
        };

        let cached = self.states[state.index()].choices.get(&target).copied();
        let transition = match cached {
            Some(cached) => cached,
            None => {
                if self.resolve_state(region, &target).is_none() {
                    return Err(self.fail(ConfigurationError::ChoiceTargetUnreachable {
                        state: name,
                        target,
                    }));
                }
                let synthesized = Transition::synthesized(
                    self.names.generate(),
                    name,
                    target.clone(),
                    region,
                );
                let id = self.push_transition(synthesized);
                self.states[state.index()].choices.insert(target, id);
                id
            }
        };

        self.trigger(transition, &Value::Null).map(|_| ())
    }

    fn reach_final(&mut self, state: StateId) -> Result<()> {
        self.deactivate_state(state)?;
        match self.states[state.index()].container {
            Some(region) => self.complete_region(region),
            None => Ok(()),
        }
    }

    /// A state has finished its work: take its first outgoing transition,
    /// or leave it and let its region complete when it has none. A root
    /// reaching completion stops the machine.
    pub(crate) fn complete_state(&mut self, state: StateId) -> Result<()> {
        let node = &self.states[state.index()];
        let Some(region) = node.container else {
            if node.kind == StateKind::Root {
                self.report(Level::Info, "machine completed");
                return self.exit_state(state);
            }
            return Ok(());
        };

        let name = node.entity.name();
        let outgoing = self.regions[region.index()]
            .transitions
            .iter()
            .copied()
            .find(|t| self.transitions[t.index()].source.as_deref() == Some(name));

        match outgoing {
            Some(transition) => self.trigger(transition, &Value::Null).map(|_| ()),
            None => {
                self.exit_state(state)?;
                self.complete_region(region)
            }
        }
    }

    /// Signal that an active state finished its work.
    ///
    /// Equivalent to what an auto-transition state does after its
    /// do-activity: the first transition leaving the state fires, or the
    /// state is left and its region completes.
    pub fn completion(&mut self, state: StateId) -> Result<()> {
        let node = self.check_state(state).map_err(|e| self.fail(e))?;
        if !node.status.is_active() {
            let error = UsageError::StateAlreadyInactive {
                state: node.entity.name().to_owned(),
            };
            self.report_usage(&error);
            return Err(error.into());
        }
        self.complete_state(state)
    }

    /// Regions' last active child, as recorded when it was exited.
    pub fn last_active(&self, region: RegionId) -> Option<StateId> {
        self.regions.get(region.index())?.last_active
    }
}
