//! Regions: containment, name resolution and the completion join.

use crate::core::{Entity, HistoryDepth, RegionId, StateId, StateKind, Status, TransitionId};
use crate::engine::diagnostics::Level;
use crate::engine::error::{ConfigurationError, Result, UsageError};
use crate::engine::machine::{region_entity, Machine};
use crate::engine::state::StateNode;
use std::collections::HashMap;

/// A concurrent container of states and the transitions between them.
///
/// Every region owns a synthesized initial pseudostate and final state, and
/// at most one history pseudostate. At most one child is active while the
/// region is.
#[derive(Debug)]
pub(crate) struct Region {
    pub(crate) entity: Entity,
    pub(crate) super_state: StateId,
    pub(crate) status: Status,
    pub(crate) states: Vec<StateId>,
    pub(crate) by_name: HashMap<String, StateId>,
    pub(crate) transitions: Vec<TransitionId>,
    pub(crate) transitions_by_name: HashMap<String, TransitionId>,
    pub(crate) initial: StateId,
    pub(crate) final_state: StateId,
    pub(crate) history: Option<StateId>,
    pub(crate) last_active: Option<StateId>,
}

impl Region {
    pub(crate) fn name(&self) -> &str {
        self.entity.name()
    }

    /// Where default entry of this region begins.
    pub(crate) fn entry_marker(&self) -> StateId {
        self.history.unwrap_or(self.initial)
    }
}

impl Machine {
    /// Append a fresh region, with its initial and final members, to `owner`.
    pub(crate) fn push_region(&mut self, owner: StateId) -> RegionId {
        let entity = region_entity(self.label(owner), self.states[owner.index()].regions.len());
        let base = entity.name().to_owned();
        let initial = self.push_state(StateNode::synthesized(
            format!("{base}-initial-pseudo"),
            StateKind::Initial,
        ));
        let final_state =
            self.push_state(StateNode::synthesized(format!("{base}-final"), StateKind::Final));

        let id = RegionId(self.regions.len());
        self.regions.push(Region {
            entity,
            super_state: owner,
            status: Status::Inactive,
            states: Vec::new(),
            by_name: HashMap::new(),
            transitions: Vec::new(),
            transitions_by_name: HashMap::new(),
            initial,
            final_state,
            history: None,
            last_active: None,
        });
        self.states[owner.index()].regions.push(id);
        self.attach(id, initial);
        self.attach(id, final_state);
        id
    }

    fn attach(&mut self, region: RegionId, state: StateId) {
        let name = self.label(state).to_owned();
        let members = &mut self.regions[region.index()];
        members.states.push(state);
        members.by_name.insert(name, state);
        self.states[state.index()].container = Some(region);
        self.refresh_levels(state);
    }

    /// Recompute the level of `state` and everything below it.
    fn refresh_levels(&mut self, state: StateId) {
        let mut pending = vec![state];
        while let Some(current) = pending.pop() {
            let level = match self.states[current.index()].container {
                Some(region) => {
                    let owner = self.regions[region.index()].super_state;
                    self.states[owner.index()].level + 1
                }
                None => 0,
            };
            self.states[current.index()].level = level;
            for &region in &self.states[current.index()].regions {
                pending.extend(self.regions[region.index()].states.iter().copied());
            }
        }
    }

    /// Whether `state` is the owner of `region` or one of its ancestors.
    fn encloses(&self, state: StateId, region: RegionId) -> bool {
        let mut current = self.regions[region.index()].super_state;
        loop {
            if current == state {
                return true;
            }
            match self.states[current.index()].container {
                Some(container) => current = self.regions[container.index()].super_state,
                None => return false,
            }
        }
    }

    /// Only normal states and the root may own regions.
    fn check_composite(&self, state: StateId) -> Result<&StateNode, ConfigurationError> {
        let node = self.check_state(state)?;
        match node.kind {
            StateKind::Normal | StateKind::Root => Ok(node),
            kind => Err(ConfigurationError::NotComposite {
                state: node.entity.name().to_owned(),
                kind,
            }),
        }
    }

    /// First region of `state`, created on demand.
    pub(crate) fn first_region(&mut self, state: StateId) -> Result<RegionId, ConfigurationError> {
        if let Some(&region) = self.check_composite(state)?.regions.first() {
            return Ok(region);
        }
        Ok(self.push_region(state))
    }

    /// Give `state` one more orthogonal region.
    pub fn append_region(&mut self, state: StateId) -> Result<RegionId, ConfigurationError> {
        self.check_composite(state)?;
        Ok(self.push_region(state))
    }

    /// Add a detached state to `region`.
    pub fn region_add_state(
        &mut self,
        region: RegionId,
        state: StateId,
    ) -> Result<StateId, ConfigurationError> {
        let target = self.check_region(region)?;
        let region_name = target.name().to_owned();
        let node = self.check_state(state)?;
        let name = node.entity.name().to_owned();

        if node.kind == StateKind::Root {
            return Err(ConfigurationError::RootNotInsertable { state: name });
        }
        if let Some(existing) = node.container {
            return Err(ConfigurationError::AlreadyContained {
                state: name,
                region: self.regions[existing.index()].name().to_owned(),
            });
        }
        if self.encloses(state, region) {
            return Err(ConfigurationError::ContainmentCycle {
                state: name,
                region: region_name,
            });
        }
        if self.regions[region.index()].by_name.contains_key(&name) {
            return Err(ConfigurationError::DuplicateName {
                region: region_name,
                name,
            });
        }

        self.attach(region, state);
        Ok(state)
    }

    /// Register a transition with `region`, making it triggerable.
    pub fn region_add_transition(
        &mut self,
        region: RegionId,
        transition: TransitionId,
    ) -> Result<TransitionId, ConfigurationError> {
        let region_name = self.check_region(region)?.name().to_owned();
        let node = self
            .transitions
            .get(transition.index())
            .ok_or(ConfigurationError::UnknownTransition(transition))?;
        let name = node.entity.name().to_owned();

        if let Some(existing) = node.container {
            return Err(ConfigurationError::AlreadyRegistered {
                transition: name,
                region: self.regions[existing.index()].name().to_owned(),
            });
        }
        if self.regions[region.index()]
            .transitions_by_name
            .contains_key(&name)
        {
            return Err(ConfigurationError::DuplicateName {
                region: region_name,
                name,
            });
        }

        self.transitions[transition.index()].container = Some(region);
        let members = &mut self.regions[region.index()];
        members.transitions.push(transition);
        members.transitions_by_name.insert(name, transition);
        Ok(transition)
    }

    /// Install a history pseudostate in `region`.
    ///
    /// Installing twice keeps the existing pseudostate and updates its depth.
    /// Deep history additionally installs deep history in every region of
    /// every state currently in `region`, recursively.
    pub fn region_add_history_state(
        &mut self,
        region: RegionId,
        deep: bool,
    ) -> Result<StateId, ConfigurationError> {
        let base = self.check_region(region)?.name().to_owned();
        let depth = if deep {
            HistoryDepth::Deep
        } else {
            HistoryDepth::Shallow
        };

        let existing = self.regions[region.index()].history;
        let history = match existing {
            Some(existing) => {
                self.states[existing.index()].kind = StateKind::History(depth);
                existing
            }
            None => {
                let name = format!("{base}-history-pseudo");
                if self.regions[region.index()].by_name.contains_key(&name) {
                    return Err(ConfigurationError::DuplicateName { region: base, name });
                }
                let node = StateNode::synthesized(name, StateKind::History(depth));
                let id = self.push_state(node);
                self.attach(region, id);
                self.regions[region.index()].history = Some(id);
                id
            }
        };

        if deep {
            let nested: Vec<RegionId> = self.regions[region.index()]
                .states
                .iter()
                .filter(|s| self.states[s.index()].kind == StateKind::Normal)
                .flat_map(|s| self.states[s.index()].regions.iter().copied())
                .collect();
            for inner in nested {
                self.region_add_history_state(inner, true)?;
            }
        }
        Ok(history)
    }

    pub(crate) fn active_child(&self, region: RegionId) -> Option<StateId> {
        self.regions[region.index()]
            .states
            .iter()
            .copied()
            .find(|state| self.states[state.index()].status.is_active())
    }

    /// Resolve a state name as seen from `region`: its own children first,
    /// then a pre-order search through each child's regions.
    pub(crate) fn resolve_state(&self, region: RegionId, name: &str) -> Option<StateId> {
        let members = &self.regions[region.index()];
        if let Some(&state) = members.by_name.get(name) {
            return Some(state);
        }
        members
            .states
            .iter()
            .flat_map(|state| self.states[state.index()].regions.iter())
            .find_map(|&nested| self.resolve_state(nested, name))
    }

    /// Resolve a transition name with the same order as [`resolve_state`](Self::resolve_state).
    pub(crate) fn lookup_transition(&self, region: RegionId, name: &str) -> Option<TransitionId> {
        let members = &self.regions[region.index()];
        if let Some(&transition) = members.transitions_by_name.get(name) {
            return Some(transition);
        }
        members
            .states
            .iter()
            .flat_map(|state| self.states[state.index()].regions.iter())
            .find_map(|&nested| self.lookup_transition(nested, name))
    }

    pub(crate) fn activate_region(&mut self, region: RegionId) {
        let members = &mut self.regions[region.index()];
        if members.status.is_active() {
            let error = UsageError::RegionAlreadyActive {
                region: members.name().to_owned(),
            };
            self.report_usage(&error);
            return;
        }
        members.status = Status::Active;
        self.report(
            Level::Info,
            format!("region '{}' activated", self.regions[region.index()].name()),
        );
    }

    /// Returns whether the region was active.
    pub(crate) fn deactivate_region(&mut self, region: RegionId) -> bool {
        let members = &mut self.regions[region.index()];
        if !members.status.is_active() {
            let error = UsageError::RegionAlreadyInactive {
                region: members.name().to_owned(),
            };
            self.report_usage(&error);
            return false;
        }
        members.status = Status::Inactive;
        self.report(
            Level::Info,
            format!("region '{}' deactivated", self.regions[region.index()].name()),
        );
        true
    }

    /// A region reached its final state. Once every sibling region of the
    /// owner has done the same, the owner itself completes.
    pub(crate) fn complete_region(&mut self, region: RegionId) -> Result<()> {
        if !self.deactivate_region(region) {
            return Ok(());
        }
        let owner = self.regions[region.index()].super_state;
        let joined = self.states[owner.index()]
            .regions
            .iter()
            .all(|r| !self.regions[r.index()].status.is_active());
        if joined {
            self.report(
                Level::Info,
                format!("all regions of '{}' completed", self.label(owner)),
            );
            self.complete_state(owner)
        } else {
            Ok(())
        }
    }

    pub fn is_region_active(&self, region: RegionId) -> bool {
        self.regions
            .get(region.index())
            .is_some_and(|r| r.status.is_active())
    }

    pub fn region_name(&self, region: RegionId) -> Option<&str> {
        self.regions.get(region.index()).map(Region::name)
    }

    /// Children of `region` in insertion order, synthesized members included.
    pub fn region_states(&self, region: RegionId) -> &[StateId] {
        self.regions
            .get(region.index())
            .map(|r| r.states.as_slice())
            .unwrap_or_default()
    }

    pub fn region_owner(&self, region: RegionId) -> Option<StateId> {
        self.regions.get(region.index()).map(|r| r.super_state)
    }

    pub fn history_of(&self, region: RegionId) -> Option<StateId> {
        self.regions.get(region.index())?.history
    }
}
