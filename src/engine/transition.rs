//! Transitions and the trigger algorithm.

use crate::core::{Entity, RegionId, StateId, TransitionId, TransitionRecord};
use crate::engine::callbacks::{Effect, Guard};
use crate::engine::context::Context;
use crate::engine::diagnostics::Level;
use crate::engine::error::{ConfigurationError, Result};
use crate::engine::machine::Machine;
use chrono::Utc;
use serde_json::Value;

/// Definition of a transition, produced by [`TransitionBuilder`](crate::builder::TransitionBuilder).
///
/// A missing source means the region's initial pseudostate; a missing
/// target means the region's final state.
#[derive(Clone, Debug, Default)]
pub struct TransitionDef {
    pub(crate) name: Option<String>,
    pub(crate) source: Option<String>,
    pub(crate) target: Option<String>,
    pub(crate) guard: Option<Guard>,
    pub(crate) effect: Option<Effect>,
    pub(crate) internal: bool,
}

impl TransitionDef {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }
}

#[derive(Debug)]
pub(crate) struct Transition {
    pub(crate) entity: Entity,
    pub(crate) source: Option<String>,
    pub(crate) target: Option<String>,
    pub(crate) guard: Option<Guard>,
    pub(crate) effect: Option<Effect>,
    pub(crate) internal: bool,
    pub(crate) container: Option<RegionId>,
}

impl Transition {
    pub(crate) fn from_def(name: String, def: TransitionDef) -> Self {
        Self {
            entity: Entity::new(name),
            source: def.source,
            target: def.target,
            guard: def.guard,
            effect: def.effect,
            internal: def.internal,
            container: None,
        }
    }

    /// Transition created on the fly for a choice decision. It belongs to
    /// `region` but is not listed there, so lookups by name never see it.
    pub(crate) fn synthesized(
        name: String,
        source: String,
        target: String,
        region: RegionId,
    ) -> Self {
        Self {
            entity: Entity::new(name),
            source: Some(source),
            target: Some(target),
            guard: None,
            effect: None,
            internal: false,
            container: Some(region),
        }
    }
}

/// What a call to [`Machine::trigger`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerOutcome {
    /// Source exited, effect ran, target entered.
    Fired,
    /// Only the effect ran; the configuration is unchanged.
    Internal,
    /// The guard said no. Nothing else happened.
    GuardRejected,
    /// The source was not active, so the trigger was ignored.
    SourceInactive,
}

impl TriggerOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, Self::Fired | Self::Internal)
    }
}

/// Endpoints of a transition, resolved against its region.
#[derive(Clone, Copy, Debug)]
struct Endpoints {
    source: StateId,
    target: StateId,
}

impl Machine {
    /// Fire `transition` with `memo` handed to its guard and effect.
    ///
    /// Structural problems are checked before anything runs, so a
    /// configuration error leaves the machine untouched. An inactive source
    /// or a rejecting guard is reported and yields the matching
    /// [`TriggerOutcome`] without side effects. Otherwise the source is
    /// exited, the effect runs, and the target is entered, explicitly when
    /// it is nested deeper than the source.
    pub fn trigger(&mut self, transition: TransitionId, memo: &Value) -> Result<TriggerOutcome> {
        let ends = self.resolve_endpoints(transition).map_err(|e| self.fail(e))?;

        let node = &self.transitions[transition.index()];
        let name = node.entity.name().to_owned();
        let (guard, effect, internal) = (node.guard.clone(), node.effect.clone(), node.internal);
        let source_name = self.label(ends.source).to_owned();

        if !self.is_state_active(ends.source) {
            self.report(
                Level::Warn,
                format!("transition '{name}' ignored: '{source_name}' is not active"),
            );
            return Ok(TriggerOutcome::SourceInactive);
        }

        if let Some(guard) = guard {
            if !guard.check(&Context::new(self, Some(ends.source)), memo) {
                self.report(
                    Level::Info,
                    format!("transition '{name}' rejected by its guard"),
                );
                return Ok(TriggerOutcome::GuardRejected);
            }
        }

        if internal {
            self.report(Level::Info, format!("internal transition '{name}'"));
            if let Some(effect) = effect {
                effect.run(&mut Context::new(self, Some(ends.source)), memo)?;
            }
            self.record(name, source_name.clone(), source_name, true);
            return Ok(TriggerOutcome::Internal);
        }

        let target_name = self.label(ends.target).to_owned();
        self.report(
            Level::Info,
            format!("transition '{name}': '{source_name}' -> '{target_name}'"),
        );
        self.exit_state(ends.source)?;
        if let Some(effect) = effect {
            effect.run(&mut Context::new(self, Some(ends.source)), memo)?;
        }
        self.record(name, source_name, target_name, false);

        let explicit = self.states[ends.source.index()].level < self.states[ends.target.index()].level;
        self.enter_state(ends.target, explicit)?;
        Ok(TriggerOutcome::Fired)
    }

    /// Fire the transition registered under `name`.
    pub fn trigger_named(&mut self, name: &str, memo: &Value) -> Result<TriggerOutcome> {
        let transition = self.find_transition(name).ok_or_else(|| {
            self.fail(ConfigurationError::UnknownTransitionName {
                name: name.to_owned(),
            })
        })?;
        self.trigger(transition, memo)
    }

    fn resolve_endpoints(&self, transition: TransitionId) -> Result<Endpoints, ConfigurationError> {
        let node = self
            .transitions
            .get(transition.index())
            .ok_or(ConfigurationError::UnknownTransition(transition))?;
        let name = node.entity.name();

        let region_id = node
            .container
            .ok_or_else(|| ConfigurationError::UnregisteredTransition {
                transition: name.to_owned(),
            })?;
        let region = &self.regions[region_id.index()];
        if !region.status.is_active() {
            return Err(ConfigurationError::InactiveContainer {
                transition: name.to_owned(),
                region: region.name().to_owned(),
            });
        }

        let source = match &node.source {
            None => region.initial,
            Some(source) => region.by_name.get(source).copied().ok_or_else(|| {
                ConfigurationError::UnknownSource {
                    transition: name.to_owned(),
                    state: source.clone(),
                    region: region.name().to_owned(),
                }
            })?,
        };
        let target = match &node.target {
            None => region.final_state,
            Some(target) => self.resolve_state(region_id, target).ok_or_else(|| {
                ConfigurationError::UnknownTarget {
                    transition: name.to_owned(),
                    state: target.clone(),
                    region: region.name().to_owned(),
                }
            })?,
        };

        if self.states[source.index()].kind.is_final() {
            return Err(ConfigurationError::FinalSource {
                transition: name.to_owned(),
            });
        }
        if self.states[target.index()].kind.is_initial() {
            return Err(ConfigurationError::InitialTarget {
                transition: name.to_owned(),
            });
        }
        Ok(Endpoints { source, target })
    }

    fn record(&mut self, transition: String, source: String, target: String, internal: bool) {
        self.log.push(TransitionRecord {
            transition,
            source,
            target,
            internal,
            timestamp: Utc::now(),
        });
    }
}
