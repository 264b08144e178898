//! Builder for transition definitions.

use crate::builder::error::{collect, require, BuildError, Violation};
use crate::engine::{Context, Effect, Guard, Result, TransitionDef};
use serde_json::Value;

/// Builder for transitions with a fluent API.
///
/// Leaving out `from` makes the transition start at the region's initial
/// pseudostate; leaving out `to` makes it end at the region's final state.
///
/// # Example
///
/// ```rust
/// use statechart::builder::TransitionBuilder;
/// use serde_json::Value;
///
/// let def = TransitionBuilder::named("coin")
///     .from("Locked")
///     .to("Unlocked")
///     .when(|_, memo: &Value| memo.as_u64().unwrap_or(0) >= 25)
///     .build()
///     .unwrap();
///
/// assert_eq!(def.source(), Some("Locked"));
/// assert_eq!(def.target(), Some("Unlocked"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitionBuilder {
    name: Option<String>,
    source: Option<String>,
    target: Option<String>,
    guard: Option<Guard>,
    effect: Option<Effect>,
    internal: bool,
}

impl TransitionBuilder {
    /// A transition named by the machine's name generator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A sourceless transition: the one a region's initial pseudostate takes.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Set the source state by name.
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.source = Some(state.into());
        self
    }

    /// Set the target state by name.
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.target = Some(state.into());
        self
    }

    /// Add a prebuilt guard.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Context<'_>, &Value) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    pub fn effect<F>(mut self, procedure: F) -> Self
    where
        F: Fn(&mut Context<'_>, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.effect = Some(Effect::new(procedure));
        self
    }

    /// Run only the effect when fired; the source is neither exited nor re-entered.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Validate and produce the definition.
    pub fn build(self) -> std::result::Result<TransitionDef, BuildError> {
        let non_empty = |name: &Option<String>| name.as_deref().map_or(true, |n| !n.is_empty());
        collect(vec![
            require(non_empty(&self.name), Violation::EmptyName),
            require(
                non_empty(&self.source),
                Violation::EmptyStateName { role: "source" },
            ),
            require(
                non_empty(&self.target),
                Violation::EmptyStateName { role: "target" },
            ),
            require(
                !self.internal || self.source.is_some(),
                Violation::InternalWithoutSource,
            ),
        ])
        .map_err(BuildError::InvalidTransition)?;

        Ok(TransitionDef {
            name: self.name,
            source: self.source,
            target: self.target,
            guard: self.guard,
            effect: self.effect,
            internal: self.internal,
        })
    }
}
