//! Builder for state definitions.

use crate::builder::error::{collect, require, BuildError, Violation};
use crate::core::StateConfig;
use crate::engine::{Action, Context, Result, StateDef};
use serde_json::{Map, Value};
use std::time::Duration;

/// Builder for normal states with a fluent API.
///
/// # Example
///
/// ```rust
/// use statechart::builder::StateBuilder;
/// use std::time::Duration;
///
/// let def = StateBuilder::new("Blinking")
///     .timer(Duration::from_millis(500))
///     .do_activity(|ctx| {
///         let on = ctx.get("lamp").and_then(|v| v.as_bool()).unwrap_or(false);
///         ctx.set("lamp", !on);
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(def.name(), Some("Blinking"));
/// assert!(def.config().timer);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StateBuilder {
    name: Option<String>,
    config: StateConfig,
    entry: Option<Action>,
    exit: Option<Action>,
    do_activity: Option<Action>,
    data: Map<String, Value>,
}

impl StateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A state named by the machine's name generator.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replace the whole configuration at once, e.g. one loaded from JSON.
    pub fn config(mut self, config: StateConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the do-activity periodically, every `interval`, while active.
    pub fn timer(mut self, interval: Duration) -> Self {
        self.config.timer = true;
        self.config.interval = interval;
        self
    }

    /// Signal completion right after the do-activity returns.
    pub fn auto_transition(mut self) -> Self {
        self.config.auto_transition = true;
        self
    }

    pub fn entry<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.entry = Some(Action::new(behavior));
        self
    }

    pub fn exit<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.exit = Some(Action::new(behavior));
        self
    }

    pub fn do_activity<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.do_activity = Some(Action::new(behavior));
        self
    }

    /// Seed the state's own data bag.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Validate and produce the definition.
    pub fn build(self) -> std::result::Result<StateDef, BuildError> {
        collect(vec![
            require(
                self.name.as_deref().map_or(true, |n| !n.is_empty()),
                Violation::EmptyName,
            ),
            require(
                !(self.config.timer && self.config.auto_transition),
                Violation::TimerWithAutoTransition,
            ),
            require(
                !self.config.timer || !self.config.interval.is_zero(),
                Violation::ZeroInterval,
            ),
        ])
        .map_err(BuildError::InvalidState)?;

        Ok(StateDef {
            name: self.name,
            config: self.config,
            entry: self.entry,
            exit: self.exit,
            do_activity: self.do_activity,
            data: self.data,
        })
    }
}
