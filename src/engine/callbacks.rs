//! Callable wrappers for guards, effects, state behavior and choice decisions.
//!
//! Each wrapper holds an `Arc` so the engine can clone it out of the graph
//! before invoking it. That leaves the callback free to borrow the machine
//! mutably through its [`Context`] and trigger further transitions.

use crate::engine::context::Context;
use crate::engine::error::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&Context<'_>, &Value) -> bool + Send + Sync;
type Procedure = dyn Fn(&mut Context<'_>, &Value) -> Result<()> + Send + Sync;
type Behavior = dyn Fn(&mut Context<'_>) -> Result<()> + Send + Sync;
type Chooser = dyn Fn(&Context<'_>) -> Option<String> + Send + Sync;

/// Predicate deciding whether a triggered transition may fire.
///
/// Receives read-only access to the machine and the value passed to
/// `trigger`.
///
/// # Example
///
/// ```rust
/// use statechart::engine::Guard;
/// use serde_json::Value;
///
/// let only_when_armed = Guard::new(|ctx, _memo: &Value| {
///     ctx.get("armed").and_then(Value::as_bool).unwrap_or(false)
/// });
/// # let _ = only_when_armed;
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<Predicate>,
}

impl Guard {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Context<'_>, &Value) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, ctx: &Context<'_>, memo: &Value) -> bool {
        (self.predicate)(ctx, memo)
    }
}

/// Procedure run while a transition fires, between exit and entry.
#[derive(Clone)]
pub struct Effect {
    procedure: Arc<Procedure>,
}

impl Effect {
    pub fn new<F>(procedure: F) -> Self
    where
        F: Fn(&mut Context<'_>, &Value) -> Result<()> + Send + Sync + 'static,
    {
        Effect {
            procedure: Arc::new(procedure),
        }
    }

    pub fn run(&self, ctx: &mut Context<'_>, memo: &Value) -> Result<()> {
        (self.procedure)(ctx, memo)
    }
}

/// Entry, exit or do-activity behavior of a normal state.
#[derive(Clone)]
pub struct Action {
    behavior: Arc<Behavior>,
}

impl Action {
    pub fn new<F>(behavior: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Action {
            behavior: Arc::new(behavior),
        }
    }

    pub fn run(&self, ctx: &mut Context<'_>) -> Result<()> {
        (self.behavior)(ctx)
    }
}

/// Decision function of a choice pseudostate.
///
/// Returns the name of the state to continue to. `None` means no decision
/// could be made, which is a configuration error at activation time.
#[derive(Clone)]
pub struct Decision {
    chooser: Arc<Chooser>,
}

impl Decision {
    pub fn new<F>(chooser: F) -> Self
    where
        F: Fn(&Context<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Decision {
            chooser: Arc::new(chooser),
        }
    }

    pub fn decide(&self, ctx: &Context<'_>) -> Option<String> {
        (self.chooser)(ctx)
    }
}

macro_rules! opaque_debug {
    ($($name:ident),*) => {
        $(
            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(concat!(stringify!($name), "(..)"))
                }
            }
        )*
    };
}

opaque_debug!(Guard, Effect, Action, Decision);
