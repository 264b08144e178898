//! State kinds and activation status.
//!
//! A state's kind is a single tagged value, so combinations such as a node
//! that is both final and a choice cannot be represented.

use serde::{Deserialize, Serialize};

/// How much of a region's configuration a history pseudostate restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryDepth {
    /// Resume the last active direct child only.
    Shallow,
    /// Resume the full nested chain below the last active child.
    Deep,
}

/// What a state node is and therefore how it behaves when activated.
///
/// # Example
///
/// ```rust
/// use statechart::core::{HistoryDepth, StateKind};
///
/// assert!(StateKind::Initial.is_pseudo());
/// assert!(StateKind::History(HistoryDepth::Deep).is_pseudo());
/// assert!(!StateKind::Final.is_pseudo());
/// assert!(StateKind::Normal.runs_user_code());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// A regular state with entry, exit and do-activity behavior.
    Normal,
    /// The synthesized initial pseudostate of a region.
    Initial,
    /// The synthesized final state of a region.
    Final,
    /// A history pseudostate.
    History(HistoryDepth),
    /// A choice pseudostate resolved by a decision function.
    Choice,
    /// The root node owned by a machine.
    Root,
}

impl StateKind {
    /// Transient nodes that resolve to a concrete state before control returns.
    pub fn is_pseudo(&self) -> bool {
        matches!(self, Self::Initial | Self::History(_) | Self::Choice)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final)
    }

    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }

    /// Only normal states ever run entry, exit or do-activity callbacks.
    pub fn runs_user_code(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Activation status shared by states and regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    #[default]
    Inactive,
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}
