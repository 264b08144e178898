//! Record of fired transitions.
//!
//! Provides immutable tracking of the transitions a machine has executed,
//! following the same append-only discipline as the rest of the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single fired transition.
///
/// # Example
///
/// ```rust
/// use statechart::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     transition: "open".to_string(),
///     source: "Closed".to_string(),
///     target: "Opened".to_string(),
///     internal: false,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.target, "Opened");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the transition that fired
    pub transition: String,
    /// Name of the state exited
    pub source: String,
    /// Name of the state entered; equals `source` for internal transitions
    pub target: String,
    /// Whether only the effect ran
    pub internal: bool,
    /// When the transition fired
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of fired transitions.
///
/// `record` returns a new log with the transition appended; the receiver
/// is left untouched.
///
/// # Example
///
/// ```rust
/// use statechart::core::{TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let record = |name: &str, from: &str, to: &str| TransitionRecord {
///     transition: name.to_string(),
///     source: from.to_string(),
///     target: to.to_string(),
///     internal: false,
///     timestamp: Utc::now(),
/// };
///
/// let log = TransitionLog::new()
///     .record(record("t1", "Start", "Middle"))
///     .record(record("t2", "Middle", "End"));
///
/// assert_eq!(log.path(), vec!["Start", "Middle", "End"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<TransitionRecord>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a transition, returning a new log.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// In-place append used by the running engine.
    pub(crate) fn push(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// Names of states visited: the first source, then every target.
    ///
    /// Internal transitions contribute nothing since the state set did not
    /// change.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut external = self.records.iter().filter(|r| !r.internal).peekable();
        if let Some(first) = external.peek() {
            path.push(first.source.as_str());
        }
        for record in external {
            path.push(record.target.as_str());
        }
        path
    }

    /// Time between the first and last record.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
