//! Leveled diagnostics.
//!
//! Every diagnostic is emitted as a `tracing` event and, when one is
//! installed, forwarded to the machine's [`Observer`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        write!(f, "{label}: {}", self.message)
    }
}

/// Receives every diagnostic a machine reports.
pub trait Observer: Send + Sync {
    fn observe(&self, diagnostic: &Diagnostic);
}

impl<F> Observer for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn observe(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Observer that keeps everything it sees. Clones share one buffer.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn at(&self, level: Level) -> Vec<Diagnostic> {
        self.entries()
            .into_iter()
            .filter(|d| d.level == level)
            .collect()
    }

    /// Whether a diagnostic at `level` mentions `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.at(level).iter().any(|d| d.message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Observer for DiagnosticLog {
    fn observe(&self, diagnostic: &Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

pub(crate) fn emit(machine: &str, observer: Option<&Arc<dyn Observer>>, level: Level, message: String) {
    match level {
        Level::Info => tracing::info!(machine, "{message}"),
        Level::Warn => tracing::warn!(machine, "{message}"),
        Level::Error => tracing::error!(machine, "{message}"),
    }
    if let Some(observer) = observer {
        observer.observe(&Diagnostic { level, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_and_filters_by_level() {
        let log = DiagnosticLog::new();
        let observer: Arc<dyn Observer> = Arc::new(log.clone());

        emit("m", Some(&observer), Level::Info, "state 'A' activated".into());
        emit("m", Some(&observer), Level::Warn, "state 'A' is already active".into());

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.at(Level::Warn).len(), 1);
        assert!(log.contains(Level::Info, "'A' activated"));
        assert!(!log.contains(Level::Error, "A"));

        log.clear();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn closures_are_observers() {
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let observer: Arc<dyn Observer> = Arc::new(move |_: &Diagnostic| {
            *counter.lock().unwrap() += 1;
        });

        emit("m", Some(&observer), Level::Error, "boom".into());
        emit("m", None, Level::Error, "unobserved".into());

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn diagnostic_display_has_level_prefix() {
        let diagnostic = Diagnostic {
            level: Level::Warn,
            message: "careful".into(),
        };
        assert_eq!(diagnostic.to_string(), "WARN: careful");
    }
}
