//! Shared identity and data bag embedded in every graph entity.

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Name plus a free-form key/value bag.
///
/// States, regions, transitions and the machine itself each embed one.
/// The machine root's bag doubles as the extended state shared by all
/// guards and effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    name: String,
    data: Map<String, Value>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Map::new(),
        }
    }

    pub fn with_data(name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Store a value, returning the one it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

/// Source of names for entities created without one.
pub trait NameGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUID names.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidNames;

impl NameGenerator for UuidNames {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` names, handy in tests and snapshots.
#[derive(Debug)]
pub struct SequentialNames {
    prefix: String,
    next: AtomicU64,
}

impl SequentialNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl NameGenerator for SequentialNames {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
