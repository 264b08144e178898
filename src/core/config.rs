//! Per-state timing configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and completion options of a normal state.
///
/// Serializable so state timing can be loaded from configuration data.
/// The interval is expressed in milliseconds on the wire.
///
/// # Example
///
/// ```rust
/// use statechart::core::StateConfig;
/// use std::time::Duration;
///
/// let config: StateConfig =
///     serde_json::from_str(r#"{ "timer": true, "interval": 250 }"#).unwrap();
///
/// assert!(config.timer);
/// assert_eq!(config.interval, Duration::from_millis(250));
/// assert!(!config.auto_transition);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Run the do-activity periodically instead of once on entry.
    pub timer: bool,
    /// Period between do-activity invocations when `timer` is set.
    #[serde(with = "millis")]
    pub interval: Duration,
    /// Fire completion as soon as entry and do-activity have run.
    pub auto_transition: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            timer: false,
            interval: Duration::from_millis(1000),
            auto_transition: false,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
