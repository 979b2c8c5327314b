// ============================================================================
// Event Value Objects
// ============================================================================

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key-value payload carried by an event.
pub type EventData = serde_json::Map<String, Value>;

/// Event type names used across the framework.
pub mod names {
    /// New quote for a watched symbol
    pub const TICK: &str = "tick";
    /// A bar/period of a watched timeframe closed
    pub const PERIOD_CLOSE: &str = "period-close";
    /// An order was (partially) filled
    pub const ORDER_FILLED: &str = "order-filled";
}

/// Turn a JSON value into an event payload.
///
/// Objects are used as-is, `null` becomes an empty payload and any other
/// value is stored under the `"value"` key.
pub fn payload(value: Value) -> EventData {
    match value {
        Value::Object(map) => map,
        Value::Null => EventData::new(),
        other => {
            let mut map = EventData::new();
            map.insert("value".to_owned(), other);
            map
        },
    }
}

/// A single dispatched event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

impl Event {
    /// Stamp a new event with the current time.
    pub fn new(event_type: impl Into<String>, data: EventData) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: Utc::now(),
            data,
        }
    }

    /// Payload value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Handle identifying one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
