// Path: crates/types/src/app/events.rs

use serde::{Deserialize, Serialize};

/// A typed event emitted while admitting or executing a transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The event type, e.g. `"transfer"` or `"tx"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered key/value attributes.
    pub attributes: Vec<EventAttribute>,
}

/// A single key/value pair attached to an [`Event`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventAttribute {
    /// The attribute key.
    pub key: String,
    /// The attribute value.
    pub value: String,
}

impl Event {
    /// Creates an event with no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute, builder style.
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(EventAttribute {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    /// Returns the value of the first attribute named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}
