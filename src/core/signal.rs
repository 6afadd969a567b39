//! Signals: the unit of communication between machines.

use super::error::SignalError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name of the heartbeat signal the runner publishes on every tick.
pub const HEARTBEAT: &str = "tick";

/// Validated signal identifier.
///
/// A name is non-empty and contains no whitespace or control characters.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignalName(String);

impl SignalName {
    /// Validate and wrap a signal name.
    ///
    /// ```rust
    /// use tickwork::core::SignalName;
    ///
    /// assert!(SignalName::new("file_change").is_ok());
    /// assert!(SignalName::new("").is_err());
    /// assert!(SignalName::new("file change").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, SignalError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SignalError::InvalidName {
                name,
                reason: "name is empty",
            });
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(SignalError::InvalidName {
                name,
                reason: "name contains whitespace or control characters",
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SignalName {
    type Error = SignalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SignalName> for String {
    fn from(name: SignalName) -> Self {
        name.0
    }
}

impl AsRef<str> for SignalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SignalName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SignalName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named event with an optional payload.
///
/// Signals are immutable once created. The payload is opaque to the runner;
/// machines decode it with [`Signal::payload_as`].
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Signal {
    name: SignalName,
    payload: Option<Value>,
}

impl Signal {
    pub fn new(name: SignalName, payload: Option<Value>) -> Self {
        Self { name, payload }
    }

    /// Build the heartbeat signal for tick number `tick`.
    pub(crate) fn heartbeat(tick: u64) -> Self {
        Self {
            name: SignalName(HEARTBEAT.to_string()),
            payload: Some(Value::from(tick)),
        }
    }

    pub fn name(&self) -> &SignalName {
        &self.name
    }

    /// Shorthand for comparing the signal name.
    pub fn is(&self, name: &str) -> bool {
        self.name.as_str() == name
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Decode the payload into `T`.
    ///
    /// ```rust
    /// use tickwork::core::{Signal, SignalName};
    /// use serde_json::json;
    ///
    /// let signal = Signal::new(SignalName::new("test_run_finished").unwrap(), Some(json!([8, 10])));
    /// let (completed, total): (u32, u32) = signal.payload_as().unwrap();
    /// assert_eq!((completed, total), (8, 10));
    /// ```
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, SignalError> {
        let value = self
            .payload
            .as_ref()
            .ok_or_else(|| SignalError::MissingPayload {
                name: self.name.to_string(),
            })?;
        T::deserialize(value).map_err(|source| SignalError::Payload {
            name: self.name.to_string(),
            source,
        })
    }

    /// Counter carried by a heartbeat, `None` for any other signal.
    pub fn tick_number(&self) -> Option<u64> {
        if self.is(HEARTBEAT) {
            self.payload.as_ref().and_then(Value::as_u64)
        } else {
            None
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "(\"{}\", {})", self.name, payload),
            None => write!(f, "(\"{}\", None)", self.name),
        }
    }
}
