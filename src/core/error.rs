//! Errors raised while building or reading signals.

use thiserror::Error;

/// Errors that can occur when constructing a signal or decoding its payload.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Invalid signal name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Signal '{name}' carries no payload")]
    MissingPayload { name: String },

    #[error("Payload of signal '{name}' has an unexpected shape: {source}")]
    Payload {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
