//! Errors returned to producers.

use thiserror::Error;

/// Errors that can occur when publishing a signal.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Signal queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Signal queue is closed; its runner has been dropped")]
    Closed,

    #[error("Failed to encode signal payload: {0}")]
    Encode(#[from] serde_json::Error),
}
