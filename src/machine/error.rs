//! Errors a handler may return.

use crate::core::SignalError;
use crate::queue::PublishError;
use thiserror::Error;

/// Failure while a machine handles a signal.
///
/// Conversions from [`SignalError`] and [`PublishError`] let handlers use `?`
/// on payload decoding and publishing.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
