//! Error types raised while driving coroutines and combinators.

use thiserror::Error;

/// Errors surfaced by nodes and author-written sequences.
///
/// Interruption (reset, dispose, preemption) is never reported through this
/// type. Only misuse of a node and faults raised by sequence bodies are.
#[derive(Debug, Error)]
pub enum CoroutineError {
    /// The node was disposed and can no longer be ticked or reset.
    #[error("node has been disposed")]
    Disposed,

    /// A sequence body reported a fault.
    #[error("sequence fault: {0}")]
    Fault(String),

    /// A sequence body failed with an underlying error.
    #[error(transparent)]
    Sequence(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CoroutineError {
    /// Creates a fault carrying a plain message.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }

    /// Wraps an arbitrary error raised inside a sequence body.
    pub fn sequence<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Sequence(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, CoroutineError>;

/// Keeps the first error of a batch and logs the rest.
///
/// Used wherever several children must all be visited even if one of them
/// fails (sibling ticks, unwinding a call stack).
#[derive(Debug, Default)]
pub(crate) struct FirstError {
    first: Option<CoroutineError>,
}

impl FirstError {
    pub(crate) fn record(&mut self, result: Result<()>) {
        if let Err(err) = result {
            if self.first.is_none() {
                self.first = Some(err);
            } else {
                tracing::error!(error = %err, "additional failure while visiting nodes");
            }
        }
    }

    pub(crate) fn finish(self) -> Result<()> {
        self.first.map_or(Ok(()), Err)
    }
}
