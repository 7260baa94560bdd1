//! Remote loader error types

use std::sync::Arc;
use std::time::Duration;

/// Errors produced by a remote loader.
///
/// A loader failure never tears down the grid: the engine settles to an empty
/// result and hands the error to the caller's error channel.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoaderError {
    /// The loader reported a failure.
    #[error("Loader failed: {message}")]
    Failed {
        /// Error message.
        message: String,
        /// Backend-specific error code, if available.
        code: Option<String>,
    },

    /// The loader did not answer within the configured timeout.
    #[error("Loader timed out after {0:?}")]
    Timeout(Duration),

    /// The loader gave up before producing a page.
    #[error("Loader cancelled")]
    Cancelled,

    /// Any other error raised by the loader's backend.
    #[error("Loader error: {0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl LoaderError {
    /// Creates a new failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a new failure with a message and an error code.
    pub fn failed_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Wraps an arbitrary backend error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }

    /// Returns the error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Failed { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if asking again might succeed.
    ///
    /// The engine never retries on its own; this is a hint for callers that
    /// render a "retry" affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Other(_))
    }
}
