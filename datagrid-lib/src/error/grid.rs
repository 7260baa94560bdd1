//! Crate-wide error type

use super::ConfigError;
use super::FieldError;
use super::LoaderError;

/// Any error produced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Grid construction failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A remote loader failed.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// Typed record access failed.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Result alias using the crate-wide [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
