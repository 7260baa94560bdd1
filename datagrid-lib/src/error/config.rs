//! Configuration error types

/// Errors raised while building a grid from its declarations and options.
///
/// These are fatal: a grid that fails to build never reaches `Idle`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A declared column has an empty `field`.
    #[error("Column at index {index} has no field")]
    MissingField {
        /// Position of the offending column in the declaration list.
        index: usize,
    },

    /// Two declared columns share the same `field`.
    #[error("Duplicate column field '{field}'")]
    DuplicateField { field: String },

    /// No identity function was supplied.
    #[error("Grid requires a row identity function")]
    MissingIdentity,

    /// A page size of zero was requested.
    #[error("Rows per page must be greater than zero")]
    InvalidRowsPerPage,

    /// The list of selectable page sizes is empty.
    #[error("Rows per page options must not be empty")]
    EmptyRowsPerPageOptions,

    /// The initial sort names a column that does not exist or is not sortable.
    #[error("Unknown or unsortable sort field '{field}'")]
    UnknownSortField { field: String },

    /// Options could not be parsed.
    #[error("Invalid grid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new missing field error.
    pub fn missing_field(index: usize) -> Self {
        Self::MissingField { index }
    }

    /// Creates a new duplicate field error.
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
        }
    }

    /// Creates a new unknown sort field error.
    pub fn unknown_sort_field(field: impl Into<String>) -> Self {
        Self::UnknownSortField {
            field: field.into(),
        }
    }
}
