use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KdError {
    /// A caller-supplied argument violates the tree's contract, eg a query point
    /// whose dimensionality differs from the tree's.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A point-set file or command line could not be parsed.
    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput {
        /// 1-based line number the problem was detected on
        line: usize,
        /// what was wrong with it
        reason: String,
    },

    /// A query was issued before any point set was loaded.
    #[error("No point set loaded")]
    NotLoaded,

    /// Reading a point-set file or command stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Writing query results failed. Unlike the other variants, this ends a command
    /// session, since later output would be lost too.
    #[error("Failed to write results: {0}")]
    Output(#[source] std::io::Error),
}

impl KdError {
    pub(crate) fn dimension_mismatch(what: &str, expected: usize, found: usize) -> Self {
        KdError::InvalidArgument(format!(
            "{what} has {found} coordinates but the tree has {expected} dimensions"
        ))
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        KdError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, KdError>;
