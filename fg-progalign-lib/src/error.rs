//! Errors returned by the alignment engine.
use thiserror::Error;

/// The category of an [`AlignError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The caller supplied input the engine cannot work with.
    InvalidInput,
    /// A score matrix cell could not be explained during traceback.
    AmbiguousTraceback,
}

/// Errors raised by normalization, alignment and formatting.
///
/// Every error is fatal to the call in progress; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Ambiguous traceback at row {row}, column {col} with score {score}")]
    AmbiguousTraceback { row: usize, col: usize, score: i32 },
}

impl AlignError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AmbiguousTraceback { .. } => ErrorKind::AmbiguousTraceback,
        }
    }

    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type Result<T, E = AlignError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::{AlignError, ErrorKind};

    #[test]
    fn test_kind_and_message() {
        let err = AlignError::invalid("sequence 1 is empty");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "Invalid input: sequence 1 is empty");

        let err = AlignError::AmbiguousTraceback {
            row: 3,
            col: 4,
            score: -2,
        };
        assert_eq!(err.kind(), ErrorKind::AmbiguousTraceback);
        assert_eq!(
            err.to_string(),
            "Ambiguous traceback at row 3, column 4 with score -2"
        );
    }
}
