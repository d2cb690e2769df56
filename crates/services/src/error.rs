//! Shared error types for the services crate.

use thiserror::Error;

use storage::SourceError;

/// Errors emitted by quiz sessions and the quiz loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for this quiz")]
    EmptyQuestionSet,
    #[error(transparent)]
    Source(#[from] SourceError),
}
