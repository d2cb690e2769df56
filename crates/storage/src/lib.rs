#![forbid(unsafe_code)]

pub mod directory;
pub mod http;
pub mod record;
pub mod repository;

pub use directory::DirectoryQuestionSource;
pub use http::HttpQuestionSource;
pub use repository::{InMemoryQuestionSource, QuestionSource, SourceError, Storage};
