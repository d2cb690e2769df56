//! JSON shape of a static question-set resource.
//!
//! A resource is an array of `{ "quote", "movie", "wrongOptions" }` objects.
//! The category is implicit: it is the name the resource was fetched under.

use quiz_core::model::{Category, Question};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::repository::SourceError;

/// Persisted shape for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub quote: String,
    pub movie: String,
    #[serde(default)]
    pub wrong_options: Vec<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            quote: question.prompt().to_owned(),
            movie: question.correct_answer().to_owned(),
            wrong_options: question.distractors().to_vec(),
        }
    }
}

/// Parse a category resource into validated questions.
///
/// Records that fail validation are logged and skipped; the rest of the
/// category is kept.
///
/// # Errors
///
/// Returns `SourceError::Unavailable` if the body is not a JSON array of records.
pub fn parse_category(category: &Category, body: &[u8]) -> Result<Vec<Question>, SourceError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_slice(body).map_err(|e| SourceError::unavailable(category, e))?;

    let mut questions = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match Question::new(
            record.quote,
            record.movie,
            record.wrong_options,
            Some(category.clone()),
        ) {
            Ok(question) => questions.push(question),
            Err(err) => warn!(%category, index, error = %err, "skipping malformed question"),
        }
    }
    Ok(questions)
}
