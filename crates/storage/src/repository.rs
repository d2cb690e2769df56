use async_trait::async_trait;
use quiz_core::model::{Category, CategoryFilter, Question};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by question sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    /// A category's data could not be fetched or parsed.
    #[error("category `{category}` unavailable: {reason}")]
    Unavailable { category: Category, reason: String },

    #[error("could not list categories: {0}")]
    Listing(String),
}

impl SourceError {
    pub(crate) fn unavailable(category: &Category, reason: impl ToString) -> Self {
        Self::Unavailable {
            category: category.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Read-only lookup of question sets keyed by category.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Names of every real category this source can serve, sorted.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Listing` if the category list cannot be produced.
    async fn categories(&self) -> Result<Vec<Category>, SourceError>;

    /// Questions of a single category, each tagged with that category.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the data cannot be fetched or parsed.
    async fn fetch_category(&self, category: &Category) -> Result<Vec<Question>, SourceError>;

    /// Questions matching the filter.
    ///
    /// `CategoryFilter::All` is partial-failure tolerant: a category that fails
    /// is logged and contributes nothing, the rest are concatenated in
    /// category order.
    ///
    /// # Errors
    ///
    /// Returns the category error for `Only`, or the listing error for `All`.
    async fn fetch(&self, filter: &CategoryFilter) -> Result<Vec<Question>, SourceError> {
        match filter {
            CategoryFilter::Only(category) => self.fetch_category(category).await,
            CategoryFilter::All => {
                let categories = self.categories().await?;
                let mut questions = Vec::new();
                for category in &categories {
                    match self.fetch_category(category).await {
                        Ok(batch) => {
                            debug!(%category, count = batch.len(), "category fetched");
                            questions.extend(batch);
                        }
                        Err(err) => {
                            warn!(%category, error = %err, "skipping unavailable category");
                        }
                    }
                }
                Ok(questions)
            }
        }
    }
}

/// In-memory question source for tests and demos.
///
/// Categories can be marked as failing to exercise partial-failure handling.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    questions: Arc<Mutex<BTreeMap<Category, Vec<Question>>>>,
    failing: Arc<Mutex<BTreeSet<Category>>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a category's questions. Each question is re-tagged with `category`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the internal lock is poisoned.
    pub fn insert(
        &self,
        category: Category,
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<(), SourceError> {
        let tagged = questions
            .into_iter()
            .map(|q| q.with_category(category.clone()))
            .collect();
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| SourceError::unavailable(&category, e))?;
        guard.insert(category, tagged);
        Ok(())
    }

    /// Make every fetch of `category` fail. The category still shows up in
    /// `categories()`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the internal lock is poisoned.
    pub fn fail(&self, category: Category) -> Result<(), SourceError> {
        let mut guard = self
            .failing
            .lock()
            .map_err(|e| SourceError::unavailable(&category, e))?;
        guard.insert(category);
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn categories(&self) -> Result<Vec<Category>, SourceError> {
        let questions = self
            .questions
            .lock()
            .map_err(|e| SourceError::Listing(e.to_string()))?;
        let failing = self
            .failing
            .lock()
            .map_err(|e| SourceError::Listing(e.to_string()))?;
        let names: BTreeSet<Category> = questions.keys().chain(failing.iter()).cloned().collect();
        Ok(names.into_iter().collect())
    }

    async fn fetch_category(&self, category: &Category) -> Result<Vec<Question>, SourceError> {
        let failing = self
            .failing
            .lock()
            .map_err(|e| SourceError::unavailable(category, e))?;
        if failing.contains(category) {
            return Err(SourceError::unavailable(category, "marked as failing"));
        }
        drop(failing);

        let guard = self
            .questions
            .lock()
            .map_err(|e| SourceError::unavailable(category, e))?;
        guard
            .get(category)
            .cloned()
            .ok_or_else(|| SourceError::unavailable(category, "not found"))
    }
}

/// Question source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_source(InMemoryQuestionSource::new())
    }

    #[must_use]
    pub fn from_source(source: impl QuestionSource + 'static) -> Self {
        Self {
            questions: Arc::new(source),
        }
    }
}
