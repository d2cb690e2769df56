use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Category, CategoryFilter, Question};
use storage::QuestionSource;
use tracing::debug;

use super::plan::DEFAULT_POOL_SIZE;
use super::scheduler::{AdvanceScheduler, DEFAULT_ADVANCE_DELAY};
use super::session::QuizSession;
use crate::Clock;
use crate::error::QuizError;

/// Tunables for a play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    /// Questions sampled per play-through, at least 1.
    pub pool_size: usize,
    /// Reveal time between an answer and the next question.
    pub advance_delay: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

/// Orchestrates fetching questions and starting sessions.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            settings: QuizSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = QuizSettings {
            pool_size: settings.pool_size.max(1),
            ..settings
        };
        self
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// Categories the player can pick from, not counting `ALL`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Source` if the source cannot list its categories.
    pub async fn categories(&self) -> Result<Vec<Category>, QuizError> {
        Ok(self.source.categories().await?)
    }

    /// A fresh, unstarted session configured with this service's clock and pool size.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new()
            .with_pool_size(self.settings.pool_size)
            .with_clock(self.clock)
    }

    /// Fetch questions for `filter` and start a new session on them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Source` when the fetch fails and
    /// `QuizError::EmptyQuestionSet` when it yields nothing.
    pub async fn start_session(&self, filter: &CategoryFilter) -> Result<QuizSession, QuizError> {
        let questions = self.load(filter).await?;
        let mut session = self.new_session();
        session.start(questions)?;
        Ok(session)
    }

    /// Re-fetch and re-sample into an existing session.
    ///
    /// On error the session keeps its previous state.
    ///
    /// # Errors
    ///
    /// Same as [`QuizLoopService::start_session`].
    pub async fn restart(
        &self,
        session: &mut QuizSession,
        filter: &CategoryFilter,
    ) -> Result<(), QuizError> {
        let questions = self.load(filter).await?;
        session.start(questions)
    }

    /// Start a session wrapped in an [`AdvanceScheduler`] using the configured delay.
    ///
    /// # Errors
    ///
    /// Same as [`QuizLoopService::start_session`].
    pub async fn start_scheduled(
        &self,
        filter: &CategoryFilter,
    ) -> Result<AdvanceScheduler, QuizError> {
        let session = self.start_session(filter).await?;
        Ok(AdvanceScheduler::new(session).with_delay(self.settings.advance_delay))
    }

    async fn load(&self, filter: &CategoryFilter) -> Result<Vec<Question>, QuizError> {
        let questions = self.source.fetch(filter).await?;
        debug!(%filter, count = questions.len(), "questions loaded");
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use storage::{InMemoryQuestionSource, SourceError};

    fn category(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    fn questions(prefix: &str, count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                Question::new(format!("{prefix} {i}"), format!("{prefix}{i}"), ["Other"], None)
                    .unwrap()
            })
            .collect()
    }

    fn sample() -> CategoryFilter {
        CategoryFilter::Only(Category::default_category())
    }

    fn service(source: &InMemoryQuestionSource) -> QuizLoopService {
        QuizLoopService::new(fixed_clock(), Arc::new(source.clone()))
    }

    #[tokio::test]
    async fn start_session_caps_pool_and_starts() {
        let source = InMemoryQuestionSource::new();
        source.insert(category("sample"), questions("s", 14)).unwrap();

        let session = service(&source)
            .start_session(&sample())
            .await
            .unwrap();

        assert_eq!(session.total(), DEFAULT_POOL_SIZE);
        assert!(session.current_question().is_some());
    }

    #[tokio::test]
    async fn pool_size_setting_applies() {
        let source = InMemoryQuestionSource::new();
        source.insert(category("sample"), questions("s", 14)).unwrap();
        let svc = service(&source).with_settings(QuizSettings {
            pool_size: 0,
            advance_delay: Duration::from_millis(10),
        });

        assert_eq!(svc.settings().pool_size, 1);
        let session = svc.start_session(&sample()).await.unwrap();
        assert_eq!(session.total(), 1);
    }

    #[tokio::test]
    async fn empty_category_is_empty_question_set() {
        let source = InMemoryQuestionSource::new();
        source.insert(category("sample"), Vec::new()).unwrap();

        let err = service(&source)
            .start_session(&sample())
            .await
            .unwrap_err();
        assert_eq!(err, QuizError::EmptyQuestionSet);
    }

    #[tokio::test]
    async fn failing_category_maps_to_source_error() {
        let source = InMemoryQuestionSource::new();
        source.fail(category("sample")).unwrap();

        let err = service(&source)
            .start_session(&sample())
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Source(SourceError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn restart_failure_keeps_previous_session() {
        let source = InMemoryQuestionSource::new();
        source.insert(category("sample"), questions("s", 3)).unwrap();
        let svc = service(&source);

        let mut session = svc.start_session(&sample()).await.unwrap();
        let before = session.generation();

        let missing = CategoryFilter::Only(category("western"));
        assert!(svc.restart(&mut session, &missing).await.is_err());
        assert_eq!(session.generation(), before);
        assert_eq!(session.total(), 3);

        svc.restart(&mut session, &sample())
            .await
            .unwrap();
        assert_eq!(session.generation(), before + 1);
    }

    #[tokio::test]
    async fn all_with_only_failing_categories_is_empty_question_set() {
        let source = InMemoryQuestionSource::new();
        source.fail(category("sample")).unwrap();

        let err = service(&source)
            .start_session(&CategoryFilter::All)
            .await
            .unwrap_err();
        assert_eq!(err, QuizError::EmptyQuestionSet);
    }

    #[tokio::test]
    async fn categories_come_from_source() {
        let source = InMemoryQuestionSource::new();
        source.insert(category("drama"), questions("d", 1)).unwrap();
        source.insert(category("action"), questions("a", 1)).unwrap();

        let names = service(&source).categories().await.unwrap();
        assert_eq!(names, vec![category("action"), category("drama")]);
    }
}
