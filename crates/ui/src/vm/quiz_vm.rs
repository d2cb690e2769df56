use quiz_core::model::CategoryFilter;
use services::{AdvanceTicket, OptionState, QuizError, QuizLoopService, QuizSession};
use tracing::warn;

use crate::views::ViewError;

/// One option button as the quiz view draws it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub state: OptionState,
}

impl OptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.state {
            OptionState::Idle => "option",
            OptionState::Selected => "option option--selected",
            OptionState::Correct => "option option--correct",
        }
    }
}

pub struct QuizVm {
    session: QuizSession,
    filter: CategoryFilter,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession, filter: CategoryFilter) -> Self {
        Self { session, filter }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }

    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        self.session.progress().map(|progress| progress.label())
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.session.score())
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.session.current_question().map(|q| q.prompt())
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        self.session
            .options_for_current()
            .iter()
            .map(|label| OptionVm {
                label: label.clone(),
                state: self.session.option_state(label),
            })
            .collect()
    }

    #[must_use]
    pub fn feedback_message(&self) -> Option<String> {
        self.session.answer_feedback().map(|feedback| feedback.message())
    }

    #[must_use]
    pub fn game_over_label(&self) -> Option<String> {
        self.session
            .summary()
            .map(|summary| format!("Game Over! {}", summary.label()))
    }

    pub fn answer(&mut self, choice: &str) -> Option<AdvanceTicket> {
        self.session.answer(choice)
    }

    pub fn complete_advance(&mut self, ticket: AdvanceTicket) -> bool {
        self.session.complete_advance(ticket)
    }

    /// Re-fetch the same category and play again.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::EmptyQuestionSet` when nothing could be loaded.
    /// Returns `ViewError::Unknown` for other failures.
    pub async fn restart(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        quiz_loop
            .restart(&mut self.session, &self.filter)
            .await
            .map_err(view_error)
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyQuestionSet` when no questions are available.
/// Returns `ViewError::Unknown` for other failures.
pub async fn start_quiz(
    quiz_loop: &QuizLoopService,
    filter: CategoryFilter,
) -> Result<QuizVm, ViewError> {
    let session = quiz_loop
        .start_session(&filter)
        .await
        .map_err(view_error)?;
    Ok(QuizVm::new(session, filter))
}

fn view_error(err: QuizError) -> ViewError {
    match err {
        QuizError::EmptyQuestionSet => ViewError::EmptyQuestionSet,
        other => {
            warn!(error = %other, "quiz could not start");
            ViewError::Unknown
        }
    }
}
