use chrono::{DateTime, Duration, Utc};

/// Where the player is in the current play-through, for "Question i of n".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub score: usize,
}

impl QuizProgress {
    #[must_use]
    pub fn label(&self) -> String {
        format!("Question {} of {}", self.position, self.total)
    }
}

/// Outcome of the answer currently being revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl AnswerFeedback {
    #[must_use]
    pub fn message(&self) -> String {
        if self.is_correct {
            "Correct!".to_string()
        } else {
            format!("Wrong! The correct answer was: {}", self.correct_answer)
        }
    }
}

/// Highlight of an option button during the answer reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionState {
    #[default]
    Idle,
    /// The option the player picked.
    Selected,
    /// The right answer, shown after the player picked something else.
    Correct,
}

/// Final tally of a finished play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl QuizSummary {
    /// Share of correct answers, rounded down to a whole percent.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        u32::try_from(self.score.saturating_mul(100) / self.total).unwrap_or(100)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("Your score: {} out of {}", self.score, self.total)
    }
}
