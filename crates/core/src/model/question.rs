use thiserror::Error;

use crate::model::Category;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One quiz item: a quote, the movie it comes from, and the wrong titles shown
/// alongside it.
///
/// Questions are immutable once built. `Question::new` is the only way in, so
/// every value in the system has a non-empty prompt, a non-empty answer and at
/// least one distractor distinct from the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    distractors: Vec<String>,
    category: Option<Category>,
}

impl Question {
    /// Build a validated question.
    ///
    /// Text is trimmed; blank and repeated distractors are dropped before validation.
    ///
    /// # Errors
    ///
    /// - `EmptyPrompt` / `EmptyAnswer` when the text is blank
    /// - `NoDistractors` when no non-blank distractor remains
    /// - `DistractorMatchesAnswer` when a distractor repeats the correct answer
    pub fn new(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        distractors: impl IntoIterator<Item = impl Into<String>>,
        category: Option<Category>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let correct_answer = correct_answer.into().trim().to_string();
        if correct_answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        let mut unique: Vec<String> = Vec::new();
        for distractor in distractors {
            let distractor = distractor.into().trim().to_string();
            if !distractor.is_empty() && !unique.contains(&distractor) {
                unique.push(distractor);
            }
        }
        let distractors = unique;
        if distractors.is_empty() {
            return Err(QuestionError::NoDistractors);
        }
        if let Some(dup) = distractors.iter().find(|d| **d == correct_answer) {
            return Err(QuestionError::DistractorMatchesAnswer {
                distractor: dup.clone(),
            });
        }

        Ok(Self {
            prompt,
            correct_answer,
            distractors,
            category,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Number of options shown for this question (answer plus distractors).
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.distractors.len() + 1
    }

    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }

    /// Answer followed by distractors, unshuffled.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(self.option_count());
        options.push(self.correct_answer.clone());
        options.extend(self.distractors.iter().cloned());
        options
    }

    /// Same question tagged with another category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,
    #[error("correct answer cannot be empty")]
    EmptyAnswer,
    #[error("question needs at least one distractor")]
    NoDistractors,
    #[error("distractor {distractor:?} repeats the correct answer")]
    DistractorMatchesAnswer { distractor: String },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
