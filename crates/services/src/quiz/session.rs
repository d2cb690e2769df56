use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::debug;

use quiz_core::Clock;
use quiz_core::model::Question;

use super::plan::{DEFAULT_POOL_SIZE, sample_pool, shuffled_options};
use super::progress::{AnswerFeedback, OptionState, QuizProgress, QuizSummary};
use crate::error::QuizError;

//
// ─── PHASE & TICKET ────────────────────────────────────────────────────────────
//

/// Coarse state of a session, for presentation and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    InProgress { index: usize, locked: bool },
    Finished,
}

/// Handle for the deferred advance scheduled by an answer.
///
/// A ticket only applies to the session generation and question it was issued
/// for. Once the session is reset, restarted or advanced, the ticket is stale
/// and redeeming it does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceTicket {
    generation: u64,
    index: usize,
}

impl AdvanceTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz play-through.
///
/// The session is a plain value: it never sleeps or spawns. `answer` locks
/// input and hands back an [`AdvanceTicket`]; whoever owns the timer redeems it
/// with [`QuizSession::complete_advance`] once the reveal delay has elapsed.
///
/// Invariants held between calls:
/// - `score <= current_index + 1 <= pool.len()` while a pool is loaded
/// - `selected_answer` is `Some` only while input is locked
/// - `current_options` holds the current question's answer once plus all its
///   distractors, and is empty unless a question is on screen
pub struct QuizSession {
    pool: Vec<Question>,
    current_index: usize,
    current_options: Vec<String>,
    selected_answer: Option<String>,
    score: usize,
    input_locked: bool,
    finished: bool,
    generation: u64,
    pool_size: usize,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    clock: Clock,
    rng: StdRng,
}

impl QuizSession {
    /// A session in the `NotStarted` state, seeded from the thread RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic session for tests and replays.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            pool: Vec::new(),
            current_index: 0,
            current_options: Vec::new(),
            selected_answer: None,
            score: 0,
            input_locked: false,
            finished: false,
            generation: 0,
            pool_size: DEFAULT_POOL_SIZE,
            started_at: None,
            finished_at: None,
            clock: Clock::default(),
            rng,
        }
    }

    /// Cap the number of questions sampled per play-through (minimum 1).
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Sample a new pool and begin at question 0.
    ///
    /// Starting over an existing session replaces it; any outstanding
    /// [`AdvanceTicket`] becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuestionSet` if `questions` is empty. The
    /// session is left untouched in that case.
    pub fn start(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }

        let available = questions.len();
        self.generation = self.generation.wrapping_add(1);
        self.pool = sample_pool(&mut self.rng, questions, self.pool_size);
        self.current_index = 0;
        self.selected_answer = None;
        self.score = 0;
        self.input_locked = false;
        self.finished = false;
        self.started_at = Some(self.clock.now());
        self.finished_at = None;
        self.refresh_options();

        debug!(
            generation = self.generation,
            available,
            pool = self.pool.len(),
            "quiz session started"
        );
        Ok(())
    }

    /// Return to `NotStarted`. Any outstanding [`AdvanceTicket`] becomes stale.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pool.clear();
        self.current_index = 0;
        self.current_options.clear();
        self.selected_answer = None;
        self.score = 0;
        self.input_locked = false;
        self.finished = false;
        self.started_at = None;
        self.finished_at = None;
        debug!(generation = self.generation, "quiz session reset");
    }

    /// Submit a choice for the current question.
    ///
    /// Returns `None` without touching any state when no question is active or
    /// input is locked. Otherwise records the choice, scores it, locks input
    /// and returns the ticket for the deferred advance.
    pub fn answer(&mut self, choice: &str) -> Option<AdvanceTicket> {
        if self.input_locked || self.finished {
            return None;
        }
        let question = self.pool.get(self.current_index)?;

        let correct = question.is_correct(choice);
        if correct {
            self.score += 1;
        }
        self.selected_answer = Some(choice.to_owned());
        self.input_locked = true;

        debug!(
            generation = self.generation,
            index = self.current_index,
            correct,
            score = self.score,
            "answer recorded"
        );
        Some(AdvanceTicket {
            generation: self.generation,
            index: self.current_index,
        })
    }

    /// Apply the deferred advance for `ticket`.
    ///
    /// Clears the selection, unlocks input, then moves to the next question or
    /// finishes the session. Returns `false` and changes nothing when the
    /// ticket is stale.
    pub fn complete_advance(&mut self, ticket: AdvanceTicket) -> bool {
        if ticket.generation != self.generation
            || ticket.index != self.current_index
            || !self.input_locked
            || self.finished
        {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "ignoring stale advance"
            );
            return false;
        }

        self.selected_answer = None;
        self.input_locked = false;
        if self.current_index + 1 < self.pool.len() {
            self.current_index += 1;
            self.refresh_options();
        } else {
            self.finished = true;
            self.finished_at = Some(self.clock.now());
            self.current_options.clear();
            debug!(
                generation = self.generation,
                score = self.score,
                total = self.pool.len(),
                "quiz session finished"
            );
        }
        true
    }

    fn refresh_options(&mut self) {
        self.current_options = match self.pool.get(self.current_index) {
            Some(question) => shuffled_options(&mut self.rng, question),
            None => Vec::new(),
        };
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.pool.is_empty() {
            QuizPhase::NotStarted
        } else if self.finished {
            QuizPhase::Finished
        } else {
            QuizPhase::InProgress {
                index: self.current_index,
                locked: self.input_locked,
            }
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        !self.pool.is_empty()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.input_locked
    }

    /// The question on screen; `None` before start and after the last advance.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.finished {
            return None;
        }
        self.pool.get(self.current_index)
    }

    /// Shuffled options for the current question. Stable until the index changes.
    #[must_use]
    pub fn options_for_current(&self) -> &[String] {
        &self.current_options
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of questions in the sampled pool.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    /// Whether the choice being revealed was right; `None` outside the reveal.
    #[must_use]
    pub fn last_answer_correct(&self) -> Option<bool> {
        let selected = self.selected_answer.as_deref()?;
        Some(self.current_question()?.is_correct(selected))
    }

    /// Feedback for the answer being revealed, if any.
    #[must_use]
    pub fn answer_feedback(&self) -> Option<AnswerFeedback> {
        let selected = self.selected_answer.as_ref()?;
        let question = self.current_question()?;
        Some(AnswerFeedback {
            selected: selected.clone(),
            correct_answer: question.correct_answer().to_owned(),
            is_correct: question.is_correct(selected),
        })
    }

    /// Highlight for one option button.
    #[must_use]
    pub fn option_state(&self, option: &str) -> OptionState {
        let (Some(selected), Some(question)) = (self.selected_answer(), self.current_question())
        else {
            return OptionState::Idle;
        };
        if option == selected {
            OptionState::Selected
        } else if question.is_correct(option) {
            OptionState::Correct
        } else {
            OptionState::Idle
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<QuizProgress> {
        if self.pool.is_empty() {
            return None;
        }
        Some(QuizProgress {
            position: (self.current_index + 1).min(self.pool.len()),
            total: self.pool.len(),
            score: self.score,
        })
    }

    /// Final tally, available once the session has finished.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        if !self.finished {
            return None;
        }
        Some(QuizSummary {
            score: self.score,
            total: self.pool.len(),
            started_at: self.started_at?,
            finished_at: self.finished_at?,
        })
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("pool_len", &self.pool.len())
            .field("current_index", &self.current_index)
            .field("score", &self.score)
            .field("input_locked", &self.input_locked)
            .field("finished", &self.finished)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
