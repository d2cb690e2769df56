use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use quiz_core::model::Question;

use super::session::{AdvanceTicket, QuizSession};
use crate::error::QuizError;

/// Pause between an answer and the next question.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1000);

/// Drives the deferred advance of a shared [`QuizSession`] on the tokio runtime.
///
/// Each accepted answer spawns one task that sleeps for the delay and then
/// redeems its ticket. Starting or resetting aborts the pending task; a task
/// that slips past the abort still cannot touch the new session because its
/// ticket is stale.
pub struct AdvanceScheduler {
    session: Arc<Mutex<QuizSession>>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AdvanceScheduler {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            delay: DEFAULT_ADVANCE_DELAY,
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Shared handle to the session, for readers that outlive a borrow.
    #[must_use]
    pub fn session(&self) -> Arc<Mutex<QuizSession>> {
        Arc::clone(&self.session)
    }

    /// Run `f` against the current session state.
    pub fn with_session<R>(&self, f: impl FnOnce(&QuizSession) -> R) -> R {
        f(&lock(&self.session))
    }

    /// Start a new play-through and cancel any pending advance.
    ///
    /// On error the session and its pending advance are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuestionSet` if `questions` is empty.
    pub fn start(&self, questions: Vec<Question>) -> Result<(), QuizError> {
        lock(&self.session).start(questions)?;
        self.cancel_pending();
        Ok(())
    }

    /// Cancel any pending advance and return the session to `NotStarted`.
    pub fn reset(&self) {
        self.cancel_pending();
        lock(&self.session).reset();
    }

    /// Answer the current question and schedule the advance.
    ///
    /// Returns `false` when the session ignored the answer.
    pub fn answer(&self, choice: &str) -> bool {
        let Some(ticket) = lock(&self.session).answer(choice) else {
            return false;
        };
        self.schedule(ticket);
        true
    }

    /// Wait for the scheduled advance, if any, to run.
    pub async fn wait_for_advance(&self) {
        let handle = lock(&self.pending).take();
        let Some(handle) = handle else {
            return;
        };
        match handle.await {
            Ok(()) => {}
            Err(err) if err.is_panic() => warn!(error = %err, "deferred advance panicked"),
            Err(_) => debug!("deferred advance was cancelled"),
        }
    }

    fn schedule(&self, ticket: AdvanceTicket) {
        let session = Arc::clone(&self.session);
        let deadline = Instant::now() + self.delay;
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            let applied = lock(&session).complete_advance(ticket);
            debug!(
                generation = ticket.generation(),
                index = ticket.index(),
                applied,
                "deferred advance fired"
            );
        });

        if let Some(previous) = lock(&self.pending).replace(handle) {
            previous.abort();
        }
    }

    fn cancel_pending(&self) {
        if let Some(handle) = lock(&self.pending).take() {
            handle.abort();
        }
    }
}

impl Drop for AdvanceScheduler {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
