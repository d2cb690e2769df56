//! Quiz play-through: sampling, the session state machine and its deferred advance.

mod plan;
mod progress;
mod scheduler;
mod session;
mod workflow;

pub use plan::{DEFAULT_POOL_SIZE, sample_pool, shuffled_options};
pub use progress::{AnswerFeedback, OptionState, QuizProgress, QuizSummary};
pub use scheduler::{AdvanceScheduler, DEFAULT_ADVANCE_DELAY};
pub use session::{AdvanceTicket, QuizPhase, QuizSession};
pub use workflow::{QuizLoopService, QuizSettings};
