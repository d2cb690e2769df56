#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use error::QuizError;
pub use quiz::{
    AdvanceScheduler, AdvanceTicket, AnswerFeedback, DEFAULT_ADVANCE_DELAY, DEFAULT_POOL_SIZE,
    OptionState, QuizLoopService, QuizPhase, QuizProgress, QuizSession, QuizSettings, QuizSummary,
};
