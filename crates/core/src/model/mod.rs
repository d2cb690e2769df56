mod category;
mod question;

pub use category::{ALL_CATEGORIES, Category, CategoryError, CategoryFilter, DEFAULT_CATEGORY};
pub use question::{Question, QuestionError};
