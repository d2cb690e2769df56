mod category_vm;
mod quiz_vm;

pub use category_vm::{CategoryChoiceVm, initial_choice, load_category_choices};
pub use quiz_vm::{OptionVm, QuizVm, start_quiz};
