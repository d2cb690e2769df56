use quiz_core::model::{ALL_CATEGORIES, CategoryFilter, DEFAULT_CATEGORY};
use services::QuizLoopService;
use tracing::warn;

use crate::views::ViewError;

/// One entry of the home screen's category picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryChoiceVm {
    /// Route segment and `<option>` value.
    pub value: String,
    pub label: String,
}

/// `ALL` first, then each category the source lists.
///
/// # Errors
///
/// Returns `ViewError::Unknown` when the source cannot list its categories.
pub async fn load_category_choices(
    quiz_loop: &QuizLoopService,
) -> Result<Vec<CategoryChoiceVm>, ViewError> {
    let categories = quiz_loop.categories().await.map_err(|err| {
        warn!(error = %err, "category listing failed");
        ViewError::Unknown
    })?;

    let mut choices = vec![CategoryChoiceVm {
        value: ALL_CATEGORIES.to_string(),
        label: "All categories".to_string(),
    }];
    choices.extend(categories.into_iter().map(|category| CategoryChoiceVm {
        value: category.as_str().to_string(),
        label: category.as_str().to_string(),
    }));
    Ok(choices)
}

/// Picker value selected before the player touches it.
#[must_use]
pub fn initial_choice(choices: &[CategoryChoiceVm]) -> String {
    if choices.iter().any(|c| c.value == DEFAULT_CATEGORY) {
        DEFAULT_CATEGORY.to_string()
    } else {
        CategoryFilter::All.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quiz_core::model::{Category, Question};
    use quiz_core::time::fixed_clock;
    use storage::InMemoryQuestionSource;

    use super::*;

    #[tokio::test]
    async fn choices_start_with_all() {
        let source = InMemoryQuestionSource::new();
        let q = Question::new("Q", "A", ["B"], None).unwrap();
        source.insert(Category::new("sample").unwrap(), vec![q.clone()]).unwrap();
        source.insert(Category::new("classics").unwrap(), vec![q]).unwrap();
        let quiz_loop = QuizLoopService::new(fixed_clock(), Arc::new(source));

        let choices = load_category_choices(&quiz_loop).await.unwrap();
        let values: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["ALL", "classics", "sample"]);
        assert_eq!(initial_choice(&choices), "sample");
    }

    #[test]
    fn initial_choice_falls_back_to_all() {
        let choices = vec![CategoryChoiceVm {
            value: "ALL".into(),
            label: "All categories".into(),
        }];
        assert_eq!(initial_choice(&choices), "ALL");
    }
}
