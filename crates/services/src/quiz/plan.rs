use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

/// Questions per play-through unless configured otherwise.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Pick up to `size` questions uniformly at random, without replacement.
///
/// Shuffles the whole set (Fisher–Yates) and keeps the first `size`, so every
/// subset and every order is equally likely.
pub fn sample_pool<R: Rng + ?Sized>(
    rng: &mut R,
    mut questions: Vec<Question>,
    size: usize,
) -> Vec<Question> {
    questions.shuffle(rng);
    questions.truncate(size);
    questions
}

/// The question's answer and distractors in a fresh uniform random order.
pub fn shuffled_options<R: Rng + ?Sized>(rng: &mut R, question: &Question) -> Vec<String> {
    let mut options = question.options();
    options.shuffle(rng);
    options
}
