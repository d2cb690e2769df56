use std::time::Duration;

use quiz_core::model::{Category, Question};
use storage::InMemoryQuestionSource;

use super::test_harness::{ViewHarness, ViewKind, setup_view_harness};

const FAST: Duration = Duration::from_millis(10);

fn source_with(category: &str, titles: &[&str]) -> InMemoryQuestionSource {
    let source = InMemoryQuestionSource::new();
    let questions: Vec<Question> = titles
        .iter()
        .map(|t| Question::new(format!("Quote from {t}"), *t, ["Decoy"], None).unwrap())
        .collect();
    source
        .insert(Category::new(category).unwrap(), questions)
        .unwrap();
    source
}

async fn settle(harness: &mut ViewHarness) {
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_categories() {
    let source = source_with("sample", &["Heat"]);
    source
        .insert(Category::new("classics").unwrap(), Vec::new())
        .unwrap();
    let mut harness = setup_view_harness(ViewKind::Home, source, FAST);

    settle(&mut harness).await;
    let html = harness.render();

    assert!(html.contains("All categories"), "missing ALL in {html}");
    assert!(html.contains("classics"), "missing classics in {html}");
    assert!(html.contains("sample"), "missing sample in {html}");
    assert!(html.contains("Start Game"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let source = source_with("sample", &["Heat", "Ronin"]);
    let mut harness = setup_view_harness(ViewKind::Quiz("sample".into()), source, FAST);

    settle(&mut harness).await;
    let html = harness.render();

    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("Quote from"), "missing quote in {html}");
    assert!(html.contains("Decoy"), "missing option in {html}");
    assert!(html.contains("Score: 0"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reveals_then_advances() {
    let source = source_with("sample", &["Heat", "Ronin"]);
    let mut harness = setup_view_harness(ViewKind::Quiz("sample".into()), source, FAST);
    settle(&mut harness).await;

    let correct = harness.current_answer().expect("question on screen");
    harness.answer(&correct);
    let html = harness.render();
    assert!(html.contains("Correct!"), "missing feedback in {html}");
    assert!(html.contains("option--selected"), "missing highlight in {html}");
    assert!(html.contains("Question 1 of 2"), "advanced too early in {html}");

    tokio::time::sleep(FAST * 3).await;
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question 2 of 2"), "missing advance in {html}");
    assert!(!html.contains("Correct!"), "stale feedback in {html}");
    assert!(html.contains("Score: 1"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_shows_game_over() {
    let source = source_with("sample", &["Heat"]);
    let mut harness = setup_view_harness(ViewKind::Quiz("sample".into()), source, FAST);
    settle(&mut harness).await;

    harness.answer("Decoy");
    assert!(
        harness
            .render()
            .contains("Wrong! The correct answer was: Heat")
    );

    tokio::time::sleep(FAST * 3).await;
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Game Over! Your score: 0 out of 1"),
        "missing game over in {html}"
    );
    assert!(html.contains("Start Again"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_start_again_replays_category() {
    let source = source_with("sample", &["Heat"]);
    let mut harness = setup_view_harness(ViewKind::Quiz("sample".into()), source, FAST);
    settle(&mut harness).await;

    harness.answer("Heat");
    tokio::time::sleep(FAST * 3).await;
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Game Over! Your score: 1 out of 1"),
        "missing game over in {html}"
    );

    harness.restart();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 1"), "missing restart in {html}");
    assert!(html.contains("Score: 0"), "score not reset in {html}");
    assert!(!html.contains("Game Over"), "stale game over in {html}");
    assert_eq!(harness.current_answer().as_deref(), Some("Heat"));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_empty_state() {
    let source = source_with("sample", &[]);
    let mut harness = setup_view_harness(ViewKind::Quiz("sample".into()), source, FAST);

    settle(&mut harness).await;
    let html = harness.render();

    assert!(
        html.contains("No questions are available for this category."),
        "missing empty message in {html}"
    );
    assert!(html.contains("Back to Home"), "missing back button in {html}");
}
