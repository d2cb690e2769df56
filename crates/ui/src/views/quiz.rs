use dioxus::prelude::*;
use dioxus::core::Task;
use dioxus_router::use_navigator;

use quiz_core::model::CategoryFilter;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{OptionVm, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Plain copy of what the quiz screen shows, taken once per render.
#[derive(Clone, Debug, PartialEq)]
struct QuizScreen {
    progress: Option<String>,
    score: String,
    prompt: Option<String>,
    options: Vec<OptionVm>,
    feedback: Option<String>,
    locked: bool,
    game_over: Option<String>,
}

impl QuizScreen {
    fn from_vm(vm: &QuizVm) -> Self {
        Self {
            progress: vm.progress_label(),
            score: vm.score_label(),
            prompt: vm.prompt().map(str::to_owned),
            options: vm.options(),
            feedback: vm.feedback_message(),
            locked: vm.is_locked(),
            game_over: vm.game_over_label(),
        }
    }
}

#[component]
pub fn QuizView(category: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_loop = ctx.quiz_loop();
    let delay = ctx.advance_delay();

    let vm = use_signal(|| None::<QuizVm>);
    let error = use_signal(|| None::<ViewError>);
    let pending = use_signal(|| None::<Task>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let category = category.clone();
        let mut vm = vm;

        async move {
            let filter = category
                .parse::<CategoryFilter>()
                .map_err(|_| ViewError::Unknown)?;
            let started = start_quiz(&quiz_loop, filter).await?;
            vm.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });

    // The reveal timer. Only the latest one matters; the ticket rejects any
    // that outlives a restart.
    let on_answer = use_callback(move |choice: String| {
        let mut vm = vm;
        let mut pending = pending;

        let ticket = vm.write().as_mut().and_then(|quiz| quiz.answer(&choice));
        let Some(ticket) = ticket else {
            return;
        };

        let task = spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(quiz) = vm.write().as_mut() {
                quiz.complete_advance(ticket);
            }
        });
        if let Some(previous) = pending.write().replace(task) {
            previous.cancel();
        }
    });

    let on_restart = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let mut vm = vm;
            let mut error = error;
            let mut pending = pending;

            if let Some(task) = pending.write().take() {
                task.cancel();
            }
            let quiz_loop = quiz_loop.clone();
            spawn(async move {
                let taken = vm.write().take();
                let Some(mut quiz) = taken else {
                    error.set(Some(ViewError::Unknown));
                    return;
                };

                let result = quiz.restart(&quiz_loop).await;

                // Put the quiz back even on failure so the screen stays usable.
                vm.set(Some(quiz));
                error.set(result.err());
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(on_answer, on_restart, vm);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let screen = vm.read().as_ref().map(QuizScreen::from_vm);

    let body = match (state, screen) {
        (ViewState::Error(err), _) => rsx! {
            p { class: "error", "{err.message()}" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| {
                    let _ = navigator.push(Route::Home {});
                },
                "Back to Home"
            }
        },
        (ViewState::Ready(()), Some(screen)) => rsx! {
            if let Some(progress) = screen.progress.clone() {
                h2 { class: "quiz__progress", "{progress}" }
            }
            p { class: "quiz__score", "{screen.score}" }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            if let Some(label) = screen.game_over.clone() {
                div { class: "game-over",
                    h2 { class: "game-over__title", "{label}" }
                    button {
                        class: "btn btn-primary",
                        id: "start-again",
                        r#type: "button",
                        onclick: move |_| on_restart.call(()),
                        "Start Again"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let _ = navigator.push(Route::Home {});
                        },
                        "Change Category"
                    }
                }
            } else {
                if let Some(prompt) = screen.prompt.clone() {
                    blockquote { class: "quiz__quote", "{prompt}" }
                }
                div { class: "quiz__options",
                    for option in screen.options.clone() {
                        OptionButton {
                            key: "{option.label}",
                            option: option,
                            locked: screen.locked,
                            on_answer: on_answer,
                        }
                    }
                }
                if let Some(message) = screen.feedback.clone() {
                    p { class: "quiz__feedback", "{message}" }
                }
            }
        },
        _ => rsx! {
            p { "Loading..." }
        },
    };

    rsx! {
        div { class: "page quiz-page", {body} }
    }
}

#[component]
fn OptionButton(option: OptionVm, locked: bool, on_answer: Callback<String>) -> Element {
    let choice = option.label.clone();
    rsx! {
        button {
            class: "{option.class()}",
            r#type: "button",
            disabled: locked,
            onclick: move |_| on_answer.call(choice.clone()),
            "{option.label}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    answer: Rc<RefCell<Option<Callback<String>>>>,
    restart: Rc<RefCell<Option<Callback<()>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        answer: Callback<String>,
        restart: Callback<()>,
        vm: Signal<Option<QuizVm>>,
    ) {
        *self.answer.borrow_mut() = Some(answer);
        *self.restart.borrow_mut() = Some(restart);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn answer(&self) -> Callback<String> {
        (*self.answer.borrow()).expect("quiz answer registered")
    }

    pub(crate) fn restart(&self) -> Callback<()> {
        (*self.restart.borrow()).expect("quiz restart registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
