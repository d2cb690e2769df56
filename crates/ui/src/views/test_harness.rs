use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoopService, QuizSettings};
use storage::InMemoryQuestionSource;

use super::quiz::QuizTestHandles;
use crate::context::{UiApp, build_app_context};
use crate::views::{HomeView, QuizView};

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quiz(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Quiz(category) => rsx! { QuizView { category: category } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Click an option through the registered answer callback.
    pub fn answer(&mut self, choice: &str) {
        let handles = self.quiz_handles.clone().expect("quiz handles");
        let answer = handles.answer();
        let choice = choice.to_string();
        self.dom.in_runtime(|| answer.call(choice));
        drive_dom(&mut self.dom);
    }

    /// Press "Start Again" through the registered restart callback.
    pub fn restart(&mut self) {
        let handles = self.quiz_handles.clone().expect("quiz handles");
        let restart = handles.restart();
        self.dom.in_runtime(|| restart.call(()));
        drive_dom(&mut self.dom);
    }

    /// The correct answer of the question on screen.
    pub fn current_answer(&self) -> Option<String> {
        let handles = self.quiz_handles.clone()?;
        let vm = handles.vm();
        self.dom.in_runtime(|| {
            vm.read()
                .as_ref()
                .and_then(|quiz| quiz.session().current_question())
                .map(|q| q.correct_answer().to_string())
        })
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(
    view: ViewKind,
    source: InMemoryQuestionSource,
    advance_delay: Duration,
) -> ViewHarness {
    let quiz_loop = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(source))
        .with_settings(QuizSettings {
            advance_delay,
            ..QuizSettings::default()
        });
    let quiz_handles = match view {
        ViewKind::Quiz(_) => Some(QuizTestHandles::default()),
        ViewKind::Home => None,
    };

    let app = Arc::new(TestApp {
        quiz_loop: Arc::new(quiz_loop),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness { dom, quiz_handles }
}
