use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{initial_choice, load_category_choices};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_loop = ctx.quiz_loop();
    let mut selected = use_signal(|| None::<String>);

    let resource = use_resource(move || {
        let quiz_loop = quiz_loop.clone();
        async move { load_category_choices(&quiz_loop).await }
    });
    let state = view_state_from_resource(&resource);

    let picker = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Loading..." }
        },
        ViewState::Error(err) => rsx! {
            p { class: "error", "{err.message()}" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| {
                    let mut resource = resource;
                    resource.restart();
                },
                "Retry"
            }
        },
        ViewState::Ready(choices) => {
            let current = selected().unwrap_or_else(|| initial_choice(&choices));
            let target = current.clone();
            rsx! {
                div { class: "home__picker",
                    label { r#for: "category-select", "Category" }
                    select {
                        id: "category-select",
                        value: "{current}",
                        onchange: move |evt: FormEvent| selected.set(Some(evt.value())),
                        for choice in choices {
                            option {
                                key: "{choice.value}",
                                value: "{choice.value}",
                                selected: choice.value == current,
                                "{choice.label}"
                            }
                        }
                    }
                }
                button {
                    class: "btn btn-primary",
                    id: "start-game",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.push(Route::Quiz { category: target.clone() });
                    },
                    "Start Game"
                }
            }
        }
    };

    rsx! {
        div { class: "page home-page",
            h1 { "Welcome to the Film Guessing Game!" }
            p { "Each round shows a movie quote. Pick the film it comes from." }
            div { class: "card", {picker} }
        }
    }
}
