//! Toast Components
//!
//! Milestone and fun-fact popups, and the confetti overlay.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{AppStateStoreFields, ToastKind};

#[component]
pub fn Toasts() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let controller = ctx.controller;

    view! {
        <div id="achievementsContainer" class="achievements-container">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Milestone => "achievement milestone show",
                        ToastKind::FunFact => "achievement fun-fact show",
                    };
                    view! {
                        <div class=class on:click=move |_| controller.dismiss_toast(id)>
                            <div class="achievement-content">
                                <div class="achievement-emoji">{toast.emoji}</div>
                                <div class="achievement-message">
                                    <strong>{toast.title}</strong>
                                    <br />
                                    {toast.message}
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Shown while every chore is done, and briefly after a submit
#[component]
pub fn Confetti() -> impl IntoView {
    let store = use_app_context().store;
    let all_done = Memo::new(move |_| store.chores().read().all_completed());
    let visible = move || store.loaded().get() && (all_done.get() || store.celebrating().get());

    view! {
        <Show when=visible>
            <div class="confetti" aria-hidden="true">
                {(0..40).map(|i| view! { <span class=format!("confetti-piece piece-{}", i % 8)></span> }).collect_view()}
            </div>
        </Show>
    }
}
