//! Selectors Component
//!
//! Staff and checklist dropdowns plus the reset button.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn Selectors() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let controller = ctx.controller;

    let locked = move || store.locked().get();
    let can_reset = move || {
        store.selected_checklist().get().is_some() && store.selected_staff().get().is_some() && !locked()
    };

    view! {
        <div class="row g-3 mb-4 selectors">
            <div class="col-md-6">
                <label for="staffSelect" class="form-label">"Your name"</label>
                <select
                    id="staffSelect"
                    class="form-select"
                    prop:disabled=locked
                    on:change=move |ev| controller.select_staff(event_target_value(&ev))
                >
                    <option value="">"Select your name..."</option>
                    <For
                        each=move || store.staff().get()
                        key=|name| name.clone()
                        children=move |name| {
                            let value = name.clone();
                            view! { <option value=value>{name}</option> }
                        }
                    />
                </select>
            </div>
            <div class="col-md-6">
                <label for="checklistSelect" class="form-label">"Checklist"</label>
                <select
                    id="checklistSelect"
                    class="form-select"
                    prop:disabled=locked
                    on:change=move |ev| controller.select_checklist(event_target_value(&ev))
                >
                    <option value="">"Select a checklist..."</option>
                    <For
                        each=move || store.checklists().get()
                        key=|checklist| checklist.name.clone()
                        children=move |checklist| {
                            let label = checklist.label().to_string();
                            view! { <option value=checklist.name>{label}</option> }
                        }
                    />
                </select>
            </div>
            <Show when=can_reset>
                <div class="col-12 text-end">
                    <button
                        id="resetChecklist"
                        class="btn btn-outline-danger btn-sm"
                        on:click=move |_| controller.reset()
                    >
                        "Reset checklist"
                    </button>
                </div>
            </Show>
        </div>
    }
}
