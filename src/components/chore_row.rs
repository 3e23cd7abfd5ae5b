//! Chore Row Component
//!
//! Checkbox, description, and either a comment box or who finished it.

use leptos::prelude::*;
use web_sys::HtmlInputElement;

use crate::context::use_app_context;
use crate::controller::completion_line;
use crate::models::ChoreId;
use crate::store::AppStateStoreFields;

#[component]
pub fn ChoreRow(chore_id: ChoreId) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let controller = ctx.controller;

    let chore = Memo::new(move |_| store.chores().read().find(chore_id).ok().cloned());
    let completed = move || chore.get().is_some_and(|c| c.completed);

    // The comment box commits to the store on change, and the store's
    // comment goes out with the next tick.
    let comment = move || chore.get().and_then(|c| c.comment).unwrap_or_default();

    let on_toggle = move |ev: web_sys::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        controller.toggle_chore(chore_id, input.checked(), None, &input);
    };

    let on_comment = move |ev: web_sys::Event| controller.edit_comment(chore_id, &event_target_value(&ev));

    let dom_id = format!("chore-{}", chore_id);
    let flashing = move || completed() && store.flash().get() == Some(chore_id);

    view! {
        <div class=move || if completed() { "chore-item mb-2 completed" } else { "chore-item mb-2" }>
            <div class="form-check d-flex align-items-start gap-2">
                <input
                    type="checkbox"
                    class="form-check-input chore-checkbox"
                    id=dom_id.clone()
                    data-chore-id=chore_id.to_string()
                    prop:checked=completed
                    prop:disabled=move || store.locked().get()
                    on:change=on_toggle
                />
                <label class="form-check-label flex-grow-1" for=dom_id>
                    {move || chore.get().map(|c| c.description).unwrap_or_default()}
                </label>
                <Show when=flashing>
                    <span class="floating-checkmark">"✓"</span>
                </Show>
            </div>
            {move || match chore.get() {
                Some(c) if c.completed => {
                    let line = completion_line(c.completed_by.as_deref(), c.completed_time());
                    view! {
                        <div class="completion-info text-muted ms-4">
                            <small>{line}</small>
                            {c.comment.map(|text| view! { <br /><small class="fst-italic">"Comment: " {text}</small> })}
                        </div>
                    }
                    .into_any()
                }
                Some(_) => view! {
                    <div class="chore-comment ms-4 mt-1">
                        <input
                            type="text"
                            class="form-control form-control-sm"
                            placeholder="Add a comment (optional)"
                            prop:value=comment
                            prop:disabled=move || store.locked().get()
                            on:change=on_comment
                        />
                    </div>
                }
                .into_any(),
                None => ().into_any(),
            }}
        </div>
    }
}
