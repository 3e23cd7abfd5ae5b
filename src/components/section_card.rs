//! Section Card Component
//!
//! One card per section with a tri-state header checkbox.

use leptos::prelude::*;
use web_sys::HtmlInputElement;

use super::ChoreRow;
use crate::context::use_app_context;
use crate::models::ChoreId;
use crate::sections::{group_sections, section_state};
use crate::store::AppStateStoreFields;

/// All sections of the loaded checklist, in display order
#[component]
pub fn SectionList() -> impl IntoView {
    let store = use_app_context().store;

    // Keyed on membership only; toggles re-render rows, not cards.
    let sections = Memo::new(move |_| {
        group_sections(store.chores().read().chores())
            .into_iter()
            .map(|section| (section.name, section.chore_ids))
            .collect::<Vec<_>>()
    });

    view! {
        <div id="choreContainer">
            <For
                each=move || sections.get()
                key=|section| section.clone()
                children=move |(name, chore_ids)| view! { <SectionCard name=name chore_ids=chore_ids /> }
            />
        </div>
    }
}

#[component]
pub fn SectionCard(name: String, chore_ids: Vec<ChoreId>) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let controller = ctx.controller;

    let state = {
        let name = name.clone();
        Memo::new(move |_| section_state(&store.chores().read(), &name))
    };

    let title = name.clone();
    let section = name.clone();
    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        controller.toggle_section(section.clone(), input.checked(), &input);
    };

    view! {
        <div class="section card mb-4" data-section-name=name>
            <div class="card-header section-header d-flex align-items-center gap-2">
                <input
                    type="checkbox"
                    class="form-check-input section-checkbox"
                    prop:checked=move || state.get().checked()
                    prop:indeterminate=move || state.get().indeterminate()
                    prop:disabled=move || store.locked().get()
                    on:change=on_change
                />
                <h5 class="mb-0">{title}</h5>
            </div>
            <div class="card-body">
                {chore_ids.into_iter().map(|id| view! { <ChoreRow chore_id=id /> }).collect_view()}
            </div>
        </div>
    }
}
