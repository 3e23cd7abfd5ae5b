//! Shift Checklist App
//!
//! Dropdowns on top, chores grouped by section below, sign-off at the end.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{Confetti, ProgressBar, SectionList, Selectors, SubmitPanel, Toasts};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::controller::Controller;
use crate::logger;
use crate::store::{AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_page();
    logger::init(config.log_level());
    log::info!(target: "[APP]", "starting against {:?}", config.api_base);

    let store = Store::new(AppState::new());
    let controller = Controller::init(store, config);
    provide_context(AppContext::new(store, controller));
    on_cleanup(move || controller.teardown());

    view! {
        <div class="container app-layout">
            <h1 class="text-center my-4">"Shift Checklist"</h1>

            <Selectors />

            <Show
                when=move || store.loaded().get()
                fallback=|| view! {
                    <p class="alert alert-info">"Pick your name and a checklist to get started."</p>
                }
            >
                <ProgressBar />
                <SectionList />
                <SubmitPanel />
            </Show>

            <Toasts />
            <Confetti />
        </div>
    }
}
