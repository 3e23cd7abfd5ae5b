//! Progress Bar Component

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::progress::Progress;
use crate::store::AppStateStoreFields;

#[component]
pub fn ProgressBar() -> impl IntoView {
    let store = use_app_context().store;
    let progress = Memo::new(move |_| Progress::of(&store.chores().read()));

    view! {
        <div id="progressDisplay" class="progress-display d-flex align-items-center gap-3 mb-4">
            <div class="progress-emoji fs-2">{move || progress.get().tier.emoji}</div>
            <div class="flex-grow-1">
                <div class="progress" style="height: 20px;">
                    <div
                        class="progress-bar bg-success"
                        role="progressbar"
                        style=move || format!("width: {:.1}%", progress.get().percent)
                        aria-valuenow=move || progress.get().rounded().to_string()
                        aria-valuemin="0"
                        aria-valuemax="100"
                    >
                        {move || format!("{}%", progress.get().rounded())}
                    </div>
                </div>
                <small class="text-muted">
                    {move || {
                        let p = progress.get();
                        format!("{} of {} tasks completed · {}", p.completed, p.total, p.tier.message)
                    }}
                </small>
            </div>
        </div>
    }
}
