//! Submit Panel Component
//!
//! Signature pad and sign-off button, revealed once every chore is done,
//! then the success summary.

use leptos::html::Canvas;
use leptos::prelude::*;

use crate::context::use_app_context;
use crate::signature::SignaturePad;
use crate::store::AppStateStoreFields;

#[component]
pub fn SubmitPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let controller = ctx.controller;

    let canvas_ref: NodeRef<Canvas> = NodeRef::new();
    let pad = StoredValue::new_local(None::<SignaturePad>);
    let all_done = Memo::new(move |_| store.chores().read().all_completed());

    // The canvas stays mounted so the pad survives the section being hidden.
    Effect::new(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            if pad.with_value(Option::is_none) {
                pad.set_value(SignaturePad::attach(&canvas));
            }
        }
    });

    let on_submit = move |_| {
        let (signature, available) = pad.with_value(|pad| match pad {
            Some(pad) => (pad.data_url(), true),
            None => (None, false),
        });
        controller.submit(signature, available);
    };
    let on_clear = move |_| {
        pad.with_value(|pad| {
            if let Some(pad) = pad {
                pad.clear();
            }
        })
    };

    let submitted = move || store.submission().get().is_some();

    view! {
        <div
            id="successSection"
            class=move || if all_done.get() || submitted() { "success-section mt-4" } else { "success-section mt-4 d-none" }
        >
            {move || {
                store.submission().get().map(|s| {
                    let summary = format!("The {} has been completed by {}!", s.checklist_label, s.contributors);
                    view! {
                        <div class="alert alert-success text-center">
                            <h4 class="alert-heading">"🎉 Amazing job! 🎉"</h4>
                            <p class="mb-0">{summary}</p>
                            {s.pdf_url.map(|url| view! { <a href=url target="_blank" class="alert-link">"Download PDF"</a> })}
                        </div>
                    }
                })
            }}
            <div class=move || if submitted() { "d-none" } else { "signature-block text-center" }>
                <h4>"All done! Sign off below"</h4>
                <canvas
                    id="signaturePad"
                    class="signature-pad border rounded"
                    width="600"
                    height="200"
                    node_ref=canvas_ref
                ></canvas>
                <div class="d-flex justify-content-center gap-2 mt-2">
                    <button id="clearSignatureBtn" class="btn btn-outline-secondary" on:click=on_clear>
                        "Clear"
                    </button>
                    <button id="submitChecklistBtn" class="btn btn-success" on:click=on_submit>
                        "Submit checklist"
                    </button>
                </div>
            </div>
        </div>
    }
}
