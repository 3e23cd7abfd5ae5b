//! Page Controller
//!
//! Glue between the reactive store and the pure sync core. Every user
//! action goes through here: the engine mutates the store, the queue
//! driver sends the update, and settle results flow back into the engine.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlInputElement;

use crate::chores::{join_names, ChoreStore};
use crate::commands::{ApiClient, HttpTransport};
use crate::config::AppConfig;
use crate::error::{ApiError, SubmitError};
use crate::live::LiveHandle;
use crate::models::{ChoreId, SubmitArgs};
use crate::progress::{Notification, ProgressTracker};
use crate::queue::{QueueDriver, Scheduler};
use crate::sections::section_state;
use crate::store::{store_remove_toast, store_selected_staff, AppStateStoreFields, AppStore, Submission, Toast};
use crate::sync::{SyncEffect, SyncEngine, SyncEvent, Ticket, UpdatePhase};

const CHECKLISTS_FAILED: &str = "Failed to load checklists. Please refresh the page.";
const STAFF_FAILED: &str = "Failed to load staff list. Please refresh the page.";
const CHORES_FAILED: &str = "Failed to load checklist. Please try again.";
const SUBMIT_FAILED: &str = "Failed to submit checklist. Please try again.";
const RESET_FAILED: &str = "Failed to reset checklist. Please try again.";

const FLASH_MS: u32 = 1_000;
const CONFETTI_MS: u32 = 3_000;
const RELOAD_AFTER_SUBMIT_MS: u32 = 5_000;

/// Real timers for the queue driver
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}

type Driver = QueueDriver<HttpTransport, TimerScheduler>;

/// The input element that raised a toggle, so it can be put back in line
/// with the store when the toggle is rejected
pub enum Control<'a> {
    Chore(ChoreId, &'a HtmlInputElement),
    Section(&'a str, &'a HtmlInputElement),
}

/// Page-wide handles. Copy, so event handlers can capture it freely.
#[derive(Clone, Copy)]
pub struct Controller {
    store: AppStore,
    api: StoredValue<ApiClient>,
    config: StoredValue<AppConfig>,
    engine: StoredValue<SyncEngine>,
    tracker: StoredValue<ProgressTracker>,
    driver: StoredValue<Rc<Driver>, LocalStorage>,
    live: StoredValue<Option<LiveHandle>, LocalStorage>,
    /// A live refresh arrived while updates were in flight
    reload_deferred: StoredValue<bool>,
    next_toast: StoredValue<u64>,
}

impl Controller {
    /// Build the controller, start live refresh and fill the dropdowns
    pub fn init(store: AppStore, config: AppConfig) -> Self {
        let api = ApiClient::new(&config.api_base);
        let driver = QueueDriver::new(config.sync.clone(), HttpTransport::new(api.clone()), TimerScheduler);
        let tracker = ProgressTracker::new(config.progress.fun_fact_every);
        let live_mode = config.live.clone();

        let controller = Self {
            store,
            api: StoredValue::new(api),
            config: StoredValue::new(config),
            engine: StoredValue::new(SyncEngine::new()),
            tracker: StoredValue::new(tracker),
            driver: StoredValue::new_local(Rc::new(driver)),
            live: StoredValue::new_local(None),
            reload_deferred: StoredValue::new(false),
            next_toast: StoredValue::new(0),
        };

        let live = LiveHandle::start(&live_mode, move || controller.refresh_from_server());
        controller.live.set_value(live);

        spawn_local(async move { controller.populate().await });
        controller
    }

    /// Stop live refresh and silently roll back updates that never left
    pub fn teardown(&self) {
        if let Some(handle) = self.live.try_update_value(Option::take).flatten() {
            handle.stop();
        }
        self.discard_queued();
    }

    fn discard_queued(&self) {
        let unsent = self.driver.with_value(|driver| driver.take_all());
        if unsent.is_empty() {
            return;
        }
        log::info!(target: "[APP]", "discarding {} unsent update(s)", unsent.len());
        let field = self.store.chores();
        let mut chores = field.write();
        self.engine.update_value(|engine| {
            for update in &unsent {
                engine.cancel(&mut chores, update.ticket);
            }
        });
    }

    // ===== Dropdowns =====

    async fn populate(self) {
        let api = self.api.get_value();

        match api.list_checklists().await {
            Ok(checklists) => self.store.checklists().set(checklists),
            Err(err) => {
                log::error!(target: "[APP]", "loading checklists failed: {}", err);
                alert(CHECKLISTS_FAILED);
                return;
            }
        }

        let fallback = self.config.with_value(|c| c.fallback_staff.clone());
        match api.list_staff().await {
            Ok(staff) if !staff.is_empty() => self.store.staff().set(staff),
            Ok(_) if !fallback.is_empty() => self.store.staff().set(fallback),
            Err(err) if !fallback.is_empty() => {
                log::warn!(target: "[APP]", "staff list unavailable ({}), using configured roster", err);
                self.store.staff().set(fallback);
            }
            Ok(_) => log::warn!(target: "[APP]", "staff list is empty"),
            Err(err) => {
                log::error!(target: "[APP]", "loading staff failed: {}", err);
                alert(STAFF_FAILED);
            }
        }
    }

    pub fn select_staff(&self, name: String) {
        let name = Some(name).filter(|n| !n.trim().is_empty());
        log::debug!(target: "[APP]", "staff selected: {:?}", name);
        self.store.selected_staff().set(name);
    }

    pub fn select_checklist(&self, name: String) {
        let name = Some(name).filter(|n| !n.is_empty());
        if self.store.selected_checklist().get_untracked() == name {
            return;
        }
        self.discard_queued();
        self.engine.update_value(SyncEngine::forget_all);
        self.tracker.update_value(ProgressTracker::reset);
        self.reload_deferred.set_value(false);
        self.store.selected_checklist().set(name.clone());

        match name {
            Some(name) => self.load_checklist(name, false),
            None => {
                self.store.loaded().set(false);
                self.store.chores().write().load(Vec::new());
            }
        }
    }

    // ===== Loading =====

    /// Fetch chores for `name`. A refresh is dropped (and deferred again)
    /// when the user toggled something while it was in flight.
    fn load_checklist(&self, name: String, refresh: bool) {
        let this = *self;
        spawn_local(async move {
            let api = this.api.get_value();
            match api.load_chores(&name).await {
                Ok(chores) => {
                    if this.store.selected_checklist().get_untracked().as_deref() != Some(name.as_str()) {
                        log::debug!(target: "[APP]", "ignoring stale chores for {}", name);
                        return;
                    }
                    if refresh && !this.is_settled() {
                        this.reload_deferred.set_value(true);
                        return;
                    }
                    log::info!(target: "[APP]", "loaded {} chores for {}", chores.len(), name);
                    this.store.chores().write().load(chores);
                    this.store.loaded().set(true);
                    this.prime_progress();
                }
                Err(err) => {
                    log::error!(target: "[APP]", "loading chores for {} failed: {}", name, err);
                    if !refresh {
                        this.store.loaded().set(false);
                        alert(CHORES_FAILED);
                    }
                }
            }
        });
    }

    /// Live refresh entry point. Waits until no update is queued or in flight.
    pub fn refresh_from_server(&self) {
        if !self.is_settled() {
            self.reload_deferred.set_value(true);
            return;
        }
        if let Some(name) = self.store.selected_checklist().get_untracked() {
            self.load_checklist(name, true);
        }
    }

    fn is_settled(&self) -> bool {
        self.driver.with_value(|driver| driver.is_idle()) && self.engine.with_value(|engine| engine.pending() == 0)
    }

    // ===== Toggles =====

    pub fn toggle_chore(&self, chore_id: ChoreId, completed: bool, comment: Option<String>, input: &HtmlInputElement) {
        let dispatched = self.handle(
            SyncEvent::ChoreToggled { chore_id, completed, comment },
            Control::Chore(chore_id, input),
        );
        if dispatched && completed {
            self.flash(chore_id);
        }
    }

    pub fn toggle_section(&self, section: String, completed: bool, input: &HtmlInputElement) {
        let control_name = section.clone();
        self.handle(
            SyncEvent::SectionToggled { section, completed },
            Control::Section(&control_name, input),
        );
    }

    /// Run one event through the engine in a single store write
    fn handle(&self, event: SyncEvent, control: Control<'_>) -> bool {
        let staff = store_selected_staff(&self.store);
        let now = now_iso();
        let effects = {
            let field = self.store.chores();
            let mut chores = field.write();
            self.engine
                .try_update_value(|engine| engine.handle(&mut chores, event, staff.as_deref(), &now))
                .unwrap_or_default()
        };
        self.run_effects(effects, Some(&control))
    }

    /// Returns whether anything was handed to the queue
    fn run_effects(&self, effects: Vec<SyncEffect>, control: Option<&Control<'_>>) -> bool {
        let mut dispatched = false;
        for effect in effects {
            match effect {
                SyncEffect::Dispatch(update) => {
                    log::debug!(target: "[SYNC]", "queued update {} for {:?}", update.ticket, update.chore_ids);
                    self.driver.with_value(|driver| driver.enqueue(update));
                    dispatched = true;
                }
                SyncEffect::RevertControl => {
                    if let Some(control) = control {
                        self.resync(control);
                    }
                }
                SyncEffect::Alert(message) => alert(&message),
            }
        }
        if dispatched {
            self.kick_queue();
        }
        dispatched
    }

    /// Put a control back in line with the store
    fn resync(&self, control: &Control<'_>) {
        let chores = self.store.chores().read_untracked();
        match control {
            Control::Chore(id, input) => {
                input.set_checked(chores.find(*id).map(|c| c.completed).unwrap_or(false));
            }
            Control::Section(name, input) => {
                let state = section_state(&chores, name);
                input.set_checked(state.checked());
                input.set_indeterminate(state.indeterminate());
            }
        }
    }

    fn kick_queue(&self) {
        let this = *self;
        let driver = self.driver.get_value();
        spawn_local(async move {
            let drained = driver.drain(move |ticket, result| this.settle(ticket, result)).await;
            if drained {
                this.on_queue_idle();
            }
        });
    }

    fn settle(&self, ticket: Ticket, result: Result<(), ApiError>) {
        let outcome = result.map_err(|err| err.to_string());
        let settlement = {
            let field = self.store.chores();
            let mut chores = field.write();
            self.engine
                .try_update_value(|engine| engine.settle(&mut chores, ticket, outcome))
                .flatten()
        };
        let Some(settlement) = settlement else {
            return;
        };
        if settlement.phase == UpdatePhase::RolledBack {
            let flashing = self.store.flash().get_untracked();
            if flashing.is_some_and(|id| settlement.chore_ids.contains(&id)) {
                self.store.flash().set(None);
            }
        }
        self.run_effects(settlement.effects, None);
    }

    fn on_queue_idle(&self) {
        if !self.is_settled() {
            return;
        }
        self.observe_progress();
        if self.reload_deferred.get_value() {
            self.reload_deferred.set_value(false);
            self.refresh_from_server();
        }
    }

    fn flash(&self, chore_id: ChoreId) {
        let store = self.store;
        store.flash().set(Some(chore_id));
        Timeout::new(FLASH_MS, move || {
            if store.flash().get_untracked() == Some(chore_id) {
                store.flash().set(None);
            }
        })
        .forget();
    }

    // ===== Progress =====

    /// Record the loaded state without announcing it
    fn prime_progress(&self) {
        let chores = self.store.chores().read_untracked();
        self.tracker.update_value(|tracker| {
            tracker.observe(&chores);
        });
    }

    fn observe_progress(&self) {
        let observed = {
            let chores = self.store.chores().read_untracked();
            self.tracker.try_update_value(|tracker| tracker.observe(&chores))
        };
        let Some((progress, notes)) = observed else {
            return;
        };
        log::debug!(target: "[PROGRESS]", "{}/{} complete", progress.completed, progress.total);

        for note in &notes {
            self.push_toast(note);
        }
    }

    fn push_toast(&self, note: &Notification) {
        let id = self
            .next_toast
            .try_update_value(|next| {
                *next += 1;
                *next
            })
            .unwrap_or_default();
        let toast = Toast::from_notification(id, note);
        let timeout = toast.kind.timeout_ms();
        self.store.toasts().write().push(toast);

        let store = self.store;
        Timeout::new(timeout, move || store_remove_toast(&store, id)).forget();
    }

    pub fn dismiss_toast(&self, id: u64) {
        store_remove_toast(&self.store, id);
    }

    fn celebrate(&self) {
        let store = self.store;
        store.celebrating().set(true);
        Timeout::new(CONFETTI_MS, move || store.celebrating().set(false)).forget();
    }

    // ===== Comments =====

    pub fn edit_comment(&self, chore_id: ChoreId, text: &str) {
        if let Err(err) = self.store.chores().write().set_comment(chore_id, text) {
            log::warn!(target: "[APP]", "comment not saved: {}", err);
        }
    }

    // ===== Submit / Reset =====

    /// Sign off the checklist. `signature` is the pad's data URL;
    /// `pad_available` is false when the signature script is missing.
    pub fn submit(&self, signature: Option<String>, pad_available: bool) {
        let checklist = self.store.selected_checklist().get_untracked();
        let staff = store_selected_staff(&self.store);
        let checked = {
            let chores = self.store.chores().read_untracked();
            check_submission(checklist.as_deref(), staff.as_deref(), &chores, signature.as_deref(), pad_available)
                .map(|()| join_names(&chores.contributors()))
        };
        let contributors = match checked {
            Ok(contributors) => contributors,
            Err(err) => {
                alert(&err.to_string());
                return;
            }
        };
        let (Some(checklist), Some(staff)) = (checklist, staff) else {
            return;
        };

        let label = self.store.checklists().with_untracked(|all| {
            all.iter()
                .find(|c| c.name == checklist)
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| checklist.clone())
        });
        let this = *self;
        spawn_local(async move {
            let api = this.api.get_value();
            let args = SubmitArgs {
                checklist_id: &checklist,
                staff_name: &staff,
                signature_data: signature.as_deref(),
            };
            match api.submit_checklist(&args).await {
                Ok(response) => {
                    log::info!(target: "[APP]", "{} submitted by {}", checklist, staff);
                    this.store.locked().set(true);
                    this.store.submission().set(Some(Submission {
                        checklist_label: label,
                        contributors,
                        pdf_url: response.pdf_url,
                    }));
                    this.celebrate();
                    Timeout::new(RELOAD_AFTER_SUBMIT_MS, reload_page).forget();
                }
                Err(err) => {
                    log::error!(target: "[APP]", "submit failed: {}", err);
                    alert(SUBMIT_FAILED);
                }
            }
        });
    }

    pub fn reset(&self) {
        let Some(checklist) = self.store.selected_checklist().get_untracked() else {
            return;
        };
        let Some(staff) = store_selected_staff(&self.store) else {
            alert(&SubmitError::NoStaff.to_string());
            return;
        };
        let question = format!(
            "Are you sure you want to reset the {} checklist? This will remove all completed tasks and signatures.",
            checklist
        );
        if !confirm(&question) {
            return;
        }

        let this = *self;
        spawn_local(async move {
            let api = this.api.get_value();
            match api.reset_checklist(&checklist, &staff).await {
                Ok(()) => {
                    log::info!(target: "[APP]", "{} reset by {}", checklist, staff);
                    this.discard_queued();
                    this.engine.update_value(SyncEngine::forget_all);
                    this.tracker.update_value(ProgressTracker::reset);
                    this.store.chores().write().reset_all();
                    this.load_checklist(checklist, false);
                }
                Err(err) => {
                    log::error!(target: "[APP]", "reset failed: {}", err);
                    alert(RESET_FAILED);
                }
            }
        });
    }
}

/// Everything a submit needs before it may be sent
pub fn check_submission(
    checklist: Option<&str>,
    staff: Option<&str>,
    chores: &ChoreStore,
    signature: Option<&str>,
    pad_available: bool,
) -> Result<(), SubmitError> {
    if checklist.map_or(true, str::is_empty) {
        return Err(SubmitError::NoChecklist);
    }
    if staff.map_or(true, |s| s.trim().is_empty()) {
        return Err(SubmitError::NoStaff);
    }
    if !chores.all_completed() {
        return Err(SubmitError::Incomplete);
    }
    if pad_available && signature.map_or(true, str::is_empty) {
        return Err(SubmitError::MissingSignature);
    }
    Ok(())
}

/// "Completed by Josh at 17:42"
pub fn completion_line(completed_by: Option<&str>, time: Option<&str>) -> String {
    let who = completed_by.unwrap_or("someone");
    match time {
        Some(time) => format!("Completed by {} at {}", who, time),
        None => format!("Completed by {}", who),
    }
}

fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn reload_page() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chores::tests::sample_store;

    #[test]
    fn test_check_submission_order() {
        let mut store = sample_store();
        assert_eq!(
            check_submission(None, Some("Josh"), &store, None, true),
            Err(SubmitError::NoChecklist)
        );
        assert_eq!(
            check_submission(Some("Closing"), Some(" "), &store, None, true),
            Err(SubmitError::NoStaff)
        );
        assert_eq!(
            check_submission(Some("Closing"), Some("Josh"), &store, Some("data:x"), true),
            Err(SubmitError::Incomplete)
        );

        for id in 1..=4 {
            store.set_completion(id, true, "Josh", None, "t").unwrap();
        }
        assert_eq!(
            check_submission(Some("Closing"), Some("Josh"), &store, None, true),
            Err(SubmitError::MissingSignature)
        );
        assert_eq!(check_submission(Some("Closing"), Some("Josh"), &store, Some("data:x"), true), Ok(()));
        assert_eq!(check_submission(Some("Closing"), Some("Josh"), &store, None, false), Ok(()));
    }

    #[test]
    fn test_completion_line() {
        assert_eq!(completion_line(Some("Nora"), Some("09:05")), "Completed by Nora at 09:05");
        assert_eq!(completion_line(None, None), "Completed by someone");
    }
}
