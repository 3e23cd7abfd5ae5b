//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::chores::ChoreStore;
use crate::models::Checklist;
use crate::progress::Notification;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Checklists offered in the dropdown
    pub checklists: Vec<Checklist>,
    /// Staff names offered in the dropdown
    pub staff: Vec<String>,
    pub selected_checklist: Option<String>,
    pub selected_staff: Option<String>,
    /// Chores of the loaded checklist
    pub chores: ChoreStore,
    /// Chore container is shown only after a successful load
    pub loaded: bool,
    /// Set after a successful submit; disables every control
    pub locked: bool,
    pub submission: Option<Submission>,
    pub toasts: Vec<Toast>,
    /// Confetti overlay is showing
    pub celebrating: bool,
    /// Chore that just got ticked, for the floating check mark
    pub flash: Option<u32>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Summary shown after a checklist was signed off
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub checklist_label: String,
    pub contributors: String,
    pub pdf_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Milestone,
    FunFact,
}

impl ToastKind {
    /// Auto-dismiss delay
    pub fn timeout_ms(self) -> u32 {
        match self {
            ToastKind::Milestone => 15_000,
            ToastKind::FunFact => 10_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub emoji: &'static str,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn from_notification(id: u64, note: &Notification) -> Self {
        match note {
            Notification::Milestone(tier) => Toast {
                id,
                kind: ToastKind::Milestone,
                emoji: tier.emoji,
                title: "Milestone Reached!".to_string(),
                message: tier.message.to_string(),
            },
            Notification::FunFact { fact, .. } => Toast {
                id,
                kind: ToastKind::FunFact,
                emoji: "💡",
                title: "Fun Fact!".to_string(),
                message: fact.to_string(),
            },
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Remove a toast from the store by ID
pub fn store_remove_toast(store: &AppStore, toast_id: u64) {
    store.toasts().write().retain(|t| t.id != toast_id);
}

/// Staff member picked in the dropdown, if any
pub fn store_selected_staff(store: &AppStore) -> Option<String> {
    store.selected_staff().get_untracked().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::TIERS;

    #[test]
    fn test_toast_from_notification() {
        let toast = Toast::from_notification(3, &Notification::Milestone(&TIERS[2]));
        assert_eq!(toast.kind, ToastKind::Milestone);
        assert_eq!(toast.message, "Halfway there!");
        assert_eq!(toast.kind.timeout_ms(), 15_000);

        let fact = Toast::from_notification(4, &Notification::FunFact { completed: 5, fact: "x" });
        assert_eq!(fact.kind, ToastKind::FunFact);
        assert_eq!(fact.title, "Fun Fact!");
    }
}
