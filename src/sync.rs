//! Toggle State Machine
//!
//! `(store, event) -> effects`. A toggle moves a chore
//! `Idle -> Optimistic -> {Confirmed | RolledBack}`; the store is changed
//! immediately and the returned effects tell the adapter what to send,
//! revert or announce. Nothing here touches the network or the DOM.

use crate::chores::{ChoreSnapshot, ChoreStore};
use crate::error::SyncError;
use crate::models::ChoreId;

pub type Ticket = u64;

pub const UPDATE_FAILED: &str = "Failed to update chore. Please try again.";
pub const SECTION_FAILED: &str = "Failed to update section. Please try again.";

/// Server resource an update is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget {
    Chore(ChoreId),
    Section { section_id: u32, name: String },
}

/// An optimistic change waiting for the server
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub ticket: Ticket,
    pub target: UpdateTarget,
    /// Chores whose store state this update changed
    pub chore_ids: Vec<ChoreId>,
    /// Every chore the server request writes. A section request writes all
    /// members, including those that already had the requested value.
    pub covers: Vec<ChoreId>,
    pub staff_name: String,
    pub completed: bool,
    pub comment: Option<String>,
}

impl PendingUpdate {
    pub fn touches(&self, id: ChoreId) -> bool {
        self.covers.contains(&id)
    }

    pub fn is_section(&self) -> bool {
        matches!(self.target, UpdateTarget::Section { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    ChoreToggled {
        chore_id: ChoreId,
        completed: bool,
        comment: Option<String>,
    },
    SectionToggled {
        section: String,
        completed: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEffect {
    /// Hand the update to the queue
    Dispatch(PendingUpdate),
    /// Flip the input that raised the event back to its previous value
    RevertControl,
    Alert(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Optimistic,
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub phase: UpdatePhase,
    pub chore_ids: Vec<ChoreId>,
    pub effects: Vec<SyncEffect>,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: Ticket,
    is_section: bool,
    covers: Vec<ChoreId>,
    snapshots: Vec<ChoreSnapshot>,
}

#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    next_ticket: Ticket,
    /// Unsettled updates in issue order
    in_flight: Vec<InFlight>,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn phase(&self, ticket: Ticket) -> Option<UpdatePhase> {
        self.in_flight.iter().any(|f| f.ticket == ticket).then_some(UpdatePhase::Optimistic)
    }

    /// Apply a user event. Validation failures produce a revert and an alert
    /// without touching the store.
    pub fn handle(
        &mut self,
        store: &mut ChoreStore,
        event: SyncEvent,
        staff: Option<&str>,
        now: &str,
    ) -> Vec<SyncEffect> {
        match self.apply(store, event, staff, now) {
            Ok(effects) => effects,
            Err(err) => {
                log::warn!(target: "[SYNC]", "rejected toggle: {}", err);
                vec![SyncEffect::RevertControl, SyncEffect::Alert(err.to_string())]
            }
        }
    }

    fn apply(
        &mut self,
        store: &mut ChoreStore,
        event: SyncEvent,
        staff: Option<&str>,
        now: &str,
    ) -> Result<Vec<SyncEffect>, SyncError> {
        let staff = staff
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SyncError::NoStaffSelected)?;

        match event {
            SyncEvent::ChoreToggled { chore_id, completed, comment } => {
                let chore = store.find(chore_id).map_err(|_| SyncError::UnknownChore(chore_id))?;
                if chore.completed == completed {
                    // The control already shows the stored value.
                    return Ok(Vec::new());
                }
                // A completion without an explicit comment carries the one
                // typed into the row earlier.
                let stored = chore.comment.clone().filter(|_| completed);
                let comment = comment.filter(|c| !c.trim().is_empty()).or(stored);
                let snapshot = store
                    .set_completion(chore_id, completed, staff, comment.as_deref(), now)
                    .map_err(|_| SyncError::UnknownChore(chore_id))?;

                let update = self.issue(
                    UpdateTarget::Chore(chore_id),
                    vec![chore_id],
                    vec![snapshot],
                    staff,
                    completed,
                    comment,
                );
                Ok(vec![SyncEffect::Dispatch(update)])
            }
            SyncEvent::SectionToggled { section, completed } => {
                let members = store.section_members(&section);
                let section_id = match store.section_id(&section) {
                    Some(id) if !members.is_empty() => id,
                    _ => return Err(SyncError::UnknownSection(section)),
                };

                let mut snapshots = Vec::new();
                for &id in &members {
                    let differs = store.find(id).map(|c| c.completed != completed).unwrap_or(false);
                    if differs {
                        let snapshot = store
                            .set_completion(id, completed, staff, None, now)
                            .map_err(|_| SyncError::UnknownChore(id))?;
                        snapshots.push(snapshot);
                    }
                }
                if snapshots.is_empty() {
                    return Ok(Vec::new());
                }

                let update = self.issue(
                    UpdateTarget::Section { section_id, name: section },
                    members,
                    snapshots,
                    staff,
                    completed,
                    None,
                );
                Ok(vec![SyncEffect::Dispatch(update)])
            }
        }
    }

    fn issue(
        &mut self,
        target: UpdateTarget,
        covers: Vec<ChoreId>,
        snapshots: Vec<ChoreSnapshot>,
        staff: &str,
        completed: bool,
        comment: Option<String>,
    ) -> PendingUpdate {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let update = PendingUpdate {
            ticket,
            target,
            chore_ids: snapshots.iter().map(|s| s.id).collect(),
            covers: covers.clone(),
            staff_name: staff.to_string(),
            completed,
            comment,
        };
        self.in_flight.push(InFlight {
            ticket,
            is_section: update.is_section(),
            covers,
            snapshots,
        });
        update
    }

    /// Record the server's answer for `ticket`. Unknown tickets (already
    /// settled, or forgotten on reload) return `None`.
    pub fn settle(
        &mut self,
        store: &mut ChoreStore,
        ticket: Ticket,
        result: Result<(), String>,
    ) -> Option<Settlement> {
        match result {
            Ok(()) => {
                let pos = self.in_flight.iter().position(|f| f.ticket == ticket)?;
                let done = self.in_flight.remove(pos);
                Some(Settlement {
                    phase: UpdatePhase::Confirmed,
                    chore_ids: done.snapshots.iter().map(|s| s.id).collect(),
                    effects: Vec::new(),
                })
            }
            Err(reason) => {
                let (is_section, chore_ids) = self.roll_back(store, ticket)?;
                log::warn!(target: "[SYNC]", "rolled back update {}: {}", ticket, reason);
                let message = if is_section { SECTION_FAILED } else { UPDATE_FAILED };
                Some(Settlement {
                    phase: UpdatePhase::RolledBack,
                    chore_ids,
                    effects: vec![SyncEffect::Alert(message.to_string())],
                })
            }
        }
    }

    /// Silent rollback for updates that will never be sent
    pub fn cancel(&mut self, store: &mut ChoreStore, ticket: Ticket) -> bool {
        self.roll_back(store, ticket).is_some()
    }

    /// Drop all bookkeeping, e.g. when a different checklist is loaded
    pub fn forget_all(&mut self) {
        self.in_flight.clear();
    }

    /// Undo one update. If a later unsettled update writes the same chore,
    /// the store keeps that later optimistic value and the later update
    /// inherits this update's snapshot as its own "before" state instead.
    fn roll_back(&mut self, store: &mut ChoreStore, ticket: Ticket) -> Option<(bool, Vec<ChoreId>)> {
        let pos = self.in_flight.iter().position(|f| f.ticket == ticket)?;
        let failed = self.in_flight.remove(pos);
        let mut chore_ids = Vec::with_capacity(failed.snapshots.len());

        for snapshot in failed.snapshots {
            chore_ids.push(snapshot.id);
            let later = self.in_flight[pos..].iter_mut().find(|f| f.covers.contains(&snapshot.id));
            match later {
                Some(flight) => match flight.snapshots.iter_mut().find(|s| s.id == snapshot.id) {
                    Some(slot) => *slot = snapshot,
                    // The later request also writes this chore, so the store
                    // already shows its value; it owns the rollback from here.
                    None => flight.snapshots.push(snapshot),
                },
                None => {
                    if store.restore(&snapshot).is_err() {
                        log::debug!(target: "[SYNC]", "chore {} gone before rollback", snapshot.id);
                    }
                }
            }
        }
        Some((failed.is_section, chore_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chores::tests::sample_store;

    fn toggle(id: ChoreId, completed: bool) -> SyncEvent {
        SyncEvent::ChoreToggled { chore_id: id, completed, comment: None }
    }

    fn dispatched(effects: &[SyncEffect]) -> PendingUpdate {
        match effects {
            [SyncEffect::Dispatch(update)] => update.clone(),
            other => panic!("expected a single dispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_without_staff_is_rejected() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();

        let effects = engine.handle(&mut store, toggle(1, true), None, "t");
        assert_eq!(effects[0], SyncEffect::RevertControl);
        assert!(matches!(effects[1], SyncEffect::Alert(_)));
        assert!(!store.find(1).unwrap().completed);

        let effects = engine.handle(&mut store, toggle(1, true), Some("  "), "t");
        assert_eq!(effects[0], SyncEffect::RevertControl);
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn test_optimistic_then_confirmed() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();

        let effects = engine.handle(&mut store, toggle(1, true), Some("Josh"), "t");
        let update = dispatched(&effects);
        assert_eq!(update.target, UpdateTarget::Chore(1));
        assert_eq!(engine.phase(update.ticket), Some(UpdatePhase::Optimistic));
        assert!(store.find(1).unwrap().completed);

        let settled = engine.settle(&mut store, update.ticket, Ok(())).unwrap();
        assert_eq!(settled.phase, UpdatePhase::Confirmed);
        assert!(settled.effects.is_empty());
        assert!(store.find(1).unwrap().completed);
        assert_eq!(engine.phase(update.ticket), None);
    }

    #[test]
    fn test_failure_rolls_back_and_alerts() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();

        let update = dispatched(&engine.handle(&mut store, toggle(2, true), Some("Josh"), "t"));
        let settled = engine.settle(&mut store, update.ticket, Err("HTTP 500".into())).unwrap();

        assert_eq!(settled.phase, UpdatePhase::RolledBack);
        assert_eq!(settled.effects, vec![SyncEffect::Alert(UPDATE_FAILED.to_string())]);
        let chore = store.find(2).unwrap();
        assert!(!chore.completed);
        assert_eq!(chore.completed_by, None);
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        assert!(engine.handle(&mut store, toggle(1, false), Some("Josh"), "t").is_empty());
    }

    #[test]
    fn test_unknown_chore() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let effects = engine.handle(&mut store, toggle(42, true), Some("Josh"), "t");
        assert_eq!(effects[0], SyncEffect::RevertControl);
    }

    #[test]
    fn test_rapid_toggles_settle_to_server_state() {
        // true, false, true on one chore
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let a = dispatched(&engine.handle(&mut store, toggle(1, true), Some("Josh"), "t1"));
        let b = dispatched(&engine.handle(&mut store, toggle(1, false), Some("Josh"), "t2"));
        let c = dispatched(&engine.handle(&mut store, toggle(1, true), Some("Josh"), "t3"));

        // a fails: the server never saw it, but c's value stays on screen
        engine.settle(&mut store, a.ticket, Err("boom".into()));
        assert!(store.find(1).unwrap().completed);
        // b succeeds (server: false), c fails -> back to false
        engine.settle(&mut store, b.ticket, Ok(()));
        engine.settle(&mut store, c.ticket, Err("boom".into()));
        assert!(!store.find(1).unwrap().completed);
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn test_all_failures_restore_original() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let a = dispatched(&engine.handle(&mut store, toggle(3, true), Some("Nora"), "t1"));
        let b = dispatched(&engine.handle(&mut store, toggle(3, false), Some("Nora"), "t2"));
        let c = dispatched(&engine.handle(&mut store, toggle(3, true), Some("Nora"), "t3"));
        for ticket in [a.ticket, b.ticket, c.ticket] {
            engine.settle(&mut store, ticket, Err("down".into()));
        }
        assert!(!store.find(3).unwrap().completed);
    }

    #[test]
    fn test_section_toggle_success() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();

        let update = dispatched(&engine.handle(
            &mut store,
            SyncEvent::SectionToggled { section: "Bar".into(), completed: true },
            Some("Josh"),
            "t",
        ));
        assert_eq!(update.target, UpdateTarget::Section { section_id: 1, name: "Bar".into() });
        assert_eq!(update.chore_ids, vec![1, 2]);
        assert!(store.section_completed("Bar"));

        engine.settle(&mut store, update.ticket, Ok(()));
        assert!(store.section_completed("Bar"));
        assert!(!store.section_completed("Kitchen"));
    }

    #[test]
    fn test_section_toggle_only_fans_out_to_changed_chores() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let first = dispatched(&engine.handle(&mut store, toggle(3, true), Some("Dean"), "t"));
        engine.settle(&mut store, first.ticket, Ok(()));

        let update = dispatched(&engine.handle(
            &mut store,
            SyncEvent::SectionToggled { section: "Kitchen".into(), completed: true },
            Some("Nora"),
            "t",
        ));
        assert_eq!(update.chore_ids, vec![4]);
        assert_eq!(update.covers, vec![3, 4]);
        // chore 3 keeps its original completer
        assert_eq!(store.find(3).unwrap().completed_by.as_deref(), Some("Dean"));
    }

    #[test]
    fn test_section_toggle_failure_restores_every_member() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let first = dispatched(&engine.handle(&mut store, toggle(1, true), Some("Josh"), "t"));
        engine.settle(&mut store, first.ticket, Ok(()));

        let update = dispatched(&engine.handle(
            &mut store,
            SyncEvent::SectionToggled { section: "Bar".into(), completed: false },
            Some("Josh"),
            "t",
        ));
        assert_eq!(store.completed_count(), 0);

        let settled = engine.settle(&mut store, update.ticket, Err("503".into())).unwrap();
        assert_eq!(settled.effects, vec![SyncEffect::Alert(SECTION_FAILED.to_string())]);
        assert!(store.find(1).unwrap().completed);
        assert!(!store.find(2).unwrap().completed);
    }

    #[test]
    fn test_failed_member_toggle_defers_to_pending_section() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let member = dispatched(&engine.handle(&mut store, toggle(1, true), Some("Josh"), "t1"));
        let section = dispatched(&engine.handle(
            &mut store,
            SyncEvent::SectionToggled { section: "Bar".into(), completed: true },
            Some("Josh"),
            "t2",
        ));
        assert_eq!(section.chore_ids, vec![2]);
        assert!(section.touches(1));

        // The section request will write chore 1 too, so its value stays.
        engine.settle(&mut store, member.ticket, Err("500".into()));
        assert!(store.find(1).unwrap().completed);

        let settled = engine.settle(&mut store, section.ticket, Ok(())).unwrap();
        assert_eq!(settled.phase, UpdatePhase::Confirmed);
        assert!(store.section_completed("Bar"));
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn test_member_and_section_both_failing_restore_member() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let member = dispatched(&engine.handle(&mut store, toggle(1, true), Some("Josh"), "t1"));
        let section = dispatched(&engine.handle(
            &mut store,
            SyncEvent::SectionToggled { section: "Bar".into(), completed: true },
            Some("Josh"),
            "t2",
        ));

        engine.settle(&mut store, member.ticket, Err("500".into()));
        let settled = engine.settle(&mut store, section.ticket, Err("500".into())).unwrap();

        assert_eq!(settled.chore_ids, vec![2, 1]);
        assert_eq!(store.completed_count(), 0);
        assert!(store.find(1).unwrap().completed_by.is_none());
    }

    #[test]
    fn test_completion_sends_current_stored_comment() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        store.set_comment(1, "ice machine low").unwrap();
        store.reset_all();

        let update = dispatched(&engine.handle(&mut store, toggle(1, true), Some("Josh"), "t"));
        assert_eq!(update.comment, None);
        engine.settle(&mut store, update.ticket, Ok(()));

        store.set_comment(2, "  restocked limes ").unwrap();
        let update = dispatched(&engine.handle(&mut store, toggle(2, true), Some("Josh"), "t"));
        assert_eq!(update.comment.as_deref(), Some("restocked limes"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let effects = engine.handle(
            &mut store,
            SyncEvent::SectionToggled { section: "Cellar".into(), completed: true },
            Some("Josh"),
            "t",
        );
        assert_eq!(effects[0], SyncEffect::RevertControl);
    }

    #[test]
    fn test_cancel_is_silent() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let update = dispatched(&engine.handle(&mut store, toggle(4, true), Some("Guy"), "t"));
        assert!(engine.cancel(&mut store, update.ticket));
        assert!(!store.find(4).unwrap().completed);
        assert!(engine.settle(&mut store, update.ticket, Ok(())).is_none());
    }

    #[test]
    fn test_comment_travels_with_toggle() {
        let mut store = sample_store();
        let mut engine = SyncEngine::new();
        let update = dispatched(&engine.handle(
            &mut store,
            SyncEvent::ChoreToggled { chore_id: 2, completed: true, comment: Some("keg swapped".into()) },
            Some("Paddy"),
            "t",
        ));
        assert_eq!(update.comment.as_deref(), Some("keg swapped"));
        assert_eq!(store.find(2).unwrap().comment.as_deref(), Some("keg swapped"));
    }
}
