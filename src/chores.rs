//! Chore State Store
//!
//! In-memory mirror of the server's chores for the loaded checklist.
//! Pure state: no network access, no DOM.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{Chore, ChoreId};

/// Completion fields of one chore, captured before an optimistic change
#[derive(Debug, Clone, PartialEq)]
pub struct ChoreSnapshot {
    pub id: ChoreId,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<String>,
    pub comment: Option<String>,
}

impl ChoreSnapshot {
    fn of(chore: &Chore) -> Self {
        Self {
            id: chore.id,
            completed: chore.completed,
            completed_by: chore.completed_by.clone(),
            completed_at: chore.completed_at.clone(),
            comment: chore.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoreStore {
    chores: Vec<Chore>,
}

impl ChoreStore {
    pub fn new(chores: Vec<Chore>) -> Self {
        let mut store = Self::default();
        store.load(chores);
        store
    }

    /// Replace the whole collection. Duplicate ids keep their first entry.
    pub fn load(&mut self, chores: Vec<Chore>) {
        let mut seen = HashSet::with_capacity(chores.len());
        self.chores = chores
            .into_iter()
            .filter(|chore| {
                let fresh = seen.insert(chore.id);
                if !fresh {
                    log::warn!(target: "[STORE]", "dropping duplicate chore id {}", chore.id);
                }
                fresh
            })
            .map(normalize)
            .collect();
    }

    pub fn chores(&self) -> &[Chore] {
        &self.chores
    }

    pub fn len(&self) -> usize {
        self.chores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chores.is_empty()
    }

    pub fn find(&self, id: ChoreId) -> Result<&Chore, StoreError> {
        self.chores.iter().find(|c| c.id == id).ok_or(StoreError::NotFound(id))
    }

    fn find_mut(&mut self, id: ChoreId) -> Result<&mut Chore, StoreError> {
        self.chores.iter_mut().find(|c| c.id == id).ok_or(StoreError::NotFound(id))
    }

    /// Set completion state and return what it was before.
    ///
    /// Completing stamps `completed_by`/`completed_at`; un-completing clears
    /// them. A non-empty `comment` replaces the stored one, otherwise the
    /// existing comment is kept.
    pub fn set_completion(
        &mut self,
        id: ChoreId,
        completed: bool,
        staff: &str,
        comment: Option<&str>,
        now: &str,
    ) -> Result<ChoreSnapshot, StoreError> {
        if completed && staff.trim().is_empty() {
            return Err(StoreError::MissingStaff);
        }
        let chore = self.find_mut(id)?;
        let before = ChoreSnapshot::of(chore);

        chore.completed = completed;
        if completed {
            chore.completed_by = Some(staff.to_string());
            chore.completed_at = Some(now.to_string());
        } else {
            chore.completed_by = None;
            chore.completed_at = None;
        }
        if let Some(text) = comment.map(str::trim).filter(|t| !t.is_empty()) {
            chore.comment = Some(text.to_string());
        }
        Ok(before)
    }

    /// Local comment edit on a chore that is not yet ticked
    pub fn set_comment(&mut self, id: ChoreId, comment: &str) -> Result<(), StoreError> {
        let chore = self.find_mut(id)?;
        let trimmed = comment.trim();
        chore.comment = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
        Ok(())
    }

    /// Put back the fields captured by `set_completion`
    pub fn restore(&mut self, snapshot: &ChoreSnapshot) -> Result<(), StoreError> {
        let chore = self.find_mut(snapshot.id)?;
        chore.completed = snapshot.completed;
        chore.completed_by = snapshot.completed_by.clone();
        chore.completed_at = snapshot.completed_at.clone();
        chore.comment = snapshot.comment.clone();
        Ok(())
    }

    /// Clear every completion field, as the reset endpoint does server-side
    pub fn reset_all(&mut self) {
        for chore in &mut self.chores {
            chore.completed = false;
            chore.completed_by = None;
            chore.completed_at = None;
            chore.comment = None;
        }
    }

    pub fn completed_count(&self) -> usize {
        self.chores.iter().filter(|c| c.completed).count()
    }

    /// False for an empty checklist: there is nothing to sign off.
    pub fn all_completed(&self) -> bool {
        !self.chores.is_empty() && self.chores.iter().all(|c| c.completed)
    }

    pub fn section_members(&self, section: &str) -> Vec<ChoreId> {
        self.chores.iter().filter(|c| c.section == section).map(|c| c.id).collect()
    }

    pub fn section_id(&self, section: &str) -> Option<u32> {
        self.chores.iter().find(|c| c.section == section).map(|c| c.section_id)
    }

    pub fn section_completed(&self, section: &str) -> bool {
        let mut members = self.chores.iter().filter(|c| c.section == section).peekable();
        members.peek().is_some() && members.all(|c| c.completed)
    }

    /// Staff who completed at least one chore, in first-seen order
    pub fn contributors(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.chores.iter().filter_map(|c| c.completed_by.as_deref()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// Enforce the completion invariant on data coming from the server
fn normalize(mut chore: Chore) -> Chore {
    if !chore.completed {
        chore.completed_by = None;
        chore.completed_at = None;
    }
    chore
}

/// "Nora", "Nora and Josh", "Nora, Josh, and Dean"
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}
