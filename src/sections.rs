//! Section Grouping
//!
//! Helpers for rendering chores grouped by section.

use std::collections::HashMap;

use crate::chores::ChoreStore;
use crate::models::{Chore, ChoreId};

/// Aggregate state of a section's header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl SectionState {
    pub fn from_counts(done: usize, total: usize) -> Self {
        if total > 0 && done == total {
            SectionState::Checked
        } else if done > 0 {
            SectionState::Indeterminate
        } else {
            SectionState::Unchecked
        }
    }

    pub fn checked(self) -> bool {
        self == SectionState::Checked
    }

    pub fn indeterminate(self) -> bool {
        self == SectionState::Indeterminate
    }
}

/// Current state of one section's header checkbox
pub fn section_state(store: &ChoreStore, section: &str) -> SectionState {
    let members = store.chores().iter().filter(|c| c.section == section);
    let (done, total) = members.fold((0, 0), |(done, total), c| (done + usize::from(c.completed), total + 1));
    SectionState::from_counts(done, total)
}

/// One rendered section: name, aggregate state and its chore ids in display order
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub name: String,
    pub section_id: u32,
    pub state: SectionState,
    pub chore_ids: Vec<ChoreId>,
}

/// Group chores by section name.
///
/// Sections appear in the order their first chore appears; chores inside a
/// section are sorted by `order` (stable, so ties keep input order).
pub fn group_sections(chores: &[Chore]) -> Vec<SectionView> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Chore>)> = Vec::new();

    for chore in chores {
        let slot = *index.entry(chore.section.as_str()).or_insert_with(|| {
            groups.push((chore.section.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(chore);
    }

    groups
        .into_iter()
        .map(|(name, mut members)| {
            members.sort_by_key(|c| c.order);
            let done = members.iter().filter(|c| c.completed).count();
            SectionView {
                name: name.to_string(),
                section_id: members.first().map(|c| c.section_id).unwrap_or_default(),
                state: SectionState::from_counts(done, members.len()),
                chore_ids: members.iter().map(|c| c.id).collect(),
            }
        })
        .collect()
}
