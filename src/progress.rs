//! Progress & Feedback
//!
//! Completion percentage, encouragement tiers, one-shot milestone
//! notifications and periodic fun facts, all derived from the chore store.

use std::collections::BTreeSet;

use crate::chores::ChoreStore;

#[derive(Debug, PartialEq, Eq)]
pub struct Tier {
    /// Percent at which the tier starts
    pub threshold: u8,
    pub emoji: &'static str,
    pub message: &'static str,
}

pub const TIERS: [Tier; 5] = [
    Tier { threshold: 0, emoji: "🌱", message: "Let's get started!" },
    Tier { threshold: 25, emoji: "🌿", message: "Great progress!" },
    Tier { threshold: 50, emoji: "🌳", message: "Halfway there!" },
    Tier { threshold: 75, emoji: "🌺", message: "Almost done!" },
    Tier { threshold: 100, emoji: "🎉", message: "Amazing work!" },
];

pub const FUN_FACTS: [&str; 10] = [
    "Did you know? The oldest pub in England is Ye Olde Man & Scythe in Bolton, dating back to 1251!",
    "The world's strongest beer is 'Snake Venom' at 67.5% alcohol by volume!",
    "The first beer was brewed in Mesopotamia around 4000 BC!",
    "The most expensive beer ever sold was a bottle of 'Allsopp's Arctic Ale' for $503,300!",
    "The longest bar in the world is in New Orleans, measuring 130.6 meters!",
    "The first Oktoberfest was actually a wedding celebration for Crown Prince Ludwig in 1810!",
    "The term 'pub' comes from 'public house'!",
    "The world's largest beer festival is Oktoberfest in Munich!",
    "The first beer cans were introduced in 1935!",
    "The world's most popular beer style is lager!",
];

/// `completed / total * 100`, or 0 for an empty checklist
pub fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed.min(total) as f64 / total as f64) * 100.0
}

/// Highest tier whose threshold is at or below `percent`
pub fn tier_for(percent: f64) -> &'static Tier {
    TIERS
        .iter()
        .rev()
        .find(|t| percent >= f64::from(t.threshold))
        .unwrap_or(&TIERS[0])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
    pub tier: &'static Tier,
    pub all_completed: bool,
}

impl Progress {
    pub fn of(store: &ChoreStore) -> Self {
        let completed = store.completed_count();
        let total = store.len();
        let percent = percent(completed, total);
        Self {
            completed,
            total,
            percent,
            tier: tier_for(percent),
            all_completed: store.all_completed(),
        }
    }

    pub fn rounded(&self) -> u32 {
        self.percent.round() as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Milestone(&'static Tier),
    FunFact { completed: usize, fact: &'static str },
}

/// Remembers what has been announced this session
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    fun_fact_every: usize,
    shown_tiers: BTreeSet<u8>,
    /// Highest `completed / fun_fact_every` announced so far
    fact_level: usize,
    last_fact: Option<usize>,
}

impl ProgressTracker {
    pub fn new(fun_fact_every: usize) -> Self {
        Self {
            fun_fact_every,
            shown_tiers: BTreeSet::new(),
            fact_level: 0,
            last_fact: None,
        }
    }

    /// Compute progress at a settle point and return anything newly worth
    /// announcing. The 0% tier is never announced.
    pub fn observe(&mut self, store: &ChoreStore) -> (Progress, Vec<Notification>) {
        let progress = Progress::of(store);
        let mut notes = Vec::new();

        let tier = progress.tier;
        if tier.threshold > 0 && self.shown_tiers.insert(tier.threshold) {
            notes.push(Notification::Milestone(tier));
        }

        let every = self.fun_fact_every;
        if every > 0 {
            // A settle point may jump past a multiple of `every`.
            let level = progress.completed / every;
            if level > self.fact_level {
                self.fact_level = level;
                notes.push(Notification::FunFact {
                    completed: progress.completed,
                    fact: self.next_fact(),
                });
            }
        }

        (progress, notes)
    }

    /// Rotates through the list so the same fact never shows twice in a row
    fn next_fact(&mut self) -> &'static str {
        let index = self.last_fact.map_or(0, |i| (i + 1) % FUN_FACTS.len());
        self.last_fact = Some(index);
        FUN_FACTS[index]
    }

    /// Forget announcements, e.g. after the checklist is reset
    pub fn reset(&mut self) {
        self.shown_tiers.clear();
        self.fact_level = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chores::tests::{make_chore, sample_store};

    fn complete(store: &mut ChoreStore, ids: &[u32]) {
        for id in ids {
            store.set_completion(*id, true, "Josh", None, "t").unwrap();
        }
    }

    fn milestones(notes: &[Notification]) -> Vec<u8> {
        notes
            .iter()
            .filter_map(|n| match n {
                Notification::Milestone(t) => Some(t.threshold),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(0, 4), 0.0);
        assert_eq!(percent(2, 4), 50.0);
        assert_eq!(percent(4, 4), 100.0);
        assert_eq!(percent(9, 4), 100.0);
    }

    #[test]
    fn test_tier_for() {
        assert_eq!(tier_for(0.0).threshold, 0);
        assert_eq!(tier_for(24.9).threshold, 0);
        assert_eq!(tier_for(25.0).threshold, 25);
        assert_eq!(tier_for(66.7).threshold, 50);
        assert_eq!(tier_for(99.9).threshold, 75);
        assert_eq!(tier_for(100.0).message, "Amazing work!");
    }

    #[test]
    fn test_empty_store_progress() {
        let progress = Progress::of(&ChoreStore::default());
        assert_eq!(progress.percent, 0.0);
        assert!(!progress.all_completed);
    }

    #[test]
    fn test_hundred_percent_iff_all_completed() {
        let mut store = sample_store();
        complete(&mut store, &[1, 2, 3]);
        assert!(!Progress::of(&store).all_completed);
        complete(&mut store, &[4]);
        let progress = Progress::of(&store);
        assert_eq!(progress.percent, 100.0);
        assert!(progress.all_completed);
    }

    #[test]
    fn test_bar_section_scenario() {
        // 4 chores, both Bar chores ticked at once by Josh
        let mut store = sample_store();
        let mut tracker = ProgressTracker::new(5);
        complete(&mut store, &[1, 2]);

        let (progress, notes) = tracker.observe(&store);
        assert_eq!(progress.percent, 50.0);
        assert!(store.section_completed("Bar"));
        assert_eq!(milestones(&notes), vec![50]);

        let (_, again) = tracker.observe(&store);
        assert!(again.is_empty());
    }

    #[test]
    fn test_milestone_once_per_session() {
        let mut store = sample_store();
        let mut tracker = ProgressTracker::new(0);

        complete(&mut store, &[1]);
        assert_eq!(milestones(&tracker.observe(&store).1), vec![25]);
        complete(&mut store, &[2]);
        assert_eq!(milestones(&tracker.observe(&store).1), vec![50]);
        store.set_completion(2, false, "Josh", None, "t").unwrap();
        assert!(tracker.observe(&store).1.is_empty());
        complete(&mut store, &[2]);
        assert!(tracker.observe(&store).1.is_empty());

        tracker.reset();
        assert_eq!(milestones(&tracker.observe(&store).1), vec![50]);
    }

    #[test]
    fn test_fun_fact_every_n_without_repeats() {
        let chores = (1..=10).map(|id| make_chore(id, "Bar", id as i32)).collect();
        let mut store = ChoreStore::new(chores);
        let mut tracker = ProgressTracker::new(5);
        let mut facts = Vec::new();

        for id in 1..=10 {
            complete(&mut store, &[id]);
            for note in tracker.observe(&store).1 {
                if let Notification::FunFact { completed, fact } = note {
                    facts.push((completed, fact));
                }
            }
        }

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].0, 5);
        assert_eq!(facts[1].0, 10);
        assert_ne!(facts[0].1, facts[1].1);

        // dropping back to 5 does not repeat the checkpoint
        for id in 6..=10 {
            store.set_completion(id, false, "Josh", None, "t").unwrap();
        }
        assert!(tracker
            .observe(&store)
            .1
            .iter()
            .all(|n| !matches!(n, Notification::FunFact { .. })));
    }

    #[test]
    fn test_fun_fact_when_settle_jumps_past_checkpoint() {
        let chores = (1..=8).map(|id| make_chore(id, "Bar", id as i32)).collect();
        let mut store = ChoreStore::new(chores);
        let mut tracker = ProgressTracker::new(5);

        complete(&mut store, &[1, 2, 3, 4]);
        assert!(tracker.observe(&store).1.iter().all(|n| !matches!(n, Notification::FunFact { .. })));

        complete(&mut store, &[5, 6]);
        let notes = tracker.observe(&store).1;
        assert!(notes.contains(&Notification::FunFact { completed: 6, fact: FUN_FACTS[0] }));

        complete(&mut store, &[7]);
        assert!(tracker.observe(&store).1.iter().all(|n| !matches!(n, Notification::FunFact { .. })));
    }
}
