//! Hereditary score
//!
//! A horse's score is a fold over its pedigree:
//! - no record on file: 0
//! - Hall of Fame: 100, ancestry ignored
//! - otherwise: half the sire's score plus half the dam's score
//!
//! Shared ancestors are counted once per path, not once per horse.
//!
//! The walk is iterative with an explicit stack, so deep pedigrees cannot
//! overflow the call stack. A horse met again while it is still being
//! resolved contributes 0, which keeps the fold finite on a corrupted graph.

use std::collections::{HashMap, HashSet};

use super::id::HorseId;
use super::store::PedigreeStore;

/// Highest possible score, awarded to Hall of Fame horses
pub const MAX_SCORE: f64 = 100.0;

/// Scores horses against one store state, memoizing results
///
/// Create a fresh engine after mutating the store.
pub struct ScoreEngine<'a> {
    store: &'a PedigreeStore,
    memo: HashMap<HorseId, f64>,
}

impl<'a> ScoreEngine<'a> {
    pub fn new(store: &'a PedigreeStore) -> Self {
        Self {
            store,
            memo: HashMap::new(),
        }
    }

    /// Returns the score of `id` in `[0, 100]`
    pub fn score(&mut self, id: &HorseId) -> f64 {
        if let Some(&cached) = self.memo.get(id) {
            return cached;
        }

        enum Step<'s> {
            Enter(&'s HorseId),
            Fold(&'s HorseId),
        }

        let store = self.store;
        let mut stack = vec![Step::Enter(id)];
        let mut in_progress: HashSet<&HorseId> = HashSet::new();

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(current) => {
                    if self.memo.contains_key(current) || in_progress.contains(current) {
                        continue;
                    }

                    let Some(horse) = store.find(current) else {
                        continue;
                    };
                    if horse.is_hall_of_fame {
                        self.memo.insert(current.clone(), MAX_SCORE);
                        continue;
                    }

                    in_progress.insert(current);
                    stack.push(Step::Fold(current));
                    for parent in horse.parents() {
                        stack.push(Step::Enter(parent));
                    }
                }
                Step::Fold(current) => {
                    in_progress.remove(current);

                    let (sire, dam) = match store.find(current) {
                        Some(horse) => (horse.sire_id.as_ref(), horse.dam_id.as_ref()),
                        None => (None, None),
                    };
                    let value = self.lookup(sire) / 2.0 + self.lookup(dam) / 2.0;
                    self.memo.insert(current.clone(), value);
                }
            }
        }

        self.memo.get(id).copied().unwrap_or(0.0)
    }

    /// Resolved score of a parent, 0 for unknown or unresolved ids
    fn lookup(&self, id: Option<&HorseId>) -> f64 {
        id.and_then(|id| self.memo.get(id)).copied().unwrap_or(0.0)
    }
}

/// Scores a single horse
pub fn score(store: &PedigreeStore, id: &HorseId) -> f64 {
    ScoreEngine::new(store).score(id)
}

/// Formats a score for tree labels: at most `precision` decimals, trailing zeros trimmed
pub fn format_score(score: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, score);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    format!("{}%", trimmed)
}

/// Formats a score for the detail view with ten decimals
pub fn format_score_precise(score: f64) -> String {
    format!("{:.10}%", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Horse, Sex};
    use proptest::prelude::*;

    fn id(s: &str) -> HorseId {
        s.parse().unwrap()
    }

    fn store_of(horses: Vec<Horse>) -> PedigreeStore {
        let mut store = PedigreeStore::new();
        for horse in horses {
            store.insert(horse).unwrap();
        }
        store
    }

    #[test]
    fn unknown_horse_scores_zero() {
        let store = PedigreeStore::new();
        assert_eq!(score(&store, &id("h404")), 0.0);
    }

    #[test]
    fn founder_scores_zero() {
        let store = store_of(vec![Horse::new(id("h1"), "Root", Sex::Male)]);
        assert_eq!(score(&store, &id("h1")), 0.0);
    }

    #[test]
    fn hall_of_fame_ignores_parents() {
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male)
                .hall_of_fame(true)
                .with_sire(id("h2")),
            Horse::new(id("h2"), "Sire", Sex::Male),
        ]);
        assert_eq!(score(&store, &id("h1")), 100.0);
    }

    #[test]
    fn three_generation_fixture() {
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male)
                .with_sire(id("h2"))
                .with_dam(id("h3")),
            Horse::new(id("h2"), "Sire", Sex::Male).hall_of_fame(true),
            Horse::new(id("h3"), "Dam", Sex::Female),
        ]);
        assert_eq!(score(&store, &id("h1")), 50.0);
    }

    #[test]
    fn dangling_parent_scores_zero() {
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male)
                .with_sire(id("h2"))
                .with_dam(id("h99")),
            Horse::new(id("h2"), "Sire", Sex::Male).hall_of_fame(true),
        ]);

        assert_eq!(score(&store, &id("h1")), 50.0);
    }

    #[test]
    fn grandparent_contributes_a_quarter() {
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male).with_dam(id("h2")),
            Horse::new(id("h2"), "Dam", Sex::Female).with_sire(id("h3")),
            Horse::new(id("h3"), "Grandsire", Sex::Male).hall_of_fame(true),
        ]);
        assert_eq!(score(&store, &id("h1")), 25.0);
    }

    #[test]
    fn shared_ancestor_is_counted_per_path() {
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male)
                .with_sire(id("h2"))
                .with_dam(id("h3")),
            Horse::new(id("h2"), "Sire", Sex::Male).with_sire(id("h4")),
            Horse::new(id("h3"), "Dam", Sex::Female).with_sire(id("h4")),
            Horse::new(id("h4"), "Grandsire", Sex::Male).hall_of_fame(true),
        ]);
        assert_eq!(score(&store, &id("h1")), 50.0);
    }

    #[test]
    fn cycle_terminates() {
        // Built by hand; validated stores never contain this
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male).with_sire(id("h2")),
            Horse::new(id("h2"), "Loop", Sex::Male).with_sire(id("h1")),
        ]);
        assert_eq!(score(&store, &id("h1")), 0.0);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let depth = 100_000;
        let mut horses = Vec::with_capacity(depth);
        for n in 1..depth as u64 {
            horses.push(Horse::new(HorseId::numbered(n), "Link", Sex::Male).with_sire(HorseId::numbered(n + 1)));
        }
        horses.push(Horse::new(HorseId::numbered(depth as u64), "Founder", Sex::Male).hall_of_fame(true));
        let store = store_of(horses);

        let value = score(&store, &HorseId::root());
        assert!((0.0..=MAX_SCORE).contains(&value));
    }

    #[test]
    fn engine_memoizes_across_calls() {
        let store = store_of(vec![
            Horse::new(id("h1"), "Root", Sex::Male).with_sire(id("h2")),
            Horse::new(id("h2"), "Sire", Sex::Male).hall_of_fame(true),
        ]);
        let mut engine = ScoreEngine::new(&store);

        assert_eq!(engine.score(&id("h1")), 50.0);
        assert_eq!(engine.score(&id("h2")), 100.0);
        assert_eq!(engine.score(&id("h1")), 50.0);
    }

    #[test]
    fn formats_scores() {
        assert_eq!(format_score(50.0, 2), "50%");
        assert_eq!(format_score(37.5, 2), "37.5%");
        assert_eq!(format_score(100.0 / 3.0, 2), "33.33%");
        assert_eq!(format_score(12.0, 0), "12%");
        assert_eq!(format_score_precise(50.0), "50.0000000000%");
    }

    proptest! {
        #[test]
        fn score_matches_parent_average(
            sire_hof in any::<bool>(),
            dam_hof in any::<bool>(),
            has_sire in any::<bool>(),
            has_dam in any::<bool>(),
        ) {
            let mut root = Horse::new(id("h1"), "Root", Sex::Male);
            if has_sire {
                root = root.with_sire(id("h2"));
            }
            if has_dam {
                root = root.with_dam(id("h3"));
            }
            let store = store_of(vec![
                root,
                Horse::new(id("h2"), "Sire", Sex::Male).hall_of_fame(sire_hof),
                Horse::new(id("h3"), "Dam", Sex::Female).hall_of_fame(dam_hof),
            ]);

            let sire = if has_sire { score(&store, &id("h2")) } else { 0.0 };
            let dam = if has_dam { score(&store, &id("h3")) } else { 0.0 };
            prop_assert_eq!(score(&store, &id("h1")), (sire + dam) / 2.0);
        }

        #[test]
        fn hall_of_fame_always_scores_max(parent_hof in any::<bool>()) {
            let store = store_of(vec![
                Horse::new(id("h1"), "Root", Sex::Male)
                    .hall_of_fame(true)
                    .with_sire(id("h2")),
                Horse::new(id("h2"), "Sire", Sex::Male).hall_of_fame(parent_hof),
            ]);
            prop_assert_eq!(score(&store, &id("h1")), MAX_SCORE);
        }
    }
}
