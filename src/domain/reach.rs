//! Reachability collection
//!
//! Horses only stay in a pedigree while the root can reach them through
//! sire/dam links. After a link is removed, everything that fell off is swept.

use std::collections::HashSet;

use super::id::HorseId;
use super::store::PedigreeStore;

/// Returns the ids reachable from `root`, including `root` itself
///
/// The root counts as reachable even when it has no record.
pub fn collect_reachable(store: &PedigreeStore, root: &HorseId) -> HashSet<HorseId> {
    let mut reachable = HashSet::new();
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        if !reachable.insert(current.clone()) {
            continue;
        }
        if let Some(horse) = store.find(current) {
            stack.extend(horse.parents().filter(|p| !reachable.contains(*p)));
        }
    }

    reachable
}

/// Removes every horse the root can't reach and returns the removed ids
pub fn prune_unreachable(store: &mut PedigreeStore, root: &HorseId) -> Vec<HorseId> {
    let reachable = collect_reachable(store, root);
    let doomed: Vec<HorseId> = store
        .ids()
        .filter(|id| !reachable.contains(*id))
        .cloned()
        .collect();

    if !doomed.is_empty() {
        let removed = store.delete(&doomed.iter().cloned().collect());
        debug_assert_eq!(removed, doomed.len());
    }

    doomed
}
