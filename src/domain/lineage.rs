//! Lineage checks
//!
//! Guards parent links against making a horse its own ancestor. Linking
//! `parent` under `child` is safe unless `child` already appears among the
//! ancestors of `parent` (or they are the same horse).

use std::collections::HashSet;

use super::id::HorseId;
use super::store::PedigreeStore;

/// Returns true if making `candidate` a parent of `child` would close a cycle
///
/// A missing candidate never does. Ids without a record end their branch.
pub fn would_create_cycle(
    store: &PedigreeStore,
    child: &HorseId,
    candidate: Option<&HorseId>,
) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    if candidate == child {
        return true;
    }

    let mut stack = vec![candidate];
    let mut visited: HashSet<&HorseId> = HashSet::new();

    while let Some(current) = stack.pop() {
        if current == child {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(horse) = store.find(current) {
            stack.extend(horse.parents());
        }
    }

    false
}

/// Returns every known ancestor of `id`, nearest generations first
///
/// Ids referenced but missing from the store are left out.
pub fn ancestors(store: &PedigreeStore, id: &HorseId) -> Vec<HorseId> {
    let mut result = Vec::new();
    let mut visited: HashSet<&HorseId> = HashSet::from([id]);
    let mut frontier: Vec<&HorseId> = vec![id];

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for current in frontier {
            let Some(horse) = store.find(current) else {
                continue;
            };
            for parent in horse.parents() {
                if store.contains(parent) && visited.insert(parent) {
                    result.push(parent.clone());
                    next.push(parent);
                }
            }
        }
        frontier = next;
    }

    result
}
