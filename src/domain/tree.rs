//! Pedigree hierarchy for display
//!
//! Builds a nested view rooted at one horse where each node's children are
//! its sire and dam (in that order), annotated with scores. A horse that
//! appears through two lines of descent shows up under both.

use serde::Serialize;
use std::collections::HashSet;

use super::horse::Sex;
use super::id::HorseId;
use super::score::ScoreEngine;
use super::store::PedigreeStore;

/// One horse in a display hierarchy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseNode {
    pub id: HorseId,
    pub name: String,
    pub sex: Sex,
    pub is_hall_of_fame: bool,
    pub score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HorseNode>,
}

impl HorseNode {
    /// Total number of nodes in this subtree
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of nodes per generation, starting with this node's generation
    pub fn generation_widths(&self) -> Vec<usize> {
        let mut widths = Vec::new();
        let mut level = vec![self];
        while !level.is_empty() {
            widths.push(level.len());
            level = level.iter().flat_map(|n| n.children.iter()).collect();
        }
        widths
    }
}

/// Flat entry used while expanding the hierarchy
struct Slot {
    node: HorseNode,
    parent: Option<usize>,
}

/// Builds the hierarchy rooted at `root`, or `None` if it has no record
///
/// Expansion runs on an explicit work list. A horse already on the path
/// from the root is not expanded again, so corrupted data still yields a
/// finite tree. Building and dropping the result don't recurse; serializing
/// it does, one level per generation.
pub fn build_tree(store: &PedigreeStore, root: &HorseId) -> Option<HorseNode> {
    let mut scores = ScoreEngine::new(store);
    build_tree_with(store, &mut scores, root)
}

/// Same as [`build_tree`], reusing an existing score engine
pub fn build_tree_with(
    store: &PedigreeStore,
    scores: &mut ScoreEngine<'_>,
    root: &HorseId,
) -> Option<HorseNode> {
    store.find(root)?;

    let mut slots: Vec<Slot> = Vec::new();
    let mut work: Vec<(&HorseId, Option<usize>)> = vec![(root, None)];

    // Slots from the root down to the node being expanded
    let mut path: Vec<usize> = Vec::new();
    let mut on_path: HashSet<&HorseId> = HashSet::new();

    while let Some((id, parent)) = work.pop() {
        // Depth-first order: the parent is always somewhere on the path
        while path.last().copied() != parent {
            let Some(left) = path.pop() else { break };
            on_path.remove(&slots[left].node.id);
        }

        let Some(horse) = store.find(id) else {
            continue;
        };
        if on_path.contains(id) {
            continue;
        }

        let pos = slots.len();
        slots.push(Slot {
            node: HorseNode {
                id: horse.id.clone(),
                name: horse.name.clone(),
                sex: horse.sex,
                is_hall_of_fame: horse.is_hall_of_fame,
                score: scores.score(id),
                children: Vec::new(),
            },
            parent,
        });
        path.push(pos);
        on_path.insert(&horse.id);

        // Dam pushed first so the sire is expanded first
        for parent_id in horse.dam_id.iter().chain(horse.sire_id.iter()) {
            work.push((parent_id, Some(pos)));
        }
    }

    // Children always sit after their parent slot; fold back to front
    while slots.len() > 1 {
        let Some(slot) = slots.pop() else { break };
        if let Some(parent) = slot.parent {
            slots[parent].node.children.insert(0, slot.node);
        }
    }

    slots.pop().map(|slot| slot.node)
}

impl Drop for HorseNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Horse;

    fn id(s: &str) -> HorseId {
        s.parse().unwrap()
    }

    fn fixture() -> PedigreeStore {
        PedigreeStore::from_horses(vec![
            Horse::new(id("h1"), "Root", Sex::Male)
                .with_sire(id("h2"))
                .with_dam(id("h3")),
            Horse::new(id("h2"), "Sire", Sex::Male).hall_of_fame(true),
            Horse::new(id("h3"), "Dam", Sex::Female).with_dam(id("h4")),
            Horse::new(id("h4"), "Granddam", Sex::Female),
        ])
        .unwrap()
    }

    #[test]
    fn builds_sire_before_dam() {
        let store = fixture();
        let tree = build_tree(&store, &id("h1")).unwrap();

        assert_eq!(tree.id, id("h1"));
        assert_eq!(tree.score, 50.0);
        let children: Vec<_> = tree.children.iter().map(|c| c.id.clone()).collect();
        assert_eq!(children, vec![id("h2"), id("h3")]);
        assert_eq!(tree.children[1].children[0].id, id("h4"));
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn subtree_from_any_horse() {
        let store = fixture();
        let tree = build_tree(&store, &id("h3")).unwrap();

        assert_eq!(tree.size(), 2);
        assert_eq!(tree.generation_widths(), vec![1, 1]);
    }

    #[test]
    fn missing_root_yields_none() {
        let store = fixture();
        assert!(build_tree(&store, &id("nope")).is_none());
    }

    #[test]
    fn generation_widths_count_levels() {
        let store = fixture();
        let tree = build_tree(&store, &id("h1")).unwrap();

        assert_eq!(tree.generation_widths(), vec![1, 2, 1]);
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn shared_ancestor_appears_twice() {
        let store = PedigreeStore::from_horses(vec![
            Horse::new(id("h1"), "Root", Sex::Male)
                .with_sire(id("h2"))
                .with_dam(id("h3")),
            Horse::new(id("h2"), "Sire", Sex::Male).with_sire(id("h4")),
            Horse::new(id("h3"), "Dam", Sex::Female).with_sire(id("h4")),
            Horse::new(id("h4"), "Grandsire", Sex::Male),
        ])
        .unwrap();

        let tree = build_tree(&store, &id("h1")).unwrap();
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.generation_widths(), vec![1, 2, 2]);
    }

    #[test]
    fn cycle_is_cut() {
        let mut store = PedigreeStore::new();
        store
            .insert(Horse::new(id("h1"), "Root", Sex::Male).with_sire(id("h2")))
            .unwrap();
        store
            .insert(Horse::new(id("h2"), "Loop", Sex::Male).with_sire(id("h1")))
            .unwrap();

        let tree = build_tree(&store, &id("h1")).unwrap();
        assert_eq!(tree.size(), 2);
    }

    #[test]
    fn deep_chain_builds_and_drops() {
        let depth: u64 = 50_000;
        let mut store = PedigreeStore::new();
        for n in 1..depth {
            store
                .insert(Horse::new(HorseId::numbered(n), "Link", Sex::Male).with_sire(HorseId::numbered(n + 1)))
                .unwrap();
        }
        store
            .insert(Horse::new(HorseId::numbered(depth), "Founder", Sex::Male))
            .unwrap();

        let tree = build_tree(&store, &HorseId::root()).unwrap();
        assert_eq!(tree.size(), depth as usize);
        assert_eq!(tree.generation_widths().len(), depth as usize);
        drop(tree);
    }

    #[test]
    fn cycle_below_root_is_cut_once() {
        // h2 and h3 are each other's sire; each branch stops at the repeat
        let mut store = PedigreeStore::new();
        store
            .insert(
                Horse::new(id("h1"), "Root", Sex::Male)
                    .with_sire(id("h2"))
                    .with_dam(id("h4")),
            )
            .unwrap();
        store
            .insert(Horse::new(id("h2"), "A", Sex::Male).with_sire(id("h3")))
            .unwrap();
        store
            .insert(Horse::new(id("h3"), "B", Sex::Male).with_sire(id("h2")))
            .unwrap();
        store
            .insert(Horse::new(id("h4"), "Dam", Sex::Female).with_sire(id("h3")))
            .unwrap();

        let tree = build_tree(&store, &id("h1")).unwrap();
        // h1, h2, h3 on the sire side; h4, h3, h2 on the dam side
        assert_eq!(tree.size(), 6);
        assert_eq!(tree.generation_widths(), vec![1, 2, 2, 1]);
    }

    #[test]
    fn serializes_without_empty_children() {
        let store = fixture();
        let tree = build_tree(&store, &id("h2")).unwrap();
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(value["id"], "h2");
        assert_eq!(value["score"], 100.0);
        assert!(value.get("children").is_none());
    }
}
