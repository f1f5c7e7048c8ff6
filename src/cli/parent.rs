//! Parent link CLI commands (add-parent, link, unlink, prune)

use anyhow::Result;

use super::output::Output;
use crate::domain::{Change, HorseId, ParentRole, Pedigree};
use crate::storage::Workspace;

/// Reports horses swept by the reachability pass
fn report_pruned(output: &Output, change: &Change) {
    if !change.pruned.is_empty() {
        output.verbose_ctx(
            "prune",
            &format!("Deleted {} loose nodes: {:?}", change.pruned.len(), change.pruned),
        );
    }
}

fn change_json(pedigree: &Pedigree, change: &Change) -> serde_json::Value {
    let score = change
        .subject
        .as_ref()
        .map(|id| pedigree.score(id));

    serde_json::json!({
        "id": change.subject,
        "created": change.created,
        "pruned": change.pruned,
        "score": score,
    })
}

/// Create a new horse and link it as sire or dam
pub fn add(output: &Output, child: &HorseId, role: ParentRole, name: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let mut pedigree = workspace.load()?;

    let change = pedigree.add_parent(child, role, name)?;
    workspace.save(&pedigree)?;

    if output.is_json() {
        output.data(&change_json(&pedigree, &change));
    } else if let Some(created) = &change.created {
        let horse = pedigree.horse(created)?;
        output.success(&format!(
            "Created {}: {} - {} ({})",
            role, horse.id, horse.name, horse.sex
        ));
    }

    Ok(())
}

/// Link an existing horse as sire or dam
pub fn link(output: &Output, child: &HorseId, role: ParentRole, parent: &HorseId) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let mut pedigree = workspace.load()?;
    output.verbose_ctx("link", &format!("Checking lineage of {} before linking {}", child, parent));

    let change = pedigree.link_parent(child, role, parent)?;
    workspace.save(&pedigree)?;
    report_pruned(output, &change);

    if output.is_json() {
        output.data(&change_json(&pedigree, &change));
    } else {
        output.success(&format!("Linked {} as {} of {}", parent, role, child));
        if !change.pruned.is_empty() {
            println!(
                "Removed {} horse(s) no longer connected to the root",
                change.pruned.len()
            );
        }
    }

    Ok(())
}

/// Remove a sire or dam link and sweep orphaned horses
pub fn unlink(output: &Output, child: &HorseId, role: ParentRole) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let mut pedigree = workspace.load()?;

    let previous = pedigree.horse(child)?.parent(role).cloned();
    let Some(previous) = previous else {
        output.success(&format!("{} has no {}", child, role));
        return Ok(());
    };

    let change = pedigree.remove_parent(child, role)?;
    workspace.save(&pedigree)?;
    report_pruned(output, &change);

    if output.is_json() {
        output.data(&change_json(&pedigree, &change));
    } else {
        output.success(&format!("Removed {} {} from {}", role, previous, child));
        if !change.pruned.is_empty() {
            println!(
                "Removed {} horse(s) no longer connected to the root",
                change.pruned.len()
            );
        }
    }

    Ok(())
}

/// Remove every horse the root can't reach
pub fn prune(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let mut pedigree = workspace.load()?;

    let pruned = pedigree.prune();
    if !pruned.is_empty() {
        workspace.save(&pedigree)?;
    }
    output.verbose_ctx("prune", &format!("Deleted {} loose nodes.", pruned.len()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "pruned": pruned,
            "remaining": pedigree.store().len(),
        }));
    } else {
        output.success(&format!(
            "Removed {} horse(s), {} remaining",
            pruned.len(),
            pedigree.store().len()
        ));
    }

    Ok(())
}
