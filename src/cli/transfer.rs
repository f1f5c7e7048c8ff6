//! Import, export and reset commands

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::{Pedigree, Sex};
use crate::storage::{codec, Workspace};

/// Export the pedigree as pretty-printed JSON
pub fn export(output: &Output, path: Option<&Path>) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let pedigree = workspace.load()?;

    let text = codec::export(&pedigree.snapshot()).context("Failed to serialize pedigree")?;

    match path {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            output.verbose_ctx("export", &format!("Wrote {} bytes", text.len() + 1));

            if output.is_json() {
                output.data(&serde_json::json!({
                    "path": path.display().to_string(),
                    "horses": pedigree.store().len(),
                }));
            } else {
                output.success(&format!(
                    "Exported {} horse(s) to {}",
                    pedigree.store().len(),
                    path.display()
                ));
            }
        }
        // The export itself is JSON, so no wrapping in either format
        None => println!("{}", text),
    }

    Ok(())
}

/// Replace the pedigree with the contents of an export file
///
/// The saved pedigree is never read, so a backup can be restored over a
/// corrupt or missing snapshot. Nothing is saved unless the file parses and
/// passes validation.
pub fn import(output: &Output, path: &Path) -> Result<()> {
    let workspace = Workspace::open_current()?;

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let horses = codec::import(&text)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    output.verbose_ctx("import", &format!("Parsed {} horses", horses.len()));

    let pedigree = Pedigree::from_snapshot(horses)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    workspace.save(&pedigree)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "imported": pedigree.store().len(),
        }));
    } else {
        output.success(&format!("Imported {} horse(s)", pedigree.store().len()));
    }

    Ok(())
}

/// Discard the pedigree and bootstrap a new root
pub fn reset(output: &Output, force: bool, name: Option<&str>, sex: Sex) -> Result<()> {
    if !force {
        bail!("Reset discards every horse. Re-run with --force to confirm.");
    }

    let workspace = Workspace::open_current()?;
    let pedigree = workspace.reset(name, sex)?;
    let root = pedigree.horse(&pedigree.root())?;
    output.verbose_ctx(
        "reset",
        &format!("Snapshot rewritten at {}", workspace.snapshot_store().path().display()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": root.id,
            "name": root.name,
            "sex": root.sex,
        }));
    } else {
        output.success(&format!("Started a new pedigree with {} ({})", root.name, root.id));
    }

    Ok(())
}
