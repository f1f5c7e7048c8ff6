//! Horse CLI commands (list, show, tree, score, rename, hof)

use anyhow::Result;

use super::output::Output;
use crate::domain::{
    format_score, format_score_precise, Horse, HorseId, HorseNode, ParentRole, Pedigree,
    ScoreEngine, Sex,
};
use crate::storage::Workspace;

fn sex_symbol(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => "♂",
        Sex::Female => "♀",
    }
}

/// Formats `Name (id)` for a parent slot, or `-` when unknown
fn parent_label(pedigree: &Pedigree, horse: &Horse, role: ParentRole) -> String {
    match horse.parent(role) {
        Some(id) => match pedigree.horse(id) {
            Ok(parent) => format!("{} ({})", parent.name, parent.id),
            Err(_) => format!("unknown ({})", id),
        },
        None => "-".to_string(),
    }
}

/// List all horses
pub fn list(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let pedigree = workspace.load()?;
    output.verbose_ctx("list", &format!("Loaded {} horses", pedigree.store().len()));

    let mut scores = ScoreEngine::new(pedigree.store());
    let rows: Vec<(&Horse, f64)> = pedigree
        .store()
        .iter()
        .map(|h| (h, scores.score(&h.id)))
        .collect();

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(h, score)| {
                serde_json::json!({
                    "id": h.id,
                    "name": h.name,
                    "sex": h.sex,
                    "isHoF": h.is_hall_of_fame,
                    "sireId": h.sire_id,
                    "damId": h.dam_id,
                    "score": score,
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!("{:<10} {:<24} {:<7} {:<4} SCORE", "ID", "NAME", "SEX", "HOF");
        println!("{}", "-".repeat(60));
        for (h, score) in &rows {
            println!(
                "{:<10} {:<24} {:<7} {:<4} {}",
                h.id,
                h.name,
                h.sex,
                if h.is_hall_of_fame { "yes" } else { "" },
                format_score(*score, output.precision())
            );
        }
        println!();
        println!("{} horse(s)", rows.len());
    }

    Ok(())
}

/// Show details for a horse, including link candidates
pub fn show(output: &Output, id: &HorseId) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let pedigree = workspace.load()?;

    let horse = pedigree.horse(id)?;
    let score = pedigree.score(id);
    let ancestors = pedigree.ancestors(id)?;
    let sire_candidates = pedigree.candidates(id, ParentRole::Sire)?;
    let dam_candidates = pedigree.candidates(id, ParentRole::Dam)?;
    output.verbose_ctx(
        "show",
        &format!(
            "{} ancestors, {} sire and {} dam candidates",
            ancestors.len(),
            sire_candidates.len(),
            dam_candidates.len()
        ),
    );

    if output.is_json() {
        let summary = |h: &&Horse| serde_json::json!({ "id": h.id, "name": h.name });
        output.data(&serde_json::json!({
            "id": horse.id,
            "name": horse.name,
            "sex": horse.sex,
            "isHoF": horse.is_hall_of_fame,
            "score": score,
            "sireId": horse.sire_id,
            "damId": horse.dam_id,
            "ancestors": ancestors,
            "sireCandidates": sire_candidates.iter().map(summary).collect::<Vec<_>>(),
            "damCandidates": dam_candidates.iter().map(summary).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    println!("Name:         {}", horse.name);
    println!("ID:           {}", horse.id);
    println!("Sex:          {}", horse.sex);
    println!(
        "Hall of Fame: {}",
        if horse.is_hall_of_fame { "Yes (100%)" } else { "No" }
    );
    println!("Score:        {}", format_score_precise(score));
    println!("Sire:         {}", parent_label(&pedigree, horse, ParentRole::Sire));
    println!("Dam:          {}", parent_label(&pedigree, horse, ParentRole::Dam));
    println!("Ancestors:    {}", ancestors.len());

    for (role, candidates) in [
        (ParentRole::Sire, &sire_candidates),
        (ParentRole::Dam, &dam_candidates),
    ] {
        if candidates.is_empty() {
            continue;
        }
        println!();
        println!("Possible {}s:", role);
        for candidate in candidates.iter() {
            println!("  {:<10} {}", candidate.id, candidate.name);
        }
    }

    Ok(())
}

/// Renders a hierarchy as indented text lines
pub(crate) fn render_tree(root: &HorseNode, precision: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack: Vec<(&HorseNode, String, Option<bool>)> = vec![(root, String::new(), None)];

    while let Some((node, prefix, last)) = stack.pop() {
        let (branch, child_prefix) = match last {
            None => (String::new(), String::new()),
            Some(true) => (format!("{}└── ", prefix), format!("{}    ", prefix)),
            Some(false) => (format!("{}├── ", prefix), format!("{}│   ", prefix)),
        };

        let mut label = format!(
            "{}{} ({}) {} {}",
            branch,
            node.name,
            node.id,
            sex_symbol(node.sex),
            format_score(node.score, precision)
        );
        if node.is_hall_of_fame {
            label.push_str(" [HoF]");
        }
        lines.push(label);

        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate().rev() {
            stack.push((child, child_prefix.clone(), Some(i + 1 == count)));
        }
    }

    lines
}

/// Show the pedigree tree
pub fn tree(output: &Output, root: Option<HorseId>) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let pedigree = workspace.load()?;

    let root = root.unwrap_or_else(|| pedigree.root());
    let tree = pedigree.tree(&root)?;
    output.verbose_ctx(
        "tree",
        &format!(
            "{} nodes, generation widths {:?}",
            tree.size(),
            tree.generation_widths()
        ),
    );

    if output.is_json() {
        output.data(&tree);
    } else {
        for line in render_tree(&tree, output.precision()) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Print the score of a horse
///
/// Unknown ids score 0, the same as a missing parent.
pub fn score(output: &Output, id: &HorseId) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let pedigree = workspace.load()?;

    if !pedigree.store().contains(id) {
        output.verbose_ctx("score", &format!("No horse {}, scoring 0", id));
    }
    let score = pedigree.score(id);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "score": score,
        }));
    } else {
        println!("{}", format_score(score, output.precision()));
    }

    Ok(())
}

/// Rename a horse
pub fn rename(output: &Output, id: &HorseId, name: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let mut pedigree = workspace.load()?;

    pedigree.rename(id, name)?;
    workspace.save(&pedigree)?;

    let horse = pedigree.horse(id)?;
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": horse.id,
            "name": horse.name,
        }));
    } else {
        output.success(&format!("Renamed {} to {}", horse.id, horse.name));
    }

    Ok(())
}

/// Toggle the Hall of Fame flag
pub fn toggle_hall_of_fame(output: &Output, id: &HorseId) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let mut pedigree = workspace.load()?;

    let (state, _) = pedigree.toggle_hall_of_fame(id)?;
    workspace.save(&pedigree)?;
    output.verbose_ctx(
        "hof",
        &format!("{} is now {} the Hall of Fame", id, if state { "in" } else { "out of" }),
    );

    let score = pedigree.score(id);
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "isHoF": state,
            "score": score,
        }));
    } else if state {
        output.success(&format!("{} added to the Hall of Fame", id));
    } else {
        output.success(&format!(
            "{} removed from the Hall of Fame (score {})",
            id,
            format_score(score, output.precision())
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_branches() {
        let mut pedigree = Pedigree::bootstrap("Root", Sex::Male);
        let root = pedigree.root();
        let sire = pedigree
            .add_parent(&root, ParentRole::Sire, "Thunder")
            .unwrap()
            .created
            .unwrap();
        pedigree.add_parent(&root, ParentRole::Dam, "Bella").unwrap();
        pedigree.add_parent(&sire, ParentRole::Sire, "Old Thunder").unwrap();
        pedigree.toggle_hall_of_fame(&sire).unwrap();

        let tree = pedigree.tree(&root).unwrap();
        let lines = render_tree(&tree, 2);

        assert_eq!(
            lines,
            vec![
                "Root (h1) ♂ 50%".to_string(),
                "├── Thunder (h2) ♂ 100% [HoF]".to_string(),
                "│   └── Old Thunder (h4) ♂ 0%".to_string(),
                "└── Bella (h3) ♀ 0%".to_string(),
            ]
        );
    }

    #[test]
    fn renders_single_horse() {
        let pedigree = Pedigree::bootstrap("Solo", Sex::Female);
        let tree = pedigree.tree(&pedigree.root()).unwrap();

        assert_eq!(render_tree(&tree, 2), vec!["Solo (h1) ♀ 0%".to_string()]);
    }
}
