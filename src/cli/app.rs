//! Main CLI application structure

use clap::{Parser, Subcommand};
use anyhow::Result;

use super::output::{Output, OutputFormat};
use super::{horse, parent, transfer};
use crate::domain::{HorseId, ParentRole, Sex};
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "pedigree")]
#[command(author, version, about = "Local-first horse pedigree manager with hereditary scoring")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new pedigree with its root horse
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Name of the root horse
        #[arg(long)]
        name: Option<String>,

        /// Sex of the root horse (male or female)
        #[arg(long, default_value = "male")]
        sex: Sex,
    },

    /// List all horses with their scores
    List,

    /// Show details for one horse
    Show {
        /// Horse ID
        id: HorseId,
    },

    /// Show the pedigree tree
    Tree {
        /// Horse to start from (defaults to the root)
        #[arg(long)]
        root: Option<HorseId>,
    },

    /// Print the hereditary score of a horse
    Score {
        /// Horse ID
        id: HorseId,
    },

    /// Rename a horse
    Rename {
        /// Horse ID
        id: HorseId,

        /// New name
        name: String,
    },

    /// Toggle the Hall of Fame flag
    Hof {
        /// Horse ID
        id: HorseId,
    },

    /// Create a new horse as sire or dam
    ///
    /// Examples:
    ///   pedigree add-parent h1 sire "Thunder"
    ///   pedigree add-parent h1 dam              # Named "Dam of ..."
    AddParent {
        /// Child horse ID
        id: HorseId,

        /// Parent slot (sire or dam)
        role: ParentRole,

        /// Name of the new horse
        name: Option<String>,
    },

    /// Link an existing horse as sire or dam
    Link {
        /// Child horse ID
        id: HorseId,

        /// Parent slot (sire or dam)
        role: ParentRole,

        /// Existing horse to link
        parent: HorseId,
    },

    /// Remove a sire or dam link
    Unlink {
        /// Child horse ID
        id: HorseId,

        /// Parent slot (sire or dam)
        role: ParentRole,
    },

    /// Remove horses no longer connected to the root
    Prune,

    /// Export the pedigree as JSON
    Export {
        /// File to write (defaults to stdout)
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },

    /// Replace the pedigree with a JSON export
    Import {
        /// File to read
        file: std::path::PathBuf,
    },

    /// Discard all horses and start a new pedigree
    Reset {
        /// Confirm discarding the current pedigree
        #[arg(long)]
        force: bool,

        /// Name of the new root horse
        #[arg(long)]
        name: Option<String>,

        /// Sex of the new root horse (male or female)
        #[arg(long, default_value = "male")]
        sex: Sex,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // A broken config surfaces once the workspace opens
    let config = Config::load().ok();
    let format = cli
        .format
        .or_else(|| config.as_ref().map(|c| c.global.default_format.into()))
        .unwrap_or_default();
    let precision = config
        .as_ref()
        .map(|c| c.workspace.score_precision)
        .unwrap_or(2);
    let output = Output::new(format, cli.verbose).with_precision(precision);

    output.verbose("Pedigree CLI starting");

    match cli.command {
        Commands::Init { path, name, sex } => {
            output.verbose_ctx("init", &format!("Initializing workspace at: {}", path));
            let workspace = Workspace::init(&path, name.as_deref(), sex)?;
            output.verbose_ctx(
                "init",
                &format!("Snapshot stored at: {}", workspace.snapshot_store().path().display()),
            );
            output.success(&format!(
                "Initialized pedigree at {}",
                workspace.root().display()
            ));
        }

        Commands::List => horse::list(&output)?,
        Commands::Show { id } => horse::show(&output, &id)?,
        Commands::Tree { root } => horse::tree(&output, root)?,
        Commands::Score { id } => horse::score(&output, &id)?,
        Commands::Rename { id, name } => horse::rename(&output, &id, &name)?,
        Commands::Hof { id } => horse::toggle_hall_of_fame(&output, &id)?,

        Commands::AddParent { id, role, name } => {
            parent::add(&output, &id, role, name.as_deref().unwrap_or(""))?
        }
        Commands::Link { id, role, parent: parent_id } => {
            parent::link(&output, &id, role, &parent_id)?
        }
        Commands::Unlink { id, role } => parent::unlink(&output, &id, role)?,
        Commands::Prune => parent::prune(&output)?,

        Commands::Export { output: path } => transfer::export(&output, path.as_deref())?,
        Commands::Import { file } => transfer::import(&output, &file)?,
        Commands::Reset { force, name, sex } => {
            transfer::reset(&output, force, name.as_deref(), sex)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
