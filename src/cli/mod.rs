//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Workspace setup | `init`, `reset` |
//! | Horse | Inspect and edit horses | `list`, `show`, `tree`, `score`, `rename`, `hof` |
//! | Lineage | Sire/dam links | `add-parent`, `link`, `unlink`, `prune` |
//! | Transfer | Snapshot files | `export`, `import` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! pedigree --verbose unlink h1 sire
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod horse;
mod parent;
mod transfer;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
