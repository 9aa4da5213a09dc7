use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_core::{BlockKind, Role};

/// Edit documents and blocks of a Folio workspace.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON store (defaults to the configured or platform data path)
    #[arg(long, global = true, env = "FOLIO_STORE")]
    pub store: Option<PathBuf>,

    /// Path to a config file (defaults to the platform config path)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Workspace id to open
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// User id to act as
    #[arg(short, long, global = true, env = "FOLIO_USER")]
    pub user: Option<String>,

    /// Email of the acting user
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Log synchronizer activity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents, most recently updated first
    List,

    /// Print a document and its blocks
    Show {
        /// Document id or unique id prefix (defaults to the first document)
        document: Option<String>,
    },

    /// Create a document
    New {
        /// Title for the new document
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Delete a document and all of its blocks
    Rm {
        /// Document id or unique id prefix
        document: String,
    },

    /// Rename a document
    Title {
        /// Document id or unique id prefix
        document: String,

        /// New title (blank resets to the default)
        title: String,
    },

    /// Change a document's icon
    Icon {
        /// Document id or unique id prefix
        document: String,

        /// New icon (blank resets to the default)
        icon: String,
    },

    /// Add a block to a document
    Add {
        /// Block text
        text: Option<String>,

        /// Document id or prefix (defaults to the first document)
        #[arg(short, long)]
        doc: Option<String>,

        /// Block kind: paragraph, heading or todo
        #[arg(short, long)]
        kind: Option<BlockKind>,

        /// Position (defaults to after the last block)
        #[arg(long)]
        at: Option<f64>,
    },

    /// Change a block's text, kind or position
    Edit {
        /// Block id or unique id prefix
        block: String,

        /// New text
        text: Option<String>,

        /// Document holding the block (defaults to the first document)
        #[arg(short, long)]
        doc: Option<String>,

        /// Convert to another kind
        #[arg(short, long)]
        kind: Option<BlockKind>,

        /// Move to a new position
        #[arg(long)]
        at: Option<f64>,
    },

    /// Check (or uncheck) a todo block
    Check {
        /// Block id or unique id prefix
        block: String,

        /// Document holding the block (defaults to the first document)
        #[arg(short, long)]
        doc: Option<String>,

        /// Uncheck instead
        #[arg(long)]
        off: bool,
    },

    /// Delete a block
    Del {
        /// Block id or unique id prefix
        block: String,

        /// Document holding the block (defaults to the first document)
        #[arg(short, long)]
        doc: Option<String>,
    },

    /// Grant another user a role in the workspace (owners only)
    Share {
        /// User id
        user: String,

        /// Role: owner, editor or viewer
        role: Role,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_kind() {
        let cli = Cli::try_parse_from(["folio", "add", "Buy milk", "--kind", "todo", "--at", "2.5"])
            .unwrap();
        match cli.command {
            Commands::Add { text, kind, at, doc } => {
                assert_eq!(text.as_deref(), Some("Buy milk"));
                assert_eq!(kind, Some(BlockKind::Todo));
                assert_eq!(at, Some(2.5));
                assert!(doc.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "list", "--store", "/tmp/s.json", "-u", "me"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cli.user.as_deref(), Some("me"));
    }
}
