/// Clap argument definitions
mod args;

/// `add`, `edit`, `check`, `del` commands
mod block;

/// `list`, `show`, `new`, `rm`, `title`, `icon` commands
mod document;

/// JSON-file-backed remote store
mod store;

/// Shared CLI utilities
mod util;

use std::path::{Path, PathBuf};

use clap::Parser;
use folio_core::{Config, FolioError, Role, Synchronizer, UserIdentity};
use thiserror::Error;

pub use args::Cli;
use args::Commands;
use store::{JsonFileStore, StoreError};

/// Synchronizer over the CLI's JSON store.
pub type CliSynchronizer = Synchronizer<JsonFileStore>;

/// Workspace opened when none is configured.
const DEFAULT_WORKSPACE_ID: &str = "personal";

/// User acted as when none is configured.
const DEFAULT_USER_ID: &str = "local";

/// Helper to run async operations in sync context
fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

#[derive(Debug, Error)]
enum SessionError {
    #[error(transparent)]
    Core(#[from] FolioError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Could not determine a data directory; pass --store")]
    NoStorePath,
}

/// Session settings after merging flags over config.
#[derive(Debug, Clone, PartialEq)]
struct SessionArgs {
    store_path: PathBuf,
    workspace_id: String,
    user_id: String,
    email: Option<String>,
}

impl SessionArgs {
    fn resolve(cli: &Cli, config: &Config) -> Result<Self, SessionError> {
        let store_path = cli
            .store
            .clone()
            .or_else(|| config.store_path.clone())
            .or_else(Config::default_store_path)
            .ok_or(SessionError::NoStorePath)?;
        Ok(Self {
            store_path,
            workspace_id: cli
                .workspace
                .clone()
                .or_else(|| config.workspace_id.clone())
                .unwrap_or_else(|| DEFAULT_WORKSPACE_ID.to_string()),
            user_id: cli
                .user
                .clone()
                .or_else(|| config.user_id.clone())
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            email: cli.email.clone().or_else(|| config.user_email.clone()),
        })
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<Config, FolioError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Open the store and bootstrap a synchronizer for the session.
fn open_session(args: &SessionArgs, config: Config) -> Result<CliSynchronizer, SessionError> {
    let store = JsonFileStore::open(&args.store_path)?;
    let workspace = store.ensure_workspace(&args.workspace_id, &args.user_id)?;
    log::debug!(
        "Opening workspace {} from {}",
        workspace.id,
        store.path().display()
    );
    let user = UserIdentity::new(args.user_id.clone(), args.email.clone());
    Ok(block_on(Synchronizer::bootstrap(
        store, workspace, user, config,
    ))?)
}

/// `share` command: only owners may grant roles.
fn handle_share(sync: &CliSynchronizer, user: &str, role: Role) -> bool {
    if sync.role() != Role::Owner {
        eprintln!(
            "✗ Only owners can share workspace '{}' (you are {})",
            sync.workspace().id,
            sync.role()
        );
        return false;
    }
    match sync.remote().set_member(&sync.workspace().id, user, role) {
        Ok(()) => {
            println!("✓ {} is now {} of '{}'", user, role, sync.workspace().id);
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

fn dispatch(sync: &CliSynchronizer, command: Commands) -> bool {
    match command {
        Commands::List => document::handle_list(sync),

        Commands::Show { document } => document::handle_show(sync, document),

        Commands::New { title } => document::handle_new(sync, title),

        Commands::Rm { document } => document::handle_rm(sync, &document),

        Commands::Title { document, title } => document::handle_title(sync, &document, &title),

        Commands::Icon { document, icon } => document::handle_icon(sync, &document, &icon),

        Commands::Add {
            text,
            doc,
            kind,
            at,
        } => block::handle_add(sync, doc, text, kind, at),

        Commands::Edit {
            block,
            text,
            doc,
            kind,
            at,
        } => block::handle_edit(sync, doc, &block, text, kind, at),

        Commands::Check { block, doc, off } => block::handle_check(sync, doc, &block, off),

        Commands::Del { block, doc } => block::handle_del(sync, doc, &block),

        Commands::Share { user, role } => handle_share(sync, &user, role),
    }
}

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let session = SessionArgs::resolve(&cli, &config)
        .and_then(|args| open_session(&args, config));
    let sync = match session {
        Ok(sync) => sync,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    if !dispatch(&sync, cli.command) {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::RemoteStore;

    fn session_args(dir: &tempfile::TempDir, user: &str) -> SessionArgs {
        SessionArgs {
            store_path: dir.path().join("store.json"),
            workspace_id: "team".to_string(),
            user_id: user.to_string(),
            email: None,
        }
    }

    fn open(dir: &tempfile::TempDir, user: &str) -> CliSynchronizer {
        open_session(&session_args(dir, user), Config::default()).unwrap()
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["folio", "list", "--store", "/tmp/flag.json"]).unwrap();
        let config = Config {
            store_path: Some(PathBuf::from("/tmp/config.json")),
            workspace_id: Some("from-config".to_string()),
            ..Default::default()
        };
        let args = SessionArgs::resolve(&cli, &config).unwrap();
        assert_eq!(args.store_path, PathBuf::from("/tmp/flag.json"));
        assert_eq!(args.workspace_id, "from-config");
    }

    #[test]
    fn test_first_session_owns_new_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let sync = open(&dir, "alice");
        assert_eq!(sync.role(), Role::Owner);
        assert!(sync.documents().is_empty());
        assert!(dir.path().join("store.json").exists());
    }

    #[test]
    fn test_document_and_block_commands_persist() {
        let dir = tempfile::tempdir().unwrap();
        let sync = open(&dir, "alice");

        assert!(dispatch(
            &sync,
            Commands::New {
                title: Some("Plans".to_string())
            }
        ));
        assert!(dispatch(
            &sync,
            Commands::Add {
                text: Some("Ship v1".to_string()),
                doc: None,
                kind: Some(folio_core::BlockKind::Todo),
                at: None,
            }
        ));
        let todo = sync.active_blocks().last().cloned().unwrap();
        assert_eq!(todo.position, 2.0);
        assert!(dispatch(
            &sync,
            Commands::Check {
                block: todo.id[..8].to_string(),
                doc: None,
                off: false,
            }
        ));

        // A fresh session sees everything the first one wrote.
        let reopened = open(&dir, "alice");
        let document = reopened.active_document().unwrap();
        assert_eq!(document.title, "Plans");
        let blocks = reopened.active_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].content.text(), "");
        assert_eq!(blocks[1].content.checked(), Some(true));
    }

    #[test]
    fn test_add_to_unselected_document_appends_after_its_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let sync = open(&dir, "alice");
        assert!(dispatch(&sync, Commands::New { title: Some("One".to_string()) }));
        let one = sync.active_document_id().unwrap();
        assert!(dispatch(&sync, Commands::New { title: Some("Two".to_string()) }));

        // A fresh session only has the head document's blocks cached.
        let reopened = open(&dir, "alice");
        assert!(!reopened.has_blocks(&one));
        assert!(dispatch(
            &reopened,
            Commands::Add {
                text: Some("later".to_string()),
                doc: Some(one.clone()),
                kind: None,
                at: None,
            }
        ));

        let stored = block_on(reopened.remote().list_blocks(&one)).unwrap();
        let positions: Vec<_> = stored.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![1.0, 2.0]);
        let cached: Vec<_> = reopened.blocks(&one).into_iter().map(|b| b.id).collect();
        let stored: Vec<_> = stored.into_iter().map(|b| b.id).collect();
        assert_eq!(cached, stored);
    }

    #[test]
    fn test_check_rejects_non_todo() {
        let dir = tempfile::tempdir().unwrap();
        let sync = open(&dir, "alice");
        assert!(dispatch(&sync, Commands::New { title: None }));
        let first = sync.active_blocks()[0].id.clone();

        assert!(!dispatch(
            &sync,
            Commands::Check {
                block: first,
                doc: None,
                off: false,
            }
        ));
    }

    #[test]
    fn test_viewer_cannot_write() {
        let dir = tempfile::tempdir().unwrap();
        let owner = open(&dir, "alice");
        assert!(dispatch(&owner, Commands::New { title: None }));
        assert!(dispatch(
            &owner,
            Commands::Share {
                user: "bob".to_string(),
                role: Role::Viewer,
            }
        ));

        let viewer = open(&dir, "bob");
        assert_eq!(viewer.role(), Role::Viewer);
        assert!(!dispatch(&viewer, Commands::New { title: None }));
        assert!(!dispatch(
            &viewer,
            Commands::Share {
                user: "bob".to_string(),
                role: Role::Owner,
            }
        ));
        assert!(dispatch(&viewer, Commands::List));
        assert_eq!(
            block_on(viewer.remote().list_documents("team")).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_rm_moves_selection() {
        let dir = tempfile::tempdir().unwrap();
        let sync = open(&dir, "alice");
        assert!(dispatch(&sync, Commands::New { title: Some("One".to_string()) }));
        assert!(dispatch(&sync, Commands::New { title: Some("Two".to_string()) }));
        let two = sync.active_document_id().unwrap();

        assert!(dispatch(&sync, Commands::Rm { document: two.clone() }));
        assert_eq!(sync.active_document().unwrap().title, "One");
        assert!(!dispatch(&sync, Commands::Rm { document: two }));
    }
}
