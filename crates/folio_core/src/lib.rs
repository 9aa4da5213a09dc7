#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Block cache of a single document
pub mod block_store;

/// Event subscriptions
pub mod callback_registry;

/// Command pattern API
pub mod command;

mod command_handler;

/// Configuration options
pub mod config;

/// Document list and per-document block caches
pub mod document_store;

/// Error (common error types)
pub mod error;

/// Events emitted on state changes
pub mod events;

/// Role-based permission checks
pub mod permission;

/// Remote store abstraction (plus an in-memory implementation)
pub mod remote;

/// Active document tracking
pub mod selection;

/// Signed-in user and role
pub mod session;

/// Optimistic synchronizer
pub mod synchronizer;

/// Domain types (workspaces, documents, blocks, roles)
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use command::{Command, Response};
pub use config::Config;
pub use error::{FolioError, Result};
pub use remote::{MemoryRemoteStore, RemoteError, RemoteStore};
pub use session::{Session, UserIdentity};
pub use synchronizer::{SyncOutcome, Synchronizer, WorkspaceSnapshot};
pub use types::{Block, BlockContent, BlockKind, BlockPatch, Document, DocumentPatch, Role, Workspace};
