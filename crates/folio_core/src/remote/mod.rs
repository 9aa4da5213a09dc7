//! Remote store abstraction.
//!
//! The remote store is the system of record for documents and blocks. It is
//! accessed only through the [`RemoteStore`] trait, which is object-safe: every
//! method returns a boxed future so the trait can also be used as
//! `dyn RemoteStore`.
//!
//! Every call resolves to either a success payload or a [`RemoteError`]
//! carrying a human-readable message. Callers never branch on the kind of
//! failure.

mod memory;

pub use memory::{MemoryRemoteStore, RemoteMethod};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Block, BlockPatch, Document, DocumentPatch, NewBlock, NewDocument, Role};

/// A boxed future for object-safe async methods.
///
/// On native targets, futures are `Send` for compatibility with multi-threaded runtimes.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A boxed future for object-safe async methods.
///
/// WASM version without `Send` requirement - JavaScript is single-threaded.
#[cfg(target_arch = "wasm32")]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Structured failure returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Human-readable message
    pub message: String,
}

impl RemoteError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a row that does not exist remotely.
    pub fn not_found(table: &str, id: &str) -> Self {
        Self::new(format!("{} row '{}' not found", table, id))
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Result of a remote call.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// CRUD interface of the remote store.
#[cfg(not(target_arch = "wasm32"))]
pub trait RemoteStore: Send + Sync {
    /// Documents of a workspace, most recently updated first.
    fn list_documents<'a>(&'a self, workspace_id: &'a str)
    -> BoxFuture<'a, RemoteResult<Vec<Document>>>;

    /// Blocks of a document, ordered by position ascending.
    fn list_blocks<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<Vec<Block>>>;

    /// Insert a document. The server assigns id and timestamps.
    fn create_document<'a>(&'a self, document: &'a NewDocument)
    -> BoxFuture<'a, RemoteResult<Document>>;

    /// Patch a document. Stores that echo the updated row return it.
    fn update_document<'a>(
        &'a self,
        document_id: &'a str,
        patch: &'a DocumentPatch,
    ) -> BoxFuture<'a, RemoteResult<Option<Document>>>;

    /// Delete a document. Its blocks are deleted server-side.
    fn delete_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<()>>;

    /// Insert a block. The server assigns id and timestamps.
    fn create_block<'a>(&'a self, block: &'a NewBlock) -> BoxFuture<'a, RemoteResult<Block>>;

    /// Patch a block and return the authoritative row.
    fn update_block<'a>(
        &'a self,
        block_id: &'a str,
        patch: &'a BlockPatch,
    ) -> BoxFuture<'a, RemoteResult<Block>>;

    /// Delete a block.
    fn delete_block<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, RemoteResult<()>>;

    /// Membership role of a user in a workspace, if a membership row exists.
    fn get_member_role<'a>(
        &'a self,
        _workspace_id: &'a str,
        _user_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Option<Role>>> {
        // Default: no membership table
        Box::pin(async move { Ok(None) })
    }
}

/// CRUD interface of the remote store.
///
/// WASM version without `Send + Sync` bounds.
#[cfg(target_arch = "wasm32")]
pub trait RemoteStore {
    /// Documents of a workspace, most recently updated first.
    fn list_documents<'a>(&'a self, workspace_id: &'a str)
    -> BoxFuture<'a, RemoteResult<Vec<Document>>>;

    /// Blocks of a document, ordered by position ascending.
    fn list_blocks<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<Vec<Block>>>;

    /// Insert a document. The server assigns id and timestamps.
    fn create_document<'a>(&'a self, document: &'a NewDocument)
    -> BoxFuture<'a, RemoteResult<Document>>;

    /// Patch a document. Stores that echo the updated row return it.
    fn update_document<'a>(
        &'a self,
        document_id: &'a str,
        patch: &'a DocumentPatch,
    ) -> BoxFuture<'a, RemoteResult<Option<Document>>>;

    /// Delete a document. Its blocks are deleted server-side.
    fn delete_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<()>>;

    /// Insert a block. The server assigns id and timestamps.
    fn create_block<'a>(&'a self, block: &'a NewBlock) -> BoxFuture<'a, RemoteResult<Block>>;

    /// Patch a block and return the authoritative row.
    fn update_block<'a>(
        &'a self,
        block_id: &'a str,
        patch: &'a BlockPatch,
    ) -> BoxFuture<'a, RemoteResult<Block>>;

    /// Delete a block.
    fn delete_block<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, RemoteResult<()>>;

    /// Membership role of a user in a workspace, if a membership row exists.
    fn get_member_role<'a>(
        &'a self,
        _workspace_id: &'a str,
        _user_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Option<Role>>> {
        Box::pin(async move { Ok(None) })
    }
}

impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    fn list_documents<'a>(
        &'a self,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Vec<Document>>> {
        (**self).list_documents(workspace_id)
    }

    fn list_blocks<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<Vec<Block>>> {
        (**self).list_blocks(document_id)
    }

    fn create_document<'a>(
        &'a self,
        document: &'a NewDocument,
    ) -> BoxFuture<'a, RemoteResult<Document>> {
        (**self).create_document(document)
    }

    fn update_document<'a>(
        &'a self,
        document_id: &'a str,
        patch: &'a DocumentPatch,
    ) -> BoxFuture<'a, RemoteResult<Option<Document>>> {
        (**self).update_document(document_id, patch)
    }

    fn delete_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        (**self).delete_document(document_id)
    }

    fn create_block<'a>(&'a self, block: &'a NewBlock) -> BoxFuture<'a, RemoteResult<Block>> {
        (**self).create_block(block)
    }

    fn update_block<'a>(
        &'a self,
        block_id: &'a str,
        patch: &'a BlockPatch,
    ) -> BoxFuture<'a, RemoteResult<Block>> {
        (**self).update_block(block_id, patch)
    }

    fn delete_block<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        (**self).delete_block(block_id)
    }

    fn get_member_role<'a>(
        &'a self,
        workspace_id: &'a str,
        user_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Option<Role>>> {
        (**self).get_member_role(workspace_id, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::not_found("blocks", "b1");
        assert_eq!(err.to_string(), "blocks row 'b1' not found");
    }
}
