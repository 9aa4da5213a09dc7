//! In-memory remote store for testing and demos.
//!
//! [`MemoryRemoteStore`] keeps all rows in memory behind a shared lock, so a
//! clone handed to a synchronizer still lets the test inspect and manipulate
//! the "server" side. Failures can be injected per method, and every call is
//! counted.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{BoxFuture, RemoteError, RemoteResult, RemoteStore};
use crate::types::{Block, BlockPatch, Document, DocumentPatch, NewBlock, NewDocument, Role};

/// Methods of the [`RemoteStore`] trait, used for failure injection and call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteMethod {
    /// `list_documents`
    ListDocuments,
    /// `list_blocks`
    ListBlocks,
    /// `create_document`
    CreateDocument,
    /// `update_document`
    UpdateDocument,
    /// `delete_document`
    DeleteDocument,
    /// `create_block`
    CreateBlock,
    /// `update_block`
    UpdateBlock,
    /// `delete_block`
    DeleteBlock,
    /// `get_member_role`
    GetMemberRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Once,
    Always,
}

#[derive(Debug, Default)]
struct Tables {
    documents: Vec<Document>,
    blocks: Vec<Block>,
    members: HashMap<(String, String), Role>,
    queued_ids: VecDeque<String>,
    failures: HashMap<RemoteMethod, Failure>,
    calls: HashMap<RemoteMethod, usize>,
}

impl Tables {
    fn next_id(&mut self) -> String {
        self.queued_ids
            .pop_front()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }

    /// Count the call and report an injected failure, if any.
    fn enter(&mut self, method: RemoteMethod) -> RemoteResult<()> {
        *self.calls.entry(method).or_default() += 1;
        match self.failures.get(&method).copied() {
            Some(Failure::Once) => {
                self.failures.remove(&method);
                Err(RemoteError::new(format!("injected failure in {:?}", method)))
            }
            Some(Failure::Always) => {
                Err(RemoteError::new(format!("injected failure in {:?}", method)))
            }
            None => Ok(()),
        }
    }
}

/// In-memory [`RemoteStore`].
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRemoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    // ==================== Seeding ====================

    /// Add a document row (builder pattern).
    pub fn with_document(self, document: Document) -> Self {
        self.write().documents.push(document);
        self
    }

    /// Add a block row (builder pattern).
    pub fn with_block(self, block: Block) -> Self {
        self.write().blocks.push(block);
        self
    }

    /// Add a membership row (builder pattern).
    pub fn with_member(self, workspace_id: &str, user_id: &str, role: Role) -> Self {
        self.write()
            .members
            .insert((workspace_id.to_string(), user_id.to_string()), role);
        self
    }

    /// Ids to hand out, in order, before falling back to random UUIDs.
    pub fn queue_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write()
            .queued_ids
            .extend(ids.into_iter().map(Into::into));
    }

    // ==================== Failure injection ====================

    /// Make every call to `method` fail until [`heal`](Self::heal) is called.
    pub fn fail(&self, method: RemoteMethod) {
        self.write().failures.insert(method, Failure::Always);
    }

    /// Make only the next call to `method` fail.
    pub fn fail_once(&self, method: RemoteMethod) {
        self.write().failures.insert(method, Failure::Once);
    }

    /// Stop injecting failures for `method`.
    pub fn heal(&self, method: RemoteMethod) {
        self.write().failures.remove(&method);
    }

    // ==================== Inspection ====================

    /// Number of calls made to `method`, including failed ones.
    pub fn calls(&self, method: RemoteMethod) -> usize {
        self.read().calls.get(&method).copied().unwrap_or(0)
    }

    /// Number of calls made to any method.
    pub fn total_calls(&self) -> usize {
        self.read().calls.values().sum()
    }

    /// Stored document row.
    pub fn document(&self, document_id: &str) -> Option<Document> {
        self.read()
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
    }

    /// Stored block row.
    pub fn block(&self, block_id: &str) -> Option<Block> {
        self.read()
            .blocks
            .iter()
            .find(|b| b.id == block_id)
            .cloned()
    }

    /// Stored blocks of a document, ordered by position.
    pub fn blocks_of(&self, document_id: &str) -> Vec<Block> {
        let mut blocks: Vec<Block> = self
            .read()
            .blocks
            .iter()
            .filter(|b| b.document_id == document_id)
            .cloned()
            .collect();
        blocks.sort_by(Block::display_order);
        blocks
    }

    /// Overwrite a stored block directly, as another client would.
    pub fn put_block(&self, block: Block) {
        let mut tables = self.write();
        tables.blocks.retain(|b| b.id != block.id);
        tables.blocks.push(block);
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn list_documents<'a>(
        &'a self,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Vec<Document>>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::ListDocuments)?;
            let mut documents: Vec<Document> = tables
                .documents
                .iter()
                .filter(|d| d.workspace_id == workspace_id)
                .cloned()
                .collect();
            documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(documents)
        })
    }

    fn list_blocks<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<Vec<Block>>> {
        Box::pin(async move {
            self.write().enter(RemoteMethod::ListBlocks)?;
            Ok(self.blocks_of(document_id))
        })
    }

    fn create_document<'a>(
        &'a self,
        document: &'a NewDocument,
    ) -> BoxFuture<'a, RemoteResult<Document>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::CreateDocument)?;
            let now = Utc::now();
            let row = Document {
                id: tables.next_id(),
                workspace_id: document.workspace_id.clone(),
                parent_id: document.parent_id.clone(),
                title: document.title.clone(),
                icon: document.icon.clone(),
                cover_image_url: None,
                is_favorite: false,
                created_at: now,
                updated_at: now,
            };
            tables.documents.push(row.clone());
            Ok(row)
        })
    }

    fn update_document<'a>(
        &'a self,
        document_id: &'a str,
        patch: &'a DocumentPatch,
    ) -> BoxFuture<'a, RemoteResult<Option<Document>>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::UpdateDocument)?;
            let row = tables
                .documents
                .iter_mut()
                .find(|d| d.id == document_id)
                .ok_or_else(|| RemoteError::not_found("documents", document_id))?;
            row.apply_patch(patch, Utc::now());
            Ok(Some(row.clone()))
        })
    }

    fn delete_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::DeleteDocument)?;
            tables.documents.retain(|d| d.id != document_id);
            tables.blocks.retain(|b| b.document_id != document_id);
            Ok(())
        })
    }

    fn create_block<'a>(&'a self, block: &'a NewBlock) -> BoxFuture<'a, RemoteResult<Block>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::CreateBlock)?;
            if !tables.documents.iter().any(|d| d.id == block.document_id) {
                return Err(RemoteError::not_found("documents", &block.document_id));
            }
            let now = Utc::now();
            let row = Block {
                id: tables.next_id(),
                document_id: block.document_id.clone(),
                content: block.content.clone(),
                position: block.position,
                created_at: now,
                updated_at: now,
            };
            tables.blocks.push(row.clone());
            Ok(row)
        })
    }

    fn update_block<'a>(
        &'a self,
        block_id: &'a str,
        patch: &'a BlockPatch,
    ) -> BoxFuture<'a, RemoteResult<Block>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::UpdateBlock)?;
            let row = tables
                .blocks
                .iter_mut()
                .find(|b| b.id == block_id)
                .ok_or_else(|| RemoteError::not_found("blocks", block_id))?;
            row.apply_patch(patch, Utc::now());
            Ok(row.clone())
        })
    }

    fn delete_block<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::DeleteBlock)?;
            tables.blocks.retain(|b| b.id != block_id);
            Ok(())
        })
    }

    fn get_member_role<'a>(
        &'a self,
        workspace_id: &'a str,
        user_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Option<Role>>> {
        Box::pin(async move {
            let mut tables = self.write();
            tables.enter(RemoteMethod::GetMemberRole)?;
            Ok(tables
                .members
                .get(&(workspace_id.to_string(), user_id.to_string()))
                .copied())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block, document};
    use futures_lite::future::block_on;

    #[test]
    fn test_list_documents_orders_by_updated_at_desc() {
        let mut older = document("old", "Old");
        older.updated_at = older.updated_at - chrono::Duration::hours(1);
        let store = MemoryRemoteStore::new()
            .with_document(older)
            .with_document(document("new", "New"));

        let docs = block_on(store.list_documents("ws-1")).unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_list_blocks_orders_by_position() {
        let store = MemoryRemoteStore::new()
            .with_document(document("d", "D"))
            .with_block(block("2", "d", 2.0, "b"))
            .with_block(block("1", "d", 1.0, "a"));

        let blocks = block_on(store.list_blocks("d")).unwrap();
        assert_eq!(blocks[0].id, "1");
        assert_eq!(blocks[1].id, "2");
    }

    #[test]
    fn test_queued_ids_are_used_first() {
        let store = MemoryRemoteStore::new();
        store.queue_ids(["doc-9"]);
        let new_doc = NewDocument {
            workspace_id: "ws-1".to_string(),
            title: "Untitled".to_string(),
            icon: None,
            parent_id: None,
        };
        assert_eq!(block_on(store.create_document(&new_doc)).unwrap().id, "doc-9");
        assert_ne!(block_on(store.create_document(&new_doc)).unwrap().id, "doc-9");
    }

    #[test]
    fn test_fail_once_then_recovers() {
        let store = MemoryRemoteStore::new();
        store.fail_once(RemoteMethod::ListBlocks);

        assert!(block_on(store.list_blocks("d")).is_err());
        assert!(block_on(store.list_blocks("d")).is_ok());
        assert_eq!(store.calls(RemoteMethod::ListBlocks), 2);
    }

    #[test]
    fn test_fail_until_healed() {
        let store = MemoryRemoteStore::new();
        store.fail(RemoteMethod::DeleteBlock);
        assert!(block_on(store.delete_block("x")).is_err());
        assert!(block_on(store.delete_block("x")).is_err());
        store.heal(RemoteMethod::DeleteBlock);
        assert!(block_on(store.delete_block("x")).is_ok());
        assert_eq!(store.total_calls(), 3);
    }

    #[test]
    fn test_delete_document_cascades() {
        let store = MemoryRemoteStore::new()
            .with_document(document("d", "D"))
            .with_block(block("1", "d", 1.0, "a"));

        block_on(store.delete_document("d")).unwrap();
        assert!(store.document("d").is_none());
        assert!(store.block("1").is_none());
    }

    #[test]
    fn test_update_missing_block_fails() {
        let store = MemoryRemoteStore::new();
        let err = block_on(store.update_block("nope", &BlockPatch::position(2.0))).unwrap_err();
        assert!(err.message.contains("nope"));
    }

    #[test]
    fn test_member_role_lookup() {
        let store = MemoryRemoteStore::new().with_member("ws-1", "u-1", Role::Viewer);
        assert_eq!(
            block_on(store.get_member_role("ws-1", "u-1")).unwrap(),
            Some(Role::Viewer)
        );
        assert_eq!(block_on(store.get_member_role("ws-1", "u-2")).unwrap(), None);
    }
}
