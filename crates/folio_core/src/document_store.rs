//! Cached documents of one workspace and their loaded block lists.
//!
//! The [`DocumentStore`] is the only owner of this state. The synchronizer
//! mutates it while holding a short write lock and never across a remote call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::block_store::BlockStore;
use crate::types::{Block, BlockPatch, Document, DocumentPatch};

/// Documents of a workspace plus the block cache keyed by document id.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    blocks: HashMap<String, BlockStore>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a document list (e.g. from `list_documents`).
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            blocks: HashMap::new(),
        }
    }

    // ==================== Documents ====================

    /// Documents in presentation order.
    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    /// Replace the document list. Cached blocks of documents that are no
    /// longer listed are dropped.
    pub fn load(&mut self, documents: Vec<Document>) {
        self.blocks
            .retain(|id, _| documents.iter().any(|d| &d.id == id));
        self.documents = documents;
    }

    /// Look up a document.
    pub fn get(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == document_id)
    }

    /// Whether the document is listed.
    pub fn contains(&self, document_id: &str) -> bool {
        self.get(document_id).is_some()
    }

    /// First document in presentation order.
    pub fn head(&self) -> Option<&Document> {
        self.documents.first()
    }

    /// Prepend a document (most recent first). An existing entry with the
    /// same id is replaced instead.
    pub fn insert(&mut self, document: Document) {
        self.documents.retain(|d| d.id != document.id);
        self.documents.insert(0, document);
    }

    /// Remove a document together with its cached blocks.
    pub fn remove(&mut self, document_id: &str) -> Option<Document> {
        self.blocks.remove(document_id);
        let index = self.documents.iter().position(|d| d.id == document_id)?;
        Some(self.documents.remove(index))
    }

    /// Shallow-merge a patch into a document and stamp `updated_at`.
    ///
    /// Returns `false` if the document is not listed.
    pub fn update(&mut self, document_id: &str, patch: &DocumentPatch, now: DateTime<Utc>) -> bool {
        match self.documents.iter_mut().find(|d| d.id == document_id) {
            Some(document) => {
                document.apply_patch(patch, now);
                true
            }
            None => false,
        }
    }

    /// Replace a listed document with an authoritative row, keeping its place.
    pub fn reconcile(&mut self, document: Document) -> bool {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => {
                *existing = document;
                true
            }
            None => false,
        }
    }

    // ==================== Blocks ====================

    /// Whether blocks have been loaded for a document.
    pub fn has_blocks(&self, document_id: &str) -> bool {
        self.blocks.contains_key(document_id)
    }

    /// Cached block store of a document, if loaded.
    pub fn block_store(&self, document_id: &str) -> Option<&BlockStore> {
        self.blocks.get(document_id)
    }

    /// Cached blocks of a document in display order. Empty if not loaded.
    pub fn blocks(&self, document_id: &str) -> &[Block] {
        self.blocks
            .get(document_id)
            .map(BlockStore::blocks)
            .unwrap_or(&[])
    }

    /// Replace the cached blocks of a document wholesale.
    pub fn load_blocks(&mut self, document_id: &str, blocks: Vec<Block>) {
        self.blocks
            .entry(document_id.to_string())
            .or_default()
            .load(blocks);
    }

    /// Replace a cached block with an authoritative row.
    ///
    /// This never creates a cache entry: rows for documents that are not loaded (or were removed while
    /// the call was in flight) are dropped. Returns `true` if applied.
    pub fn reconcile_block(&mut self, block: Block) -> bool {
        match self.blocks.get_mut(&block.document_id) {
            Some(store) => {
                store.upsert(block);
                true
            }
            None => false,
        }
    }

    /// Forget the cached blocks of a document so the next selection reloads them.
    pub fn evict_blocks(&mut self, document_id: &str) -> bool {
        self.blocks.remove(document_id).is_some()
    }

    /// Merge a partial update into a cached block.
    pub fn merge_block(&mut self, block_id: &str, patch: &BlockPatch, now: DateTime<Utc>) -> bool {
        self.blocks
            .values_mut()
            .any(|store| store.merge(block_id, patch, now))
    }

    /// Remove a cached block wherever it lives.
    pub fn remove_block(&mut self, block_id: &str) -> Option<Block> {
        self.blocks
            .values_mut()
            .find_map(|store| store.remove(block_id))
    }

    /// Look up a cached block.
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.values().find_map(|store| store.get(block_id))
    }

    /// Id of the document whose cache holds `block_id`.
    pub fn owner_of(&self, block_id: &str) -> Option<&str> {
        self.blocks
            .iter()
            .find(|(_, store)| store.contains(block_id))
            .map(|(document_id, _)| document_id.as_str())
    }

    /// Position for a block appended to a document.
    pub fn next_position(&self, document_id: &str) -> f64 {
        self.blocks
            .get(document_id)
            .map(BlockStore::next_position)
            .unwrap_or(1.0)
    }
}
