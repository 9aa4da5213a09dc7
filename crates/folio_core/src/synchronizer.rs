//! Optimistic document/block synchronizer.
//!
//! A [`Synchronizer`] owns the cached state of one workspace session (the
//! [`DocumentStore`] plus the [`SelectionController`]) and is the only thing
//! allowed to talk to the [`RemoteStore`].
//!
//! # Mutation lifecycle
//!
//! ```text
//! Idle → OptimisticApplied (if applicable) → RemotePending → Reconciled
//!                                                          → RolledBack (forced re-fetch)
//!                                                          → Failed
//! ```
//!
//! | Operation              | Optimistic | On remote failure                    |
//! |------------------------|------------|--------------------------------------|
//! | `create_document`      | no         | error returned                       |
//! | `delete_document`      | no         | error returned, nothing changed      |
//! | title / icon edits     | yes        | logged, local value kept             |
//! | `update_block`         | yes        | blocks of the document re-fetched    |
//! | `create_block`         | no         | error returned                       |
//! | `append_block`         | no         | error returned (fetch or create)     |
//! | `delete_block`         | yes        | blocks of the document re-fetched    |
//!
//! Local state is only touched between suspension points: every lock is
//! released before a remote call is awaited, so concurrent operations
//! interleave freely and the last write into the cache wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::callback_registry::{CallbackRegistry, EventCallback, SubscriptionId};
use crate::config::Config;
use crate::document_store::DocumentStore;
use crate::error::{FolioError, Result};
use crate::events::{MutationState, SyncEvent};
use crate::permission::{Operation, PermissionDenied, PermissionGate};
use crate::remote::RemoteStore;
use crate::selection::{SelectionChange, SelectionController};
use crate::session::{Session, UserIdentity};
use crate::types::{
    Block, BlockContent, BlockKind, BlockPatch, Document, DocumentPatch, NewBlock, NewDocument,
    Role, Workspace,
};

/// How a synchronizer operation ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SyncOutcome<T = ()> {
    /// The remote accepted the change; carries the authoritative value.
    Reconciled(T),
    /// The remote refused the change and the cache was re-fetched.
    RolledBack,
    /// The remote refused the change and the re-fetch failed too; the
    /// document's cached blocks were dropped and reload on next selection.
    Invalidated,
    /// The remote refused the change; the optimistic value was kept.
    Unconfirmed,
    /// The target is not in the local cache; nothing was done.
    NotFound,
    /// The session role may not mutate; nothing was done.
    Denied,
}

impl<T> SyncOutcome<T> {
    /// Whether the remote accepted the change.
    pub fn is_reconciled(&self) -> bool {
        matches!(self, SyncOutcome::Reconciled(_))
    }

    /// The reconciled value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            SyncOutcome::Reconciled(value) => Some(value),
            _ => None,
        }
    }

    /// Consume and return the reconciled value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            SyncOutcome::Reconciled(value) => Some(value),
            _ => None,
        }
    }

    /// Map the reconciled value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncOutcome<U> {
        match self {
            SyncOutcome::Reconciled(value) => SyncOutcome::Reconciled(f(value)),
            SyncOutcome::RolledBack => SyncOutcome::RolledBack,
            SyncOutcome::Invalidated => SyncOutcome::Invalidated,
            SyncOutcome::Unconfirmed => SyncOutcome::Unconfirmed,
            SyncOutcome::NotFound => SyncOutcome::NotFound,
            SyncOutcome::Denied => SyncOutcome::Denied,
        }
    }
}

/// Point-in-time copy of what a front end renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Workspace of the session
    pub workspace: Workspace,
    /// Session facts (user, role)
    pub session: Session,
    /// Whether mutating affordances should be shown
    pub can_edit: bool,
    /// Documents in presentation order
    pub documents: Vec<Document>,
    /// Active document id
    pub active_document_id: Option<String>,
    /// Cached blocks of the active document, in display order
    pub active_blocks: Vec<Block>,
    /// Advisory saving flag
    pub is_saving: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    documents: DocumentStore,
    selection: SelectionController,
}

/// Mediates every read and write between the local cache and the remote store.
///
/// Construct one per workspace session.
pub struct Synchronizer<R: RemoteStore> {
    remote: R,
    workspace: Workspace,
    session: Session,
    gate: PermissionGate,
    config: Config,
    state: RwLock<SessionState>,
    is_saving: AtomicBool,
    events: CallbackRegistry,
}

impl<R: RemoteStore> Synchronizer<R> {
    /// Create a synchronizer over an already-loaded document list.
    ///
    /// The first document (if any) becomes active; no blocks are cached yet.
    pub fn new(
        remote: R,
        workspace: Workspace,
        session: Session,
        documents: Vec<Document>,
        config: Config,
    ) -> Self {
        let documents = DocumentStore::with_documents(documents);
        let selection = SelectionController::initial(&documents);
        Self {
            remote,
            workspace,
            gate: PermissionGate::new(session.role),
            session,
            config,
            state: RwLock::new(SessionState {
                documents,
                selection,
            }),
            is_saving: AtomicBool::new(false),
            events: CallbackRegistry::new(),
        }
    }

    /// Load a session from the remote store.
    ///
    /// Resolves the user's role (a missing membership means `editor`), lists
    /// the workspace's documents most-recent first, selects the first one and
    /// preloads its blocks. Only a failure to list documents is fatal.
    pub async fn bootstrap(
        remote: R,
        workspace: Workspace,
        user: UserIdentity,
        config: Config,
    ) -> Result<Self> {
        let membership = match remote.get_member_role(&workspace.id, &user.id).await {
            Ok(role) => role,
            Err(e) => {
                log::warn!(
                    "Failed to look up membership of {} in {}: {}",
                    user.id,
                    workspace.id,
                    e
                );
                None
            }
        };
        let role = Role::from_membership(membership);

        let documents = remote
            .list_documents(&workspace.id)
            .await
            .map_err(|source| FolioError::WorkspaceLoad {
                workspace_id: workspace.id.clone(),
                source,
            })?;
        log::debug!(
            "Bootstrapped workspace {} with {} documents as {}",
            workspace.id,
            documents.len(),
            role
        );

        let synchronizer = Self::new(remote, workspace, Session::new(user, role), documents, config);
        if let Some(active) = synchronizer.active_document_id() {
            // Failure is already logged; the document opens empty and can be reselected.
            let _ = synchronizer.fetch_blocks(&active).await;
        }
        Ok(synchronizer)
    }

    // ==================== Internal helpers ====================

    fn read_state<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    fn write_state<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    fn emit(&self, event: SyncEvent) {
        self.events.emit(&event);
    }

    fn transition(&self, operation: Operation, state: MutationState) {
        log::debug!("{}: {:?}", operation, state);
        self.emit(SyncEvent::MutationStateChanged { operation, state });
    }

    fn set_saving(&self, value: bool) {
        if self.is_saving.swap(value, Ordering::SeqCst) != value {
            self.emit(SyncEvent::SavingChanged { is_saving: value });
        }
    }

    fn permitted(&self, operation: Operation) -> bool {
        match self.authorize(operation) {
            Ok(()) => true,
            Err(denied) => {
                log::debug!("Skipping {}: {}", operation, denied);
                false
            }
        }
    }

    /// Re-fetch a document's blocks after a failed optimistic write.
    async fn resync<T>(&self, operation: Operation, document_id: &str) -> SyncOutcome<T> {
        match self.fetch_blocks(document_id).await {
            Ok(_) => {
                self.transition(operation, MutationState::RolledBack);
                SyncOutcome::RolledBack
            }
            Err(_) => {
                log::warn!(
                    "Resync of document {} failed; dropping its cached blocks",
                    document_id
                );
                if self.write_state(|s| s.documents.evict_blocks(document_id)) {
                    self.emit(SyncEvent::blocks_changed(document_id));
                }
                self.transition(operation, MutationState::Failed);
                SyncOutcome::Invalidated
            }
        }
    }

    // ==================== Accessors ====================

    /// Workspace of this session.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Session facts.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Role of the session user.
    pub fn role(&self) -> Role {
        self.session.role
    }

    /// Whether mutating operations will do anything.
    pub fn can_edit(&self) -> bool {
        self.gate.can_mutate()
    }

    /// Permission check for a single operation.
    pub fn authorize(&self, operation: Operation) -> std::result::Result<(), PermissionDenied> {
        self.gate.authorize(operation)
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The remote store.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Advisory flag: a mutation is in flight. Not reference-counted.
    pub fn is_saving(&self) -> bool {
        self.is_saving.load(Ordering::SeqCst)
    }

    /// Documents in presentation order.
    pub fn documents(&self) -> Vec<Document> {
        self.read_state(|s| s.documents.list().to_vec())
    }

    /// A cached document.
    pub fn document(&self, document_id: &str) -> Option<Document> {
        self.read_state(|s| s.documents.get(document_id).cloned())
    }

    /// Cached blocks of a document in display order (empty if not loaded).
    pub fn blocks(&self, document_id: &str) -> Vec<Block> {
        self.read_state(|s| s.documents.blocks(document_id).to_vec())
    }

    /// Whether a document's blocks are cached.
    pub fn has_blocks(&self, document_id: &str) -> bool {
        self.read_state(|s| s.documents.has_blocks(document_id))
    }

    /// A cached block.
    pub fn block(&self, block_id: &str) -> Option<Block> {
        self.read_state(|s| s.documents.block(block_id).cloned())
    }

    /// Position for a block appended after the last cached block of a document.
    ///
    /// Only meaningful once the document's blocks are cached; see
    /// [`append_block_with`](Self::append_block_with).
    pub fn next_position(&self, document_id: &str) -> f64 {
        self.read_state(|s| s.documents.next_position(document_id))
    }

    /// Active document id.
    pub fn active_document_id(&self) -> Option<String> {
        self.read_state(|s| s.selection.active().map(str::to_string))
    }

    /// Active document, if it is still listed.
    pub fn active_document(&self) -> Option<Document> {
        self.read_state(|s| {
            s.selection
                .active()
                .and_then(|id| s.documents.get(id))
                .cloned()
        })
    }

    /// Cached blocks of the active document.
    pub fn active_blocks(&self) -> Vec<Block> {
        self.read_state(|s| {
            s.selection
                .active()
                .map(|id| s.documents.blocks(id).to_vec())
                .unwrap_or_default()
        })
    }

    /// Copy of everything a front end renders.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let (documents, active_document_id, active_blocks) = self.read_state(|s| {
            let active = s.selection.active().map(str::to_string);
            let blocks = active
                .as_deref()
                .map(|id| s.documents.blocks(id).to_vec())
                .unwrap_or_default();
            (s.documents.list().to_vec(), active, blocks)
        });
        WorkspaceSnapshot {
            workspace: self.workspace.clone(),
            session: self.session.clone(),
            can_edit: self.can_edit(),
            documents,
            active_document_id,
            active_blocks,
            is_saving: self.is_saving(),
        }
    }

    /// Seed the block cache of a document, e.g. with rows rendered server-side.
    pub fn seed_blocks(&self, document_id: &str, blocks: Vec<Block>) {
        self.write_state(|s| s.documents.load_blocks(document_id, blocks));
        self.emit(SyncEvent::blocks_changed(document_id));
    }

    // ==================== Events ====================

    /// Subscribe to state change events.
    pub fn subscribe(&self, callback: EventCallback) -> SubscriptionId {
        self.events.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ==================== Reads ====================

    /// Load all blocks of a document and replace its cache entry wholesale.
    ///
    /// On failure the existing cache is left as it was; a stale list is
    /// preferred over an empty one. Rows for documents no longer listed
    /// (deleted while the call was in flight) are discarded.
    pub async fn fetch_blocks(&self, document_id: &str) -> Result<usize> {
        log::debug!("Fetching blocks for document {}", document_id);
        match self.remote.list_blocks(document_id).await {
            Ok(blocks) => {
                let count = blocks.len();
                let applied = self.write_state(|s| {
                    if !s.documents.contains(document_id) {
                        return false;
                    }
                    s.documents.load_blocks(document_id, blocks);
                    true
                });
                if applied {
                    self.emit(SyncEvent::blocks_changed(document_id));
                } else {
                    log::debug!("Discarding blocks of unlisted document {}", document_id);
                }
                Ok(count)
            }
            Err(e) => {
                log::error!("Failed to load blocks for document {}: {}", document_id, e);
                Err(FolioError::remote(Operation::FetchBlocks, e))
            }
        }
    }

    /// Make a document active, loading its blocks first if they are not cached.
    ///
    /// Returns the selected id, or `None` if the document is not listed (the
    /// selection is then cleared). A failed block load is logged and the
    /// document stays selected.
    pub async fn select_document(&self, document_id: &str) -> Option<String> {
        let change = self.write_state(|s| s.selection.select(&s.documents, document_id));
        match change {
            SelectionChange::Cleared => {
                self.emit(SyncEvent::selection_changed(None));
                None
            }
            SelectionChange::Selected {
                document_id,
                needs_fetch,
            } => {
                self.emit(SyncEvent::selection_changed(Some(document_id.clone())));
                if needs_fetch {
                    let _ = self.fetch_blocks(&document_id).await;
                }
                Some(document_id)
            }
        }
    }

    // ==================== Documents ====================

    /// Create a document with the default title and icon, select it, and give
    /// it one empty paragraph at position 1.
    ///
    /// Waits for the server row before touching the cache. If only the
    /// default block fails, the document is kept with no blocks.
    pub async fn create_document(&self) -> Result<SyncOutcome<Document>> {
        let operation = Operation::CreateDocument;
        if !self.permitted(operation) {
            return Ok(SyncOutcome::Denied);
        }
        self.set_saving(true);
        self.transition(operation, MutationState::RemotePending);

        let new_document = NewDocument {
            workspace_id: self.workspace.id.clone(),
            title: self.config.default_document_title.clone(),
            icon: Some(self.config.default_document_icon.clone()),
            parent_id: None,
        };
        let document = match self.remote.create_document(&new_document).await {
            Ok(document) => document,
            Err(e) => {
                log::error!("Failed to create document: {}", e);
                self.transition(operation, MutationState::Failed);
                self.set_saving(false);
                return Err(FolioError::remote(operation, e));
            }
        };

        let document_id = document.id.clone();
        self.write_state(|s| {
            s.documents.insert(document.clone());
            s.selection.set_active(Some(document_id.clone()));
        });
        self.emit(SyncEvent::DocumentsChanged);
        self.emit(SyncEvent::selection_changed(Some(document_id.clone())));

        let first_block = NewBlock {
            document_id: document_id.clone(),
            content: BlockContent::with_text(BlockKind::Paragraph, &self.config.first_block_text),
            position: 1.0,
        };
        let blocks = match self.remote.create_block(&first_block).await {
            Ok(block) => vec![block],
            Err(e) => {
                log::warn!(
                    "Failed to create default block for document {}: {}",
                    document_id,
                    e
                );
                Vec::new()
            }
        };
        let listed = self.write_state(|s| {
            if !s.documents.contains(&document_id) {
                return false;
            }
            s.documents.load_blocks(&document_id, blocks);
            true
        });
        if listed {
            self.emit(SyncEvent::blocks_changed(&document_id));
        }

        self.transition(operation, MutationState::Reconciled);
        self.set_saving(false);
        Ok(SyncOutcome::Reconciled(document))
    }

    /// Delete a document once the remote confirms it.
    ///
    /// On success the document and its cached blocks are dropped and, if it
    /// was active, the new head of the list (or nothing) becomes active in the
    /// same step. On failure nothing changes and the error is returned.
    pub async fn delete_document(&self, document_id: &str) -> Result<SyncOutcome> {
        let operation = Operation::DeleteDocument;
        if !self.permitted(operation) {
            return Ok(SyncOutcome::Denied);
        }
        self.set_saving(true);
        self.transition(operation, MutationState::RemotePending);

        if let Err(e) = self.remote.delete_document(document_id).await {
            log::error!("Failed to delete document {}: {}", document_id, e);
            self.transition(operation, MutationState::Failed);
            self.set_saving(false);
            return Err(FolioError::remote(operation, e));
        }

        let selection_change = self.write_state(|s| {
            s.documents.remove(document_id);
            s.selection
                .on_removed(&s.documents, document_id)
                .then(|| s.selection.active().map(str::to_string))
        });
        self.emit(SyncEvent::DocumentsChanged);
        self.emit(SyncEvent::blocks_changed(document_id));
        if let Some(active) = selection_change {
            self.emit(SyncEvent::selection_changed(active));
        }

        self.transition(operation, MutationState::Reconciled);
        self.set_saving(false);
        Ok(SyncOutcome::Reconciled(()))
    }

    /// Rename a document. Blank titles become the default title.
    pub async fn update_document_title(&self, document_id: &str, title: &str) -> SyncOutcome {
        let patch = DocumentPatch::title(self.config.normalize_title(title));
        self.update_document(document_id, patch).await
    }

    /// Change a document's icon. Blank icons become the default icon.
    pub async fn update_document_icon(&self, document_id: &str, icon: &str) -> SyncOutcome {
        let patch = DocumentPatch::icon(self.config.normalize_icon(icon));
        self.update_document(document_id, patch).await
    }

    /// Optimistically patch document fields.
    ///
    /// The cache is updated first. A remote failure is only logged: these
    /// fields are cheap to re-edit, so the local value is kept.
    pub async fn update_document(&self, document_id: &str, patch: DocumentPatch) -> SyncOutcome {
        let operation = Operation::UpdateDocument;
        if !self.permitted(operation) {
            return SyncOutcome::Denied;
        }

        let now = Utc::now();
        let patch = patch.stamped(now);
        if !self.write_state(|s| s.documents.update(document_id, &patch, now)) {
            log::warn!("Cannot update unknown document {}", document_id);
            return SyncOutcome::NotFound;
        }
        self.set_saving(true);
        self.transition(operation, MutationState::OptimisticApplied);
        self.emit(SyncEvent::DocumentsChanged);

        self.transition(operation, MutationState::RemotePending);
        let outcome = match self.remote.update_document(document_id, &patch).await {
            Ok(row) => {
                if let Some(row) = row
                    && self.write_state(|s| s.documents.reconcile(row))
                {
                    self.emit(SyncEvent::DocumentsChanged);
                }
                self.transition(operation, MutationState::Reconciled);
                SyncOutcome::Reconciled(())
            }
            Err(e) => {
                log::warn!("Failed to update document {}: {}", document_id, e);
                self.transition(operation, MutationState::Failed);
                SyncOutcome::Unconfirmed
            }
        };
        self.set_saving(false);
        outcome
    }

    // ==================== Blocks ====================

    /// Create an empty block of the configured kind at `position`.
    pub async fn create_block(
        &self,
        document_id: &str,
        position: f64,
    ) -> Result<SyncOutcome<Block>> {
        let content = BlockContent::empty(self.config.new_block_kind);
        self.create_block_with(document_id, position, content).await
    }

    /// Create an empty block after the last block of a document.
    pub async fn append_block(&self, document_id: &str) -> Result<SyncOutcome<Block>> {
        let content = BlockContent::empty(self.config.new_block_kind);
        self.append_block_with(document_id, content).await
    }

    /// Create a block with the given content after the last block of a
    /// document.
    ///
    /// Blocks that are not cached yet are fetched first so the new position
    /// lands after everything the server holds; if that fetch fails nothing
    /// is created and the fetch error is returned.
    pub async fn append_block_with(
        &self,
        document_id: &str,
        content: BlockContent,
    ) -> Result<SyncOutcome<Block>> {
        if !self.permitted(Operation::CreateBlock) {
            return Ok(SyncOutcome::Denied);
        }
        if !self.has_blocks(document_id) {
            self.fetch_blocks(document_id).await?;
        }
        let position = self.next_position(document_id);
        self.create_block_with(document_id, position, content).await
    }

    /// Create a block with the given content.
    ///
    /// Not optimistic: the block is only addressable once the server has
    /// assigned its id. Blocks of a document that is not cached are fetched
    /// first; on success the new block is inserted in display order. Rows
    /// for documents that are no longer listed are left out of the cache.
    pub async fn create_block_with(
        &self,
        document_id: &str,
        position: f64,
        content: BlockContent,
    ) -> Result<SyncOutcome<Block>> {
        let operation = Operation::CreateBlock;
        if !self.permitted(operation) {
            return Ok(SyncOutcome::Denied);
        }
        if !self.has_blocks(document_id)
            && let Err(e) = self.fetch_blocks(document_id).await
        {
            log::warn!(
                "Creating block in document {} without its cached blocks: {}",
                document_id,
                e
            );
        }
        self.set_saving(true);
        self.transition(operation, MutationState::RemotePending);

        let new_block = NewBlock {
            document_id: document_id.to_string(),
            content,
            position,
        };
        let result = match self.remote.create_block(&new_block).await {
            Ok(block) => {
                if self.write_state(|s| s.documents.reconcile_block(block.clone())) {
                    self.emit(SyncEvent::blocks_changed(document_id));
                } else {
                    log::debug!(
                        "Not caching block {} of uncached document {}",
                        block.id,
                        document_id
                    );
                }
                self.transition(operation, MutationState::Reconciled);
                Ok(SyncOutcome::Reconciled(block))
            }
            Err(e) => {
                log::error!("Failed to create block in document {}: {}", document_id, e);
                self.transition(operation, MutationState::Failed);
                Err(FolioError::remote(operation, e))
            }
        };
        self.set_saving(false);
        result
    }

    /// Optimistically patch a block.
    ///
    /// The cached block is merged immediately. On success it is replaced by
    /// the row the remote returns; on failure the owning document's blocks
    /// are re-fetched so the speculative edit does not survive.
    pub async fn update_block(&self, block_id: &str, patch: BlockPatch) -> SyncOutcome<Block> {
        let operation = Operation::UpdateBlock;
        if !self.permitted(operation) {
            return SyncOutcome::Denied;
        }
        let Some(document_id) = self.read_state(|s| s.documents.owner_of(block_id).map(str::to_string))
        else {
            log::warn!("Cannot update uncached block {}", block_id);
            return SyncOutcome::NotFound;
        };
        self.set_saving(true);

        let now = Utc::now();
        let patch = patch.stamped(now);
        self.write_state(|s| s.documents.merge_block(block_id, &patch, now));
        self.transition(operation, MutationState::OptimisticApplied);
        self.emit(SyncEvent::blocks_changed(&document_id));

        self.transition(operation, MutationState::RemotePending);
        let outcome = match self.remote.update_block(block_id, &patch).await {
            Ok(row) => {
                if self.write_state(|s| s.documents.reconcile_block(row.clone())) {
                    self.emit(SyncEvent::blocks_changed(&row.document_id));
                }
                self.transition(operation, MutationState::Reconciled);
                SyncOutcome::Reconciled(row)
            }
            Err(e) => {
                log::error!("Failed to update block {}: {}", block_id, e);
                self.resync(operation, &document_id).await
            }
        };
        self.set_saving(false);
        outcome
    }

    /// Optimistically delete a block; re-fetch its document's blocks if the
    /// remote refuses.
    pub async fn delete_block(&self, block_id: &str) -> SyncOutcome {
        let operation = Operation::DeleteBlock;
        if !self.permitted(operation) {
            return SyncOutcome::Denied;
        }
        let Some(document_id) = self.read_state(|s| s.documents.owner_of(block_id).map(str::to_string))
        else {
            log::warn!("Cannot delete uncached block {}", block_id);
            return SyncOutcome::NotFound;
        };
        self.set_saving(true);

        self.write_state(|s| s.documents.remove_block(block_id));
        self.transition(operation, MutationState::OptimisticApplied);
        self.emit(SyncEvent::blocks_changed(&document_id));

        self.transition(operation, MutationState::RemotePending);
        let outcome = match self.remote.delete_block(block_id).await {
            Ok(()) => {
                self.transition(operation, MutationState::Reconciled);
                SyncOutcome::Reconciled(())
            }
            Err(e) => {
                log::error!("Failed to delete block {}: {}", block_id, e);
                self.resync(operation, &document_id).await
            }
        };
        self.set_saving(false);
        outcome
    }
}

impl<R: RemoteStore> std::fmt::Debug for Synchronizer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("workspace", &self.workspace.id)
            .field("role", &self.session.role)
            .field("active", &self.active_document_id())
            .field("is_saving", &self.is_saving())
            .finish()
    }
}
