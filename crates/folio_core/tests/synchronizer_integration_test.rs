//! Integration tests for the synchronizer against remote stores that suspend

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use folio_core::events::{MutationState, SyncEvent};
use folio_core::remote::{BoxFuture, RemoteMethod, RemoteResult};
use folio_core::types::{NewBlock, NewDocument};
use folio_core::{
    Block, BlockContent, BlockKind, BlockPatch, Config, Document, DocumentPatch,
    MemoryRemoteStore, RemoteStore, Role, SyncOutcome, Synchronizer, UserIdentity, Workspace,
};
use futures_lite::future::{block_on, yield_now, zip};

/// Remote store that yields once before every call, so concurrently polled
/// operations interleave the way they would over a network.
struct YieldingRemote {
    inner: MemoryRemoteStore,
}

impl RemoteStore for YieldingRemote {
    fn list_documents<'a>(
        &'a self,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Vec<Document>>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.list_documents(workspace_id).await
        })
    }

    fn list_blocks<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<Vec<Block>>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.list_blocks(document_id).await
        })
    }

    fn create_document<'a>(
        &'a self,
        document: &'a NewDocument,
    ) -> BoxFuture<'a, RemoteResult<Document>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.create_document(document).await
        })
    }

    fn update_document<'a>(
        &'a self,
        document_id: &'a str,
        patch: &'a DocumentPatch,
    ) -> BoxFuture<'a, RemoteResult<Option<Document>>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.update_document(document_id, patch).await
        })
    }

    fn delete_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.delete_document(document_id).await
        })
    }

    fn create_block<'a>(&'a self, block: &'a NewBlock) -> BoxFuture<'a, RemoteResult<Block>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.create_block(block).await
        })
    }

    fn update_block<'a>(
        &'a self,
        block_id: &'a str,
        patch: &'a BlockPatch,
    ) -> BoxFuture<'a, RemoteResult<Block>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.update_block(block_id, patch).await
        })
    }

    fn delete_block<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.delete_block(block_id).await
        })
    }

    fn get_member_role<'a>(
        &'a self,
        workspace_id: &'a str,
        user_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Option<Role>>> {
        Box::pin(async move {
            yield_now().await;
            self.inner.get_member_role(workspace_id, user_id).await
        })
    }
}

fn workspace() -> Workspace {
    Workspace {
        id: "ws".to_string(),
        name: "Team".to_string(),
        icon: None,
        owner_id: "owner".to_string(),
    }
}

fn document(id: &str, age_minutes: i64) -> Document {
    let at = Utc::now() - Duration::minutes(age_minutes);
    Document {
        id: id.to_string(),
        workspace_id: "ws".to_string(),
        parent_id: None,
        title: format!("Doc {}", id),
        icon: None,
        cover_image_url: None,
        is_favorite: false,
        created_at: at,
        updated_at: at,
    }
}

fn block(id: &str, document_id: &str, position: f64, text: &str) -> Block {
    let now = Utc::now();
    Block {
        id: id.to_string(),
        document_id: document_id.to_string(),
        content: BlockContent::with_text(BlockKind::Paragraph, text),
        position,
        created_at: now,
        updated_at: now,
    }
}

fn seeded() -> MemoryRemoteStore {
    MemoryRemoteStore::new()
        .with_document(document("A", 0))
        .with_document(document("B", 10))
        .with_block(block("a1", "A", 1.0, "alpha"))
        .with_block(block("a2", "A", 2.0, "beta"))
        .with_block(block("b1", "B", 1.0, "gamma"))
        .with_member("ws", "editor", Role::Editor)
        .with_member("ws", "viewer", Role::Viewer)
}

fn open(inner: &MemoryRemoteStore, user: &str) -> Synchronizer<YieldingRemote> {
    block_on(Synchronizer::bootstrap(
        YieldingRemote {
            inner: inner.clone(),
        },
        workspace(),
        UserIdentity::new(user, None),
        Config::default(),
    ))
    .unwrap()
}

fn ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.id.as_str()).collect()
}

#[test]
fn test_bootstrap_through_suspending_remote() {
    let inner = seeded();
    let sync = open(&inner, "editor");

    assert_eq!(sync.role(), Role::Editor);
    assert_eq!(sync.active_document_id().as_deref(), Some("A"));
    assert_eq!(ids(&sync.active_blocks()), vec!["a1", "a2"]);
}

#[test]
fn test_concurrent_block_updates_both_reconcile() {
    let inner = seeded();
    let sync = open(&inner, "editor");

    let (first, second) = block_on(zip(
        sync.update_block(
            "a1",
            BlockPatch::content(BlockContent::with_text(BlockKind::Heading, "Title")),
        ),
        sync.update_block("a2", BlockPatch::position(0.5)),
    ));

    assert!(first.is_reconciled());
    assert!(second.is_reconciled());
    assert_eq!(ids(&sync.blocks("A")), vec!["a2", "a1"]);
    assert_eq!(sync.block("a1").unwrap().kind(), BlockKind::Heading);
    assert_eq!(sync.blocks("A"), inner.blocks_of("A"));
    assert!(!sync.is_saving());
}

#[test]
fn test_concurrent_updates_one_failing() {
    let inner = seeded();
    let sync = open(&inner, "editor");
    inner.fail_once(RemoteMethod::UpdateBlock);

    let (first, second) = block_on(zip(
        sync.update_block("a1", BlockPatch::position(9.0)),
        sync.update_block(
            "a2",
            BlockPatch::content(BlockContent::with_text(BlockKind::Paragraph, "kept")),
        ),
    ));

    assert_eq!(first, SyncOutcome::RolledBack);
    assert!(second.is_reconciled());
    // Whatever the interleaving, the cache ends up matching the server.
    assert_eq!(sync.blocks("A"), inner.blocks_of("A"));
    assert_eq!(sync.block("a1").unwrap().position, 1.0);
    assert_eq!(sync.block("a2").unwrap().content.text(), "kept");
}

#[test]
fn test_fetch_for_document_deleted_in_flight_is_discarded() {
    let inner = seeded();
    let sync = open(&inner, "editor");

    let (deleted, selected) = block_on(zip(sync.delete_document("B"), sync.select_document("B")));

    assert!(deleted.unwrap().is_reconciled());
    assert_eq!(selected.as_deref(), Some("B"));
    assert!(sync.document("B").is_none());
    assert!(!sync.has_blocks("B"));
    assert_eq!(sync.active_document_id().as_deref(), Some("A"));
}

#[test]
fn test_create_document_flow_with_events() {
    let inner = seeded();
    let sync = open(&inner, "editor");
    inner.queue_ids(["doc-9", "blk-1"]);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    sync.subscribe(Arc::new(move |event| sink.lock().unwrap().push(event.clone())));

    let created = block_on(sync.create_document())
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(created.id, "doc-9");
    assert_eq!(sync.documents()[0].id, "doc-9");
    assert_eq!(ids(&sync.active_blocks()), vec!["blk-1"]);

    let events = events.lock().unwrap();
    assert_eq!(events.first(), Some(&SyncEvent::SavingChanged { is_saving: true }));
    assert_eq!(events.last(), Some(&SyncEvent::SavingChanged { is_saving: false }));
    assert!(events.contains(&SyncEvent::selection_changed(Some("doc-9".to_string()))));
    assert!(events.contains(&SyncEvent::MutationStateChanged {
        operation: folio_core::permission::Operation::CreateDocument,
        state: MutationState::Reconciled,
    }));
}

#[test]
fn test_viewer_session_reads_but_never_writes() {
    let inner = seeded();
    let sync = open(&inner, "viewer");
    let calls = inner.total_calls();

    assert!(!sync.can_edit());
    assert_eq!(block_on(sync.delete_block("a1")), SyncOutcome::Denied);
    assert_eq!(
        block_on(sync.update_document_title("A", "Nope")),
        SyncOutcome::Denied
    );
    assert_eq!(inner.total_calls(), calls);

    assert_eq!(block_on(sync.select_document("B")).as_deref(), Some("B"));
    assert_eq!(ids(&sync.active_blocks()), vec!["b1"]);
}

#[test]
fn test_works_through_shared_dyn_store() {
    let inner = seeded();
    let remote: Arc<dyn RemoteStore> = Arc::new(YieldingRemote {
        inner: inner.clone(),
    });
    let sync = block_on(Synchronizer::bootstrap(
        remote,
        workspace(),
        UserIdentity::new("editor", None),
        Config::default(),
    ))
    .unwrap();

    let appended = block_on(sync.append_block("A"))
        .unwrap()
        .into_value()
        .unwrap();
    assert_eq!(appended.position, 3.0);
    assert_eq!(inner.blocks_of("A").len(), 3);
}
