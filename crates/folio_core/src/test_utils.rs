//! Test utilities for folio_core
//!
//! Row builders and a pre-seeded remote store shared by the unit tests.

use chrono::Utc;

use crate::remote::MemoryRemoteStore;
use crate::types::{Block, BlockContent, BlockKind, Document, Workspace};

/// Workspace id used by every fixture.
pub const WORKSPACE_ID: &str = "ws-1";

/// A workspace owned by `u-1`.
pub fn workspace() -> Workspace {
    Workspace {
        id: WORKSPACE_ID.to_string(),
        name: "Team".to_string(),
        icon: Some("🏠".to_string()),
        owner_id: "u-1".to_string(),
    }
}

/// A document row in [`WORKSPACE_ID`].
pub fn document(id: &str, title: &str) -> Document {
    let now = Utc::now();
    Document {
        id: id.to_string(),
        workspace_id: WORKSPACE_ID.to_string(),
        parent_id: None,
        title: title.to_string(),
        icon: Some("📄".to_string()),
        cover_image_url: None,
        is_favorite: false,
        created_at: now,
        updated_at: now,
    }
}

/// A paragraph block row.
pub fn block(id: &str, document_id: &str, position: f64, text: &str) -> Block {
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

/// Remote store holding documents `A` (newest) and `B`, where `A` has a
/// single block `1` with text "x" at position 1.
pub fn seeded_remote() -> MemoryRemoteStore {
    let mut b = document("B", "Second");
    b.updated_at = b.updated_at - chrono::Duration::minutes(5);
    MemoryRemoteStore::new()
        .with_document(document("A", "First"))
        .with_document(b)
        .with_block(block("1", "A", 1.0, "x"))
}
