//! Core data types for workspaces, documents and blocks.
//!
//! These mirror the rows held by the remote store. Block content is a tagged
//! union keyed by block kind, so a heading can never carry a `checked` flag and
//! a todo always has one.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Title given to documents that have none.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled";

/// Icon given to newly created documents.
pub const DEFAULT_DOCUMENT_ICON: &str = "📝";

/// Icon shown for a document whose icon was cleared.
pub const CLEARED_DOCUMENT_ICON: &str = "📄";

/// Root scope for documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Workspace {
    /// Server-assigned workspace id
    pub id: String,
    /// Display name
    pub name: String,
    /// Display icon (usually a single emoji)
    #[serde(default)]
    pub icon: Option<String>,
    /// User id of the workspace owner
    pub owner_id: String,
}

/// A page in a workspace, composed of ordered blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Document {
    /// Server-assigned document id
    pub id: String,
    /// Owning workspace
    pub workspace_id: String,
    /// Parent document id, for nested pages
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Display title
    pub title: String,
    /// Display icon
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional cover image
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Whether the document is pinned as a favorite
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Shallow-merge `patch` into this document and stamp `updated_at`.
    ///
    /// Fields left as `None` in the patch are untouched. If the patch carries
    /// its own `updated_at` that value wins over `now`.
    pub fn apply_patch(&mut self, patch: &DocumentPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(cover) = &patch.cover_image_url {
            self.cover_image_url = Some(cover.clone());
        }
        if let Some(is_favorite) = patch.is_favorite {
            self.is_favorite = is_favorite;
        }
        self.updated_at = patch.updated_at.unwrap_or(now);
    }
}

/// Partial update of a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DocumentPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// New cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// New favorite flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    /// Client-side modification time sent along with the patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentPatch {
    /// Patch that only changes the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Patch that only changes the icon.
    pub fn icon(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            ..Default::default()
        }
    }

    /// Return a copy of this patch stamped with `now`.
    pub fn stamped(&self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            ..self.clone()
        }
    }
}

/// Insert payload for a document. The server assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewDocument {
    /// Owning workspace
    pub workspace_id: String,
    /// Initial title
    pub title: String,
    /// Initial icon
    #[serde(default)]
    pub icon: Option<String>,
    /// Parent document, if nested
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// The kind of a block, derived from its content variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Plain text
    #[default]
    Paragraph,
    /// Section heading
    Heading,
    /// Checkbox item
    Todo,
}

impl BlockKind {
    /// Stable lowercase name, as stored remotely.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading => "heading",
            BlockKind::Todo => "todo",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paragraph" | "text" => Ok(BlockKind::Paragraph),
            "heading" => Ok(BlockKind::Heading),
            "todo" | "to-do" => Ok(BlockKind::Todo),
            other => Err(format!("unknown block kind '{}'", other)),
        }
    }
}

/// Content of a block. The variant determines the block kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// Plain text
    Paragraph {
        /// Text body
        text: String,
    },
    /// Section heading
    Heading {
        /// Heading text
        text: String,
    },
    /// Checkbox item
    Todo {
        /// Item text
        text: String,
        /// Whether the item is checked
        #[serde(default)]
        checked: bool,
    },
}

impl BlockContent {
    /// An empty block of the given kind.
    pub fn empty(kind: BlockKind) -> Self {
        Self::with_text(kind, String::new())
    }

    /// A block of the given kind holding `text`. Todos start unchecked.
    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        let text = text.into();
        match kind {
            BlockKind::Paragraph => BlockContent::Paragraph { text },
            BlockKind::Heading => BlockContent::Heading { text },
            BlockKind::Todo => BlockContent::Todo {
                text,
                checked: false,
            },
        }
    }

    /// Kind of this content.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Paragraph { .. } => BlockKind::Paragraph,
            BlockContent::Heading { .. } => BlockKind::Heading,
            BlockContent::Todo { .. } => BlockKind::Todo,
        }
    }

    /// Text of the block, whatever its kind.
    pub fn text(&self) -> &str {
        match self {
            BlockContent::Paragraph { text }
            | BlockContent::Heading { text }
            | BlockContent::Todo { text, .. } => text,
        }
    }

    /// Checked state, only present on todos.
    pub fn checked(&self) -> Option<bool> {
        match self {
            BlockContent::Todo { checked, .. } => Some(*checked),
            _ => None,
        }
    }

    /// Convert to another kind, keeping the text.
    ///
    /// Converting a todo to itself keeps its checked state; any other
    /// conversion into a todo starts unchecked.
    pub fn into_kind(self, kind: BlockKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        match self {
            BlockContent::Paragraph { text }
            | BlockContent::Heading { text }
            | BlockContent::Todo { text, .. } => Self::with_text(kind, text),
        }
    }

    /// Same kind, new text. A todo keeps its checked state.
    pub fn replace_text(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        match self {
            BlockContent::Paragraph { .. } => BlockContent::Paragraph { text },
            BlockContent::Heading { .. } => BlockContent::Heading { text },
            BlockContent::Todo { checked, .. } => BlockContent::Todo {
                text,
                checked: *checked,
            },
        }
    }
}

impl Default for BlockContent {
    fn default() -> Self {
        BlockContent::empty(BlockKind::Paragraph)
    }
}

/// Atomic content unit within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Block {
    /// Server-assigned block id
    pub id: String,
    /// Owning document
    pub document_id: String,
    /// Typed content
    pub content: BlockContent,
    /// Display order within the document (ascending)
    pub position: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Block {
    /// Kind of this block.
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Apply a partial update and stamp `updated_at`.
    pub fn apply_patch(&mut self, patch: &BlockPatch, now: DateTime<Utc>) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        self.updated_at = patch.updated_at.unwrap_or(now);
    }

    /// Display order: position ascending, ties broken by id.
    pub fn display_order(a: &Block, b: &Block) -> Ordering {
        a.position
            .total_cmp(&b.position)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Partial update of a [`Block`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BlockPatch {
    /// Replacement content (also changes the kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    /// New position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    /// Client-side modification time sent along with the patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlockPatch {
    /// Patch that replaces the content.
    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    /// Patch that moves the block.
    pub fn position(position: f64) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Return a copy of this patch stamped with `now`.
    pub fn stamped(&self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            ..self.clone()
        }
    }
}

/// Insert payload for a block. The server assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewBlock {
    /// Owning document
    pub document_id: String,
    /// Initial content
    pub content: BlockContent,
    /// Position within the document
    pub position: f64,
}

/// Permission level of a user within a workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Created the workspace
    Owner,
    /// Can read and write
    #[default]
    Editor,
    /// Read-only access
    Viewer,
}

impl Role {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Resolve a membership lookup. Missing memberships are treated as editors.
    pub fn from_membership(role: Option<Role>) -> Role {
        role.unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, position: f64) -> Block {
        let now = Utc::now();
        Block {
            id: id.to_string(),
            document_id: "doc".to_string(),
            content: BlockContent::default(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_block_content_serializes_with_type_tag() {
        let content = BlockContent::Todo {
            text: "buy milk".to_string(),
            checked: true,
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "todo");
        assert_eq!(json["text"], "buy milk");
        assert_eq!(json["checked"], true);
    }

    #[test]
    fn test_todo_checked_defaults_to_false() {
        let content: BlockContent =
            serde_json::from_str(r#"{"type":"todo","text":"x"}"#).unwrap();
        assert_eq!(content.checked(), Some(false));
    }

    #[test]
    fn test_into_kind_keeps_text() {
        let heading = BlockContent::with_text(BlockKind::Paragraph, "Intro")
            .into_kind(BlockKind::Heading);
        assert_eq!(heading.kind(), BlockKind::Heading);
        assert_eq!(heading.text(), "Intro");
        assert_eq!(heading.checked(), None);

        let todo = heading.into_kind(BlockKind::Todo);
        assert_eq!(todo.checked(), Some(false));
    }

    #[test]
    fn test_replace_text_keeps_checked() {
        let todo = BlockContent::Todo {
            text: "a".to_string(),
            checked: true,
        };
        assert_eq!(
            todo.replace_text("b"),
            BlockContent::Todo {
                text: "b".to_string(),
                checked: true
            }
        );
    }

    #[test]
    fn test_display_order_is_numeric_with_id_tie_break() {
        let mut blocks = vec![block("c", 10.0), block("b", 2.0), block("a", 2.0)];
        blocks.sort_by(Block::display_order);
        let ids: Vec<_> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_block_apply_patch_stamps_updated_at() {
        let mut b = block("a", 1.0);
        let later = b.updated_at + chrono::Duration::seconds(5);
        b.apply_patch(
            &BlockPatch::content(BlockContent::with_text(BlockKind::Heading, "Title")),
            later,
        );
        assert_eq!(b.kind(), BlockKind::Heading);
        assert_eq!(b.position, 1.0);
        assert_eq!(b.updated_at, later);
    }

    #[test]
    fn test_document_apply_patch_is_shallow() {
        let now = Utc::now();
        let mut doc = Document {
            id: "d".to_string(),
            workspace_id: "w".to_string(),
            parent_id: None,
            title: "Old".to_string(),
            icon: Some("📄".to_string()),
            cover_image_url: None,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        };
        doc.apply_patch(&DocumentPatch::title("New"), now);
        assert_eq!(doc.title, "New");
        assert_eq!(doc.icon.as_deref(), Some("📄"));
    }

    #[test]
    fn test_role_from_membership_defaults_to_editor() {
        assert_eq!(Role::from_membership(None), Role::Editor);
        assert_eq!(Role::from_membership(Some(Role::Viewer)), Role::Viewer);
        assert_eq!("OWNER".parse::<Role>().unwrap(), Role::Owner);
        assert!("admin".parse::<Role>().is_err());
    }
}
