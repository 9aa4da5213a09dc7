//! Command pattern API for driving a synchronizer.
//!
//! Front ends that talk to the library over a serialized boundary (WASM, IPC,
//! a CLI) send a [`Command`] and get a [`Response`] back instead of calling
//! the individual [`Synchronizer`](crate::synchronizer::Synchronizer) methods.
//!
//! # Usage
//!
//! ```ignore
//! use folio_core::{Command, Response};
//!
//! let response = synchronizer
//!     .execute(Command::SelectDocument { document_id: "doc-1".to_string() })
//!     .await?;
//!
//! if let Response::Selection(Some(id)) = response {
//!     println!("Now editing {}", id);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::permission::Operation;
use crate::synchronizer::{SyncOutcome, WorkspaceSnapshot};
use crate::types::{Block, BlockContent, BlockPatch, Document, DocumentPatch};

// ============================================================================
// Command Types
// ============================================================================

/// All commands that can be executed against a synchronizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Command {
    // === Reads ===
    /// List cached documents in presentation order.
    ListDocuments,

    /// Get one cached document.
    GetDocument {
        /// Document id.
        document_id: String,
    },

    /// Get the cached blocks of a document.
    GetBlocks {
        /// Document id.
        document_id: String,
    },

    /// Get one cached block.
    GetBlock {
        /// Block id.
        block_id: String,
    },

    /// Get a snapshot of the whole session.
    GetState,

    // === Selection ===
    /// Make a document active, loading its blocks if needed.
    SelectDocument {
        /// Document id.
        document_id: String,
    },

    /// Reload the blocks of a document from the remote store.
    FetchBlocks {
        /// Document id.
        document_id: String,
    },

    // === Documents ===
    /// Create a document with the default title and icon.
    CreateDocument,

    /// Delete a document.
    DeleteDocument {
        /// Document id.
        document_id: String,
    },

    /// Rename a document.
    SetDocumentTitle {
        /// Document id.
        document_id: String,
        /// New title. Blank becomes the default title.
        title: String,
    },

    /// Change a document's icon.
    SetDocumentIcon {
        /// Document id.
        document_id: String,
        /// New icon. Blank becomes the default icon.
        icon: String,
    },

    /// Patch arbitrary document fields.
    UpdateDocument {
        /// Document id.
        document_id: String,
        /// Fields to change.
        patch: DocumentPatch,
    },

    // === Blocks ===
    /// Create a block at a position.
    CreateBlock {
        /// Owning document.
        document_id: String,
        /// Position within the document.
        position: f64,
        /// Initial content. Defaults to an empty block of the configured kind.
        #[serde(default)]
        content: Option<BlockContent>,
    },

    /// Create an empty block after the last one.
    AppendBlock {
        /// Owning document.
        document_id: String,
    },

    /// Patch a block.
    UpdateBlock {
        /// Block id.
        block_id: String,
        /// Fields to change.
        patch: BlockPatch,
    },

    /// Delete a block.
    DeleteBlock {
        /// Block id.
        block_id: String,
    },
}

impl Command {
    /// Synchronizer operation this command performs, or `None` for cache reads.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Command::ListDocuments
            | Command::GetDocument { .. }
            | Command::GetBlocks { .. }
            | Command::GetBlock { .. }
            | Command::GetState => None,
            Command::SelectDocument { .. } => Some(Operation::SelectDocument),
            Command::FetchBlocks { .. } => Some(Operation::FetchBlocks),
            Command::CreateDocument => Some(Operation::CreateDocument),
            Command::DeleteDocument { .. } => Some(Operation::DeleteDocument),
            Command::SetDocumentTitle { .. }
            | Command::SetDocumentIcon { .. }
            | Command::UpdateDocument { .. } => Some(Operation::UpdateDocument),
            Command::CreateBlock { .. } | Command::AppendBlock { .. } => {
                Some(Operation::CreateBlock)
            }
            Command::UpdateBlock { .. } => Some(Operation::UpdateBlock),
            Command::DeleteBlock { .. } => Some(Operation::DeleteBlock),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Responses from command execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Response {
    /// Command completed with no data.
    Ok,

    /// Document list response.
    Documents(Vec<Document>),

    /// Single document response.
    Document(Document),

    /// Block list response.
    Blocks(Vec<Block>),

    /// Single block response.
    Block(Block),

    /// Session snapshot response.
    State(WorkspaceSnapshot),

    /// Active document after a selection.
    Selection(Option<String>),

    /// Number of rows loaded.
    Count(usize),

    /// Outcome of a document-creating mutation.
    DocumentOutcome(SyncOutcome<Document>),

    /// Outcome of a block-returning mutation.
    BlockOutcome(SyncOutcome<Block>),

    /// Outcome of a mutation with no payload.
    Outcome(SyncOutcome<()>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let cmd = Command::SetDocumentTitle {
            document_id: "d".to_string(),
            title: "Hello".to_string(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "SetDocumentTitle");
        assert_eq!(json["params"]["title"], "Hello");

        let unit: Command = serde_json::from_str(r#"{"type":"CreateDocument"}"#).unwrap();
        assert_eq!(unit, Command::CreateDocument);
    }

    #[test]
    fn test_command_operation() {
        assert_eq!(Command::GetState.operation(), None);
        assert_eq!(
            Command::AppendBlock {
                document_id: "d".to_string()
            }
            .operation(),
            Some(Operation::CreateBlock)
        );
        assert_eq!(
            Command::SetDocumentIcon {
                document_id: "d".to_string(),
                icon: "x".to_string(),
            }
            .operation(),
            Some(Operation::UpdateDocument)
        );
    }

    #[test]
    fn test_create_block_content_is_optional() {
        let cmd: Command = serde_json::from_str(
            r#"{"type":"CreateBlock","params":{"document_id":"d","position":2.5}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::CreateBlock {
                document_id: "d".to_string(),
                position: 2.5,
                content: None,
            }
        );
    }

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::to_value(Response::Outcome(SyncOutcome::RolledBack)).unwrap();
        assert_eq!(json["type"], "Outcome");
        assert_eq!(json["data"]["status"], "rolled_back");
    }
}
