//! Events emitted by the synchronizer.
//!
//! Front ends subscribe to these (see [`CallbackRegistry`](crate::callback_registry::CallbackRegistry))
//! to know when to re-read the cached state. Events carry ids, not rows; the
//! current rows are always read back from the synchronizer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::permission::Operation;

/// Lifecycle of a single mutation.
///
/// `Idle → OptimisticApplied (if applicable) → RemotePending → {Reconciled | RolledBack | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum MutationState {
    /// Nothing started yet
    Idle,
    /// The local cache already shows the change
    OptimisticApplied,
    /// Waiting for the remote store
    RemotePending,
    /// The remote accepted the change and the cache matches it
    Reconciled,
    /// The remote refused the change and the cache was re-fetched
    RolledBack,
    /// The remote refused the change and there was nothing to re-fetch
    /// (non-optimistic operations, or title/icon edits kept as-is)
    Failed,
}

impl MutationState {
    /// Whether the mutation is over.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MutationState::Reconciled | MutationState::RolledBack | MutationState::Failed
        )
    }
}

/// Changes observable by front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type")]
pub enum SyncEvent {
    /// The document list (order, membership or fields) changed.
    DocumentsChanged,

    /// The cached blocks of a document changed.
    BlocksChanged {
        /// Document whose blocks changed.
        document_id: String,
    },

    /// The active document changed.
    SelectionChanged {
        /// Newly active document, if any.
        #[serde(default)]
        document_id: Option<String>,
    },

    /// The advisory saving flag flipped.
    SavingChanged {
        /// New flag value.
        is_saving: bool,
    },

    /// A mutation moved to a new lifecycle state.
    MutationStateChanged {
        /// Operation being run.
        operation: Operation,
        /// New state.
        state: MutationState,
    },
}

impl SyncEvent {
    /// Shorthand for [`SyncEvent::BlocksChanged`].
    pub fn blocks_changed(document_id: impl Into<String>) -> Self {
        SyncEvent::BlocksChanged {
            document_id: document_id.into(),
        }
    }

    /// Shorthand for [`SyncEvent::SelectionChanged`].
    pub fn selection_changed(document_id: Option<String>) -> Self {
        SyncEvent::SelectionChanged { document_id }
    }
}
