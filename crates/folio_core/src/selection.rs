//! Active-document tracking.
//!
//! The [`SelectionController`] only decides *which* document is active and
//! whether its blocks still need loading. The fetch itself is issued by the
//! synchronizer, which owns the remote store.

use crate::document_store::DocumentStore;

/// What a selection request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// The document is now active; `needs_fetch` is set when its blocks are
    /// not cached yet.
    Selected {
        /// Newly active document
        document_id: String,
        /// Whether blocks must be loaded
        needs_fetch: bool,
    },
    /// The requested document is not listed; nothing is active.
    Cleared,
}

/// Tracks the active document id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    active: Option<String>,
}

impl SelectionController {
    /// Initial selection: the first listed document, or none.
    pub fn initial(store: &DocumentStore) -> Self {
        Self {
            active: store.head().map(|d| d.id.clone()),
        }
    }

    /// Active document id.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether `document_id` is the active document.
    pub fn is_active(&self, document_id: &str) -> bool {
        self.active.as_deref() == Some(document_id)
    }

    /// Set the active id directly. Returns `true` if it changed.
    pub fn set_active(&mut self, document_id: Option<String>) -> bool {
        if self.active == document_id {
            return false;
        }
        self.active = document_id;
        true
    }

    /// Make `document_id` active.
    ///
    /// Stale ids (not in the store) clear the selection instead of failing.
    pub fn select(&mut self, store: &DocumentStore, document_id: &str) -> SelectionChange {
        if !store.contains(document_id) {
            log::debug!("Selection: '{}' is not listed, clearing", document_id);
            self.active = None;
            return SelectionChange::Cleared;
        }
        self.active = Some(document_id.to_string());
        SelectionChange::Selected {
            document_id: document_id.to_string(),
            needs_fetch: !store.has_blocks(document_id),
        }
    }

    /// Fix up the selection after `removed_id` left the store.
    ///
    /// If the removed document was active, the store's new head (or none)
    /// becomes active. Returns `true` if the selection changed.
    pub fn on_removed(&mut self, store: &DocumentStore, removed_id: &str) -> bool {
        if !self.is_active(removed_id) {
            return false;
        }
        self.active = store.head().map(|d| d.id.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::document;

    fn store(ids: &[&str]) -> DocumentStore {
        DocumentStore::with_documents(ids.iter().map(|id| document(id, id)).collect())
    }

    #[test]
    fn test_initial_selects_head() {
        assert_eq!(SelectionController::initial(&store(&["a", "b"])).active(), Some("a"));
        assert_eq!(SelectionController::initial(&store(&[])).active(), None);
    }

    #[test]
    fn test_select_reports_fetch_need() {
        let mut docs = store(&["a", "b"]);
        let mut selection = SelectionController::initial(&docs);

        assert_eq!(
            selection.select(&docs, "b"),
            SelectionChange::Selected {
                document_id: "b".to_string(),
                needs_fetch: true
            }
        );

        docs.load_blocks("b", vec![]);
        assert_eq!(
            selection.select(&docs, "b"),
            SelectionChange::Selected {
                document_id: "b".to_string(),
                needs_fetch: false
            }
        );
    }

    #[test]
    fn test_select_stale_id_clears() {
        let docs = store(&["a"]);
        let mut selection = SelectionController::initial(&docs);
        assert_eq!(selection.select(&docs, "gone"), SelectionChange::Cleared);
        assert_eq!(selection.active(), None);
    }

    #[test]
    fn test_removing_active_moves_to_head() {
        let mut docs = store(&["a", "b", "c"]);
        let mut selection = SelectionController::initial(&docs);
        selection.select(&docs, "b");

        docs.remove("b");
        assert!(selection.on_removed(&docs, "b"));
        assert_eq!(selection.active(), Some("a"));
    }

    #[test]
    fn test_removing_inactive_keeps_selection() {
        let mut docs = store(&["a", "b"]);
        let mut selection = SelectionController::initial(&docs);

        docs.remove("b");
        assert!(!selection.on_removed(&docs, "b"));
        assert_eq!(selection.active(), Some("a"));
    }

    #[test]
    fn test_removing_last_clears() {
        let mut docs = store(&["a"]);
        let mut selection = SelectionController::initial(&docs);

        docs.remove("a");
        assert!(selection.on_removed(&docs, "a"));
        assert_eq!(selection.active(), None);
    }
}
