//! Shared CLI utilities

use folio_core::{Block, BlockContent, Document, SyncOutcome};

use crate::cli::CliSynchronizer;

/// Number of id characters shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Shortened id for display.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Resolve a user-supplied id against known ids: an exact match wins,
/// otherwise the query must be a prefix of exactly one id.
pub fn resolve_id<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    query: &str,
    what: &str,
) -> Result<String, String> {
    let mut matches = Vec::new();
    for id in ids {
        if id == query {
            return Ok(id.to_string());
        }
        if id.starts_with(query) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [] => Err(format!("No {} matches '{}'", what, query)),
        [only] => Ok(only.to_string()),
        many => Err(format!(
            "'{}' matches {} {}s; use a longer prefix",
            query,
            many.len(),
            what
        )),
    }
}

/// Resolve a document argument, defaulting to the active document.
pub fn resolve_document(sync: &CliSynchronizer, query: Option<&str>) -> Result<String, String> {
    match query {
        Some(query) => {
            let documents = sync.documents();
            resolve_id(documents.iter().map(|d| d.id.as_str()), query, "document")
        }
        None => sync
            .active_document_id()
            .ok_or_else(|| "The workspace has no documents; run 'folio new' first".to_string()),
    }
}

/// Resolve a block argument within a document, loading its blocks first.
pub fn resolve_block(
    sync: &CliSynchronizer,
    document: Option<&str>,
    query: &str,
) -> Result<Block, String> {
    let document_id = resolve_document(sync, document)?;
    crate::cli::block_on(sync.select_document(&document_id));
    let blocks = sync.blocks(&document_id);
    let id = resolve_id(blocks.iter().map(|b| b.id.as_str()), query, "block")?;
    sync.block(&id)
        .ok_or_else(|| format!("Block '{}' is no longer cached", id))
}

/// One-line rendering of a document.
pub fn format_document(document: &Document, active: bool) -> String {
    format!(
        "{} {} {}  {}",
        if active { "*" } else { " " },
        short_id(&document.id),
        document.icon.as_deref().unwrap_or(" "),
        document.title
    )
}

/// One-line rendering of a block.
pub fn format_block(block: &Block) -> String {
    let body = match &block.content {
        BlockContent::Paragraph { text } => text.clone(),
        BlockContent::Heading { text } => format!("# {}", text),
        BlockContent::Todo { text, checked } => {
            format!("[{}] {}", if *checked { "x" } else { " " }, text)
        }
    };
    format!("{}  {}", short_id(&block.id), body)
}

/// Print how a mutation ended. Returns true if the store accepted it.
pub fn report<T>(sync: &CliSynchronizer, outcome: &SyncOutcome<T>, done: &str) -> bool {
    match outcome {
        SyncOutcome::Reconciled(_) => {
            println!("✓ {}", done);
            true
        }
        SyncOutcome::Denied => {
            eprintln!(
                "✗ Role '{}' cannot modify workspace '{}'",
                sync.role(),
                sync.workspace().id
            );
            false
        }
        SyncOutcome::NotFound => {
            eprintln!("✗ Nothing to change");
            false
        }
        SyncOutcome::RolledBack => {
            eprintln!("✗ The store rejected the change; reloaded the document");
            false
        }
        SyncOutcome::Invalidated => {
            eprintln!("✗ The store rejected the change and could not be reloaded");
            false
        }
        SyncOutcome::Unconfirmed => {
            eprintln!("⚠ The store did not confirm the change");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_resolve_exact_beats_prefix() {
        let ids = ["ab", "abc"];
        assert_eq!(resolve_id(ids, "ab", "block").unwrap(), "ab");
        assert_eq!(resolve_id(ids, "abc", "block").unwrap(), "abc");
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let ids = ["1f2e", "9a0b"];
        assert_eq!(resolve_id(ids, "9", "document").unwrap(), "9a0b");
    }

    #[test]
    fn test_resolve_ambiguous_and_missing() {
        let ids = ["aa1", "aa2"];
        let err = resolve_id(ids, "aa", "block").unwrap_err();
        assert!(err.contains("matches 2 blocks"));
        let err = resolve_id(ids, "zz", "block").unwrap_err();
        assert_eq!(err, "No block matches 'zz'");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_format_block_kinds() {
        let now = Utc::now();
        let mut block = Block {
            id: "b1".to_string(),
            document_id: "d".to_string(),
            content: BlockContent::Todo {
                text: "ship".to_string(),
                checked: true,
            },
            position: 1.0,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(format_block(&block), "b1  [x] ship");

        block.content = BlockContent::Heading {
            text: "Plan".to_string(),
        };
        assert_eq!(format_block(&block), "b1  # Plan");
    }
}
