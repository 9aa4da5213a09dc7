//! `add`, `edit`, `check`, `del` commands

use folio_core::{BlockContent, BlockKind, BlockPatch};

use crate::cli::util::{format_block, report, resolve_block, resolve_document};
use crate::cli::{CliSynchronizer, block_on};

pub fn handle_add(
    sync: &CliSynchronizer,
    document: Option<String>,
    text: Option<String>,
    kind: Option<BlockKind>,
    at: Option<f64>,
) -> bool {
    let document_id = match resolve_document(sync, document.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };
    let kind = kind.unwrap_or(sync.config().new_block_kind);
    let content = BlockContent::with_text(kind, text.unwrap_or_default());
    let result = match at {
        Some(position) => block_on(sync.create_block_with(&document_id, position, content)),
        None => block_on(sync.append_block_with(&document_id, content)),
    };
    match result {
        Ok(outcome) => {
            let done = match outcome.value() {
                Some(block) => format!("Added {}", format_block(block)),
                None => String::new(),
            };
            report(sync, &outcome, &done)
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

pub fn handle_edit(
    sync: &CliSynchronizer,
    document: Option<String>,
    block: &str,
    text: Option<String>,
    kind: Option<BlockKind>,
    at: Option<f64>,
) -> bool {
    let current = match resolve_block(sync, document.as_deref(), block) {
        Ok(block) => block,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let mut content = current.content.clone();
    if let Some(text) = text {
        content = content.replace_text(text);
    }
    if let Some(kind) = kind {
        content = content.into_kind(kind);
    }
    let patch = BlockPatch {
        content: (content != current.content).then_some(content),
        position: at,
        updated_at: None,
    };
    if patch.content.is_none() && patch.position.is_none() {
        eprintln!("✗ Nothing to change; pass text, --kind or --at");
        return false;
    }

    let outcome = block_on(sync.update_block(&current.id, patch));
    let done = match outcome.value() {
        Some(updated) => format!("Updated {}", format_block(updated)),
        None => String::new(),
    };
    report(sync, &outcome, &done)
}

pub fn handle_check(
    sync: &CliSynchronizer,
    document: Option<String>,
    block: &str,
    off: bool,
) -> bool {
    let current = match resolve_block(sync, document.as_deref(), block) {
        Ok(block) => block,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };
    let BlockContent::Todo { text, .. } = &current.content else {
        eprintln!(
            "✗ Block {} is a {}, not a todo",
            current.id,
            current.kind()
        );
        return false;
    };

    let content = BlockContent::Todo {
        text: text.clone(),
        checked: !off,
    };
    let outcome = block_on(sync.update_block(&current.id, BlockPatch::content(content)));
    let done = match outcome.value() {
        Some(updated) => format_block(updated),
        None => String::new(),
    };
    report(sync, &outcome, &done)
}

pub fn handle_del(sync: &CliSynchronizer, document: Option<String>, block: &str) -> bool {
    let current = match resolve_block(sync, document.as_deref(), block) {
        Ok(block) => block,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };
    let outcome = block_on(sync.delete_block(&current.id));
    report(sync, &outcome, &format!("Deleted block {}", current.id))
}
