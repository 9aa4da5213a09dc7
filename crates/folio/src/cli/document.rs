//! `list`, `show`, `new`, `rm`, `title`, `icon` commands

use folio_core::SyncOutcome;

use crate::cli::util::{format_block, format_document, report, resolve_document};
use crate::cli::{CliSynchronizer, block_on};

pub fn handle_list(sync: &CliSynchronizer) -> bool {
    let documents = sync.documents();
    if documents.is_empty() {
        println!("No documents in workspace '{}'", sync.workspace().name);
        return true;
    }
    let active = sync.active_document_id();
    for document in &documents {
        println!(
            "{}",
            format_document(document, active.as_deref() == Some(document.id.as_str()))
        );
    }
    true
}

pub fn handle_show(sync: &CliSynchronizer, document: Option<String>) -> bool {
    let document_id = match resolve_document(sync, document.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };
    if block_on(sync.select_document(&document_id)).is_none() {
        eprintln!("✗ Document '{}' is gone", document_id);
        return false;
    }
    let Some(document) = sync.active_document() else {
        eprintln!("✗ Document '{}' is gone", document_id);
        return false;
    };

    println!(
        "{} {}",
        document.icon.as_deref().unwrap_or(""),
        document.title
    );
    println!("{}", "=".repeat(document.title.chars().count() + 3));
    let blocks = sync.active_blocks();
    if blocks.is_empty() {
        println!("(empty)");
    }
    for block in &blocks {
        println!("{}", format_block(block));
    }
    true
}

pub fn handle_new(sync: &CliSynchronizer, title: Option<String>) -> bool {
    let document = match block_on(sync.create_document()) {
        Ok(SyncOutcome::Reconciled(document)) => document,
        Ok(outcome) => return report(sync, &outcome, "Created document"),
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };
    if let Some(title) = title {
        let outcome = block_on(sync.update_document_title(&document.id, &title));
        if !outcome.is_reconciled() {
            return report(sync, &outcome, "Renamed document");
        }
    }
    let title = sync
        .document(&document.id)
        .map(|d| d.title)
        .unwrap_or(document.title);
    println!("✓ Created '{}' ({})", title, document.id);
    true
}

pub fn handle_rm(sync: &CliSynchronizer, document: &str) -> bool {
    let document_id = match resolve_document(sync, Some(document)) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };
    match block_on(sync.delete_document(&document_id)) {
        Ok(outcome) => report(sync, &outcome, &format!("Deleted document {}", document_id)),
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

pub fn handle_title(sync: &CliSynchronizer, document: &str, title: &str) -> bool {
    match resolve_document(sync, Some(document)) {
        Ok(id) => {
            let outcome = block_on(sync.update_document_title(&id, title));
            report(sync, &outcome, "Renamed document")
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

pub fn handle_icon(sync: &CliSynchronizer, document: &str, icon: &str) -> bool {
    match resolve_document(sync, Some(document)) {
        Ok(id) => {
            let outcome = block_on(sync.update_document_icon(&id, icon));
            report(sync, &outcome, "Changed icon")
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}
