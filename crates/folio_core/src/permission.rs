//! Permission gate for synchronizer operations.
//!
//! Owners and editors have full CRUD; viewers are read-only. The gate returns
//! a typed [`PermissionDenied`] so the rule stays testable on its own, even
//! though the synchronizer turns a denial into a silent no-op.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::Role;

/// Every operation the synchronizer exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Load the blocks of a document
    FetchBlocks,
    /// Change the active document
    SelectDocument,
    /// Create a document with its default block
    CreateDocument,
    /// Delete a document and its blocks
    DeleteDocument,
    /// Edit document fields (title, icon, ...)
    UpdateDocument,
    /// Create a block
    CreateBlock,
    /// Edit a block
    UpdateBlock,
    /// Delete a block
    DeleteBlock,
}

impl Operation {
    /// All operations, reads first.
    pub const ALL: [Operation; 8] = [
        Operation::FetchBlocks,
        Operation::SelectDocument,
        Operation::CreateDocument,
        Operation::DeleteDocument,
        Operation::UpdateDocument,
        Operation::CreateBlock,
        Operation::UpdateBlock,
        Operation::DeleteBlock,
    ];

    /// Whether the operation writes to the remote store.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Operation::FetchBlocks | Operation::SelectDocument)
    }

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchBlocks => "fetch_blocks",
            Operation::SelectDocument => "select_document",
            Operation::CreateDocument => "create_document",
            Operation::DeleteDocument => "delete_document",
            Operation::UpdateDocument => "update_document",
            Operation::CreateBlock => "create_block",
            Operation::UpdateBlock => "update_block",
            Operation::DeleteBlock => "delete_block",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role tried to run an operation it is not allowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("role '{role}' may not {operation}")]
pub struct PermissionDenied {
    /// Role of the caller
    pub role: Role,
    /// Refused operation
    pub operation: Operation,
}

/// Whether a role may create, update or delete anything.
pub fn can_mutate(role: Role) -> bool {
    matches!(role, Role::Owner | Role::Editor)
}

/// Operations a role is allowed to run.
pub fn allowed_operations(role: Role) -> Vec<Operation> {
    Operation::ALL
        .into_iter()
        .filter(|op| !op.is_mutating() || can_mutate(role))
        .collect()
}

/// Role-bound permission check consulted before every mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGate {
    role: Role,
}

impl PermissionGate {
    /// Gate for the given role.
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Role this gate checks.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the role may mutate at all.
    pub fn can_mutate(&self) -> bool {
        can_mutate(self.role)
    }

    /// Check a single operation.
    pub fn authorize(&self, operation: Operation) -> Result<(), PermissionDenied> {
        if operation.is_mutating() && !self.can_mutate() {
            return Err(PermissionDenied {
                role: self.role,
                operation,
            });
        }
        Ok(())
    }
}
