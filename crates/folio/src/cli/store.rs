//! JSON-file-backed remote store.
//!
//! The whole store is one pretty-printed JSON file holding workspaces,
//! documents, blocks and memberships. Every successful write rewrites the
//! file; a write that cannot be persisted leaves the in-memory copy untouched
//! and is reported as a remote failure.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use folio_core::remote::{BoxFuture, RemoteResult};
use folio_core::types::{NewBlock, NewDocument};
use folio_core::{
    Block, BlockPatch, Document, DocumentPatch, RemoteError, RemoteStore, Role, Workspace,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write store '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Store '{path}' is not valid: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Membership {
    workspace_id: String,
    user_id: String,
    role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    workspaces: Vec<Workspace>,
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    blocks: Vec<Block>,
    #[serde(default)]
    members: Vec<Membership>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Remote store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            StoreData::default()
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Apply `f` to a copy of the data and commit it once it is on disk.
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreData) -> RemoteResult<T>) -> RemoteResult<T> {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        let mut next = data.clone();
        let out = f(&mut next)?;
        self.persist(&next)
            .map_err(|e| RemoteError::new(e.to_string()))?;
        *data = next;
        Ok(out)
    }

    /// Find a workspace, creating (and persisting) it if it does not exist.
    pub fn ensure_workspace(&self, workspace_id: &str, owner_id: &str) -> Result<Workspace, StoreError> {
        if let Some(existing) = self.read().workspaces.iter().find(|w| w.id == workspace_id) {
            return Ok(existing.clone());
        }
        let workspace = Workspace {
            id: workspace_id.to_string(),
            name: workspace_id.to_string(),
            icon: None,
            owner_id: owner_id.to_string(),
        };
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        let mut next = data.clone();
        next.workspaces.push(workspace.clone());
        next.members.push(Membership {
            workspace_id: workspace_id.to_string(),
            user_id: owner_id.to_string(),
            role: Role::Owner,
        });
        self.persist(&next)?;
        *data = next;
        log::info!("Created workspace {} owned by {}", workspace_id, owner_id);
        Ok(workspace)
    }

    /// Grant `user_id` a role in a workspace, replacing any previous one.
    pub fn set_member(&self, workspace_id: &str, user_id: &str, role: Role) -> Result<(), StoreError> {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        let mut next = data.clone();
        next.members
            .retain(|m| !(m.workspace_id == workspace_id && m.user_id == user_id));
        next.members.push(Membership {
            workspace_id: workspace_id.to_string(),
            user_id: user_id.to_string(),
            role,
        });
        self.persist(&next)?;
        *data = next;
        Ok(())
    }
}

impl RemoteStore for JsonFileStore {
    fn list_documents<'a>(
        &'a self,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Vec<Document>>> {
        Box::pin(async move {
            let mut documents: Vec<Document> = self
                .read()
                .documents
                .iter()
                .filter(|d| d.workspace_id == workspace_id)
                .cloned()
                .collect();
            documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(documents)
        })
    }

    fn list_blocks<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<Vec<Block>>> {
        Box::pin(async move {
            let mut blocks: Vec<Block> = self
                .read()
                .blocks
                .iter()
                .filter(|b| b.document_id == document_id)
                .cloned()
                .collect();
            blocks.sort_by(Block::display_order);
            Ok(blocks)
        })
    }

    fn create_document<'a>(
        &'a self,
        document: &'a NewDocument,
    ) -> BoxFuture<'a, RemoteResult<Document>> {
        Box::pin(async move {
            self.mutate(|data| {
                if !data.workspaces.iter().any(|w| w.id == document.workspace_id) {
                    return Err(RemoteError::not_found("workspaces", &document.workspace_id));
                }
                let now = Utc::now();
                let row = Document {
                    id: new_id(),
                    workspace_id: document.workspace_id.clone(),
                    parent_id: document.parent_id.clone(),
                    title: document.title.clone(),
                    icon: document.icon.clone(),
                    cover_image_url: None,
                    is_favorite: false,
                    created_at: now,
                    updated_at: now,
                };
                data.documents.push(row.clone());
                Ok(row)
            })
        })
    }

    fn update_document<'a>(
        &'a self,
        document_id: &'a str,
        patch: &'a DocumentPatch,
    ) -> BoxFuture<'a, RemoteResult<Option<Document>>> {
        Box::pin(async move {
            self.mutate(|data| {
                let row = data
                    .documents
                    .iter_mut()
                    .find(|d| d.id == document_id)
                    .ok_or_else(|| RemoteError::not_found("documents", document_id))?;
                row.apply_patch(patch, Utc::now());
                Ok(Some(row.clone()))
            })
        })
    }

    fn delete_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            self.mutate(|data| {
                data.documents.retain(|d| d.id != document_id);
                data.blocks.retain(|b| b.document_id != document_id);
                Ok(())
            })
        })
    }

    fn create_block<'a>(&'a self, block: &'a NewBlock) -> BoxFuture<'a, RemoteResult<Block>> {
        Box::pin(async move {
            self.mutate(|data| {
                if !data.documents.iter().any(|d| d.id == block.document_id) {
                    return Err(RemoteError::not_found("documents", &block.document_id));
                }
                let now = Utc::now();
                let row = Block {
                    id: new_id(),
                    document_id: block.document_id.clone(),
                    content: block.content.clone(),
                    position: block.position,
                    created_at: now,
                    updated_at: now,
                };
                data.blocks.push(row.clone());
                Ok(row)
            })
        })
    }

    fn update_block<'a>(
        &'a self,
        block_id: &'a str,
        patch: &'a BlockPatch,
    ) -> BoxFuture<'a, RemoteResult<Block>> {
        Box::pin(async move {
            self.mutate(|data| {
                let row = data
                    .blocks
                    .iter_mut()
                    .find(|b| b.id == block_id)
                    .ok_or_else(|| RemoteError::not_found("blocks", block_id))?;
                row.apply_patch(patch, Utc::now());
                Ok(row.clone())
            })
        })
    }

    fn delete_block<'a>(&'a self, block_id: &'a str) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            self.mutate(|data| {
                data.blocks.retain(|b| b.id != block_id);
                Ok(())
            })
        })
    }

    fn get_member_role<'a>(
        &'a self,
        workspace_id: &'a str,
        user_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<Option<Role>>> {
        Box::pin(async move {
            Ok(self
                .read()
                .members
                .iter()
                .find(|m| m.workspace_id == workspace_id && m.user_id == user_id)
                .map(|m| m.role))
        })
    }
}
