//! Command execution handler.
//!
//! This module contains the implementation of the `execute()` method for
//! [`Synchronizer`]. Each command maps onto one synchronizer operation.

use crate::command::{Command, Response};
use crate::error::{FolioError, Result};
use crate::remote::RemoteStore;
use crate::synchronizer::Synchronizer;

impl<R: RemoteStore> Synchronizer<R> {
    /// Execute a command and return the response.
    ///
    /// Reads of unknown ids fail with `DocumentNotFound` / `BlockNotFound`.
    /// Commands the session role may not run fail with `PermissionDenied`
    /// before anything is touched. Other mutations report how they ended
    /// through a [`SyncOutcome`](crate::synchronizer::SyncOutcome) and only
    /// return `Err` where the operation itself does.
    pub async fn execute(&self, command: Command) -> Result<Response> {
        if let Some(operation) = command.operation() {
            self.authorize(operation)?;
        }
        match command {
            // === Reads ===
            Command::ListDocuments => Ok(Response::Documents(self.documents())),

            Command::GetDocument { document_id } => self
                .document(&document_id)
                .map(Response::Document)
                .ok_or(FolioError::DocumentNotFound(document_id)),

            Command::GetBlocks { document_id } => {
                if self.document(&document_id).is_none() {
                    return Err(FolioError::DocumentNotFound(document_id));
                }
                Ok(Response::Blocks(self.blocks(&document_id)))
            }

            Command::GetBlock { block_id } => self
                .block(&block_id)
                .map(Response::Block)
                .ok_or(FolioError::BlockNotFound(block_id)),

            Command::GetState => Ok(Response::State(self.snapshot())),

            // === Selection ===
            Command::SelectDocument { document_id } => {
                Ok(Response::Selection(self.select_document(&document_id).await))
            }

            Command::FetchBlocks { document_id } => {
                if self.document(&document_id).is_none() {
                    return Err(FolioError::DocumentNotFound(document_id));
                }
                Ok(Response::Count(self.fetch_blocks(&document_id).await?))
            }

            // === Documents ===
            Command::CreateDocument => Ok(Response::DocumentOutcome(self.create_document().await?)),

            Command::DeleteDocument { document_id } => {
                Ok(Response::Outcome(self.delete_document(&document_id).await?))
            }

            Command::SetDocumentTitle { document_id, title } => Ok(Response::Outcome(
                self.update_document_title(&document_id, &title).await,
            )),

            Command::SetDocumentIcon { document_id, icon } => Ok(Response::Outcome(
                self.update_document_icon(&document_id, &icon).await,
            )),

            Command::UpdateDocument { document_id, patch } => Ok(Response::Outcome(
                self.update_document(&document_id, patch).await,
            )),

            // === Blocks ===
            Command::CreateBlock {
                document_id,
                position,
                content,
            } => {
                let outcome = match content {
                    Some(content) => {
                        self.create_block_with(&document_id, position, content)
                            .await?
                    }
                    None => self.create_block(&document_id, position).await?,
                };
                Ok(Response::BlockOutcome(outcome))
            }

            Command::AppendBlock { document_id } => {
                Ok(Response::BlockOutcome(self.append_block(&document_id).await?))
            }

            Command::UpdateBlock { block_id, patch } => Ok(Response::BlockOutcome(
                self.update_block(&block_id, patch).await,
            )),

            Command::DeleteBlock { block_id } => {
                Ok(Response::Outcome(self.delete_block(&block_id).await))
            }
        }
    }
}
