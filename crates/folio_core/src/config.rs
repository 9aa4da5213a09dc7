//! Configuration types for Folio.
//!
//! This module provides the [`Config`] struct which stores defaults applied by
//! the synchronizer when it creates documents and blocks, plus optional session
//! defaults used by front ends. Configuration is persisted as TOML (typically at
//! `~/.config/folio/config.toml` on Unix systems).
//!
//! Every field has a default, so a partial (or empty) file is valid.
//!
//! # Example
//!
//! ```ignore
//! use folio_core::config::Config;
//!
//! let config = Config::from_toml_str("default_document_icon = \"📓\"")?;
//! assert_eq!(config.default_document_title, "Untitled");
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FolioError, Result};
use crate::types::{
    BlockKind, CLEARED_DOCUMENT_ICON, DEFAULT_DOCUMENT_ICON, DEFAULT_DOCUMENT_TITLE,
};

/// User-configurable defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title given to new documents, and to documents whose title is cleared
    pub default_document_title: String,

    /// Icon given to new documents
    pub default_document_icon: String,

    /// Icon stored when an edit clears a document's icon
    pub cleared_document_icon: String,

    /// Text of the paragraph every new document starts with
    pub first_block_text: String,

    /// Kind of blocks added with `create_block` / `append_block`
    pub new_block_kind: BlockKind,

    // ========================================================================
    // Session defaults (used by front ends)
    // ========================================================================
    /// Path of the local demo store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Workspace to open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// Signed-in user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Signed-in user email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_document_title: DEFAULT_DOCUMENT_TITLE.to_string(),
            default_document_icon: DEFAULT_DOCUMENT_ICON.to_string(),
            cleared_document_icon: CLEARED_DOCUMENT_ICON.to_string(),
            first_block_text: String::new(),
            new_block_kind: BlockKind::Paragraph,
            store_path: None,
            workspace_id: None,
            user_id: None,
            user_email: None,
        }
    }
}

impl Config {
    /// Parse a config from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Trim a title; blank titles fall back to the default title.
    pub fn normalize_title(&self, title: &str) -> String {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            self.default_document_title.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Trim an icon; blank icons fall back to the cleared-icon default, not
    /// the icon new documents get.
    pub fn normalize_icon(&self, icon: &str) -> String {
        let trimmed = icon.trim();
        if trimmed.is_empty() {
            self.cleared_document_icon.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FolioError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load config from a specific path, returning defaults if it does not exist.
    pub fn load_from_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml_string()?;
        std::fs::write(path, contents).map_err(|e| FolioError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// ============================================================================
// Native-only implementation (not available in WASM)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Get the config file path (~/.config/folio/config.toml)
    /// Only available on native platforms
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    /// Load config from default location, or return default if file doesn't exist
    /// Only available on native platforms
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from_or_default(&path),
            None => Ok(Config::default()),
        }
    }

    /// Save config to default location
    /// Only available on native platforms
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(FolioError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Default location of the local demo store (~/.local/share/folio/store.json)
    pub fn default_store_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("folio").join("store.json"))
    }
}
