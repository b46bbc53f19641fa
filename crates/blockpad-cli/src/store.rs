//! TOML persistence for block documents.
//!
//! Persistence is the host's job; the engine only hands out and accepts
//! plain [`Block`] values.

use blockpad_engine::{Block, Document};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write document {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to encode document: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    blocks: Vec<Block>,
}

/// Load a document, mounting a fresh one when the file does not exist yet
pub fn load_document(path: &Path) -> Result<Document, StoreError> {
    if !path.exists() {
        log::info!("{} not found, starting a new document", path.display());
        return Ok(Document::new());
    }

    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let stored: StoredDocument = toml::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("loaded {} blocks from {}", stored.blocks.len(), path.display());
    Ok(Document::from_blocks(stored.blocks))
}

pub fn save_document(path: &Path, document: &Document) -> Result<(), StoreError> {
    let stored = StoredDocument {
        blocks: document.blocks().to_vec(),
    };
    let content = toml::to_string_pretty(&stored)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("saved {} blocks to {}", document.len(), path.display());
    Ok(())
}
