//! Dataset storage.
//!
//! The dataset is a single static JSON document, read wholesale at startup
//! and never written back.

mod json;

pub use json::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Duplicate player id in dataset: {0}")]
    DuplicatePlayer(String),
}
