//! Local persistence of résumé data.
//!
//! Documents are stored as JSON in the builder's persisted-store layout:
//!
//! ```json
//! { "state": { "resumeData": { ... } }, "version": 0 }
//! ```
//!
//! A bare `ResumeData` object is accepted on load as well.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::model::ResumeData;

/// Default file name of the local store
pub const DEFAULT_STORE_FILE: &str = "resume-storage.json";

/// Version written into the persisted envelope
const STORE_VERSION: u32 = 0;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a valid résumé document
    #[error("Invalid résumé document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: EnvelopeState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeState {
    resume_data: ResumeData,
}

/// Résumé data kept in a JSON file
#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

impl ResumeStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store named [`DEFAULT_STORE_FILE`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_STORE_FILE))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored résumé, or an empty one if nothing was saved yet
    pub fn load(&self) -> StoreResult<ResumeData> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored résumé, starting empty");
                return Ok(ResumeData::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        parse_document(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Save `data`, replacing what was stored
    pub fn save(&self, data: &ResumeData) -> StoreResult<()> {
        let envelope = Envelope {
            state: EnvelopeState {
                resume_data: data.clone(),
            },
            version: STORE_VERSION,
        };
        let json = serde_json::to_string_pretty(&envelope).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Apply `update` to the stored résumé and save the result
    pub fn update(&self, update: impl FnOnce(&mut ResumeData)) -> StoreResult<ResumeData> {
        let mut data = self.load()?;
        update(&mut data);
        self.save(&data)?;
        Ok(data)
    }

    /// Replace the stored résumé with an empty one
    pub fn reset(&self) -> StoreResult<()> {
        self.save(&ResumeData::default())
    }
}

/// Parse either the persisted envelope or a bare résumé document
///
/// A top-level `state` key marks the envelope; its errors are reported as is
/// rather than falling back to an empty bare document.
pub fn parse_document(text: &str) -> Result<ResumeData, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.get("state").is_some() {
        let envelope: Envelope = serde_json::from_value(value)?;
        Ok(envelope.state.resume_data)
    } else {
        serde_json::from_value(value)
    }
}
