//! Saving finished documents the way a browser download would.
//!
//! Provides:
//! - File name cleanup with a fallback name and a `.pdf` suffix
//! - `name (1).pdf`-style de-duplication instead of overwriting
//! - All-or-nothing writes through a temp file in the target directory

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config;
use crate::error::{ExportError, ExportResult};
use crate::pdf::PdfDocument;

/// Upper bound on `name (n).pdf` candidates
const MAX_DUPLICATES: u32 = 9_999;

/// Directory that finished PDFs are saved into
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
    fallback_name: String,
}

impl DownloadDir {
    /// Save into `dir`, using the configured fallback name
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fallback_name: config::default_filename(),
        }
    }

    /// Save into the configured output directory
    pub fn from_config() -> Self {
        Self::new(config::output_dir())
    }

    /// Set the name used when the requested one is empty
    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_name = name.into();
        self
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `document` under `filename` + `.pdf`, returning the saved path
    ///
    /// Nothing is left behind in the directory if the write fails.
    pub fn save(&self, document: &PdfDocument, filename: &str) -> ExportResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let mut part = tempfile::Builder::new()
            .prefix(".resume-export-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        part.write_all(document.as_bytes())?;
        part.as_file().sync_all()?;

        let stem = file_stem(filename, &self.fallback_name);
        for candidate in candidates(&self.dir, &stem) {
            match part.persist_noclobber(&candidate) {
                Ok(_) => {
                    debug!(path = %candidate.display(), bytes = document.len(), "saved document");
                    return Ok(candidate);
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    part = err.file;
                }
                Err(err) => return Err(ExportError::Io(err.error)),
            }
        }

        Err(ExportError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free file name for '{}' in {}", stem, self.dir.display()),
        )))
    }
}

/// `stem.pdf`, then `stem (1).pdf`, `stem (2).pdf`, ...
fn candidates<'a>(dir: &'a Path, stem: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    std::iter::once(dir.join(format!("{}.pdf", stem)))
        .chain((1..=MAX_DUPLICATES).map(move |n| dir.join(format!("{} ({}).pdf", stem, n))))
}

/// Clean up a requested file name, falling back when nothing usable remains
pub fn file_stem(filename: &str, fallback: &str) -> String {
    let cleaned = sanitize_name(filename.trim());
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        let fallback = sanitize_name(fallback.trim());
        if fallback.is_empty() {
            config::DEFAULT_FILENAME.to_string()
        } else {
            fallback
        }
    } else {
        cleaned.to_string()
    }
}

/// Replace characters that are not allowed in file names
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
