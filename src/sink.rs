//! Download sinks: where a generated document ends up.

use crate::{Error, Result};
use base64::Engine as Base64Engine;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination for generated documents
pub trait DownloadSink {
    /// Store `contents` under `filename` with the given mime type
    fn save(&mut self, filename: &str, mime: &str, contents: &[u8]) -> Result<()>;
}

/// Writes each document into a directory.
///
/// The document is written to a temporary file next to the target and then
/// renamed over it, so a failed save never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_saved: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recently saved document
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

// A bare file name: no separators, no `.`/`..`
fn validate_filename(filename: &str) -> Result<&str> {
    let name = Path::new(filename).file_name().and_then(|n| n.to_str());
    match name {
        Some(n) if n == filename && !n.trim().is_empty() => Ok(n),
        _ => Err(Error::ConfigError(format!(
            "download filename must be a plain file name, got {:?}",
            filename
        ))),
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, _mime: &str, contents: &[u8]) -> Result<()> {
        let name = validate_filename(filename)?;
        let target = self.dir.join(name);

        // Unique per save, removed on drop if anything below fails
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| {
            Error::SaveError(format!("creating temp file in {}: {}", self.dir.display(), e))
        })?;
        tmp.write_all(contents)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::SaveError(format!("writing {}: {}", tmp.path().display(), e)))?;
        tmp.persist(&target)
            .map_err(|e| Error::SaveError(format!("moving to {}: {}", target.display(), e.error)))?;

        log::info!("saved {} ({} bytes)", target.display(), contents.len());
        self.last_saved = Some(target);
        Ok(())
    }
}

/// A document captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub mime: String,
    pub contents: Vec<u8>,
}

impl SavedFile {
    /// Contents as text (lossy for non UTF-8 bytes)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}

/// Keeps every saved document in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<SavedFile>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SavedFile> {
        self.files.last()
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, filename: &str, mime: &str, contents: &[u8]) -> Result<()> {
        self.files.push(SavedFile {
            filename: filename.to_string(),
            mime: mime.to_string(),
            contents: contents.to_vec(),
        });
        Ok(())
    }
}

/// Turns each document into a `data:` URL, the portable stand-in for a blob URL
#[derive(Debug, Default)]
pub struct DataUrlSink {
    /// `(filename, data URL)` pairs in save order
    pub urls: Vec<(String, String)>,
}

impl DataUrlSink {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Encode `contents` as a base64 `data:` URL
pub fn data_url(mime: &str, contents: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(contents)
    )
}

impl DownloadSink for DataUrlSink {
    fn save(&mut self, filename: &str, mime: &str, contents: &[u8]) -> Result<()> {
        self.urls.push((filename.to_string(), data_url(mime, contents)));
        Ok(())
    }
}
