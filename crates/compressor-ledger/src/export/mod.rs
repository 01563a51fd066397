//! Exports of stored records.
//!
//! Every export is produced in memory as an [`Artifact`]. Bulk exports are
//! also kept on disk by an [`ArtifactWriter`], which replaces the previous
//! file atomically so concurrent exports never interleave their bytes.

pub mod csv;
pub mod pdf;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Content type of PDF downloads.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Content type of CSV downloads.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// A finished export, ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name offered to the client.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Encoded export.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Wrap encoded PDF bytes.
    #[must_use]
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }

    /// Wrap encoded CSV bytes.
    #[must_use]
    pub fn csv(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: CSV_CONTENT_TYPE,
            bytes,
        }
    }

    /// Value of the `Content-Disposition` header for this download.
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Keeps the latest copy of each bulk export in a directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    enabled: bool,
}

impl ArtifactWriter {
    /// Write artifacts into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// A writer that never touches the file system.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Directory the artifacts are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Replace `<dir>/<file_name>` with the artifact's bytes.
    ///
    /// The bytes go to a uniquely named temporary file in the same directory
    /// first, which is then renamed over the target. Returns the final path,
    /// or `None` when the writer is disabled.
    ///
    /// # Errors
    ///
    /// Returns an export error if the directory or file cannot be written.
    pub fn write(&self, artifact: &Artifact) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let format = format_of(artifact);
        std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
            path: self.dir.clone(),
            source,
        })?;

        let target = self.dir.join(&artifact.file_name);
        let mut file = NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::export(format, format!("cannot create temporary file: {e}")))?;
        file.write_all(&artifact.bytes)
            .and_then(|()| file.flush())
            .map_err(|e| Error::export(format, format!("cannot write export: {e}")))?;
        file.persist(&target).map_err(|e| {
            Error::export(format, format!("cannot replace {}: {}", target.display(), e.error))
        })?;

        debug!("Wrote {} bytes to {}", artifact.bytes.len(), target.display());
        Ok(Some(target))
    }
}

fn format_of(artifact: &Artifact) -> &'static str {
    if artifact.content_type == PDF_CONTENT_TYPE {
        "pdf"
    } else {
        "csv"
    }
}
