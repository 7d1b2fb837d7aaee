//! Archive domain - building the package archive from template entries

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tempfile::TempPath;

use crate::domain::customization::ContentCustomizer;
use crate::domain::template::TemplateEntry;
use crate::domain::DomainError;

/// Shared flag used to abort a build between entries
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A finalized archive that has not been committed yet.
///
/// The backing file is deleted when this value is dropped without being
/// persisted.
#[derive(Debug)]
pub struct BuiltArchive {
    temp: TempPath,
    pub size_bytes: u64,
    pub file_count: usize,
}

impl BuiltArchive {
    pub fn new(temp: TempPath, size_bytes: u64, file_count: usize) -> Self {
        Self {
            temp,
            size_bytes,
            file_count,
        }
    }

    pub fn path(&self) -> &Path {
        &self.temp
    }

    /// Atomically move the archive to its final location
    pub fn persist(self, target: &Path) -> Result<PathBuf, DomainError> {
        self.temp.persist(target).map_err(|e| {
            DomainError::archive(format!(
                "Failed to commit archive to {}: {}",
                target.display(),
                e.error
            ))
        })?;
        Ok(target.to_path_buf())
    }
}

/// Writes scanned entries into a single archive.
///
/// Implementations append entries sequentially in the given order and only
/// return once the output has been flushed to disk. Any error aborts the
/// whole build and leaves no output behind.
pub trait ArchiveBuilder: Send + Sync + std::fmt::Debug {
    fn build(
        &self,
        entries: &[TemplateEntry],
        customizer: &ContentCustomizer,
        cancel: &CancellationFlag,
    ) -> Result<BuiltArchive, DomainError>;
}
