//! Zip archive builder
//!
//! Entries are written sequentially into a temporary file inside the scratch
//! directory. The file is only handed back after the zip central directory is
//! written and the data is synced; on any error the temporary file is dropped
//! and removed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::archive::{ArchiveBuilder, BuiltArchive, CancellationFlag};
use crate::domain::customization::ContentCustomizer;
use crate::domain::template::TemplateEntry;
use crate::domain::DomainError;

/// Maximum deflate compression level
pub const MAX_COMPRESSION_LEVEL: i64 = 9;

#[derive(Debug, Clone)]
pub struct ZipArchiveBuilder {
    scratch_dir: PathBuf,
    compression_level: i64,
}

impl ZipArchiveBuilder {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            compression_level: MAX_COMPRESSION_LEVEL,
        }
    }

    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = level;
        self
    }

    fn create_temp(&self) -> Result<NamedTempFile, DomainError> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| {
            DomainError::archive(format!(
                "Failed to create scratch directory {}: {}",
                self.scratch_dir.display(),
                e
            ))
        })?;

        tempfile::Builder::new()
            .prefix(".pkg-")
            .suffix(".zip.part")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| DomainError::archive(format!("Failed to create archive file: {}", e)))
    }

    fn entry_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.compression_level))
    }

    fn write_entries<W: Write + io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        entries: &[TemplateEntry],
        customizer: &ContentCustomizer,
        cancel: &CancellationFlag,
    ) -> Result<usize, DomainError> {
        let mut count = 0;

        for entry in entries {
            if cancel.is_cancelled() {
                return Err(DomainError::archive("Generation timed out"));
            }

            let options = with_source_permissions(self.entry_options(), &entry.absolute_path);
            zip.start_file(entry.relative_path.as_str(), options)
                .map_err(|e| append_error(entry, e))?;

            if entry.is_text {
                let bytes =
                    std::fs::read(&entry.absolute_path).map_err(|e| append_error(entry, e))?;
                let content = customizer.customize_bytes(bytes, entry.file_name());
                zip.write_all(&content).map_err(|e| append_error(entry, e))?;
                trace!(path = %entry.relative_path, "Appended text entry");
            } else {
                let mut file =
                    File::open(&entry.absolute_path).map_err(|e| append_error(entry, e))?;
                io::copy(&mut file, zip).map_err(|e| append_error(entry, e))?;
                trace!(path = %entry.relative_path, "Appended binary entry");
            }

            count += 1;
        }

        Ok(count)
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(
        &self,
        entries: &[TemplateEntry],
        customizer: &ContentCustomizer,
        cancel: &CancellationFlag,
    ) -> Result<BuiltArchive, DomainError> {
        let mut temp = self.create_temp()?;

        let file_count = {
            let mut zip = ZipWriter::new(BufWriter::new(temp.as_file_mut()));
            let count = self.write_entries(&mut zip, entries, customizer, cancel)?;

            let writer = zip
                .finish()
                .map_err(|e| DomainError::archive(format!("Failed to finalize archive: {}", e)))?;
            let file = writer.into_inner().map_err(|e| {
                DomainError::archive(format!("Failed to flush archive: {}", e.error()))
            })?;
            file.sync_all()
                .map_err(|e| DomainError::archive(format!("Failed to sync archive: {}", e)))?;
            count
        };

        let size_bytes = temp
            .as_file()
            .metadata()
            .map_err(|e| DomainError::archive(format!("Failed to stat archive: {}", e)))?
            .len();

        debug!(
            file_count,
            size_bytes,
            path = %temp.path().display(),
            "Archive finalized"
        );

        Ok(BuiltArchive::new(temp.into_temp_path(), size_bytes, file_count))
    }
}

fn append_error(entry: &TemplateEntry, err: impl std::fmt::Display) -> DomainError {
    DomainError::archive(format!("Failed to append {}: {}", entry.relative_path, err))
}

#[cfg(unix)]
fn with_source_permissions(options: SimpleFileOptions, path: &Path) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => options.unix_permissions(meta.permissions().mode() & 0o777),
        Err(_) => options,
    }
}

#[cfg(not(unix))]
fn with_source_permissions(options: SimpleFileOptions, _path: &Path) -> SimpleFileOptions {
    options
}
