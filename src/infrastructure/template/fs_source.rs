//! Filesystem template source
//!
//! Walks the template root depth-first with [`walkdir`]. Symlinked
//! directories are followed so a linked auxiliary directory ends up in the
//! package. Excluded names prune the whole subtree before it is read.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::domain::template::{is_excluded_dir, TemplateEntry, TemplateSource};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct FsTemplateSource {
    root: PathBuf,
}

impl FsTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn missing(&self, reason: impl std::fmt::Display) -> DomainError {
        DomainError::template_missing(format!(
            "Template directory not found: {} ({})",
            self.root.display(),
            reason
        ))
    }
}

impl TemplateSource for FsTemplateSource {
    fn check(&self) -> Result<(), DomainError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| self.missing(e))?;

        if !metadata.is_dir() {
            return Err(self.missing("not a directory"));
        }

        std::fs::read_dir(&self.root).map_err(|e| self.missing(e))?;
        Ok(())
    }

    fn scan(&self) -> Result<Vec<TemplateEntry>, DomainError> {
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_pruned(e));

        let mut entries = Vec::new();

        for item in walker {
            let item = item.map_err(|e| {
                if e.depth() == 0 {
                    self.missing(&e)
                } else {
                    DomainError::archive(format!("Failed to read template entry: {}", e))
                }
            })?;

            if item.file_type().is_dir() {
                continue;
            }

            let relative_path = relative_path(&self.root, item.path())?;
            entries.push(TemplateEntry::new(item.into_path(), relative_path));
        }

        if entries.is_empty() {
            return Err(DomainError::template_missing(format!(
                "No files in template directory: {}",
                self.root.display()
            )));
        }

        debug!(
            root = %self.root.display(),
            count = entries.len(),
            "Scanned template"
        );

        Ok(entries)
    }

    fn list_top_level(&self) -> Result<Vec<String>, DomainError> {
        let read_dir = std::fs::read_dir(&self.root).map_err(|e| self.missing(e))?;

        let mut names = read_dir
            .map(|item| {
                item.map(|e| e.file_name().to_string_lossy().into_owned())
                    .map_err(|e| self.missing(e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        names.sort();
        Ok(names)
    }
}

fn is_pruned(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(is_excluded_dir)
            .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> Result<String, DomainError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        DomainError::archive(format!(
            "Template entry {} is outside {}",
            path.display(),
            root.display()
        ))
    })?;

    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                DomainError::archive(format!("Non UTF-8 template path: {}", path.display()))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn template() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "INSTRUCTIONS.txt", "Rooms: {{MAZE_ROOMS}}");
        write(root, "train_sphere_agent.py", "maze_rooms = 1");
        write(root, "game/index.html", "<html></html>");
        write(root, "game/js/maze.js", "mazeRooms: 1");
        write(root, "game/assets/logo.png", "png");
        write(root, ".git/HEAD", "ref: refs/heads/main");
        write(root, "game/node_modules/lib/index.js", "x");
        write(root, "__pycache__/train.cpython-311.pyc", "x");
        dir
    }

    fn paths(entries: &[TemplateEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.relative_path.as_str()).collect()
    }

    #[test]
    fn test_scan_is_depth_first_and_sorted() {
        let dir = template();
        let entries = FsTemplateSource::new(dir.path()).scan().unwrap();

        assert_eq!(
            paths(&entries),
            vec![
                "INSTRUCTIONS.txt",
                "game/assets/logo.png",
                "game/index.html",
                "game/js/maze.js",
                "train_sphere_agent.py",
            ]
        );
    }

    #[test]
    fn test_scan_excludes_directories_anywhere() {
        let dir = template();
        let entries = FsTemplateSource::new(dir.path()).scan().unwrap();

        for entry in &entries {
            for segment in entry.relative_path.split('/') {
                assert!(!is_excluded_dir(segment), "{}", entry.relative_path);
            }
        }
    }

    #[test]
    fn test_scan_classifies_entries() {
        let dir = template();
        let entries = FsTemplateSource::new(dir.path()).scan().unwrap();

        let logo = entries
            .iter()
            .find(|e| e.relative_path == "game/assets/logo.png")
            .unwrap();
        assert!(!logo.is_text);
        assert_eq!(logo.absolute_path, dir.path().join("game/assets/logo.png"));

        assert!(entries.iter().filter(|e| e.is_text).count() == 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinked_directories() {
        let dir = template();
        let external = tempfile::tempdir().unwrap();
        write(external.path(), "level.json", "{}");
        std::os::unix::fs::symlink(external.path(), dir.path().join("linked")).unwrap();

        let entries = FsTemplateSource::new(dir.path()).scan().unwrap();
        assert!(paths(&entries).contains(&"linked/level.json"));
    }

    #[test]
    fn test_missing_root() {
        let source = FsTemplateSource::new("/definitely/not/a/template");

        assert!(matches!(
            source.check(),
            Err(DomainError::TemplateMissing { .. })
        ));
        assert!(matches!(
            source.scan(),
            Err(DomainError::TemplateMissing { .. })
        ));
        assert!(matches!(
            source.list_top_level(),
            Err(DomainError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn test_root_that_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "file.txt", "x");

        let source = FsTemplateSource::new(dir.path().join("file.txt"));
        assert!(matches!(
            source.check(),
            Err(DomainError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn test_empty_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        write(dir.path(), ".git/config", "x");

        let source = FsTemplateSource::new(dir.path());
        assert!(source.check().is_ok());
        assert!(matches!(
            source.scan(),
            Err(DomainError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn test_check_sees_root_removed_between_calls() {
        let dir = template();
        let root = dir.path().to_path_buf();
        let source = FsTemplateSource::new(&root);

        assert!(source.check().is_ok());
        drop(dir);
        assert!(source.check().is_err());
    }

    #[test]
    fn test_list_top_level() {
        let dir = template();
        let names = FsTemplateSource::new(dir.path()).list_top_level().unwrap();
        assert_eq!(
            names,
            vec![
                ".git",
                "INSTRUCTIONS.txt",
                "__pycache__",
                "game",
                "train_sphere_agent.py"
            ]
        );
    }
}
