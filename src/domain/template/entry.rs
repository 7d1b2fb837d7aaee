//! Template entries and file classification

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Directory names never descended into or archived
pub const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", "__pycache__"];

/// Extensions treated as binary; everything else is text
pub const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "zip", "jpg", "png", "gif", "ico", "ttf", "woff", "woff2",
];

/// One non-excluded file under the template root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub absolute_path: PathBuf,
    /// Path relative to the template root, `/`-separated
    pub relative_path: String,
    pub is_text: bool,
}

impl TemplateEntry {
    pub fn new(absolute_path: PathBuf, relative_path: impl Into<String>) -> Self {
        let is_text = is_text_file(&absolute_path);
        Self {
            absolute_path,
            relative_path: relative_path.into(),
            is_text,
        }
    }

    /// Bare file name, used by customization selectors
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// Classify by extension (case-insensitive)
pub fn is_text_file(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => !BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_extensions() {
        for name in ["a.exe", "lib.so", "icon.PNG", "font.woff2", "bundle.zip"] {
            assert!(!is_text_file(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_text_is_default() {
        for name in ["train.py", "README.md", "run.command", "Makefile", "data.unknown"] {
            assert!(is_text_file(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_excluded_dirs() {
        assert!(is_excluded_dir(".git"));
        assert!(is_excluded_dir("node_modules"));
        assert!(is_excluded_dir("__pycache__"));
        assert!(!is_excluded_dir("git"));
        assert!(!is_excluded_dir("src"));
    }

    #[test]
    fn test_entry_file_name() {
        let entry = TemplateEntry::new(
            PathBuf::from("/t/game/scripts/maze.js"),
            "game/scripts/maze.js",
        );
        assert_eq!(entry.file_name(), "maze.js");
        assert!(entry.is_text);

        let flat = TemplateEntry::new(PathBuf::from("/t/logo.png"), "logo.png");
        assert_eq!(flat.file_name(), "logo.png");
        assert!(!flat.is_text);
    }
}
