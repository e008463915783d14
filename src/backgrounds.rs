//! Background pool discovery.
//!
//! Backgrounds are the files directly inside one folder whose extension is in
//! the configured list (case-insensitive). Subdirectories are not searched:
//!
//! ```text
//! backgrounds/
//! ├── beach.png        ✓
//! ├── CITY.PNG         ✓
//! ├── notes.txt        ✗ extension
//! └── archive/
//!     └── old.png      ✗ not searched
//! ```
//!
//! The pool is sorted by path so a seeded run picks the same files no matter
//! what order the filesystem lists them in.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read background folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// The background images available to every pack of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundPool {
    dir: PathBuf,
    images: Vec<PathBuf>,
}

impl BackgroundPool {
    pub fn new(dir: impl Into<PathBuf>, mut images: Vec<PathBuf>) -> Self {
        images.sort();
        images.dedup();
        Self {
            dir: dir.into(),
            images,
        }
    }

    /// Folder the pool was scanned from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Collect every eligible background directly inside `dir`.
pub fn scan_backgrounds(dir: &Path, extensions: &[String]) -> Result<BackgroundPool, ScanError> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.path().is_file() && has_extension(entry.path(), extensions) {
            images.push(entry.into_path());
        }
    }
    Ok(BackgroundPool::new(dir, images))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn png_only() -> Vec<String> {
        vec!["png".to_string()]
    }

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn finds_matching_files() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.png"));
        touch(&tmp.path().join("b.png"));
        let pool = scan_backgrounds(tmp.path(), &png_only()).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn extension_match_ignores_case() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("LOUD.PNG"));
        let pool = scan_backgrounds(tmp.path(), &png_only()).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn other_extensions_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.jpg"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("png"));
        let pool = scan_backgrounds(tmp.path(), &png_only()).unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn several_extensions_allowed() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.png"));
        touch(&tmp.path().join("b.jpg"));
        let exts = vec!["png".to_string(), ".jpg".to_string()];
        let pool = scan_backgrounds(tmp.path(), &exts).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn subdirectories_are_not_searched() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("top.png"));
        let nested = tmp.path().join("archive");
        fs::create_dir(&nested).unwrap();
        touch(&nested.join("old.png"));
        // a directory named like an image is not an image
        fs::create_dir(tmp.path().join("folder.png")).unwrap();

        let pool = scan_backgrounds(tmp.path(), &png_only()).unwrap();
        assert_eq!(pool.images(), &[tmp.path().join("top.png")]);
    }

    #[test]
    fn pool_is_sorted() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.png", "a.png", "b.png"] {
            touch(&tmp.path().join(name));
        }
        let pool = scan_backgrounds(tmp.path(), &png_only()).unwrap();
        let names: Vec<_> = pool
            .images()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn missing_folder_is_error() {
        let result = scan_backgrounds(Path::new("/nonexistent/backgrounds"), &png_only());
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }

    #[test]
    fn pool_remembers_its_folder() {
        let tmp = TempDir::new().unwrap();
        let pool = scan_backgrounds(tmp.path(), &png_only()).unwrap();
        assert_eq!(pool.dir(), tmp.path());
    }

    #[test]
    fn empty_folder_gives_empty_pool() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_backgrounds(tmp.path(), &png_only()).unwrap().is_empty());
    }
}
