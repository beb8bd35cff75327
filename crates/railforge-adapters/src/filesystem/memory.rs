//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use railforge_core::application::ApplicationError;
use railforge_core::application::ports::Filesystem;
use railforge_core::error::RailforgeResult;

/// In-memory filesystem for testing.
///
/// Writes create missing parent directories implicitly: in tests the
/// directory structure normally produced by the framework generators does
/// not exist, and the pipeline must still be able to write into it.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating parents (testing helper).
    pub fn seed_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap();
        record_parents(&mut inner.directories, &path);
        inner.files.insert(path, content.into());
    }

    /// Seed an empty directory (testing helper).
    pub fn seed_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap();
        record_parents(&mut inner.directories, &path);
        inner.directories.insert(path);
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        inner.files.keys().cloned().collect()
    }
}

fn record_parents(directories: &mut HashSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        directories.insert(ancestor.to_path_buf());
    }
}

fn lock_poisoned(path: &Path) -> railforge_core::error::RailforgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "filesystem lock poisoned".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> RailforgeResult<String> {
        let inner = self.inner.read().map_err(|_| lock_poisoned(path))?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> RailforgeResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned(path))?;
        record_parents(&mut inner.directories, path);
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> RailforgeResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned(path))?;
        record_parents(&mut inner.directories, path);
        inner
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> RailforgeResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn create_dir_all(&self, path: &Path) -> RailforgeResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned(path))?;
        record_parents(&mut inner.directories, path);
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> RailforgeResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned(path))?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> RailforgeResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned(path))?;
        inner.files.remove(path).map(|_| ()).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> RailforgeResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned(from))?;
        if !inner.directories.contains(from) && !inner.files.contains_key(from) {
            return Err(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "No such file or directory".into(),
            }
            .into());
        }

        if let Some(content) = inner.files.remove(from) {
            inner.files.insert(to.to_path_buf(), content);
        }

        let moved_dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for dir in moved_dirs {
            inner.directories.remove(&dir);
            let relocated = rebase(&dir, from, to);
            inner.directories.insert(relocated);
        }

        let moved_files: Vec<PathBuf> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for file in moved_files {
            if let Some(content) = inner.files.remove(&file) {
                inner.files.insert(rebase(&file, from, to), content);
            }
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

fn rebase(path: &Path, from: &Path, to: &Path) -> PathBuf {
    match path.strip_prefix(from) {
        Ok(rest) if rest.as_os_str().is_empty() => to.to_path_buf(),
        Ok(rest) => to.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
