//! Local filesystem adapter using std::fs.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use railforge_core::{application::ports::Filesystem, error::RailforgeResult};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> RailforgeResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> RailforgeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn append_file(&self, path: &Path, content: &str) -> RailforgeResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| map_io_error(path, e, "open file for append"))?;
        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "append to file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> RailforgeResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn create_dir_all(&self, path: &Path) -> RailforgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> RailforgeResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn remove_file(&self, path: &Path) -> RailforgeResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> RailforgeResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> railforge_core::error::RailforgeError {
    use railforge_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_and_extends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Procfile");
        let fs = LocalFilesystem::new();

        fs.append_file(&path, "web: rails server\n").unwrap();
        fs.append_file(&path, "worker: sidekiq\n").unwrap();

        assert_eq!(
            fs.read_to_string(&path).unwrap(),
            "web: rails server\nworker: sidekiq\n"
        );
    }

    #[test]
    fn copy_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a");
        let to = dir.path().join("b");
        let fs = LocalFilesystem::new();

        fs.write_file(&from, "new").unwrap();
        fs.write_file(&to, "old").unwrap();
        fs.copy_file(&from, &to).unwrap();

        assert_eq!(fs.read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn rename_moves_directories() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("rails-stylesheets-master");
        let to = dir.path().join("stylesheets");
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&from).unwrap();
        fs.rename(&from, &to).unwrap();

        assert!(!fs.exists(&from));
        assert!(fs.exists(&to));
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let fs = LocalFilesystem::new();
        assert!(fs.read_to_string(Path::new("/nonexistent/railforge")).is_err());
    }
}
