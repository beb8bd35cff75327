//! Template-source adapters.
//!
//! A template source is either a local directory (used in place) or a
//! remote git URL (cloned into a temporary directory that is removed when
//! the run ends).

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use railforge_core::application::ApplicationError;
use railforge_core::application::ports::{CommandRunner, MaterializedSource, SourceMaterializer};
use railforge_core::error::RailforgeResult;

/// A template source that is a plain local directory. Nothing to clean up.
#[derive(Debug)]
pub struct LocalSource {
    dir: PathBuf,
}

impl MaterializedSource for LocalSource {
    fn path(&self) -> &Path {
        &self.dir
    }
}

/// A template source cloned from a remote URL. Owns the temporary clone
/// directory; dropping it removes the clone on every exit path.
#[derive(Debug)]
pub struct ClonedSource {
    dir: TempDir,
}

impl MaterializedSource for ClonedSource {
    fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Production source materializer.
///
/// A spec that looks like a URL is shallow-cloned with the system git;
/// anything else is treated as a local directory and validated to exist.
pub struct GitSourceMaterializer {
    runner: Box<dyn CommandRunner>,
}

impl GitSourceMaterializer {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn clone_remote(&self, url: &str) -> RailforgeResult<ClonedSource> {
        let dir = tempfile::tempdir().map_err(|e| ApplicationError::SourceError {
            reason: format!("failed to create a temporary clone directory: {e}"),
        })?;

        debug!(url, into = %dir.path().display(), "cloning template source");
        let output = self
            .runner
            .run("git", &["clone", "--depth", "1", url, "."], dir.path())?;
        if !output.success() {
            return Err(ApplicationError::SourceError {
                reason: format!("git clone of `{url}` failed: {}", output.stderr.trim()),
            }
            .into());
        }

        info!(url, "template source cloned");
        Ok(ClonedSource { dir })
    }
}

fn looks_remote(spec: &str) -> bool {
    spec.starts_with("http://")
        || spec.starts_with("https://")
        || spec.starts_with("git@")
        || spec.ends_with(".git")
}

impl SourceMaterializer for GitSourceMaterializer {
    fn materialize(&self, spec: &str) -> RailforgeResult<Box<dyn MaterializedSource>> {
        if looks_remote(spec) {
            return Ok(Box::new(self.clone_remote(spec)?));
        }

        let dir = PathBuf::from(spec);
        if !dir.is_dir() {
            return Err(ApplicationError::SourceError {
                reason: format!("template directory `{spec}` does not exist"),
            }
            .into());
        }
        Ok(Box::new(LocalSource { dir }))
    }
}

/// Source materializer returning a fixed directory, for testing. The
/// directory is taken at face value; no filesystem check happens, so it
/// composes with an in-memory filesystem.
#[derive(Debug, Clone)]
pub struct StaticSource {
    dir: PathBuf,
}

impl StaticSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SourceMaterializer for StaticSource {
    fn materialize(&self, _spec: &str) -> RailforgeResult<Box<dyn MaterializedSource>> {
        Ok(Box::new(LocalSource {
            dir: self.dir.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingRunner;
    use railforge_core::application::ports::CommandOutput;

    #[test]
    fn local_directory_is_used_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let materializer = GitSourceMaterializer::new(Box::new(RecordingRunner::new()));
        let source = materializer
            .materialize(dir.path().to_str().unwrap())
            .unwrap();
        assert_eq!(source.path(), dir.path());
    }

    #[test]
    fn missing_local_directory_is_an_error() {
        let materializer = GitSourceMaterializer::new(Box::new(RecordingRunner::new()));
        assert!(materializer.materialize("/nonexistent/railforge-templates").is_err());
    }

    #[test]
    fn url_spec_is_cloned_shallow() {
        let runner = RecordingRunner::new();
        let materializer = GitSourceMaterializer::new(Box::new(runner.clone()));
        let source = materializer
            .materialize("https://example.com/templates.git")
            .unwrap();

        assert!(runner.ran("git clone --depth 1 https://example.com/templates.git"));
        assert!(source.path().is_absolute());
    }

    #[test]
    fn failed_clone_reports_stderr() {
        let runner = RecordingRunner::new();
        runner.respond("git clone", CommandOutput {
            status: 128,
            stdout: String::new(),
            stderr: "fatal: repository not found\n".into(),
        });
        let materializer = GitSourceMaterializer::new(Box::new(runner));
        let err = materializer
            .materialize("https://example.com/missing.git")
            .unwrap_err();
        assert!(err.to_string().contains("repository not found"));
    }

    #[test]
    fn cloned_source_cleans_up_on_drop() {
        let runner = RecordingRunner::new();
        let materializer = GitSourceMaterializer::new(Box::new(runner));
        let source = materializer
            .materialize("https://example.com/templates.git")
            .unwrap();
        let path = source.path().to_path_buf();
        assert!(path.exists());
        drop(source);
        assert!(!path.exists());
    }
}
