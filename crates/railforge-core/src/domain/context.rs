//! Run-scoped state.
//!
//! [`RunContext`] is the explicit configuration object threaded through the
//! pipeline — never module-level mutable state. It is created at process
//! start, mutated only by the option-collection and source-materialization
//! steps, and is effectively immutable for the whole deferred phase.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::gemfile;

/// Operator decisions collected once, up front.
///
/// The dependency graph is tiny and fixed: `auth_styling` and
/// `authorization` are only meaningful (and only asked) when
/// `authentication` was accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionFlags {
    /// Wire up Devise authentication.
    pub authentication: bool,
    /// Style the Devise views with Bootstrap.
    pub auth_styling: bool,
    /// Wire up Pundit authorization.
    pub authorization: bool,
    /// Create and push a GitHub repository at the end of the run.
    pub publish: bool,
}

/// State for a single configurator run.
#[derive(Debug)]
pub struct RunContext {
    target_dir: PathBuf,
    app_name: String,
    source_spec: String,
    source_path: Option<PathBuf>,
    flags: Option<OptionFlags>,
    /// The original Gemfile, read once and never re-read.
    gemfile: Option<String>,
}

impl RunContext {
    pub fn new(
        target_dir: impl Into<PathBuf>,
        app_name: impl Into<String>,
        source_spec: impl Into<String>,
    ) -> Self {
        Self {
            target_dir: target_dir.into(),
            app_name: app_name.into(),
            source_spec: source_spec.into(),
            source_path: None,
            flags: None,
            gemfile: None,
        }
    }

    /// The Rails application directory being configured.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Resolve a path inside the target application.
    pub fn target_path(&self, relative: &str) -> PathBuf {
        self.target_dir.join(relative)
    }

    /// The application name, used when rendering templated files.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Where template assets should come from (local path or remote URL),
    /// before materialization.
    pub fn source_spec(&self) -> &str {
        &self.source_spec
    }

    /// The materialized template-source directory. `None` until the
    /// materialization step has run.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Resolve a template asset path. Only valid after materialization.
    pub fn source_file(&self, name: &str) -> Option<PathBuf> {
        self.source_path.as_ref().map(|p| p.join(name))
    }

    /// Register the single search path for template assets. Called exactly
    /// once per run, by the source-materialization step.
    pub fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        debug_assert!(self.source_path.is_none(), "source path registered twice");
        self.source_path = Some(path.into());
    }

    /// The collected option flags. All-false until collection has run, so
    /// flag-gated predicates evaluate to "skip" on an incomplete context.
    pub fn flags(&self) -> OptionFlags {
        self.flags.unwrap_or_default()
    }

    /// Fix the operator's answers. Called exactly once, by the
    /// option-collection step; no step re-asks afterwards.
    pub fn set_flags(&mut self, flags: OptionFlags) {
        debug_assert!(self.flags.is_none(), "option flags collected twice");
        self.flags = Some(flags);
    }

    /// The cached original Gemfile text, if already read.
    pub fn gemfile(&self) -> Option<&str> {
        self.gemfile.as_deref()
    }

    /// Cache the original Gemfile. Later lookups hit this copy; the file on
    /// disk is never re-read even after the run has appended to it.
    pub fn cache_gemfile(&mut self, text: String) {
        if self.gemfile.is_none() {
            self.gemfile = Some(text);
        }
    }

    /// Constraint an existing gem declaration carries in the original
    /// Gemfile, e.g. `">= 2.0"`.
    pub fn gem_requirement(&self, name: &str) -> Option<String> {
        self.gemfile.as_deref().and_then(|g| gemfile::requirement(g, name))
    }
}
