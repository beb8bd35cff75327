//! The scaffolding step tables.
//!
//! Steps are fixed at compile time: an ordered main phase (environment
//! check, template materialization, static files, option collection,
//! dependency declaration) and an ordered deferred phase (everything that
//! assumes the gems are physically installed). The executor in
//! [`crate::application::pipeline`] runs the package manager between the
//! two phases.

use std::path::Path;

use crate::application::pipeline::{Pipeline, Step, StepResult, Toolbox};
use crate::application::ApplicationError;
use crate::domain::RunContext;
use crate::domain::textedit::{self, EditError};
use crate::error::RailforgeResult;

mod deferred;
mod main;

/// Step names, in one place so tests and logs agree on spelling.
pub mod names {
    pub const PREFLIGHT: &str = "preflight";
    pub const MATERIALIZE_SOURCE: &str = "materialize-source";
    pub const INSTALL_STATIC_FILES: &str = "install-static-files";
    pub const COLLECT_OPTIONS: &str = "collect-options";
    pub const DECLARE_DEPENDENCIES: &str = "declare-dependencies";

    pub const LINT_SETUP: &str = "lint-setup";
    pub const JOB_QUEUE_SETUP: &str = "job-queue-setup";
    pub const ANNOTATION_SETUP: &str = "annotation-setup";
    pub const BUG_FINDER_SETUP: &str = "bug-finder-setup";
    pub const AUTHENTICATION_SETUP: &str = "authentication-setup";
    pub const AUTHORIZATION_SETUP: &str = "authorization-setup";
    pub const ASSET_REPLACE: &str = "asset-replace";
    pub const FRONTEND_INSTALL: &str = "frontend-install";
    pub const JS_ENTRY_EDIT: &str = "js-entry-edit";
    pub const BUNDLER_EDIT: &str = "bundler-edit";
    pub const LANDING_PAGE_SETUP: &str = "landing-page-setup";
    pub const ENV_SETUP: &str = "env-setup";
    pub const VCS_INIT: &str = "vcs-init";
    pub const PUBLISH: &str = "publish";
}

/// Build the full two-phase pipeline in its fixed order.
pub fn standard_pipeline() -> Pipeline {
    Pipeline::new(
        vec![
            Step::new(names::PREFLIGHT, always, main::preflight),
            Step::new(names::MATERIALIZE_SOURCE, always, main::materialize_source),
            Step::new(names::INSTALL_STATIC_FILES, always, main::install_static_files),
            Step::new(names::COLLECT_OPTIONS, always, main::collect_options),
            Step::new(names::DECLARE_DEPENDENCIES, always, main::declare_dependencies),
        ],
        vec![
            Step::new(names::LINT_SETUP, always, deferred::lint_setup),
            Step::new(names::JOB_QUEUE_SETUP, always, deferred::job_queue_setup),
            Step::new(names::ANNOTATION_SETUP, always, deferred::annotation_setup),
            Step::new(names::BUG_FINDER_SETUP, always, deferred::bug_finder_setup),
            Step::new(
                names::AUTHENTICATION_SETUP,
                wants_authentication,
                deferred::authentication_setup,
            ),
            Step::new(
                names::AUTHORIZATION_SETUP,
                wants_authorization,
                deferred::authorization_setup,
            ),
            Step::new(names::ASSET_REPLACE, always, deferred::asset_replace),
            Step::new(names::FRONTEND_INSTALL, always, deferred::frontend_install),
            Step::new(names::JS_ENTRY_EDIT, always, deferred::js_entry_edit),
            Step::new(names::BUNDLER_EDIT, always, deferred::bundler_edit),
            Step::new(names::LANDING_PAGE_SETUP, always, deferred::landing_page_setup),
            Step::new(names::ENV_SETUP, always, deferred::env_setup),
            Step::new(names::VCS_INIT, always, deferred::vcs_init),
            Step::new(names::PUBLISH, wants_publish, deferred::publish),
        ],
    )
}

// ── predicates ────────────────────────────────────────────────────────────────

fn always(_: &RunContext) -> bool {
    true
}

fn wants_authentication(ctx: &RunContext) -> bool {
    ctx.flags().authentication
}

fn wants_authorization(ctx: &RunContext) -> bool {
    ctx.flags().authorization
}

fn wants_publish(ctx: &RunContext) -> bool {
    ctx.flags().publish
}

// ── shared step helpers ───────────────────────────────────────────────────────

/// Run a tool inside the target directory; a non-zero exit is fatal.
pub(crate) fn run_in_target(
    ctx: &RunContext,
    tools: &Toolbox,
    program: &str,
    args: &[&str],
) -> StepResult<()> {
    let output = tools.runner.run(program, args, ctx.target_dir())?;
    if !output.success() {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ApplicationError::CommandFailed {
            command,
            status: output.status,
            stderr: output.stderr,
        }
        .into());
    }
    Ok(())
}

/// Read, transform, write — the shape of every anchored file edit.
pub(crate) fn edit_file(
    tools: &Toolbox,
    path: &Path,
    edit: impl FnOnce(&str) -> Result<String, EditError>,
) -> StepResult<()> {
    let current = tools.filesystem.read_to_string(path)?;
    let edited = edit(&current)
        .map_err(|e| crate::domain::DomainError::from(e.with_file(path.display().to_string())))?;
    tools.filesystem.write_file(path, &edited)
}

/// Copy a template asset into the target tree, overwriting.
pub(crate) fn copy_from_source(
    ctx: &RunContext,
    tools: &Toolbox,
    name: &str,
    destination: &str,
) -> StepResult<()> {
    let from = ctx.source_file(name).ok_or_else(source_not_materialized)?;
    tools
        .filesystem
        .copy_file(&from, &ctx.target_path(destination))
}

pub(crate) fn source_not_materialized() -> crate::error::RailforgeError {
    ApplicationError::SourceError {
        reason: "template source has not been materialized".into(),
    }
    .into()
}

/// Append to an existing file in the target tree. The appended content
/// always starts on a fresh line, even when the file lacks a trailing
/// newline.
pub(crate) fn append_to_target(
    ctx: &RunContext,
    tools: &Toolbox,
    relative: &str,
    content: &str,
) -> RailforgeResult<()> {
    let path = ctx.target_path(relative);
    let current = tools.filesystem.read_to_string(&path)?;
    tools
        .filesystem
        .write_file(&path, &textedit::append(&current, content))
}
