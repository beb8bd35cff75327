//! Pipeline executor.
//!
//! An ordered sequence of [`Step`]s, partitioned into a main phase and a
//! deferred phase. The boundary between the two is the physical dependency
//! install (`bundle install`): deferred steps assume every declared gem is
//! on disk, so the executor itself runs the package manager between the
//! phases and refuses to start the deferred phase unless it succeeded.
//!
//! Execution is strictly sequential and short-circuits on the first
//! failure. There is no retry and no rollback — re-running after a fix is
//! the expected recovery path, exactly like the framework generator tools
//! this pipeline drives.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::application::ApplicationError;
use crate::application::ports::{
    CommandRunner, Filesystem, MaterializedSource, Prompter, SourceMaterializer,
};
use crate::domain::RunContext;
use crate::error::{RailforgeError, RailforgeResult};

/// Result alias for step actions.
pub type StepResult<T> = RailforgeResult<T>;

/// The bundle of driven ports every step action works through.
pub struct Toolbox {
    pub runner: Box<dyn CommandRunner>,
    pub filesystem: Box<dyn Filesystem>,
    pub prompter: Box<dyn Prompter>,
    pub source: Box<dyn SourceMaterializer>,
    /// Keeps a cloned template source alive (and its temporary directory on
    /// disk) until the run is over; dropped with the toolbox on every exit
    /// path.
    source_guard: Mutex<Option<Box<dyn MaterializedSource>>>,
}

impl Toolbox {
    pub fn new(
        runner: Box<dyn CommandRunner>,
        filesystem: Box<dyn Filesystem>,
        prompter: Box<dyn Prompter>,
        source: Box<dyn SourceMaterializer>,
    ) -> Self {
        Self {
            runner,
            filesystem,
            prompter,
            source,
            source_guard: Mutex::new(None),
        }
    }

    /// Take ownership of a materialized source for the rest of the run.
    ///
    /// A poisoned guard is an error: silently dropping the source here
    /// would delete a cloned template directory that later steps still
    /// copy from.
    pub fn hold_source(&self, source: Box<dyn MaterializedSource>) -> RailforgeResult<()> {
        let mut guard = self
            .source_guard
            .lock()
            .map_err(|_| ApplicationError::SourceError {
                reason: "source guard lock poisoned".into(),
            })?;
        *guard = Some(source);
        Ok(())
    }
}

/// A named, ordered unit of work.
///
/// Steps are statically defined plain function pointers — the tables in
/// [`crate::application::steps`] are fixed at compile time, never reordered
/// or extended at runtime.
pub struct Step {
    pub name: &'static str,
    pub predicate: fn(&RunContext) -> bool,
    pub action: fn(&mut RunContext, &Toolbox) -> StepResult<()>,
}

impl Step {
    pub const fn new(
        name: &'static str,
        predicate: fn(&RunContext) -> bool,
        action: fn(&mut RunContext, &Toolbox) -> StepResult<()>,
    ) -> Self {
        Self { name, predicate, action }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// Ordered record of the step names that actually executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionTrace {
    executed: Vec<&'static str>,
}

impl ExecutionTrace {
    pub fn executed(&self) -> &[&'static str] {
        &self.executed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.executed.iter().any(|n| *n == name)
    }

    fn record(&mut self, name: &'static str) {
        self.executed.push(name);
    }
}

/// A pipeline failure, tagged with the step it happened in.
#[derive(Debug, Error)]
#[error("step `{step}` failed: {source}")]
pub struct PipelineError {
    pub step: &'static str,
    #[source]
    pub source: RailforgeError,
}

/// The two-phase step sequence.
pub struct Pipeline {
    main: Vec<Step>,
    deferred: Vec<Step>,
}

impl Pipeline {
    pub fn new(main: Vec<Step>, deferred: Vec<Step>) -> Self {
        Self { main, deferred }
    }

    /// Execute the whole run: main phase, dependency install, deferred
    /// phase. Returns the trace of executed step names.
    pub fn execute(
        &self,
        ctx: &mut RunContext,
        tools: &Toolbox,
    ) -> Result<ExecutionTrace, PipelineError> {
        let mut trace = ExecutionTrace::default();

        self.run_phase(&self.main, ctx, tools, &mut trace)?;
        self.install_dependencies(ctx, tools)?;
        self.run_phase(&self.deferred, ctx, tools, &mut trace)?;

        info!(steps = trace.executed().len(), "pipeline finished");
        Ok(trace)
    }

    fn run_phase(
        &self,
        steps: &[Step],
        ctx: &mut RunContext,
        tools: &Toolbox,
        trace: &mut ExecutionTrace,
    ) -> Result<(), PipelineError> {
        for step in steps {
            if !(step.predicate)(ctx) {
                trace!(step = step.name, "skipped");
                continue;
            }
            debug!(step = step.name, "running");
            trace.record(step.name);
            (step.action)(ctx, tools).map_err(|source| PipelineError {
                step: step.name,
                source,
            })?;
        }
        Ok(())
    }

    /// The phase boundary: physically install everything the main phase
    /// declared. Not a named step — it cannot be skipped or reordered.
    fn install_dependencies(
        &self,
        ctx: &RunContext,
        tools: &Toolbox,
    ) -> Result<(), PipelineError> {
        const BOUNDARY: &str = "bundle-install";

        debug!("installing declared dependencies");
        let output = tools
            .runner
            .run("bundle", &["install"], ctx.target_dir())
            .map_err(|source| PipelineError { step: BOUNDARY, source })?;

        if !output.success() {
            return Err(PipelineError {
                step: BOUNDARY,
                source: ApplicationError::CommandFailed {
                    command: "bundle install".into(),
                    status: output.status,
                    stderr: output.stderr,
                }
                .into(),
            });
        }
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
