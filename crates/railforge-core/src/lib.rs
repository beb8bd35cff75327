//! Railforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Railforge
//! Rails-app configurator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         railforge-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Pipeline Executor               │
//! │   (main phase → install → deferred)     │
//! │        Orchestrates the Steps           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (CommandRunner, Filesystem, Prompter,   │
//! │          SourceMaterializer)            │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   railforge-adapters (Infrastructure)   │
//! │ (LocalCommandRunner, LocalFilesystem,   │
//! │     TerminalPrompter, GitSource)        │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (RunContext, anchored text edits,      │
//! │   Gemfile lookup, version requirement)  │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The tool itself is a linear, single-threaded run: every step completes
//! (or aborts the process) before the next begins, and the only suspension
//! points are synchronous waits on external commands and operator prompts.

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Pipeline, PipelineError, Step, Toolbox,
        ports::{CommandOutput, CommandRunner, Filesystem, MaterializedSource, Prompter,
                SourceMaterializer},
        steps::standard_pipeline,
    };
    pub use crate::domain::{OptionFlags, RunContext};
    pub use crate::error::{RailforgeError, RailforgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
