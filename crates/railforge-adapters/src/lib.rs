//! Infrastructure adapters for Railforge.
//!
//! This crate implements the ports defined in
//! `railforge-core::application::ports`. It contains all external
//! dependencies and I/O operations: spawning the host tools (rails,
//! bundler, yarn, git, gh), touching the target project tree, asking the
//! operator questions, and resolving template sources.
//!
//! Every port ships with a production adapter and a test double, so the
//! whole pipeline can run end to end without a shell, a terminal, or a
//! real filesystem.

pub mod command;
pub mod filesystem;
pub mod prompt;
pub mod source;

// Re-export commonly used adapters
pub use command::{LocalCommandRunner, RecordingRunner};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use prompt::{ScriptedPrompter, TerminalPrompter};
pub use source::{GitSourceMaterializer, StaticSource};
