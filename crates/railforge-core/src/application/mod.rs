//! Application layer: pipeline orchestration and ports.

pub mod error;
pub mod pipeline;
pub mod ports;
pub mod steps;

pub use error::ApplicationError;
pub use pipeline::{ExecutionTrace, Pipeline, PipelineError, Step, StepResult, Toolbox};
