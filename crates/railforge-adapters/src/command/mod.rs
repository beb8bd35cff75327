//! Command-runner adapters.

mod local;
mod recording;

pub use local::LocalCommandRunner;
pub use recording::RecordingRunner;
