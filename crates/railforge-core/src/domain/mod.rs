//! Domain layer: pure logic with no I/O.
//!
//! Everything here operates on values handed in by the application layer —
//! manifest text, version strings, option flags. The actual reads, writes
//! and command invocations live behind the ports in
//! [`crate::application::ports`].

pub mod context;
pub mod error;
pub mod gemfile;
pub mod textedit;
pub mod version;

pub use context::{OptionFlags, RunContext};
pub use error::{DomainError, ErrorCategory};
pub use textedit::{Anchor, EditError};
pub use version::{RAILS_REQUIREMENT, parse_rails_version, rails_requirement};
