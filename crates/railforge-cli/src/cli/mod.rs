//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, help
//! text, and defaults.  No business logic lives here.

use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

/// Main CLI entry-point.
///
/// Railforge is a single-purpose tool, so there are no subcommands: one
/// invocation configures one freshly generated Rails application.
#[derive(Debug, Parser)]
#[command(
    name = "railforge",
    bin_name = "railforge",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "\u{1f6e4} Opinionated setup for freshly generated Rails apps",
    long_about = "Railforge takes a freshly generated Rails application and \
                  configures it: curated gems, devise/pundit wiring, frontend \
                  tooling, lint setup, and an initial git commit.",
    after_help = "EXAMPLES:\n\
        \x20 rails new myapp && railforge myapp\n\
        \x20 railforge myapp --source ~/rails-templates\n\
        \x20 railforge . --source https://github.com/acme/rails-templates.git -v"
)]
pub struct Cli {
    /// Flags available on every invocation.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The Rails application directory to configure.
    #[arg(
        value_name = "DIR",
        default_value = ".",
        help = "Rails application directory (default: current directory)"
    )]
    pub target: PathBuf,

    /// Application name used when rendering templated files. Defaults to
    /// the target directory's basename.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Application name")]
    pub name: Option<String>,

    /// Where template assets come from: a local directory or a git URL.
    /// Overrides the configured source.
    #[arg(
        short = 's',
        long = "source",
        value_name = "PATH_OR_URL",
        help = "Template source (directory or git URL)"
    )]
    pub source: Option<String>,
}

// ── tests ─────────────────────────────────────────────────────────────────────
