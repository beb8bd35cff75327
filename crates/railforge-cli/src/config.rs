//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`RAILFORGE_*`)
//! 3. Config file (`--config`, or `railforge.toml` in the current directory)
//! 4. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template source settings.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Where template assets come from: a local directory or a git URL.
    /// When unset, a `templates` directory next to the executable is used.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `RAILFORGE_*` environment variables (e.g.
    /// `RAILFORGE_TEMPLATES__SOURCE`).
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(config::File::from(path.clone())),
            None => builder.add_source(config::File::with_name("railforge").required(false)),
        };
        builder = builder.add_source(
            config::Environment::with_prefix("RAILFORGE").separator("__"),
        );

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Resolve the template source for this run: CLI flag, then config,
    /// then the `templates` directory shipped next to the executable.
    pub fn template_source(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_owned)
            .or_else(|| self.templates.source.clone())
            .unwrap_or_else(default_template_dir)
    }
}

fn default_template_dir() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("templates")))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "templates".into())
}
