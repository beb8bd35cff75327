//! The one command Railforge has: configure a freshly generated Rails
//! application in place.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use railforge_adapters::{
    GitSourceMaterializer, LocalCommandRunner, LocalFilesystem, TerminalPrompter,
};
use railforge_core::prelude::*;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputManager;

/// Validate the target, assemble the production toolbox, and run the
/// pipeline.
#[instrument(skip_all, fields(target = %cli.target.display()))]
pub fn execute(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let target = resolve_target(&cli.target)?;
    let app_name = cli
        .name
        .clone()
        .unwrap_or_else(|| derive_app_name(&target));
    let source = config.template_source(cli.source.as_deref());

    output.header(&format!("Configuring Rails application '{app_name}'"))?;
    output.info(&format!("template source: {source}"))?;

    let tools = Toolbox::new(
        Box::new(LocalCommandRunner::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(TerminalPrompter::new()),
        Box::new(GitSourceMaterializer::new(Box::new(LocalCommandRunner::new()))),
    );
    let mut ctx = RunContext::new(target, app_name.clone(), source);

    let trace = standard_pipeline().execute(&mut ctx, &tools)?;

    info!(steps = trace.executed().len(), "run complete");
    output.success(&format!(
        "'{app_name}' configured ({} steps run)",
        trace.executed().len()
    ))?;
    Ok(())
}

/// The target must exist and at least look like a generated Rails app
/// before the pipeline touches anything.
fn resolve_target(path: &Path) -> CliResult<PathBuf> {
    if !path.is_dir() {
        return Err(CliError::TargetNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.join("Gemfile").is_file() {
        return Err(CliError::NotARailsApp {
            path: path.to_path_buf(),
            reason: "no Gemfile found".into(),
        });
    }
    Ok(path.to_path_buf())
}

/// Default the application name to the target directory's basename.
fn derive_app_name(target: &Path) -> String {
    target
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "app".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_is_not_found() {
        let err = resolve_target(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CliError::TargetNotFound { .. }));
    }

    #[test]
    fn directory_without_gemfile_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_target(dir.path()).unwrap_err();
        assert!(matches!(err, CliError::NotARailsApp { .. }));
    }

    #[test]
    fn rails_looking_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gemfile"), "source 'https://rubygems.org'\n").unwrap();
        assert_eq!(resolve_target(dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn app_name_comes_from_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("myapp");
        std::fs::create_dir(&app).unwrap();
        assert_eq!(derive_app_name(&app), "myapp");
    }
}
