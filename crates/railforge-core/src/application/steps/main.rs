//! Main-phase steps: everything that runs before the dependency install.

use tracing::{debug, info, warn};

use crate::application::ApplicationError;
use crate::application::pipeline::{StepResult, Toolbox};
use crate::domain::gemfile::{GemEntry, group_block};
use crate::domain::{OptionFlags, RunContext, parse_rails_version, rails_requirement};
use crate::domain::version::RAILS_REQUIREMENT;

/// Confirm the host Rails satisfies the pinned requirement; on mismatch the
/// operator may explicitly accept the risk, otherwise the run aborts before
/// any file is touched. This is the only environment validation in the run.
pub(super) fn preflight(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let requirement = rails_requirement()?;

    let detected = match tools.runner.run("rails", &["--version"], ctx.target_dir()) {
        Ok(output) if output.success() => parse_rails_version(&output.stdout).ok(),
        Ok(_) | Err(_) => None,
    };

    if let Some(version) = &detected {
        if requirement.matches(version) {
            debug!(%version, "Rails version satisfies {}", RAILS_REQUIREMENT);
            return Ok(());
        }
    }

    let installed = detected
        .map(|v| v.to_string())
        .unwrap_or_else(|| "an undetermined version".into());
    let question = format!(
        "This tool requires Rails ~> 6.1.0. You are using {installed}. Continue anyway?"
    );
    if tools.prompter.confirm(&question)? {
        warn!(%installed, "continuing with an unmet Rails requirement");
        Ok(())
    } else {
        Err(ApplicationError::Aborted {
            reason: format!("Rails requirement {RAILS_REQUIREMENT} not met"),
        }
        .into())
    }
}

/// Resolve the template-asset search path: a local directory as-is, or a
/// remote URL cloned into a temporary directory that lives exactly as long
/// as the run.
pub(super) fn materialize_source(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let source = tools.source.materialize(ctx.source_spec())?;
    info!(path = %source.path().display(), "template source materialized");
    ctx.set_source_path(source.path().to_path_buf());
    tools.hold_source(source)?;
    Ok(())
}

/// Install the fixed static assets, overwriting whatever the generator put
/// there. The README is the one rendered file: `{{app_name}}` is replaced
/// with the target application's name.
pub(super) fn install_static_files(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let readme_template = ctx
        .source_file("README.md")
        .ok_or_else(super::source_not_materialized)?;
    let rendered = tools
        .filesystem
        .read_to_string(&readme_template)?
        .replace("{{app_name}}", ctx.app_name());
    tools
        .filesystem
        .write_file(&ctx.target_path("README.md"), &rendered)?;

    super::copy_from_source(ctx, tools, "Procfile", "Procfile")?;
    super::copy_from_source(ctx, tools, "Procfile.dev", "Procfile.dev")
}

/// Ask the operator the four gating questions, honouring the prerequisite
/// chain: styling and authorization only make sense once authentication was
/// accepted, so they are never asked otherwise.
pub(super) fn collect_options(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let prompter = tools.prompter.as_ref();

    let authentication = prompter.confirm(
        "Do you want to implement authentication in your app with the Devise gem?",
    )?;
    let auth_styling = authentication
        && prompter.confirm("Do you want to implement devise with bootstrap?")?;
    let authorization = authentication
        && prompter.confirm("Do you want to manage authorizations with Pundit?")?;
    let publish = prompter.confirm("Do you want to push your project to Github?")?;

    let flags = OptionFlags {
        authentication,
        auth_styling,
        authorization,
        publish,
    };
    debug!(?flags, "options collected");
    ctx.set_flags(flags);
    Ok(())
}

const DEFAULT_GEMS: &[GemEntry] = &[
    GemEntry::new("uglifier"),
    GemEntry::new("redis"),
    GemEntry::new("sidekiq"),
    GemEntry::new("sidekiq-failures"),
    GemEntry::new("name_of_person"),
    GemEntry::new("bootstrap"),
    GemEntry::new("font-awesome-sass"),
    GemEntry::new("autoprefixer-rails"),
];

const DEV_TEST_GEMS: &[GemEntry] = &[
    GemEntry::new("pry-byebug"),
    GemEntry::new("pry-rails"),
    GemEntry::new("dotenv-rails"),
    GemEntry::new("binding_of_caller"),
];

const DEV_GEMS: &[GemEntry] = &[
    GemEntry::new("annotate"),
    GemEntry::new("awesome_print"),
    GemEntry::new("bullet"),
    GemEntry::new("rails-erd"),
    GemEntry::without_require("rubocop"),
];

/// Append the gem list to the Gemfile. Text only — the physical install is
/// the executor's phase boundary. A gem the app already pins keeps its
/// original constraint.
pub(super) fn declare_dependencies(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let gemfile_path = ctx.target_path("Gemfile");
    let original = tools.filesystem.read_to_string(&gemfile_path)?;
    ctx.cache_gemfile(original);

    let flags = ctx.flags();
    let render = |entry: &GemEntry| entry.render(ctx.gem_requirement(entry.name).as_deref());

    let mut block = String::from("\n");
    if flags.authentication {
        block.push_str(&render(&GemEntry::new("devise")));
        block.push('\n');
    }
    if flags.authorization {
        block.push_str(&render(&GemEntry::new("pundit")));
        block.push('\n');
    }
    for entry in DEFAULT_GEMS {
        block.push_str(&render(entry));
        block.push('\n');
    }

    block.push('\n');
    block.push_str(&group_block(
        &["development", "test"],
        &DEV_TEST_GEMS.iter().map(&render).collect::<Vec<_>>(),
    ));
    block.push('\n');
    block.push_str(&group_block(
        &["development"],
        &DEV_GEMS.iter().map(&render).collect::<Vec<_>>(),
    ));

    tools.filesystem.append_file(&gemfile_path, &block)
}
