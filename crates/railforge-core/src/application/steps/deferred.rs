//! Deferred-phase steps: everything that assumes the declared gems are
//! physically installed.
//!
//! Ordering matters. The authentication scaffolding must exist before the
//! authorization wiring edits it; the landing-page controller must exist
//! before its authentication-filter skip is inserted; version control runs
//! last so the initial commit captures the finished tree.

use tracing::{info, warn};

use crate::application::pipeline::{StepResult, Toolbox};
use crate::application::steps::{append_to_target, copy_from_source, edit_file, run_in_target};
use crate::domain::RunContext;
use crate::domain::textedit::{self, Anchor};

const SIDEKIQ_WORKER_LINE: &str = "worker: bundle exec sidekiq -C config/sidekiq.yml\n";

const STYLESHEETS_ARCHIVE: &str =
    "https://github.com/lewagon/stylesheets/archive/master.zip";

const FRONTEND_PACKAGES: &[&str] = &[
    "bootstrap",
    "popper.js",
    "jquery",
    "babel-eslint",
    "eslint",
    "eslint-plugin-import",
    "eslint-import-resolver-webpack",
    "eslint-config-prettier",
    "eslint-plugin-prettier",
    "prettier",
    "npm-run-all",
    "stylelint",
    "stylelint-config-recommended-scss",
    "stylelint-config-standard",
    "stylelint-declaration-use-variable",
    "stylelint-scss",
];

const JS_ENTRY_BLOCK: &str = "\
// External imports
import \"bootstrap\";

// Internal imports, e.g:
// import { initSelect2 } from '../components/init_select2';

document.addEventListener('turbolinks:load', () => {
  // Call your functions here, e.g:
  // initSelect2();
});
";

const WEBPACK_PROVIDE_BLOCK: &str = "\
const webpack = require('webpack');
// Preventing Babel from transpiling NodeModules packages
environment.loaders.delete('nodeModules');
// Bootstrap 4 has a dependency over jQuery & Popper.js:
environment.plugins.prepend('Provide',
  new webpack.ProvidePlugin({
    $: 'jquery',
    jQuery: 'jquery',
    Popper: ['popper.js', 'default']
  })
);
";

const GITIGNORE_BLOCK: &str = "\
# Ignore .env file containing credentials.
.env*
# Ignore Mac and Linux file system files
*.swp
.DS_Store
";

const GENERATORS_BLOCK: &str = "\
    config.generators do |generate|
      generate.assets false
    end
";

const SKIP_AUTH_FILTER_LINE: &str =
    "  skip_before_action :authenticate_user!, only: [ :home ]\n";

const PUNDIT_INCLUDE_BLOCK: &str = "\
  include Pundit
  after_action :verify_authorized, except: :index, unless: :skip_pundit?
  after_action :verify_policy_scoped, only: :index, unless: :skip_pundit?
";

const PUNDIT_SKIP_HELPER: &str = "
  private

  def skip_pundit?
    devise_controller? || params[:controller] =~ /(^(rails_)?admin)|(^pages$)/
  end
";

/// Lint tooling: binstub, shared rubocop config, and one formatting pass
/// over the freshly generated tree.
pub(super) fn lint_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    run_in_target(ctx, tools, "bundle", &["binstubs", "rubocop"])?;
    copy_from_source(ctx, tools, ".rubocop.yml", ".rubocop.yml")?;
    run_in_target(ctx, tools, "bundle", &["exec", "rubocop"])
}

/// Background jobs: sidekiq binstub plus a worker entry in both process
/// manifests.
pub(super) fn job_queue_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    run_in_target(ctx, tools, "bundle", &["binstubs", "sidekiq"])?;
    append_to_target(ctx, tools, "Procfile", SIDEKIQ_WORKER_LINE)?;
    append_to_target(ctx, tools, "Procfile.dev", SIDEKIQ_WORKER_LINE)
}

/// Schema annotations on models.
pub(super) fn annotation_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    run_in_target(ctx, tools, "rails", &["g", "annotate:install"])
}

/// Enable Bullet's N+1 detection in development.
pub(super) fn bug_finder_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    edit_file(
        tools,
        &ctx.target_path("config/environments/development.rb"),
        |text| {
            textedit::insert_before(
                text,
                Anchor::LineStartsWith("end"),
                "  Bullet.enable = true\n  Bullet.alert = true\n",
            )
        },
    )
}

/// Devise scaffolding: installer, views, mailer base URLs for both
/// environments, the secret key, and a User model with name fields. The
/// shared application controller (with its global `authenticate_user!`
/// filter) is installed last, overwriting the generated one.
pub(super) fn authentication_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    run_in_target(ctx, tools, "rails", &["generate", "devise:install"])?;
    run_in_target(ctx, tools, "rails", &["generate", "devise:i18n:views"])?;
    if ctx.flags().auth_styling {
        // The bootstrap-styled views re-run the installer to pick up the
        // styled templates.
        run_in_target(ctx, tools, "rails", &["generate", "devise:install"])?;
    }

    edit_file(
        tools,
        &ctx.target_path("config/environments/development.rb"),
        |text| {
            textedit::insert_after(
                text,
                Anchor::Substring("Rails.application.configure do\n"),
                "  config.action_mailer.default_url_options = { host: 'localhost', port: 3000 }\n",
            )
        },
    )?;
    edit_file(
        tools,
        &ctx.target_path("config/environments/production.rb"),
        |text| {
            textedit::insert_after(
                text,
                Anchor::Substring("Rails.application.configure do\n"),
                "  config.action_mailer.default_url_options = { host: \"http://TODO_PUT_YOUR_DOMAIN_HERE\" }\n",
            )
        },
    )?;
    edit_file(
        tools,
        &ctx.target_path("config/initializers/devise.rb"),
        |text| {
            textedit::insert_before(
                text,
                Anchor::LineStartsWith("end"),
                "  config.secret_key = Rails.application.credentials.secret_key_base\n",
            )
        },
    )?;

    run_in_target(
        ctx,
        tools,
        "rails",
        &["g", "devise", "User", "first_name", "last_name"],
    )?;

    // The landing-page controller usually does not exist yet (it is
    // generated later); when it does, skip the global filter on its home
    // action here as well.
    let pages_controller = ctx.target_path("app/controllers/pages_controller.rb");
    if tools.filesystem.exists(&pages_controller) {
        edit_file(tools, &pages_controller, |text| {
            textedit::insert_after(
                text,
                Anchor::Substring("ApplicationController\n"),
                SKIP_AUTH_FILTER_LINE,
            )
        })?;
    }

    copy_from_source(
        ctx,
        tools,
        "app/controllers/application_controller.rb",
        "app/controllers/application_controller.rb",
    )
}

/// Pundit wiring into the application controller, then its installer.
pub(super) fn authorization_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let controller = ctx.target_path("app/controllers/application_controller.rb");
    edit_file(tools, &controller, |text| {
        textedit::insert_before(text, Anchor::LineStartsWith("end"), PUNDIT_SKIP_HELPER)
    })?;
    edit_file(tools, &controller, |text| {
        textedit::insert_after(
            text,
            Anchor::Substring(":authenticate_user!\n"),
            PUNDIT_INCLUDE_BLOCK,
        )
    })?;

    run_in_target(ctx, tools, "spring", &["stop"])?;
    run_in_target(ctx, tools, "rails", &["g", "pundit:install"])
}

/// Replace the generated stylesheets with the downloaded stylesheet pack.
pub(super) fn asset_replace(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let fs = tools.filesystem.as_ref();

    let stylesheets = ctx.target_path("app/assets/stylesheets");
    if fs.exists(&stylesheets) {
        fs.remove_dir_all(&stylesheets)?;
    }
    let vendor = ctx.target_path("vendor");
    if fs.exists(&vendor) {
        fs.remove_dir_all(&vendor)?;
    }

    run_in_target(
        ctx,
        tools,
        "curl",
        &["-L", STYLESHEETS_ARCHIVE, "-o", "stylesheets.zip"],
    )?;
    run_in_target(ctx, tools, "unzip", &["stylesheets.zip", "-d", "app/assets"])?;
    fs.remove_file(&ctx.target_path("stylesheets.zip"))?;
    fs.rename(
        &ctx.target_path("app/assets/rails-stylesheets-master"),
        &stylesheets,
    )
}

/// Front-end dev dependencies plus the shared lint configs.
pub(super) fn frontend_install(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let mut args = vec!["add"];
    args.extend_from_slice(FRONTEND_PACKAGES);
    args.push("-D");
    run_in_target(ctx, tools, "yarn", &args)?;

    copy_from_source(ctx, tools, ".eslintrc", ".eslintrc")?;
    copy_from_source(ctx, tools, ".stylelintrc", ".stylelintrc")
}

/// Seed the JavaScript entry point with the bootstrap import and a
/// turbolinks load hook.
pub(super) fn js_entry_edit(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    append_to_target(
        ctx,
        tools,
        "app/javascript/packs/application.js",
        JS_ENTRY_BLOCK,
    )
}

/// Provide jQuery/Popper globals through webpack for Bootstrap 4.
pub(super) fn bundler_edit(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    edit_file(
        tools,
        &ctx.target_path("config/webpack/environment.js"),
        |text| {
            textedit::insert_before(
                text,
                Anchor::Substring("module.exports"),
                WEBPACK_PROVIDE_BLOCK,
            )
        },
    )
}

/// Root route, pages controller, and (with authentication) the filter skip
/// on the public home action.
pub(super) fn landing_page_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    edit_file(tools, &ctx.target_path("config/routes.rb"), |text| {
        textedit::insert_after(
            text,
            Anchor::Substring(".draw do\n"),
            "  root to: 'pages#home'\n",
        )
    })?;

    run_in_target(
        ctx,
        tools,
        "rails",
        &[
            "generate",
            "controller",
            "pages",
            "home",
            "--skip-routes",
            "--no-test-framework",
        ],
    )?;

    if ctx.flags().authentication {
        edit_file(
            tools,
            &ctx.target_path("app/controllers/pages_controller.rb"),
            |text| {
                textedit::insert_after(
                    text,
                    Anchor::Substring("ApplicationController\n"),
                    SKIP_AUTH_FILTER_LINE,
                )
            },
        )?;
    }
    Ok(())
}

/// Credentials file, ignore rules, and generator defaults.
pub(super) fn env_setup(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let fs = tools.filesystem.as_ref();

    let dotenv = ctx.target_path(".env");
    if !fs.exists(&dotenv) {
        fs.write_file(&dotenv, "")?;
    }
    append_to_target(ctx, tools, ".gitignore", GITIGNORE_BLOCK)?;

    edit_file(
        tools,
        &ctx.target_path("config/environments/development.rb"),
        |text| {
            textedit::replace_line_tail(
                text,
                "config.assets.debug",
                "config.assets.debug = false",
            )
        },
    )?;

    edit_file(tools, &ctx.target_path("config/application.rb"), |text| {
        textedit::insert_after(
            text,
            Anchor::Substring("class Application < Rails::Application\n"),
            GENERATORS_BLOCK,
        )
    })
}

/// Create the database, apply the generated migrations, then initialize
/// version control and capture the finished tree (schema included) in one
/// commit.
pub(super) fn vcs_init(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    run_in_target(ctx, tools, "rails", &["db:create", "db:migrate"])?;
    run_in_target(ctx, tools, "git", &["init"])?;
    run_in_target(ctx, tools, "git", &["add", "."])?;
    run_in_target(
        ctx,
        tools,
        "git",
        &["commit", "-m", "End of the template generation"],
    )
}

/// Create and push a GitHub repository. A missing `gh` CLI is the single
/// non-fatal condition in the pipeline: the run is complete at this point,
/// so it is reported and the step ends successfully.
pub(super) fn publish(ctx: &mut RunContext, tools: &Toolbox) -> StepResult<()> {
    let available = matches!(
        tools.runner.run("gh", &["version"], ctx.target_dir()),
        Ok(output) if output.success()
    );
    if !available {
        warn!("the GitHub CLI (gh) is not installed; install it and publish manually");
        return Ok(());
    }

    run_in_target(ctx, tools, "gh", &["repo", "create"])?;
    run_in_target(ctx, tools, "git", &["push", "origin", "master"])?;
    run_in_target(ctx, tools, "gh", &["repo", "view", "--web"])?;
    info!("repository published");
    Ok(())
}
