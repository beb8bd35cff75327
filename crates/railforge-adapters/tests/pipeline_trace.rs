//! End-to-end pipeline runs against in-memory adapters.
//!
//! These tests exercise the full two-phase pipeline with every port faked:
//! commands are recorded instead of spawned, prompts answer from a script,
//! and the target tree lives in memory. Files normally created by the
//! framework generators are seeded up front, since the fake runner creates
//! nothing.

use railforge_adapters::{MemoryFilesystem, RecordingRunner, ScriptedPrompter, StaticSource};
use railforge_core::application::steps::names;
use railforge_core::prelude::*;

use std::path::Path;

const TARGET: &str = "/app";
const TEMPLATES: &str = "/templates";

const APPLICATION_CONTROLLER: &str = "\
class ApplicationController < ActionController::Base
  before_action :authenticate_user!
end
";

fn seeded_filesystem() -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();

    // Template assets.
    fs.seed_file("/templates/README.md", "# {{app_name}}\n\nGenerated Rails app.\n");
    fs.seed_file("/templates/Procfile", "web: bundle exec puma -C config/puma.rb\n");
    fs.seed_file("/templates/Procfile.dev", "web: bin/rails server -p 3000\n");
    fs.seed_file("/templates/.rubocop.yml", "AllCops:\n  NewCops: enable\n");
    fs.seed_file("/templates/.eslintrc", "{}\n");
    fs.seed_file("/templates/.stylelintrc", "{}\n");
    fs.seed_file(
        "/templates/app/controllers/application_controller.rb",
        APPLICATION_CONTROLLER,
    );

    // The generated Rails tree the pipeline edits.
    fs.seed_file(
        "/app/Gemfile",
        "source 'https://rubygems.org'\ngem 'rails', '~> 6.1.3'\ngem \"redis\", \">= 4.0\"\n",
    );
    fs.seed_file(
        "/app/config/environments/development.rb",
        "Rails.application.configure do\n  config.assets.debug = true\nend\n",
    );
    fs.seed_file(
        "/app/config/environments/production.rb",
        "Rails.application.configure do\nend\n",
    );
    fs.seed_file(
        "/app/config/initializers/devise.rb",
        "Devise.setup do |config|\nend\n",
    );
    fs.seed_file("/app/config/routes.rb", "Rails.application.routes.draw do\nend\n");
    fs.seed_file(
        "/app/config/webpack/environment.js",
        "const { environment } = require('@rails/webpacker')\n\nmodule.exports = environment\n",
    );
    fs.seed_file(
        "/app/config/application.rb",
        "module Sample\n  class Application < Rails::Application\n    config.load_defaults 6.1\n  end\nend\n",
    );
    fs.seed_file(
        "/app/app/controllers/pages_controller.rb",
        "class PagesController < ApplicationController\n  def home\n  end\nend\n",
    );
    fs.seed_file(
        "/app/app/javascript/packs/application.js",
        "import Rails from \"@rails/ujs\"\nRails.start()\n",
    );
    fs.seed_file("/app/app/assets/stylesheets/application.css", "/* generated */\n");
    fs.seed_dir("/app/app/assets/rails-stylesheets-master");
    // The archive the fake curl "downloaded".
    fs.seed_file("/app/stylesheets.zip", "");
    fs.seed_dir("/app/vendor");
    fs.seed_file("/app/.gitignore", "/node_modules\n");

    fs
}

fn rails_ok_runner() -> RecordingRunner {
    let runner = RecordingRunner::new();
    runner.respond("rails --version", CommandOutput::with_stdout("Rails 6.1.4\n"));
    runner
}

fn toolbox(runner: &RecordingRunner, fs: &MemoryFilesystem, prompter: ScriptedPrompter) -> Toolbox {
    Toolbox::new(
        Box::new(runner.clone()),
        Box::new(fs.clone()),
        Box::new(prompter),
        Box::new(StaticSource::new(TEMPLATES)),
    )
}

fn context() -> RunContext {
    RunContext::new(TARGET, "sample", TEMPLATES)
}

#[test]
fn full_run_executes_the_expected_trace() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    // authentication, styling, authorization; no publish.
    let prompter = ScriptedPrompter::with_answers([true, true, true, false]);
    let tools = toolbox(&runner, &fs, prompter);

    let mut ctx = context();
    let trace = standard_pipeline().execute(&mut ctx, &tools).unwrap();

    assert_eq!(
        trace.executed(),
        [
            names::PREFLIGHT,
            names::MATERIALIZE_SOURCE,
            names::INSTALL_STATIC_FILES,
            names::COLLECT_OPTIONS,
            names::DECLARE_DEPENDENCIES,
            names::LINT_SETUP,
            names::JOB_QUEUE_SETUP,
            names::ANNOTATION_SETUP,
            names::BUG_FINDER_SETUP,
            names::AUTHENTICATION_SETUP,
            names::AUTHORIZATION_SETUP,
            names::ASSET_REPLACE,
            names::FRONTEND_INSTALL,
            names::JS_ENTRY_EDIT,
            names::BUNDLER_EDIT,
            names::LANDING_PAGE_SETUP,
            names::ENV_SETUP,
            names::VCS_INIT,
        ]
    );
}

#[test]
fn full_run_produces_the_configured_tree() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    let prompter = ScriptedPrompter::with_answers([true, true, true, false]);
    let tools = toolbox(&runner, &fs, prompter);

    let mut ctx = context();
    standard_pipeline().execute(&mut ctx, &tools).unwrap();

    // README rendered with the application name.
    let readme = fs.read_file(Path::new("/app/README.md")).unwrap();
    assert!(readme.starts_with("# sample\n"));

    // Gemfile: gated gems present, existing pin reused, groups rendered.
    let gemfile = fs.read_file(Path::new("/app/Gemfile")).unwrap();
    assert!(gemfile.contains("gem 'devise'"));
    assert!(gemfile.contains("gem 'pundit'"));
    assert!(gemfile.contains("gem 'redis', '>= 4.0'"));
    assert!(gemfile.contains("group :development, :test do"));
    assert!(gemfile.contains("  gem 'rubocop', require: false"));

    // Sidekiq worker appended to both process manifests.
    let procfile = fs.read_file(Path::new("/app/Procfile")).unwrap();
    assert!(procfile.ends_with("worker: bundle exec sidekiq -C config/sidekiq.yml\n"));
    let procfile_dev = fs.read_file(Path::new("/app/Procfile.dev")).unwrap();
    assert!(procfile_dev.contains("worker: bundle exec sidekiq"));

    // Bullet enabled ahead of the closing `end`.
    let development = fs
        .read_file(Path::new("/app/config/environments/development.rb"))
        .unwrap();
    assert!(development.contains("Bullet.enable = true"));
    assert!(development.contains("config.assets.debug = false"));
    assert!(development.contains("config.action_mailer.default_url_options = { host: 'localhost', port: 3000 }"));

    // Pundit wired into the shared application controller.
    let controller = fs
        .read_file(Path::new("/app/app/controllers/application_controller.rb"))
        .unwrap();
    assert!(controller.contains("include Pundit"));
    assert!(controller.contains("def skip_pundit?"));
    let authenticate = controller.find(":authenticate_user!").unwrap();
    let pundit = controller.find("include Pundit").unwrap();
    assert!(authenticate < pundit);

    // Stylesheets replaced by the downloaded pack.
    assert!(fs.read_file(Path::new("/app/app/assets/stylesheets/application.css")).is_none());
    assert!(runner.ran("curl -L"));
    assert!(runner.ran("unzip stylesheets.zip -d app/assets"));
    assert!(fs.read_file(Path::new("/app/stylesheets.zip")).is_none());

    // Root route and landing page.
    let routes = fs.read_file(Path::new("/app/config/routes.rb")).unwrap();
    assert!(routes.contains("root to: 'pages#home'"));
    let pages = fs
        .read_file(Path::new("/app/app/controllers/pages_controller.rb"))
        .unwrap();
    assert!(pages.contains("skip_before_action :authenticate_user!, only: [ :home ]"));

    // Environment files.
    assert_eq!(fs.read_file(Path::new("/app/.env")).as_deref(), Some(""));
    let gitignore = fs.read_file(Path::new("/app/.gitignore")).unwrap();
    assert!(gitignore.contains(".env*"));
    assert!(gitignore.contains(".DS_Store"));

    // Generator defaults inside the application class.
    let application = fs.read_file(Path::new("/app/config/application.rb")).unwrap();
    assert!(application.contains("generate.assets false"));

    // Version control ran last.
    assert!(runner.ran("git init"));
    assert!(runner.ran("git commit -m End of the template generation"));
}

#[test]
fn dependency_install_separates_the_phases() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    let prompter = ScriptedPrompter::with_answers([true, true, true, false]);
    let tools = toolbox(&runner, &fs, prompter);

    standard_pipeline().execute(&mut context(), &tools).unwrap();

    let preflight = runner.position("rails --version").unwrap();
    let install = runner.position("bundle install").unwrap();
    let first_deferred = runner.position("bundle binstubs rubocop").unwrap();
    assert!(preflight < install);
    assert!(install < first_deferred);
}

#[test]
fn database_is_prepared_before_the_initial_commit() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    let prompter = ScriptedPrompter::with_answers([true, true, true, false]);
    let tools = toolbox(&runner, &fs, prompter);

    standard_pipeline().execute(&mut context(), &tools).unwrap();

    let devise_model = runner
        .position("rails g devise User first_name last_name")
        .unwrap();
    let migrate = runner.position("rails db:create db:migrate").unwrap();
    let git_init = runner.position("git init").unwrap();
    assert!(devise_model < migrate);
    assert!(migrate < git_init);
}

#[test]
fn preflight_decline_stops_before_any_change() {
    let runner = RecordingRunner::new();
    runner.respond("rails --version", CommandOutput::with_stdout("Rails 5.2.3\n"));
    let fs = seeded_filesystem();
    // Operator refuses to continue on the unmet requirement.
    let prompter = ScriptedPrompter::with_answers([false]);
    let tools = toolbox(&runner, &fs, prompter);

    let err = standard_pipeline().execute(&mut context(), &tools).unwrap_err();

    assert_eq!(err.step, names::PREFLIGHT);
    assert_eq!(runner.commands(), ["rails --version"]);
    assert!(fs.read_file(Path::new("/app/README.md")).is_none());
}

#[test]
fn declined_authentication_skips_the_gated_steps() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    // No authentication (styling and authorization are never asked), no publish.
    let prompter = ScriptedPrompter::with_answers([false, false]);
    let tools = toolbox(&runner, &fs, prompter.clone());

    let trace = standard_pipeline().execute(&mut context(), &tools).unwrap();

    assert!(!trace.contains(names::AUTHENTICATION_SETUP));
    assert!(!trace.contains(names::AUTHORIZATION_SETUP));
    assert!(!trace.contains(names::PUBLISH));
    assert!(trace.contains(names::LINT_SETUP));
    assert!(trace.contains(names::VCS_INIT));

    // Exactly two questions were asked.
    assert_eq!(prompter.questions().len(), 2);

    let gemfile = fs.read_file(Path::new("/app/Gemfile")).unwrap();
    assert!(!gemfile.contains("gem 'devise'"));
    assert!(!gemfile.contains("gem 'pundit'"));
    assert!(!runner.ran("rails generate devise:install"));
}

#[test]
fn authentication_without_authorization_skips_pundit() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    // Authentication yes, styling no, authorization no, publish no.
    let prompter = ScriptedPrompter::with_answers([true, false, false, false]);
    let tools = toolbox(&runner, &fs, prompter);

    let trace = standard_pipeline().execute(&mut context(), &tools).unwrap();

    assert!(trace.contains(names::AUTHENTICATION_SETUP));
    assert!(!trace.contains(names::AUTHORIZATION_SETUP));
    assert!(!runner.ran("rails g pundit:install"));
    assert!(runner.ran("rails g devise User first_name last_name"));
}

#[test]
fn publish_tolerates_a_missing_gh_cli() {
    let runner = rails_ok_runner();
    runner.respond("gh version", CommandOutput::failed(127));
    let fs = seeded_filesystem();
    // Publish requested, but gh is not installed.
    let prompter = ScriptedPrompter::with_answers([false, true]);
    let tools = toolbox(&runner, &fs, prompter);

    let trace = standard_pipeline().execute(&mut context(), &tools).unwrap();

    assert!(trace.contains(names::PUBLISH));
    assert!(!runner.ran("gh repo create"));
    assert!(!runner.ran("git push"));
}

#[test]
fn publish_pushes_when_gh_is_available() {
    let runner = rails_ok_runner();
    let fs = seeded_filesystem();
    let prompter = ScriptedPrompter::with_answers([false, true]);
    let tools = toolbox(&runner, &fs, prompter);

    standard_pipeline().execute(&mut context(), &tools).unwrap();

    let commit = runner.position("git commit").unwrap();
    let create = runner.position("gh repo create").unwrap();
    assert!(commit < create);
    assert!(runner.ran("git push origin master"));
    assert!(runner.ran("gh repo view --web"));
}

#[test]
fn failed_dependency_install_stops_the_deferred_phase() {
    let runner = rails_ok_runner();
    runner.respond("bundle install", CommandOutput::failed(5));
    let fs = seeded_filesystem();
    let prompter = ScriptedPrompter::with_answers([false, false]);
    let tools = toolbox(&runner, &fs, prompter);

    let err = standard_pipeline().execute(&mut context(), &tools).unwrap_err();

    assert_eq!(err.step, "bundle-install");
    assert!(!runner.ran("bundle binstubs"));
}
