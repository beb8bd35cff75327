//! Interactive terminal prompter using dialoguer.

use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

use railforge_core::application::ApplicationError;
use railforge_core::application::ports::Prompter;
use railforge_core::error::RailforgeResult;

/// Production prompter asking yes/no questions on the controlling terminal.
///
/// Questions default to "no": the operator must opt in to every optional
/// feature, matching the conservative behaviour of the framework's own
/// interactive prompts.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create a new terminal prompter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> RailforgeResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| {
                ApplicationError::PromptFailed {
                    reason: e.to_string(),
                }
                .into()
            })
    }
}
