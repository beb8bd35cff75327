//! Scripted prompter for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use railforge_core::application::ApplicationError;
use railforge_core::application::ports::Prompter;
use railforge_core::error::RailforgeResult;

/// Prompter answering from a fixed queue, for testing.
///
/// Running out of answers is an error, so a test that scripts too few
/// replies fails loudly instead of hanging on a phantom default. Cloning
/// shares the queue and the question log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    inner: Arc<Mutex<ScriptedPrompterInner>>,
}

#[derive(Debug, Default)]
struct ScriptedPrompterInner {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Create a prompter that will answer with `answers`, in order.
    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedPrompterInner {
                answers: answers.into_iter().collect(),
                asked: Vec::new(),
            })),
        }
    }

    /// Every question asked so far, in order.
    pub fn questions(&self) -> Vec<String> {
        self.inner.lock().unwrap().asked.clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> RailforgeResult<bool> {
        let mut inner = self.inner.lock().map_err(|_| ApplicationError::PromptFailed {
            reason: "prompter lock poisoned".into(),
        })?;
        inner.asked.push(question.to_string());
        inner.answers.pop_front().ok_or_else(|| {
            ApplicationError::PromptFailed {
                reason: format!("no scripted answer left for: {question}"),
            }
            .into()
        })
    }
}
