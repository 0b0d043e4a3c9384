//! Story critique: the first step of each refinement iteration.
//!
//! The critic reviews the current story along six fixed dimensions and
//! returns either 1-3 actionable suggestions or the exact completion phrase.
//! Termination hinges on a byte-exact match against that phrase, so the
//! comparison lives in a single function here; nothing else in the crate may
//! compare against the sentinel directly.

use std::sync::Arc;

use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{CRITIC_SYSTEM, CRITIC_TEMPLATE, PromptRenderer};
use crate::story::Story;

use super::RunContext;

/// The exact phrase the critic uses to signal that no further changes
/// are needed.
pub const COMPLETION_SENTINEL: &str = "No significant improvements needed for this story.";

/// The one and only sentinel comparison.
///
/// Exact equality, no trimming, no substring match: a critique that merely
/// contains the phrase, or pads it with whitespace, is actionable feedback.
pub fn is_completion_signal(critique: &str) -> bool {
    critique == COMPLETION_SENTINEL
}

/// Result of a critic invocation: either the completion phrase or
/// improvement suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Critique {
    text: String,
}

impl Critique {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw critique text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this critique is the completion signal
    pub fn signals_completion(&self) -> bool {
        is_completion_signal(&self.text)
    }
}

/// Reviews the current story against the run context
pub struct Critic {
    client: Arc<dyn LlmClient>,
    renderer: PromptRenderer,
}

impl Critic {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            renderer: PromptRenderer::new(),
        }
    }

    /// Critique the story: suggestions, or the exact completion phrase
    pub async fn critique(&self, story: &Story, context: &RunContext) -> Result<Critique> {
        let mut vars = context.prompt_vars();
        vars.insert("story".to_string(), story.text().to_string());
        vars.insert("completion_phrase".to_string(), COMPLETION_SENTINEL.to_string());

        let prompt = self.renderer.render(CRITIC_TEMPLATE, &vars)?;
        let request = CompletionRequest::new(CRITIC_SYSTEM).with_user_message(prompt);
        let response = self.client.complete(request).await?;

        Ok(Critique::new(response.content))
    }
}
