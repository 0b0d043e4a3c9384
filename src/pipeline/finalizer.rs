//! Final formatting pass.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{FINALIZER_SYSTEM, FINALIZER_TEMPLATE, PromptRenderer};
use crate::story::Story;

/// Normalizes section headers on the story that exits the loop.
///
/// Formatting only: a single call, no narrative changes, same failure policy
/// as the generator.
pub struct Finalizer {
    client: Arc<dyn LlmClient>,
    renderer: PromptRenderer,
}

impl Finalizer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            renderer: PromptRenderer::new(),
        }
    }

    /// Format the story for presentation
    pub async fn finalize(&self, story: &Story) -> Result<Story> {
        let mut vars = HashMap::new();
        vars.insert("story".to_string(), story.text().to_string());

        let prompt = self.renderer.render(FINALIZER_TEMPLATE, &vars)?;
        let request = CompletionRequest::new(FINALIZER_SYSTEM).with_user_message(prompt);
        let response = self.client.complete(request).await?;

        Ok(Story::new(response.content))
    }
}
