//! Initial story generation.

use std::sync::Arc;

use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{GENERATOR_SYSTEM, GENERATOR_TEMPLATE, PromptRenderer};
use crate::story::Story;

use super::RunContext;

/// Produces the first story draft from the run context.
///
/// Stateless with respect to prior runs: one call, one output. An empty
/// audience or data summary yields a generic story, not an error.
pub struct Generator {
    client: Arc<dyn LlmClient>,
    renderer: PromptRenderer,
}

impl Generator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            renderer: PromptRenderer::new(),
        }
    }

    /// Generate the initial story draft
    pub async fn generate(&self, context: &RunContext) -> Result<Story> {
        let prompt = self.renderer.render(GENERATOR_TEMPLATE, &context.prompt_vars())?;

        let request = CompletionRequest::new(GENERATOR_SYSTEM).with_user_message(prompt);
        let response = self.client.complete(request).await?;

        Ok(Story::new(response.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, LlmError};
    use crate::preferences::StoryPreferences;
    use crate::summary::DataSummary;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CapturingClient {
        response: String,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl CapturingClient {
        fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmClient for CapturingClient {
        async fn complete(&self, request: CompletionRequest) -> std::result::Result<CompletionResponse, LlmError> {
            *self.last_request.lock().unwrap() = Some(request);
            Ok(CompletionResponse {
                content: self.response.clone(),
                ..Default::default()
            })
        }
    }

    fn context_for(audience: &str) -> RunContext {
        RunContext::new(
            DataSummary::description("support ticket volumes"),
            audience,
            StoryPreferences::default(),
        )
    }

    #[tokio::test]
    async fn test_generate_returns_story() {
        let client = Arc::new(CapturingClient::new("# Ticket Trends\n\nVolume fell 8%."));
        let generator = Generator::new(client.clone());

        let story = generator.generate(&context_for("support leads")).await.unwrap();
        assert_eq!(story.text(), "# Ticket Trends\n\nVolume fell 8%.");
    }

    #[tokio::test]
    async fn test_prompt_includes_context() {
        let client = Arc::new(CapturingClient::new("story"));
        let generator = Generator::new(client.clone());

        generator.generate(&context_for("support leads")).await.unwrap();

        let request = client.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.system, GENERATOR_SYSTEM);
        let prompt = &request.messages[0].content;
        assert!(prompt.contains("Target Audience: support leads"));
        assert!(prompt.contains("support ticket volumes"));
        assert!(prompt.contains("3-4 key insights"));
    }

    #[tokio::test]
    async fn test_empty_audience_is_not_an_error() {
        let client = Arc::new(CapturingClient::new("a generic story"));
        let generator = Generator::new(client);

        let story = generator.generate(&context_for("")).await.unwrap();
        assert_eq!(story.text(), "a generic story");
    }
}
