//! Story refinement: the second step of each refinement iteration.
//!
//! The refiner either applies a critique's suggestions to produce a revised
//! story, or signals loop termination when the critique is the completion
//! phrase. It also exposes section-scoped regeneration for callers outside
//! the loop (the CLI feedback flow).

use std::sync::Arc;

use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{
    PromptRenderer, REFINE_FEEDBACK_TEMPLATE, REFINER_SYSTEM, REFINER_TEMPLATE, UPDATE_SECTION_TEMPLATE,
};
use crate::story::{SectionKind, Story};

use super::RunContext;
use super::critic::Critique;

/// Outcome of a refiner invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineResult {
    /// A revised story; the loop should keep going
    Continue(Story),

    /// The critique was the completion signal; the loop should stop
    /// with the artifact unchanged
    Terminate,
}

impl RefineResult {
    /// Whether this result ends the loop
    pub fn is_terminate(&self) -> bool {
        matches!(self, RefineResult::Terminate)
    }
}

/// Applies critique suggestions to the current story
pub struct Refiner {
    client: Arc<dyn LlmClient>,
    renderer: PromptRenderer,
}

impl Refiner {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            renderer: PromptRenderer::new(),
        }
    }

    /// Refine the story against a critique, or terminate on the
    /// completion signal.
    ///
    /// On the completion signal no call is made and the artifact is left
    /// untouched.
    pub async fn refine(&self, story: &Story, critique: &Critique, _context: &RunContext) -> Result<RefineResult> {
        if critique.signals_completion() {
            return Ok(RefineResult::Terminate);
        }

        let mut vars = std::collections::HashMap::new();
        vars.insert("story".to_string(), story.text().to_string());
        vars.insert("critique".to_string(), critique.text().to_string());

        let prompt = self.renderer.render(REFINER_TEMPLATE, &vars)?;
        let request = CompletionRequest::new(REFINER_SYSTEM).with_user_message(prompt);
        let response = self.client.complete(request).await?;

        Ok(RefineResult::Continue(Story::new(response.content)))
    }

    /// Regenerate a single named section from a raw instruction.
    ///
    /// Two-step flow: first refine the raw instruction for consistency with
    /// the story, then rewrite only that section, keeping the rest unchanged.
    pub async fn regenerate_section(
        &self,
        story: &Story,
        section: SectionKind,
        instruction: &str,
    ) -> Result<Story> {
        let mut vars = std::collections::HashMap::new();
        vars.insert("story".to_string(), story.text().to_string());
        vars.insert("section".to_string(), section.as_str().to_string());
        vars.insert("feedback".to_string(), instruction.to_string());

        let refine_prompt = self.renderer.render(REFINE_FEEDBACK_TEMPLATE, &vars)?;
        let refined = self
            .client
            .complete(CompletionRequest::new(REFINER_SYSTEM).with_user_message(refine_prompt))
            .await?;

        vars.insert("content".to_string(), refined.content);
        let update_prompt = self.renderer.render(UPDATE_SECTION_TEMPLATE, &vars)?;
        let updated = self
            .client
            .complete(CompletionRequest::new(REFINER_SYSTEM).with_user_message(update_prompt))
            .await?;

        Ok(Story::new(updated.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, LlmError};
    use crate::pipeline::critic::COMPLETION_SENTINEL;
    use crate::preferences::StoryPreferences;
    use crate::summary::DataSummary;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CountingClient {
        responses: Mutex<Vec<String>>,
        calls: Mutex<u32>,
    }

    impl CountingClient {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().map(String::from).collect()),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmClient for CountingClient {
        async fn complete(&self, _request: CompletionRequest) -> std::result::Result<CompletionResponse, LlmError> {
            *self.calls.lock().unwrap() += 1;
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))?;
            Ok(CompletionResponse {
                content,
                ..Default::default()
            })
        }
    }

    fn test_context() -> RunContext {
        RunContext::new(
            DataSummary::description("weekly churn"),
            "product managers",
            StoryPreferences::default(),
        )
    }

    #[tokio::test]
    async fn test_sentinel_terminates_without_llm_call() {
        let client = Arc::new(CountingClient::new(vec![]));
        let refiner = Refiner::new(client.clone());

        let story = Story::new("# Unchanged");
        let result = refiner
            .refine(&story, &Critique::new(COMPLETION_SENTINEL), &test_context())
            .await
            .unwrap();

        assert!(result.is_terminate());
        assert_eq!(client.call_count(), 0);
        // Artifact untouched
        assert_eq!(story.text(), "# Unchanged");
    }

    #[tokio::test]
    async fn test_padded_sentinel_is_refined_not_terminated() {
        let client = Arc::new(CountingClient::new(vec!["# Revised"]));
        let refiner = Refiner::new(client.clone());

        let padded = format!("{}\n", COMPLETION_SENTINEL);
        let result = refiner
            .refine(&Story::new("# Draft"), &Critique::new(padded), &test_context())
            .await
            .unwrap();

        match result {
            RefineResult::Continue(story) => assert_eq!(story.text(), "# Revised"),
            RefineResult::Terminate => panic!("padded sentinel must not terminate"),
        }
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_actionable_critique_produces_revision() {
        let client = Arc::new(CountingClient::new(vec!["# Better story"]));
        let refiner = Refiner::new(client.clone());

        let result = refiner
            .refine(
                &Story::new("# Draft"),
                &Critique::new("1. Lead with the headline number."),
                &test_context(),
            )
            .await
            .unwrap();

        assert_eq!(result, RefineResult::Continue(Story::new("# Better story")));
    }

    #[tokio::test]
    async fn test_regenerate_section_two_step() {
        let client = Arc::new(CountingClient::new(vec![
            "refined instruction",
            "# Story with new conclusion",
        ]));
        let refiner = Refiner::new(client.clone());

        let updated = refiner
            .regenerate_section(
                &Story::new("# Story"),
                SectionKind::Conclusion,
                "end with a call to action",
            )
            .await
            .unwrap();

        assert_eq!(updated.text(), "# Story with new conclusion");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_refine_propagates_client_error() {
        let client = Arc::new(CountingClient::new(vec![]));
        let refiner = Refiner::new(client);

        let result = refiner
            .refine(
                &Story::new("# Draft"),
                &Critique::new("make it shorter"),
                &test_context(),
            )
            .await;

        assert!(result.is_err());
    }
}
