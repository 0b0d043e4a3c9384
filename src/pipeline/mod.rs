//! The story pipeline: Generator -> Refinement Loop -> Finalizer.
//!
//! Data flows strictly forward. The generator's output seeds the refinement
//! loop; the loop's surviving artifact feeds the finalizer. Only the loop has
//! iteration state; the other stages are single-call and stateless.

pub mod critic;
pub mod finalizer;
pub mod generator;
pub mod refinement;
pub mod refiner;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::preferences::StoryPreferences;
use crate::story::Story;
use crate::summary::DataSummary;

pub use critic::{COMPLETION_SENTINEL, Critic, Critique, is_completion_signal};
pub use finalizer::Finalizer;
pub use generator::Generator;
pub use refinement::{LoopOutcome, RefinementConfig, RefinementLoop, TerminationReason};
pub use refiner::{RefineResult, Refiner};

/// Immutable inputs for a whole pipeline run.
///
/// Owned by the caller; every stage reads it, none mutates it.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub data_summary: DataSummary,
    pub audience: String,
    pub preferences: StoryPreferences,
}

impl RunContext {
    pub fn new(data_summary: DataSummary, audience: impl Into<String>, preferences: StoryPreferences) -> Self {
        Self {
            data_summary,
            audience: audience.into(),
            preferences,
        }
    }

    /// Template variables shared by every stage prompt
    pub fn prompt_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("data_summary".to_string(), self.data_summary.to_prompt_text());
        vars.insert("audience".to_string(), self.audience.clone());
        vars.insert(
            "preferences".to_string(),
            serde_json::to_string(&self.preferences).unwrap_or_default(),
        );
        vars
    }
}

/// Outcome of a full pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryReport {
    /// The finalized story
    pub story: Story,

    /// How the refinement loop ended
    pub termination: TerminationReason,

    /// Completed critic/refiner pairs
    pub iterations: u32,
}

/// The full generate/refine/finalize pipeline
pub struct Pipeline {
    generator: Generator,
    refinement: RefinementLoop,
    finalizer: Finalizer,
}

impl Pipeline {
    /// Build a pipeline around an injected LLM client
    pub fn new(client: Arc<dyn LlmClient>, config: RefinementConfig) -> Self {
        Self {
            generator: Generator::new(client.clone()),
            refinement: RefinementLoop::new(client.clone(), config),
            finalizer: Finalizer::new(client),
        }
    }

    /// Run the pipeline end to end.
    ///
    /// Any stage failure aborts the run; no partial story survives.
    pub async fn run(&self, context: &RunContext) -> Result<StoryReport> {
        log::info!("Generating initial story for audience: {}", context.audience);
        let draft = self.generator.generate(context).await?;

        let outcome = self.refinement.run(draft, context).await?;
        log::info!(
            "Refinement ended after {} iteration(s): {}",
            outcome.iterations,
            outcome.reason
        );

        let story = self.finalizer.finalize(&outcome.story).await?;

        Ok(StoryReport {
            story,
            termination: outcome.reason,
            iterations: outcome.iterations,
        })
    }

    /// The refiner, for section-level rework outside the loop
    pub fn refiner(&self) -> &Refiner {
        self.refinement.refiner()
    }
}
