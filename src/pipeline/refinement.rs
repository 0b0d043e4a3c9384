//! The bounded critique/refine loop.
//!
//! Each tick runs the critic, then the refiner. The loop ends when the
//! refiner reports termination (the critic emitted the completion signal) or
//! when the iteration cap vetoes an otherwise-continuing loop. A step failure
//! aborts the run: no retry, and the in-loop artifact is discarded with the
//! error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::story::Story;

use super::RunContext;
use super::critic::Critic;
use super::refiner::{RefineResult, Refiner};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Configuration for the refinement loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementConfig {
    /// Maximum critic/refiner pairs before the loop is cut off (>= 1)
    pub max_iterations: u32,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The critic emitted the completion signal
    Sentinel,

    /// The iteration cap cut off a still-continuing loop
    MaxIterations,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Sentinel => write!(f, "completion signal"),
            TerminationReason::MaxIterations => write!(f, "iteration cap reached"),
        }
    }
}

/// What survives the loop: the final artifact and how it ended
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub story: Story,
    pub reason: TerminationReason,

    /// Completed critic/refiner pairs that committed a revision
    pub iterations: u32,
}

/// The critic/refiner alternation with cap-based and sentinel-based
/// termination
pub struct RefinementLoop {
    critic: Critic,
    refiner: Refiner,
    config: RefinementConfig,
}

impl RefinementLoop {
    pub fn new(client: Arc<dyn LlmClient>, config: RefinementConfig) -> Self {
        Self {
            critic: Critic::new(client.clone()),
            refiner: Refiner::new(client),
            config,
        }
    }

    /// The refiner, for section-level rework outside the loop
    pub fn refiner(&self) -> &Refiner {
        &self.refiner
    }

    /// Run the loop to termination.
    ///
    /// Exactly one story is current at any point; it is replaced only when
    /// the refiner commits a revision. The cap check happens after a commit,
    /// so the cap never suppresses a termination signal.
    pub async fn run(&self, initial: Story, context: &RunContext) -> Result<LoopOutcome> {
        let mut story = initial;
        let mut iterations = 0u32;

        loop {
            log::debug!("Refinement tick (completed iterations: {})", iterations);

            let critique = self.critic.critique(&story, context).await?;

            match self.refiner.refine(&story, &critique, context).await? {
                RefineResult::Terminate => {
                    return Ok(LoopOutcome {
                        story,
                        reason: TerminationReason::Sentinel,
                        iterations,
                    });
                }
                RefineResult::Continue(revised) => {
                    story = revised;
                    iterations += 1;

                    if iterations >= self.config.max_iterations {
                        log::info!("Iteration cap ({}) reached", self.config.max_iterations);
                        return Ok(LoopOutcome {
                            story,
                            reason: TerminationReason::MaxIterations,
                            iterations,
                        });
                    }
                }
            }
        }
    }
}
