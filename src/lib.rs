//! Storyloom - a data storytelling pipeline with self-critique
//!
//! Storyloom turns a data source into a narrative "data story", then
//! iteratively critiques and refines that story until the critic signals
//! completion or an iteration budget runs out.

pub mod config;
pub mod error;
pub mod feedback;
pub mod llm;
pub mod pipeline;
pub mod preferences;
pub mod prompts;
pub mod story;
pub mod summary;

pub use error::{Result, StoryloomError};
