//! Story artifact types.
//!
//! A [`Story`] is the evolving narrative text produced by the pipeline.
//! Exactly one story value is current per run; the refinement loop replaces
//! it wholesale on each successful revision.

use serde::{Deserialize, Serialize};

/// The narrative artifact flowing through the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story(String);

impl Story {
    /// Create a story from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The story text
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Consume the story, returning the text
    pub fn into_text(self) -> String {
        self.0
    }

    /// Whether the story has any content
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Story {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Story {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// The four required sections of a structured data story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Title,
    Introduction,
    Insights,
    Conclusion,
}

impl SectionKind {
    /// All sections in document order
    pub fn all() -> [SectionKind; 4] {
        [
            SectionKind::Title,
            SectionKind::Introduction,
            SectionKind::Insights,
            SectionKind::Conclusion,
        ]
    }

    /// Section name as used in prompts and feedback records
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Title => "title",
            SectionKind::Introduction => "introduction",
            SectionKind::Insights => "insights",
            SectionKind::Conclusion => "conclusion",
        }
    }

    /// Parse a section name; accepts the names used in feedback records
    pub fn parse(name: &str) -> Option<SectionKind> {
        match name.trim().to_lowercase().as_str() {
            "title" => Some(SectionKind::Title),
            "introduction" => Some(SectionKind::Introduction),
            "insights" | "key_insights" => Some(SectionKind::Insights),
            "conclusion" => Some(SectionKind::Conclusion),
            _ => None,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
