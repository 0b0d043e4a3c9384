//! Structured data summaries fed to the story pipeline.
//!
//! A [`DataSummary`] is what the generator and critic actually see: the
//! classified source type, a short description, extracted metadata, and any
//! automated insights. Production of summaries lives in [`inspect`].

pub mod inspect;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use inspect::DataInspector;

/// Classified kind of a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Image,
    Pdf,
    Csv,
    Visualization,
    Description,
    Unknown,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Image => "image",
            DataType::Pdf => "pdf",
            DataType::Csv => "csv",
            DataType::Visualization => "visualization",
            DataType::Description => "description",
            DataType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured summary of a data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSummary {
    pub data_type: DataType,

    pub description: String,

    /// Original file name, when the source was a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Type-specific metadata (dimensions, page counts, column statistics)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,

    /// Automated insights extracted from the source
    #[serde(default)]
    pub insights: Vec<String>,
}

impl DataSummary {
    /// Create a summary with no metadata or insights
    pub fn new(data_type: DataType, description: impl Into<String>) -> Self {
        Self {
            data_type,
            description: description.into(),
            file_name: None,
            metadata: HashMap::new(),
            insights: Vec::new(),
        }
    }

    /// Summary for a free-text description of data
    pub fn description(text: impl Into<String>) -> Self {
        Self::new(DataType::Description, text)
    }

    /// Attach the source file name
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Attach an insight
    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insights.push(insight.into());
        self
    }

    /// Record a processing error on the summary without failing the run
    pub fn with_error(self, error: impl Into<String>) -> Self {
        self.with_metadata("error", Value::String(error.into()))
    }

    /// Serialized form used as the prompt variable for every stage
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.description.clone())
    }
}
