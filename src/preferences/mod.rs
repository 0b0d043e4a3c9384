//! User preference types and validation.
//!
//! Preferences shape the generated story (tone, format, focus areas) and are
//! persisted per user id by [`store::PreferenceStore`]. Validation is
//! field-level: an invalid field falls back to its default and is logged,
//! never surfaced as an error.

pub mod store;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use store::PreferenceStore;

/// Default focus areas for new users
pub const DEFAULT_FOCUS_AREAS: [&str; 3] = ["key_trends", "outliers", "actionable_insights"];

/// Story tone preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    Technical,
    Persuasive,
    #[default]
    Balanced,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
            Tone::Persuasive => "persuasive",
            Tone::Balanced => "balanced",
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "formal" => Ok(Tone::Formal),
            "casual" => Ok(Tone::Casual),
            "technical" => Ok(Tone::Technical),
            "persuasive" => Ok(Tone::Persuasive),
            "balanced" => Ok(Tone::Balanced),
            other => Err(format!("unknown tone: {}", other)),
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Story format preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryFormat {
    #[default]
    Standard,
    Executive,
    Detailed,
    Bullet,
}

impl StoryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryFormat::Standard => "standard",
            StoryFormat::Executive => "executive",
            StoryFormat::Detailed => "detailed",
            StoryFormat::Bullet => "bullet",
        }
    }
}

impl FromStr for StoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(StoryFormat::Standard),
            "executive" => Ok(StoryFormat::Executive),
            "detailed" => Ok(StoryFormat::Detailed),
            "bullet" => Ok(StoryFormat::Bullet),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

impl std::fmt::Display for StoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-user story preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPreferences {
    pub tone: Tone,
    pub format: StoryFormat,
    pub focus_areas: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Default for StoryPreferences {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            tone: Tone::default(),
            format: StoryFormat::default(),
            focus_areas: DEFAULT_FOCUS_AREAS.iter().map(|s| s.to_string()).collect(),
            created_at: now,
            last_updated: now,
        }
    }
}

impl StoryPreferences {
    /// Validate a raw JSON preference record field by field.
    ///
    /// Unknown or malformed fields fall back to their defaults; valid fields
    /// are preserved. Timestamps carry over when present.
    pub fn from_value(value: &Value) -> Self {
        let mut prefs = StoryPreferences::default();

        if let Some(s) = value.get("tone").and_then(|v| v.as_str()) {
            match Tone::from_str(s) {
                Ok(tone) => prefs.tone = tone,
                Err(e) => log::warn!("Invalid tone preference ({}), using default", e),
            }
        }

        if let Some(s) = value.get("format").and_then(|v| v.as_str()) {
            match StoryFormat::from_str(s) {
                Ok(format) => prefs.format = format,
                Err(e) => log::warn!("Invalid format preference ({}), using default", e),
            }
        }

        if let Some(areas) = value.get("focus_areas").and_then(|v| v.as_array()) {
            let parsed: Vec<String> = areas
                .iter()
                .filter_map(|a| a.as_str())
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            if !parsed.is_empty() {
                prefs.focus_areas = parsed;
            }
        }

        if let Some(ts) = value
            .get("created_at")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        {
            prefs.created_at = ts;
        }
        if let Some(ts) = value
            .get("last_updated")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        {
            prefs.last_updated = ts;
        }

        prefs
    }

    /// Apply a partial update from collected feedback.
    ///
    /// Invalid fields are dropped with a warning; valid ones overwrite.
    pub fn apply_update(&mut self, update: &PreferenceUpdate) {
        if let Some(tone) = &update.tone_preference {
            match Tone::from_str(tone) {
                Ok(t) => self.tone = t,
                Err(e) => log::warn!("Dropping feedback field: {}", e),
            }
        }

        if let Some(format) = &update.format_preference {
            match StoryFormat::from_str(format) {
                Ok(f) => self.format = f,
                Err(e) => log::warn!("Dropping feedback field: {}", e),
            }
        }

        if let Some(areas) = &update.focus_areas {
            if areas.iter().any(|a| !a.trim().is_empty()) {
                self.focus_areas = areas
                    .iter()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect();
            } else {
                log::warn!("Dropping empty focus_areas feedback field");
            }
        }
    }
}

/// Partial preference update extracted from a feedback record.
///
/// Fields are raw strings: validation happens at apply time so one bad field
/// never discards the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_preference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_preference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<String>>,
}

impl PreferenceUpdate {
    /// Whether the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.tone_preference.is_none() && self.format_preference.is_none() && self.focus_areas.is_none()
    }
}
