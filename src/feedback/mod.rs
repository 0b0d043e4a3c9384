//! Post-run feedback records and their on-disk history.
//!
//! Feedback is an append-only sequence per user, stored as a JSON array in
//! `<dir>/<user_id>_feedback.json` and rewritten whole on each append (last
//! writer wins for a given user id).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryloomError};
use crate::preferences::PreferenceUpdate;

/// A single round of user feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// When the feedback was collected
    pub timestamp: DateTime<Utc>,

    /// Partial preference changes for future stories
    #[serde(default)]
    pub preferences: PreferenceUpdate,

    /// Per-section replacement instructions, keyed by section name
    #[serde(default)]
    pub story_feedback: HashMap<String, String>,

    /// Free-form comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_comments: Option<String>,
}

impl FeedbackRecord {
    /// Create an empty record stamped with the current time
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            preferences: PreferenceUpdate::default(),
            story_feedback: HashMap::new(),
            general_comments: None,
        }
    }

    /// Whether the record carries anything worth saving
    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty() && self.story_feedback.is_empty() && self.general_comments.is_none()
    }
}

impl Default for FeedbackRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyed store for feedback history
pub struct FeedbackStore {
    dir: PathBuf,
}

impl FeedbackStore {
    /// Create a store rooted at the given directory, creating it if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}_feedback.json", user_id))
    }

    /// Load the full feedback history for a user.
    ///
    /// Missing file yields an empty history; a malformed file is logged and
    /// treated as empty rather than failing the run.
    pub fn history(&self, user_id: &str) -> Vec<FeedbackRecord> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Vec::new();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => records,
                Err(e) => {
                    log::error!("Malformed feedback history for user {}: {}", user_id, e);
                    Vec::new()
                }
            },
            Err(e) => {
                log::error!("Error reading feedback history for user {}: {}", user_id, e);
                Vec::new()
            }
        }
    }

    /// Append a record to the user's history
    pub fn append(&self, user_id: &str, record: &FeedbackRecord) -> Result<()> {
        let mut records = self.history(user_id);
        records.push(record.clone());

        let path = self.user_path(user_id);
        let content = serde_json::to_string_pretty(&records)?;
        fs::write(&path, content).map_err(|e| {
            StoryloomError::Storage(format!("failed to save feedback for {}: {}", user_id, e))
        })?;

        log::info!("Saved feedback for user {} ({} records)", user_id, records.len());
        Ok(())
    }
}
