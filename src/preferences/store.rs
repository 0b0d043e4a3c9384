//! On-disk preference store, one JSON file per user id.
//!
//! Reads fall back to defaults when the file is missing or malformed; writes
//! are whole-file replacements (last writer wins for a given user id).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use super::{PreferenceUpdate, StoryPreferences};
use crate::error::{Result, StoryloomError};

/// Keyed store for user preferences
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    /// Create a store rooted at the given directory, creating it if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the preference file for a user
    fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", user_id))
    }

    /// Load preferences for a user, falling back to defaults.
    ///
    /// A missing file yields defaults silently; an unreadable or malformed
    /// file yields defaults with a logged error.
    pub fn get_user_preferences(&self, user_id: &str) -> StoryPreferences {
        let path = self.user_path(user_id);

        if !path.exists() {
            log::info!("No preferences found for user {}, using defaults", user_id);
            return StoryPreferences::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(value) => {
                    log::info!("Loaded preferences for user {}", user_id);
                    StoryPreferences::from_value(&value)
                }
                Err(e) => {
                    log::error!("Malformed preferences for user {}: {}", user_id, e);
                    StoryPreferences::default()
                }
            },
            Err(e) => {
                log::error!("Error reading preferences for user {}: {}", user_id, e);
                StoryPreferences::default()
            }
        }
    }

    /// Save preferences for a user, stamping `last_updated`
    pub fn save_user_preferences(&self, user_id: &str, preferences: &StoryPreferences) -> Result<()> {
        let mut prefs = preferences.clone();
        prefs.last_updated = Utc::now();

        let path = self.user_path(user_id);
        let content = serde_json::to_string_pretty(&prefs)?;
        fs::write(&path, content).map_err(|e| {
            StoryloomError::Storage(format!("failed to save preferences for {}: {}", user_id, e))
        })?;

        log::info!("Saved preferences for user {}", user_id);
        Ok(())
    }

    /// Update stored preferences from a feedback record and persist them.
    ///
    /// Returns the merged preferences. Invalid feedback fields are dropped;
    /// a failed save is reported but the merged value is still returned.
    pub fn update_from_feedback(&self, user_id: &str, update: &PreferenceUpdate) -> Result<StoryPreferences> {
        let mut prefs = self.get_user_preferences(user_id);
        prefs.apply_update(update);
        self.save_user_preferences(user_id, &prefs)?;
        Ok(prefs)
    }
}
