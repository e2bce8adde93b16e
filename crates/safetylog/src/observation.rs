//! Core record types for safetylog.
//!
//! An [`Observation`] is one safety note: a title, an optional description,
//! a binary [`Rating`], an optional embedded photo and a creation timestamp.
//! The JSON shape uses camelCase field names so exported files stay
//! compatible with files written by earlier versions of the log.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Longest title accepted, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Longest description accepted, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Prefix every embedded photo payload must carry.
pub const IMAGE_DATA_URL_PREFIX: &str = "data:image/";

/// Binary classification of an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Safe behaviour or condition.
    #[default]
    Positive,
    /// Unsafe behaviour or condition.
    Negative,
}

impl Rating {
    /// Interpret free-form input. Only the exact string `negative` is negative.
    #[must_use]
    pub fn from_input(value: Option<&str>) -> Self {
        match value {
            Some("negative") => Self::Negative,
            _ => Self::Positive,
        }
    }

    /// Capitalized label used in listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// A single safety observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Opaque unique identifier, stable for the record's lifetime.
    pub id: String,

    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,

    /// Short summary, never empty for records created through the form.
    pub title: String,

    /// Optional longer text; empty when not given.
    #[serde(default)]
    pub description: String,

    /// Positive or negative.
    #[serde(default)]
    pub rating: Rating,

    /// Embedded image payload (`data:image/...`), if a photo was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_url: Option<String>,
}

impl Observation {
    /// Create a record with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(title: String, description: String, rating: Rating) -> Self {
        Self {
            id: new_id(),
            created_at: now_millis(),
            title,
            description,
            rating,
            photo_data_url: None,
        }
    }

    /// Attach an embedded photo payload.
    #[must_use]
    pub fn with_photo(mut self, photo_data_url: Option<String>) -> Self {
        self.photo_data_url = photo_data_url;
        self
    }

    /// Whether a photo is attached.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        self.photo_data_url.is_some()
    }

    /// Creation time formatted for display.
    #[must_use]
    pub fn created_display(&self) -> String {
        format_timestamp(self.created_at)
    }
}

/// Generate a new opaque record id.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a millisecond timestamp in local time, falling back to the raw
/// number when it is out of range.
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}

/// Whether a string is recognizably an embedded image payload.
#[must_use]
pub fn is_image_data_url(value: &str) -> bool {
    value.starts_with(IMAGE_DATA_URL_PREFIX)
}
