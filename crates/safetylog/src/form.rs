//! Form input for new observations.

use crate::error::{Error, Result};
use crate::observation::Rating;

/// Raw form input as entered by the user.
///
/// Free-form rating text goes through [`Rating::from_input`], so anything
/// but `negative` lands as positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationDraft {
    /// Title text, untrimmed.
    pub title: String,
    /// Description text, untrimmed.
    pub description: Option<String>,
    /// Selected rating.
    pub rating: Rating,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed description, possibly empty.
    pub description: String,
    /// Selected rating.
    pub rating: Rating,
}

impl ObservationDraft {
    /// Create a draft with just a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    /// Trim and check the draft.
    ///
    /// Only the title is required. Long titles and descriptions are kept
    /// whole; the length caps apply to imported files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the trimmed title is empty.
    pub fn validate(&self) -> Result<ValidDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::validation("Title is required."));
        }

        let description = self.description.as_deref().unwrap_or_default().trim();

        Ok(ValidDraft {
            title: title.to_string(),
            description: description.to_string(),
            rating: self.rating,
        })
    }
}
