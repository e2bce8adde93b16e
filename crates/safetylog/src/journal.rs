//! The observation journal: application state plus every user action.
//!
//! A [`Journal`] owns the in-memory collection, the pending photo and the
//! store. Each mutating action changes the collection and immediately
//! persists it. A failed save never rolls the collection back; it is
//! reported through [`Persistence::Lagging`] so the caller can warn that the
//! stored copy is behind.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::form::ObservationDraft;
use crate::listing::{Filter, ListView};
use crate::media::{PhotoPayload, PhotoPipeline};
use crate::observation::Observation;
use crate::storage::ObservationStore;
use crate::transfer;

/// Outcome of persisting after a mutation.
#[derive(Debug)]
#[must_use]
pub enum Persistence {
    /// The store matches the in-memory collection.
    Saved,
    /// The save failed; the store may lag behind the collection.
    Lagging(Error),
}

impl Persistence {
    /// Whether the save succeeded.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// The notice to show the user, if any.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Saved => None,
            Self::Lagging(e) => Some(e.notice()),
        }
    }
}

/// Application state for the observation log.
#[derive(Debug)]
pub struct Journal {
    store: ObservationStore,
    observations: Vec<Observation>,
    pending_photo: Option<PhotoPayload>,
}

impl Journal {
    /// Load the collection from `store`.
    #[must_use]
    pub fn open(store: ObservationStore) -> Self {
        let observations = store.load();
        debug!("Loaded {} observations", observations.len());
        Self {
            store,
            observations,
            pending_photo: None,
        }
    }

    /// The collection in insertion order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The photo waiting to be attached to the next submission.
    #[must_use]
    pub fn pending_photo(&self) -> Option<&PhotoPayload> {
        self.pending_photo.as_ref()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Observation> {
        self.observations.iter().find(|o| o.id == id)
    }

    /// Visible state for the given filter.
    #[must_use]
    pub fn view(&self, filter: Filter) -> ListView<'_> {
        ListView::compute(&self.observations, filter)
    }

    /// Select a photo for the next submission.
    ///
    /// `None` clears the pending photo. Any processing failure also leaves
    /// no photo pending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Media`] if the file cannot be processed.
    pub fn select_photo(&mut self, pipeline: &PhotoPipeline, file: Option<&Path>) -> Result<()> {
        self.pending_photo = None;
        let Some(file) = file else {
            return Ok(());
        };

        match pipeline.process(file) {
            Ok(payload) => {
                debug!(
                    "Pending photo {}x{} from {}",
                    payload.width,
                    payload.height,
                    file.display()
                );
                self.pending_photo = Some(payload);
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Drop the pending photo.
    pub fn clear_photo(&mut self) {
        self.pending_photo = None;
    }

    /// Create a record from `draft`, append it and persist.
    ///
    /// The pending photo is attached and then cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is rejected; the
    /// collection and the pending photo are unchanged in that case.
    pub fn submit(&mut self, draft: &ObservationDraft) -> Result<(Observation, Persistence)> {
        let valid = draft.validate()?;

        let observation = Observation::new(valid.title, valid.description, valid.rating)
            .with_photo(self.pending_photo.take().map(|p| p.data_url));

        info!("Recorded observation {}", observation.id);
        self.observations.push(observation.clone());
        Ok((observation, self.persist()))
    }

    /// Remove the record with `id` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has that id.
    pub fn delete(&mut self, id: &str) -> Result<Persistence> {
        let before = self.observations.len();
        self.observations.retain(|o| o.id != id);
        if self.observations.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }

        info!("Deleted observation {}", id);
        Ok(self.persist())
    }

    /// Remove every record and persist. Returns how many were removed.
    pub fn clear(&mut self) -> (usize, Persistence) {
        let removed = self.observations.len();
        self.observations.clear();
        info!("Cleared {} observations", removed);
        (removed, self.persist())
    }

    /// Serialize the whole collection for export.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        transfer::export_json(&self.observations)
    }

    /// Replace the whole collection with the records in `text`.
    ///
    /// Returns the number of imported records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Import`] if `text` is not a JSON array; the
    /// collection is unchanged in that case.
    pub fn import_json(&mut self, text: &str) -> Result<(usize, Persistence)> {
        let imported = transfer::parse_import(text)?;
        let replaced = std::mem::replace(&mut self.observations, imported);
        info!(
            "Imported {} observations, replacing {}",
            self.observations.len(),
            replaced.len()
        );
        Ok((self.observations.len(), self.persist()))
    }

    fn persist(&self) -> Persistence {
        match self.store.save(&self.observations) {
            Ok(()) => Persistence::Saved,
            Err(e) => Persistence::Lagging(e),
        }
    }
}
