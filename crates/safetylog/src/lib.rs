//! `safetylog` - a local log of safety observations
//!
//! Observations are short safety notes with a positive or negative rating and
//! an optional photo. The whole collection is kept in one key-value slot on
//! the device, can be filtered and listed, exported to and imported from
//! JSON, and shown as a printable detail page.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod detail;
pub mod error;
pub mod form;
pub mod journal;
pub mod listing;
pub mod logging;
pub mod media;
pub mod observation;
pub mod storage;
pub mod transfer;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use form::ObservationDraft;
pub use journal::{Journal, Persistence};
pub use listing::{Filter, ListView, Stats};
pub use logging::init_logging;
pub use media::{PhotoPayload, PhotoPipeline};
pub use observation::{Observation, Rating};
pub use storage::ObservationStore;
