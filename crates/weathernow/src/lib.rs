//! `weathernow` - current weather for the device location
//!
//! One refresh locates the device, names the place through a reverse
//! geocoding service, and fetches current conditions from a forecast
//! service. The place name is best effort; every other failure ends the
//! refresh with a single message and leaves the previous reading in place.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod codes;
pub mod config;
pub mod error;
pub mod forecast;
pub mod location;
pub mod logging;
pub mod view;

#[cfg(test)]
mod canned;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use forecast::{ConditionsSource, CurrentConditions, ForecastClient};
pub use location::{
    ConfiguredLocator, Coordinates, LocationResolver, Locator, PlaceLookup, PositionOptions,
    ReverseGeocoder,
};
pub use logging::init_logging;
pub use view::{Reading, WeatherView};
