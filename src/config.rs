//! Client configuration
//!
//! Settings for the local countdown and the buzz signal, loadable from JSON
//! and validated against the bounds in [`crate::constants`].

use std::{path::Path, time::Duration};

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::countdown::{MAX_TICK_MILLIS, MIN_TICK_MILLIS, TICK_MILLIS};

/// Validates that the tick period falls within the configured bounds
fn validate_tick_period(val: &Duration) -> garde::Result {
    if (MIN_TICK_MILLIS..=MAX_TICK_MILLIS).contains(&(val.as_millis() as u64)) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_TICK_MILLIS}ms,{MAX_TICK_MILLIS}ms]",
        )))
    }
}

/// Errors that can occur when loading a configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON or has unexpected fields
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration values are out of bounds
    #[error("invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}

/// Settings of one buzzer client
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Time between two local countdown ticks, also removed from the remaining time per tick
    #[garde(custom(|v, _| validate_tick_period(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub tick_period: Duration,
    /// Derive the remaining time from a monotonic clock instead of counting ticks
    #[garde(skip)]
    pub drift_correction: bool,
    /// Signal buzzes to the presentation layer of moderator clients
    #[garde(skip)]
    pub buzz_signal: bool,
}

impl Default for ClientConfig {
    /// 100ms ticks, no drift correction, buzz signal on
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(TICK_MILLIS),
            drift_correction: false,
            buzz_signal: true,
        }
    }
}

impl ClientConfig {
    /// Parses and validates a JSON configuration
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid JSON and [`Error::Invalid`] for
    /// values out of bounds.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the same
    /// errors as [`ClientConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
