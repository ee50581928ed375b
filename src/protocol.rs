//! Inbound wire protocol
//!
//! The server sends JSON text frames tagged with a `type` field. This module
//! models them as the closed [`Event`] sum type and decodes frames, telling
//! apart frames without a tag, frames with a tag this client does not know
//! and frames whose body does not match their tag.

use std::{fmt::Display, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::roster::Id;

/// Status of the session as declared by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SessionStatus {
    /// The round is stopped, either by a buzz or by the moderator
    Paused = 0,
    /// The round is running and participants may buzz
    Running = 1,
    /// No round has started since the last reset
    #[default]
    Waiting = 2,
}

impl SessionStatus {
    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Running => "running",
            Self::Waiting => "waiting",
        }
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for SessionStatus {
    type Error = u8;

    /// Converts the wire representation, returning the raw value if unknown
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Paused),
            1 => Ok(Self::Running),
            2 => Ok(Self::Waiting),
            other => Err(other),
        }
    }
}

impl Serialize for SessionStatus {
    /// Serializes the status as its numeric wire value
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    /// Deserializes the status from its numeric wire value
    fn deserialize<D>(deserializer: D) -> Result<SessionStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        SessionStatus::try_from(raw)
            .map_err(|raw| serde::de::Error::custom(format!("unknown session status {raw}")))
    }
}

/// Events sent by the server, in the order they must be applied
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// First message after connecting, describing the client and the session
    #[serde(rename = "ConnectionSuccess")]
    Handshake {
        /// Identifier assigned to this client
        id: Id,
        /// Whether this client moderates the session
        #[serde(rename = "is_admin")]
        is_moderator: bool,
        /// Session name
        name: String,
        /// Full round duration
        #[serde(rename = "timer")]
        #[serde_as(as = "serde_with::DurationSeconds<u64>")]
        duration: Duration,
        /// Round time already consumed
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        elapsed: Duration,
        /// Current status of the session
        status: SessionStatus,
    },
    /// A participant joined
    Connected {
        /// The participant's identifier
        id: Id,
        /// The participant's display name
        name: String,
    },
    /// A participant changed their display name
    ChangedName {
        /// The participant's identifier
        id: Id,
        /// The new display name
        name: String,
    },
    /// The round (re)started with the given remaining time
    Resumed {
        /// Authoritative remaining round time
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        left: Duration,
    },
    /// Timers and lock-outs were reset
    Reset,
    /// Every lock-out was cleared
    BlacklistCleared,
    /// A participant buzzed and stopped the round
    Buzzed {
        /// The buzzing participant's identifier
        id: Id,
    },
    /// The moderator paused the round
    Paused,
    /// A participant left
    Disconnected {
        /// The participant's identifier
        id: Id,
    },
    /// The moderator changed the session settings
    Changed {
        /// New session name
        name: String,
        /// New round duration
        #[serde(rename = "timer")]
        #[serde_as(as = "serde_with::DurationSeconds<u64>")]
        duration: Duration,
    },
    /// The session was closed and no further events will follow
    Closed,
}

impl Event {
    /// Wire tags of every known event
    pub const TAGS: [&'static str; 11] = [
        "ConnectionSuccess",
        "Connected",
        "ChangedName",
        "Resumed",
        "Reset",
        "BlacklistCleared",
        "Buzzed",
        "Paused",
        "Disconnected",
        "Changed",
        "Closed",
    ];

    /// Wire tag of this event
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Handshake { .. } => "ConnectionSuccess",
            Self::Connected { .. } => "Connected",
            Self::ChangedName { .. } => "ChangedName",
            Self::Resumed { .. } => "Resumed",
            Self::Reset => "Reset",
            Self::BlacklistCleared => "BlacklistCleared",
            Self::Buzzed { .. } => "Buzzed",
            Self::Paused => "Paused",
            Self::Disconnected { .. } => "Disconnected",
            Self::Changed { .. } => "Changed",
            Self::Closed => "Closed",
        }
    }
}

/// Errors that can occur when decoding an inbound frame
#[derive(Error, Debug)]
pub enum Error {
    /// The frame is an object without a `type` field
    #[error("frame has no type tag")]
    MissingTag,
    /// The frame carries a tag this client does not know
    #[error("unknown event type `{0}`")]
    UnknownTag(String),
    /// The frame is not valid JSON, or its body does not match its tag
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Decodes one inbound text frame
///
/// # Errors
///
/// Returns [`Error::MissingTag`] or [`Error::UnknownTag`] when the frame cannot
/// be dispatched, and [`Error::Malformed`] when it is not JSON or its fields do
/// not match its tag.
pub fn decode(frame: &str) -> Result<Event, Error> {
    let error = match serde_json::from_str::<Event>(frame) {
        Ok(event) => return Ok(event),
        Err(error) => error,
    };

    let envelope: Envelope = serde_json::from_str(frame)?;
    match envelope.kind {
        None => Err(Error::MissingTag),
        Some(tag) if Event::TAGS.contains(&tag.as_str()) => Err(Error::Malformed(error)),
        Some(tag) => Err(Error::UnknownTag(tag)),
    }
}
