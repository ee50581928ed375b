//! Outbound actions and the intents that produce them
//!
//! Local user intent is translated into the tagged JSON actions the server
//! understands. Moderator-only intents are not offered to participants, but
//! this is only an affordance for the presentation layer: the server decides
//! what to accept, and the emitter never refuses to translate an intent.

use std::time::Duration;

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::shortcuts, protocol::SessionStatus};

/// Actions sent to the server
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Joins the session, sent once as soon as the stream opens
    Connect,
    /// Changes this client's display name
    ChangeName {
        /// The requested name
        name: String,
    },
    /// Resets timers and lock-outs
    ResetSession,
    /// Pauses the running round
    PauseSession,
    /// Starts or resumes the round
    ResumeSession,
    /// Clears every lock-out
    ResetBlacklist,
    /// Presses the buzzer
    Buzz,
    /// Changes the session name and round duration
    ChangeSession {
        /// The requested session name
        name: String,
        /// The requested round duration
        #[serde(rename = "timer")]
        #[serde_as(as = "serde_with::DurationSeconds<u64>")]
        duration: Duration,
    },
    /// Closes the session for everyone
    CloseSession,
}

impl Action {
    /// Converts the action to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Something the local user asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Change the local display name
    ChangeName(String),
    /// Press the buzzer
    Buzz,
    /// Reset the session
    ResetSession,
    /// Pause the running round
    PauseSession,
    /// Start or resume the round
    ResumeSession,
    /// Clear every lock-out
    ResetBlacklist,
    /// Change the session settings
    ChangeSession {
        /// New session name
        name: String,
        /// New round duration
        duration: Duration,
    },
    /// Close the session
    CloseSession,
}

/// The kind of an intent without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum IntentKind {
    /// See [`Intent::ChangeName`]
    ChangeName,
    /// See [`Intent::Buzz`]
    Buzz,
    /// See [`Intent::ResetSession`]
    ResetSession,
    /// See [`Intent::PauseSession`]
    PauseSession,
    /// See [`Intent::ResumeSession`]
    ResumeSession,
    /// See [`Intent::ResetBlacklist`]
    ResetBlacklist,
    /// See [`Intent::ChangeSession`]
    ChangeSession,
    /// See [`Intent::CloseSession`]
    CloseSession,
}

impl IntentKind {
    /// Whether only moderators are offered this intent
    pub fn moderator_only(self) -> bool {
        !matches!(self, Self::ChangeName | Self::Buzz)
    }
}

impl Intent {
    /// Returns the kind of this intent without the associated data
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::ChangeName(_) => IntentKind::ChangeName,
            Self::Buzz => IntentKind::Buzz,
            Self::ResetSession => IntentKind::ResetSession,
            Self::PauseSession => IntentKind::PauseSession,
            Self::ResumeSession => IntentKind::ResumeSession,
            Self::ResetBlacklist => IntentKind::ResetBlacklist,
            Self::ChangeSession { .. } => IntentKind::ChangeSession,
            Self::CloseSession => IntentKind::CloseSession,
        }
    }
}

/// Translates intents into actions for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionEmitter {
    is_moderator: bool,
}

impl ActionEmitter {
    /// Creates an emitter for a moderator or a participant
    pub fn new(is_moderator: bool) -> Self {
        Self { is_moderator }
    }

    /// Whether this emitter serves a moderator
    pub fn is_moderator(&self) -> bool {
        self.is_moderator
    }

    /// The action to send when the stream opens
    pub fn connect() -> Action {
        Action::Connect
    }

    /// Which intents should be offered to the user
    pub fn capabilities(&self) -> EnumMap<IntentKind, bool> {
        EnumMap::from_fn(|kind: IntentKind| self.is_moderator || !kind.moderator_only())
    }

    /// Whether the intent kind should be offered to the user
    pub fn offers(&self, kind: IntentKind) -> bool {
        self.capabilities()[kind]
    }

    /// Intent kinds offered to the user
    pub fn offered(&self) -> Vec<IntentKind> {
        self.capabilities()
            .into_iter()
            .filter_map(|(kind, offered)| offered.then_some(kind))
            .collect_vec()
    }

    /// Translates an intent into the action to send
    ///
    /// Intents that are not offered are still translated; the server is the
    /// one enforcing who may do what.
    pub fn emit(&self, intent: Intent) -> Action {
        if !self.offers(intent.kind()) {
            tracing::debug!(kind = ?intent.kind(), "emitting an intent that is not offered");
        }

        match intent {
            Intent::ChangeName(name) => Action::ChangeName { name },
            Intent::Buzz => Action::Buzz,
            Intent::ResetSession => Action::ResetSession,
            Intent::PauseSession => Action::PauseSession,
            Intent::ResumeSession => Action::ResumeSession,
            Intent::ResetBlacklist => Action::ResetBlacklist,
            Intent::ChangeSession { name, duration } => Action::ChangeSession { name, duration },
            Intent::CloseSession => Action::CloseSession,
        }
    }

    /// Maps a key press to an intent
    ///
    /// Only moderators have shortcuts. The toggle key pauses a running round
    /// and resumes it otherwise.
    pub fn shortcut(&self, key: char, status: SessionStatus) -> Option<Intent> {
        if !self.is_moderator {
            return None;
        }

        match key {
            shortcuts::RESET_SESSION => Some(Intent::ResetSession),
            shortcuts::RESET_BLACKLIST => Some(Intent::ResetBlacklist),
            shortcuts::TOGGLE_ROUND => Some(match status {
                SessionStatus::Running => Intent::PauseSession,
                SessionStatus::Waiting | SessionStatus::Paused => Intent::ResumeSession,
            }),
            _ => None,
        }
    }
}
