//! # Buzzer Client Library
//!
//! This library provides the client side of a real-time quiz buzzer. A server
//! streams session events (joins, renames, buzzes, pauses, resets) to every
//! connected client; each client keeps a local view of the session, ticks a
//! countdown between server updates and sends actions back on behalf of its
//! user. Moderators and participants share one implementation, parameterized
//! by the role the server assigns in its handshake.
//!
//! The pieces fit together as follows:
//!
//! * [`protocol`] decodes inbound frames into [`Event`]s
//! * [`session`] applies events to a [`Session`] and produces [`Snapshot`]s
//! * [`countdown`] extrapolates the remaining round time between events
//! * [`action`] turns local [`Intent`]s into outbound [`Action`]s
//! * [`client`] drives all of the above over tokio channels

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]

pub mod action;
pub mod client;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod logger;
pub mod protocol;
pub mod roster;
pub mod session;

pub use action::{Action, ActionEmitter, Intent, IntentKind};
pub use client::{Presenter, TokioTicker};
pub use config::ClientConfig;
pub use countdown::{Countdown, ManualTicker, TickHandle, Ticker};
pub use protocol::{Event, SessionStatus};
pub use roster::{Id, Participant, Roster};
pub use session::{ConnectionContext, Session, Signal, Snapshot};
