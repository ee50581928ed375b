//! Client-side session state machine
//!
//! [`Session`] consumes the server's events one at a time, in arrival order,
//! and keeps the local view of the session consistent: status, roster flags,
//! current buzzer and the locally ticking countdown. The client never advances
//! the state on its own; every change comes from an event.
//!
//! The participant who buzzed is only locked out when the round resumes again.
//! Until then they stay visible as the buzzer, which lets the moderator decide
//! between resuming (lock-out applied) and resetting or clearing the blacklist
//! (no penalty).

use std::{fmt::Display, sync::Arc, time::Duration};

use derive_where::derive_where;
use itertools::Itertools;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
    action::ActionEmitter,
    config::ClientConfig,
    countdown::{Countdown, SystemClock, TickHandle, Ticker, format_remaining},
    protocol::{Event, SessionStatus},
    roster::{Id, Participant, Roster},
};

/// Identity of this client, fixed by the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionContext {
    /// Identifier the server assigned to this client
    pub self_id: Id,
    /// Whether this client moderates the session
    pub is_moderator: bool,
}

/// Notifications for the presentation layer beyond a re-render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Signal {
    /// Someone buzzed; only raised on moderator clients
    Buzz {
        /// The participant who buzzed
        id: Id,
    },
    /// The session was closed and will not receive further events
    Closed,
}

/// Immutable view of the session, rendered by the presentation layer
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Identifier of this client, once the handshake arrived
    pub self_id: Option<Id>,
    /// Whether this client moderates the session
    pub is_moderator: bool,
    /// Session name
    pub name: String,
    /// Session status
    pub status: SessionStatus,
    /// Full round duration
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub round_duration: Duration,
    /// Remaining round time in milliseconds, unknown before the handshake
    pub remaining_ms: Option<i64>,
    /// Remaining round time formatted for display
    pub countdown: Option<String>,
    /// Participant whose buzz stopped the round
    pub current_buzzer: Option<Id>,
    /// Participants in arrival order
    pub participants: Vec<Participant>,
    /// Whether the session was closed
    pub closed: bool,
}

impl Display for Snapshot {
    /// One line summary, e.g. `[paused] Quiz 12.3s | Alice (buzzed), Bob (you)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {}s",
            self.status,
            self.name,
            self.countdown.as_deref().unwrap_or("-")
        )?;

        if !self.participants.is_empty() {
            let participants = self
                .participants
                .iter()
                .map(|p| {
                    let mut label = p.name.clone();
                    if self.self_id == Some(p.id) {
                        label.push_str(" (you)");
                    }
                    if p.buzzed {
                        label.push_str(" (buzzed)");
                    }
                    if p.locked_out {
                        label.push_str(" (locked out)");
                    }
                    label
                })
                .join(", ");
            write!(f, " | {participants}")?;
        }

        if self.closed {
            write!(f, " (closed)")?;
        }
        Ok(())
    }
}

fn as_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Local view of one buzzer session
#[derive_where(Debug)]
pub struct Session<T> {
    /// Identity of this client, set by the handshake
    context: Option<ConnectionContext>,
    /// Session name
    name: String,
    /// Session status
    status: SessionStatus,
    /// Full round duration
    round_duration: Duration,
    /// Participant whose buzz stopped the round
    current_buzzer: Option<Id>,
    /// Connected participants
    roster: Roster,
    /// Local extrapolation of the remaining round time
    countdown: Countdown<T>,
    /// Whether buzzes are signalled on moderator clients
    buzz_signal: bool,
    /// Whether the session was closed
    closed: bool,
}

impl<T: Ticker> Session<T> {
    /// Creates a session waiting for its handshake
    ///
    /// # Arguments
    ///
    /// * `config` - Client settings for the countdown and the buzz signal
    /// * `ticker` - Source of countdown ticks
    pub fn new(config: &ClientConfig, ticker: T) -> Self {
        let countdown = Countdown::new(ticker, config.tick_period);
        let countdown = if config.drift_correction {
            countdown.with_clock(Arc::new(SystemClock))
        } else {
            countdown
        };

        Self {
            context: None,
            name: String::new(),
            status: SessionStatus::default(),
            round_duration: Duration::ZERO,
            current_buzzer: None,
            roster: Roster::default(),
            countdown,
            buzz_signal: config.buzz_signal,
            closed: false,
        }
    }

    /// Applies one event from the server
    ///
    /// Events are applied completely before returning. Events after
    /// [`Event::Closed`] are ignored.
    ///
    /// # Returns
    ///
    /// A signal for the presentation layer, if the event raises one
    pub fn apply(&mut self, event: Event) -> Option<Signal> {
        if self.closed {
            tracing::warn!(tag = event.tag(), "ignoring event received after close");
            return None;
        }

        tracing::debug!(?event, status = %self.status, "applying event");

        match event {
            Event::Handshake {
                id,
                is_moderator,
                name,
                duration,
                elapsed,
                status,
            } => {
                self.handshake(id, is_moderator, name, duration, elapsed, status);
                None
            }
            Event::Connected { id, name } => {
                if !self.roster.insert(id, name) {
                    tracing::debug!(%id, "participant connected twice, renamed in place");
                }
                None
            }
            Event::ChangedName { id, name } => {
                if !self.roster.rename(id, name) {
                    tracing::warn!(%id, "rename for unknown participant");
                }
                None
            }
            Event::Resumed { left } => {
                self.resume(left);
                None
            }
            Event::Reset => {
                self.clear_blacklist();
                self.countdown.stop();
                self.countdown.set_remaining(as_millis(self.round_duration));
                self.status = SessionStatus::Waiting;
                None
            }
            Event::BlacklistCleared => {
                self.clear_blacklist();
                None
            }
            Event::Buzzed { id } => self.buzz(id),
            Event::Paused => {
                self.countdown.stop();
                self.status = SessionStatus::Paused;
                None
            }
            Event::Disconnected { id } => {
                if self.roster.remove(id).is_none() {
                    tracing::debug!(%id, "disconnect for unknown participant");
                }
                if self.current_buzzer == Some(id) {
                    self.current_buzzer = None;
                }
                None
            }
            Event::Changed { name, duration } => {
                self.name = name;
                self.round_duration = duration;
                // the waiting display follows the new duration, a started round keeps its time
                if self.status == SessionStatus::Waiting && !self.countdown.is_running() {
                    self.countdown.set_remaining(as_millis(duration));
                }
                None
            }
            Event::Closed => {
                self.countdown.stop();
                self.closed = true;
                tracing::info!(name = %self.name, "session closed");
                Some(Signal::Closed)
            }
        }
    }

    fn handshake(
        &mut self,
        id: Id,
        is_moderator: bool,
        name: String,
        duration: Duration,
        elapsed: Duration,
        status: SessionStatus,
    ) {
        tracing::info!(%id, is_moderator, %name, %status, "joined session");

        self.context = Some(ConnectionContext {
            self_id: id,
            is_moderator,
        });
        self.name = name;
        self.round_duration = duration;
        self.status = status;
        self.roster.clear();
        self.current_buzzer = None;

        let remaining = as_millis(duration).saturating_sub(as_millis(elapsed));
        if status == SessionStatus::Running {
            self.countdown.start(remaining);
        } else {
            self.countdown.stop();
            self.countdown.set_remaining(remaining);
        }
    }

    fn resume(&mut self, left: Duration) {
        if let Some(buzzer) = self.current_buzzer.take() {
            if !self.roster.lock_out(buzzer) {
                tracing::debug!(%buzzer, "buzzer left before the round resumed");
            }
        }
        self.countdown.start(as_millis(left));
        self.status = SessionStatus::Running;
    }

    fn buzz(&mut self, id: Id) -> Option<Signal> {
        if self.status != SessionStatus::Running {
            tracing::debug!(%id, status = %self.status, "buzz outside of a running round");
        }

        self.countdown.stop();
        self.status = SessionStatus::Paused;
        if self.roster.mark_buzzed(id) {
            self.current_buzzer = Some(id);
        } else {
            tracing::warn!(%id, "buzz from unknown participant");
        }

        (self.buzz_signal && self.is_moderator()).then_some(Signal::Buzz { id })
    }

    fn clear_blacklist(&mut self) {
        self.roster.clear_flags();
        self.current_buzzer = None;
    }

    /// Applies one countdown tick
    ///
    /// # Returns
    ///
    /// `true` if the remaining time changed; ticks from cancelled schedules
    /// and ticks after close change nothing
    pub fn tick(&mut self, handle: TickHandle) -> bool {
        !self.closed && self.countdown.tick(handle)
    }

    /// Builds an immutable view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let remaining_ms = self.remaining_ms();
        Snapshot {
            self_id: self.context.map(|c| c.self_id),
            is_moderator: self.is_moderator(),
            name: self.name.clone(),
            status: self.status,
            round_duration: self.round_duration,
            remaining_ms,
            countdown: remaining_ms.map(format_remaining),
            current_buzzer: self.current_buzzer,
            participants: self.roster.iter().cloned().collect_vec(),
            closed: self.closed,
        }
    }

    /// Emitter matching this client's capabilities
    pub fn emitter(&self) -> ActionEmitter {
        ActionEmitter::new(self.is_moderator())
    }

    /// Identity of this client, once the handshake arrived
    pub fn context(&self) -> Option<ConnectionContext> {
        self.context
    }

    /// Whether this client moderates the session
    pub fn is_moderator(&self) -> bool {
        self.context.is_some_and(|c| c.is_moderator)
    }

    /// Session status
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Session name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full round duration
    pub fn round_duration(&self) -> Duration {
        self.round_duration
    }

    /// Remaining round time in milliseconds, unknown before the handshake
    pub fn remaining_ms(&self) -> Option<i64> {
        self.context.map(|_| self.countdown.remaining_ms())
    }

    /// Participant whose buzz stopped the round
    pub fn current_buzzer(&self) -> Option<Id> {
        self.current_buzzer
    }

    /// Connected participants
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The local countdown
    pub fn countdown(&self) -> &Countdown<T> {
        &self.countdown
    }

    /// Whether the session was closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::countdown::ManualTicker;

    const MODERATOR: Id = Id::new(1);
    const BOB: Id = Id::new(2);
    const CAROL: Id = Id::new(3);

    fn session() -> Session<ManualTicker> {
        Session::new(&ClientConfig::default(), ManualTicker::default())
    }

    fn handshake(is_moderator: bool, status: SessionStatus, elapsed_ms: u64) -> Event {
        Event::Handshake {
            id: MODERATOR,
            is_moderator,
            name: "Quiz".to_string(),
            duration: Duration::from_secs(30),
            elapsed: Duration::from_millis(elapsed_ms),
            status,
        }
    }

    fn connected(id: Id, name: &str) -> Event {
        Event::Connected {
            id,
            name: name.to_string(),
        }
    }

    fn resumed(left_ms: u64) -> Event {
        Event::Resumed {
            left: Duration::from_millis(left_ms),
        }
    }

    /// A moderator session with Bob and Carol connected, waiting
    fn populated() -> Session<ManualTicker> {
        let mut session = session();
        session.apply(handshake(true, SessionStatus::Waiting, 0));
        session.apply(connected(MODERATOR, "Mod"));
        session.apply(connected(BOB, "Bob"));
        session.apply(connected(CAROL, "Carol"));
        session
    }

    fn tick_times(session: &mut Session<ManualTicker>, times: usize) {
        let handle = session.countdown().active_handle().unwrap();
        for _ in 0..times {
            assert!(session.tick(handle));
        }
    }

    fn flags(session: &Session<ManualTicker>, id: Id) -> (bool, bool) {
        let participant = session.roster().get(id).unwrap();
        (participant.buzzed, participant.locked_out)
    }

    #[test]
    fn test_before_handshake() {
        let session = session();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.self_id, None);
        assert_eq!(snapshot.remaining_ms, None);
        assert_eq!(snapshot.countdown, None);
        assert_eq!(snapshot.status, SessionStatus::Waiting);
        assert!(!session.is_moderator());
    }

    #[test]
    fn test_handshake_sets_context_and_remaining() {
        let mut session = session();

        let signal = session.apply(handshake(false, SessionStatus::Paused, 12_500));

        assert_eq!(signal, None);
        assert_eq!(
            session.context(),
            Some(ConnectionContext {
                self_id: MODERATOR,
                is_moderator: false
            })
        );
        assert_eq!(session.status(), SessionStatus::Paused);
        assert_eq!(session.name(), "Quiz");
        assert_eq!(session.round_duration(), Duration::from_secs(30));
        assert_eq!(session.remaining_ms(), Some(17_500));
        assert!(!session.countdown().is_running());
        assert_eq!(session.snapshot().countdown.as_deref(), Some("17.5"));
    }

    #[test]
    fn test_handshake_while_running_starts_countdown() {
        let mut session = session();

        session.apply(handshake(false, SessionStatus::Running, 10_000));
        tick_times(&mut session, 3);

        assert_eq!(session.remaining_ms(), Some(19_700));
    }

    #[test]
    fn test_handshake_with_extreme_elapsed_keeps_ticking() {
        let mut session = session();

        session.apply(Event::Handshake {
            id: MODERATOR,
            is_moderator: false,
            name: "Quiz".to_string(),
            duration: Duration::ZERO,
            elapsed: Duration::from_millis(u64::MAX),
            status: SessionStatus::Running,
        });
        tick_times(&mut session, 2);

        assert_eq!(session.remaining_ms(), Some(i64::MIN));
        assert_eq!(session.snapshot().countdown.as_deref(), Some("0.0"));
    }

    #[test]
    fn test_handshake_rebuilds_roster() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });

        session.apply(handshake(true, SessionStatus::Paused, 4_000));

        assert!(session.roster().is_empty());
        assert_eq!(session.current_buzzer(), None);
    }

    #[test]
    fn test_lock_out_is_deferred_until_resume() {
        let mut session = populated();
        session.apply(resumed(30_000));

        session.apply(Event::Buzzed { id: BOB });
        assert_eq!(flags(&session, BOB), (true, false));
        assert_eq!(session.current_buzzer(), Some(BOB));

        session.apply(resumed(25_000));
        assert_eq!(flags(&session, BOB), (false, true));
        assert_eq!(session.current_buzzer(), None);
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(flags(&session, CAROL), (false, false));
    }

    #[test]
    fn test_lock_outs_accumulate_over_rounds() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });
        session.apply(resumed(20_000));
        session.apply(Event::Buzzed { id: CAROL });
        session.apply(resumed(10_000));

        assert_eq!(flags(&session, BOB), (false, true));
        assert_eq!(flags(&session, CAROL), (false, true));
    }

    #[test]
    fn test_explicit_pause_assigns_no_buzzer() {
        let mut session = populated();
        session.apply(resumed(30_000));
        tick_times(&mut session, 2);

        session.apply(Event::Paused);

        assert_eq!(session.status(), SessionStatus::Paused);
        assert_eq!(session.current_buzzer(), None);
        assert!(!session.countdown().is_running());
        assert_eq!(session.remaining_ms(), Some(29_800));

        session.apply(resumed(29_700));
        assert!(session.roster().iter().all(|p| !p.locked_out));
    }

    #[test]
    fn test_reset_clears_everyone() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });
        session.apply(resumed(20_000));
        session.apply(Event::Buzzed { id: CAROL });

        session.apply(Event::Reset);

        assert!(session.roster().iter().all(|p| !p.buzzed && !p.locked_out));
        assert_eq!(session.current_buzzer(), None);
        assert_eq!(session.status(), SessionStatus::Waiting);
        assert_eq!(session.remaining_ms(), Some(30_000));
        assert!(!session.countdown().is_running());
    }

    #[test]
    fn test_reset_while_running_stops_countdown() {
        let mut session = populated();
        session.apply(resumed(30_000));
        let handle = session.countdown().active_handle().unwrap();

        session.apply(Event::Reset);

        assert!(!session.tick(handle));
        assert_eq!(session.remaining_ms(), Some(30_000));
        assert_eq!(session.countdown().ticker().active(), None);
    }

    #[test]
    fn test_blacklist_clear_is_timer_neutral() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });
        session.apply(resumed(20_000));
        tick_times(&mut session, 5);
        let handle = session.countdown().active_handle();

        session.apply(Event::BlacklistCleared);

        assert_eq!(flags(&session, BOB), (false, false));
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.remaining_ms(), Some(19_500));
        assert_eq!(session.countdown().active_handle(), handle);
    }

    #[test]
    fn test_blacklist_clear_forgets_current_buzzer() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });

        session.apply(Event::BlacklistCleared);
        session.apply(resumed(25_000));

        // no penalty once the moderator cleared the blacklist
        assert_eq!(flags(&session, BOB), (false, false));
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_single_active_countdown() {
        let mut session = populated();
        session.apply(resumed(30_000));
        let first = session.countdown().active_handle().unwrap();
        session.apply(resumed(10_000));
        let second = session.countdown().active_handle().unwrap();

        assert!(!session.tick(first));
        assert!(session.tick(second));

        assert_eq!(session.remaining_ms(), Some(9_900));
        assert_eq!(session.countdown().ticker().scheduled_count(), 2);
        assert_eq!(session.countdown().ticker().cancelled_count(), 1);
    }

    #[test]
    fn test_disconnect_unknown_is_noop() {
        let mut session = populated();
        let before = session.roster().clone();

        session.apply(Event::Disconnected { id: Id::new(99) });

        assert_eq!(session.roster(), &before);
    }

    #[test]
    fn test_disconnect_of_buzzer_clears_it() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });

        session.apply(Event::Disconnected { id: BOB });

        assert_eq!(session.current_buzzer(), None);
        assert!(!session.roster().contains(BOB));

        session.apply(resumed(25_000));
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_rename_unknown_is_noop() {
        let mut session = populated();
        let before = session.roster().clone();

        session.apply(Event::ChangedName {
            id: Id::new(42),
            name: "Ghost".to_string(),
        });

        assert_eq!(session.roster(), &before);
    }

    #[test]
    fn test_rename() {
        let mut session = populated();

        session.apply(Event::ChangedName {
            id: BOB,
            name: "Robert".to_string(),
        });

        assert_eq!(session.roster().get(BOB).unwrap().name, "Robert");
        assert_eq!(session.roster().ids(), vec![MODERATOR, BOB, CAROL]);
    }

    #[test]
    fn test_buzz_from_unknown_participant() {
        let mut session = populated();
        session.apply(resumed(30_000));

        session.apply(Event::Buzzed { id: Id::new(77) });

        assert_eq!(session.status(), SessionStatus::Paused);
        assert_eq!(session.current_buzzer(), None);
        assert!(!session.countdown().is_running());
    }

    #[test]
    fn test_buzz_signal_on_moderator() {
        let mut session = populated();
        session.apply(resumed(30_000));

        assert_eq!(
            session.apply(Event::Buzzed { id: BOB }),
            Some(Signal::Buzz { id: BOB })
        );
    }

    #[test]
    fn test_no_buzz_signal_on_participant() {
        let mut session = session();
        session.apply(handshake(false, SessionStatus::Waiting, 0));
        session.apply(connected(BOB, "Bob"));
        session.apply(resumed(30_000));

        assert_eq!(session.apply(Event::Buzzed { id: BOB }), None);
        assert_eq!(session.current_buzzer(), Some(BOB));
    }

    #[test]
    fn test_buzz_signal_can_be_disabled() {
        let config = ClientConfig {
            buzz_signal: false,
            ..ClientConfig::default()
        };
        let mut session = Session::new(&config, ManualTicker::default());
        session.apply(handshake(true, SessionStatus::Waiting, 0));
        session.apply(connected(BOB, "Bob"));
        session.apply(resumed(30_000));

        assert_eq!(session.apply(Event::Buzzed { id: BOB }), None);
    }

    #[test]
    fn test_changed_while_waiting_updates_display() {
        let mut session = populated();

        session.apply(Event::Changed {
            name: "Final".to_string(),
            duration: Duration::from_secs(45),
        });

        assert_eq!(session.name(), "Final");
        assert_eq!(session.round_duration(), Duration::from_secs(45));
        assert_eq!(session.remaining_ms(), Some(45_000));
    }

    #[test]
    fn test_changed_does_not_rescale_running_countdown() {
        let mut session = populated();
        session.apply(resumed(30_000));
        tick_times(&mut session, 1);

        session.apply(Event::Changed {
            name: "Final".to_string(),
            duration: Duration::from_secs(45),
        });

        assert_eq!(session.remaining_ms(), Some(29_900));

        session.apply(Event::Reset);
        assert_eq!(session.remaining_ms(), Some(45_000));
    }

    #[test]
    fn test_closed_is_terminal() {
        let mut session = populated();
        session.apply(resumed(30_000));
        let handle = session.countdown().active_handle().unwrap();

        assert_eq!(session.apply(Event::Closed), Some(Signal::Closed));
        assert!(session.is_closed());
        assert!(!session.countdown().is_running());
        assert!(!session.tick(handle));

        assert_eq!(session.apply(connected(Id::new(9), "Late")), None);
        assert!(!session.roster().contains(Id::new(9)));
        assert!(session.snapshot().closed);
    }

    #[test]
    fn test_emitter_follows_handshake() {
        let mut session = session();
        assert!(!session.emitter().is_moderator());

        session.apply(handshake(true, SessionStatus::Waiting, 0));

        assert!(session.emitter().is_moderator());
    }

    #[test]
    fn test_end_to_end_round() {
        let mut session = session();

        session.apply(handshake(true, SessionStatus::Waiting, 0));
        assert_eq!(session.snapshot().countdown.as_deref(), Some("30.0"));

        session.apply(connected(BOB, "Bob"));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.participants.len(), 1);
        assert_eq!(snapshot.participants[0].id, BOB);
        assert_eq!(snapshot.participants[0].name, "Bob");

        session.apply(resumed(30_000));
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.snapshot().countdown.as_deref(), Some("30.0"));
        tick_times(&mut session, 4);
        assert_eq!(session.snapshot().countdown.as_deref(), Some("29.6"));

        session.apply(Event::Buzzed { id: BOB });
        assert_eq!(session.status(), SessionStatus::Paused);
        assert_eq!(flags(&session, BOB), (true, false));
        assert!(!session.countdown().is_running());

        session.apply(resumed(30_000));
        assert_eq!(flags(&session, BOB), (false, true));
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.snapshot().countdown.as_deref(), Some("30.0"));
    }

    #[test]
    fn test_snapshot_display() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });

        assert_eq!(
            session.snapshot().to_string(),
            "[paused] Quiz 30.0s | Mod (you), Bob (buzzed), Carol"
        );

        session.apply(resumed(12_000));
        session.apply(Event::Closed);
        assert_eq!(
            session.snapshot().to_string(),
            "[running] Quiz 12.0s | Mod (you), Bob (locked out), Carol (closed)"
        );
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut session = populated();
        session.apply(resumed(30_000));
        session.apply(Event::Buzzed { id: BOB });

        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["status"], 0);
        assert_eq!(json["round_duration"], 30);
        assert_eq!(json["remaining_ms"], 30_000);
        assert_eq!(json["current_buzzer"], 2);
        assert_eq!(json["participants"][1]["buzzed"], true);
    }
}
