//! Async driver for one client connection
//!
//! [`run`] owns the [`Session`] and processes, one at a time, inbound frames,
//! countdown ticks and local intents. Framing and reconnection belong to the
//! transport, which talks to the driver through channels of text frames.

use std::time::Duration;

use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle, time};

use crate::{
    action::{Action, ActionEmitter, Intent},
    config::ClientConfig,
    countdown::{TickHandle, Ticker},
    protocol,
    session::{Session, Signal, Snapshot},
};

/// Receives the state to display
///
/// Implementations render the session, play the buzz sound and surface the
/// closed notice. They must not block.
pub trait Presenter {
    /// Displays a new snapshot of the session
    ///
    /// Called after every applied event and every tick that changed the
    /// remaining time.
    fn render(&mut self, snapshot: &Snapshot);

    /// Handles a one-off notification
    fn signal(&mut self, signal: Signal);
}

/// Errors that end a client run
#[derive(Error, Debug)]
pub enum Error {
    /// The transport stopped accepting outbound frames
    #[error("outbound channel closed")]
    OutboundClosed,
    /// The inbound stream ended before the session was closed
    #[error("inbound stream ended before the session closed")]
    Disconnected,
}

/// Ticker delivering ticks through a channel from a tokio task
///
/// Only one task runs at a time; scheduling a new handle aborts the previous
/// task. Ticks already queued for an aborted handle are rejected by the
/// countdown.
#[derive(Debug)]
pub struct TokioTicker {
    ticks: mpsc::UnboundedSender<TickHandle>,
    running: Option<(TickHandle, JoinHandle<()>)>,
}

impl TokioTicker {
    /// Creates a ticker and the receiving end of its ticks
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (ticks, receiver) = mpsc::unbounded_channel();
        (
            Self {
                ticks,
                running: None,
            },
            receiver,
        )
    }

    fn abort_running(&mut self) {
        if let Some((_, task)) = self.running.take() {
            task.abort();
        }
    }
}

impl Ticker for TokioTicker {
    fn schedule(&mut self, handle: TickHandle, period: Duration) {
        self.abort_running();

        let ticks = self.ticks.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if ticks.send(handle).is_err() {
                    break;
                }
            }
        });
        self.running = Some((handle, task));
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.running.as_ref().is_some_and(|(running, _)| *running == handle) {
            self.abort_running();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.abort_running();
    }
}

fn send(outbound: &mpsc::UnboundedSender<String>, action: &Action) -> Result<(), Error> {
    tracing::debug!(?action, "sending action");
    outbound
        .send(action.to_message())
        .map_err(|_| Error::OutboundClosed)
}

/// Runs one client connection until the session closes
///
/// Sends [`Action::Connect`] first, then applies inbound frames in arrival
/// order. Frames that cannot be decoded are logged and dropped. Intents are
/// translated and sent without touching the local state; the resulting event
/// from the server is the only feedback.
///
/// # Arguments
///
/// * `config` - Client settings
/// * `inbound` - Text frames received from the server
/// * `outbound` - Text frames to send to the server
/// * `intents` - Local user intents; closing this channel only stops intents
/// * `presenter` - Receives snapshots and signals
///
/// # Errors
///
/// Returns [`Error::Disconnected`] if `inbound` ends before the session is
/// closed, and [`Error::OutboundClosed`] if `outbound` is dropped.
pub async fn run<P: Presenter>(
    config: ClientConfig,
    mut inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
    mut intents: mpsc::UnboundedReceiver<Intent>,
    mut presenter: P,
) -> Result<(), Error> {
    let (ticker, mut ticks) = TokioTicker::channel();
    let mut session = Session::new(&config, ticker);
    let mut intents_open = true;

    send(&outbound, &ActionEmitter::connect())?;
    tracing::info!("connecting to session");

    loop {
        tokio::select! {
            biased;

            frame = inbound.recv() => {
                let Some(frame) = frame else {
                    tracing::warn!("inbound stream ended");
                    return Err(Error::Disconnected);
                };
                let event = match protocol::decode(&frame) {
                    Ok(event) => event,
                    Err(error) => {
                        tracing::warn!(%error, frame = %frame, "dropping inbound frame");
                        continue;
                    }
                };

                let signal = session.apply(event);
                presenter.render(&session.snapshot());
                if let Some(signal) = signal {
                    presenter.signal(signal);
                }
                if session.is_closed() {
                    return Ok(());
                }
            }
            Some(handle) = ticks.recv() => {
                if session.tick(handle) {
                    presenter.render(&session.snapshot());
                }
            }
            intent = intents.recv(), if intents_open => match intent {
                Some(intent) => send(&outbound, &session.emitter().emit(intent))?,
                None => intents_open = false,
            },
        }
    }
}
