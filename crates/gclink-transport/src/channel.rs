//! In-memory transport backed by Tokio channels.
//!
//! [`ChannelTransport::pair`] returns the client half and a [`RemoteEnd`]
//! that stands in for the base session and the game coordinator behind it.
//! Every call the client makes shows up on the remote end as a
//! [`TransportCall`]; the remote end answers by pushing [`TransportEvent`]s.
//! Nothing happens on its own: a `connect()` is only completed once the
//! remote end calls [`RemoteEnd::connected`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::{
    GamePlayed, GcTransport, InboundPacket, LogonDetails, LogonOutcome,
    OutboundPacket, TransportError, TransportEvent,
};

/// A call made by the client on a [`ChannelTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Connect,
    Disconnect,
    LogOn(LogonDetails),
    PlayGame(Option<GamePlayed>),
    InviteToGame { steam_id: u64, connect_string: String },
    Send(OutboundPacket),
}

/// Client half of an in-memory transport pair.
pub struct ChannelTransport {
    // The receiver needs `&mut` to poll, but `recv` takes `&self`.
    events_rx: Mutex<mpsc::UnboundedReceiver<TransportEvent>>,
    // Weak so that dropping the remote end closes the event stream.
    events_tx: mpsc::WeakUnboundedSender<TransportEvent>,
    calls_tx: mpsc::UnboundedSender<TransportCall>,
    connected: Arc<AtomicBool>,
}

/// Remote half of an in-memory transport pair.
pub struct RemoteEnd {
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    calls_rx: mpsc::UnboundedReceiver<TransportCall>,
    connected: Arc<AtomicBool>,
}

impl ChannelTransport {
    /// Creates a connected pair of client transport and remote end.
    pub fn pair() -> (ChannelTransport, RemoteEnd) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (calls_tx, calls_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));

        let transport = ChannelTransport {
            events_rx: Mutex::new(events_rx),
            events_tx: events_tx.downgrade(),
            calls_tx,
            connected: Arc::clone(&connected),
        };
        let remote = RemoteEnd {
            events_tx,
            calls_rx,
            connected,
        };
        (transport, remote)
    }

    /// Returns `true` between the remote end's `connected()` and the next
    /// disconnect from either side.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn call(&self, call: TransportCall) -> Result<(), TransportError> {
        self.calls_tx
            .send(call)
            .map_err(|_| TransportError::Shutdown)
    }

    fn require_connected(&self) -> Result<(), TransportError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }
}

impl GcTransport for ChannelTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        self.call(TransportCall::Connect)
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        let was_connected = self.connected.swap(false, Ordering::AcqRel);
        self.call(TransportCall::Disconnect)?;
        if was_connected {
            let tx = self.events_tx.upgrade().ok_or(TransportError::Shutdown)?;
            tx.send(TransportEvent::Disconnected {
                user_initiated: true,
            })
            .map_err(|_| TransportError::Shutdown)?;
        }
        Ok(())
    }

    async fn log_on(&self, details: LogonDetails) -> Result<(), TransportError> {
        self.require_connected()?;
        self.call(TransportCall::LogOn(details))
    }

    async fn play_game(
        &self,
        game: Option<GamePlayed>,
    ) -> Result<(), TransportError> {
        self.require_connected()?;
        self.call(TransportCall::PlayGame(game))
    }

    async fn invite_to_game(
        &self,
        steam_id: u64,
        connect_string: String,
    ) -> Result<(), TransportError> {
        self.require_connected()?;
        self.call(TransportCall::InviteToGame {
            steam_id,
            connect_string,
        })
    }

    async fn send(&self, packet: OutboundPacket) -> Result<(), TransportError> {
        self.require_connected()?;
        tracing::trace!(msg_type = packet.msg_type, "channel transport send");
        self.call(TransportCall::Send(packet))
    }

    async fn recv(&self) -> Result<Option<TransportEvent>, TransportError> {
        Ok(self.events_rx.lock().await.recv().await)
    }
}

impl RemoteEnd {
    /// Pushes an arbitrary event to the client.
    pub fn push(&self, event: TransportEvent) -> Result<(), TransportError> {
        self.events_tx
            .send(event)
            .map_err(|_| TransportError::ConnectionClosed("client dropped".into()))
    }

    /// Completes a connection attempt.
    pub fn connected(&self) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::Release);
        self.push(TransportEvent::Connected)
    }

    /// Reports the outcome of the login handshake.
    pub fn logged_on(&self, outcome: LogonOutcome) -> Result<(), TransportError> {
        self.push(TransportEvent::LoggedOn(outcome))
    }

    /// Delivers a GC message to the client.
    pub fn deliver(&self, packet: InboundPacket) -> Result<(), TransportError> {
        self.push(TransportEvent::Message(packet))
    }

    /// Drops the connection from the remote side, as a network failure would.
    pub fn drop_connection(&self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::Release);
        self.push(TransportEvent::Disconnected {
            user_initiated: false,
        })
    }

    /// Returns `true` if the client side considers itself connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Waits for the next call made by the client.
    ///
    /// Returns `None` once the client transport has been dropped.
    pub async fn next_call(&mut self) -> Option<TransportCall> {
        self.calls_rx.recv().await
    }

    /// Waits for the next GC message the client sends, skipping (and
    /// discarding) any other calls made in between.
    pub async fn next_packet(&mut self) -> Option<OutboundPacket> {
        loop {
            match self.calls_rx.recv().await? {
                TransportCall::Send(packet) => return Some(packet),
                _ => continue,
            }
        }
    }

    /// Returns the next call if one is already queued.
    pub fn try_next_call(&mut self) -> Option<TransportCall> {
        self.calls_rx.try_recv().ok()
    }

    /// Takes every call queued so far.
    pub fn drain_calls(&mut self) -> Vec<TransportCall> {
        let mut calls = Vec::new();
        while let Ok(call) = self.calls_rx.try_recv() {
            calls.push(call);
        }
        calls
    }
}
