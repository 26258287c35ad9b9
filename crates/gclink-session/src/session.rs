//! The GC session state machine.
//!
//! `Session` is pure bookkeeping: it never sends anything or starts timers.
//! Each `on_*` method takes one input event, moves the state, and returns
//! what the driver should do next. That keeps the transitions testable
//! without a runtime, and keeps all side effects in one place (the client
//! driver).
//!
//! ```text
//!                 connect            login ok          hello sent
//!  Disconnected ──────────→ Connected ─────────→ LoggedOn ─────────→ AwaitingGcSession
//!       ↑                                                               │        ↑
//!       │                                                        welcome│        │status: no session
//!       │                                                               ▼        │
//!       └───────────────────────── any disconnect ──────────────────── Ready ────┘
//! ```

use gclink_protocol::{Engine, GameId, GcConnectionStatus, SteamId};
use gclink_transport::{LogonOutcome, LogonResult};

use crate::SessionError;

// ---------------------------------------------------------------------------
// States and actions
// ---------------------------------------------------------------------------

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionState {
    /// No transport connection.
    Disconnected,
    /// Transport is up; the login handshake is in flight.
    Connected,
    /// Logged in; the game is being announced.
    LoggedOn,
    /// Hello sent; waiting for the coordinator's welcome.
    AwaitingGcSession,
    /// The coordinator holds a session for us. Commands may be sent.
    Ready,
}

/// What to do after a login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogonAction {
    /// Announce the game and schedule the first hello.
    Launch,
    /// The failure is transient: reconnect after the backoff.
    Retry,
    /// The failure is terminal: surface it and stop.
    Fail(SessionError),
}

/// What to do after a connection-status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// We are not running; the notice is irrelevant.
    Ignored,
    /// The coordinator has a session for us. `newly` is `true` when this
    /// notice is what made the session ready.
    Ready { newly: bool },
    /// No session exists. `lost` is `true` when one existed until now (the
    /// coordinator restarted). Hellos must be (re)started.
    AwaitingSession { lost: bool },
}

/// What to do after the transport disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectAction {
    /// The disconnect was unexpected and a connection is still wanted.
    Reconnect,
    /// Stay disconnected.
    Stay,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One client's GC session.
#[derive(Debug, Clone)]
pub struct Session {
    state: ConnectionState,
    game: GameId,
    engine: Engine,
    /// The game is being "played": hellos and status notices matter.
    running: bool,
    /// A connection was requested and not withdrawn since.
    wants_connection: bool,
    steam_id: Option<SteamId>,
    hello_attempts: u32,
}

impl Session {
    pub fn new(game: GameId, engine: Engine) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            game,
            engine,
            running: false,
            wants_connection: false,
            steam_id: None,
            hello_attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Ready
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn wants_connection(&self) -> bool {
        self.wants_connection
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// The logged-in account, once known.
    pub fn steam_id(&self) -> Option<SteamId> {
        self.steam_id
    }

    /// Hellos sent since the last login.
    pub fn hello_attempts(&self) -> u32 {
        self.hello_attempts
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// The user asked for a connection.
    pub fn request_connection(&mut self) {
        self.wants_connection = true;
    }

    /// The user withdrew the connection request. Any disconnect that follows
    /// will not be retried.
    pub fn withdraw_connection(&mut self) {
        self.wants_connection = false;
    }

    /// The transport connected. Returns `true` if the login handshake should
    /// start.
    pub fn on_connected(&mut self) -> bool {
        self.state = ConnectionState::Connected;
        self.wants_connection
    }

    /// The login handshake finished.
    pub fn on_logged_on(&mut self, outcome: &LogonOutcome) -> LogonAction {
        if outcome.result == LogonResult::Ok {
            self.state = ConnectionState::LoggedOn;
            self.running = true;
            self.hello_attempts = 0;
            self.steam_id = outcome.steam_id.map(SteamId);
            tracing::info!(steam_id = ?self.steam_id, "logged on");
            return LogonAction::Launch;
        }

        if outcome.result.is_retryable() && self.wants_connection {
            tracing::warn!(result = %outcome.result, "login refused, will retry");
            return LogonAction::Retry;
        }

        tracing::warn!(result = %outcome.result, "login failed");
        self.wants_connection = false;
        LogonAction::Fail(SessionError::AuthenticationFailed {
            result: outcome.result,
            email_domain: outcome.email_domain.clone(),
        })
    }

    /// A hello went out.
    ///
    /// # Errors
    /// `InvalidTransition` before login, or when the session is already
    /// ready (nothing is sent in either case).
    pub fn on_hello_sent(&mut self) -> Result<u32, SessionError> {
        match self.state {
            ConnectionState::LoggedOn | ConnectionState::AwaitingGcSession if self.running => {
                self.state = ConnectionState::AwaitingGcSession;
                self.hello_attempts += 1;
                Ok(self.hello_attempts)
            }
            from => Err(SessionError::InvalidTransition {
                from,
                event: "hello",
            }),
        }
    }

    /// The coordinator welcomed us. Returns `true` if this made the session
    /// ready (as opposed to a repeated welcome while already ready).
    ///
    /// # Errors
    /// `InvalidTransition` if no login happened yet.
    pub fn on_welcome(&mut self) -> Result<bool, SessionError> {
        match self.state {
            ConnectionState::LoggedOn | ConnectionState::AwaitingGcSession => {
                self.state = ConnectionState::Ready;
                tracing::info!(attempts = self.hello_attempts, "GC session ready");
                Ok(true)
            }
            ConnectionState::Ready => Ok(false),
            from => Err(SessionError::InvalidTransition {
                from,
                event: "welcome",
            }),
        }
    }

    /// The coordinator reported on our session.
    pub fn on_connection_status(&mut self, status: GcConnectionStatus) -> StatusAction {
        if !self.running {
            return StatusAction::Ignored;
        }
        if self.state < ConnectionState::LoggedOn {
            return StatusAction::Ignored;
        }

        if status == GcConnectionStatus::HaveSession {
            let newly = self.state != ConnectionState::Ready;
            self.state = ConnectionState::Ready;
            return StatusAction::Ready { newly };
        }

        let lost = self.state == ConnectionState::Ready;
        if lost {
            tracing::warn!(?status, "GC session lost");
        }
        self.state = ConnectionState::AwaitingGcSession;
        StatusAction::AwaitingSession { lost }
    }

    /// The transport disconnected.
    pub fn on_disconnected(&mut self, user_initiated: bool) -> DisconnectAction {
        self.state = ConnectionState::Disconnected;
        self.running = false;
        if user_initiated {
            self.wants_connection = false;
        }
        if self.wants_connection {
            DisconnectAction::Reconnect
        } else {
            DisconnectAction::Stay
        }
    }

    /// Stops playing. The transport stays connected and logged in. Returns
    /// `true` if the game was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        if self.state > ConnectionState::LoggedOn {
            self.state = ConnectionState::LoggedOn;
        }
        was_running
    }
}
