//! `GcClient` builder and driver.
//!
//! This is the entry point for talking to a game coordinator. It ties the
//! layers together: transport → protocol → session → cache.
//!
//! One inbound task reads transport events in order and feeds them through
//! the session state machine and the dispatcher. Everything else (commands,
//! the hello timer, the reconnect timer) sends directly through the
//! transport. Session, cache and channel state sit behind short
//! `parking_lot` locks that are never held across an `.await`.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use gclink_cache::{ChatChannel, ChatChannels, SoCache};
use gclink_protocol::{ClientHello, Codec, GcMessage, GcPacket, JobId, JsonCodec, SteamId};
use gclink_session::{
    ConnectionState, CredentialProvider, DisconnectAction, JobCorrelator, LogonAction,
    RetryTimer, Session, SessionConfig, SessionError,
};
use gclink_transport::{GamePlayed, GcTransport, LogonOutcome, TransportEvent};
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{GcError, GcEvent, dispatch};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// What `connect` waits on: the current state, and the failure that ended
/// the current connection attempt, if any.
#[derive(Debug, Clone)]
struct Phase {
    state: ConnectionState,
    failure: Option<SessionError>,
}

struct Timers {
    hello: RetryTimer,
    reconnect: RetryTimer,
}

impl Timers {
    fn disarm_all(&mut self) {
        self.hello.disarm();
        self.reconnect.disarm();
    }
}

/// State shared by the client handle, the inbound task and the timers.
///
/// Timers only hold a `Weak` to it, so dropping the client (which aborts
/// the inbound task) frees it.
pub(crate) struct Shared<T, A, C> {
    pub(crate) transport: T,
    credentials: A,
    pub(crate) codec: C,
    pub(crate) config: SessionConfig,
    pub(crate) session: Mutex<Session>,
    pub(crate) cache: Mutex<SoCache>,
    pub(crate) channels: Mutex<ChatChannels>,
    pub(crate) jobs: JobCorrelator,
    timers: Mutex<Timers>,
    events: broadcast::Sender<GcEvent>,
    phase: watch::Sender<Phase>,
}

impl<T, A, C> Shared<T, A, C>
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    /// Publishes an event. Having no subscribers is fine.
    pub(crate) fn emit(&self, event: GcEvent) {
        let _ = self.events.send(event);
    }

    /// Pushes the session's state to anyone waiting in `connect`.
    pub(crate) fn publish_state(&self) {
        let state = self.session.lock().state();
        self.phase.send_if_modified(|phase| {
            let changed = phase.state != state;
            phase.state = state;
            changed
        });
    }

    fn fail_attempt(&self, error: SessionError) {
        self.phase.send_modify(|phase| {
            if phase.failure.is_none() {
                phase.failure = Some(error);
            }
        });
    }

    /// Encodes and sends one record to this client's game.
    pub(crate) async fn send_message<M>(&self, msg: &M, job: Option<JobId>) -> Result<(), GcError>
    where
        M: GcMessage + Sync,
    {
        let mut packet = GcPacket::encode(&self.codec, msg)?;
        if let Some(job) = job {
            packet = packet.with_job(job);
        }
        debug!(msg = gclink_protocol::msg::name(M::ID), ?job, "sending");
        self.transport
            .send(packet.into_outbound(self.config.game.app_id()))
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Starts sending hellos: the first after `first`, then once per
    /// `hello_interval` until the session is ready.
    pub(crate) fn arm_hello(self: &Arc<Self>, first: Duration) {
        let weak = Arc::downgrade(self);
        let period = self.config.hello_interval;
        self.timers.lock().hello.arm(first, period, move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(shared) => shared.send_hello().await,
                    None => ControlFlow::Break(()),
                }
            }
        });
    }

    pub(crate) fn disarm_hello(&self) {
        self.timers.lock().hello.disarm();
    }

    pub(crate) fn hello_armed(&self) -> bool {
        self.timers.lock().hello.is_armed()
    }

    async fn send_hello(&self) -> ControlFlow<()> {
        let attempt = self.session.lock().on_hello_sent();
        let attempt = match attempt {
            Ok(attempt) => attempt,
            Err(e) => {
                debug!(error = %e, "hello no longer needed");
                return ControlFlow::Break(());
            }
        };

        let hello = ClientHello {
            version: self.config.client_version,
            socache_have_versions: self.cache.lock().cache_versions(),
            ..ClientHello::for_engine(self.config.engine)
        };
        match self.send_message(&hello, None).await {
            Ok(()) => {
                debug!(attempt, "hello sent");
                self.emit(GcEvent::HelloSent { attempt });
            }
            Err(e) => warn!(attempt, error = %e, "hello failed to send"),
        }
        self.publish_state();
        ControlFlow::Continue(())
    }

    fn schedule_reconnect(self: &Arc<Self>) {
        let delay = self.config.reconnect_backoff();
        info!(?delay, "reconnect scheduled");
        let weak = Arc::downgrade(self);
        self.timers.lock().reconnect.arm_once(delay, move || async move {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if !shared.session.lock().wants_connection() {
                debug!("reconnect withdrawn");
                return;
            }
            if let Err(e) = shared.transport.connect().await {
                warn!(error = %e, "reconnect failed");
                if shared.session.lock().wants_connection() {
                    shared.schedule_reconnect();
                }
            }
        });
    }

    // -----------------------------------------------------------------------
    // Transport events
    // -----------------------------------------------------------------------

    async fn handle_transport_event(self: &Arc<Self>, event: TransportEvent) {
        match event {
            TransportEvent::Connected => self.on_connected().await,
            TransportEvent::LoggedOn(outcome) => self.on_logged_on(outcome).await,
            TransportEvent::Message(packet) => {
                if packet.app_id != self.config.game.app_id() {
                    debug!(app_id = packet.app_id, "ignoring message for another game");
                    return;
                }
                dispatch::dispatch(self, GcPacket::from(packet)).await;
            }
            TransportEvent::Disconnected { user_initiated } => self.on_disconnected(user_initiated),
        }
    }

    async fn on_connected(&self) {
        let log_on = self.session.lock().on_connected();
        self.publish_state();
        self.emit(GcEvent::Connected);
        if !log_on {
            debug!("connected with no pending request; not logging on");
            return;
        }

        match self.credentials.logon_details().await {
            Ok(details) => {
                info!(user = %details.username, "logging on");
                if let Err(e) = self.transport.log_on(details).await {
                    warn!(error = %e, "log on request failed");
                }
            }
            Err(e) => {
                warn!(error = %e, "no credentials, giving up");
                self.session.lock().withdraw_connection();
                self.fail_attempt(e);
                if let Err(e) = self.transport.disconnect().await {
                    debug!(error = %e, "disconnect after credential failure");
                }
            }
        }
    }

    async fn on_logged_on(self: &Arc<Self>, outcome: LogonOutcome) {
        let action = self.session.lock().on_logged_on(&outcome);
        self.publish_state();

        match action {
            LogonAction::Launch => {
                self.emit(GcEvent::LoggedOn {
                    steam_id: outcome.steam_id.map(SteamId),
                });
                let played = GamePlayed {
                    game_id: u64::from(self.config.game.app_id()),
                    game_extra_info: String::new(),
                    game_flags: self.config.engine.game_flags(),
                };
                if let Err(e) = self.transport.play_game(Some(played)).await {
                    warn!(error = %e, "could not announce game");
                    return;
                }
                info!(game = %self.config.game, engine = ?self.config.engine, "game launched");
                self.arm_hello(self.config.launch_delay);
            }
            LogonAction::Retry => {
                self.emit(GcEvent::LogonFailed {
                    result: outcome.result,
                    email_domain: outcome.email_domain,
                });
                self.schedule_reconnect();
            }
            LogonAction::Fail(error) => {
                self.emit(GcEvent::LogonFailed {
                    result: outcome.result,
                    email_domain: outcome.email_domain,
                });
                self.fail_attempt(error);
                if let Err(e) = self.transport.disconnect().await {
                    debug!(error = %e, "disconnect after failed login");
                }
            }
        }
    }

    fn on_disconnected(self: &Arc<Self>, user_initiated: bool) {
        let action = self.session.lock().on_disconnected(user_initiated);
        self.disarm_hello();
        self.cache.lock().forget_lobby();
        self.channels.lock().clear();
        let failed = self.jobs.fail_all(SessionError::Disconnected);
        info!(user_initiated, failed_requests = failed, "disconnected");

        self.publish_state();
        self.emit(GcEvent::Disconnected { user_initiated });

        match action {
            DisconnectAction::Reconnect => self.schedule_reconnect(),
            DisconnectAction::Stay => self.fail_attempt(SessionError::Disconnected),
        }
    }
}

async fn run_inbound<T, A, C>(shared: Arc<Shared<T, A, C>>)
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    loop {
        match shared.transport.recv().await {
            Ok(Some(event)) => shared.handle_transport_event(event).await,
            Ok(None) => {
                info!("transport closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "transport receive failed");
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a [`GcClient`].
///
/// # Example
///
/// ```rust,ignore
/// use gclink::prelude::*;
///
/// let client = GcClient::builder()
///     .config(SessionConfig { engine: Engine::Source2, ..Default::default() })
///     .build(transport, StaticCredentials::new("user", "pass"));
/// client.connect().await?;
/// ```
pub struct GcClientBuilder<C = JsonCodec> {
    config: SessionConfig,
    codec: C,
}

impl GcClientBuilder<JsonCodec> {
    /// Creates a new builder with default settings and the JSON codec.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            codec: JsonCodec,
        }
    }
}

impl Default for GcClientBuilder<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> GcClientBuilder<C> {
    /// Sets the session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the record codec.
    pub fn codec<C2: Codec>(self, codec: C2) -> GcClientBuilder<C2> {
        GcClientBuilder {
            config: self.config,
            codec,
        }
    }

    /// Builds the client and starts its inbound task.
    ///
    /// Must be called from within a Tokio runtime. Nothing is sent until
    /// [`GcClient::connect`] is called.
    pub fn build<T, A>(self, transport: T, credentials: A) -> GcClient<T, A, C>
    where
        T: GcTransport,
        A: CredentialProvider,
    {
        let config = self.config.validated();
        let (events, _) = broadcast::channel(config.event_capacity);
        let (phase, _) = watch::channel(Phase {
            state: ConnectionState::Disconnected,
            failure: None,
        });

        let shared = Arc::new(Shared {
            transport,
            credentials,
            codec: self.codec,
            session: Mutex::new(Session::new(config.game, config.engine)),
            cache: Mutex::new(SoCache::new()),
            channels: Mutex::new(ChatChannels::new()),
            jobs: JobCorrelator::new(),
            timers: Mutex::new(Timers {
                hello: RetryTimer::new("hello"),
                reconnect: RetryTimer::new("reconnect"),
            }),
            events,
            phase,
            config,
        });

        let inbound = tokio::spawn(run_inbound(Arc::clone(&shared)));
        info!(game = %shared.config.game, "gc client started");
        GcClient { shared, inbound }
    }
}

// ---------------------------------------------------------------------------
// GcClient
// ---------------------------------------------------------------------------

/// A client of one game's coordinator.
///
/// Commands live in [`crate::commands`]. Dropping the client stops its
/// inbound task and timers without disconnecting the transport; call
/// [`shutdown`](Self::shutdown) for an orderly exit.
pub struct GcClient<T, A, C = JsonCodec> {
    pub(crate) shared: Arc<Shared<T, A, C>>,
    inbound: JoinHandle<()>,
}

impl GcClient<(), (), JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GcClientBuilder {
        GcClientBuilder::new()
    }
}

impl<T, A, C> GcClient<T, A, C>
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    /// Connects, logs on and waits until the coordinator holds a session.
    ///
    /// Returns immediately if the session is already ready. If a handshake
    /// is already in flight, waits for it instead of starting another.
    ///
    /// # Errors
    /// - `AuthenticationFailed` if the login is refused for good.
    /// - `SessionTimeout` if the session is not ready within
    ///   `ready_timeout`. The transport is disconnected in that case.
    /// - `Disconnected` if the connection is dropped and not retried.
    pub async fn connect(&self) -> Result<(), GcError> {
        let state = {
            let mut session = self.shared.session.lock();
            if session.is_ready() {
                return Ok(());
            }
            session.request_connection();
            session.state()
        };
        self.shared.phase.send_modify(|phase| phase.failure = None);
        let mut phase = self.shared.phase.subscribe();

        if state == ConnectionState::Disconnected {
            info!(game = %self.shared.config.game, "connecting");
            self.shared.transport.connect().await?;
        }

        let timeout = self.shared.config.ready_timeout;
        let ready = async {
            loop {
                {
                    let current = phase.borrow_and_update();
                    if current.state == ConnectionState::Ready {
                        return Ok(());
                    }
                    if let Some(failure) = &current.failure {
                        return Err(failure.clone());
                    }
                }
                if phase.changed().await.is_err() {
                    return Err(SessionError::Disconnected);
                }
            }
        };

        match tokio::time::timeout(timeout, ready).await {
            Ok(result) => result.map_err(GcError::from),
            Err(_) => {
                warn!(?timeout, "session not ready in time, disconnecting");
                self.shared.session.lock().withdraw_connection();
                if let Err(e) = self.shared.transport.disconnect().await {
                    debug!(error = %e, "disconnect after timeout");
                }
                Err(SessionError::SessionTimeout(timeout).into())
            }
        }
    }

    /// Disconnects on purpose. No reconnect follows.
    pub async fn disconnect(&self) -> Result<(), GcError> {
        self.shared.session.lock().withdraw_connection();
        self.shared.timers.lock().reconnect.disarm();
        self.shared.transport.disconnect().await?;
        Ok(())
    }

    /// Stops playing the game while staying logged on. The coordinator
    /// drops our session; hellos stop.
    ///
    /// To play again, `disconnect` and `connect`.
    pub async fn stop(&self) -> Result<(), GcError> {
        let was_running = self.shared.session.lock().stop();
        self.shared.disarm_hello();
        self.shared.publish_state();
        if was_running {
            info!("game stopped");
            self.shared.transport.play_game(None).await?;
        }
        Ok(())
    }

    /// Disconnects and stops the client.
    pub async fn shutdown(self) -> Result<(), GcError> {
        let result = self.disconnect().await;
        drop(self);
        result
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.session.lock().state()
    }

    pub fn is_ready(&self) -> bool {
        self.shared.session.lock().is_ready()
    }

    /// The account we are logged on as, once known.
    pub fn steam_id(&self) -> Option<SteamId> {
        self.shared.session.lock().steam_id()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// Subscribes to session events. Only events published after this call
    /// are received.
    pub fn subscribe(&self) -> broadcast::Receiver<GcEvent> {
        self.shared.events.subscribe()
    }

    /// Runs `f` with the shared-object cache locked.
    ///
    /// Keep `f` short: the inbound task waits on the same lock.
    pub fn with_cache<R>(&self, f: impl FnOnce(&SoCache) -> R) -> R {
        f(&self.shared.cache.lock())
    }

    /// Snapshot of the chat channels currently joined.
    pub fn chat_channels(&self) -> Vec<ChatChannel> {
        self.shared.channels.lock().iter().cloned().collect()
    }

    /// Number of correlated requests still waiting for a response.
    pub fn pending_requests(&self) -> usize {
        self.shared.jobs.len()
    }
}

impl<T, A, C> Drop for GcClient<T, A, C> {
    fn drop(&mut self) {
        self.inbound.abort();
        self.shared.timers.lock().disarm_all();
    }
}
