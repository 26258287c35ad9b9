//! Shared harness: a client over an in-memory transport, with the test
//! playing the coordinator through the `RemoteEnd`.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use gclink::prelude::*;
use gclink::protocol::{
    ClientWelcome, Codec, GcMessage, MsgTag, PingRequest, SoCacheSubscribed, SubscribedType,
    msg::{base, so_type},
};
use gclink::transport::{
    GamePlayed, InboundPacket, LogonOutcome, OutboundPacket, TransportCall, TransportError,
    TransportEvent,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

pub const APP: u32 = 570;
pub const LOBBY_ID: u64 = 42;

pub type TestClient = GcClient<ChannelTransport, StaticCredentials>;

pub fn me() -> SteamId {
    SteamId::from_account_id(1)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn client_with(config: SessionConfig) -> (TestClient, RemoteEnd) {
    init_tracing();
    let (transport, remote) = ChannelTransport::pair();
    let client = GcClient::builder()
        .config(config)
        .build(transport, StaticCredentials::new("user", "hunter2"));
    (client, remote)
}

pub fn client() -> (TestClient, RemoteEnd) {
    client_with(SessionConfig::default())
}

/// A channel transport that can refuse one connect attempt and, while a
/// flag is set, every send.
pub struct FlakyTransport {
    inner: ChannelTransport,
    connects: AtomicUsize,
    refuse_connect: Option<usize>,
    refuse_sends: Arc<AtomicBool>,
}

impl GcTransport for FlakyTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        if self.refuse_connect == Some(attempt) {
            return Err(TransportError::ConnectionClosed("refused".into()));
        }
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.inner.disconnect().await
    }

    async fn log_on(&self, details: LogonDetails) -> Result<(), TransportError> {
        self.inner.log_on(details).await
    }

    async fn play_game(&self, game: Option<GamePlayed>) -> Result<(), TransportError> {
        self.inner.play_game(game).await
    }

    async fn invite_to_game(&self, steam_id: u64, connect_string: String) -> Result<(), TransportError> {
        self.inner.invite_to_game(steam_id, connect_string).await
    }

    async fn send(&self, packet: OutboundPacket) -> Result<(), TransportError> {
        if self.refuse_sends.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("refused".into()));
        }
        self.inner.send(packet).await
    }

    async fn recv(&self) -> Result<Option<TransportEvent>, TransportError> {
        self.inner.recv().await
    }
}

/// A client over a [`FlakyTransport`] that refuses connect attempt number
/// `refuse_connect`. The returned flag makes sends fail while set.
pub fn flaky_client(
    refuse_connect: Option<usize>,
) -> (GcClient<FlakyTransport, StaticCredentials>, RemoteEnd, Arc<AtomicBool>) {
    init_tracing();
    let (inner, remote) = ChannelTransport::pair();
    let refuse_sends = Arc::new(AtomicBool::new(false));
    let transport = FlakyTransport {
        inner,
        connects: AtomicUsize::new(0),
        refuse_connect,
        refuse_sends: Arc::clone(&refuse_sends),
    };
    let client = GcClient::builder().build(transport, StaticCredentials::new("user", "hunter2"));
    (client, remote, refuse_sends)
}

// =========================================================================
// Packets
// =========================================================================

pub fn raw_inbound<T: Serialize>(id: u32, body: &T, job: Option<u64>) -> InboundPacket {
    InboundPacket {
        app_id: APP,
        msg_type: MsgTag::structured(id).into_raw(),
        target_job: job,
        payload: JsonCodec.encode(body).unwrap(),
    }
}

pub fn inbound<M: GcMessage>(msg: &M) -> InboundPacket {
    raw_inbound(M::ID, msg, None)
}

pub fn tag_of(packet: &OutboundPacket) -> u32 {
    MsgTag::from_raw(packet.msg_type).id
}

pub fn body<M: GcMessage>(packet: &OutboundPacket) -> M {
    assert_eq!(tag_of(packet), M::ID, "unexpected outbound message");
    JsonCodec.decode(&packet.payload).unwrap()
}

pub fn sent_packets(calls: &[TransportCall]) -> Vec<&OutboundPacket> {
    calls
        .iter()
        .filter_map(|call| match call {
            TransportCall::Send(packet) => Some(packet),
            _ => None,
        })
        .collect()
}

pub fn lobby(members: &[SteamId]) -> Lobby {
    Lobby {
        lobby_id: LOBBY_ID,
        game_name: "scrim".into(),
        leader_id: me(),
        members: members
            .iter()
            .map(|id| LobbyMember {
                id: *id,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// A welcome that subscribes us to a lobby cache holding `lobby`.
pub fn welcome_with_lobby(lobby: &Lobby) -> ClientWelcome {
    ClientWelcome {
        version: 1,
        outofdate_subscribed_caches: vec![SoCacheSubscribed {
            owner_soid: SoIdOwner::new(SoIdOwner::LOBBY, lobby.lobby_id),
            version: 1,
            objects: vec![SubscribedType {
                type_id: so_type::LOBBY,
                object_data: vec![JsonCodec.encode(lobby).unwrap()],
            }],
        }],
        ..Default::default()
    }
}

// =========================================================================
// Coordinator script
// =========================================================================

/// Plays the coordinator's side of a connection up to (and including) the
/// first hello.
pub async fn accept_login(remote: &mut RemoteEnd) {
    assert_eq!(remote.next_call().await, Some(TransportCall::Connect));
    remote.connected().unwrap();

    match remote.next_call().await {
        Some(TransportCall::LogOn(details)) => assert_eq!(details.username, "user"),
        other => panic!("expected log on, got {other:?}"),
    }
    remote.logged_on(LogonOutcome::ok(me().0)).unwrap();

    match remote.next_call().await {
        Some(TransportCall::PlayGame(Some(game))) => {
            assert_eq!(game.game_id, u64::from(APP));
            assert_eq!(game.game_flags, Engine::Source2.game_flags());
        }
        other => panic!("expected play game, got {other:?}"),
    }
    let hello = remote.next_packet().await.unwrap();
    assert_eq!(tag_of(&hello), base::CLIENT_HELLO);
}

/// Full handshake: login, first hello, then `welcome`.
pub async fn handshake(remote: &mut RemoteEnd, welcome: ClientWelcome) {
    accept_login(remote).await;
    remote.deliver(inbound(&welcome)).unwrap();
}

/// Connects `client`, answering as the coordinator with `welcome`.
pub async fn connect_with<T: GcTransport>(
    client: &GcClient<T, StaticCredentials>,
    remote: &mut RemoteEnd,
    welcome: ClientWelcome,
) {
    let (result, ()) = tokio::join!(client.connect(), handshake(remote, welcome));
    result.unwrap();
    assert!(client.is_ready());
}

pub async fn connect<T: GcTransport>(client: &GcClient<T, StaticCredentials>, remote: &mut RemoteEnd) {
    connect_with(
        client,
        remote,
        ClientWelcome {
            version: 1,
            ..Default::default()
        },
    )
    .await;
}

// =========================================================================
// Events
// =========================================================================

/// Waits for the first event matching `pred`, skipping others.
pub async fn wait_for(
    events: &mut broadcast::Receiver<GcEvent>,
    pred: impl Fn(&GcEvent) -> bool,
) -> GcEvent {
    let wait = async {
        loop {
            let event = events.recv().await.unwrap();
            if pred(&event) {
                return event;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(600), wait)
        .await
        .expect("event never arrived")
}

/// Takes every event published so far.
pub fn drain(events: &mut broadcast::Receiver<GcEvent>) -> Vec<GcEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Delivers a ping and waits until the client has handled it. Everything
/// delivered before it has been handled too.
pub async fn barrier(remote: &RemoteEnd, events: &mut broadcast::Receiver<GcEvent>) -> Vec<GcEvent> {
    remote.deliver(inbound(&PingRequest {})).unwrap();
    let mut seen = Vec::new();
    let wait = async {
        loop {
            match events.recv().await.unwrap() {
                GcEvent::PingRequest => return,
                other => seen.push(other),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(600), wait)
        .await
        .expect("barrier never passed");
    seen
}
