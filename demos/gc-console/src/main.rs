//! Walks a client through a full session against a scripted, in-memory
//! coordinator: connect, create a lobby, chat, fetch match details, leave.
//!
//! Run with `RUST_LOG=debug` to watch the session layer work.

mod coordinator;

use std::time::Duration;

use gclink::prelude::*;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::coordinator::Coordinator;

const MATCH_ID: u64 = 3_111_014_659;

#[tokio::main]
async fn main() -> Result<(), GcError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (transport, remote) = ChannelTransport::pair();
    let gc = tokio::spawn(Coordinator::new(remote).run());

    let client = GcClient::builder()
        .config(SessionConfig {
            launch_delay: Duration::from_millis(100),
            ready_timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .build(transport, StaticCredentials::new("demo", "demo"));
    let mut events = client.subscribe();

    client.connect().await?;
    let record = client.with_cache(|c| c.game_account_client().map(|a| (a.wins, a.losses)));
    println!("ready as {:?}, record {record:?}", client.steam_id());

    // Lobby
    client
        .create_lobby(LobbyDetails {
            game_name: "gclink demo".into(),
            pass_key: "demo".into(),
            ..Default::default()
        })
        .await?;
    let created = next(&mut events, |e| {
        matches!(e, GcEvent::Cache(CacheEvent::LobbyCreated(_)))
    })
    .await;
    let Some(GcEvent::Cache(CacheEvent::LobbyCreated(lobby))) = created else {
        return Err(GcError::Precondition("lobby never arrived".into()));
    };
    println!("in lobby {} ({} member)", lobby.lobby_id, lobby.members.len());

    // Chat
    client
        .join_chat_channel(format!("Lobby_{}", lobby.lobby_id), ChatChannelType::Lobby)
        .await?;
    if let Some(GcEvent::ChatChannelJoined(channel)) =
        next(&mut events, |e| matches!(e, GcEvent::ChatChannelJoined(_))).await
    {
        client.send_chat_message(channel.channel_id, "glhf").await?;
        if let Some(GcEvent::ChatMessage(line)) =
            next(&mut events, |e| matches!(e, GcEvent::ChatMessage(_))).await
        {
            println!("[{}] {}: {}", channel.name, line.persona_name, line.text);
        }
    }

    // Match details
    let details = client.match_details(MATCH_ID).await?;
    if let Some(info) = details.match_info {
        println!(
            "match {} lasted {}s, replay at {}",
            info.match_id,
            info.duration,
            info.replay_url(ReplayKind::Demo)
        );
    }

    client.leave_lobby().await?;
    next(&mut events, |e| matches!(e, GcEvent::Cache(CacheEvent::LobbyLeft { .. }))).await;
    println!("left lobby");

    client.shutdown().await?;
    if let Ok(Err(e)) = gc.await {
        eprintln!("coordinator failed: {e}");
    }
    Ok(())
}

/// Logs events until one matches `pred`, and returns that one. `None` if
/// the client went away first.
async fn next(
    events: &mut broadcast::Receiver<GcEvent>,
    pred: impl Fn(&GcEvent) -> bool,
) -> Option<GcEvent> {
    loop {
        match events.recv().await {
            Ok(event) if pred(&event) => return Some(event),
            Ok(event) => tracing::debug!(?event, "event"),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "event subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
