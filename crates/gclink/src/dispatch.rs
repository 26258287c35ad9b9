//! Routing of inbound GC messages.
//!
//! Each inbound packet is routed by its flag-stripped id to one handler.
//! Handlers decode the body, update session, cache or channel state, and
//! publish events. Nothing in here is fatal: a message that is unknown,
//! fails to decode, or carries cache content we do not decode is published
//! as [`GcEvent::Unhandled`] and the loop moves on.

use std::sync::Arc;
use std::time::Duration;

use gclink_cache::Applied;
use gclink_protocol::{
    ChatMessage, ClientWelcome, Codec, ConnectionStatus, GcPacket, JoinChatChannelResponse,
    MatchDetailsResponse, MsgTag, OtherJoinedChannel, OtherLeftChannel, PingResponse,
    PracticeLobbyListResponse, ProtocolError, RequestChatChannelListResponse, SoCacheSubscribed,
    SoCacheSubscribedUpToDate, SoCacheUnsubscribed, SoMultipleObjects, SoSingleObject,
    msg::{self, base, dota, so},
};
use gclink_session::{CredentialProvider, StatusAction};
use gclink_transport::GcTransport;
use tracing::{debug, info, warn};

use crate::GcEvent;
use crate::client::Shared;

/// Where an inbound message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Welcome,
    ConnectionStatus,
    PingRequest,
    SoCreate,
    SoUpdate,
    SoDestroy,
    SoCacheSubscribed,
    SoCacheUnsubscribed,
    SoUpdateMultiple,
    SoCacheUpToDate,
    LobbyListResponse,
    ChatJoinResponse,
    ChatChannelListResponse,
    ChatMessage,
    ChatMemberJoined,
    ChatMemberLeft,
    MatchDetailsResponse,
    /// Not a message this client handles.
    Unknown,
}

/// Picks the route for a tag. The structured-format flag is ignored.
pub fn route_for(tag: MsgTag) -> Route {
    match tag.id {
        base::CLIENT_WELCOME => Route::Welcome,
        base::CLIENT_CONNECTION_STATUS => Route::ConnectionStatus,
        base::PING_REQUEST => Route::PingRequest,
        so::CREATE => Route::SoCreate,
        so::UPDATE => Route::SoUpdate,
        so::DESTROY => Route::SoDestroy,
        so::CACHE_SUBSCRIBED => Route::SoCacheSubscribed,
        so::CACHE_UNSUBSCRIBED => Route::SoCacheUnsubscribed,
        so::UPDATE_MULTIPLE => Route::SoUpdateMultiple,
        so::CACHE_SUBSCRIBED_UP_TO_DATE => Route::SoCacheUpToDate,
        dota::PRACTICE_LOBBY_LIST_RESPONSE => Route::LobbyListResponse,
        dota::JOIN_CHAT_CHANNEL_RESPONSE => Route::ChatJoinResponse,
        dota::REQUEST_CHAT_CHANNEL_LIST_RESPONSE => Route::ChatChannelListResponse,
        dota::CHAT_MESSAGE => Route::ChatMessage,
        dota::OTHER_JOINED_CHANNEL => Route::ChatMemberJoined,
        dota::OTHER_LEFT_CHANNEL => Route::ChatMemberLeft,
        dota::MATCH_DETAILS_RESPONSE => Route::MatchDetailsResponse,
        _ => Route::Unknown,
    }
}

/// `Ok(true)` when a message was fully used, `Ok(false)` when some or all
/// of it was not understood.
type Handled = Result<bool, ProtocolError>;

/// Handles one inbound packet addressed to our game.
pub(crate) async fn dispatch<T, A, C>(shared: &Arc<Shared<T, A, C>>, packet: GcPacket)
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    let route = route_for(packet.tag);
    debug!(tag = %packet.tag, msg = msg::name(packet.tag.id), ?route, "inbound");

    let handled = match route {
        Route::Welcome => on_welcome(shared, &packet),
        Route::ConnectionStatus => on_connection_status(shared, &packet),
        Route::PingRequest => on_ping(shared).await,
        Route::SoCreate | Route::SoUpdate => {
            let msg: SoSingleObject = match packet.decode_body(&shared.codec) {
                Ok(msg) => msg,
                Err(e) => return unhandled(shared, packet, Some(e)),
            };
            let applied = shared.cache.lock().apply_single_update(&shared.codec, &msg);
            Ok(publish_applied(shared, applied))
        }
        Route::SoDestroy => {
            let msg: SoSingleObject = match packet.decode_body(&shared.codec) {
                Ok(msg) => msg,
                Err(e) => return unhandled(shared, packet, Some(e)),
            };
            let applied = shared.cache.lock().destroy_single(&shared.codec, &msg);
            Ok(publish_applied(shared, applied))
        }
        Route::SoCacheSubscribed => packet
            .decode::<_, SoCacheSubscribed>(&shared.codec)
            .map(|msg| {
                let applied = shared.cache.lock().apply_subscribed(&shared.codec, &msg);
                publish_applied(shared, applied)
            }),
        Route::SoCacheUnsubscribed => packet
            .decode::<_, SoCacheUnsubscribed>(&shared.codec)
            .map(|msg| {
                let events = shared.cache.lock().apply_unsubscribed(&msg);
                publish_applied(shared, Applied { events, unhandled: false })
            }),
        Route::SoUpdateMultiple => packet
            .decode::<_, SoMultipleObjects>(&shared.codec)
            .map(|msg| {
                let applied = shared.cache.lock().apply_multiple(&shared.codec, &msg);
                publish_applied(shared, applied)
            }),
        Route::SoCacheUpToDate => packet
            .decode::<_, SoCacheSubscribedUpToDate>(&shared.codec)
            .map(|msg| {
                shared.cache.lock().mark_up_to_date(msg.owner_soid, msg.version);
                true
            }),
        Route::LobbyListResponse => packet
            .decode::<_, PracticeLobbyListResponse>(&shared.codec)
            .map(|msg| {
                shared.emit(GcEvent::LobbyList(msg.lobbies));
                true
            }),
        Route::ChatJoinResponse => on_chat_join(shared, &packet),
        Route::ChatChannelListResponse => packet
            .decode::<_, RequestChatChannelListResponse>(&shared.codec)
            .map(|msg| {
                shared.emit(GcEvent::ChatChannelList(msg.channels));
                true
            }),
        Route::ChatMessage => packet.decode::<_, ChatMessage>(&shared.codec).map(|msg| {
            shared.emit(GcEvent::ChatMessage(msg));
            true
        }),
        Route::ChatMemberJoined => packet
            .decode::<_, OtherJoinedChannel>(&shared.codec)
            .map(|msg| {
                shared.channels.lock().on_other_joined(&msg);
                shared.emit(GcEvent::ChatMemberJoined(msg));
                true
            }),
        Route::ChatMemberLeft => packet
            .decode::<_, OtherLeftChannel>(&shared.codec)
            .map(|msg| {
                shared.channels.lock().on_other_left(&msg);
                shared.emit(GcEvent::ChatMemberLeft(msg));
                true
            }),
        Route::MatchDetailsResponse => on_match_details(shared, &packet),
        Route::Unknown => Ok(false),
    };

    match handled {
        Ok(true) => {}
        Ok(false) => unhandled(shared, packet, None),
        Err(e) => unhandled(shared, packet, Some(e)),
    }
}

fn unhandled<T, A, C>(shared: &Shared<T, A, C>, packet: GcPacket, error: Option<ProtocolError>)
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    match error {
        Some(e) => warn!(tag = %packet.tag, error = %e, "undecodable message"),
        None => debug!(tag = %packet.tag, "unhandled message"),
    }
    shared.emit(GcEvent::Unhandled {
        tag: packet.tag,
        payload: packet.payload,
    });
}

/// Publishes cache events. Returns whether everything was understood.
fn publish_applied<T, A, C>(shared: &Shared<T, A, C>, applied: Applied) -> bool
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    for event in applied.events {
        shared.emit(GcEvent::Cache(event));
    }
    !applied.unhandled
}

// ---------------------------------------------------------------------------
// Session messages
// ---------------------------------------------------------------------------

fn on_welcome<T, A, C>(shared: &Arc<Shared<T, A, C>>, packet: &GcPacket) -> Handled
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    let welcome: ClientWelcome = packet.decode(&shared.codec)?;
    let newly = shared.session.lock().on_welcome();
    let newly = match newly {
        Ok(newly) => newly,
        Err(e) => {
            warn!(error = %e, "welcome out of sequence");
            return Ok(true);
        }
    };
    shared.disarm_hello();

    let mut applied = Applied::default();
    {
        let mut cache = shared.cache.lock();
        if newly {
            cache.forget_lobby();
        }
        for snapshot in &welcome.outofdate_subscribed_caches {
            let snapshot_applied = cache.apply_subscribed(&shared.codec, snapshot);
            applied.unhandled |= snapshot_applied.unhandled;
            applied.events.extend(snapshot_applied.events);
        }
        for held in &welcome.uptodate_subscribed_caches {
            cache.mark_up_to_date(held.owner_soid, held.version);
        }
    }

    info!(
        version = welcome.version,
        snapshots = welcome.outofdate_subscribed_caches.len(),
        "welcomed"
    );
    shared.publish_state();
    shared.emit(GcEvent::Welcome {
        version: welcome.version,
    });
    Ok(publish_applied(shared, applied))
}

fn on_connection_status<T, A, C>(shared: &Arc<Shared<T, A, C>>, packet: &GcPacket) -> Handled
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    let status: ConnectionStatus = packet.decode(&shared.codec)?;
    let action = shared.session.lock().on_connection_status(status.status);
    match action {
        StatusAction::Ignored => debug!(status = ?status.status, "connection status ignored"),
        StatusAction::Ready { newly } => {
            shared.disarm_hello();
            if newly {
                info!("GC session ready by status notice");
            }
        }
        StatusAction::AwaitingSession { lost } => {
            if lost {
                warn!(status = ?status.status, queue = status.queue_position, "GC session lost");
            }
            if !shared.hello_armed() {
                shared.arm_hello(Duration::ZERO);
            }
        }
    }
    shared.publish_state();
    shared.emit(GcEvent::ConnectionStatus(status.status));
    Ok(true)
}

/// Answers a ping. The body is not looked at.
async fn on_ping<T, A, C>(shared: &Shared<T, A, C>) -> Handled
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    if let Err(e) = shared.send_message(&PingResponse {}, None).await {
        warn!(error = %e, "pong failed to send");
    }
    shared.emit(GcEvent::PingRequest);
    Ok(true)
}

// ---------------------------------------------------------------------------
// Chat and match messages
// ---------------------------------------------------------------------------

fn on_chat_join<T, A, C>(shared: &Shared<T, A, C>, packet: &GcPacket) -> Handled
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    let response: JoinChatChannelResponse = packet.decode(&shared.codec)?;
    let joined = shared.channels.lock().join(&response).cloned();
    match joined {
        Some(channel) => shared.emit(GcEvent::ChatChannelJoined(channel)),
        None => shared.emit(GcEvent::ChatJoinFailed {
            channel_name: response.channel_name,
            result: response.result,
        }),
    }
    Ok(true)
}

/// Resolves the waiting request if the response names one, otherwise
/// publishes the details.
fn on_match_details<T, A, C>(shared: &Shared<T, A, C>, packet: &GcPacket) -> Handled
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    if let Some(job) = packet.job_id {
        if shared.jobs.is_pending(job) && shared.jobs.complete(job, packet.clone()) {
            debug!(%job, "match details delivered");
            return Ok(true);
        }
        debug!(%job, "match details for no pending request");
    }
    let response: MatchDetailsResponse = packet.decode(&shared.codec)?;
    shared.emit(GcEvent::MatchDetails(response));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gclink_protocol::PROTO_FLAG;

    #[test]
    fn test_route_for_ignores_proto_flag() {
        let raw = MsgTag::from_raw(base::CLIENT_WELCOME | PROTO_FLAG);
        assert_eq!(route_for(raw), Route::Welcome);
        assert_eq!(route_for(MsgTag::from_raw(base::CLIENT_WELCOME)), Route::Welcome);
    }

    #[test]
    fn test_route_for_cache_messages() {
        assert_eq!(route_for(MsgTag::structured(so::CREATE)), Route::SoCreate);
        assert_eq!(route_for(MsgTag::structured(so::DESTROY)), Route::SoDestroy);
        assert_eq!(
            route_for(MsgTag::structured(so::UPDATE_MULTIPLE)),
            Route::SoUpdateMultiple
        );
    }

    #[test]
    fn test_route_for_unknown_id() {
        assert_eq!(route_for(MsgTag::structured(60_000)), Route::Unknown);
        // Outbound-only ids are not routed either.
        assert_eq!(route_for(MsgTag::structured(base::CLIENT_HELLO)), Route::Unknown);
    }
}
