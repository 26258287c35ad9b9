use gclink::prelude::*;
use gclink::protocol::{
    ChatMember, ChatMessage, ClientWelcome, Codec, GameAccountClient, GcMessage,
    JoinChatChannel, JoinChatChannelResponse, MatchDetailsRequest, MatchDetailsResponse,
    MatchPlayer, MsgTag, PracticeLobbyCreate, SoCacheSubscribed, SoSingleObject,
    SubscribedType,
    msg::{base, dota, so, so_type},
};
use gclink::transport::{InboundPacket, LogonOutcome, OutboundPacket, TransportCall};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// A scripted coordinator
// ---------------------------------------------------------------------------

pub const ACCOUNT_ID: u32 = 1234;

/// Plays the base session and the game coordinator on the remote end of an
/// in-memory transport. Answers just enough to drive the demo.
pub struct Coordinator {
    remote: RemoteEnd,
    me: SteamId,
    lobby: Option<Lobby>,
    next_lobby_id: u64,
}

impl Coordinator {
    pub fn new(remote: RemoteEnd) -> Self {
        Self {
            remote,
            me: SteamId::from_account_id(ACCOUNT_ID),
            lobby: None,
            next_lobby_id: 24_000_000_000,
        }
    }

    /// Serves calls until the client disconnects or goes away.
    pub async fn run(mut self) -> Result<(), GcError> {
        while let Some(call) = self.remote.next_call().await {
            match call {
                TransportCall::Connect => self.remote.connected()?,
                TransportCall::LogOn(details) => {
                    info!(user = %details.username, "coordinator: log on");
                    self.remote.logged_on(LogonOutcome::ok(self.me.0))?;
                }
                TransportCall::PlayGame(game) => debug!(?game, "coordinator: play game"),
                TransportCall::InviteToGame {
                    steam_id,
                    connect_string,
                } => info!(steam_id, %connect_string, "coordinator: game invite"),
                TransportCall::Send(packet) => self.on_packet(packet)?,
                TransportCall::Disconnect => {
                    info!("coordinator: client disconnected");
                    break;
                }
            }
        }
        Ok(())
    }

    fn on_packet(&mut self, packet: OutboundPacket) -> Result<(), GcError> {
        let tag = MsgTag::from_raw(packet.msg_type);
        match tag.id {
            base::CLIENT_HELLO => self.deliver(&self.welcome()?, None),
            dota::PRACTICE_LOBBY_CREATE => {
                let create: PracticeLobbyCreate = JsonCodec.decode(&packet.payload)?;
                let lobby = self.create_lobby(create);
                self.deliver_object(so::CREATE, &lobby)
            }
            dota::PRACTICE_LOBBY_LEAVE => match self.lobby.take() {
                Some(lobby) => self.deliver_object(so::DESTROY, &lobby),
                None => Ok(()),
            },
            dota::JOIN_CHAT_CHANNEL => {
                let join: JoinChatChannel = JsonCodec.decode(&packet.payload)?;
                let response = JoinChatChannelResponse {
                    channel_name: join.channel_name,
                    channel_id: 9001,
                    channel_type: join.channel_type,
                    max_members: 10,
                    members: vec![ChatMember {
                        steam_id: self.me,
                        persona_name: "demo".into(),
                    }],
                    ..Default::default()
                };
                self.deliver(&response, None)
            }
            dota::CHAT_MESSAGE => {
                let mut line: ChatMessage = JsonCodec.decode(&packet.payload)?;
                line.persona_name = "demo".into();
                line.account_id = ACCOUNT_ID;
                self.deliver(&line, None)
            }
            dota::MATCH_DETAILS_REQUEST => {
                let request: MatchDetailsRequest = JsonCodec.decode(&packet.payload)?;
                self.deliver(&match_details(request.match_id), packet.source_job)
            }
            other => {
                debug!(msg = gclink::protocol::msg::name(other), "coordinator: ignored");
                Ok(())
            }
        }
    }

    fn welcome(&self) -> Result<ClientWelcome, GcError> {
        let account = GameAccountClient {
            account_id: ACCOUNT_ID,
            wins: 412,
            losses: 388,
            ..Default::default()
        };
        Ok(ClientWelcome {
            version: 1,
            outofdate_subscribed_caches: vec![SoCacheSubscribed {
                owner_soid: SoIdOwner::new(SoIdOwner::ACCOUNT, u64::from(ACCOUNT_ID)),
                version: 1,
                objects: vec![SubscribedType {
                    type_id: so_type::GAME_ACCOUNT_CLIENT,
                    object_data: vec![JsonCodec.encode(&account)?],
                }],
            }],
            ..Default::default()
        })
    }

    fn create_lobby(&mut self, create: PracticeLobbyCreate) -> Lobby {
        self.next_lobby_id += 1;
        let details = create.lobby_details;
        let lobby = Lobby {
            lobby_id: self.next_lobby_id,
            game_name: details.game_name,
            pass_key: details.pass_key,
            server_region: details.server_region,
            game_mode: details.game_mode,
            leader_id: self.me,
            members: vec![LobbyMember {
                id: self.me,
                name: "demo".into(),
                team: LobbyTeam::GoodGuys,
                ..Default::default()
            }],
            ..Default::default()
        };
        self.lobby = Some(lobby.clone());
        lobby
    }

    fn deliver_object(&self, msg_id: u32, lobby: &Lobby) -> Result<(), GcError> {
        let object = SoSingleObject {
            owner_soid: SoIdOwner::new(SoIdOwner::LOBBY, lobby.lobby_id),
            type_id: so_type::LOBBY,
            object_data: JsonCodec.encode(lobby)?,
            version: 1,
        };
        self.deliver_raw(msg_id, JsonCodec.encode(&object)?, None)
    }

    fn deliver<M: GcMessage>(&self, msg: &M, job: Option<u64>) -> Result<(), GcError> {
        self.deliver_raw(M::ID, JsonCodec.encode(msg)?, job)
    }

    fn deliver_raw(&self, msg_id: u32, payload: Vec<u8>, job: Option<u64>) -> Result<(), GcError> {
        self.remote.deliver(InboundPacket {
            app_id: GameId::DOTA2.app_id(),
            msg_type: MsgTag::structured(msg_id).into_raw(),
            target_job: job,
            payload,
        })?;
        Ok(())
    }
}

fn match_details(match_id: u64) -> MatchDetailsResponse {
    MatchDetailsResponse {
        result: 1,
        match_info: Some(MatchInfo {
            match_id,
            duration: 2417,
            radiant_win: true,
            cluster: 133,
            replay_salt: 1_096_725_282,
            players: (0..10)
                .map(|slot| MatchPlayer {
                    account_id: 100 + slot,
                    player_slot: if slot < 5 { slot } else { 128 + slot - 5 },
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }),
    }
}
