//! Match details records and replay locations.

use serde::{Deserialize, Serialize};

use crate::GameId;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDetailsRequest {
    pub match_id: u64,
}

/// Answer to [`MatchDetailsRequest`]. `result` is 1 on success; the match is
/// absent otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDetailsResponse {
    pub result: u32,
    #[serde(rename = "match")]
    pub match_info: Option<MatchInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPlayer {
    pub account_id: u32,
    pub player_slot: u32,
    pub hero_id: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

/// Summary of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchInfo {
    pub match_id: u64,
    pub duration: u32,
    pub start_time: u32,
    pub game_mode: u32,
    pub radiant_win: bool,
    /// Replay cluster the recording was uploaded to.
    pub cluster: u32,
    pub replay_salt: u32,
    pub players: Vec<MatchPlayer>,
}

/// Which replay artifact to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayKind {
    /// The full demo recording.
    Demo,
    /// The small metadata file.
    Meta,
}

impl ReplayKind {
    fn extension(self) -> &'static str {
        match self {
            ReplayKind::Demo => "dem",
            ReplayKind::Meta => "meta",
        }
    }
}

impl MatchInfo {
    /// Download location of a replay artifact for the live game.
    pub fn replay_url(&self, kind: ReplayKind) -> String {
        self.replay_url_for(GameId::DOTA2, kind)
    }

    /// Download location of a replay artifact for `game`.
    pub fn replay_url_for(&self, game: GameId, kind: ReplayKind) -> String {
        format!(
            "http://replay{}.valve.net/{}/{}_{}.{}.bz2",
            self.cluster,
            game.app_id(),
            self.match_id,
            self.replay_salt,
            kind.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_url_demo() {
        let info = MatchInfo {
            match_id: 3111014659,
            cluster: 123,
            replay_salt: 456789,
            ..Default::default()
        };
        assert_eq!(
            info.replay_url(ReplayKind::Demo),
            "http://replay123.valve.net/570/3111014659_456789.dem.bz2"
        );
    }

    #[test]
    fn test_replay_url_meta() {
        let info = MatchInfo {
            match_id: 1,
            cluster: 2,
            replay_salt: 3,
            ..Default::default()
        };
        assert_eq!(
            info.replay_url(ReplayKind::Meta),
            "http://replay2.valve.net/570/1_3.meta.bz2"
        );
    }

    #[test]
    fn test_match_details_response_uses_match_key() {
        let json = r#"{"result":1,"match":{"match_id":5}}"#;
        let response: MatchDetailsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.match_info.map(|m| m.match_id), Some(5));
    }
}
