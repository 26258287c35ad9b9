//! Integration tests for the in-memory channel transport.
//!
//! The remote end plays the base session: it sees every call the client
//! makes and answers with events.

use gclink_transport::{
    ChannelTransport, GamePlayed, GcTransport, InboundPacket, LogonDetails,
    LogonOutcome, LogonResult, OutboundPacket, TransportCall, TransportEvent,
};

#[tokio::test]
async fn test_full_handshake_round_trip() {
    let (transport, mut remote) = ChannelTransport::pair();

    transport.connect().await.unwrap();
    assert_eq!(remote.next_call().await, Some(TransportCall::Connect));

    remote.connected().unwrap();
    assert_eq!(
        transport.recv().await.unwrap(),
        Some(TransportEvent::Connected)
    );
    assert!(transport.is_connected());

    let details = LogonDetails {
        username: "bot".into(),
        password: "secret".into(),
        ..Default::default()
    };
    transport.log_on(details.clone()).await.unwrap();
    assert_eq!(remote.next_call().await, Some(TransportCall::LogOn(details)));

    remote.logged_on(LogonOutcome::ok(76561198000000001)).unwrap();
    match transport.recv().await.unwrap() {
        Some(TransportEvent::LoggedOn(outcome)) => {
            assert_eq!(outcome.result, LogonResult::Ok);
            assert_eq!(outcome.steam_id, Some(76561198000000001));
        }
        other => panic!("expected LoggedOn, got {other:?}"),
    }

    let game = GamePlayed {
        game_id: 570,
        game_extra_info: String::new(),
        game_flags: 0,
    };
    transport.play_game(Some(game.clone())).await.unwrap();
    assert_eq!(
        remote.next_call().await,
        Some(TransportCall::PlayGame(Some(game)))
    );
}

#[tokio::test]
async fn test_messages_flow_both_ways() {
    let (transport, mut remote) = ChannelTransport::pair();
    remote.connected().unwrap();
    let _ = transport.recv().await.unwrap();

    let outbound = OutboundPacket {
        app_id: 570,
        msg_type: 0x8000_0000 | 4006,
        source_job: None,
        payload: b"{}".to_vec(),
    };
    transport.send(outbound.clone()).await.unwrap();
    assert_eq!(remote.next_packet().await, Some(outbound));

    let inbound = InboundPacket {
        app_id: 570,
        msg_type: 0x8000_0000 | 4004,
        target_job: Some(9),
        payload: b"{}".to_vec(),
    };
    remote.deliver(inbound.clone()).unwrap();
    assert_eq!(
        transport.recv().await.unwrap(),
        Some(TransportEvent::Message(inbound))
    );
}

#[tokio::test]
async fn test_next_packet_skips_other_calls() {
    let (transport, mut remote) = ChannelTransport::pair();
    remote.connected().unwrap();

    transport.play_game(None).await.unwrap();
    transport
        .invite_to_game(1, "+invite 5".into())
        .await
        .unwrap();
    let packet = OutboundPacket {
        app_id: 570,
        msg_type: 7,
        source_job: Some(1),
        payload: vec![1, 2, 3],
    };
    transport.send(packet.clone()).await.unwrap();

    assert_eq!(remote.next_packet().await, Some(packet));
    assert!(remote.try_next_call().is_none());
}

#[tokio::test]
async fn test_user_disconnect_reports_user_initiated() {
    let (transport, mut remote) = ChannelTransport::pair();
    remote.connected().unwrap();
    let _ = transport.recv().await.unwrap();

    transport.disconnect().await.unwrap();
    assert_eq!(
        transport.recv().await.unwrap(),
        Some(TransportEvent::Disconnected {
            user_initiated: true
        })
    );
    assert!(!transport.is_connected());
    assert!(!remote.is_connected());
    assert_eq!(remote.drain_calls(), vec![TransportCall::Disconnect]);
}

#[tokio::test]
async fn test_remote_drop_reports_unexpected_disconnect() {
    let (transport, remote) = ChannelTransport::pair();
    remote.connected().unwrap();
    let _ = transport.recv().await.unwrap();

    remote.drop_connection().unwrap();
    assert_eq!(
        transport.recv().await.unwrap(),
        Some(TransportEvent::Disconnected {
            user_initiated: false
        })
    );
    assert!(!transport.is_connected());
}
