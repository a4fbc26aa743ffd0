//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use peer_negotiation::browser::{PeerConnectionEngine, Session, WebSocketChannel};
use peer_negotiation::{
    ChannelError, ConnectionType, ConnectivityEngine, EngineOperation, IceCandidate,
    NegotiationCoordinator, NegotiationState, Role, SignalingChannel, SignalingMessage,
    SignalingState,
};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::RtcPeerConnection;

const SIGNALING_SERVER_URL: &str = "ws://0.0.0.0:5678/";

wasm_bindgen_test_configure!(run_in_browser);

fn engine() -> PeerConnectionEngine {
    let peer_connection = RtcPeerConnection::new().expect("failed to create peer connection");
    peer_connection.create_data_channel("negotiation-test");
    PeerConnectionEngine::new(peer_connection)
}

#[wasm_bindgen_test]
async fn engine_reports_local_offer_state() {
    let engine = engine();
    assert_eq!(engine.signaling_state(), SignalingState::Stable);

    let offer = engine.create_offer().await.unwrap();
    engine.set_local_description(offer).await.unwrap();

    assert_eq!(engine.signaling_state(), SignalingState::HaveLocalOffer);
}

/// Runs one offer/answer round, returns both engines and the offer's ICE username fragment.
async fn negotiated_pair() -> (PeerConnectionEngine, PeerConnectionEngine, String) {
    let offerer = engine();
    let answerer = PeerConnectionEngine::new(RtcPeerConnection::new().unwrap());

    let offer = offerer.create_offer().await.unwrap();
    let ufrag = offer
        .sdp
        .lines()
        .find_map(|line| line.strip_prefix("a=ice-ufrag:"))
        .expect("offer without ice-ufrag")
        .to_owned();
    offerer.set_local_description(offer.clone()).await.unwrap();
    answerer.set_remote_description(offer).await.unwrap();
    let answer = answerer.create_answer().await.unwrap();
    answerer
        .set_local_description(answer.clone())
        .await
        .unwrap();
    offerer.set_remote_description(answer).await.unwrap();

    (offerer, answerer, ufrag)
}

fn host_candidate(username_fragment: &str) -> IceCandidate {
    IceCandidate {
        sdp_m_line_index: Some(0),
        username_fragment: Some(username_fragment.to_owned()),
        ..IceCandidate::new("candidate:1 1 udp 2122260223 192.168.1.10 54321 typ host".to_owned())
    }
}

#[wasm_bindgen_test]
async fn two_engines_reach_stable_state() {
    let (offerer, answerer, _) = negotiated_pair().await;

    assert_eq!(offerer.signaling_state(), SignalingState::Stable);
    assert_eq!(answerer.signaling_state(), SignalingState::Stable);
}

#[wasm_bindgen_test]
async fn remote_candidate_is_matched_by_username_fragment() {
    let (_offerer, answerer, ufrag) = negotiated_pair().await;

    answerer
        .add_remote_candidate(host_candidate(&ufrag))
        .await
        .unwrap();

    let result = answerer
        .add_remote_candidate(host_candidate("unknownufrag"))
        .await;
    assert!(matches!(
        result,
        Err(ref err) if err.operation == EngineOperation::AddRemoteCandidate
    ));
}

#[wasm_bindgen_test]
fn channel_refuses_to_send_before_open() {
    let channel = WebSocketChannel::connect(SIGNALING_SERVER_URL).unwrap();
    let result = channel.send(&SignalingMessage::Offer("v=0".to_owned()));
    assert!(matches!(result, Err(ChannelError::NotConnected)));
}

#[wasm_bindgen_test]
async fn offer_round_clears_making_offer_when_relay_is_unreachable() {
    let channel = Rc::new(WebSocketChannel::connect(SIGNALING_SERVER_URL).unwrap());
    let coordinator = NegotiationCoordinator::new(Role::Impolite, Rc::new(engine()), channel);

    assert!(coordinator.on_negotiation_needed().await.is_err());
    assert_eq!(coordinator.state(), NegotiationState::default());
}

#[wasm_bindgen_test]
fn session_starts_successfully() {
    let session = Session::new(SIGNALING_SERVER_URL, Role::Polite, &ConnectionType::Local).unwrap();
    session.start(|_| {});
    assert_eq!(session.role(), Role::Polite);
    session.close();
}
