use js_sys::Reflect;
use log::{debug, error, info};
use peer_negotiation_protocol::IceCandidate;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    MediaStream, RtcIceCandidate, RtcPeerConnection, RtcPeerConnectionIceEvent, RtcTrackEvent,
    WebSocket,
};

use crate::browser::{BrowserCoordinator, WebSocketChannel};
use crate::channel::SignalingChannel;

fn string_field(target: &JsValue, key: &str) -> Option<String> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .as_string()
}

#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn integer_field(target: &JsValue, key: &str) -> Option<u32> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()?;
    (value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}

fn port_field(target: &JsValue, key: &str) -> Option<u16> {
    integer_field(target, key).and_then(|port| u16::try_from(port).ok())
}

/// Not every browser exposes the parsed candidate attributes, missing ones stay `None`.
fn signaled_candidate(candidate: &RtcIceCandidate) -> IceCandidate {
    IceCandidate {
        address: string_field(candidate, "address"),
        candidate: candidate.candidate(),
        component: string_field(candidate, "component"),
        foundation: string_field(candidate, "foundation"),
        port: port_field(candidate, "port"),
        priority: integer_field(candidate, "priority"),
        protocol: string_field(candidate, "protocol"),
        related_address: string_field(candidate, "relatedAddress"),
        related_port: port_field(candidate, "relatedPort"),
        sdp_m_line_index: candidate.sdp_m_line_index(),
        sdp_mid: candidate.sdp_mid(),
        tcp_type: string_field(candidate, "tcpType"),
        candidate_type: string_field(candidate, "type"),
        username_fragment: string_field(candidate, "usernameFragment"),
    }
}

pub fn set_peer_connection_on_negotiation_needed(
    peer_connection: &RtcPeerConnection,
    coordinator: BrowserCoordinator,
) {
    let on_negotiation_needed: Box<dyn FnMut()> = Box::new(move || {
        let coordinator = coordinator.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = coordinator.on_negotiation_needed().await {
                error!("failed to send an offer: {}", err);
            }
        });
    });
    let on_negotiation_needed = Closure::wrap(on_negotiation_needed);
    peer_connection.set_onnegotiationneeded(Some(on_negotiation_needed.as_ref().unchecked_ref()));
    on_negotiation_needed.forget();
}

pub fn set_peer_connection_on_ice_candidate(
    peer_connection: &RtcPeerConnection,
    coordinator: BrowserCoordinator,
) {
    let on_ice_candidate: Box<dyn FnMut(RtcPeerConnectionIceEvent)> =
        Box::new(move |ev: RtcPeerConnectionIceEvent| {
            let candidate = ev.candidate().map(|candidate| signaled_candidate(&candidate));
            if let Err(err) = coordinator.on_local_ice_candidate(candidate) {
                error!("failed to send one of the ICE candidates: {}", err);
            }
        });
    let on_ice_candidate = Closure::wrap(on_ice_candidate);
    peer_connection.set_onicecandidate(Some(on_ice_candidate.as_ref().unchecked_ref()));
    on_ice_candidate.forget();
}

/// Remote media is handed over as is, rendering it is up to the caller.
pub fn set_peer_connection_on_track(
    peer_connection: &RtcPeerConnection,
    mut on_remote_stream: impl FnMut(MediaStream) + 'static,
) {
    let on_track: Box<dyn FnMut(RtcTrackEvent)> = Box::new(move |ev: RtcTrackEvent| {
        info!("received remote track");
        match ev.streams().get(0).dyn_into::<MediaStream>() {
            Ok(stream) => on_remote_stream(stream),
            Err(_) => debug!("remote track isn't part of any stream"),
        }
    });
    let on_track = Closure::wrap(on_track);
    peer_connection.set_ontrack(Some(on_track.as_ref().unchecked_ref()));
    on_track.forget();
}

pub fn set_peer_connection_on_ice_connection_state_change(peer_connection: &RtcPeerConnection) {
    let peer_connection_clone = peer_connection.clone();
    let on_ice_connection_state_change: Box<dyn FnMut()> = Box::new(move || {
        debug!(
            "ice connection state change: {:?}",
            peer_connection_clone.ice_connection_state()
        );
    });
    let on_ice_connection_state_change = Closure::wrap(on_ice_connection_state_change);
    peer_connection.set_oniceconnectionstatechange(Some(
        on_ice_connection_state_change.as_ref().unchecked_ref(),
    ));
    on_ice_connection_state_change.forget();
}

pub fn set_peer_connection_on_ice_gathering_state_change(peer_connection: &RtcPeerConnection) {
    let peer_connection_clone = peer_connection.clone();
    let on_ice_gathering_state_change: Box<dyn FnMut()> = Box::new(move || {
        debug!(
            "ice gathering state: {:?}",
            peer_connection_clone.ice_gathering_state()
        );
    });
    let on_ice_gathering_state_change = Closure::wrap(on_ice_gathering_state_change);
    peer_connection.set_onicegatheringstatechange(Some(
        on_ice_gathering_state_change.as_ref().unchecked_ref(),
    ));
    on_ice_gathering_state_change.forget();
}

pub fn set_peer_connection_on_signaling_state_change(peer_connection: &RtcPeerConnection) {
    let peer_connection_clone = peer_connection.clone();
    let on_signaling_state_change: Box<dyn FnMut()> = Box::new(move || {
        debug!(
            "signaling state change: {:?}",
            peer_connection_clone.signaling_state()
        );
    });
    let on_signaling_state_change = Closure::wrap(on_signaling_state_change);
    peer_connection.set_onsignalingstatechange(Some(
        on_signaling_state_change.as_ref().unchecked_ref(),
    ));
    on_signaling_state_change.forget();
}

/// handle message relayed from the other peer
pub fn set_channel_on_receive(channel: &WebSocketChannel, coordinator: BrowserCoordinator) {
    channel.on_receive(Box::new(move |message| {
        let coordinator = coordinator.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = coordinator.on_remote_message(message).await {
                error!("error handling signaling message: {}", err);
            }
        });
    }));
}

/// once web socket is open, start a negotiation round,
/// offers produced before the relay was reachable were dropped
pub fn set_websocket_on_open(websocket: &WebSocket, coordinator: BrowserCoordinator) {
    let on_open_callback: Box<dyn FnMut(JsValue)> = Box::new(move |_| {
        info!("connected to signaling server");
        let coordinator = coordinator.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = coordinator.on_negotiation_needed().await {
                error!("failed to send an offer: {}", err);
            }
        });
    });
    let on_open_callback = Closure::wrap(on_open_callback);
    websocket.set_onopen(Some(on_open_callback.as_ref().unchecked_ref()));
    on_open_callback.forget();
}
