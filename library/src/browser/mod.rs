/*!
Browser bindings: the negotiation coordinator driven by an `RTCPeerConnection`
and a `WebSocket` to the signaling relay.

# Example

```no_run
use peer_negotiation::browser::Session;
use peer_negotiation::{ConnectionType, Role, DEFAULT_SIGNALING_SERVER_URL};

let session = Session::new(
    DEFAULT_SIGNALING_SERVER_URL,
    Role::Polite,
    &ConnectionType::default(),
)
.unwrap();
session.start(|stream| {
    log::info!("remote stream available: {}", stream.id());
});
```
*/

use std::rc::Rc;

use log::error;
use peer_negotiation_protocol::Role;
use wasm_bindgen::JsValue;
use web_sys::{
    MediaStream, RtcPeerConnection, RtcRtpTransceiverDirection, RtcRtpTransceiverInit,
};

use crate::browser::callbacks::{
    set_channel_on_receive, set_peer_connection_on_ice_candidate,
    set_peer_connection_on_ice_connection_state_change,
    set_peer_connection_on_ice_gathering_state_change,
    set_peer_connection_on_negotiation_needed, set_peer_connection_on_signaling_state_change,
    set_peer_connection_on_track, set_websocket_on_open,
};
pub use crate::browser::channel::WebSocketChannel;
pub use crate::browser::engine::PeerConnectionEngine;
use crate::coordinator::{NegotiationCoordinator, NegotiationState};
use crate::error::{EngineError, EngineOperation};
use crate::utils::{create_peer_connection, set_panic_hook, ConnectionType};

mod callbacks;
mod channel;
mod engine;

pub(crate) type BrowserCoordinator = NegotiationCoordinator<PeerConnectionEngine, WebSocketChannel>;

pub(crate) fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[derive(Debug)]
struct SessionInner {
    peer_connection: RtcPeerConnection,
    channel: Rc<WebSocketChannel>,
    coordinator: BrowserCoordinator,
}

/// One peer-to-peer media session negotiated through a signaling relay.
///
/// Start-up flow is divided into two methods [`Session::new`] and [`Session::start`]
/// so that callbacks can be registered before any event fires.
///
/// This class is a pointer to the underlying resource and can be cloned freely.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

impl Session {
    /// Creates the peer connection and the relay connection.
    ///
    /// # Errors
    /// Fails if the browser refuses to create the peer connection
    /// or the `WebSocket` to `signaling_server_url`.
    pub fn new(
        signaling_server_url: &str,
        role: Role,
        connection_type: &ConnectionType,
    ) -> crate::Result<Self> {
        set_panic_hook();

        let peer_connection = create_peer_connection(connection_type)
            .map_err(|err| EngineError::new(EngineOperation::CreateConnection, js_reason(&err)))?;
        let channel = Rc::new(WebSocketChannel::connect(signaling_server_url)?);
        let engine = Rc::new(PeerConnectionEngine::new(peer_connection.clone()));
        let coordinator = NegotiationCoordinator::new(role, engine, Rc::clone(&channel));

        Ok(Self {
            inner: Rc::new(SessionInner {
                peer_connection,
                channel,
                coordinator,
            }),
        })
    }

    /// Wires browser events to the coordinator and requests a receive-only video track,
    /// which triggers the first negotiation.
    /// `on_remote_stream` runs whenever the remote peer's media becomes available.
    pub fn start(&self, on_remote_stream: impl FnMut(MediaStream) + 'static) {
        let peer_connection = &self.inner.peer_connection;
        let coordinator = &self.inner.coordinator;

        set_peer_connection_on_track(peer_connection, on_remote_stream);
        set_peer_connection_on_ice_candidate(peer_connection, coordinator.clone());
        set_peer_connection_on_negotiation_needed(peer_connection, coordinator.clone());
        set_peer_connection_on_ice_connection_state_change(peer_connection);
        set_peer_connection_on_ice_gathering_state_change(peer_connection);
        set_peer_connection_on_signaling_state_change(peer_connection);
        set_channel_on_receive(&self.inner.channel, coordinator.clone());
        set_websocket_on_open(self.inner.channel.websocket(), coordinator.clone());

        let init = RtcRtpTransceiverInit::new();
        init.set_direction(RtcRtpTransceiverDirection::Recvonly);
        peer_connection.add_transceiver_with_str_and_init("video", &init);
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.inner.coordinator.role()
    }

    #[must_use]
    pub fn state(&self) -> NegotiationState {
        self.inner.coordinator.state()
    }

    #[must_use]
    pub fn peer_connection(&self) -> &RtcPeerConnection {
        &self.inner.peer_connection
    }

    /// Close both the peer connection and the relay connection.
    pub fn close(&self) {
        self.inner.peer_connection.close();
        if let Err(err) = self.inner.channel.websocket().close() {
            error!("failed to close signaling connection: {}", js_reason(&err));
        }
    }
}
