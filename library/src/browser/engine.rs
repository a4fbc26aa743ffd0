use async_trait::async_trait;
use js_sys::{Promise, Reflect};
use peer_negotiation_protocol::{IceCandidate, SdpType, SessionDescription};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    RtcIceCandidate, RtcIceCandidateInit, RtcPeerConnection, RtcSdpType,
    RtcSessionDescriptionInit, RtcSignalingState,
};

use crate::browser::js_reason;
use crate::engine::{ConnectivityEngine, SignalingState};
use crate::error::{EngineError, EngineOperation};

/// [`ConnectivityEngine`] backed by the browser's `RTCPeerConnection`.
#[derive(Debug, Clone)]
pub struct PeerConnectionEngine {
    peer_connection: RtcPeerConnection,
}

impl PeerConnectionEngine {
    pub fn new(peer_connection: RtcPeerConnection) -> Self {
        Self { peer_connection }
    }

    #[must_use]
    pub fn peer_connection(&self) -> &RtcPeerConnection {
        &self.peer_connection
    }
}

async fn settle(promise: Promise, operation: EngineOperation) -> Result<JsValue, EngineError> {
    JsFuture::from(promise)
        .await
        .map_err(|err| EngineError::new(operation, js_reason(&err)))
}

async fn sdp_of(promise: Promise, operation: EngineOperation) -> Result<String, EngineError> {
    let description = settle(promise, operation).await?;
    Reflect::get(&description, &JsValue::from_str("sdp"))
        .ok()
        .and_then(|sdp| sdp.as_string())
        .ok_or_else(|| EngineError::new(operation, "created description has no sdp"))
}

fn description_init(description: &SessionDescription) -> RtcSessionDescriptionInit {
    let sdp_type = match description.sdp_type {
        SdpType::Offer => RtcSdpType::Offer,
        SdpType::Answer => RtcSdpType::Answer,
    };
    let init = RtcSessionDescriptionInit::new(sdp_type);
    init.set_sdp(&description.sdp);
    init
}

#[async_trait(?Send)]
impl ConnectivityEngine for PeerConnectionEngine {
    fn signaling_state(&self) -> SignalingState {
        match self.peer_connection.signaling_state() {
            RtcSignalingState::Stable => SignalingState::Stable,
            RtcSignalingState::HaveLocalOffer => SignalingState::HaveLocalOffer,
            RtcSignalingState::HaveRemoteOffer => SignalingState::HaveRemoteOffer,
            RtcSignalingState::HaveLocalPranswer => SignalingState::HaveLocalPranswer,
            RtcSignalingState::HaveRemotePranswer => SignalingState::HaveRemotePranswer,
            _ => SignalingState::Closed,
        }
    }

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        let sdp = sdp_of(self.peer_connection.create_offer(), EngineOperation::CreateOffer).await?;
        Ok(SessionDescription::offer(sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        let sdp = sdp_of(
            self.peer_connection.create_answer(),
            EngineOperation::CreateAnswer,
        )
        .await?;
        Ok(SessionDescription::answer(sdp))
    }

    async fn set_local_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), EngineError> {
        let promise = self
            .peer_connection
            .set_local_description(&description_init(&description));
        settle(promise, EngineOperation::SetLocalDescription).await?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), EngineError> {
        let promise = self
            .peer_connection
            .set_remote_description(&description_init(&description));
        settle(promise, EngineOperation::SetRemoteDescription).await?;
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError> {
        let init = RtcIceCandidateInit::new(&candidate.candidate);
        init.set_sdp_mid(candidate.sdp_mid.as_deref());
        init.set_sdp_m_line_index(candidate.sdp_m_line_index);
        init.set_username_fragment(candidate.username_fragment.as_deref());

        let rtc_candidate = RtcIceCandidate::new(&init).map_err(|err| {
            EngineError::new(EngineOperation::AddRemoteCandidate, js_reason(&err))
        })?;
        let promise = self
            .peer_connection
            .add_ice_candidate_with_opt_rtc_ice_candidate(Some(&rtc_candidate));
        settle(promise, EngineOperation::AddRemoteCandidate).await?;
        Ok(())
    }
}
