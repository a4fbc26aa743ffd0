#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use log::LevelFilter;
use peer_negotiation::{
    ChannelError, ConnectivityEngine, EngineError, EngineOperation, IceCandidate,
    MessageHandler, NegotiationCoordinator, ProtocolError, Role, SdpType, SessionDescription,
    SignalingChannel, SignalingMessage, SignalingState,
};
use simplelog::{Config, TestLogger};

pub fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

pub fn host_candidate(address: &str) -> IceCandidate {
    IceCandidate {
        address: Some(address.to_owned()),
        candidate: format!("candidate:842163049 1 udp 1677729535 {address} 53705 typ host"),
        component: Some("rtp".to_owned()),
        foundation: Some("842163049".to_owned()),
        port: Some(53705),
        priority: Some(1_677_729_535),
        protocol: Some("udp".to_owned()),
        related_address: None,
        related_port: None,
        sdp_m_line_index: Some(0),
        sdp_mid: Some("0".to_owned()),
        tcp_type: None,
        candidate_type: Some("host".to_owned()),
        username_fragment: Some("EsMX".to_owned()),
    }
}

/// Connectivity engine following the `RTCPeerConnection` signaling state machine.
///
/// Any operation can be made to fail once, or held pending until released.
pub struct FakeEngine {
    name: &'static str,
    signaling_state: Cell<SignalingState>,
    offers_created: Cell<usize>,
    local_description: RefCell<Option<SessionDescription>>,
    remote_description: RefCell<Option<SessionDescription>>,
    remote_candidates: RefCell<Vec<IceCandidate>>,
    failures: RefCell<HashSet<EngineOperation>>,
    gates: RefCell<HashMap<EngineOperation, oneshot::Receiver<()>>>,
}

impl FakeEngine {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            signaling_state: Cell::new(SignalingState::Stable),
            offers_created: Cell::new(0),
            local_description: RefCell::new(None),
            remote_description: RefCell::new(None),
            remote_candidates: RefCell::new(Vec::new()),
            failures: RefCell::new(HashSet::new()),
            gates: RefCell::new(HashMap::new()),
        }
    }

    /// Next call of `operation` fails.
    pub fn fail_next(&self, operation: EngineOperation) {
        self.failures.borrow_mut().insert(operation);
    }

    /// Next call of `operation` stays pending until the returned sender fires.
    pub fn hold(&self, operation: EngineOperation) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.borrow_mut().insert(operation, gate);
        release
    }

    pub fn local_description(&self) -> Option<SessionDescription> {
        self.local_description.borrow().clone()
    }

    pub fn remote_description(&self) -> Option<SessionDescription> {
        self.remote_description.borrow().clone()
    }

    pub fn remote_candidates(&self) -> Vec<IceCandidate> {
        self.remote_candidates.borrow().clone()
    }

    async fn enter(&self, operation: EngineOperation) -> Result<(), EngineError> {
        let gate = self.gates.borrow_mut().remove(&operation);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failures.borrow_mut().remove(&operation) {
            return Err(EngineError::new(operation, "injected failure"));
        }
        Ok(())
    }

    fn invalid_state(&self, operation: EngineOperation) -> EngineError {
        EngineError::new(
            operation,
            format!("invalid in state {}", self.signaling_state.get()),
        )
    }
}

#[async_trait(?Send)]
impl ConnectivityEngine for FakeEngine {
    fn signaling_state(&self) -> SignalingState {
        self.signaling_state.get()
    }

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        self.enter(EngineOperation::CreateOffer).await?;
        match self.signaling_state.get() {
            SignalingState::Stable | SignalingState::HaveLocalOffer => {}
            _ => return Err(self.invalid_state(EngineOperation::CreateOffer)),
        }
        let count = self.offers_created.get() + 1;
        self.offers_created.set(count);
        Ok(SessionDescription::offer(format!(
            "{}-offer-{}",
            self.name, count
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        self.enter(EngineOperation::CreateAnswer).await?;
        if self.signaling_state.get() != SignalingState::HaveRemoteOffer {
            return Err(self.invalid_state(EngineOperation::CreateAnswer));
        }
        let offer = self
            .remote_description
            .borrow()
            .as_ref()
            .map(|description| description.sdp.clone())
            .unwrap_or_default();
        Ok(SessionDescription::answer(format!(
            "{}-answer-to-{}",
            self.name, offer
        )))
    }

    async fn set_local_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), EngineError> {
        self.enter(EngineOperation::SetLocalDescription).await?;
        let next = match (description.sdp_type, self.signaling_state.get()) {
            (SdpType::Offer, SignalingState::Stable | SignalingState::HaveLocalOffer) => {
                SignalingState::HaveLocalOffer
            }
            (SdpType::Answer, SignalingState::HaveRemoteOffer) => SignalingState::Stable,
            _ => return Err(self.invalid_state(EngineOperation::SetLocalDescription)),
        };
        self.signaling_state.set(next);
        *self.local_description.borrow_mut() = Some(description);
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), EngineError> {
        self.enter(EngineOperation::SetRemoteDescription).await?;
        let next = match (description.sdp_type, self.signaling_state.get()) {
            (SdpType::Offer, SignalingState::HaveLocalOffer) => {
                // implicit rollback of the pending local offer
                *self.local_description.borrow_mut() = None;
                SignalingState::HaveRemoteOffer
            }
            (SdpType::Offer, SignalingState::Stable | SignalingState::HaveRemoteOffer) => {
                SignalingState::HaveRemoteOffer
            }
            (SdpType::Answer, SignalingState::HaveLocalOffer) => SignalingState::Stable,
            _ => return Err(self.invalid_state(EngineOperation::SetRemoteDescription)),
        };
        self.signaling_state.set(next);
        *self.remote_description.borrow_mut() = Some(description);
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError> {
        self.enter(EngineOperation::AddRemoteCandidate).await?;
        if self.remote_description.borrow().is_none() {
            return Err(EngineError::new(
                EngineOperation::AddRemoteCandidate,
                "no remote description",
            ));
        }
        self.remote_candidates.borrow_mut().push(candidate);
        Ok(())
    }
}

/// Channel keeping every sent envelope in its wire form.
#[derive(Default)]
pub struct RecordingChannel {
    sent: RefCell<Vec<String>>,
    disconnected: Cell<bool>,
    handler: RefCell<Option<MessageHandler>>,
}

impl RecordingChannel {
    pub fn disconnect(&self) {
        self.disconnected.set(true);
    }

    pub fn reconnect(&self) {
        self.disconnected.set(false);
    }

    /// Raw JSON envelopes sent so far
    pub fn wire(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    /// Drain sent messages, decoded back from their wire form
    pub fn take_sent(&self) -> Vec<SignalingMessage> {
        self.sent
            .take()
            .iter()
            .map(|text| SignalingMessage::from_json(text).unwrap())
            .collect()
    }

    /// Hand a raw envelope to the registered handler, as the relay would
    pub fn deliver(&self, text: &str) -> Result<(), ProtocolError> {
        let message = SignalingMessage::from_json(text)?;
        if let Some(handler) = self.handler.borrow_mut().as_mut() {
            handler(message);
        }
        Ok(())
    }
}

impl SignalingChannel for RecordingChannel {
    fn send(&self, message: &SignalingMessage) -> Result<(), ChannelError> {
        if self.disconnected.get() {
            return Err(ChannelError::NotConnected);
        }
        let text = message.to_json().map_err(ChannelError::Encode)?;
        self.sent.borrow_mut().push(text);
        Ok(())
    }

    fn on_receive(&self, handler: MessageHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }
}

pub type FakeCoordinator = NegotiationCoordinator<FakeEngine, RecordingChannel>;

pub struct Peer {
    pub engine: Rc<FakeEngine>,
    pub channel: Rc<RecordingChannel>,
    pub coordinator: FakeCoordinator,
}

impl Peer {
    pub fn new(name: &'static str, role: Role) -> Self {
        let engine = Rc::new(FakeEngine::new(name));
        let channel = Rc::new(RecordingChannel::default());
        let coordinator = NegotiationCoordinator::new(role, Rc::clone(&engine), Rc::clone(&channel));
        Self {
            engine,
            channel,
            coordinator,
        }
    }

    /// Relay everything this peer sent so far to `other`, in order,
    /// returning the outcome of handling each message.
    pub async fn relay_to(&self, other: &Peer) -> Vec<peer_negotiation::Result<()>> {
        let mut outcomes = Vec::new();
        for message in self.channel.take_sent() {
            outcomes.push(other.coordinator.on_remote_message(message).await);
        }
        outcomes
    }
}
