use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use peer_negotiation_protocol::{IceCandidate, SessionDescription};

use crate::error::EngineError;

/// Signaling state of the connectivity engine, mirrors `RTCSignalingState`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum SignalingState {
    #[default]
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

impl SignalingState {
    /// No offer/answer exchange is in progress
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Stable)
    }
}

impl Display for SignalingState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = match *self {
            Self::Stable => "stable",
            Self::HaveLocalOffer => "have-local-offer",
            Self::HaveRemoteOffer => "have-remote-offer",
            Self::HaveLocalPranswer => "have-local-pranswer",
            Self::HaveRemotePranswer => "have-remote-pranswer",
            Self::Closed => "closed",
        };
        write!(f, "{state}")
    }
}

/// Subsystem creating offers and answers, holding local and remote descriptions
/// and gathering candidates. In the browser it is an `RTCPeerConnection`.
///
/// Every asynchronous operation is a suspension point of the negotiation:
/// other events may be handled while it is pending.
#[async_trait(?Send)]
pub trait ConnectivityEngine {
    /// Current signaling state, read synchronously
    fn signaling_state(&self) -> SignalingState;

    async fn create_offer(&self) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, description: SessionDescription)
        -> Result<(), EngineError>;

    /// Applying a remote offer while a local offer is pending
    /// must roll the local offer back first, as browsers do implicitly.
    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), EngineError>;

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_stable_state_is_stable() {
        assert!(SignalingState::default().is_stable());
        for state in [
            SignalingState::HaveLocalOffer,
            SignalingState::HaveRemoteOffer,
            SignalingState::HaveLocalPranswer,
            SignalingState::HaveRemotePranswer,
            SignalingState::Closed,
        ] {
            assert!(!state.is_stable(), "{state} reported as stable");
        }
    }
}
