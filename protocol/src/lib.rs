/*!
Helper crate that declares the signaling envelopes shared by both ends of a
[peer-negotiation](../peer_negotiation/index.html) session.

Every message relayed between peers is a JSON object of the form
`{ "type": "offer" | "answer" | "ice", "data": ... }`, see [`SignalingMessage`].
*/

#![warn(missing_docs)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod common;
mod error;
mod message;

pub use common::IceCandidate;
pub use error::ProtocolError;
pub use message::SignalingMessage;

/// Fixed role of a peer in a session, used to break ties when both peers
/// send an offer at the same time.
///
/// The polite peer yields to the remote offer, the impolite one ignores it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Accepts the remote offer on collision, dropping its own
    Polite,
    /// Ignores the remote offer on collision
    #[default]
    Impolite,
}

impl Role {
    /// Whether this peer yields on collision
    #[must_use]
    pub const fn is_polite(self) -> bool {
        matches!(self, Self::Polite)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Polite => write!(f, "polite"),
            Self::Impolite => write!(f, "impolite"),
        }
    }
}

/// Kind of a session description.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    /// Description proposing a session
    Offer,
    /// Description accepting a proposed session
    Answer,
}

impl Display for SdpType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Offer => write!(f, "offer"),
            Self::Answer => write!(f, "answer"),
        }
    }
}

/// `SDP` body tagged with its kind, produced by one connectivity engine
/// and consumed by the other one.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Offer or answer
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    /// Raw `SDP` text
    pub sdp: String,
}

impl SessionDescription {
    /// Wrap `SDP` text of an offer
    #[must_use]
    pub const fn offer(sdp: String) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp,
        }
    }

    /// Wrap `SDP` text of an answer
    #[must_use]
    pub const fn answer(sdp: String) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp,
        }
    }
}
