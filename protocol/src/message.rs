use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{IceCandidate, ProtocolError, SdpType, SessionDescription};

/// Envelope relayed between the two peers of a session.
///
/// Serialized as `{ "type": "offer" | "answer" | "ice", "data": ... }`,
/// where `data` is the `SDP` body for descriptions and a candidate object for `ice`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SignalingMessage {
    /// `SDP` offer of the sending peer
    Offer(String),
    /// `SDP` answer of the sending peer
    Answer(String),
    /// Connectivity candidate of the sending peer
    #[serde(rename = "ice")]
    IceCandidate(IceCandidate),
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Descriptions arrive either as a bare `SDP` string
/// or as a whole `{ "type": ..., "sdp": ... }` description object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SdpBody {
    Plain(String),
    Description { sdp: String },
}

impl SdpBody {
    fn into_sdp(self) -> String {
        match self {
            Self::Plain(sdp) | Self::Description { sdp } => sdp,
        }
    }
}

impl SignalingMessage {
    /// Encode into the JSON envelope sent over the relay.
    ///
    /// # Errors
    /// Only fails if `serde_json` can't serialize the payload.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON envelope received from the relay.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownType`] if `type` isn't recognized,
    /// [`ProtocolError::Malformed`] if the envelope or its `data` can't be parsed.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let RawEnvelope { kind, data } = serde_json::from_str(text)?;
        match kind.as_str() {
            "offer" => Ok(Self::Offer(serde_json::from_value::<SdpBody>(data)?.into_sdp())),
            "answer" => Ok(Self::Answer(serde_json::from_value::<SdpBody>(data)?.into_sdp())),
            "ice" => Ok(Self::IceCandidate(serde_json::from_value(data)?)),
            _ => Err(ProtocolError::UnknownType(kind)),
        }
    }

    /// Description carried by an offer or an answer, `None` for candidates
    #[must_use]
    pub fn description(&self) -> Option<SessionDescription> {
        match *self {
            Self::Offer(ref sdp) => Some(SessionDescription::offer(sdp.clone())),
            Self::Answer(ref sdp) => Some(SessionDescription::answer(sdp.clone())),
            Self::IceCandidate(_) => None,
        }
    }
}

impl From<SessionDescription> for SignalingMessage {
    fn from(description: SessionDescription) -> Self {
        match description.sdp_type {
            SdpType::Offer => Self::Offer(description.sdp),
            SdpType::Answer => Self::Answer(description.sdp),
        }
    }
}
