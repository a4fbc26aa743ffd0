use serde::{Deserialize, Serialize};

/// Connectivity probe discovered by one peer and proposed to the other one.
///
/// Field names follow the browser's `RTCIceCandidate` attributes.
/// Only `candidate` is mandatory, all other fields are serialized as `null` when absent,
/// so the relayed object always carries every key.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    /// IP address or mDNS host name of the candidate
    pub address: Option<String>,
    /// Candidate line as found in `SDP`, without the `a=` prefix
    pub candidate: String,
    /// `rtp` or `rtcp`
    pub component: Option<String>,
    /// Identifier shared by candidates of the same base
    pub foundation: Option<String>,
    /// Port of the candidate
    pub port: Option<u16>,
    /// Priority used during connectivity checks
    pub priority: Option<u32>,
    /// `udp` or `tcp`
    pub protocol: Option<String>,
    /// Address the candidate was derived from, for reflexive and relay candidates
    pub related_address: Option<String>,
    /// Port the candidate was derived from, for reflexive and relay candidates
    pub related_port: Option<u16>,
    /// Index of the media description the candidate belongs to
    pub sdp_m_line_index: Option<u16>,
    /// Identification tag of the media description the candidate belongs to
    pub sdp_mid: Option<String>,
    /// `active`, `passive` or `so`, only for `tcp` candidates
    pub tcp_type: Option<String>,
    /// `host`, `srflx`, `prflx` or `relay`
    #[serde(rename = "type")]
    pub candidate_type: Option<String>,
    /// ICE username fragment of the session the candidate belongs to
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    /// Candidate with only its `SDP` line set
    #[must_use]
    pub fn new(candidate: String) -> Self {
        Self {
            candidate,
            ..Self::default()
        }
    }

    /// Whether the candidate exposes a non-empty address.
    ///
    /// Browsers hide the address of candidates they obfuscate,
    /// such candidates are not worth relaying.
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.address
            .as_deref()
            .map_or(false, |address| !address.is_empty())
    }
}
