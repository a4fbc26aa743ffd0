/// Reasons an inbound envelope can't be turned into a [`SignalingMessage`](crate::SignalingMessage).
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Envelope isn't valid JSON or its `data` doesn't match its `type`
    #[error("malformed signaling message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Envelope `type` isn't one of `offer`, `answer` or `ice`
    #[error("unknown signaling message type: {0:?}")]
    UnknownType(String),
}
