use std::fmt::{Display, Formatter};

use peer_negotiation_protocol::ProtocolError;

/// Failure of the relay transport, the message is dropped.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Underlying transport is not open
    #[error("signaling channel is not connected")]
    NotConnected,
    /// Message couldn't be turned into its wire form
    #[error("failed to encode signaling message: {0}")]
    Encode(#[source] ProtocolError),
    /// Transport refused the message or couldn't be created
    #[error("signaling transport failed: {0}")]
    Transport(String),
}

/// Connectivity engine operations, used to tell which step of a negotiation failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EngineOperation {
    CreateConnection,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription,
    SetRemoteDescription,
    AddRemoteCandidate,
}

impl Display for EngineOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operation = match *self {
            Self::CreateConnection => "create peer connection",
            Self::CreateOffer => "create offer",
            Self::CreateAnswer => "create answer",
            Self::SetLocalDescription => "set local description",
            Self::SetRemoteDescription => "set remote description",
            Self::AddRemoteCandidate => "add remote candidate",
        };
        write!(f, "{operation}")
    }
}

/// Failure reported by the connectivity engine.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("connectivity engine failed to {operation}: {reason}")]
pub struct EngineError {
    pub operation: EngineOperation,
    pub reason: String,
}

impl EngineError {
    pub fn new(operation: EngineOperation, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

/// Any failure of a negotiation step. None of them is fatal,
/// the worst outcome is a negotiation round that never completes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
