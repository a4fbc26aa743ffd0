use peer_negotiation_protocol::SignalingMessage;

use crate::error::ChannelError;

/// Callback invoked for every message received from the relay.
pub type MessageHandler = Box<dyn FnMut(SignalingMessage)>;

/// Bidirectional message transport between the two peers of a session.
///
/// Only FIFO delivery per direction is assumed.
pub trait SignalingChannel {
    /// Send a message to the remote peer.
    ///
    /// # Errors
    /// [`ChannelError::NotConnected`] if the transport is closed,
    /// other variants if encoding or the transport itself fails.
    /// Failed messages are not retried.
    fn send(&self, message: &SignalingMessage) -> Result<(), ChannelError>;

    /// Register the callback run once per inbound message, in arrival order.
    /// Registering again replaces the previous handler.
    fn on_receive(&self, handler: MessageHandler);
}
