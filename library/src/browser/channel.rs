use log::{debug, error};
use peer_negotiation_protocol::SignalingMessage;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

use crate::browser::js_reason;
use crate::channel::{MessageHandler, SignalingChannel};
use crate::error::ChannelError;

/// [`SignalingChannel`] over a `WebSocket` to the relay, one JSON envelope per text frame.
#[derive(Debug, Clone)]
pub struct WebSocketChannel {
    websocket: WebSocket,
}

impl WebSocketChannel {
    /// Open a connection to the relay, messages can be sent once it is open.
    ///
    /// # Errors
    /// Fails if the browser refuses to create the `WebSocket`, e.g. for a malformed URL.
    pub fn connect(signaling_server_url: &str) -> Result<Self, ChannelError> {
        let websocket = WebSocket::new(signaling_server_url).map_err(|err| {
            ChannelError::Transport(format!(
                "failed to create connection with signaling server on {}: {}",
                signaling_server_url,
                js_reason(&err)
            ))
        })?;
        Ok(Self { websocket })
    }

    #[must_use]
    pub fn websocket(&self) -> &WebSocket {
        &self.websocket
    }
}

impl SignalingChannel for WebSocketChannel {
    fn send(&self, message: &SignalingMessage) -> Result<(), ChannelError> {
        if self.websocket.ready_state() != WebSocket::OPEN {
            return Err(ChannelError::NotConnected);
        }
        let message = message.to_json().map_err(ChannelError::Encode)?;
        debug!("sending {}", message);
        self.websocket
            .send_with_str(&message)
            .map_err(|err| ChannelError::Transport(js_reason(&err)))
    }

    fn on_receive(&self, mut handler: MessageHandler) {
        let on_message_callback: Box<dyn FnMut(MessageEvent)> =
            Box::new(move |ev: MessageEvent| {
                let Some(message) = ev.data().as_string() else {
                    error!("received non-text frame from signaling server");
                    return;
                };
                debug!("received {}", message);
                match SignalingMessage::from_json(&message) {
                    Ok(message) => handler(message),
                    Err(err) => error!("dropping signaling message: {}", err),
                }
            });
        let on_message_callback = Closure::wrap(on_message_callback);
        self.websocket
            .set_onmessage(Some(on_message_callback.as_ref().unchecked_ref()));
        on_message_callback.forget();
    }
}
