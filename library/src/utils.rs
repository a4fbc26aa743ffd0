use serde::{Deserialize, Serialize};

/// STUN server used when nothing else is configured
pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// Relay the demo page connects to
pub const DEFAULT_SIGNALING_SERVER_URL: &str = "ws://localhost:5678/";

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Specifies what kind of peer connection to create
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConnectionType {
    /// Within local network
    Local,
    /// Setup with STUN server, WAN capabilities but can fail
    Stun { urls: String },
    /// Setup with STUN and TURN servers and fallback to TURN if needed, most stable connection
    StunAndTurn {
        stun_urls: String,
        turn_urls: String,
        username: String,
        credential: String,
    },
}

impl Default for ConnectionType {
    fn default() -> Self {
        Self::Stun {
            urls: DEFAULT_STUN_SERVER.to_owned(),
        }
    }
}

/// Single entry of the peer connection's `iceServers` configuration
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IceServer {
    pub urls: String,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl ConnectionType {
    #[must_use]
    pub fn ice_servers(&self) -> Vec<IceServer> {
        match *self {
            Self::Local => Vec::new(),
            Self::Stun { ref urls } => vec![IceServer {
                urls: urls.clone(),
                username: None,
                credential: None,
            }],
            Self::StunAndTurn {
                ref stun_urls,
                ref turn_urls,
                ref username,
                ref credential,
            } => vec![
                IceServer {
                    urls: stun_urls.clone(),
                    username: None,
                    credential: None,
                },
                IceServer {
                    urls: turn_urls.clone(),
                    username: Some(username.clone()),
                    credential: Some(credential.clone()),
                },
            ],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn create_peer_connection(
    connection_type: &ConnectionType,
) -> Result<web_sys::RtcPeerConnection, wasm_bindgen::JsValue> {
    use js_sys::{Array, Object, Reflect};
    use web_sys::{RtcConfiguration, RtcPeerConnection};

    let ice_servers = connection_type.ice_servers();
    if ice_servers.is_empty() {
        return RtcPeerConnection::new();
    }

    let ice_servers_array = Array::new();
    for server in ice_servers {
        let server_entry = Object::new();

        Reflect::set(&server_entry, &"urls".into(), &server.urls.into())?;
        if let Some(username) = server.username {
            Reflect::set(&server_entry, &"username".into(), &username.into())?;
        }
        if let Some(credential) = server.credential {
            Reflect::set(&server_entry, &"credential".into(), &credential.into())?;
        }

        ice_servers_array.push(&server_entry);
    }

    let rtc_configuration = RtcConfiguration::new();
    rtc_configuration.set_ice_servers(&ice_servers_array);

    RtcPeerConnection::new_with_configuration(&rtc_configuration)
}
