/*!
This crate negotiates a single peer-to-peer `WebRTC` media session between two browsers,
exchanging session descriptions and ICE candidates through a signaling relay.

# Overview

Both peers run the same code and either of them may start a negotiation at any time.
When their offers cross on the relay ("glare"), the [`Role`] fixed at session creation
decides which offer wins: the polite peer yields, the impolite one keeps its own.

The state machine lives in [`NegotiationCoordinator`], which only talks to two collaborators:
a [`SignalingChannel`] carrying [`SignalingMessage`]s to the other peer
and a [`ConnectivityEngine`] creating and applying descriptions.
On `wasm32` the `browser` module binds them to `WebSocket` and `RTCPeerConnection`.
*/

#![allow(
    clippy::module_name_repetitions,
    clippy::future_not_send, // false positive in WASM (single threaded) context
)]
// clippy WARN level lints
#![warn(
    // missing_docs,
    clippy::cargo,
    clippy::pedantic,
    // clippy::nursery,
    clippy::dbg_macro,
    clippy::unwrap_used,
    clippy::integer_division,
    clippy::large_include_file,
    clippy::map_err_ignore,
    // clippy::missing_docs_in_private_items,
    clippy::panic,
    clippy::todo,
    clippy::undocumented_unsafe_blocks,
    clippy::unimplemented,
    clippy::unreachable
)]
// clippy WARN level lints, that can be upgraded to DENY if preferred
#![warn(
    clippy::float_arithmetic,
    clippy::arithmetic_side_effects,
    clippy::modulo_arithmetic,
    clippy::as_conversions,
    clippy::assertions_on_result_states,
    clippy::clone_on_ref_ptr,
    clippy::if_then_some_else_none,
    clippy::indexing_slicing,
    clippy::let_underscore_must_use,
    clippy::pattern_type_mismatch,
    clippy::string_slice,
    clippy::try_err
)]
// clippy DENY level lints, they always have a quick fix that should be preferred
#![deny(
    clippy::wildcard_imports,
    clippy::multiple_inherent_impl,
    clippy::rc_buffer,
    clippy::rc_mutex,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_name_method,
    clippy::self_named_module_files,
    clippy::separated_literal_suffix,
    clippy::shadow_unrelated,
    clippy::str_to_string,
    clippy::string_add,
    clippy::string_to_string,
    clippy::unnecessary_self_imports,
    clippy::unneeded_field_pattern,
    clippy::verbose_file_reads
)]

#[cfg(target_arch = "wasm32")]
pub mod browser;
mod channel;
mod coordinator;
mod engine;
mod error;
mod utils;

pub use channel::{MessageHandler, SignalingChannel};
pub use coordinator::{NegotiationCoordinator, NegotiationState};
pub use engine::{ConnectivityEngine, SignalingState};
pub use error::{ChannelError, EngineError, EngineOperation, Error, Result};
pub use peer_negotiation_protocol::{
    IceCandidate, ProtocolError, Role, SdpType, SessionDescription, SignalingMessage,
};
pub use utils::{
    set_panic_hook, ConnectionType, IceServer, DEFAULT_SIGNALING_SERVER_URL, DEFAULT_STUN_SERVER,
};
