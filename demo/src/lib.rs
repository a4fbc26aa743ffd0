//! Browser page receiving a remote video through a negotiated session.
//!
//! Open `static/index.html` twice, once with `?polite` appended to the URL,
//! with a relay listening on `ws://localhost:5678/`.

#![cfg(target_arch = "wasm32")]

use log::info;
use peer_negotiation::browser::Session;
use peer_negotiation::{ConnectionType, Role, DEFAULT_SIGNALING_SERVER_URL};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlMediaElement, UrlSearchParams, Window};

const REMOTE_VIDEO_ID: &str = "remoteVideo";

fn role_from_query(window: &Window) -> Result<Role, JsValue> {
    let search = window.location().search()?;
    let params = UrlSearchParams::new_with_str(&search)?;
    Ok(if params.has("polite") {
        Role::Polite
    } else {
        Role::Impolite
    })
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let remote_video = window
        .document()
        .and_then(|document| document.get_element_by_id(REMOTE_VIDEO_ID))
        .ok_or_else(|| JsValue::from_str("no remote video element on the page"))?
        .dyn_into::<HtmlMediaElement>()?;

    let role = role_from_query(&window)?;
    info!("starting {} peer", role);

    let session = Session::new(
        DEFAULT_SIGNALING_SERVER_URL,
        role,
        &ConnectionType::default(),
    )
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    session.start(move |stream| {
        info!("remote stream available: {}", stream.id());
        remote_video.set_src_object(Some(&stream));
    });

    Ok(())
}
