#![forbid(unsafe_code)]

//! Browser host for the modalfx lifecycle engine.
//!
//! On `wasm32` this crate mounts automatically once the document is parsed:
//! it builds one modal per configured type inside `#modal-wrapper` from
//! `<template id="modal-template">`, then wires trigger buttons
//! (`.modal-trigger[data-modal-type]`), delegated dismiss clicks, Escape,
//! debounced resize and `animationend`.
//!
//! `open_modal` / `close_modal` are exported for scripts that want to drive
//! modals directly.
//!
//! The pure parts ([`delegate`], [`error`]) build on every target.

pub mod delegate;
pub mod error;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(all(target_arch = "wasm32", feature = "tracing"))]
pub mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;

pub use error::{WebError, WebResult};

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use modalfx_core::ModalConfig;
    use tracing::warn;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use crate::app::App;
    use crate::error::WebError;

    /// Module entry point.
    ///
    /// Mounts once the document is parsed. A page without the modal markup
    /// is logged and left alone; call [`mount`] to retry explicitly.
    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        #[cfg(feature = "tracing")]
        crate::console::init(tracing::Level::INFO);

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(WebError::NoDocument)?;

        if document.ready_state() == "loading" {
            let on_ready = Closure::once_into_js(auto_mount);
            document
                .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        } else {
            auto_mount();
        }
        Ok(())
    }

    /// Mount with the default configuration. A no-op once mounted.
    #[wasm_bindgen]
    pub fn mount() -> Result<(), JsValue> {
        App::mount(ModalConfig::default()).map_err(JsValue::from)
    }

    fn auto_mount() {
        if let Err(err) = App::mount(ModalConfig::default()) {
            warn!(%err, "modalfx not mounted");
        }
    }

    /// Open a modal by type. Returns `false` if nothing happened.
    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(type_id: &str) -> bool {
        App::current()
            .and_then(|app| App::with(&app, |app| app.open(type_id)))
            .unwrap_or(false)
    }

    /// Close a modal by type. Returns `false` if nothing happened.
    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(type_id: &str) -> bool {
        App::current()
            .and_then(|app| App::with(&app, |app| app.close(type_id)))
            .unwrap_or(false)
    }

    /// Whether background scrolling is currently locked.
    #[wasm_bindgen(js_name = isScrollLocked)]
    pub fn is_scroll_locked() -> bool {
        App::current().is_some_and(|app| app.borrow().is_scroll_locked())
    }

    /// Type identifiers of visible modals, oldest first.
    #[wasm_bindgen(js_name = visibleModals)]
    pub fn visible_modals() -> Vec<String> {
        App::current()
            .map(|app| app.borrow().visible_types())
            .unwrap_or_default()
    }
}
