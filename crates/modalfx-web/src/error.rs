#![forbid(unsafe_code)]

//! Errors raised while binding to the page.
//!
//! Only bootstrap surfaces these. Once mounted, DOM failures inside event
//! handlers are traced and swallowed.

use std::fmt;

/// Bootstrap and DOM errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// No `window` or `document` (not running in a browser page).
    NoDocument,
    /// A required element is missing; the payload is its selector.
    MissingElement(&'static str),
    /// The engine rejected its configuration.
    Config(String),
    /// A JavaScript call threw.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => write!(f, "no browser document available"),
            Self::MissingElement(selector) => write!(f, "required element '{selector}' not found"),
            Self::Config(msg) => write!(f, "invalid modal configuration: {msg}"),
            Self::Js(msg) => write!(f, "javascript error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<modalfx_core::ConfigError> for WebError {
    fn from(err: modalfx_core::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Result alias for this crate.
pub type WebResult<T> = Result<T, WebError>;
