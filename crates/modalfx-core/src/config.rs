#![forbid(unsafe_code)]

//! Configuration for the modal engine.
//!
//! [`ModalConfig::default()`] reproduces the stock page: seven modal types
//! (three mobile, four desktop), the full-screen mobile fallback, the overlay
//! delay table and the utility-class names the stylesheet expects.
//!
//! With the `config` feature the same structure can be loaded from JSON or
//! TOML. Every field is optional in the document; missing fields keep their
//! defaults.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Result |
//! |---------|-------|--------|
//! | No definitions | Empty `definitions` list | [`ConfigError::EmptyDefinitions`] |
//! | Duplicate type | Same `type_id` twice | [`ConfigError::DuplicateType`] |
//! | Dangling reference | Mobile/full-screen/parallax type not defined | [`ConfigError::UndefinedType`] |
//! | Fallback is mobile | Full-screen type listed as mobile | [`ConfigError::FullscreenIsMobile`] |
//! | Bad document | JSON/TOML syntax or type error | [`ConfigError::Parse`] |

use std::fmt;
use std::time::Duration;

use ahash::AHashSet;

use crate::size::OverlayDelays;

/// Errors from configuration validation and loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The definition table is empty.
    EmptyDefinitions,
    /// A type identifier is defined more than once.
    DuplicateType(String),
    /// A type referenced by `role` has no definition.
    UndefinedType { role: &'static str, type_id: String },
    /// The full-screen fallback type is itself listed as a mobile type.
    FullscreenIsMobile(String),
    /// A configuration document could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDefinitions => write!(f, "no modal definitions configured"),
            Self::DuplicateType(t) => write!(f, "modal type '{t}' is defined more than once"),
            Self::UndefinedType { role, type_id } => {
                write!(f, "{role} type '{type_id}' has no definition")
            }
            Self::FullscreenIsMobile(t) => {
                write!(f, "full-screen type '{t}' must not be a mobile type")
            }
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One modal variant: its type identifier and structural classes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinitionSpec {
    /// Type identifier, e.g. `"mo-small-center"`.
    pub type_id: String,
    /// Structural classes added to the container.
    pub container: String,
    /// Structural classes added to the content element.
    pub content: String,
    /// Content open animation class. Defaults to `modal-<type>-open`.
    #[cfg_attr(feature = "config", serde(default))]
    pub open_animation: Option<String>,
    /// Content close animation class. Defaults to `modal-<type>-close`.
    #[cfg_attr(feature = "config", serde(default))]
    pub close_animation: Option<String>,
}

impl DefinitionSpec {
    /// Create a definition with default animation class names.
    pub fn new(
        type_id: impl Into<String>,
        container: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            container: container.into(),
            content: content.into(),
            open_animation: None,
            close_animation: None,
        }
    }

    /// Override the content open animation class.
    #[must_use]
    pub fn open_animation(mut self, class: impl Into<String>) -> Self {
        self.open_animation = Some(class.into());
        self
    }

    /// Override the content close animation class.
    #[must_use]
    pub fn close_animation(mut self, class: impl Into<String>) -> Self {
        self.close_animation = Some(class.into());
        self
    }
}

/// Class names and the custom property the stylesheet is written against.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ClassNames {
    pub container_base: String,
    pub hidden: String,
    pub overlay_base: String,
    pub content_base: String,
    pub footer_base: String,
    pub footer_rounded: String,
    pub animated: String,
    pub overlay_open: String,
    pub overlay_close_dynamic: String,
    pub scroll_lock: String,
    pub parallax: String,
    pub overlay_delay_property: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            container_base: "modal-container fixed inset-0 z-50 flex".into(),
            hidden: "hidden".into(),
            overlay_base: "modal-overlay absolute inset-0".into(),
            content_base: "modal-body bg-white shadow-2xl z-10 flex flex-col".into(),
            footer_base: "modal-footer".into(),
            footer_rounded: "rounded-b-2xl".into(),
            animated: "animated".into(),
            overlay_open: "modal-overlay-open".into(),
            overlay_close_dynamic: "modal-overlay-close-dynamic".into(),
            scroll_lock: "overflow-hidden".into(),
            parallax: "parallax-effect".into(),
            overlay_delay_property: "--overlay-delay".into(),
        }
    }
}

const FILLER_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed non risus. \
Suspendisse lectus tortor, dignissim sit amet, adipiscing nec, ultricies sed, dolor. Cras elementum \
ultrices diam. Maecenas ligula massa, varius a, semper congue, euismod non, mi. Proin porttitor, orci \
nec nonummy molestie, enim est eleifend mi, non fermentum diam nisl sit amet erat. Duis semper. Duis \
arcu massa, scelerisque vitae, consequat in, pretium a, enim. Pellentesque congue.";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ModalConfig {
    /// Modal variants, in mount order.
    pub definitions: Vec<DefinitionSpec>,
    /// Types that participate in overflow reconciliation.
    pub mobile_types: Vec<String>,
    /// Layout a mobile modal falls back to when its content overflows.
    pub fullscreen_type: String,
    /// Type whose open state drives the main-content parallax class.
    pub parallax_type: String,
    /// Overlay fade-out delay per size class.
    pub overlay_delays: OverlayDelays,
    /// Class names and custom property names.
    pub classes: ClassNames,
    /// Paragraph text each instance body is filled with.
    pub filler_text: String,
    /// Title prefix; the type identifier is appended.
    pub title_prefix: String,
    /// Quiet window before a resize burst triggers reconciliation.
    pub resize_debounce_ms: u64,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            definitions: vec![
                DefinitionSpec::new(
                    "mo-small-center",
                    "items-center justify-center px-4 py-12",
                    "rounded-2xl w-full max-w-md max-h-full",
                ),
                DefinitionSpec::new(
                    "mo-small-bottom",
                    "items-end justify-center pt-12",
                    "w-full rounded-t-2xl max-h-full",
                ),
                DefinitionSpec::new(
                    "mo-medium-bottom",
                    "items-end justify-center pt-12",
                    "w-full rounded-t-2xl max-h-full",
                ),
                DefinitionSpec::new(
                    "mo-large-full",
                    "items-center justify-center p-0",
                    "w-full h-full rounded-none m-0",
                ),
                DefinitionSpec::new(
                    "pc-small-center",
                    "items-center justify-center p-16",
                    "rounded-2xl w-full max-w-lg max-h-full",
                ),
                DefinitionSpec::new(
                    "pc-medium-center",
                    "items-center justify-center p-16",
                    "rounded-2xl w-full max-w-xl max-h-full",
                ),
                DefinitionSpec::new(
                    "pc-large-center",
                    "items-center justify-center p-16",
                    "rounded-2xl w-full max-w-2xl max-h-full",
                ),
            ],
            mobile_types: vec![
                "mo-small-center".into(),
                "mo-small-bottom".into(),
                "mo-medium-bottom".into(),
            ],
            fullscreen_type: "mo-large-full".into(),
            parallax_type: "mo-large-full".into(),
            overlay_delays: OverlayDelays::default(),
            classes: ClassNames::default(),
            filler_text: FILLER_TEXT.into(),
            title_prefix: "Modal type: ".into(),
            resize_debounce_ms: 150,
        }
    }
}

impl ModalConfig {
    /// Replace the definition table.
    #[must_use]
    pub fn definitions(mut self, definitions: Vec<DefinitionSpec>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Replace the mobile type list.
    #[must_use]
    pub fn mobile_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.mobile_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the full-screen fallback type.
    #[must_use]
    pub fn fullscreen_type(mut self, type_id: impl Into<String>) -> Self {
        self.fullscreen_type = type_id.into();
        self
    }

    /// Set the parallax type.
    #[must_use]
    pub fn parallax_type(mut self, type_id: impl Into<String>) -> Self {
        self.parallax_type = type_id.into();
        self
    }

    /// Set the overlay delay table.
    #[must_use]
    pub fn overlay_delays(mut self, delays: OverlayDelays) -> Self {
        self.overlay_delays = delays;
        self
    }

    /// Set the class names.
    #[must_use]
    pub fn classes(mut self, classes: ClassNames) -> Self {
        self.classes = classes;
        self
    }

    /// Set the resize debounce window.
    #[must_use]
    pub fn resize_debounce(mut self, window: Duration) -> Self {
        self.resize_debounce_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Resize debounce window.
    #[must_use]
    pub fn resize_debounce_window(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Check cross-references between fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.definitions.is_empty() {
            return Err(ConfigError::EmptyDefinitions);
        }

        let mut seen = AHashSet::with_capacity(self.definitions.len());
        for def in &self.definitions {
            if !seen.insert(def.type_id.as_str()) {
                return Err(ConfigError::DuplicateType(def.type_id.clone()));
            }
        }

        let require = |role: &'static str, type_id: &str| {
            if seen.contains(type_id) {
                Ok(())
            } else {
                Err(ConfigError::UndefinedType {
                    role,
                    type_id: type_id.to_owned(),
                })
            }
        };
        for mobile in &self.mobile_types {
            require("mobile", mobile)?;
        }
        require("full-screen", &self.fullscreen_type)?;
        require("parallax", &self.parallax_type)?;

        if self.mobile_types.contains(&self.fullscreen_type) {
            return Err(ConfigError::FullscreenIsMobile(self.fullscreen_type.clone()));
        }
        Ok(())
    }

    /// Load and validate a JSON document.
    #[cfg(feature = "config")]
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML document.
    #[cfg(feature = "config")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
