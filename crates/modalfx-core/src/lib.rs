#![forbid(unsafe_code)]

//! Modal dialog lifecycle engine.
//!
//! This crate provides:
//! - [`Coordinator`] driving open/close animation, overflow-driven layout
//!   switching, scroll lock and the parallax effect for a fixed set of modal
//!   types
//! - [`ModalHost`], the seam to whatever renders the modals (the DOM in
//!   `modalfx-web`, [`HeadlessHost`] in tests)
//! - [`parse_duration`] for CSS `animation` shorthand timing
//! - [`ModalConfig`] with the stock modal catalogue, loadable from TOML/JSON
//!   behind the `config` feature
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use modalfx_core::{Harness, ModalConfig, ModalPhase};
//!
//! let mut page = Harness::new(ModalConfig::default()).unwrap();
//! page.open("pc-small-center");
//! page.frame();
//! assert!(page.coordinator.is_scroll_locked());
//!
//! page.close("pc-small-center");
//! page.advance(Duration::from_secs(1));
//! assert_eq!(page.coordinator.phase("pc-small-center"), Some(ModalPhase::Hidden));
//! assert!(!page.coordinator.is_scroll_locked());
//! ```

pub mod classes;
pub mod config;
pub mod coordinator;
pub mod definition;
pub mod diagnostics;
pub mod duration;
pub mod headless;
pub mod host;
pub mod input;
pub mod instance;
pub mod layout;
pub mod overflow;
pub mod size;

pub use classes::ClassSet;
pub use config::{ClassNames, ConfigError, DefinitionSpec, ModalConfig};
pub use coordinator::Coordinator;
pub use definition::{AnimationClasses, DefinitionTable, InstanceId, ModalDefinition};
pub use diagnostics::{DiagnosticHook, DiagnosticRecord, EventLog, LifecycleEvent};
pub use duration::{parse_duration, parse_duration_ms};
pub use headless::{Harness, HeadlessHost};
pub use host::{
    FrameTask, InstanceBlueprint, Measurements, ModalHost, PageFlags, PageTarget, Part, TimerId,
    TimerTask,
};
pub use input::{ClickRegion, ClickTarget, KeyInput};
pub use instance::{ClassModel, ModalInstance, ModalPhase};
pub use size::{OverlayDelays, Placement, Platform, SizeClass};
