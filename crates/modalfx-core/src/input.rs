#![forbid(unsafe_code)]

//! Input vocabulary the coordinator understands.

/// A keyboard key, reduced to what modals care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Escape,
    Other,
}

impl KeyInput {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Which part of a modal a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    /// The dimming backdrop itself (not something inside it).
    Overlay,
    /// The header close button or anything inside it.
    CloseButton,
    /// The footer confirm button or anything inside it.
    OkButton,
    /// Anywhere else inside the dialog body.
    Content,
}

impl ClickRegion {
    /// Whether a click here dismisses the modal.
    #[must_use]
    pub const fn dismisses(self) -> bool {
        matches!(self, Self::Overlay | Self::CloseButton | Self::OkButton)
    }
}

/// A click resolved to its owning modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTarget<'a> {
    /// Original type of the modal whose container holds the click target.
    pub type_id: &'a str,
    pub region: ClickRegion,
}

impl<'a> ClickTarget<'a> {
    #[must_use]
    pub const fn new(type_id: &'a str, region: ClickRegion) -> Self {
        Self { type_id, region }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_aliases() {
        assert_eq!(KeyInput::from_key("Escape"), KeyInput::Escape);
        assert_eq!(KeyInput::from_key("Esc"), KeyInput::Escape);
        assert_eq!(KeyInput::from_key("Enter"), KeyInput::Other);
        assert_eq!(KeyInput::from_key("escape"), KeyInput::Other);
    }

    #[test]
    fn dismissing_regions() {
        assert!(ClickRegion::Overlay.dismisses());
        assert!(ClickRegion::CloseButton.dismisses());
        assert!(ClickRegion::OkButton.dismisses());
        assert!(!ClickRegion::Content.dismisses());
    }
}
