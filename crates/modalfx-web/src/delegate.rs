#![forbid(unsafe_code)]

//! Click delegation.
//!
//! One listener on the modal wrapper handles every dismiss click. The DOM
//! layer records the ancestor chain of the click target (target first,
//! wrapper excluded) and this module decides which modal, if any, the click
//! belongs to and what it hit. Kept free of `web-sys` so it runs in native
//! tests.

use modalfx_core::{ClassSet, ClickRegion, ClickTarget};

/// Marker classes from the page template.
///
/// The first three must stay in the matching [`ClassNames`] bases
/// (`container_base`, `overlay_base`, `content_base`). The host mounts with
/// the default names, which carry them.
///
/// [`ClassNames`]: modalfx_core::ClassNames
pub mod marker {
    pub const CONTAINER: &str = "modal-container";
    pub const OVERLAY: &str = "modal-overlay";
    pub const CONTENT: &str = "modal-body";
    pub const CLOSE_BUTTON: &str = "modal-close-btn";
    pub const OK_BUTTON: &str = "modal-ok-btn";
}

/// Data attribute on each container naming its modal type.
pub const ORIGINAL_TYPE_ATTR: &str = "data-original-type";

/// One element on the path from the click target up to the wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNode {
    pub classes: ClassSet,
    /// Value of [`ORIGINAL_TYPE_ATTR`], if the element carries it.
    pub original_type: Option<String>,
}

impl PathNode {
    #[must_use]
    pub fn new(classes: &str, original_type: Option<&str>) -> Self {
        Self {
            classes: ClassSet::parse(classes),
            original_type: original_type.map(str::to_owned),
        }
    }

    fn is(&self, marker: &str) -> bool {
        self.classes.contains(marker)
    }
}

/// Resolve a click path (target first) to its modal and region.
///
/// - The overlay only counts when it is the target itself; its parent is
///   the container.
/// - A close or OK button counts when it is the target or an ancestor of it.
/// - Anything else inside a container is [`ClickRegion::Content`].
/// - Paths that never reach a container resolve to `None`.
#[must_use]
pub fn resolve_click(path: &[PathNode]) -> Option<ClickTarget<'_>> {
    let target = path.first()?;

    if target.is(marker::OVERLAY) {
        let container = path.get(1).filter(|n| n.is(marker::CONTAINER))?;
        let type_id = container.original_type.as_deref()?;
        return Some(ClickTarget::new(type_id, ClickRegion::Overlay));
    }

    let button = path.iter().find_map(|node| {
        if node.is(marker::CLOSE_BUTTON) {
            Some(ClickRegion::CloseButton)
        } else if node.is(marker::OK_BUTTON) {
            Some(ClickRegion::OkButton)
        } else {
            None
        }
    });

    let container = path.iter().find(|n| n.is(marker::CONTAINER))?;
    let type_id = container.original_type.as_deref()?;
    Some(ClickTarget::new(
        type_id,
        button.unwrap_or(ClickRegion::Content),
    ))
}
