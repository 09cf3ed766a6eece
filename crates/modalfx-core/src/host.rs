#![forbid(unsafe_code)]

//! The seam between the lifecycle engine and whatever renders the modals.
//!
//! The engine never touches a document directly. It pushes complete class
//! lists and one custom property through [`ModalHost`], reads back layout
//! measurements and computed animation descriptors, and asks the host to run
//! two kinds of deferred work:
//!
//! - a [`FrameTask`] on the next animation frame, after the host has
//!   committed every mutation issued before the request;
//! - a [`TimerTask`] after a delay, cancellable through its [`TimerId`].
//!
//! Tasks are plain data. When one fires the host hands it back to
//! [`Coordinator::run_frame`](crate::Coordinator::run_frame) or
//! [`Coordinator::run_timer`](crate::Coordinator::run_timer). Every
//! instance-scoped task carries the instance generation it was scheduled
//! under; the coordinator drops tasks whose generation is stale, so a host
//! that cannot cancel timers is still correct.

use std::time::Duration;

use bitflags::bitflags;

use crate::classes::ClassSet;
use crate::definition::InstanceId;

/// Element of a modal instance whose class list the engine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// Full-viewport flex container; carries the hidden flag and layout.
    Container,
    /// Dimming backdrop; carries the overlay animation classes.
    Overlay,
    /// The dialog body; carries layout and per-type animation classes.
    Content,
    /// Footer bar; carries the rounded-corner modifier.
    Footer,
}

/// Page-level element outside any modal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageTarget {
    /// Document body; receives the scroll-lock class.
    Body,
    /// Main page content; receives the parallax class.
    MainContent,
}

bitflags! {
    /// Page-level effects currently applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PageFlags: u8 {
        /// Background scrolling disabled.
        const SCROLL_LOCK = 1 << 0;
        /// Parallax treatment on the main content.
        const PARALLAX = 1 << 1;
    }
}

/// Rendered heights of one instance, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    /// Header offset height.
    pub header: f64,
    /// Scroll height of the main content region (full content, not clipped).
    pub main_scroll: f64,
    /// Footer offset height.
    pub footer: f64,
    /// Client height of the container.
    pub available: f64,
}

impl Measurements {
    pub const fn new(header: f64, main_scroll: f64, footer: f64, available: f64) -> Self {
        Self {
            header,
            main_scroll,
            footer,
            available,
        }
    }

    /// Height the content needs to show without scrolling.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.header + self.main_scroll + self.footer
    }

    /// Whether the content needs more room than the container offers.
    #[must_use]
    pub fn overflows(&self) -> bool {
        self.content_height() > self.available
    }
}

/// Everything a host needs to build one instance's elements.
#[derive(Debug, Clone)]
pub struct InstanceBlueprint<'a> {
    pub id: InstanceId,
    pub type_id: &'a str,
    pub title: String,
    /// Number of filler paragraphs in the main content.
    pub paragraphs: usize,
    pub filler_text: &'a str,
    pub container: ClassSet,
    pub overlay: ClassSet,
    pub content: ClassSet,
    pub footer: ClassSet,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Work to run on the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Reconcile layout and start the open animation.
    Open { id: InstanceId, generation: u64 },
    /// Start the close animation and schedule cleanup.
    Close { id: InstanceId, generation: u64 },
}

/// Work to run after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Close animation finished: hide the instance and release resources.
    Cleanup { id: InstanceId, generation: u64 },
    /// Resize burst went quiet.
    ResizeSettled { epoch: u64 },
}

/// A rendering backend the coordinator drives.
///
/// Implementations must apply writes in call order and must only run a
/// requested frame task after the writes that preceded the request are
/// visible to the renderer.
pub trait ModalHost {
    /// Build the elements of one instance, hidden. Called once per instance.
    fn create_instance(&mut self, blueprint: &InstanceBlueprint<'_>);

    /// Replace the class list of one instance element.
    fn write_classes(&mut self, id: InstanceId, part: Part, classes: &ClassSet);

    /// Set (`Some`) or remove (`None`) a custom property on the overlay.
    fn set_overlay_property(&mut self, id: InstanceId, name: &str, value: Option<&str>);

    /// Add or remove a class on a page-level element.
    fn set_page_class(&mut self, target: PageTarget, class: &str, on: bool);

    /// Current rendered heights of an instance.
    fn measure(&self, id: InstanceId) -> Measurements;

    /// Computed `animation` shorthand of an instance element, if any.
    fn computed_animation(&self, id: InstanceId, part: Part) -> Option<String>;

    /// Run `task` on the next animation frame.
    fn request_frame(&mut self, task: FrameTask);

    /// Run `task` once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancel a scheduled timer. Unknown or fired ids are ignored.
    fn cancel(&mut self, timer: TimerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_strict() {
        let fits = Measurements::new(50.0, 400.0, 50.0, 500.0);
        assert_eq!(fits.content_height(), 500.0);
        assert!(!fits.overflows());

        let over = Measurements::new(50.0, 401.0, 50.0, 500.0);
        assert!(over.overflows());
    }

    #[test]
    fn page_flags_compose() {
        let mut flags = PageFlags::empty();
        flags.insert(PageFlags::SCROLL_LOCK);
        flags.set(PageFlags::PARALLAX, true);
        assert!(flags.contains(PageFlags::SCROLL_LOCK | PageFlags::PARALLAX));
        flags.remove(PageFlags::SCROLL_LOCK);
        assert_eq!(flags, PageFlags::PARALLAX);
    }
}
