#![forbid(unsafe_code)]

//! Per-instance state.
//!
//! Each modal definition owns exactly one [`ModalInstance`]. Its lifecycle is
//! an explicit [`ModalPhase`]; the class lists written to the host are derived
//! from a [`ClassModel`] that keeps structural (layout) classes and animation
//! classes in separate sets, so layout rewrites can never disturb an
//! in-flight animation.

use crate::classes::ClassSet;
use crate::config::ClassNames;
use crate::definition::{InstanceId, ModalDefinition};
use crate::host::{Part, TimerId};

/// Lifecycle phase of one instance.
///
/// ```text
/// Hidden ──open──▶ Opening ──animation end──▶ Open
///    ▲                │  ▲                     │
///    │              close └──────open──────┐  close
///    │                ▼                    │   ▼
///    └────cleanup── Closing ◀──────────────┴───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalPhase {
    #[default]
    Hidden,
    Opening,
    Open,
    Closing,
}

impl ModalPhase {
    /// Whether the container is un-hidden.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether the instance is opening or open (not on its way out).
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

/// Class lists of one instance, split by concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassModel {
    pub(crate) hidden: bool,
    pub(crate) container_layout: ClassSet,
    pub(crate) overlay_base: ClassSet,
    pub(crate) overlay_anim: ClassSet,
    pub(crate) content_layout: ClassSet,
    pub(crate) content_anim: ClassSet,
    pub(crate) footer: ClassSet,
}

impl ClassModel {
    /// Initial, hidden class model for a definition.
    #[must_use]
    pub fn new(def: &ModalDefinition, names: &ClassNames) -> Self {
        let mut model = Self {
            hidden: true,
            container_layout: ClassSet::new(),
            overlay_base: ClassSet::parse(&names.overlay_base),
            overlay_anim: ClassSet::new(),
            content_layout: ClassSet::new(),
            content_anim: ClassSet::new(),
            footer: ClassSet::parse(&names.footer_base),
        };
        model.set_layout(def, names);
        model
    }

    /// Rewrite the structural classes for `def`. Animation classes and the
    /// hidden flag are untouched.
    pub(crate) fn set_layout(&mut self, def: &ModalDefinition, names: &ClassNames) {
        self.container_layout = ClassSet::parse(&names.container_base).union(def.container());
        self.content_layout = ClassSet::parse(&names.content_base).union(def.content());
        self.footer
            .toggle(&names.footer_rounded, def.placement().rounds_footer());
    }

    /// Drop every animation class from overlay and content.
    pub(crate) fn reset_animation(&mut self) {
        self.overlay_anim.clear();
        self.content_anim.clear();
    }

    /// The full class list of `part` as the host should see it.
    #[must_use]
    pub fn render(&self, part: Part, names: &ClassNames) -> ClassSet {
        match part {
            Part::Container => {
                let mut set = self.container_layout.clone();
                if self.hidden {
                    set.insert(&names.hidden);
                }
                set
            }
            Part::Overlay => self.overlay_base.union(&self.overlay_anim),
            Part::Content => self.content_layout.union(&self.content_anim),
            Part::Footer => self.footer.clone(),
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Animation classes currently on the overlay.
    #[must_use]
    pub fn overlay_animation(&self) -> &ClassSet {
        &self.overlay_anim
    }

    /// Animation classes currently on the content.
    #[must_use]
    pub fn content_animation(&self) -> &ClassSet {
        &self.content_anim
    }
}

/// Live state of one modal.
#[derive(Debug, Clone)]
pub struct ModalInstance {
    pub(crate) id: InstanceId,
    pub(crate) original_type: InstanceId,
    pub(crate) layout_type: InstanceId,
    pub(crate) current_type: InstanceId,
    pub(crate) phase: ModalPhase,
    pub(crate) generation: u64,
    pub(crate) pending_cleanup: Option<TimerId>,
    pub(crate) overlay_delay: Option<String>,
    pub(crate) classes: ClassModel,
}

impl ModalInstance {
    pub(crate) fn new(def: &ModalDefinition, names: &ClassNames) -> Self {
        Self {
            id: def.id(),
            original_type: def.id(),
            layout_type: def.id(),
            current_type: def.id(),
            phase: ModalPhase::Hidden,
            generation: 0,
            pending_cleanup: None,
            overlay_delay: None,
            classes: ClassModel::new(def, names),
        }
    }

    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The definition this instance was built from. Never changes.
    #[must_use]
    pub fn original_type(&self) -> InstanceId {
        self.original_type
    }

    /// The definition whose layout is currently applied.
    #[must_use]
    pub fn layout_type(&self) -> InstanceId {
        self.layout_type
    }

    /// The type the instance was last opened as; selects the close animation.
    #[must_use]
    pub fn current_type(&self) -> InstanceId {
        self.current_type
    }

    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    /// Bumped on every open and close; stale deferred tasks carry an older value.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a cleanup timer is outstanding.
    #[must_use]
    pub fn has_pending_cleanup(&self) -> bool {
        self.pending_cleanup.is_some()
    }

    /// Overlay delay literal of the close in progress, if any.
    #[must_use]
    pub fn overlay_delay(&self) -> Option<&str> {
        self.overlay_delay.as_deref()
    }

    #[must_use]
    pub fn classes(&self) -> &ClassModel {
        &self.classes
    }

    #[must_use]
    pub fn is_layout_overridden(&self) -> bool {
        self.layout_type != self.original_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModalConfig;
    use crate::definition::DefinitionTable;

    fn setup(type_id: &str) -> (DefinitionTable, ClassNames, ModalInstance) {
        let config = ModalConfig::default();
        let table = DefinitionTable::from_config(&config).expect("valid");
        let def = table.get(table.lookup(type_id).expect("defined"));
        let instance = ModalInstance::new(def, &config.classes);
        (table, config.classes, instance)
    }

    #[test]
    fn new_instance_is_hidden_with_own_layout() {
        let (_, names, inst) = setup("pc-small-center");
        assert_eq!(inst.phase(), ModalPhase::Hidden);
        assert!(!inst.is_layout_overridden());
        assert_eq!(
            inst.classes().render(Part::Container, &names).to_string(),
            "modal-container fixed inset-0 z-50 flex items-center justify-center p-16 hidden"
        );
        assert_eq!(
            inst.classes().render(Part::Footer, &names).to_string(),
            "modal-footer rounded-b-2xl"
        );
    }

    #[test]
    fn bottom_sheet_footer_is_square() {
        let (_, names, inst) = setup("mo-small-bottom");
        assert_eq!(
            inst.classes().render(Part::Footer, &names).to_string(),
            "modal-footer"
        );
    }

    #[test]
    fn animation_classes_render_after_layout() {
        let (_, names, mut inst) = setup("pc-small-center");
        inst.classes.content_anim.insert("animated");
        inst.classes.content_anim.insert("modal-pc-small-center-open");
        let content = inst.classes().render(Part::Content, &names);
        assert!(content.to_string().ends_with("max-h-full animated modal-pc-small-center-open"));

        inst.classes.reset_animation();
        assert!(!inst.classes().render(Part::Content, &names).contains("animated"));
    }

    #[test]
    fn phase_predicates() {
        assert!(!ModalPhase::Hidden.is_visible());
        assert!(ModalPhase::Closing.is_visible());
        assert!(ModalPhase::Opening.is_open());
        assert!(!ModalPhase::Closing.is_open());
    }
}
