#![forbid(unsafe_code)]

//! Layout application.
//!
//! Rewrites the structural classes of container, content and footer so they
//! match a target layout type, then pushes the three lists to the host.
//!
//! # Invariants
//!
//! - The hidden flag survives: a hidden container stays hidden.
//! - Content animation classes survive untouched.
//! - The footer rounded-corner modifier is present iff the target layout has
//!   center placement.
//! - Applying the same layout twice yields identical class lists.

use crate::config::ClassNames;
use crate::definition::ModalDefinition;
use crate::host::{ModalHost, Part};
use crate::instance::ModalInstance;

const LAYOUT_PARTS: [Part; 3] = [Part::Container, Part::Content, Part::Footer];

/// Apply `target`'s layout to `instance` and write the result to `host`.
///
/// This only changes class lists; `instance.layout_type` is the caller's
/// responsibility.
pub fn apply_layout<H: ModalHost + ?Sized>(
    host: &mut H,
    instance: &mut ModalInstance,
    target: &ModalDefinition,
    names: &ClassNames,
) {
    instance.classes.set_layout(target, names);
    for part in LAYOUT_PARTS {
        host.write_classes(instance.id, part, &instance.classes.render(part, names));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModalConfig;
    use crate::definition::DefinitionTable;
    use crate::headless::HeadlessHost;
    use pretty_assertions::assert_eq;

    fn fixture(type_id: &str) -> (ModalConfig, DefinitionTable, ModalInstance) {
        let config = ModalConfig::default();
        let table = DefinitionTable::from_config(&config).expect("valid");
        let instance = ModalInstance::new(
            table.get(table.lookup(type_id).expect("defined")),
            &config.classes,
        );
        (config, table, instance)
    }

    fn snapshot(host: &HeadlessHost, instance: &ModalInstance) -> Vec<String> {
        LAYOUT_PARTS
            .iter()
            .map(|&part| host.classes(instance.id(), part).unwrap_or_default())
            .collect()
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let (config, table, mut inst) = fixture("pc-medium-center");
        let mut host = HeadlessHost::new();
        let target = table.get(inst.id());

        apply_layout(&mut host, &mut inst, target, &config.classes);
        let first = snapshot(&host, &inst);
        apply_layout(&mut host, &mut inst, target, &config.classes);
        let second = snapshot(&host, &inst);

        assert_eq!(first, second);
    }

    #[test]
    fn hidden_flag_survives() {
        let (config, table, mut inst) = fixture("mo-small-center");
        let mut host = HeadlessHost::new();
        let full = table.get(table.fullscreen());

        apply_layout(&mut host, &mut inst, full, &config.classes);
        let container = host.classes(inst.id(), Part::Container).unwrap_or_default();
        assert!(container.ends_with(" hidden"));
        assert!(container.contains("p-0"));
        assert!(!container.contains("px-4"));
    }

    #[test]
    fn animation_classes_survive() {
        let (config, table, mut inst) = fixture("mo-small-center");
        let mut host = HeadlessHost::new();
        inst.classes.hidden = false;
        inst.classes.content_anim.insert("animated");
        inst.classes.content_anim.insert("modal-mo-small-center-open");

        apply_layout(&mut host, &mut inst, table.get(table.fullscreen()), &config.classes);

        let content = host.classes(inst.id(), Part::Content).unwrap_or_default();
        assert_eq!(
            content,
            "modal-body bg-white shadow-2xl z-10 flex flex-col w-full h-full rounded-none m-0 \
             animated modal-mo-small-center-open"
        );
    }

    #[test]
    fn footer_rounding_follows_target_placement() {
        let (config, table, mut inst) = fixture("mo-small-center");
        let mut host = HeadlessHost::new();

        apply_layout(&mut host, &mut inst, table.get(table.fullscreen()), &config.classes);
        assert_eq!(host.classes(inst.id(), Part::Footer).as_deref(), Some("modal-footer"));

        let own = table.get(inst.original_type());
        apply_layout(&mut host, &mut inst, own, &config.classes);
        assert_eq!(
            host.classes(inst.id(), Part::Footer).as_deref(),
            Some("modal-footer rounded-b-2xl")
        );
    }
}
