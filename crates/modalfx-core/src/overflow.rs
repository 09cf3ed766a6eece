#![forbid(unsafe_code)]

//! Overflow reconciliation for mobile modals.
//!
//! A mobile modal whose content no longer fits the viewport switches to the
//! full-screen layout; once it fits again it switches back. Only the layout
//! changes. The animation classes (and therefore the open/close animation
//! of the original type) are left alone.
//!
//! The decision is a pure function of the instance's types and the current
//! measurements, so repeated calls with stable measurements are no-ops.

use crate::definition::{DefinitionTable, InstanceId};
use crate::host::Measurements;

/// Layout the instance should switch to, or `None` to stay put.
///
/// - Non-mobile originals never switch.
/// - Overflowing and not already full-screen → full-screen.
/// - Fitting and currently full-screen → original.
#[must_use]
pub fn reconcile(
    table: &DefinitionTable,
    original: InstanceId,
    layout: InstanceId,
    measurements: &Measurements,
) -> Option<InstanceId> {
    if !table.get(original).is_mobile() {
        return None;
    }

    let fullscreen = table.fullscreen();
    match (measurements.overflows(), layout == fullscreen) {
        (true, false) => Some(fullscreen),
        (false, true) => Some(original),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModalConfig;

    const TALL: Measurements = Measurements::new(60.0, 900.0, 60.0, 640.0);
    const SHORT: Measurements = Measurements::new(60.0, 200.0, 60.0, 640.0);

    fn table() -> DefinitionTable {
        DefinitionTable::from_config(&ModalConfig::default()).expect("valid")
    }

    #[test]
    fn mobile_overflow_goes_fullscreen() {
        let t = table();
        let id = t.lookup("mo-small-bottom").expect("defined");
        assert_eq!(reconcile(&t, id, id, &TALL), Some(t.fullscreen()));
    }

    #[test]
    fn fitting_fullscreen_reverts() {
        let t = table();
        let id = t.lookup("mo-medium-bottom").expect("defined");
        assert_eq!(reconcile(&t, id, t.fullscreen(), &SHORT), Some(id));
    }

    #[test]
    fn stable_conditions_do_not_flap() {
        let t = table();
        let id = t.lookup("mo-small-center").expect("defined");
        assert_eq!(reconcile(&t, id, id, &SHORT), None);
        assert_eq!(reconcile(&t, id, t.fullscreen(), &TALL), None);
    }

    #[test]
    fn desktop_types_never_switch() {
        let t = table();
        let id = t.lookup("pc-large-center").expect("defined");
        assert_eq!(reconcile(&t, id, id, &TALL), None);
        let full = t.fullscreen();
        assert_eq!(reconcile(&t, full, full, &TALL), None);
        assert_eq!(reconcile(&t, full, full, &SHORT), None);
    }

    #[test]
    fn exact_fit_is_not_overflow() {
        let t = table();
        let id = t.lookup("mo-small-center").expect("defined");
        let exact = Measurements::new(100.0, 440.0, 100.0, 640.0);
        assert_eq!(reconcile(&t, id, id, &exact), None);
    }
}
