#![forbid(unsafe_code)]

//! End-to-end lifecycle scenarios against the headless host.

use std::time::Duration;

use modalfx_core::{
    ClickRegion, EventLog, Harness, LifecycleEvent, Measurements, ModalConfig, ModalPhase,
    PageTarget, Part,
};
use pretty_assertions::assert_eq;

const TALL: Measurements = Measurements::new(64.0, 1800.0, 72.0, 640.0);
const SHORT: Measurements = Measurements::new(64.0, 240.0, 72.0, 640.0);

fn page() -> Harness {
    Harness::new(ModalConfig::default()).expect("default config is valid")
}

// ============================================================================
// Open / close
// ============================================================================

#[test]
fn small_desktop_modal_full_cycle() {
    let mut h = page();
    let id = h.id("pc-small-center");

    h.open("pc-small-center");
    h.frame();
    assert!(h.host.has_class(id, Part::Content, "modal-pc-small-center-open"));
    assert!(h.coordinator.is_scroll_locked());

    h.close("pc-small-center");
    h.frame();
    assert_eq!(h.host.property(id, "--overlay-delay"), Some("50ms"));
    assert!(h.host.has_class(id, Part::Overlay, "modal-overlay-close-dynamic"));
    assert!(h.host.has_class(id, Part::Content, "modal-pc-small-center-close"));
    assert!(!h.host.has_class(id, Part::Content, "modal-pc-small-center-open"));

    // Content 300ms beats overlay 200ms + 50ms.
    h.advance_ms(299);
    assert_eq!(h.coordinator.phase("pc-small-center"), Some(ModalPhase::Closing));
    assert!(!h.host.has_class(id, Part::Container, "hidden"));

    h.advance_ms(1);
    assert_eq!(h.coordinator.phase("pc-small-center"), Some(ModalPhase::Hidden));
    assert!(h.host.has_class(id, Part::Container, "hidden"));
    assert_eq!(h.host.property(id, "--overlay-delay"), None);
    assert!(!h.coordinator.is_scroll_locked());
    assert!(!h.host.page_has_class(PageTarget::Body, "overflow-hidden"));
}

#[test]
fn large_modal_waits_for_delayed_overlay() {
    let mut h = page();
    let id = h.id("pc-large-center");
    let log = EventLog::new();
    h.coordinator.set_diagnostics(log.hook());

    h.open("pc-large-center");
    h.frame();
    h.close("pc-large-center");
    h.frame();
    assert_eq!(h.host.property(id, "--overlay-delay"), Some("300ms"));

    assert!(log.events().contains(&LifecycleEvent::CloseScheduled {
        type_id: "pc-large-center".into(),
        wait: Duration::from_millis(500),
    }));

    h.advance_ms(499);
    assert_eq!(h.coordinator.phase("pc-large-center"), Some(ModalPhase::Closing));
    h.advance_ms(1);
    assert_eq!(h.coordinator.phase("pc-large-center"), Some(ModalPhase::Hidden));
}

#[test]
fn missing_animation_cleans_up_immediately() {
    let mut coordinator = modalfx_core::Coordinator::new(ModalConfig::default()).expect("valid");
    let mut host = modalfx_core::HeadlessHost::new();
    coordinator.mount(&mut host);

    coordinator.open(&mut host, "pc-medium-center");
    host.run_frames(&mut coordinator);
    coordinator.close(&mut host, "pc-medium-center");
    host.advance(&mut coordinator, Duration::ZERO);

    assert_eq!(coordinator.phase("pc-medium-center"), Some(ModalPhase::Hidden));
    assert!(!coordinator.is_scroll_locked());
}

#[test]
fn event_sequence_of_one_cycle() {
    let mut h = page();
    let log = EventLog::new();
    h.coordinator.set_diagnostics(log.hook());

    h.open("pc-medium-center");
    h.frame();
    h.coordinator.animation_finished("pc-medium-center");
    h.close("pc-medium-center");
    h.advance_ms(1_000);

    let t = || "pc-medium-center".to_string();
    assert_eq!(
        log.events(),
        vec![
            LifecycleEvent::ScrollLock(true),
            LifecycleEvent::Opened { type_id: t() },
            LifecycleEvent::OpenAnimated { type_id: t() },
            LifecycleEvent::Settled { type_id: t() },
            LifecycleEvent::CloseStarted {
                type_id: t(),
                overlay_delay: "150ms".into()
            },
            LifecycleEvent::CloseScheduled {
                type_id: t(),
                wait: Duration::from_millis(350)
            },
            LifecycleEvent::ScrollLock(false),
            LifecycleEvent::Hidden { type_id: t() },
        ]
    );
}

// ============================================================================
// Page-level effects
// ============================================================================

#[test]
fn scroll_lock_held_while_any_modal_visible() {
    let mut h = page();
    h.open("pc-small-center");
    h.open("mo-small-center");
    h.frame();

    h.close("pc-small-center");
    h.advance_ms(1_000);
    assert_eq!(h.coordinator.visible_types(), vec!["mo-small-center"]);
    assert!(h.coordinator.is_scroll_locked());

    h.close("mo-small-center");
    h.advance_ms(1_000);
    assert!(h.coordinator.visible().is_empty());
    assert!(!h.coordinator.is_scroll_locked());
}

#[test]
fn parallax_follows_fullscreen_modal() {
    let mut h = page();
    h.open("mo-large-full");
    assert!(!h.coordinator.is_parallax_active());

    h.frame();
    assert!(h.coordinator.is_parallax_active());
    assert!(h.host.page_has_class(PageTarget::MainContent, "parallax-effect"));

    h.close("mo-large-full");
    assert!(!h.coordinator.is_parallax_active());
    assert!(!h.host.page_has_class(PageTarget::MainContent, "parallax-effect"));
}

#[test]
fn overflow_fallback_does_not_enable_parallax() {
    let mut h = page();
    let id = h.id("mo-small-bottom");
    h.host.set_measurements(id, TALL);

    h.open("mo-small-bottom");
    h.frame();
    assert_eq!(
        h.coordinator.instance("mo-small-bottom").map(|i| i.layout_type()),
        Some(h.id("mo-large-full"))
    );
    assert!(!h.coordinator.is_parallax_active());
}

// ============================================================================
// Overflow reconciliation
// ============================================================================

#[test]
fn overflow_switches_layout_but_keeps_own_animation() {
    let mut h = page();
    let id = h.id("mo-medium-bottom");
    h.host.set_measurements(id, TALL);

    h.open("mo-medium-bottom");
    h.frame();

    let container = h.host.classes(id, Part::Container).expect("built");
    assert!(container.contains("p-0"));
    assert!(!container.contains("items-end"));
    assert!(h.host.has_class(id, Part::Content, "modal-mo-medium-bottom-open"));
    assert!(!h.host.has_class(id, Part::Content, "modal-mo-large-full-open"));
    assert_eq!(h.host.classes(id, Part::Footer).as_deref(), Some("modal-footer"));

    h.close("mo-medium-bottom");
    h.frame();
    assert!(h.host.has_class(id, Part::Content, "modal-mo-medium-bottom-close"));

    h.advance_ms(1_000);
    let container = h.host.classes(id, Part::Container).expect("built");
    assert!(container.contains("items-end"));
    assert!(container.ends_with("hidden"));
    let instance = h.coordinator.instance("mo-medium-bottom").expect("defined");
    assert!(!instance.is_layout_overridden());
}

#[test]
fn reconciliation_round_trip_without_flapping() {
    let mut h = page();
    let id = h.id("mo-small-center");
    let log = EventLog::new();

    h.host.set_measurements(id, SHORT);
    h.open("mo-small-center");
    h.frame();
    h.coordinator.set_diagnostics(log.hook());

    h.host.set_measurements(id, TALL);
    assert!(h.coordinator.reconcile(&mut h.host, "mo-small-center"));
    assert!(!h.coordinator.reconcile(&mut h.host, "mo-small-center"));

    h.host.set_measurements(id, SHORT);
    assert!(h.coordinator.reconcile(&mut h.host, "mo-small-center"));
    assert!(!h.coordinator.reconcile(&mut h.host, "mo-small-center"));

    let switches: Vec<_> = log
        .events()
        .into_iter()
        .filter(|e| matches!(e, LifecycleEvent::LayoutSwitched { .. }))
        .collect();
    assert_eq!(switches.len(), 2);
    assert_eq!(
        h.host.classes(id, Part::Footer).as_deref(),
        Some("modal-footer rounded-b-2xl")
    );
}

#[test]
fn desktop_modals_ignore_overflow() {
    let mut h = page();
    let id = h.id("pc-large-center");
    h.host.set_measurements(id, TALL);
    h.open("pc-large-center");
    h.frame();
    assert!(!h.coordinator.reconcile(&mut h.host, "pc-large-center"));
    assert_eq!(
        h.coordinator.instance("pc-large-center").map(|i| i.layout_type()),
        Some(id)
    );
}

// ============================================================================
// Races
// ============================================================================

#[test]
fn reopen_during_close_survives_stale_cleanup() {
    let mut h = page();
    let id = h.id("pc-small-center");
    let log = EventLog::new();
    h.coordinator.set_diagnostics(log.hook());

    h.open("pc-small-center");
    h.frame();
    h.close("pc-small-center");
    h.frame();
    h.advance_ms(100);

    h.open("pc-small-center");
    assert!(!h.coordinator.instance("pc-small-center").expect("defined").has_pending_cleanup());
    assert_eq!(h.host.pending_timers(), 0);
    assert_eq!(h.host.property(id, "--overlay-delay"), None);
    assert!(!h.host.has_class(id, Part::Content, "modal-pc-small-center-close"));

    h.advance_ms(1_000);
    assert_eq!(h.coordinator.phase("pc-small-center"), Some(ModalPhase::Opening));
    assert!(!h.host.has_class(id, Part::Container, "hidden"));
    assert!(h.host.has_class(id, Part::Content, "modal-pc-small-center-open"));
    assert!(h.coordinator.is_scroll_locked());
    assert!(!log.events().iter().any(|e| matches!(e, LifecycleEvent::Hidden { .. })));
}

#[test]
fn reopen_before_close_frame_drops_close_frame() {
    let mut h = page();
    let id = h.id("pc-medium-center");
    h.open("pc-medium-center");
    h.frame();

    h.close("pc-medium-center");
    h.open("pc-medium-center");
    h.advance_ms(1_000);

    assert_eq!(h.coordinator.phase("pc-medium-center"), Some(ModalPhase::Opening));
    assert!(!h.host.has_class(id, Part::Overlay, "modal-overlay-close-dynamic"));
    assert!(h.host.has_class(id, Part::Overlay, "modal-overlay-open"));
}

// ============================================================================
// Input routing
// ============================================================================

#[test]
fn overlay_and_buttons_dismiss_body_does_not() {
    let mut h = page();
    for region in [ClickRegion::Overlay, ClickRegion::CloseButton, ClickRegion::OkButton] {
        h.open("pc-small-center");
        h.frame();
        assert!(!h.click("pc-small-center", ClickRegion::Content));
        assert!(h.click("pc-small-center", region), "{region:?} should dismiss");
        h.advance_ms(1_000);
        assert_eq!(h.coordinator.phase("pc-small-center"), Some(ModalPhase::Hidden));
    }
}

#[test]
fn escape_with_nothing_open_is_ignored() {
    let mut h = page();
    assert!(!h.escape());
    assert!(!h.coordinator.is_scroll_locked());
}

#[test]
fn resize_burst_reconciles_once_after_quiet_window() {
    let mut h = page();
    let id = h.id("mo-small-center");
    let log = EventLog::new();

    h.open("mo-small-center");
    h.frame();
    h.coordinator.set_diagnostics(log.hook());

    h.host.set_measurements(id, TALL);
    for _ in 0..10 {
        h.resize();
        h.advance_ms(20);
    }
    assert!(log.is_empty());

    h.advance_ms(130);
    assert_eq!(log.len(), 1);
    assert_eq!(
        h.coordinator.instance("mo-small-center").map(|i| i.layout_type()),
        Some(h.id("mo-large-full"))
    );
}

#[test]
fn custom_debounce_window_is_honoured() {
    let config = ModalConfig::default().resize_debounce(Duration::from_millis(40));
    let mut h = Harness::new(config).expect("valid");
    let id = h.id("mo-small-bottom");
    h.open("mo-small-bottom");
    h.frame();
    h.host.set_measurements(id, TALL);

    h.resize();
    h.advance_ms(40);
    assert!(h.coordinator.instance("mo-small-bottom").expect("defined").is_layout_overridden());
}
