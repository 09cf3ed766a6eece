#![forbid(unsafe_code)]

//! Observable lifecycle events.
//!
//! The engine is silent by default: failures such as unknown types or stale
//! timers degrade to no-ops. Embedders and tests that want to see what
//! happened install a [`DiagnosticHook`] on the coordinator. Transitions are
//! also emitted as `tracing` events regardless of the hook.
//!
//! [`EventLog`] is a ready-made hook target that timestamps and keeps every
//! event.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// Something the coordinator did (or declined to do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Container un-hidden, open frame requested.
    Opened { type_id: String },
    /// Open animation classes applied.
    OpenAnimated { type_id: String },
    /// Open animation reported finished.
    Settled { type_id: String },
    /// Close requested; close frame requested with this overlay delay.
    CloseStarted {
        type_id: String,
        overlay_delay: String,
    },
    /// Close animation classes applied; cleanup runs after `wait`.
    CloseScheduled { type_id: String, wait: Duration },
    /// Container hidden again.
    Hidden { type_id: String },
    /// Overflow reconciliation switched layouts.
    LayoutSwitched {
        type_id: String,
        from: String,
        to: String,
    },
    /// Scroll lock changed.
    ScrollLock(bool),
    /// Parallax effect changed.
    Parallax(bool),
    /// A request named a type with no definition.
    UnknownType { type_id: String },
    /// A deferred task arrived after its instance moved on.
    StaleTask { type_id: String },
}

/// Callback receiving every [`LifecycleEvent`].
pub type DiagnosticHook = Box<dyn FnMut(&LifecycleEvent)>;

/// One recorded event.
#[derive(Debug, Clone)]
pub struct DiagnosticRecord {
    pub at: Instant,
    pub event: LifecycleEvent,
}

/// Shared, append-only event log.
///
/// Clones share the same storage, so one clone can be turned into a hook
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Rc<RefCell<Vec<DiagnosticRecord>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook that appends to this log.
    #[must_use]
    pub fn hook(&self) -> DiagnosticHook {
        let records = Rc::clone(&self.records);
        Box::new(move |event| {
            records.borrow_mut().push(DiagnosticRecord {
                at: Instant::now(),
                event: event.clone(),
            });
        })
    }

    /// Snapshot of recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.records
            .borrow()
            .iter()
            .map(|r| r.event.clone())
            .collect()
    }

    /// Snapshot of recorded events with timestamps.
    #[must_use]
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}
