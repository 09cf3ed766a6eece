#![forbid(unsafe_code)]

//! Modal lifecycle coordinator.
//!
//! The [`Coordinator`] owns one [`ModalInstance`] per definition and drives
//! them through `Hidden → Opening → Open → Closing → Hidden`, writing class
//! lists to a [`ModalHost`] as it goes.
//!
//! # Open
//!
//! 1. Cancel any pending cleanup timer, bump the generation.
//! 2. Strip animation classes, clear the overlay delay, un-hide.
//! 3. Mark visible, recompute scroll lock.
//! 4. Next frame: reconcile overflow, enable parallax for the parallax type,
//!    add the overlay and content open animation classes.
//!
//! # Close
//!
//! 1. Disable parallax for the parallax type, strip animation classes, bump
//!    the generation.
//! 2. Next frame: set the overlay delay property, add the close animation
//!    classes, read both computed animation descriptors and schedule cleanup
//!    after the longer of the two.
//! 3. Cleanup: hide, restore an overridden layout, clear the delay property,
//!    unmark visible, recompute scroll lock.
//!
//! # Invariants
//!
//! - Scroll lock is active iff at least one instance is visible
//!   (`phase != Hidden`). The lock is recomputed from the visible set, never
//!   toggled blindly.
//! - `visible` lists exactly the visible instances, in open order. The last
//!   entry is "the current modal" for keyboard and resize handling.
//! - A deferred task only acts if its generation matches the instance's.
//!   Re-opening during a close therefore can never be undone by the earlier
//!   close's cleanup, even if the host failed to cancel the timer.
//! - A layout override never outlives a close.
//!
//! # Failure Modes
//!
//! | Call | Condition | Result |
//! |------|-----------|--------|
//! | `open` | unknown type | no-op, `UnknownType` event |
//! | `open` | before `mount` | no-op |
//! | `close` | unknown type | no-op, `UnknownType` event |
//! | `close` | hidden or already closing | no-op |
//! | any task | stale generation / epoch | dropped, `StaleTask` event |
//! | close frame | no or malformed animation | cleanup scheduled with zero delay |

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{ClassNames, ConfigError, ModalConfig};
use crate::definition::{DefinitionTable, InstanceId};
use crate::diagnostics::{DiagnosticHook, LifecycleEvent};
use crate::duration::parse_duration;
use crate::host::{
    FrameTask, InstanceBlueprint, ModalHost, PageFlags, PageTarget, Part, TimerId, TimerTask,
};
use crate::input::{ClickTarget, KeyInput};
use crate::instance::{ModalInstance, ModalPhase};
use crate::layout::apply_layout;
use crate::overflow;

const ANIMATED_PARTS: [Part; 2] = [Part::Overlay, Part::Content];

/// Orchestrates every modal instance on a page.
pub struct Coordinator {
    config: ModalConfig,
    table: DefinitionTable,
    instances: Vec<ModalInstance>,
    /// Visible instances in open order (last = most recent).
    visible: Vec<InstanceId>,
    page: PageFlags,
    resize_timer: Option<TimerId>,
    resize_epoch: u64,
    mounted: bool,
    diagnostics: Option<DiagnosticHook>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("instances", &self.instances.len())
            .field("visible", &self.visible)
            .field("page", &self.page)
            .field("resize_epoch", &self.resize_epoch)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Create a coordinator. Instances exist immediately (hidden); their
    /// elements are built by [`mount`](Self::mount).
    pub fn new(config: ModalConfig) -> Result<Self, ConfigError> {
        let table = DefinitionTable::from_config(&config)?;
        let instances = table
            .iter()
            .map(|def| ModalInstance::new(def, &config.classes))
            .collect();
        Ok(Self {
            config,
            table,
            instances,
            visible: Vec::new(),
            page: PageFlags::empty(),
            resize_timer: None,
            resize_epoch: 0,
            mounted: false,
            diagnostics: None,
        })
    }

    /// Install a diagnostic hook, replacing any previous one.
    pub fn set_diagnostics(&mut self, hook: DiagnosticHook) {
        self.diagnostics = Some(hook);
    }

    /// Remove the diagnostic hook.
    pub fn clear_diagnostics(&mut self) {
        self.diagnostics = None;
    }

    // --- Setup ---

    /// Build every instance's elements through the host, hidden.
    ///
    /// Returns `false` (and does nothing) if already mounted.
    pub fn mount<H: ModalHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.mounted {
            return false;
        }

        let names = &self.config.classes;
        for inst in &self.instances {
            let def = self.table.get(inst.id);
            let blueprint = InstanceBlueprint {
                id: inst.id,
                type_id: def.type_id(),
                title: format!("{}{}", self.config.title_prefix, def.type_id()),
                paragraphs: def.size().paragraph_count(),
                filler_text: &self.config.filler_text,
                container: inst.classes.render(Part::Container, names),
                overlay: inst.classes.render(Part::Overlay, names),
                content: inst.classes.render(Part::Content, names),
                footer: inst.classes.render(Part::Footer, names),
            };
            host.create_instance(&blueprint);
        }

        self.mounted = true;
        debug!(instances = self.instances.len(), "modal.mount");
        true
    }

    // --- Lifecycle ---

    /// Open the modal registered under `type_id`.
    ///
    /// Returns `false` for unknown types or before `mount`.
    pub fn open<H: ModalHost + ?Sized>(&mut self, host: &mut H, type_id: &str) -> bool {
        if !self.mounted {
            debug!(modal = type_id, "modal.open before mount ignored");
            return false;
        }
        let Some(id) = self.table.lookup(type_id) else {
            debug!(modal = type_id, "modal.open unknown type");
            self.emit(LifecycleEvent::UnknownType {
                type_id: type_id.to_owned(),
            });
            return false;
        };

        let names = &self.config.classes;
        let inst = &mut self.instances[id.index()];
        if let Some(timer) = inst.pending_cleanup.take() {
            trace!(modal = type_id, ?timer, "cancel pending cleanup");
            host.cancel(timer);
        }
        inst.generation += 1;
        let generation = inst.generation;
        inst.current_type = id;
        inst.overlay_delay = None;
        inst.classes.reset_animation();
        inst.classes.hidden = false;
        inst.phase = ModalPhase::Opening;

        host.set_overlay_property(id, &names.overlay_delay_property, None);
        write_parts(host, inst, &ANIMATED_PARTS, names);
        write_parts(host, inst, &[Part::Container], names);

        self.mark_visible(id);
        self.sync_scroll_lock(host);
        host.request_frame(FrameTask::Open { id, generation });

        debug!(modal = type_id, generation, "modal.open");
        self.emit(LifecycleEvent::Opened {
            type_id: type_id.to_owned(),
        });
        true
    }

    /// Close the modal registered under `type_id`.
    pub fn close<H: ModalHost + ?Sized>(&mut self, host: &mut H, type_id: &str) -> bool {
        match self.table.lookup(type_id) {
            Some(id) => self.close_instance(host, id),
            None => {
                debug!(modal = type_id, "modal.close unknown type");
                self.emit(LifecycleEvent::UnknownType {
                    type_id: type_id.to_owned(),
                });
                false
            }
        }
    }

    /// Close an instance by id.
    ///
    /// Returns `false` if the instance is hidden or already closing.
    pub fn close_instance<H: ModalHost + ?Sized>(&mut self, host: &mut H, id: InstanceId) -> bool {
        let Some(inst) = self.instances.get(id.index()) else {
            return false;
        };
        if !inst.phase.is_open() {
            return false;
        }
        if inst.original_type == self.table.parallax() {
            self.set_parallax(host, false);
        }

        let names = &self.config.classes;
        let inst = &mut self.instances[id.index()];
        let delay = self
            .config
            .overlay_delays
            .for_size(self.table.get(inst.current_type).size())
            .to_owned();

        inst.classes.reset_animation();
        write_parts(host, inst, &ANIMATED_PARTS, names);
        inst.generation += 1;
        let generation = inst.generation;
        inst.phase = ModalPhase::Closing;
        inst.overlay_delay = Some(delay.clone());
        host.request_frame(FrameTask::Close { id, generation });

        let type_id = self.table.type_id(id).to_owned();
        debug!(modal = %type_id, generation, overlay_delay = %delay, "modal.close");
        self.emit(LifecycleEvent::CloseStarted {
            type_id,
            overlay_delay: delay,
        });
        true
    }

    /// The host reports that the content's open animation finished.
    ///
    /// Settles `Opening` into `Open`; any other phase is left alone.
    pub fn animation_finished(&mut self, type_id: &str) -> bool {
        let Some(id) = self.table.lookup(type_id) else {
            return false;
        };
        let inst = &mut self.instances[id.index()];
        if inst.phase != ModalPhase::Opening {
            return false;
        }
        inst.phase = ModalPhase::Open;
        self.emit(LifecycleEvent::Settled {
            type_id: type_id.to_owned(),
        });
        true
    }

    /// Re-check overflow for `type_id` against fresh measurements.
    ///
    /// Returns `true` if the layout switched.
    pub fn reconcile<H: ModalHost + ?Sized>(&mut self, host: &mut H, type_id: &str) -> bool {
        match self.table.lookup(type_id) {
            Some(id) => self.reconcile_instance(host, id),
            None => false,
        }
    }

    // --- Input ---

    /// Route a key press. Escape closes the current open modal.
    pub fn handle_key<H: ModalHost + ?Sized>(&mut self, host: &mut H, key: &str) -> bool {
        match KeyInput::from_key(key) {
            KeyInput::Escape => match self.top_open() {
                Some(id) => self.close_instance(host, id),
                None => false,
            },
            KeyInput::Other => false,
        }
    }

    /// Route a click that landed inside a modal.
    pub fn handle_click<H: ModalHost + ?Sized>(
        &mut self,
        host: &mut H,
        click: ClickTarget<'_>,
    ) -> bool {
        if !click.region.dismisses() {
            return false;
        }
        self.close(host, click.type_id)
    }

    /// Note a viewport resize. Reconciliation runs once the resize burst has
    /// been quiet for the configured debounce window.
    pub fn handle_resize<H: ModalHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(timer) = self.resize_timer.take() {
            host.cancel(timer);
        }
        self.resize_epoch += 1;
        let epoch = self.resize_epoch;
        let timer = host.schedule(
            self.config.resize_debounce_window(),
            TimerTask::ResizeSettled { epoch },
        );
        self.resize_timer = Some(timer);
        trace!(epoch, "resize debounce armed");
    }

    // --- Deferred work ---

    /// Run a frame task handed back by the host.
    pub fn run_frame<H: ModalHost + ?Sized>(&mut self, host: &mut H, task: FrameTask) {
        match task {
            FrameTask::Open { id, generation } => self.open_frame(host, id, generation),
            FrameTask::Close { id, generation } => self.close_frame(host, id, generation),
        }
    }

    /// Run a timer task handed back by the host.
    pub fn run_timer<H: ModalHost + ?Sized>(&mut self, host: &mut H, task: TimerTask) {
        match task {
            TimerTask::Cleanup { id, generation } => self.cleanup(host, id, generation),
            TimerTask::ResizeSettled { epoch } => self.resize_settled(host, epoch),
        }
    }

    fn open_frame<H: ModalHost + ?Sized>(&mut self, host: &mut H, id: InstanceId, generation: u64) {
        if !self.is_current(id, generation) {
            self.drop_stale(id);
            return;
        }

        self.reconcile_instance(host, id);
        if self.instances[id.index()].original_type == self.table.parallax() {
            self.set_parallax(host, true);
        }

        let names = &self.config.classes;
        let inst = &mut self.instances[id.index()];
        let open_class = &self.table.get(inst.current_type).animations().open;
        inst.classes.overlay_anim.insert(&names.animated);
        inst.classes.overlay_anim.insert(&names.overlay_open);
        inst.classes.content_anim.insert(&names.animated);
        inst.classes.content_anim.insert(open_class);
        write_parts(host, inst, &ANIMATED_PARTS, names);

        self.emit(LifecycleEvent::OpenAnimated {
            type_id: self.table.type_id(id).to_owned(),
        });
    }

    fn close_frame<H: ModalHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: InstanceId,
        generation: u64,
    ) {
        if !self.is_current(id, generation) {
            self.drop_stale(id);
            return;
        }

        let names = &self.config.classes;
        let inst = &mut self.instances[id.index()];
        if let Some(delay) = inst.overlay_delay.as_deref() {
            host.set_overlay_property(id, &names.overlay_delay_property, Some(delay));
        }

        let close_class = &self.table.get(inst.current_type).animations().close;
        inst.classes.overlay_anim.insert(&names.animated);
        inst.classes.overlay_anim.insert(&names.overlay_close_dynamic);
        inst.classes.content_anim.insert(&names.animated);
        inst.classes.content_anim.insert(close_class);
        write_parts(host, inst, &ANIMATED_PARTS, names);

        let wait_for = |part: Part| {
            host.computed_animation(id, part)
                .map_or(Duration::ZERO, |descriptor| parse_duration(&descriptor))
        };
        let wait = wait_for(Part::Content).max(wait_for(Part::Overlay));
        inst.pending_cleanup = Some(host.schedule(wait, TimerTask::Cleanup { id, generation }));

        let type_id = self.table.type_id(id).to_owned();
        let wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        debug!(modal = %type_id, wait_ms, "modal.close scheduled");
        self.emit(LifecycleEvent::CloseScheduled { type_id, wait });
    }

    fn cleanup<H: ModalHost + ?Sized>(&mut self, host: &mut H, id: InstanceId, generation: u64) {
        let closing = self
            .instances
            .get(id.index())
            .is_some_and(|i| i.generation == generation && i.phase == ModalPhase::Closing);
        if !closing {
            self.drop_stale(id);
            return;
        }

        let names = &self.config.classes;
        let inst = &mut self.instances[id.index()];
        inst.pending_cleanup = None;
        inst.phase = ModalPhase::Hidden;
        inst.classes.hidden = true;
        write_parts(host, inst, &[Part::Container], names);

        let reverted = if inst.is_layout_overridden() {
            let from = inst.layout_type;
            inst.layout_type = inst.original_type;
            apply_layout(host, inst, self.table.get(inst.original_type), names);
            Some(from)
        } else {
            None
        };

        inst.overlay_delay = None;
        host.set_overlay_property(id, &names.overlay_delay_property, None);

        self.unmark_visible(id);
        self.sync_scroll_lock(host);

        let type_id = self.table.type_id(id).to_owned();
        if let Some(from) = reverted {
            self.emit(LifecycleEvent::LayoutSwitched {
                type_id: type_id.clone(),
                from: self.table.type_id(from).to_owned(),
                to: type_id.clone(),
            });
        }
        debug!(modal = %type_id, "modal.hidden");
        self.emit(LifecycleEvent::Hidden { type_id });
    }

    fn resize_settled<H: ModalHost + ?Sized>(&mut self, host: &mut H, epoch: u64) {
        if epoch != self.resize_epoch {
            trace!(epoch, current = self.resize_epoch, "stale resize timer dropped");
            return;
        }
        self.resize_timer = None;
        if let Some(id) = self.top_visible() {
            self.reconcile_instance(host, id);
        }
    }

    fn reconcile_instance<H: ModalHost + ?Sized>(&mut self, host: &mut H, id: InstanceId) -> bool {
        let inst = &self.instances[id.index()];
        let measurements = host.measure(id);
        let Some(target) =
            overflow::reconcile(&self.table, inst.original_type, inst.layout_type, &measurements)
        else {
            return false;
        };

        let names = &self.config.classes;
        let inst = &mut self.instances[id.index()];
        let from = inst.layout_type;
        inst.layout_type = target;
        apply_layout(host, inst, self.table.get(target), names);

        let event = LifecycleEvent::LayoutSwitched {
            type_id: self.table.type_id(id).to_owned(),
            from: self.table.type_id(from).to_owned(),
            to: self.table.type_id(target).to_owned(),
        };
        debug!(?event, "modal.layout");
        self.emit(event);
        true
    }

    // --- Page-level state ---

    fn mark_visible(&mut self, id: InstanceId) {
        self.visible.retain(|&v| v != id);
        self.visible.push(id);
    }

    fn unmark_visible(&mut self, id: InstanceId) {
        self.visible.retain(|&v| v != id);
    }

    fn sync_scroll_lock<H: ModalHost + ?Sized>(&mut self, host: &mut H) {
        let want = !self.visible.is_empty();
        if self.page.contains(PageFlags::SCROLL_LOCK) == want {
            return;
        }
        self.page.set(PageFlags::SCROLL_LOCK, want);
        host.set_page_class(PageTarget::Body, &self.config.classes.scroll_lock, want);
        self.emit(LifecycleEvent::ScrollLock(want));
    }

    fn set_parallax<H: ModalHost + ?Sized>(&mut self, host: &mut H, on: bool) {
        if self.page.contains(PageFlags::PARALLAX) == on {
            return;
        }
        self.page.set(PageFlags::PARALLAX, on);
        host.set_page_class(PageTarget::MainContent, &self.config.classes.parallax, on);
        self.emit(LifecycleEvent::Parallax(on));
    }

    fn is_current(&self, id: InstanceId, generation: u64) -> bool {
        self.instances
            .get(id.index())
            .is_some_and(|i| i.generation == generation)
    }

    fn drop_stale(&mut self, id: InstanceId) {
        let Some(def) = self.table.iter().nth(id.index()) else {
            return;
        };
        let type_id = def.type_id().to_owned();
        trace!(modal = %type_id, "stale task dropped");
        self.emit(LifecycleEvent::StaleTask { type_id });
    }

    fn emit(&mut self, event: LifecycleEvent) {
        if let Some(hook) = self.diagnostics.as_mut() {
            hook(&event);
        }
    }

    // --- Queries ---

    /// The most recently opened visible instance, closing or not.
    #[must_use]
    pub fn top_visible(&self) -> Option<InstanceId> {
        self.visible.last().copied()
    }

    /// The most recently opened instance that is not on its way out.
    #[must_use]
    pub fn top_open(&self) -> Option<InstanceId> {
        self.visible
            .iter()
            .rev()
            .copied()
            .find(|id| self.instances[id.index()].phase.is_open())
    }

    /// Visible instances in open order.
    #[must_use]
    pub fn visible(&self) -> &[InstanceId] {
        &self.visible
    }

    /// Type identifiers of visible instances in open order.
    #[must_use]
    pub fn visible_types(&self) -> Vec<&str> {
        self.visible.iter().map(|&id| self.table.type_id(id)).collect()
    }

    #[must_use]
    pub fn instance(&self, type_id: &str) -> Option<&ModalInstance> {
        self.table
            .lookup(type_id)
            .map(|id| &self.instances[id.index()])
    }

    #[must_use]
    pub fn instances(&self) -> &[ModalInstance] {
        &self.instances
    }

    #[must_use]
    pub fn phase(&self, type_id: &str) -> Option<ModalPhase> {
        self.instance(type_id).map(ModalInstance::phase)
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.page.contains(PageFlags::SCROLL_LOCK)
    }

    #[must_use]
    pub fn is_parallax_active(&self) -> bool {
        self.page.contains(PageFlags::PARALLAX)
    }

    #[must_use]
    pub fn page_flags(&self) -> PageFlags {
        self.page
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether a resize reconciliation is waiting for its quiet window.
    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.resize_timer.is_some()
    }

    #[must_use]
    pub fn table(&self) -> &DefinitionTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &ModalConfig {
        &self.config
    }
}

fn write_parts<H: ModalHost + ?Sized>(
    host: &mut H,
    inst: &ModalInstance,
    parts: &[Part],
    names: &ClassNames,
) {
    for &part in parts {
        host.write_classes(inst.id, part, &inst.classes.render(part, names));
    }
}
