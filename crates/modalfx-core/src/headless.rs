#![forbid(unsafe_code)]

//! In-memory host with a virtual clock.
//!
//! [`HeadlessHost`] records every write the coordinator makes and queues
//! frame and timer tasks instead of running them. Tests (and embedders that
//! want to dry-run a page) drive time explicitly through
//! [`HeadlessHost::run_frames`] and [`HeadlessHost::advance`], so every
//! interleaving of opens, closes and timer expiries is reproducible.
//!
//! Computed animations are modelled by a class → descriptor table. An
//! element's computed animation is the descriptor of the last class in its
//! list that has one. `var(--name)` inside a descriptor resolves to the
//! overlay custom property of that instance, or `0s` when unset.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use ahash::AHashMap;

use crate::classes::ClassSet;
use crate::config::{ConfigError, ModalConfig};
use crate::coordinator::Coordinator;
use crate::definition::InstanceId;
use crate::host::{
    FrameTask, InstanceBlueprint, Measurements, ModalHost, PageTarget, Part, TimerId, TimerTask,
};
use crate::input::{ClickRegion, ClickTarget};

/// Summary of one `create_instance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInstance {
    pub id: InstanceId,
    pub type_id: String,
    pub title: String,
    pub paragraphs: usize,
}

/// A [`ModalHost`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    now: Duration,
    elements: AHashMap<(InstanceId, Part), ClassSet>,
    properties: AHashMap<(InstanceId, String), String>,
    body: ClassSet,
    main_content: ClassSet,
    built: Vec<BuiltInstance>,
    measurements: AHashMap<InstanceId, Measurements>,
    default_measurements: Measurements,
    animations: AHashMap<String, String>,
    frames: VecDeque<FrameTask>,
    timers: BTreeMap<(Duration, TimerId), TimerTask>,
    next_timer: u64,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the animation descriptor a class produces.
    pub fn set_animation(&mut self, class: impl Into<String>, descriptor: impl Into<String>) {
        self.animations.insert(class.into(), descriptor.into());
    }

    /// Builder form of [`set_animation`](Self::set_animation).
    #[must_use]
    pub fn with_animation(mut self, class: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.set_animation(class, descriptor);
        self
    }

    /// Measurements reported for one instance.
    pub fn set_measurements(&mut self, id: InstanceId, measurements: Measurements) {
        self.measurements.insert(id, measurements);
    }

    /// Measurements reported for instances without their own.
    pub fn set_default_measurements(&mut self, measurements: Measurements) {
        self.default_measurements = measurements;
    }

    // --- Inspection ---

    /// Last class list written to an element, space separated.
    #[must_use]
    pub fn classes(&self, id: InstanceId, part: Part) -> Option<String> {
        self.elements.get(&(id, part)).map(ToString::to_string)
    }

    #[must_use]
    pub fn has_class(&self, id: InstanceId, part: Part, class: &str) -> bool {
        self.elements
            .get(&(id, part))
            .is_some_and(|set| set.contains(class))
    }

    /// Current value of an overlay custom property.
    #[must_use]
    pub fn property(&self, id: InstanceId, name: &str) -> Option<&str> {
        self.properties
            .get(&(id, name.to_owned()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn page_has_class(&self, target: PageTarget, class: &str) -> bool {
        self.page(target).contains(class)
    }

    #[must_use]
    pub fn built(&self) -> &[BuiltInstance] {
        &self.built
    }

    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Virtual time elapsed since the host was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    // --- Driving ---

    /// Run every queued frame task, including ones queued while running.
    ///
    /// Returns the number of tasks run.
    pub fn run_frames(&mut self, coordinator: &mut Coordinator) -> usize {
        let mut ran = 0;
        while let Some(task) = self.frames.pop_front() {
            coordinator.run_frame(self, task);
            ran += 1;
        }
        ran
    }

    /// Move the clock forward by `by`, firing due timers in deadline order.
    ///
    /// Pending frames run before each timer, as a browser would paint
    /// between timer callbacks.
    pub fn advance(&mut self, coordinator: &mut Coordinator, by: Duration) {
        let target = self.now + by;
        loop {
            self.run_frames(coordinator);
            let Some((&(due, timer), _)) = self.timers.first_key_value() else {
                break;
            };
            if due > target {
                break;
            }
            let Some(task) = self.timers.remove(&(due, timer)) else {
                break;
            };
            self.now = due;
            coordinator.run_timer(self, task);
        }
        self.now = target;
        self.run_frames(coordinator);
    }

    fn page(&self, target: PageTarget) -> &ClassSet {
        match target {
            PageTarget::Body => &self.body,
            PageTarget::MainContent => &self.main_content,
        }
    }

    fn resolve_vars(&self, id: InstanceId, descriptor: &str) -> String {
        let mut out = String::with_capacity(descriptor.len());
        let mut rest = descriptor;
        while let Some(start) = rest.find("var(") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 4..];
            let Some(end) = after.find(')') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = after[..end].trim();
            match self.property(id, name) {
                Some(value) => out.push_str(value),
                None => out.push_str("0s"),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

impl ModalHost for HeadlessHost {
    fn create_instance(&mut self, blueprint: &InstanceBlueprint<'_>) {
        let id = blueprint.id;
        self.elements.insert((id, Part::Container), blueprint.container.clone());
        self.elements.insert((id, Part::Overlay), blueprint.overlay.clone());
        self.elements.insert((id, Part::Content), blueprint.content.clone());
        self.elements.insert((id, Part::Footer), blueprint.footer.clone());
        self.built.push(BuiltInstance {
            id,
            type_id: blueprint.type_id.to_owned(),
            title: blueprint.title.clone(),
            paragraphs: blueprint.paragraphs,
        });
    }

    fn write_classes(&mut self, id: InstanceId, part: Part, classes: &ClassSet) {
        self.elements.insert((id, part), classes.clone());
    }

    fn set_overlay_property(&mut self, id: InstanceId, name: &str, value: Option<&str>) {
        let key = (id, name.to_owned());
        match value {
            Some(v) => {
                self.properties.insert(key, v.to_owned());
            }
            None => {
                self.properties.remove(&key);
            }
        }
    }

    fn set_page_class(&mut self, target: PageTarget, class: &str, on: bool) {
        let set = match target {
            PageTarget::Body => &mut self.body,
            PageTarget::MainContent => &mut self.main_content,
        };
        set.toggle(class, on);
    }

    fn measure(&self, id: InstanceId) -> Measurements {
        self.measurements
            .get(&id)
            .copied()
            .unwrap_or(self.default_measurements)
    }

    fn computed_animation(&self, id: InstanceId, part: Part) -> Option<String> {
        let classes = self.elements.get(&(id, part))?;
        let descriptor = classes
            .iter()
            .filter_map(|class| self.animations.get(class))
            .last()?;
        Some(self.resolve_vars(id, descriptor))
    }

    fn request_frame(&mut self, task: FrameTask) {
        self.frames.push_back(task);
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.timers.insert((self.now + delay, timer), task);
        timer
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.retain(|&(_, t), _| t != timer);
    }
}

/// A mounted coordinator paired with a [`HeadlessHost`] carrying the stock
/// stylesheet's animation timings.
///
/// | Class | Animation |
/// |-------|-----------|
/// | overlay open | `0.3s` |
/// | overlay close (dynamic) | `0.2s` after `var(--overlay-delay)` |
/// | `modal-<type>-open` | `0.3s` |
/// | `modal-<type>-close` | `0.3s` |
#[derive(Debug)]
pub struct Harness {
    pub coordinator: Coordinator,
    pub host: HeadlessHost,
}

impl Harness {
    /// Build, wire stock animations and mount.
    pub fn new(config: ModalConfig) -> Result<Self, ConfigError> {
        let mut coordinator = Coordinator::new(config)?;
        let mut host = HeadlessHost::new();

        let names = &coordinator.config().classes;
        host.set_animation(&names.overlay_open, "fadeIn 0.3s ease-out forwards");
        host.set_animation(
            &names.overlay_close_dynamic,
            format!(
                "fadeOut 0.2s ease-in var({}) forwards",
                names.overlay_delay_property
            ),
        );
        for def in coordinator.table().iter() {
            let anim = def.animations();
            host.set_animation(&anim.open, format!("{}-in 0.3s ease-out forwards", def.type_id()));
            host.set_animation(&anim.close, format!("{}-out 0.3s ease-in forwards", def.type_id()));
        }

        coordinator.mount(&mut host);
        Ok(Self { coordinator, host })
    }

    /// Instance id of a configured type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not configured.
    #[must_use]
    pub fn id(&self, type_id: &str) -> InstanceId {
        match self.coordinator.table().lookup(type_id) {
            Some(id) => id,
            None => panic!("modal type '{type_id}' is not configured"),
        }
    }

    pub fn open(&mut self, type_id: &str) -> bool {
        self.coordinator.open(&mut self.host, type_id)
    }

    pub fn close(&mut self, type_id: &str) -> bool {
        self.coordinator.close(&mut self.host, type_id)
    }

    pub fn escape(&mut self) -> bool {
        self.coordinator.handle_key(&mut self.host, "Escape")
    }

    pub fn click(&mut self, type_id: &str, region: ClickRegion) -> bool {
        self.coordinator
            .handle_click(&mut self.host, ClickTarget::new(type_id, region))
    }

    pub fn resize(&mut self) {
        self.coordinator.handle_resize(&mut self.host);
    }

    /// Run queued frame tasks.
    pub fn frame(&mut self) -> usize {
        self.host.run_frames(&mut self.coordinator)
    }

    pub fn advance(&mut self, by: Duration) {
        self.host.advance(&mut self.coordinator, by);
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}
