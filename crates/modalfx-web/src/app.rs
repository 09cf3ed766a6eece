#![forbid(unsafe_code)]

//! The mounted page: one coordinator bound to one [`DomHost`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use modalfx_core::{ClickTarget, Coordinator, FrameTask, ModalConfig, TimerTask};
use tracing::{info, warn};

use crate::dom::{DomHost, PageElements};
use crate::error::WebResult;
use crate::events;

thread_local! {
    static MOUNTED: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

pub(crate) struct App {
    coordinator: Coordinator,
    host: DomHost,
}

impl App {
    /// Build every modal, wire page events and register the app globally.
    ///
    /// Mounting twice is a no-op.
    pub(crate) fn mount(config: ModalConfig) -> WebResult<()> {
        if Self::current().is_some() {
            return Ok(());
        }

        let coordinator = Coordinator::new(config)?;
        let page = PageElements::locate()?;
        let app = Rc::new_cyclic(|weak| {
            RefCell::new(Self {
                coordinator,
                host: DomHost::new(page, weak.clone()),
            })
        });

        {
            let mut guard = app.borrow_mut();
            let Self { coordinator, host } = &mut *guard;
            coordinator.mount(host);
        }
        events::wire(&app)?;

        MOUNTED.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));
        info!(
            modals = app.borrow().coordinator.table().len(),
            "modalfx mounted"
        );
        Ok(())
    }

    /// The mounted app, if any.
    pub(crate) fn current() -> Option<Rc<RefCell<Self>>> {
        MOUNTED.with(|slot| slot.borrow().clone())
    }

    /// Run `f` against the app behind `weak`, if it is still alive and not
    /// already borrowed.
    pub(crate) fn with_weak<R>(weak: &Weak<RefCell<Self>>, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        let app = weak.upgrade()?;
        Self::with(&app, f)
    }

    pub(crate) fn with<R>(app: &Rc<RefCell<Self>>, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        match app.try_borrow_mut() {
            Ok(mut guard) => Some(f(&mut guard)),
            Err(_) => {
                warn!("modalfx re-entered while busy; event dropped");
                None
            }
        }
    }

    pub(crate) fn host(&self) -> &DomHost {
        &self.host
    }

    pub(crate) fn open(&mut self, type_id: &str) -> bool {
        self.coordinator.open(&mut self.host, type_id)
    }

    pub(crate) fn close(&mut self, type_id: &str) -> bool {
        self.coordinator.close(&mut self.host, type_id)
    }

    pub(crate) fn key(&mut self, key: &str) -> bool {
        self.coordinator.handle_key(&mut self.host, key)
    }

    pub(crate) fn click(&mut self, click: ClickTarget<'_>) -> bool {
        self.coordinator.handle_click(&mut self.host, click)
    }

    pub(crate) fn resize(&mut self) {
        self.coordinator.handle_resize(&mut self.host);
    }

    pub(crate) fn animation_finished(&mut self, type_id: &str) -> bool {
        self.coordinator.animation_finished(type_id)
    }

    pub(crate) fn run_frame(&mut self, task: FrameTask) {
        self.coordinator.run_frame(&mut self.host, task);
    }

    pub(crate) fn run_timer(&mut self, task: TimerTask) {
        self.coordinator.run_timer(&mut self.host, task);
    }

    pub(crate) fn is_scroll_locked(&self) -> bool {
        self.coordinator.is_scroll_locked()
    }

    pub(crate) fn visible_types(&self) -> Vec<String> {
        self.coordinator
            .visible_types()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}
