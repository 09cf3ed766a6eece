#![forbid(unsafe_code)]

//! Page event wiring.
//!
//! | Source | Event | Action |
//! |--------|-------|--------|
//! | `.modal-trigger` | `click` | open `data-modal-type` |
//! | `#modal-wrapper` | `click` | delegated dismiss |
//! | `#modal-wrapper` | `animationend` | settle an opening modal |
//! | `window` | `keydown` | Escape closes the current modal |
//! | `window` | `resize` | debounced overflow reconciliation |
//!
//! Listeners live as long as the page, so their closures are leaked with
//! `forget`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, Node};

use crate::app::App;
use crate::delegate::{ORIGINAL_TYPE_ATTR, PathNode, marker, resolve_click};
use crate::dom::owning_type;
use crate::error::WebResult;

const TRIGGER_SELECTOR: &str = ".modal-trigger";
const TRIGGER_TYPE_ATTR: &str = "data-modal-type";

/// Attach every page listener.
pub(crate) fn wire(app: &Rc<RefCell<App>>) -> WebResult<()> {
    let (window, document, wrapper) = {
        let guard = app.borrow();
        let page = guard.host().page();
        (
            page.window.clone(),
            page.document.clone(),
            page.wrapper.clone(),
        )
    };

    let triggers = document.query_selector_all(TRIGGER_SELECTOR)?;
    for i in 0..triggers.length() {
        let Some(trigger) = triggers.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(type_id) = trigger.get_attribute(TRIGGER_TYPE_ATTR) else {
            continue;
        };
        let weak = Rc::downgrade(app);
        listen(&trigger, "click", move |_: Event| {
            App::with_weak(&weak, |app| app.open(&type_id));
        })?;
    }

    let weak = Rc::downgrade(app);
    let boundary = wrapper.clone();
    listen(&wrapper, "click", move |event: Event| {
        let path = click_path(&event, &boundary);
        if let Some(click) = resolve_click(&path) {
            trace!(modal = click.type_id, region = ?click.region, "wrapper click");
            App::with_weak(&weak, |app| app.click(click));
        }
    })?;

    let weak = Rc::downgrade(app);
    listen(&wrapper, "animationend", move |event: Event| {
        let Some(target) = event_element(&event) else {
            return;
        };
        if !target.class_list().contains(marker::CONTENT) {
            return;
        }
        if let Some(type_id) = owning_type(&target) {
            App::with_weak(&weak, |app| app.animation_finished(&type_id));
        }
    })?;

    let weak = Rc::downgrade(app);
    listen(&window, "keydown", move |event: Event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
            App::with_weak(&weak, |app| app.key(&key));
        }
    })?;

    let weak = Rc::downgrade(app);
    listen(&window, "resize", move |_: Event| {
        App::with_weak(&weak, App::resize);
    })?;

    Ok(())
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> WebResult<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Ancestor chain from the event target up to (not including) `boundary`.
fn click_path(event: &Event, boundary: &Element) -> Vec<PathNode> {
    let boundary: &Node = boundary;
    let mut path = Vec::new();
    let mut node = event_element(event);
    while let Some(element) = node {
        if element.is_same_node(Some(boundary)) {
            break;
        }
        path.push(PathNode::new(
            &element.class_name(),
            element.get_attribute(ORIGINAL_TYPE_ATTR).as_deref(),
        ));
        node = element.parent_element();
    }
    path
}
