#![forbid(unsafe_code)]

//! [`ModalHost`] over the real DOM.
//!
//! Frame tasks go through `requestAnimationFrame`, timer tasks through
//! `setTimeout`. Both callbacks hold only a weak reference to the
//! [`App`](crate::app::App), so a torn-down page never keeps the engine
//! alive, and both re-enter the engine through
//! [`App::run_frame`](crate::app::App::run_frame) /
//! [`App::run_timer`](crate::app::App::run_timer).

use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use modalfx_core::{
    ClassSet, FrameTask, InstanceBlueprint, InstanceId, Measurements, ModalHost, PageTarget, Part,
    TimerId, TimerTask,
};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, HtmlTemplateElement, Window};

use crate::app::App;
use crate::delegate::{ORIGINAL_TYPE_ATTR, marker};
use crate::error::{WebError, WebResult};

/// Template selectors.
mod template {
    pub const BODY: &str = ".modal-body";
    pub const HEADER: &str = ".modal-header";
    pub const TITLE: &str = ".modal-title";
    pub const MAIN: &str = ".modal-main-content";
    pub const FILLER: &str = ".lorem-ipsum-content";
    pub const FOOTER: &str = ".modal-footer";
    pub const PARAGRAPH_CLASS: &str = "lorem-paragraph";
}

/// Page elements the host needs before any modal is built.
pub(crate) struct PageElements {
    pub window: Window,
    pub document: Document,
    pub body: HtmlElement,
    pub main_content: Element,
    pub wrapper: Element,
    pub template: HtmlTemplateElement,
}

impl PageElements {
    pub(crate) fn locate() -> WebResult<Self> {
        let window = web_sys::window().ok_or(WebError::NoDocument)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let body = document.body().ok_or(WebError::MissingElement("body"))?;
        let by_id = |id: &'static str| {
            document
                .get_element_by_id(&id[1..])
                .ok_or(WebError::MissingElement(id))
        };
        let main_content = by_id("#main-content")?;
        let wrapper = by_id("#modal-wrapper")?;
        let template = by_id("#modal-template")?
            .dyn_into::<HtmlTemplateElement>()
            .map_err(|_| WebError::MissingElement("template#modal-template"))?;

        Ok(Self {
            window,
            document,
            body,
            main_content,
            wrapper,
            template,
        })
    }
}

/// Elements of one built instance.
struct InstanceElements {
    container: HtmlElement,
    overlay: HtmlElement,
    content: HtmlElement,
    header: HtmlElement,
    main: Element,
    footer: HtmlElement,
}

impl InstanceElements {
    fn part(&self, part: Part) -> &HtmlElement {
        match part {
            Part::Container => &self.container,
            Part::Overlay => &self.overlay,
            Part::Content => &self.content,
            Part::Footer => &self.footer,
        }
    }
}

/// The browser host.
pub(crate) struct DomHost {
    page: PageElements,
    instances: Vec<Option<InstanceElements>>,
    app: Weak<RefCell<App>>,
}

impl DomHost {
    pub(crate) fn new(page: PageElements, app: Weak<RefCell<App>>) -> Self {
        Self {
            page,
            instances: Vec::new(),
            app,
        }
    }

    pub(crate) fn page(&self) -> &PageElements {
        &self.page
    }

    fn elements(&self, id: InstanceId) -> Option<&InstanceElements> {
        self.instances.get(id.index()).and_then(Option::as_ref)
    }

    fn build(&self, blueprint: &InstanceBlueprint<'_>) -> WebResult<InstanceElements> {
        let doc = &self.page.document;
        let html = |el: Element| {
            el.dyn_into::<HtmlElement>()
                .map_err(|_| WebError::Js("expected an HTML element".into()))
        };

        let container = html(doc.create_element("div")?)?;
        container.set_id(&format!("modal-container-{}", blueprint.type_id));
        container.set_attribute(ORIGINAL_TYPE_ATTR, blueprint.type_id)?;
        container.set_class_name(&blueprint.container.to_string());

        let overlay = html(doc.create_element("div")?)?;
        overlay.set_class_name(&blueprint.overlay.to_string());

        let fragment = self
            .page
            .template
            .content()
            .clone_node_with_deep(true)?
            .dyn_into::<web_sys::DocumentFragment>()
            .map_err(|_| WebError::Js("template content is not a fragment".into()))?;
        let find = |selector: &'static str| -> WebResult<Element> {
            fragment
                .query_selector(selector)?
                .ok_or(WebError::MissingElement(selector))
        };

        let content = html(find(template::BODY)?)?;
        content.set_class_name(&blueprint.content.to_string());
        find(template::TITLE)?.set_text_content(Some(&blueprint.title));

        let filler = find(template::FILLER)?;
        filler.class_list().remove_1("hidden")?;
        filler.set_text_content(None);
        for _ in 0..blueprint.paragraphs {
            let p = doc.create_element("p")?;
            p.set_class_name(template::PARAGRAPH_CLASS);
            p.set_text_content(Some(blueprint.filler_text));
            filler.append_child(&p)?;
        }

        let header = html(find(template::HEADER)?)?;
        let main = find(template::MAIN)?;
        let footer = html(find(template::FOOTER)?)?;
        footer.set_class_name(&blueprint.footer.to_string());

        container.append_child(&overlay)?;
        container.append_child(&content)?;
        self.page.wrapper.append_child(&container)?;

        Ok(InstanceElements {
            container,
            overlay,
            content,
            header,
            main,
            footer,
        })
    }
}

impl ModalHost for DomHost {
    fn create_instance(&mut self, blueprint: &InstanceBlueprint<'_>) {
        let index = blueprint.id.index();
        if self.instances.len() <= index {
            self.instances.resize_with(index + 1, || None);
        }
        match self.build(blueprint) {
            Ok(elements) => self.instances[index] = Some(elements),
            Err(err) => warn!(modal = blueprint.type_id, %err, "modal build failed"),
        }
    }

    fn write_classes(&mut self, id: InstanceId, part: Part, classes: &ClassSet) {
        if let Some(elements) = self.elements(id) {
            elements.part(part).set_class_name(&classes.to_string());
        }
    }

    fn set_overlay_property(&mut self, id: InstanceId, name: &str, value: Option<&str>) {
        let Some(elements) = self.elements(id) else {
            return;
        };
        let style = elements.overlay.style();
        let result = match value {
            Some(v) => style.set_property(name, v),
            None => style.remove_property(name).map(drop),
        };
        if let Err(err) = result {
            warn!(property = name, err = ?err, "overlay property write failed");
        }
    }

    fn set_page_class(&mut self, target: PageTarget, class: &str, on: bool) {
        let element: &Element = match target {
            PageTarget::Body => &self.page.body,
            PageTarget::MainContent => &self.page.main_content,
        };
        if let Err(err) = element.class_list().toggle_with_force(class, on) {
            warn!(class, err = ?err, "page class toggle failed");
        }
    }

    fn measure(&self, id: InstanceId) -> Measurements {
        let Some(el) = self.elements(id) else {
            return Measurements::default();
        };
        Measurements::new(
            f64::from(el.header.offset_height()),
            f64::from(el.main.scroll_height()),
            f64::from(el.footer.offset_height()),
            f64::from(el.container.client_height()),
        )
    }

    fn computed_animation(&self, id: InstanceId, part: Part) -> Option<String> {
        let element = self.elements(id)?.part(part);
        let style = self.page.window.get_computed_style(element).ok()??;
        let animation = style.get_property_value("animation").ok()?;
        (!animation.is_empty()).then_some(animation)
    }

    fn request_frame(&mut self, task: FrameTask) {
        let app = self.app.clone();
        let callback = Closure::once_into_js(move || {
            App::with_weak(&app, |app| app.run_frame(task));
        });
        if let Err(err) = self
            .page
            .window
            .request_animation_frame(callback.unchecked_ref())
        {
            warn!(?task, err = ?err, "requestAnimationFrame failed");
        }
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let app = self.app.clone();
        // A cancelled callback is never invoked; wasm-bindgen reclaims it
        // with the page.
        let callback = Closure::once_into_js(move || {
            App::with_weak(&app, |app| app.run_timer(task));
        });
        let millis = i32::try_from(delay.as_micros().div_ceil(1_000)).unwrap_or(i32::MAX);
        match self
            .page
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(handle) => TimerId(u64::from(handle.unsigned_abs())),
            Err(err) => {
                warn!(?task, err = ?err, "setTimeout failed");
                TimerId(0)
            }
        }
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Ok(handle) = i32::try_from(timer.0) {
            self.page.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Original type of the modal containing `element`, if any.
pub(crate) fn owning_type(element: &Element) -> Option<String> {
    element
        .closest(&format!(".{}", marker::CONTAINER))
        .ok()
        .flatten()?
        .get_attribute(ORIGINAL_TYPE_ATTR)
}
