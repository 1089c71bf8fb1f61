//! Live DOM capture and fill through web-sys.

use codefill_core::models::ComputedStyle;
use codefill_core::{ElementHandle, ElementSnapshot, FillPlan, PageSnapshot};
use js_sys::{Function, Object, Reflect};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    Window,
};

/// Elements that can receive a code.
const FIELD_SELECTOR: &str = "input, textarea";

/// DOM nodes of the last capture, indexed by handle.
#[derive(Default)]
pub struct HandleTable {
    elements: Vec<Element>,
}

impl HandleTable {
    /// Handle for `element`, registering it if unseen. The flag is true for
    /// a new registration.
    fn register(&mut self, element: &Element) -> (ElementHandle, bool) {
        if let Some(index) = self
            .elements
            .iter()
            .position(|known| known.is_same_node(Some(element)))
        {
            return (ElementHandle(index as u64), false);
        }

        self.elements.push(element.clone());
        (ElementHandle(self.elements.len() as u64 - 1), true)
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.elements.get(index))
    }
}

/// Capture every fillable element and its parent into a snapshot.
///
/// Handles are only valid until the next capture.
pub fn capture(
    window: &Window,
    document: &Document,
    table: &mut HandleTable,
) -> Result<PageSnapshot, JsValue> {
    table.elements.clear();

    let nodes = document.query_selector_all(FIELD_SELECTOR)?;
    let mut elements = Vec::with_capacity(nodes.length() as usize);

    for index in 0..nodes.length() {
        let Some(element) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };

        let parent = match element.parent_element() {
            Some(parent_element) => {
                let (handle, new) = table.register(&parent_element);
                if new {
                    elements.push(snapshot_element(window, &parent_element, handle, None));
                }
                Some(handle)
            }
            None => None,
        };

        let (handle, _) = table.register(&element);
        elements.push(snapshot_element(window, &element, handle, parent));
    }

    let visible_text = document
        .body()
        .map(|body| body.inner_text())
        .unwrap_or_default();

    debug!(elements = elements.len(), "Captured page");
    Ok(PageSnapshot::new(elements).with_text(visible_text))
}

fn snapshot_element(
    window: &Window,
    element: &Element,
    handle: ElementHandle,
    parent: Option<ElementHandle>,
) -> ElementSnapshot {
    let mut snapshot = ElementSnapshot::new(handle.0, element.tag_name());
    if let Some(parent) = parent {
        snapshot = snapshot.with_parent(parent.0);
    }

    for name in element.get_attribute_names().iter() {
        if let Some(name) = name.as_string() {
            let value = element.get_attribute(&name).unwrap_or_default();
            snapshot = snapshot.with_attr(&name, value);
        }
    }

    if let Some(value) = current_value(element) {
        snapshot = snapshot.with_value(value);
    }

    let rect = element.get_bounding_client_rect();
    snapshot = snapshot.with_rect(rect.width(), rect.height());

    if let Some(style) = computed_style(window, element) {
        snapshot = snapshot.with_style(style);
    }

    snapshot.connected = element.is_connected();
    snapshot
}

fn current_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else {
        element
            .dyn_ref::<HtmlTextAreaElement>()
            .map(HtmlTextAreaElement::value)
    }
}

fn computed_style(window: &Window, element: &Element) -> Option<ComputedStyle> {
    let declaration = window.get_computed_style(element).ok().flatten()?;
    let property = |name: &str| declaration.get_property_value(name).unwrap_or_default();

    let defaults = ComputedStyle::default();
    Some(ComputedStyle {
        display: property("display"),
        visibility: property("visibility"),
        opacity: property("opacity").parse().unwrap_or(defaults.opacity),
    })
}

/// The `value` setter from the prototype of the DOM class `class`.
///
/// Frameworks that track input state install their own `value` property on
/// the element, so assigning through it never reaches their listeners.
fn native_value_setter(class: &str) -> Result<Function, JsValue> {
    let constructor = Reflect::get(&js_sys::global(), &JsValue::from_str(class))?;
    let prototype = Reflect::get(&constructor, &JsValue::from_str("prototype"))?;
    let descriptor =
        Object::get_own_property_descriptor::<JsValue>(prototype.unchecked_ref(), &JsValue::from_str("value"));

    Reflect::get(&descriptor, &JsValue::from_str("set"))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("{class}.prototype has no value setter")))
}

fn set_native_value(element: &Element, value: &str) -> Result<bool, JsValue> {
    let class = if element.is_instance_of::<HtmlInputElement>() {
        "HTMLInputElement"
    } else if element.is_instance_of::<HtmlTextAreaElement>() {
        "HTMLTextAreaElement"
    } else {
        return Ok(false);
    };

    native_value_setter(class)?.call1(element, &JsValue::from_str(value))?;
    Ok(true)
}

/// Assign each planned value and emit the follow-up events.
///
/// Returns how many elements were filled. Fails when a planned element has
/// left the document since the capture.
pub fn apply(plan: &FillPlan, table: &HandleTable) -> Result<usize, JsValue> {
    for step in &plan.steps {
        let element = table
            .get(step.handle)
            .filter(|element| element.is_connected())
            .ok_or_else(|| JsValue::from_str(&format!("element {} is gone", step.handle)))?;

        let html = element.dyn_ref::<HtmlElement>();
        if let Some(html) = html {
            html.focus()?;
        }

        if !set_native_value(element, &step.value)? {
            return Err(JsValue::from_str(&format!(
                "element {} does not take text",
                step.handle
            )));
        }

        for event in plan.events() {
            let init = EventInit::new();
            init.set_bubbles(true);
            let dom_event = Event::new_with_event_init_dict(event.as_str(), &init)?;
            element.dispatch_event(&dom_event)?;
        }

        // The synthetic blur does not move focus.
        if let Some(html) = html {
            html.blur()?;
        }
    }

    debug!(steps = plan.steps.len(), "Applied fill plan");
    Ok(plan.steps.len())
}
