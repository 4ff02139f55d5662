//! Browser host plumbing
//!
//! Thin web-sys wrappers shared by the widget entry points: viewport
//! reads, block element management, and the page-level error banner.
//! Widget state modules never touch the DOM; everything visual goes
//! through here.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::consts::{BANNER_TTL_MS, WIDGET_ERROR_TTL_MS};
use crate::error::HostError;
use crate::sim::Viewport;

pub fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

pub fn document(window: &Window) -> Result<Document, HostError> {
    window.document().ok_or(HostError::NoDocument)
}

pub fn body(document: &Document) -> Result<HtmlElement, HostError> {
    document.body().ok_or(HostError::NoBody)
}

/// Read the current viewport extents, preferring `window.innerWidth`
/// and falling back to the root element's client size.
pub fn viewport_size(window: &Window, document: &Document) -> Result<Viewport, HostError> {
    let width = js_dimension(window.inner_width())
        .or_else(|| document.document_element().map(|el| el.client_width() as f32))
        .unwrap_or(0.0);
    let height = js_dimension(window.inner_height())
        .or_else(|| document.document_element().map(|el| el.client_height() as f32))
        .unwrap_or(0.0);

    let viewport = Viewport::new(width, height);
    if !viewport.is_usable() {
        return Err(HostError::BadViewport { width, height });
    }
    Ok(viewport)
}

fn js_dimension(value: Result<JsValue, JsValue>) -> Option<f32> {
    let v = value.ok()?.as_f64()? as f32;
    (v > 0.0).then_some(v)
}

/// Create the display element for a block, sized and colored but not
/// yet positioned or attached
pub fn create_block_element(
    document: &Document,
    color: &str,
    size: f32,
) -> Result<HtmlElement, HostError> {
    let element: HtmlElement = document
        .create_element("div")
        .map_err(|_| HostError::CreateElement("div"))?
        .dyn_into()
        .map_err(|_| HostError::CreateElement("div"))?;
    element.set_class_name("block");
    let style = element.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("width", &format!("{size}px"));
    let _ = style.set_property("height", &format!("{size}px"));
    let _ = style.set_property("background-color", color);
    Ok(element)
}

/// Move a block element to its logical position
pub fn place_block(element: &HtmlElement, x: f32, y: f32) {
    let style = element.style();
    let _ = style.set_property("left", &format!("{x}px"));
    let _ = style.set_property("top", &format!("{y}px"));
}

pub fn remove_element(element: &Element) {
    element.remove();
}

/// Best-effort text update of a stats/display element
pub fn set_text_by_id(document: &Document, id: &str, text: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        element.set_text_content(Some(text));
    }
}

/// Show a page-level error notice without disturbing the rest of the
/// page; it removes itself after a few seconds
pub fn show_error_banner(window: &Window, document: &Document, message: &str) {
    let Ok(body) = body(document) else {
        return;
    };
    let Ok(banner) = document.create_element("div") else {
        return;
    };
    banner.set_class_name("error");
    banner.set_text_content(Some(message));
    if body.append_child(&banner).is_ok() {
        remove_after(window, banner, BANNER_TTL_MS);
    }
}

/// Show a widget-local error message inside the widget's own element
pub fn show_widget_error(window: &Window, document: &Document, parent: &Element, message: &str) {
    let error_div = match parent.query_selector(".error").ok().flatten() {
        Some(existing) => existing,
        None => {
            let Ok(div) = document.create_element("div") else {
                return;
            };
            div.set_class_name("error");
            if parent.append_child(&div).is_err() {
                return;
            }
            div
        }
    };
    error_div.set_text_content(Some(message));
    remove_after(window, error_div, WIDGET_ERROR_TTL_MS);
}

/// Detach an element after a delay
fn remove_after(window: &Window, element: Element, delay_ms: i32) {
    let closure = Closure::once(move || {
        element.remove();
    });
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        );
    closure.forget();
}

/// Register a repeating callback; the closure is leaked for the page
/// lifetime, matching how the widgets are torn down (full page unload)
pub fn set_interval(
    window: &Window,
    closure: Closure<dyn FnMut()>,
    interval_ms: i32,
) -> Result<i32, HostError> {
    let handle = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms,
        )
        .map_err(|_| HostError::Schedule("setInterval"))?;
    closure.forget();
    Ok(handle)
}
