use crate::constants::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wavefield_core::Viewport;
use web_sys as web;

/// CSS viewport size as reported by the window.
pub fn inner_size(window: &web::Window) -> (f64, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    (w.max(1.0), h.max(1.0))
}

/// `navigator.gpu` exists; a usable adapter is checked later.
pub fn has_webgpu(window: &web::Window) -> bool {
    js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
        .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
        .unwrap_or(false)
}

/// `#app-canvas` if the page has one, else a fresh canvas appended to `<body>`.
pub fn find_or_create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    if let Some(el) = document.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", CANVAS_ID, e));
    }
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_id(CANVAS_ID);
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// Backing store at the physical size, CSS box at the viewport size.
pub fn size_canvas(canvas: &web::HtmlCanvasElement, viewport: Viewport) {
    let (w, h) = viewport.physical_size();
    canvas.set_width(w);
    canvas.set_height(h);
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", &format!("{}px", viewport.width));
    _ = style.set_property("height", &format!("{}px", viewport.height));
}

/// Show the fatal-startup message in `<dialog id="error-dialog">`.
pub fn show_error_dialog(document: &web::Document, html: &str) {
    let dialog = match document.get_element_by_id(ERROR_DIALOG_ID) {
        Some(el) => el,
        None => {
            let Ok(el) = document.create_element("dialog") else {
                return;
            };
            el.set_id(ERROR_DIALOG_ID);
            if let Some(body) = document.body() {
                _ = body.append_child(&el);
            }
            el
        }
    };
    dialog.set_inner_html(html);
    match dialog.dyn_into::<web::HtmlDialogElement>() {
        Ok(d) => {
            if let Err(e) = d.show_modal() {
                log::error!("showModal failed: {:?}", e);
            }
        }
        Err(_) => log::error!("#{} is not a <dialog>", ERROR_DIALOG_ID),
    }
}

/// Fade the page title in, if the page has one.
pub fn reveal_title(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(TITLE_ID) {
        el.set_class_name(TITLE_REVEAL_CLASS);
        if let Ok(html) = el.dyn_into::<web::HtmlElement>() {
            _ = html.style().set_property("opacity", "100%");
        }
    }
}

#[inline]
pub fn add_listener(target: &web::EventTarget, event: &str, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("addEventListener({}) failed: {:?}", event, e);
    }
    closure.forget();
}
