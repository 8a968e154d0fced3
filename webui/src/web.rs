use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element, HtmlElement, HtmlTableElement, HtmlTableRowElement, HtmlTableSectionElement};

use crate::behavior::initialize;
use crate::dom::Document;

/// [`Document`] backed by the browser DOM.
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn cell(row: &Element, cell: usize) -> Option<Element> {
        let row = row.dyn_ref::<HtmlTableRowElement>()?;
        row.cells().item(u32::try_from(cell).ok()?)
    }
}

impl Document for WebDocument {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_class_name(&self, element: &Element, class_name: &str) {
        element.set_class_name(class_name);
    }

    fn table_body(&self, table: &Element) -> Option<Element> {
        table.dyn_ref::<HtmlTableElement>()?.t_bodies().item(0)
    }

    fn rows(&self, body: &Element) -> Vec<Element> {
        match body.dyn_ref::<HtmlTableSectionElement>() {
            Some(section) => {
                let rows = section.rows();
                (0..rows.length()).filter_map(|i| rows.item(i)).collect()
            }
            None => Vec::new(),
        }
    }

    fn cell_data(&self, row: &Element, cell: usize, name: &str) -> Option<String> {
        Self::cell(row, cell)?.get_attribute(&format!("data-{name}"))
    }

    fn cell_text(&self, row: &Element, cell: usize) -> Option<String> {
        let cell = Self::cell(row, cell)?;
        match cell.dyn_ref::<HtmlElement>() {
            Some(html) => Some(html.inner_text()),
            None => cell.text_content(),
        }
    }

    fn outer_html(&self, element: &Element) -> String {
        element.outer_html()
    }

    fn set_inner_html(&self, element: &Element, html: &str) {
        element.set_inner_html(html);
    }

    fn on_click(&self, element: &Element, handler: Box<dyn Fn()>) {
        let cb = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.set_onclick(Some(cb.as_ref().unchecked_ref())),
            None => {
                if element.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()).is_err() {
                    console::error_1(&"failed to bind click handler".into());
                }
            }
        }
        // Handlers live as long as the page.
        cb.forget();
    }

    fn report_error(&self, message: &str) {
        console::error_1(&message.into());
    }
}

/// Entry point run by the wasm-bindgen glue once the report markup is loaded.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let document = web_sys::window()
        .and_then(|win| win.document())
        .ok_or_else(|| js_sys::Error::new("du-diff: no document available"))?;
    let page = initialize(Rc::new(WebDocument::new(document)))
        .map_err(|e| js_sys::Error::new(&format!("du-diff: {e}")))?;
    console::debug_1(&format!("du-diff: report ready, {} depth levels", page.depth_levels()).into());
    Ok(())
}
