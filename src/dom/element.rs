// ============================================================================
// ELEMENT HELPERS - Funciones básicas para manipular DOM
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn get_element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document()
        .ok_or_else(|| JsValue::from_str("No document"))
        .and_then(|doc| doc.create_element(tag))
}

/// Mostrar/ocultar con la clase `hidden` (Tailwind)
pub fn set_hidden(element: &Element, hidden: bool) -> Result<(), JsValue> {
    if hidden {
        element.class_list().add_1("hidden")
    } else {
        element.class_list().remove_1("hidden")
    }
}

pub fn set_text_content(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

/// Todos los elementos que casan con el selector, ya convertidos al tipo pedido.
/// Los que no son de ese tipo se descartan.
pub fn query_all<T: JsCast>(root: &Document, selector: &str) -> Vec<T> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        log::warn!("⚠️ [DOM] Selector inválido: {}", selector);
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Valor de un campo `name=...` dentro de un formulario (input o textarea)
pub fn field_value(form: &Element, name: &str) -> String {
    let Ok(Some(field)) = form.query_selector(&format!("[name=\"{}\"]", name)) else {
        return String::new();
    };
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(textarea) = field.dyn_ref::<HtmlTextAreaElement>() {
        textarea.value()
    } else {
        String::new()
    }
}

/// Estado de un checkbox `name=...` del formulario; `false` si no existe
pub fn field_checked(form: &Element, name: &str) -> bool {
    form.query_selector(&format!("input[name=\"{}\"]", name))
        .ok()
        .flatten()
        .and_then(|field| field.dyn_into::<HtmlInputElement>().ok())
        .is_some_and(|input| input.checked())
}

/// Navegar a otra página
pub fn navigate_to(path: &str) {
    if let Some(win) = window() {
        if let Err(e) = win.location().set_href(path) {
            log::error!("❌ [DOM] Error navegando a {}: {:?}", path, e);
        }
    }
}

/// Mensaje modal simple (alert del navegador)
pub fn show_message(message: &str) {
    if let Some(win) = window() {
        if let Err(e) = win.alert_with_message(message) {
            log::error!("❌ [DOM] Error mostrando mensaje: {:?}", e);
        }
    }
}
