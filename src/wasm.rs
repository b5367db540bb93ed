//! WASM bindings.
//!
//! Exposes the style formatter, the selector grammar, and a document handle
//! to JavaScript via wasm-bindgen. Nodes cross the boundary as their numeric
//! ids.

use wasm_bindgen::prelude::*;

use crate::document::Document;
use crate::dom::NodeId;
use crate::element::InjectPosition;
use crate::selector::Selector;
use crate::style::{self, StyleValue};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(e: crate::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn style_value(value: &JsValue) -> StyleValue {
    if value.is_null() || value.is_undefined() {
        StyleValue::Unset
    } else if let Some(b) = value.as_bool() {
        StyleValue::Bool(b)
    } else if let Some(n) = value.as_f64() {
        StyleValue::Number(n)
    } else if let Some(s) = value.as_string() {
        StyleValue::Text(s)
    } else {
        StyleValue::Unset
    }
}

/// Format a raw style value for `property` with the default pixel table.
#[wasm_bindgen(js_name = formatStyleValue)]
pub fn format_style_value(property: &str, value: JsValue) -> String {
    style::format_style_value(property, style_value(&value))
}

/// Validate a selector and return its canonical text.
#[wasm_bindgen(js_name = normalizeSelector)]
pub fn normalize_selector(selector: &str) -> Result<String, JsValue> {
    Selector::parse(selector)
        .map(|s| s.to_string())
        .map_err(to_js_error)
}

/// A parsed document.
#[wasm_bindgen]
pub struct NickelDocument {
    inner: Document,
}

#[wasm_bindgen]
impl NickelDocument {
    #[wasm_bindgen(constructor)]
    pub fn new(html: &str) -> NickelDocument {
        NickelDocument {
            inner: Document::parse(html),
        }
    }

    /// Ids of the elements matched by `selector`.
    pub fn resolve(&self, selector: &str) -> Result<Vec<u32>, JsValue> {
        let matches = self.inner.resolve(selector).map_err(to_js_error)?;
        Ok(matches.into_iter().map(|n| n.0).collect())
    }

    pub fn first(&self, selector: &str) -> Result<u32, JsValue> {
        self.inner.first(selector).map(|n| n.0).map_err(to_js_error)
    }

    pub fn get(&self, node: u32, key: &str) -> Result<Option<String>, JsValue> {
        self.inner.get(NodeId(node), key).map_err(to_js_error)
    }

    pub fn set(&mut self, node: u32, key: &str, value: &str) -> Result<(), JsValue> {
        self.inner.set(NodeId(node), key, value).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&mut self, node: u32, property: &str, value: JsValue) -> Result<(), JsValue> {
        self.inner
            .set_style(NodeId(node), property, style_value(&value))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getStyle)]
    pub fn get_style(&self, node: u32, property: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .get_style(NodeId(node), property)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = createElement)]
    pub fn create_element(&mut self, tag: &str) -> Result<u32, JsValue> {
        self.inner
            .create_element(tag, Vec::<(String, String)>::new())
            .map(|n| n.0)
            .map_err(to_js_error)
    }

    /// Inject `node` at `position` ("top", "bottom", "before", "after";
    /// bottom when omitted).
    pub fn inject(&mut self, node: u32, target: u32, position: Option<String>) -> Result<(), JsValue> {
        let position = match position {
            Some(p) => p.parse::<InjectPosition>().map_err(to_js_error)?,
            None => InjectPosition::default(),
        };
        self.inner
            .inject(NodeId(node), NodeId(target), position)
            .map_err(to_js_error)
    }

    pub fn destroy(&mut self, node: u32) -> Result<(), JsValue> {
        self.inner.destroy(NodeId(node)).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = toHtml)]
    pub fn to_html(&self) -> Result<String, JsValue> {
        self.inner.to_html().map_err(to_js_error)
    }
}
