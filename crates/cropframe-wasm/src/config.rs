//! Template configuration bindings.

use cropframe_core::config::{CropConfig, TemplateRegistry};
use wasm_bindgen::prelude::*;

/// Crop configurations keyed by template id.
///
/// Unknown template ids resolve to the fallback configuration, so looking
/// one up never fails.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsTemplateRegistry {
    inner: TemplateRegistry,
}

#[wasm_bindgen]
impl JsTemplateRegistry {
    /// Create a registry. Without a fallback, unknown templates get a
    /// square 400 px rectangle crop.
    #[wasm_bindgen(constructor)]
    pub fn new(fallback: Option<JsValue>) -> Result<JsTemplateRegistry, JsValue> {
        let fallback = match fallback {
            Some(value) => parse_config(value)?,
            None => CropConfig::default(),
        };
        Ok(JsTemplateRegistry {
            inner: TemplateRegistry::new(fallback),
        })
    }

    /// Register or replace the configuration for `template_id`.
    pub fn insert(&mut self, template_id: &str, config: JsValue) -> Result<(), JsValue> {
        self.inner.insert(template_id, parse_config(config)?);
        Ok(())
    }

    /// Configuration for `template_id` as a plain camelCase object.
    pub fn crop_config(&self, template_id: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.crop_config(template_id))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.inner.len()
    }
}

fn parse_config(value: JsValue) -> Result<CropConfig, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))
}
