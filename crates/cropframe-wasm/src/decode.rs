//! Photo decoding bindings.
//!
//! Uploads are decoded asynchronously on the JS side, so a slow decode can
//! finish after the user already picked another photo. [`JsLoadTracker`]
//! drops those late results.

use cropframe_core::decode::{self, LoadTicket, LoadTracker};
use wasm_bindgen::prelude::*;

use crate::types::JsRaster;

/// Decode JPEG, PNG or WebP bytes, applying EXIF orientation.
#[wasm_bindgen]
pub fn load_image(bytes: &[u8]) -> Result<JsRaster, JsValue> {
    decode::load_image(bytes)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Handle for one decode request.
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl JsLoadTicket {
    /// Reference (URL, file name) the ticket was issued for.
    #[wasm_bindgen(getter)]
    pub fn source_ref(&self) -> String {
        self.inner.source_ref().to_string()
    }
}

/// Tracks which decode request is the current one.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsLoadTracker {
    inner: LoadTracker,
}

#[wasm_bindgen]
impl JsLoadTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsLoadTracker {
        JsLoadTracker::default()
    }

    /// Start a decode for `source_ref`, superseding any earlier one.
    pub fn begin(&mut self, source_ref: &str) -> JsLoadTicket {
        JsLoadTicket {
            inner: self.inner.begin(source_ref),
        }
    }

    pub fn is_current(&self, ticket: &JsLoadTicket) -> bool {
        self.inner.is_current(&ticket.inner)
    }

    /// Forget the current request (dialog closed).
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Decode the bytes fetched for `ticket`.
    ///
    /// Returns `undefined` when a newer request has replaced this one.
    pub fn finish(&mut self, ticket: &JsLoadTicket, bytes: &[u8]) -> Result<Option<JsRaster>, JsValue> {
        self.inner
            .finish(&ticket.inner, bytes)
            .map(|raster| raster.map(JsRaster::from_raster))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut tracker = JsLoadTracker::new();
        let first = tracker.begin("a.jpg");
        let second = tracker.begin("b.jpg");

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert_eq!(second.source_ref(), "b.jpg");
    }

    #[test]
    fn test_stale_finish_is_discarded() {
        let mut tracker = JsLoadTracker::new();
        let stale = tracker.begin("a.jpg");
        tracker.begin("b.jpg");

        // Stale tickets short-circuit before the bytes are decoded
        let result = tracker.finish(&stale, b"not decoded");
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_clear_invalidates_ticket() {
        let mut tracker = JsLoadTracker::new();
        let ticket = tracker.begin("a.jpg");
        tracker.clear();
        assert!(!tracker.is_current(&ticket));
    }
}
