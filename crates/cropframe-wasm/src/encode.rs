//! Output encoding bindings.
//!
//! The extracted crop is encoded here before upload. Both functions take
//! the `JsRaster` returned by `JsCropEditor.save()`.

use cropframe_core::encode;
use wasm_bindgen::prelude::*;

use crate::types::JsRaster;

/// Encode an output raster as JPEG. `quality` is clamped to 1-100.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsRaster, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(&image.to_raster(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an output raster as PNG.
#[wasm_bindgen]
pub fn encode_png(image: &JsRaster) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(&image.to_raster()).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_from_raster() {
        let img = JsRaster::new(40, 30, vec![128u8; 40 * 30 * 3]);
        let jpeg = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_from_raster() {
        let img = JsRaster::new(3, 3, vec![10u8; 27]);
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
