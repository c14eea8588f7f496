//! Crop editor bindings.
//!
//! [`JsCropEditor`] wraps one core crop session together with the surface it
//! renders into. The orchestrator forwards pointer and zoom events, paints
//! the RGBA frame returned by `render()`, and hears about changes through
//! the callbacks it passed to the constructor.
//!
//! # Example
//!
//! ```typescript
//! const editor = new JsCropEditor(image, config,
//!   (crop) => store.crop = crop,
//!   (output, crop) => upload(encode_jpeg(output, 90), crop),
//!   () => dialog.close());
//!
//! canvas.onpointerdown = (e) => editor.pointer_down(e.pointerId, e.offsetX, e.offsetY);
//! const frame = new ImageData(new Uint8ClampedArray(editor.render()), editor.surface_size);
//! ```

use cropframe_core::config::CropConfig;
use cropframe_core::decode::Raster;
use cropframe_core::geometry::{CropData, DEFAULT_SURFACE_SIZE};
use cropframe_core::render::Surface;
use cropframe_core::session::{CropObserver, CropSession, SessionError};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, JsRaster};

/// Forwards session events to optional JS callbacks.
#[derive(Default)]
struct JsCallbacks {
    on_crop_change: Option<Function>,
    on_save: Option<Function>,
    on_cancel: Option<Function>,
}

fn report(result: Result<JsValue, JsValue>, event: &str) {
    if let Err(e) = result {
        log::warn!("{event} callback failed: {e:?}");
    }
}

fn crop_to_js(crop: &CropData) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(crop).map_err(|e| JsValue::from_str(&e.to_string()))
}

impl CropObserver for JsCallbacks {
    fn crop_changed(&mut self, crop: &CropData) {
        if let Some(callback) = &self.on_crop_change {
            report(
                crop_to_js(crop).and_then(|value| callback.call1(&JsValue::NULL, &value)),
                "crop change",
            );
        }
    }

    fn saved(&mut self, output: &Raster, crop: &CropData) {
        if let Some(callback) = &self.on_save {
            let output = JsValue::from(JsRaster::from_raster(output.clone()));
            report(
                crop_to_js(crop).and_then(|value| callback.call2(&JsValue::NULL, &output, &value)),
                "save",
            );
        }
    }

    fn cancelled(&mut self) {
        if let Some(callback) = &self.on_cancel {
            report(callback.call0(&JsValue::NULL), "cancel");
        }
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One crop editing session.
#[wasm_bindgen]
pub struct JsCropEditor {
    session: CropSession<JsCallbacks>,
    surface: Surface,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Open an editor on a decoded photo.
    ///
    /// `config` is a plain object such as
    /// `{ aspectRatio: 1, shape: "circle", defaultSize: 400 }`. The
    /// `on_crop_change` callback fires once before the constructor returns
    /// with the initial crop.
    #[wasm_bindgen(constructor)]
    pub fn new(
        image: &JsRaster,
        config: JsValue,
        on_crop_change: Option<Function>,
        on_save: Option<Function>,
        on_cancel: Option<Function>,
    ) -> Result<JsCropEditor, JsValue> {
        let config: CropConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?;
        let callbacks = JsCallbacks {
            on_crop_change,
            on_save,
            on_cancel,
        };
        Self::open(image.to_raster(), config, callbacks).map_err(to_js_error)
    }

    /// Edge length of the square frame returned by `render()`.
    #[wasm_bindgen(getter)]
    pub fn surface_size(&self) -> u32 {
        self.session.surface_size()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Current crop as `{ x, y, width, height, scale }`.
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        crop_to_js(&self.session.crop())
    }

    pub fn pointer_down(&mut self, pointer_id: i32, x: f64, y: f64) -> bool {
        self.session.pointer_down(pointer_id, x, y)
    }

    pub fn pointer_move(&mut self, pointer_id: i32, x: f64, y: f64) -> bool {
        self.session.pointer_move(pointer_id, x, y)
    }

    pub fn pointer_up(&mut self, pointer_id: i32) -> bool {
        self.session.pointer_up(pointer_id)
    }

    pub fn pointer_cancel(&mut self) {
        self.session.pointer_cancel();
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom(true);
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom(false);
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Reopen a crop saved by an earlier session.
    pub fn restore(&mut self, saved: JsValue) -> Result<(), JsValue> {
        let saved: CropData = serde_wasm_bindgen::from_value(saved)
            .map_err(|e| JsValue::from_str(&format!("Invalid saved crop: {}", e)))?;
        self.session.restore(&saved);
        Ok(())
    }

    /// Filter used by `preview()` and `save()`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
    pub fn set_filter(&mut self, filter: u8) {
        self.session.set_filter(filter_from_u8(filter));
    }

    /// Draw the current frame and return it as straight-alpha RGBA bytes.
    pub fn render(&mut self) -> Vec<u8> {
        self.session.render(&mut self.surface);
        self.surface.to_rgba()
    }

    /// Output raster for the current crop, without saving.
    pub fn preview(&self) -> Result<JsRaster, JsValue> {
        self.session
            .preview()
            .map(JsRaster::from_raster)
            .map_err(to_js_error)
    }

    /// Commit the crop. Fires `on_save` with the output raster and crop.
    pub fn save(&mut self) -> Result<JsRaster, JsValue> {
        self.session
            .save()
            .map(JsRaster::from_raster)
            .map_err(to_js_error)
    }

    /// Abandon the editor. Fires `on_cancel`; the editor is freed.
    pub fn cancel(self) {
        self.session.cancel();
    }
}

impl JsCropEditor {
    fn open(
        raster: Raster,
        config: CropConfig,
        callbacks: JsCallbacks,
    ) -> Result<Self, SessionError> {
        let session =
            CropSession::from_raster(raster, config, DEFAULT_SURFACE_SIZE as u32, callbacks)?;
        let surface = session.new_surface()?;
        Ok(Self { session, surface })
    }
}


/// WASM-specific tests that require JsValue.
///
/// These tests exercise the constructor and callbacks, which take `JsValue`
/// parameters and can only run on wasm32 targets. Use `wasm-pack test` to
/// run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn config(json: &str) -> JsValue {
        js_sys::JSON::parse(json).unwrap()
    }

    fn image() -> JsRaster {
        JsRaster::new(400, 300, vec![200; 400 * 300 * 3])
    }

    #[wasm_bindgen_test]
    fn test_constructor_reads_camel_case_config() {
        let editor = JsCropEditor::new(
            &image(),
            config(
                r##"{"aspectRatio": 1.5, "shape": "rounded-square", "borderRadius": 12,
                    "defaultSize": 300, "safeArea": {"showGuide": false, "color": "#ff0000"}}"##,
            ),
            None,
            None,
            None,
        )
        .unwrap();
        let output = editor.preview().unwrap();
        assert_eq!((output.width(), output.height()), (300, 200));
    }

    #[wasm_bindgen_test]
    fn test_constructor_rejects_invalid_aspect_ratio() {
        let result = JsCropEditor::new(&image(), config(r#"{"aspectRatio": 0}"#), None, None, None);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_crop_change_callback_fires_on_open() {
        let calls = js_sys::Array::new();
        let push = Function::new_with_args("crop", "this.push(crop)").bind(&calls);
        let _editor =
            JsCropEditor::new(&image(), config(r#"{"aspectRatio": 1}"#), Some(push), None, None)
                .unwrap();
        assert_eq!(calls.length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_crop_round_trips_through_restore() {
        let mut editor =
            JsCropEditor::new(&image(), config(r#"{"aspectRatio": 1}"#), None, None, None).unwrap();
        editor.zoom_in();
        let saved = editor.crop().unwrap();

        editor.reset();
        editor.restore(saved).unwrap();
        assert!((editor.session.crop().scale - 1.2).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn test_restore_rejects_malformed_crop() {
        let mut editor =
            JsCropEditor::new(&image(), config(r#"{"aspectRatio": 1}"#), None, None, None).unwrap();
        assert!(editor.restore(JsValue::from_str("nope")).is_err());
    }
}
