//! Cropframe WASM - WebAssembly bindings for the crop editor
//!
//! This crate exposes the cropframe-core engine to the browser dialog that
//! hosts the crop editor.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for raster data
//! - `decode` - Photo decoding and stale-decode tracking
//! - `config` - Template crop configuration lookup
//! - `editor` - The interactive crop editor session
//! - `encode` - Output encoding (JPEG, PNG)
//! - `logger` - Console backend for the engine's logging
//!
//! # Usage
//!
//! ```typescript
//! import init, { load_image, JsCropEditor, encode_jpeg } from '@cropframe/wasm';
//!
//! await init();
//!
//! const image = load_image(new Uint8Array(await file.arrayBuffer()));
//! const editor = new JsCropEditor(image, { aspectRatio: 1, shape: 'circle' },
//!   onCropChange, (output) => upload(encode_jpeg(output, 90)), onCancel);
//! ```

use wasm_bindgen::prelude::*;

mod config;
mod decode;
mod editor;
mod encode;
mod logger;
mod types;

// Re-export public types
pub use config::JsTemplateRegistry;
pub use decode::{load_image, JsLoadTicket, JsLoadTracker};
pub use editor::JsCropEditor;
pub use encode::{encode_jpeg, encode_png};
pub use logger::set_log_level;
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
