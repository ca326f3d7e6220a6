#![deny(unsafe_code)]
//! Browser bindings for folio.
//!
//! Exposes the canvas backgrounds ([`Background`]), the typewriter headline
//! and the card tilt transform to the page's JavaScript.

mod background;
mod canvas;

use folio_effects::{Tilt, Typewriter as TypewriterState};
use folio_scenes::SceneKind;
use wasm_bindgen::prelude::*;

pub use background::Background;
pub use canvas::CanvasSurface;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Names accepted by [`Background::start`].
#[wasm_bindgen(js_name = listScenes)]
pub fn list_scenes() -> Vec<String> {
    SceneKind::list_scenes()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// CSS transform for a pointer at `(x, y)` inside a `width` x `height` card.
#[wasm_bindgen(js_name = tiltTransform)]
pub fn tilt_transform(x: f64, y: f64, width: f64, height: f64) -> String {
    Tilt::from_pointer(x, y, width, height).to_css()
}

/// CSS transform for a card the pointer just left.
#[wasm_bindgen(js_name = tiltReset)]
pub fn tilt_reset() -> String {
    Tilt::default().to_css()
}

#[wasm_bindgen]
pub struct Typewriter {
    inner: TypewriterState,
}

#[wasm_bindgen]
impl Typewriter {
    #[wasm_bindgen(constructor)]
    pub fn new(texts: Vec<String>, delay_ms: Option<f64>) -> Typewriter {
        Typewriter {
            inner: TypewriterState::with_delay(texts, delay_ms.unwrap_or(0.0)),
        }
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.inner.advance(elapsed_ms);
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.text().to_string()
    }

    #[wasm_bindgen(getter, js_name = cursorVisible)]
    pub fn cursor_visible(&self) -> bool {
        self.inner.cursor_visible()
    }
}
