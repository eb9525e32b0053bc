// flipbook_core: page-flip interaction engine for the web.
// Gesture classification, flip animation and navigation state live here; JS forwards
// DOM events and paints whatever frame comes back.

mod animation;
mod drag;
mod error;
mod flip;
mod flipbook;
mod keyboard;
mod overlay;
mod pose;
mod sequence;
mod tap;
mod types;

use wasm_bindgen::prelude::*;

pub use animation::{ease_out_quint, AnimationEngine, AnimationToken, SettleProfile};
pub use drag::{DragRecognizer, DragRelease, DragSession, DragUpdate};
pub use error::FlipbookError;
pub use flip::{CrossFade, FlipCompletion, FlipController, SurfaceState};
pub use flipbook::Flipbook;
pub use keyboard::{Key, SurfaceCommand, ViewerCommand};
pub use overlay::{OverlayAction, OverlayRecognizer, ViewerState};
pub use pose::{Lighting, RotationState, SheetPose};
pub use sequence::Sequence;
pub use tap::{TapAction, TapDisambiguator, TapMemory, TapSample};
pub use types::*;

/// Initialize panic hook and console logging for the browser.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "wasm-logger")]
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
}

fn js_error(err: FlipbookError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_sample(sample_json: &str) -> Result<PointerSample, JsValue> {
    serde_json::from_str(sample_json).map_err(|e| js_error(e.into()))
}

/// Main engine interface exposed to JavaScript. One instance per rendered flipbook.
///
/// Pointer samples are JSON objects:
/// ```json
/// {
///   "pointer_id": 1,
///   "kind": "touch",
///   "button": 0,
///   "x": 412.5,
///   "y": 300.0,
///   "timestamp": 1523000,
///   "on_control": false,
///   "rect": { "left": 0, "top": 64, "width": 480, "height": 680 }
/// }
/// ```
/// Timestamps are microseconds on the same clock passed to `tick`.
#[wasm_bindgen]
pub struct Engine {
    flipbook: Flipbook,
}

#[wasm_bindgen]
impl Engine {
    /// `config_json` may be `{}`; every threshold has a default.
    /// `items_json` is a non-empty array of `{ "source": ..., "label": ... }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, items_json: &str) -> Result<Engine, JsValue> {
        let config: FlipbookConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let items: Vec<Item> = serde_json::from_str(items_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid items: {}", e)))?;

        let flipbook = Flipbook::new(items, config).map_err(js_error)?;
        Ok(Engine { flipbook })
    }

    pub fn position(&self) -> usize {
        self.flipbook.position()
    }

    pub fn count(&self) -> usize {
        self.flipbook.surface().sequence().len()
    }

    /// Follow `prefers-reduced-motion` changes.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.flipbook.set_reduced_motion(reduced);
    }

    /// Returns true when a drag session (or viewer press) started.
    pub fn pointer_down(&mut self, sample_json: &str) -> Result<bool, JsValue> {
        let sample = parse_sample(sample_json)?;
        Ok(self.flipbook.pointer_down(&sample))
    }

    pub fn pointer_move(&mut self, sample_json: &str) -> Result<(), JsValue> {
        let sample = parse_sample(sample_json)?;
        self.flipbook.pointer_move(&sample);
        Ok(())
    }

    pub fn pointer_up(&mut self, sample_json: &str) -> Result<(), JsValue> {
        let sample = parse_sample(sample_json)?;
        self.flipbook.pointer_up(&sample);
        Ok(())
    }

    pub fn pointer_cancel(&mut self, sample_json: &str) -> Result<(), JsValue> {
        let sample = parse_sample(sample_json)?;
        self.flipbook.pointer_cancel(&sample);
        Ok(())
    }

    pub fn pointer_leave(&mut self) {
        self.flipbook.pointer_leave();
    }

    pub fn double_click(&mut self) {
        self.flipbook.double_click();
    }

    /// `key` is `KeyboardEvent.key`. Returns true when the host should `preventDefault`.
    pub fn key_down(&mut self, key: &str, in_text_input: bool, now_us: u64) -> bool {
        match Key::from_dom_key(key) {
            Some(key) => self
                .flipbook
                .key_down(key, in_text_input, Timestamp::from_micros(now_us)),
            None => false,
        }
    }

    pub fn flip_forward(&mut self, now_us: u64) -> bool {
        self.flipbook.flip_forward(Timestamp::from_micros(now_us))
    }

    pub fn flip_backward(&mut self, now_us: u64) -> bool {
        self.flipbook.flip_backward(Timestamp::from_micros(now_us))
    }

    /// Animated jump, e.g. from a paginator dot.
    pub fn go_to(&mut self, target: i32, now_us: u64) -> bool {
        self.flipbook
            .go_to(i64::from(target), Timestamp::from_micros(now_us))
    }

    /// Instant jump.
    pub fn set_position(&mut self, target: i32) -> bool {
        self.flipbook.set_position(i64::from(target))
    }

    pub fn open_viewer(&mut self) {
        self.flipbook.open_viewer();
    }

    pub fn close_viewer(&mut self) {
        self.flipbook.close_viewer();
    }

    pub fn viewer_next(&mut self) {
        self.flipbook.viewer_command(ViewerCommand::Next);
    }

    pub fn viewer_previous(&mut self) {
        self.flipbook.viewer_command(ViewerCommand::Previous);
    }

    pub fn toggle_zoom(&mut self) {
        self.flipbook.toggle_zoom();
    }

    /// Advance one animation frame (call from requestAnimationFrame) and return the
    /// frame to paint as JSON.
    pub fn tick(&mut self, now_us: u64) -> Result<String, JsValue> {
        let frame = self.flipbook.tick(Timestamp::from_micros(now_us));
        serde_json::to_string(&frame)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Current frame without advancing time.
    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.flipbook.frame())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Lifecycle events since the last call, as a JSON array.
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        let events = self.flipbook.drain_events();
        serde_json::to_string(&events)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
