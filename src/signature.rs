//! Signature Pad Bindings
//!
//! Thin wrapper over the page's `SignaturePad` script (signature_pad.js).
//! When the script is not loaded the pad is simply unavailable.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = SignaturePad)]
    type JsSignaturePad;

    #[wasm_bindgen(constructor, catch)]
    fn new(canvas: &web_sys::HtmlCanvasElement, options: &JsValue) -> Result<JsSignaturePad, JsValue>;

    #[wasm_bindgen(method, js_name = isEmpty)]
    fn is_empty(this: &JsSignaturePad) -> bool;

    #[wasm_bindgen(method, js_name = toDataURL)]
    fn to_data_url(this: &JsSignaturePad) -> String;

    #[wasm_bindgen(method)]
    fn clear(this: &JsSignaturePad);
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PadOptions {
    min_width: f64,
    max_width: f64,
    pen_color: &'static str,
}

pub struct SignaturePad {
    inner: JsSignaturePad,
}

impl SignaturePad {
    /// Attach to a canvas, or `None` if the script is missing
    pub fn attach(canvas: &web_sys::HtmlCanvasElement) -> Option<Self> {
        let options = PadOptions {
            min_width: 2.0,
            max_width: 4.0,
            pen_color: "rgb(0, 0, 0)",
        };
        let options = serde_wasm_bindgen::to_value(&options).ok()?;
        match JsSignaturePad::new(canvas, &options) {
            Ok(inner) => Some(Self { inner }),
            Err(err) => {
                log::warn!(target: "[SIGNATURE]", "signature pad unavailable: {:?}", err);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// PNG data URL, or `None` when nothing has been drawn
    pub fn data_url(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.inner.to_data_url())
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}
