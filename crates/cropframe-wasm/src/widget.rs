//! The selectable image widget as a JavaScript class.
//!
//! Every event method returns the new state name (`"idle"`, `"selected"`,
//! `"awaiting_file"`, `"cropping"`, `"uploading"`) or throws the user-facing
//! message of the rejected action.
//!
//! # Example
//!
//! ```typescript
//! const widget = new JsSelectableImage(bannerUrl, 'Homepage banner', 1230, 120);
//! widget.set_on_image_change((uri) => save(widget.resolve(uri)));
//!
//! widget.click();
//! widget.request_change();
//! widget.file_chosen(file.type, new Uint8Array(await file.arrayBuffer()));
//! render(widget.view());
//!
//! if (widget.begin_confirm()) {
//!   await nextFrame(); // let the "Uploading..." label paint
//!   widget.finish_confirm();
//! }
//! ```

use crate::types::js_error;
use cropframe_core::geometry::CropRectangle;
use cropframe_core::raster::RasterTask;
use cropframe_core::reference::ImageReference;
use cropframe_core::widget::{PickedFile, SelectableImage, WidgetError, WidgetState};
use cropframe_core::WidgetConfig;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsSelectableImage {
    inner: SelectableImage,
    pending: Option<RasterTask>,
}

fn state_name(result: Result<WidgetState, WidgetError>) -> Result<String, JsValue> {
    result.map(|state| state.as_str().to_string()).map_err(js_error)
}

#[wasm_bindgen]
impl JsSelectableImage {
    /// Create a widget with the default settings and the given output size.
    #[wasm_bindgen(constructor)]
    pub fn new(
        initial_uri: String,
        alt_text: String,
        target_width: u32,
        target_height: u32,
    ) -> Result<JsSelectableImage, JsValue> {
        let config = WidgetConfig::with_target(target_width, target_height).map_err(js_error)?;
        Self::build(initial_uri, alt_text, config)
    }

    /// Create a widget from a full `WidgetConfig` object; missing fields take
    /// their defaults.
    pub fn with_config(
        initial_uri: String,
        alt_text: String,
        config: JsValue,
    ) -> Result<JsSelectableImage, JsValue> {
        let config: WidgetConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        Self::build(initial_uri, alt_text, config)
    }

    /// Register the function called with the URI of each committed image.
    pub fn set_on_image_change(&mut self, callback: js_sys::Function) {
        self.inner.set_on_image_change(move |reference: &ImageReference| {
            let uri = JsValue::from_str(reference.uri());
            if let Err(err) = callback.call1(&JsValue::NULL, &uri) {
                log::error!("on_image_change handler threw: {:?}", err);
            }
        });
    }

    pub fn click(&mut self) -> Result<String, JsValue> {
        state_name(self.inner.click())
    }

    pub fn request_change(&mut self) -> Result<String, JsValue> {
        state_name(self.inner.request_change())
    }

    pub fn file_chosen(&mut self, mime_type: String, bytes: Vec<u8>) -> Result<String, JsValue> {
        state_name(self.inner.file_chosen(PickedFile::new(mime_type, bytes)))
    }

    pub fn file_dialog_cancelled(&mut self) -> Result<String, JsValue> {
        state_name(self.inner.file_dialog_cancelled())
    }

    pub fn adjust(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<String, JsValue> {
        state_name(self.inner.adjust(CropRectangle::new(x, y, width, height)))
    }

    /// Confirm and rasterize in one call.
    pub fn confirm(&mut self) -> Result<String, JsValue> {
        state_name(self.inner.confirm_blocking())
    }

    /// Enter `uploading` without doing the pixel work yet.
    ///
    /// Returns `true` when a crop was pending. Call `finish_confirm` afterwards.
    pub fn begin_confirm(&mut self) -> Result<bool, JsValue> {
        let task = self.inner.confirm().map_err(js_error)?;
        let started = task.is_some();
        self.pending = task;
        Ok(started)
    }

    /// Run the raster work started by `begin_confirm`.
    pub fn finish_confirm(&mut self) -> Result<String, JsValue> {
        match self.pending.take() {
            Some(task) => state_name(self.inner.complete_upload(task.run())),
            None => Ok(self.inner.state().as_str().to_string()),
        }
    }

    pub fn cancel(&mut self) -> Result<String, JsValue> {
        state_name(self.inner.cancel())
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    /// URI of the image currently displayed.
    #[wasm_bindgen(getter)]
    pub fn image_uri(&self) -> String {
        self.inner.current_image().uri().to_string()
    }

    /// Render projection as a plain JS object.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.view()).map_err(js_error)
    }

    /// Bytes behind a widget-issued URI, or `undefined` once released.
    pub fn resolve(&self, uri: &str) -> Option<Vec<u8>> {
        let store = self.inner.store();
        let reference = store.lookup_uri(uri)?;
        store.resolve(&reference).map(|stored| stored.bytes.to_vec())
    }

    /// MIME type behind a widget-issued URI.
    pub fn resolve_mime_type(&self, uri: &str) -> Option<String> {
        let store = self.inner.store();
        let reference = store.lookup_uri(uri)?;
        store.resolve(&reference).map(|stored| stored.mime_type)
    }

    /// Release a committed image the host no longer displays.
    ///
    /// The current image and a crop in progress are never released here.
    pub fn release(&self, uri: &str) -> bool {
        let store = self.inner.store();
        let Some(reference) = store.lookup_uri(uri) else {
            return false;
        };
        if &reference == self.inner.current_image()
            || Some(&reference) == self.inner.pending_reference()
        {
            log::warn!("refusing to release in-use image {}", uri);
            return false;
        }
        store.revoke(&reference)
    }
}

impl JsSelectableImage {
    fn build(
        initial_uri: String,
        alt_text: String,
        config: WidgetConfig,
    ) -> Result<JsSelectableImage, JsValue> {
        let inner = SelectableImage::new(ImageReference::external(initial_uri), alt_text, config)
            .map_err(js_error)?;
        Ok(JsSelectableImage {
            inner,
            pending: None,
        })
    }
}
