//! Render projection of the widget.
//!
//! A renderer never inspects the controller directly; it draws a
//! [`WidgetView`], which is a pure function of the current state.

use serde::Serialize;

use crate::geometry::{CropRectangle, CropToolConfig, Dimensions};

/// Label of the change button while idle.
pub const CHANGE_BUTTON_LABEL: &str = "Change Image";

/// Label of the change button while an upload is in flight.
pub const UPLOADING_BUTTON_LABEL: &str = "Uploading...";

/// Externally visible state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Idle,
    Selected,
    AwaitingFile,
    Cropping,
    Uploading,
}

impl WidgetState {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetState::Idle => "idle",
            WidgetState::Selected => "selected",
            WidgetState::AwaitingFile => "awaiting_file",
            WidgetState::Cropping => "cropping",
            WidgetState::Uploading => "uploading",
        }
    }
}

/// What the crop editor should display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropView {
    /// Display source for the picked file.
    pub source_uri: String,
    pub source: Dimensions,
    pub rect: CropRectangle,
    pub tool: CropToolConfig,
}

/// Everything a renderer needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub state: WidgetState,
    pub image_uri: String,
    pub alt_text: String,
    /// Selection ring and dimmed image.
    pub highlighted: bool,
    pub show_change_button: bool,
    pub change_button_label: &'static str,
    pub change_button_disabled: bool,
    /// Present while cropping or uploading.
    pub crop: Option<CropView>,
    /// Message for the most recent rejected action.
    pub notice: Option<String>,
}

impl WidgetView {
    pub(crate) fn project(
        state: WidgetState,
        image_uri: &str,
        alt_text: &str,
        crop: Option<CropView>,
        notice: Option<&str>,
    ) -> Self {
        let uploading = state == WidgetState::Uploading;
        Self {
            state,
            image_uri: image_uri.to_string(),
            alt_text: alt_text.to_string(),
            highlighted: state != WidgetState::Idle,
            show_change_button: state != WidgetState::Idle,
            change_button_label: if uploading {
                UPLOADING_BUTTON_LABEL
            } else {
                CHANGE_BUTTON_LABEL
            },
            change_button_disabled: state != WidgetState::Selected,
            crop,
            notice: notice.map(str::to_string),
        }
    }
}
