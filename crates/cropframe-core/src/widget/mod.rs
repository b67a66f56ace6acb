//! The selectable image widget.
//!
//! [`SelectableImage`] owns the interaction state and the pending crop. Hosts
//! feed it input events, draw the [`WidgetView`] it projects, and receive each
//! committed image through the registered change handler.

mod controller;
mod error;
mod view;

pub use controller::{ImageChangeHandler, PickedFile, SelectableImage};
pub use error::{WidgetError, WidgetEvent};
pub use view::{CropView, WidgetState, WidgetView, CHANGE_BUTTON_LABEL, UPLOADING_BUTTON_LABEL};
