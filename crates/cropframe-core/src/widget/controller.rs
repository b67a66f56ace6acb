//! The selection and crop state machine.
//!
//! ```text
//! Idle <--click--> Selected --request_change--> AwaitingFile
//!                    ^                             |
//!                    |<--- cancelled / bad file ---+--file_chosen--> Cropping
//!                    |                                                |  ^
//!                    +------------------- cancel ---------------------+  | failure
//!                                                                  confirm |
//!                                                                     v    |
//!                                           Idle <--- success --- Uploading
//! ```
//!
//! Every transition runs to completion on the caller's thread. The only
//! suspended work is rasterization: `confirm` hands out a [`RasterTask`] and
//! parks the controller in `Uploading` until `complete_upload` is called
//! with the task's outcome.

use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::config::{ConfigError, WidgetConfig};
use crate::decode::{decode_image_with_limit, DecodedImage};
use crate::geometry::{compute_initial_crop, validate_crop, CropRectangle, Dimensions};
use crate::raster::{EncodedImage, RasterError, RasterOptions, RasterTask};
use crate::reference::{ImageReference, ReferenceStore, SourceLease};

use super::error::{WidgetError, WidgetEvent};
use super::view::{CropView, WidgetState, WidgetView};

/// MIME prefix a picked file must carry.
const IMAGE_MIME_PREFIX: &str = "image/";

/// Callback invoked once per committed image.
pub type ImageChangeHandler = Box<dyn FnMut(&ImageReference)>;

/// A file the user picked, as reported by the host's file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    fn is_image(&self) -> bool {
        self.mime_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(IMAGE_MIME_PREFIX)
    }
}

/// Data owned for the lifetime of one crop.
///
/// Dropping the session revokes the temporary source reference.
#[derive(Debug)]
struct CropSession {
    lease: SourceLease,
    source: Arc<DecodedImage>,
    rect: CropRectangle,
}

impl CropSession {
    fn dimensions(&self) -> Dimensions {
        Dimensions::from_pixels(self.source.width, self.source.height)
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Selected,
    AwaitingFile,
    Cropping(CropSession),
    Uploading(CropSession),
}

impl Phase {
    fn state(&self) -> WidgetState {
        match self {
            Phase::Idle => WidgetState::Idle,
            Phase::Selected => WidgetState::Selected,
            Phase::AwaitingFile => WidgetState::AwaitingFile,
            Phase::Cropping(_) => WidgetState::Cropping,
            Phase::Uploading(_) => WidgetState::Uploading,
        }
    }

    fn session(&self) -> Option<&CropSession> {
        match self {
            Phase::Cropping(session) | Phase::Uploading(session) => Some(session),
            _ => None,
        }
    }
}

/// A clickable image that can be replaced by a cropped upload.
pub struct SelectableImage {
    config: WidgetConfig,
    alt_text: String,
    current: ImageReference,
    phase: Phase,
    store: ReferenceStore,
    on_image_change: Option<ImageChangeHandler>,
    notice: Option<String>,
}

impl fmt::Debug for SelectableImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectableImage")
            .field("config", &self.config)
            .field("alt_text", &self.alt_text)
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl SelectableImage {
    /// Create a widget displaying `initial_image`.
    pub fn new(
        initial_image: ImageReference,
        alt_text: impl Into<String>,
        config: WidgetConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            alt_text: alt_text.into(),
            current: initial_image,
            phase: Phase::Idle,
            store: ReferenceStore::new(),
            on_image_change: None,
            notice: None,
        })
    }

    /// Use a shared reference store instead of a private one.
    pub fn with_store(mut self, store: ReferenceStore) -> Self {
        self.store = store;
        self
    }

    /// Register the callback invoked with each committed image.
    pub fn set_on_image_change(&mut self, handler: impl FnMut(&ImageReference) + 'static) {
        self.on_image_change = Some(Box::new(handler));
    }

    pub fn state(&self) -> WidgetState {
        self.phase.state()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    /// The image currently displayed.
    pub fn current_image(&self) -> &ImageReference {
        &self.current
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    /// Pending crop rectangle while cropping or uploading.
    pub fn crop_rectangle(&self) -> Option<CropRectangle> {
        self.phase.session().map(|session| session.rect)
    }

    /// Temporary reference to the picked file while cropping or uploading.
    pub fn pending_reference(&self) -> Option<&ImageReference> {
        self.phase.session().map(|session| session.lease.reference())
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> WidgetView {
        let crop = self.phase.session().map(|session| CropView {
            source_uri: session.lease.reference().uri().to_string(),
            source: session.dimensions(),
            rect: session.rect,
            tool: self.config.crop_tool(),
        });
        WidgetView::project(
            self.state(),
            self.current.uri(),
            &self.alt_text,
            crop,
            self.notice.as_deref(),
        )
    }

    /// Toggle selection.
    pub fn click(&mut self) -> Result<WidgetState, WidgetError> {
        let result = match self.phase {
            Phase::Idle => Ok(self.enter(Phase::Selected)),
            Phase::Selected => Ok(self.enter(Phase::Idle)),
            _ => self.ignore(WidgetEvent::Click),
        };
        self.report(result)
    }

    /// Open the file chooser.
    pub fn request_change(&mut self) -> Result<WidgetState, WidgetError> {
        let result = match self.phase {
            Phase::Selected => Ok(self.enter(Phase::AwaitingFile)),
            _ => self.ignore(WidgetEvent::RequestChange),
        };
        self.report(result)
    }

    /// The chooser was dismissed without a file.
    pub fn file_dialog_cancelled(&mut self) -> Result<WidgetState, WidgetError> {
        let result = match self.phase {
            Phase::AwaitingFile => Ok(self.enter(Phase::Selected)),
            _ => self.ignore(WidgetEvent::FileDialogCancelled),
        };
        self.report(result)
    }

    /// Start cropping a picked file.
    ///
    /// Non-image files are rejected before decoding. Any failure returns the
    /// widget to `Selected`.
    pub fn file_chosen(&mut self, file: PickedFile) -> Result<WidgetState, WidgetError> {
        let result = match self.phase {
            Phase::AwaitingFile => match self.open_session(file) {
                Ok(session) => Ok(self.enter(Phase::Cropping(session))),
                Err(err) => {
                    self.enter(Phase::Selected);
                    Err(err)
                }
            },
            _ => self.ignore(WidgetEvent::FileChosen),
        };
        self.report(result)
    }

    fn open_session(&self, file: PickedFile) -> Result<CropSession, WidgetError> {
        if !file.is_image() {
            return Err(WidgetError::UnsupportedFileType(file.mime_type));
        }

        let source = decode_image_with_limit(&file.bytes, self.config.max_source_pixels)?;
        let dimensions = Dimensions::from_pixels(source.width, source.height);
        let rect = compute_initial_crop(dimensions, self.config.target)?;
        log::debug!(
            "picked {} {}x{}, seeded crop {:?}",
            file.mime_type,
            source.width,
            source.height,
            rect
        );

        Ok(CropSession {
            lease: self.store.lease(file.mime_type, file.bytes),
            source: Arc::new(source),
            rect,
        })
    }

    /// Replace the pending rectangle with one reported by the crop editor.
    ///
    /// A rejected rectangle leaves the previous one in place.
    pub fn adjust(&mut self, rect: CropRectangle) -> Result<WidgetState, WidgetError> {
        let min = self.config.min_crop_dimension;
        let Phase::Cropping(session) = &mut self.phase else {
            let result = self.ignore(WidgetEvent::Adjust);
            return self.report(result);
        };

        let result = validate_crop(rect, session.dimensions(), min)
            .map(|valid| {
                session.rect = valid;
                WidgetState::Cropping
            })
            .map_err(WidgetError::from);
        self.report(result)
    }

    /// Start rasterizing the pending crop.
    ///
    /// Returns `None` when there is nothing to confirm. The returned task must
    /// be run and its outcome passed to [`complete_upload`](Self::complete_upload).
    pub fn confirm(&mut self) -> Result<Option<RasterTask>, WidgetError> {
        let result = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Cropping(session) => {
                let task = RasterTask::new(
                    Arc::clone(&session.source),
                    session.rect,
                    self.config.target,
                    self.raster_options(),
                );
                self.enter_from(WidgetState::Cropping, Phase::Uploading(session));
                Ok(Some(task))
            }
            other => {
                self.phase = other;
                self.ignore(WidgetEvent::Confirm).map(|_| None)
            }
        };
        self.report(result)
    }

    /// Resume after the raster task settled.
    ///
    /// On success the new image becomes the display source, the handler is
    /// called once and the temporary source is released. On failure the
    /// widget returns to `Cropping` with the same rectangle so the user can
    /// retry or cancel.
    pub fn complete_upload(
        &mut self,
        outcome: Result<EncodedImage, RasterError>,
    ) -> Result<WidgetState, WidgetError> {
        let result = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Uploading(session) => match outcome {
                Ok(encoded) => {
                    let reference = encoded.into_reference(&self.store);
                    drop(session);
                    log::info!("committed new image {}", reference);
                    self.current = reference;
                    if let Some(handler) = self.on_image_change.as_mut() {
                        handler(&self.current);
                    }
                    Ok(self.enter_from(WidgetState::Uploading, Phase::Idle))
                }
                Err(err) => {
                    self.enter_from(WidgetState::Uploading, Phase::Cropping(session));
                    Err(WidgetError::from(err))
                }
            },
            other => {
                // Leave any pending notice alone
                self.phase = other;
                log::debug!("stray raster completion in {} state", self.state().as_str());
                return Ok(self.state());
            }
        };
        self.report(result)
    }

    /// Confirm and rasterize on the current thread.
    pub fn confirm_blocking(&mut self) -> Result<WidgetState, WidgetError> {
        match self.confirm()? {
            Some(task) => self.complete_upload(task.run()),
            None => Ok(self.state()),
        }
    }

    /// Abandon the crop and release the picked file.
    pub fn cancel(&mut self) -> Result<WidgetState, WidgetError> {
        let result = match self.phase {
            Phase::Cropping(_) => Ok(self.enter(Phase::Selected)),
            _ => self.ignore(WidgetEvent::Cancel),
        };
        self.report(result)
    }

    fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            filter: self.config.resample_filter,
            quality: self.config.jpeg_quality,
        }
    }

    /// Switch phase; dropping the old one releases any session it held.
    fn enter(&mut self, next: Phase) -> WidgetState {
        self.enter_from(self.state(), next)
    }

    fn enter_from(&mut self, from: WidgetState, next: Phase) -> WidgetState {
        self.phase = next;
        let to = self.state();
        log::debug!("{} -> {}", from.as_str(), to.as_str());
        to
    }

    /// Outcome for an event that does not apply to the current state.
    fn ignore(&self, event: WidgetEvent) -> Result<WidgetState, WidgetError> {
        match self.phase {
            Phase::Uploading(_) => Err(WidgetError::OperationInProgress(event)),
            _ => {
                log::trace!("{} ignored in {} state", event, self.state().as_str());
                Ok(self.state())
            }
        }
    }

    /// Record the outcome of an action as the current notice.
    fn report<T>(&mut self, result: Result<T, WidgetError>) -> Result<T, WidgetError> {
        match &result {
            Ok(_) => self.notice = None,
            Err(err) => {
                log::warn!("{}", err);
                self.notice = Some(err.to_string());
            }
        }
        result
    }
}
