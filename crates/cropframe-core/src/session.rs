//! One crop editing session.
//!
//! A [`CropSession`] owns everything the editor needs between opening a
//! photo and committing (or abandoning) the crop: the decoded raster, the
//! template's config, the current [`CropData`] and the pointer state.
//! Every mutation is reported to a [`CropObserver`].

use thiserror::Error;

use crate::config::CropConfig;
use crate::decode::{load_image, ImageLoadError, ImageSize, Raster};
use crate::extract::{apply_crop, ImageProcessingError, InterpolationFilter};
use crate::geometry::{
    apply_drag, apply_zoom, compute_display_transform, initialize_crop, reset, restore, CropData,
    DisplayTransform, ScreenRect, DEFAULT_SURFACE_SIZE,
};
use crate::interaction::{PointerId, PointerSession};
use crate::render::{render, RenderError, RenderSource, Surface};

/// Errors that prevent a session from opening.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] ImageLoadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The render surface must be at least one pixel wide.
    #[error("Invalid surface size {0}")]
    InvalidSurfaceSize(u32),
}

/// Receives session events.
///
/// Every method has an empty default so observers only implement what they
/// care about.
pub trait CropObserver {
    /// The crop rectangle changed (open, drag, zoom, reset or restore).
    fn crop_changed(&mut self, _crop: &CropData) {}

    /// The crop was committed and extracted.
    fn saved(&mut self, _output: &Raster, _crop: &CropData) {}

    /// The session was abandoned without saving.
    fn cancelled(&mut self) {}
}

/// Observer that ignores every event.
impl CropObserver for () {}

/// Editing state for one photo and one template.
pub struct CropSession<O: CropObserver> {
    raster: Raster,
    source: RenderSource,
    config: CropConfig,
    surface_size: u32,
    crop: CropData,
    pointer: PointerSession,
    filter: InterpolationFilter,
    observer: O,
}

impl<O: CropObserver> CropSession<O> {
    /// Decode `bytes` and open a session on the default surface size.
    ///
    /// Nothing is created when decoding fails.
    pub fn open(bytes: &[u8], config: CropConfig, observer: O) -> Result<Self, SessionError> {
        let raster = load_image(bytes)?;
        Self::from_raster(raster, config, DEFAULT_SURFACE_SIZE as u32, observer)
    }

    /// Open a session on an already decoded raster.
    pub fn from_raster(
        raster: Raster,
        config: CropConfig,
        surface_size: u32,
        observer: O,
    ) -> Result<Self, SessionError> {
        if surface_size == 0 {
            return Err(SessionError::InvalidSurfaceSize(surface_size));
        }
        if raster.is_empty() || !raster.is_consistent() {
            return Err(ImageLoadError::EmptyImage {
                width: raster.width,
                height: raster.height,
            }
            .into());
        }
        let source = RenderSource::from_raster(&raster)?;
        let crop = initialize_crop(raster.size(), &config, f64::from(surface_size));

        log::debug!(
            "opened crop session: {}x{} image, {:?} window, aspect {}",
            raster.width,
            raster.height,
            config.shape(),
            config.aspect_ratio()
        );

        let mut session = Self {
            raster,
            source,
            config,
            surface_size,
            crop,
            pointer: PointerSession::new(),
            filter: InterpolationFilter::default(),
            observer,
        };
        session.notify();
        Ok(session)
    }

    /// Use `filter` for [`preview`](Self::preview) and [`save`](Self::save).
    pub fn set_filter(&mut self, filter: InterpolationFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> InterpolationFilter {
        self.filter
    }

    pub fn crop(&self) -> CropData {
        self.crop
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn image_size(&self) -> ImageSize {
        self.raster.size()
    }

    pub fn surface_size(&self) -> u32 {
        self.surface_size
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    /// Current placement of the photo on the surface.
    pub fn display_transform(&self) -> DisplayTransform {
        compute_display_transform(self.image_size(), &self.crop, f64::from(self.surface_size))
    }

    /// Current crop window on the surface.
    pub fn crop_screen_rect(&self) -> ScreenRect {
        self.display_transform().crop_screen_rect(&self.crop)
    }

    fn notify(&mut self) {
        self.observer.crop_changed(&self.crop);
    }

    fn replace_crop(&mut self, crop: CropData) {
        if crop != self.crop {
            self.crop = crop;
            self.notify();
        }
    }

    /// Start a drag. A press anywhere on the surface grabs the crop window.
    pub fn pointer_down(&mut self, pointer: PointerId, x: f64, y: f64) -> bool {
        self.pointer.begin(pointer, x, y)
    }

    /// Move the crop window with the dragging pointer.
    ///
    /// Returns whether the crop changed. Moves from other pointers and
    /// moves that end up fully clamped change nothing.
    pub fn pointer_move(&mut self, pointer: PointerId, x: f64, y: f64) -> bool {
        let Some((dx, dy)) = self.pointer.update(pointer, x, y) else {
            return false;
        };
        let transform = self.display_transform();
        let moved = apply_drag(&self.crop, dx, dy, &transform, self.image_size());
        let changed = moved != self.crop;
        self.replace_crop(moved);
        changed
    }

    pub fn pointer_up(&mut self, pointer: PointerId) -> bool {
        self.pointer.end(pointer)
    }

    /// Lost pointer capture or an OS-level cancel.
    pub fn pointer_cancel(&mut self) {
        self.pointer.cancel();
    }

    /// One zoom step in or out.
    pub fn zoom(&mut self, zoom_in: bool) {
        let zoomed = apply_zoom(&self.crop, zoom_in, self.image_size());
        self.replace_crop(zoomed);
    }

    /// Discard drag and zoom history.
    ///
    /// Always reports the crop, even when it was already at its initial state.
    pub fn reset(&mut self) {
        self.pointer.cancel();
        self.crop = reset(&self.config, self.image_size(), f64::from(self.surface_size));
        self.notify();
    }

    /// Reopen a previously saved crop, clamped to this image.
    pub fn restore(&mut self, saved: &CropData) {
        self.pointer.cancel();
        self.crop = restore(
            saved,
            &self.config,
            self.image_size(),
            f64::from(self.surface_size),
        );
        self.notify();
    }

    /// Allocate a surface matching this session.
    pub fn new_surface(&self) -> Result<Surface, RenderError> {
        Surface::new(self.surface_size)
    }

    /// Draw the current frame. `surface` should come from [`new_surface`](Self::new_surface).
    pub fn render(&self, surface: &mut Surface) {
        if surface.size() != self.surface_size {
            log::warn!(
                "rendering a {}px session onto a {}px surface",
                self.surface_size,
                surface.size()
            );
        }
        render(
            surface,
            &self.source,
            &self.crop,
            &self.display_transform(),
            &self.config,
        );
    }

    /// Extract the current crop at the output size without committing it.
    pub fn preview(&self) -> Result<Raster, ImageProcessingError> {
        apply_crop(
            &self.raster,
            &self.crop,
            self.config.output_size(),
            self.filter,
        )
    }

    /// Commit the crop: extract the output raster and report it.
    ///
    /// On failure nothing is reported and the session stays open unchanged.
    pub fn save(&mut self) -> Result<Raster, ImageProcessingError> {
        let output = self.preview().inspect_err(|e| {
            log::warn!("crop apply rejected: {e}");
        })?;
        log::info!(
            "saved {}x{} crop from source {:?}",
            output.width,
            output.height,
            self.crop.source_rect()
        );
        self.observer.saved(&output, &self.crop);
        Ok(output)
    }

    /// Abandon the session and hand back the observer.
    pub fn cancel(mut self) -> O {
        log::debug!("crop session cancelled");
        self.pointer.cancel();
        self.observer.cancelled();
        self.observer
    }
}
