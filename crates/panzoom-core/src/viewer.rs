//! The state a display widget holds for one image.
//!
//! A [`Viewer`] starts out `Loading` with a placeholder, switches exactly
//! once to `Ready` (or `Failed`) when the pyramid arrives, and from then on
//! turns input events into redrawn viewport images. It is `Sync`: events
//! may arrive from several threads, and overlapping drag or scroll work is
//! coalesced instead of queued.

use std::sync::{Mutex, MutexGuard};

use image::RgbaImage;
use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::datum::DatumSnapshot;
use crate::engine::{Engine, ViewChange};
use crate::error::{PanZoomError, Result};
use crate::extract::ViewportImage;
use crate::geometry::{DevicePoint, ViewportSize};
use crate::loader::LoadHandle;
use crate::placeholder;
use crate::pyramid::Pyramid;
use crate::single_flight::SingleFlight;
use crate::status::StatusReport;

/// Lifecycle of a viewer.
pub enum ViewerState {
    Loading,
    Ready(Box<Engine>),
    Failed(String),
}

impl ViewerState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Result of feeding one event to a viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// The view changed and a new image is on display.
    Redrawn(ViewChange),
    /// No pyramid yet (or the load failed); the event was ignored.
    NotReady,
    /// Same kind of event already in flight; this one was dropped.
    Coalesced,
    /// Nothing to do (e.g. mouse moved without a drag).
    Unchanged,
}

struct Inner {
    state: ViewerState,
    viewport: Option<ViewportSize>,
    displayed: RgbaImage,
    last_pixel_count: u64,
}

/// Engine view state taken before a mutation, for rolling back when the
/// new view cannot be drawn.
struct Checkpoint {
    viewport: Option<ViewportSize>,
    snapshot: DatumSnapshot,
}

impl Checkpoint {
    fn of(engine: &Engine) -> Self {
        Self {
            viewport: engine.viewport(),
            snapshot: engine.snapshot(),
        }
    }
}

pub struct Viewer {
    inner: Mutex<Inner>,
    config: ViewerConfig,
    drag_flight: SingleFlight,
    scroll_flight: SingleFlight,
    command_flight: SingleFlight,
}

impl Viewer {
    /// A viewer waiting for its pyramid.
    pub fn new(config: ViewerConfig) -> Self {
        let config = config.validated();
        Self {
            inner: Mutex::new(Inner {
                state: ViewerState::Loading,
                viewport: None,
                displayed: placeholder::loading(None, config.max_crop_dimension),
                last_pixel_count: 0,
            }),
            config,
            drag_flight: SingleFlight::new(),
            scroll_flight: SingleFlight::new(),
            command_flight: SingleFlight::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.lock().state.is_ready()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.lock().state, ViewerState::Failed(_))
    }

    pub fn failure(&self) -> Option<String> {
        match &self.lock().state {
            ViewerState::Failed(msg) => Some(msg.clone()),
            _ => None,
        }
    }

    /// Install the outcome of a load. Only the first call has any effect;
    /// returns whether this call did the swap.
    pub fn install(&self, result: Result<Pyramid>) -> bool {
        let mut inner = self.lock();
        if !matches!(inner.state, ViewerState::Loading) {
            warn!("Viewer already initialised; ignoring second load result");
            return false;
        }

        let engine = result.and_then(|pyramid| Engine::new(pyramid, &self.config));
        match engine {
            Ok(engine) => {
                info!(levels = engine.pyramid().height(), "Viewer ready");
                inner.state = ViewerState::Ready(Box::new(engine));
                if let Some(viewport) = inner.viewport {
                    if let Err(e) = Self::fit_and_redraw(&mut inner, viewport) {
                        warn!(error = %e, "Initial fit failed");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Viewer load failed");
                inner.displayed =
                    placeholder::error(inner.viewport, self.config.max_crop_dimension);
                inner.state = ViewerState::Failed(e.to_string());
            }
        }
        true
    }

    /// Poll a background load and install it once finished.
    pub fn poll_loader(&self, handle: &mut LoadHandle) -> bool {
        match handle.try_recv() {
            Some(result) => self.install(result),
            None => false,
        }
    }

    /// Host resize callback. The size is remembered even before the
    /// pyramid arrives and applied when it does. If the refitted view cannot
    /// be drawn, the previous size and view are kept.
    pub fn resize(&self, viewport: ViewportSize) -> Result<Outcome> {
        let mut inner = self.lock();
        let previous = inner.viewport.replace(viewport);
        if inner.state.is_ready() {
            return match Self::fit_and_redraw(&mut inner, viewport) {
                Ok(change) => Ok(Outcome::Redrawn(change)),
                Err(e) => {
                    inner.viewport = previous;
                    Err(e)
                }
            };
        }
        let max_side = self.config.max_crop_dimension;
        inner.displayed = if matches!(inner.state, ViewerState::Failed(_)) {
            placeholder::error(Some(viewport), max_side)
        } else {
            placeholder::loading(Some(viewport), max_side)
        };
        Ok(Outcome::NotReady)
    }

    /// Fit the image to the current viewport (e.g. secondary click).
    pub fn fit(&self) -> Result<Outcome> {
        let Some(_guard) = self.command_flight.try_begin() else {
            return Ok(Outcome::Coalesced);
        };
        self.with_engine(|engine| engine.fit().map(Some))
    }

    /// Mouse wheel / trackpad scroll.
    pub fn scrolled(&self, point: DevicePoint, delta: f64) -> Result<Outcome> {
        let Some(_guard) = self.scroll_flight.try_begin() else {
            return Ok(Outcome::Coalesced);
        };
        self.with_engine(|engine| engine.scroll(point, delta).map(Some))
    }

    /// Explicit zoom command about `point` (e.g. "2" doubles, "1" halves).
    pub fn zoom_by_factor(&self, point: DevicePoint, factor: f64) -> Result<Outcome> {
        let Some(_guard) = self.command_flight.try_begin() else {
            return Ok(Outcome::Coalesced);
        };
        self.with_engine(|engine| engine.zoom_by_factor(point, factor).map(Some))
    }

    pub fn mouse_down(&self, point: DevicePoint) -> Result<Outcome> {
        let mut inner = self.lock();
        match &mut inner.state {
            ViewerState::Ready(engine) => {
                engine.begin_drag(point)?;
                Ok(Outcome::Unchanged)
            }
            _ => Ok(Outcome::NotReady),
        }
    }

    /// Pointer motion; pans when a drag is in progress.
    pub fn mouse_moved(&self, point: DevicePoint) -> Result<Outcome> {
        let Some(_guard) = self.drag_flight.try_begin() else {
            return Ok(Outcome::Coalesced);
        };
        self.with_engine(|engine| engine.drag_to(point))
    }

    pub fn mouse_up(&self) {
        if let ViewerState::Ready(engine) = &mut self.lock().state {
            engine.end_drag();
        }
    }

    /// Copy of the datum for synchronising other viewers.
    pub fn snapshot(&self) -> Option<DatumSnapshot> {
        match &self.lock().state {
            ViewerState::Ready(engine) => Some(engine.snapshot()),
            _ => None,
        }
    }

    /// Adopt another viewer's datum and redraw.
    pub fn apply_snapshot(&self, snapshot: &DatumSnapshot) -> Result<Outcome> {
        self.with_engine(|engine| engine.apply_snapshot(snapshot).map(Some))
    }

    /// What should be on screen right now: placeholder, or the last good crop.
    pub fn displayed_image(&self) -> RgbaImage {
        self.lock().displayed.clone()
    }

    /// Full-resolution loupe window around `point`.
    pub fn loupe_at(&self, point: DevicePoint) -> Result<RgbaImage> {
        match &self.lock().state {
            ViewerState::Ready(engine) => engine.loupe_at(point),
            _ => Err(PanZoomError::NotReady),
        }
    }

    pub fn status(&self, cursor: Option<DevicePoint>) -> Option<StatusReport> {
        let inner = self.lock();
        match &inner.state {
            ViewerState::Ready(engine) => Some(engine.status(cursor, inner.last_pixel_count)),
            _ => None,
        }
    }

    /// Run a mutation on the engine and redraw. On extraction failure the
    /// datum is rolled back, so the displayed image, `snapshot()` and
    /// `status()` keep describing the same view, and the error is returned.
    fn with_engine<F>(&self, op: F) -> Result<Outcome>
    where
        F: FnOnce(&mut Engine) -> Result<Option<ViewChange>>,
    {
        let mut inner = self.lock();
        let (before, change) = match &mut inner.state {
            ViewerState::Ready(engine) => {
                let before = Checkpoint::of(engine);
                (before, op(engine.as_mut())?)
            }
            _ => return Ok(Outcome::NotReady),
        };
        let Some(change) = change else {
            return Ok(Outcome::Unchanged);
        };
        if let Err(e) = Self::redraw(&mut inner) {
            Self::roll_back(&mut inner, &before);
            return Err(e);
        }
        Ok(Outcome::Redrawn(change))
    }

    fn roll_back(inner: &mut Inner, before: &Checkpoint) {
        if let ViewerState::Ready(engine) = &mut inner.state {
            if let Err(e) = engine.restore(before.viewport, &before.snapshot) {
                warn!(error = %e, "Could not restore previous view");
            }
        }
    }

    fn fit_and_redraw(inner: &mut Inner, viewport: ViewportSize) -> Result<ViewChange> {
        let (before, change) = match &mut inner.state {
            ViewerState::Ready(engine) => {
                let before = Checkpoint::of(engine);
                (before, engine.resize(viewport)?)
            }
            _ => return Err(PanZoomError::NotReady),
        };
        if let Err(e) = Self::redraw(inner) {
            Self::roll_back(inner, &before);
            return Err(e);
        }
        Ok(change)
    }

    fn redraw(inner: &mut Inner) -> Result<()> {
        let image = match &inner.state {
            ViewerState::Ready(engine) => engine.current_image(),
            _ => Err(PanZoomError::NotReady),
        };
        match image {
            Ok(ViewportImage {
                image, pixel_count, ..
            }) => {
                inner.displayed = image;
                inner.last_pixel_count = pixel_count;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Keeping previous image");
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
