//! Full-size viewer state: which image is shown, whether it is still
//! loading, and the zoom/pan transform applied to it.

use crate::render::CardView;

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageVariant {
    Raw,
    #[default]
    Processed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageStatus {
    #[default]
    Loading,
    Loaded,
    /// Load failed; the (broken) image element is still revealed.
    Failed,
}

/// Where a pointer event landed inside the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Image,
    Wrapper,
    Controls,
    Content,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    kind: PointerKind,
    /// Pointer position minus the offset at press time.
    anchor: Point,
}

#[derive(Debug)]
pub struct ModalViewer {
    card: Option<CardView>,
    variant: ImageVariant,
    status: ImageStatus,
    scale: f64,
    offset: Point,
    drag: Option<Drag>,
    scroll_locked: bool,
}

impl Default for ModalViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalViewer {
    pub fn new() -> Self {
        Self {
            card: None,
            variant: ImageVariant::default(),
            status: ImageStatus::default(),
            scale: MIN_SCALE,
            offset: Point::ORIGIN,
            drag: None,
            scroll_locked: false,
        }
    }

    /// Shows `card` with its processed image and locks page scroll.
    /// Returns the image source to start loading.
    pub fn open(&mut self, card: CardView) -> &str {
        self.card = Some(card);
        self.scroll_locked = true;
        self.show(ImageVariant::Processed)
    }

    /// Switches between raw and processed, restarting the load sequence.
    pub fn show(&mut self, variant: ImageVariant) -> &str {
        self.reset_zoom();
        self.variant = variant;
        self.status = ImageStatus::Loading;
        self.current_src().unwrap_or_default()
    }

    pub fn close(&mut self) {
        self.reset_zoom();
        self.card = None;
        self.scroll_locked = false;
    }

    /// Clicks on the backdrop close the modal; clicks inside do not.
    pub fn click(&mut self, target: Target) {
        if target == Target::Backdrop {
            self.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.card.is_some()
    }

    pub fn card(&self) -> Option<&CardView> {
        self.card.as_ref()
    }

    pub fn variant(&self) -> ImageVariant {
        self.variant
    }

    pub fn current_src(&self) -> Option<&str> {
        let card = self.card.as_ref()?;
        Some(match self.variant {
            ImageVariant::Raw => &card.raw_url,
            ImageVariant::Processed => &card.processed_url,
        })
    }

    /// Load events for a source other than the current one are stale and ignored.
    pub fn image_loaded(&mut self, src: &str) {
        self.finish_load(src, ImageStatus::Loaded);
    }

    pub fn image_failed(&mut self, src: &str) {
        self.finish_load(src, ImageStatus::Failed);
    }

    fn finish_load(&mut self, src: &str, status: ImageStatus) {
        if self.status == ImageStatus::Loading && self.current_src() == Some(src) {
            self.status = status;
        }
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.is_open() && self.status == ImageStatus::Loading
    }

    pub fn is_image_visible(&self) -> bool {
        self.is_open() && self.status != ImageStatus::Loading
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + ZOOM_STEP).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - ZOOM_STEP).max(MIN_SCALE);
    }

    pub fn reset_zoom(&mut self) {
        self.scale = MIN_SCALE;
        self.offset = Point::ORIGIN;
        self.drag = None;
    }

    /// Starts a pan when pressing on the image or its wrapper.
    pub fn pointer_down(&mut self, kind: PointerKind, target: Target, at: Point) -> bool {
        if !self.is_open() || !matches!(target, Target::Image | Target::Wrapper) {
            return false;
        }

        self.drag = Some(Drag {
            kind,
            anchor: Point::new(at.x - self.offset.x, at.y - self.offset.y),
        });
        true
    }

    /// Moves the image while a pan is active. Returns `true` when the host
    /// should suppress the event's default action (for touch, page scroll).
    pub fn pointer_move(&mut self, kind: PointerKind, at: Point) -> bool {
        match self.drag {
            Some(drag) if drag.kind == kind => {
                self.offset = Point::new(at.x - drag.anchor.x, at.y - drag.anchor.y);
                true
            }
            _ => false,
        }
    }

    /// Pointer-up, touch-end and pointer-leave all release the pan.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn is_panning(&self) -> bool {
        self.drag.is_some()
    }

    /// CSS `transform` for the image element.
    pub fn transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset.x, self.offset.y, self.scale
        )
    }
}
