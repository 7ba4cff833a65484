//! Toolbar drag tracking.
//!
//! The toolbar slides along one axis, chosen by the current device
//! orientation, with travel clamped so the last toolbar button stays
//! visible. Input detection stays in the host (DOM events and element
//! measurement); this module is the pure state layer, so the clamping and
//! hysteresis rules are testable without a UI.

/// Axis selector, re-evaluated on every viewport or orientation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Toolbar travels vertically.
    Portrait,
    /// Toolbar travels horizontally.
    Landscape,
}

/// A pointer sample from the host. `buttons` carries the mouse button
/// bitmask and is `None` for touch input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub page_x: f64,
    pub page_y: f64,
    pub buttons: Option<u8>,
}

/// A recognized drag movement. The host applies the translate on the given
/// axis, suppresses pointer events on the embedded frame while the drag is
/// live, and suppresses the default action of the move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMove {
    pub translate: f64,
    pub orientation: Orientation,
}

/// Outcome of a terminated drag. When `suppress_click` is set the host
/// re-enables frame pointer events and swallows the trailing click so it
/// does not reach an underlying control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub suppress_click: bool,
}

/// Distance before a drag is recognized as moving.
const DRAG_START_THRESHOLD: f64 = 8.0;
/// Distance between applied updates once already moving.
const DRAG_MOVE_THRESHOLD: f64 = 1.0;

/// Pointer-drag state for the toolbar.
#[derive(Debug, Clone)]
pub struct DragController {
    orientation: Orientation,
    translate: f64,
    translate_max: f64,
    pointer_origin: Option<f64>,
    moving: bool,
}

impl DragController {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            translate: 0.0,
            translate_max: 0.0,
            pointer_origin: None,
            moving: false,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Currently applied translate along the active axis.
    #[must_use]
    pub fn translate(&self) -> f64 {
        self.translate
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Orientation changed; the current translate is re-applied on the new
    /// axis.
    pub fn set_orientation(&mut self, orientation: Orientation) -> DragMove {
        self.orientation = orientation;
        DragMove {
            translate: self.translate,
            orientation,
        }
    }

    /// Begin tracking a drag. `last_button_axis_position` is the axis
    /// coordinate of the last toolbar button, measured by the host; it fixes
    /// the most negative allowed translate so that button stays visible.
    pub fn on_drag_start(&mut self, pointer: PointerInput, last_button_axis_position: f64) {
        self.pointer_origin = Some(self.axis_coordinate(pointer) - self.translate);
        self.translate_max = -last_button_axis_position + self.translate;
    }

    /// Track a pointer move. Returns the translate to apply, or `None` when
    /// the sample is ignored (no drag in progress, wrong button state, or
    /// inside the hysteresis window).
    pub fn on_drag_move(&mut self, pointer: PointerInput) -> Option<DragMove> {
        let origin = self.pointer_origin?;
        if pointer.buttons.is_some_and(|buttons| buttons != 1) {
            return None;
        }
        let mut candidate = self.axis_coordinate(pointer) - origin;
        if candidate > 0.0 {
            candidate = 0.0;
        }
        if candidate < self.translate_max {
            candidate = self.translate_max;
        }
        let threshold = if self.moving {
            DRAG_MOVE_THRESHOLD
        } else {
            DRAG_START_THRESHOLD
        };
        if (self.translate - candidate).abs() > threshold {
            self.translate = candidate;
            self.moving = true;
            Some(DragMove {
                translate: candidate,
                orientation: self.orientation,
            })
        } else {
            None
        }
    }

    /// Terminate the drag. Tracking state always clears, whether or not a
    /// drag was recognized.
    pub fn on_drag_end(&mut self) -> DragEnd {
        let suppress_click = self.moving;
        self.pointer_origin = None;
        self.moving = false;
        DragEnd { suppress_click }
    }

    fn axis_coordinate(&self, pointer: PointerInput) -> f64 {
        match self.orientation {
            Orientation::Portrait => pointer.page_y,
            Orientation::Landscape => pointer.page_x,
        }
    }
}
