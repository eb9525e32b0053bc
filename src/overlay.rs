// Gestures inside the full-screen viewer: horizontal swipes step instantly,
// double-tap / double-click toggles zoom. Swipes are disabled while zoomed.

use log::debug;

use crate::tap::TapMemory;
use crate::types::*;

/// Viewer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Closed,
    Open { zoomed: bool },
}

/// What a viewer gesture asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    /// Instant one-step jump.
    Step(Direction),
    ToggleZoom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    pointer_id: PointerId,
    x: f32,
    y: f32,
}

#[derive(Debug, Clone)]
pub struct OverlayRecognizer {
    settings: OverlaySettings,
    tap: TapSettings,
    state: ViewerState,
    press: Option<Press>,
    taps: TapMemory,
}

impl OverlayRecognizer {
    pub fn new(settings: OverlaySettings, tap: TapSettings) -> Self {
        OverlayRecognizer {
            settings,
            tap,
            state: ViewerState::Closed,
            press: None,
            taps: TapMemory::new(),
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open { .. })
    }

    pub fn is_zoomed(&self) -> bool {
        matches!(self.state, ViewerState::Open { zoomed: true })
    }

    /// Opens unzoomed with scroll at origin. Returns false if already open.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = ViewerState::Open { zoomed: false };
        self.press = None;
        self.taps.clear();
        debug!("viewer opened");
        true
    }

    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ViewerState::Closed;
        self.press = None;
        debug!("viewer closed");
        true
    }

    /// Flip zoom. Returns the new zoom flag, or `None` if the viewer is closed.
    pub fn toggle_zoom(&mut self) -> Option<bool> {
        match self.state {
            ViewerState::Open { zoomed } => {
                self.state = ViewerState::Open { zoomed: !zoomed };
                Some(!zoomed)
            }
            ViewerState::Closed => None,
        }
    }

    pub fn pointer_down(&mut self, sample: &PointerSample) {
        if !self.is_open() {
            return;
        }
        self.press = Some(Press {
            pointer_id: sample.pointer_id,
            x: sample.x,
            y: sample.y,
        });
    }

    pub fn pointer_up(&mut self, sample: &PointerSample) -> OverlayAction {
        if !self.is_open() {
            return OverlayAction::None;
        }
        let Some(press) = self.press.take() else {
            return OverlayAction::None;
        };
        if press.pointer_id != sample.pointer_id {
            self.press = Some(press);
            return OverlayAction::None;
        }

        let dx = sample.x - press.x;
        let dy = sample.y - press.y;

        if !self.is_zoomed()
            && dx.abs() > self.settings.swipe_min_px
            && dx.abs() > dy.abs() * self.settings.swipe_axis_ratio
        {
            self.taps.clear();
            let direction = Direction::from_drag_dx(dx);
            debug!("viewer swipe {direction:?} ({dx:.0}px)");
            return OverlayAction::Step(direction);
        }

        if sample.kind.is_touch_like() {
            let is_tap = dx.abs() < self.settings.tap_slop_px && dy.abs() < self.settings.tap_slop_px;
            if is_tap
                && self.taps.register(
                    sample.timestamp,
                    sample.x,
                    sample.y,
                    self.tap.double_tap_window_ms,
                    self.tap.double_tap_slop_px,
                )
            {
                return OverlayAction::ToggleZoom;
            }
        }

        OverlayAction::None
    }

    /// Mouse double-click inside the viewer.
    pub fn double_click(&self) -> OverlayAction {
        if self.is_open() {
            OverlayAction::ToggleZoom
        } else {
            OverlayAction::None
        }
    }

    pub fn frame(&self) -> ViewerFrame {
        ViewerFrame {
            open: self.is_open(),
            zoomed: self.is_zoomed(),
        }
    }
}

impl Default for OverlayRecognizer {
    fn default() -> Self {
        Self::new(OverlaySettings::default(), TapSettings::default())
    }
}
