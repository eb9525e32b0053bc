// Per-surface context object. Routes pointer and keyboard input to the book
// surface or, while it is open, to the full-screen viewer.

use log::debug;

use crate::error::FlipbookError;
use crate::flip::FlipController;
use crate::keyboard::{self, Key, SurfaceCommand, ViewerCommand};
use crate::overlay::{OverlayAction, OverlayRecognizer};
use crate::tap::TapAction;
use crate::types::*;

#[derive(Debug)]
pub struct Flipbook {
    surface: FlipController,
    viewer: OverlayRecognizer,
}

impl Flipbook {
    pub fn new(items: Vec<Item>, config: FlipbookConfig) -> Result<Self, FlipbookError> {
        let surface = FlipController::new(items, &config)?;
        Ok(Flipbook {
            surface,
            viewer: OverlayRecognizer::new(config.overlay, config.tap),
        })
    }

    pub fn surface(&self) -> &FlipController {
        &self.surface
    }

    pub fn viewer(&self) -> &OverlayRecognizer {
        &self.viewer
    }

    pub fn position(&self) -> usize {
        self.surface.position()
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.surface.set_reduced_motion(reduced);
    }

    // -------------------------------------------------------------------------
    // Pointer input
    // -------------------------------------------------------------------------

    pub fn pointer_down(&mut self, sample: &PointerSample) -> bool {
        if self.viewer.is_open() {
            self.viewer.pointer_down(sample);
            return true;
        }
        self.surface.pointer_down(sample)
    }

    pub fn pointer_move(&mut self, sample: &PointerSample) {
        if !self.viewer.is_open() {
            self.surface.pointer_move(sample);
        }
    }

    pub fn pointer_up(&mut self, sample: &PointerSample) {
        if self.viewer.is_open() {
            let action = self.viewer.pointer_up(sample);
            self.apply_overlay(action);
            return;
        }
        if self.surface.pointer_up(sample, sample.timestamp) == TapAction::OpenViewer {
            self.open_viewer();
        }
    }

    pub fn pointer_cancel(&mut self, sample: &PointerSample) {
        self.pointer_up(sample);
    }

    pub fn pointer_leave(&mut self) {
        self.surface.pointer_leave();
    }

    /// Mouse double-click: opens the viewer from the book, toggles zoom inside it.
    pub fn double_click(&mut self) {
        if self.viewer.is_open() {
            let action = self.viewer.double_click();
            self.apply_overlay(action);
        } else {
            self.open_viewer();
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Returns true when the key was consumed (host should `preventDefault`).
    pub fn key_down(&mut self, key: Key, in_text_input: bool, now: Timestamp) -> bool {
        if in_text_input {
            return false;
        }

        if self.viewer.is_open() {
            let Some(command) = keyboard::viewer_command(key) else {
                return false;
            };
            self.viewer_command(command);
            return true;
        }

        let Some(command) = keyboard::surface_command(key) else {
            return false;
        };
        let last = self.surface.sequence().last_index() as i64;
        match command {
            SurfaceCommand::FlipForward => {
                self.surface.flip_forward(now);
            }
            SurfaceCommand::FlipBackward => {
                self.surface.flip_backward(now);
            }
            SurfaceCommand::First => {
                self.surface.go_to(0, now);
            }
            SurfaceCommand::Last => {
                self.surface.go_to(last, now);
            }
            SurfaceCommand::OpenViewer => self.open_viewer(),
        }
        true
    }

    // -------------------------------------------------------------------------
    // Viewer
    // -------------------------------------------------------------------------

    pub fn open_viewer(&mut self) {
        if self.viewer.is_open() {
            return;
        }
        self.surface.cancel_drag();
        if self.viewer.open() {
            self.surface.clear_tap_memory();
            self.surface.emit(FlipEvent::ViewerOpened);
        }
    }

    pub fn close_viewer(&mut self) {
        if self.viewer.close() {
            self.surface.emit(FlipEvent::ViewerClosed);
        }
    }

    pub fn toggle_zoom(&mut self) {
        if let Some(zoomed) = self.viewer.toggle_zoom() {
            debug!("viewer zoom {zoomed}");
            self.surface.emit(FlipEvent::ZoomToggled { zoomed });
        }
    }

    /// Buttons, backdrop and keys inside the viewer all land here. Navigation is instant.
    pub fn viewer_command(&mut self, command: ViewerCommand) {
        if !self.viewer.is_open() {
            return;
        }
        let position = self.surface.position() as i64;
        match command {
            ViewerCommand::Next => {
                self.surface.set_position(position + 1);
            }
            ViewerCommand::Previous => {
                self.surface.set_position(position - 1);
            }
            ViewerCommand::First => {
                self.surface.set_position(0);
            }
            ViewerCommand::Last => {
                let last = self.surface.sequence().last_index() as i64;
                self.surface.set_position(last);
            }
            ViewerCommand::ToggleZoom => self.toggle_zoom(),
            ViewerCommand::Close => self.close_viewer(),
        }
    }

    fn apply_overlay(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::None => {}
            OverlayAction::Step(Direction::Forward) => self.viewer_command(ViewerCommand::Next),
            OverlayAction::Step(Direction::Backward) => {
                self.viewer_command(ViewerCommand::Previous)
            }
            OverlayAction::ToggleZoom => self.toggle_zoom(),
        }
    }

    // -------------------------------------------------------------------------
    // Programmatic navigation and output
    // -------------------------------------------------------------------------

    pub fn flip_forward(&mut self, now: Timestamp) -> bool {
        self.surface.flip_forward(now)
    }

    pub fn flip_backward(&mut self, now: Timestamp) -> bool {
        self.surface.flip_backward(now)
    }

    /// Animated jump (paginator dots, Home/End).
    pub fn go_to(&mut self, target: i64, now: Timestamp) -> bool {
        self.surface.go_to(target, now)
    }

    /// Instant jump.
    pub fn set_position(&mut self, target: i64) -> bool {
        self.surface.set_position(target)
    }

    pub fn tick(&mut self, now: Timestamp) -> SurfaceFrame {
        self.surface.tick(now);
        self.frame()
    }

    pub fn frame(&self) -> SurfaceFrame {
        self.surface.frame(self.viewer.frame())
    }

    pub fn drain_events(&mut self) -> Vec<FlipEvent> {
        self.surface.drain_events()
    }
}
