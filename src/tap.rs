// Tap and double-tap classification for releases that never became a drag.

use log::debug;

use crate::types::*;

/// A release point, both surface-local (px) and normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapSample {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub nx: f32,
    pub ny: f32,
    pub timestamp: Timestamp,
}

impl TapSample {
    pub fn from_pointer(sample: &PointerSample) -> Self {
        let (x, y) = sample.rect.local(sample.x, sample.y);
        let (nx, ny) = sample.rect.normalize(sample.x, sample.y);
        TapSample {
            kind: sample.kind,
            x,
            y,
            nx,
            ny,
            timestamp: sample.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TapRecord {
    at: Timestamp,
    x: f32,
    y: f32,
}

/// Memory of the previous tap, used to pair a second tap with it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TapMemory {
    last: Option<TapRecord>,
}

impl TapMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap. Returns true (and forgets the pair) when it completes a
    /// double-tap; otherwise it becomes the new "last tap".
    pub fn register(&mut self, at: Timestamp, x: f32, y: f32, window_ms: u32, slop_px: f32) -> bool {
        if let Some(prev) = self.last {
            let within_window = at.millis_since(prev.at) < f64::from(window_ms);
            let within_slop = (x - prev.x).abs() < slop_px && (y - prev.y).abs() < slop_px;
            if within_window && within_slop {
                self.last = None;
                return true;
            }
        }
        self.last = Some(TapRecord { at, x, y });
        false
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}

/// What a classified tap asks the surface to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Flip(Direction),
    OpenViewer,
    /// Single center tap (reserved for double-tap) or the dead band.
    Inert,
}

/// Region-based tap classifier with center double-tap memory.
#[derive(Debug, Clone)]
pub struct TapDisambiguator {
    settings: TapSettings,
    memory: TapMemory,
}

impl TapDisambiguator {
    pub fn new(settings: TapSettings) -> Self {
        TapDisambiguator {
            settings,
            memory: TapMemory::new(),
        }
    }

    pub fn in_center(&self, nx: f32, ny: f32) -> bool {
        let s = &self.settings;
        nx > s.center_min_x && nx < s.center_max_x && ny > s.center_min_y && ny < s.center_max_y
    }

    pub fn classify(&mut self, tap: &TapSample) -> TapAction {
        if self.in_center(tap.nx, tap.ny) {
            if tap.kind.is_touch_like()
                && self.memory.register(
                    tap.timestamp,
                    tap.x,
                    tap.y,
                    self.settings.double_tap_window_ms,
                    self.settings.double_tap_slop_px,
                )
            {
                debug!("center double-tap at ({:.0}, {:.0})", tap.x, tap.y);
                return TapAction::OpenViewer;
            }
            return TapAction::Inert;
        }

        if tap.nx > self.settings.forward_min_x {
            self.memory.clear();
            TapAction::Flip(Direction::Forward)
        } else if tap.nx < self.settings.backward_max_x {
            self.memory.clear();
            TapAction::Flip(Direction::Backward)
        } else {
            TapAction::Inert
        }
    }

    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    pub fn memory(&self) -> &TapMemory {
        &self.memory
    }
}

impl Default for TapDisambiguator {
    fn default() -> Self {
        Self::new(TapSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(kind: PointerKind, x: f32, y: f32, at_ms: u64) -> TapSample {
        // Surface is 500 x 700 at the origin.
        TapSample {
            kind,
            x,
            y,
            nx: x / 500.0,
            ny: y / 700.0,
            timestamp: Timestamp::from_micros(at_ms * 1000),
        }
    }

    #[test]
    fn center_double_tap_opens_viewer() {
        let mut taps = TapDisambiguator::default();
        assert_eq!(taps.classify(&tap(PointerKind::Touch, 250.0, 350.0, 1_000)), TapAction::Inert);
        assert_eq!(
            taps.classify(&tap(PointerKind::Touch, 258.0, 344.0, 1_300)),
            TapAction::OpenViewer
        );
        assert!(taps.memory().is_empty());
    }

    #[test]
    fn slow_second_tap_does_not_open() {
        let mut taps = TapDisambiguator::default();
        taps.classify(&tap(PointerKind::Touch, 250.0, 350.0, 1_000));
        assert_eq!(taps.classify(&tap(PointerKind::Touch, 250.0, 350.0, 1_400)), TapAction::Inert);
        // The slow tap became the new reference.
        assert_eq!(
            taps.classify(&tap(PointerKind::Touch, 250.0, 350.0, 1_600)),
            TapAction::OpenViewer
        );
    }

    #[test]
    fn distant_second_tap_does_not_open() {
        let mut taps = TapDisambiguator::default();
        taps.classify(&tap(PointerKind::Touch, 250.0, 350.0, 1_000));
        assert_eq!(taps.classify(&tap(PointerKind::Touch, 270.0, 350.0, 1_100)), TapAction::Inert);
    }

    #[test]
    fn mouse_center_clicks_are_inert() {
        let mut taps = TapDisambiguator::default();
        assert_eq!(taps.classify(&tap(PointerKind::Mouse, 250.0, 350.0, 0)), TapAction::Inert);
        assert_eq!(taps.classify(&tap(PointerKind::Mouse, 250.0, 350.0, 100)), TapAction::Inert);
        assert!(taps.memory().is_empty());
    }

    #[test]
    fn edge_taps_flip_and_clear_memory() {
        let mut taps = TapDisambiguator::default();
        taps.classify(&tap(PointerKind::Touch, 250.0, 350.0, 0));
        assert_eq!(
            taps.classify(&tap(PointerKind::Touch, 450.0, 350.0, 50)),
            TapAction::Flip(Direction::Forward)
        );
        assert!(taps.memory().is_empty());
        assert_eq!(
            taps.classify(&tap(PointerKind::Mouse, 40.0, 350.0, 60)),
            TapAction::Flip(Direction::Backward)
        );
    }

    #[test]
    fn top_strip_uses_horizontal_halves() {
        let mut taps = TapDisambiguator::default();
        // Above the center zone, right of the dead band.
        assert_eq!(
            taps.classify(&tap(PointerKind::Mouse, 300.0, 20.0, 0)),
            TapAction::Flip(Direction::Forward)
        );
        // Inside the dead band but outside the center zone.
        assert_eq!(taps.classify(&tap(PointerKind::Mouse, 250.0, 20.0, 0)), TapAction::Inert);
    }

    #[test]
    fn memory_pairs_within_window() {
        let mut memory = TapMemory::new();
        let t = |ms: u64| Timestamp::from_micros(ms * 1000);
        assert!(!memory.register(t(0), 10.0, 10.0, 320, 18.0));
        assert!(memory.register(t(319), 27.0, 27.0, 320, 18.0));
        assert!(!memory.register(t(400), 10.0, 10.0, 320, 18.0));
        assert!(!memory.register(t(720), 10.0, 10.0, 320, 18.0));
    }
}
