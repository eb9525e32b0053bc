// Drag gesture recognition for the flip surface.
// A session starts undecided, locks a direction once the pointer leaves the dead zone,
// and maps horizontal travel to a continuous turn progress until release.

use log::debug;

use crate::pose::{Lighting, SheetPose};
use crate::sequence::Sequence;
use crate::tap::TapSample;
use crate::types::*;

/// One pointer-down to pointer-up interaction. Direction, once set, never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    pub start_x: f32,
    pub last_x: f32,
    pub direction: Option<Direction>,
    /// Turn progress in `[0, 1]`; only meaningful once a direction is locked.
    pub progress: f32,
}

impl DragSession {
    pub fn is_locked(&self) -> bool {
        self.direction.is_some()
    }
}

/// Outcome of feeding one pointer-move into a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// Sample belongs to another pointer.
    Ignored,
    /// Still inside the dead zone.
    Undecided,
    /// The pointer left the dead zone towards an item that does not exist.
    Aborted(Direction),
    Tracking {
        direction: Direction,
        /// Direction locked on this very sample.
        locked_now: bool,
        progress: f32,
        pose: SheetPose,
        lighting: Lighting,
    },
}

/// Outcome of a pointer-up/cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragRelease {
    Ignored,
    /// Never left the dead zone.
    Tap(TapSample),
    Commit(Direction),
    SnapBack(Direction),
}

/// Stateless rules of the drag gesture; the session itself is owned by the caller.
#[derive(Debug, Clone, Copy)]
pub struct DragRecognizer {
    settings: DragSettings,
}

impl DragRecognizer {
    pub fn new(settings: DragSettings) -> Self {
        DragRecognizer { settings }
    }

    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    /// Open a session for a primary-button press that did not land on a control.
    pub fn begin(&self, sample: &PointerSample) -> Option<DragSession> {
        if sample.button != 0 || sample.on_control {
            return None;
        }
        Some(DragSession {
            pointer_id: sample.pointer_id,
            kind: sample.kind,
            start_x: sample.x,
            last_x: sample.x,
            direction: None,
            progress: 0.0,
        })
    }

    /// Hover affordance for a pointer moving with no session open.
    pub fn edge_hint(&self, sample: &PointerSample) -> EdgeHint {
        let (nx, _) = sample.rect.normalize(sample.x, sample.y);
        let nx = nx.clamp(0.0, 1.0);
        if nx < self.settings.edge_zone {
            EdgeHint::Left
        } else if nx > 1.0 - self.settings.edge_zone {
            EdgeHint::Right
        } else {
            EdgeHint::None
        }
    }

    /// Turn progress for a horizontal travel of `dx` on a surface `width` px wide.
    pub fn progress_for(&self, dx: f32, width: f32) -> f32 {
        let span = width * self.settings.span_fraction;
        if span <= 0.0 {
            return 1.0;
        }
        (dx.abs() / span).clamp(0.0, 1.0)
    }

    pub fn update(
        &self,
        session: &mut DragSession,
        sample: &PointerSample,
        sequence: &Sequence,
    ) -> DragUpdate {
        if sample.pointer_id != session.pointer_id {
            return DragUpdate::Ignored;
        }

        let dx = sample.x - session.start_x;
        session.last_x = sample.x;

        let mut locked_now = false;
        let direction = match session.direction {
            Some(direction) => direction,
            None => {
                if dx.abs() < self.settings.dead_zone_px {
                    return DragUpdate::Undecided;
                }
                let direction = Direction::from_drag_dx(dx);
                if !sequence.can_step(direction) {
                    debug!("drag towards {direction:?} aborted at position {}", sequence.position());
                    return DragUpdate::Aborted(direction);
                }
                debug!("drag locked {direction:?} after {dx:.1}px");
                session.direction = Some(direction);
                locked_now = true;
                direction
            }
        };

        session.progress = self.progress_for(dx, sample.rect.width);
        let (_, ny) = sample.rect.normalize(sample.x, sample.y);

        DragUpdate::Tracking {
            direction,
            locked_now,
            progress: session.progress,
            pose: SheetPose::dragged(direction, session.progress, ny, &self.settings),
            lighting: Lighting::from_progress(session.progress),
        }
    }

    pub fn release(&self, session: &DragSession, sample: &PointerSample) -> DragRelease {
        if sample.pointer_id != session.pointer_id {
            return DragRelease::Ignored;
        }

        match session.direction {
            None => DragRelease::Tap(TapSample::from_pointer(sample)),
            Some(direction) if session.progress > self.settings.commit_fraction => {
                DragRelease::Commit(direction)
            }
            Some(direction) => DragRelease::SnapBack(direction),
        }
    }
}

impl Default for DragRecognizer {
    fn default() -> Self {
        Self::new(DragSettings::default())
    }
}
