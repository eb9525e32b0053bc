// Flip orchestration for one book surface.
// Owns the sequence, the animation engine and the per-interaction state, and decides
// when a drag commits, snaps back, or falls through to tap classification.

use log::debug;

use crate::animation::{AnimationEngine, SettleProfile};
use crate::drag::{DragRecognizer, DragRelease, DragSession, DragUpdate};
use crate::error::FlipbookError;
use crate::pose::RotationState;
use crate::sequence::Sequence;
use crate::tap::{TapAction, TapDisambiguator};
use crate::types::*;

/// Completion tag attached to every surface animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipCompletion {
    Commit(Direction),
    SnapBack(Direction),
}

/// Reduced-motion substitute for the 3D turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub direction: Direction,
    pub started: Timestamp,
    /// The position has already been swapped; fading back in.
    pub swapped: bool,
}

/// What the surface is doing right now. Dragging during an animation is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceState {
    Idle,
    Tracking(DragSession),
    Animating(FlipCompletion),
    CrossFading(CrossFade),
}

/// Multi-step jump realized as consecutive single flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GoToChain {
    target: usize,
    direction: Direction,
}

#[derive(Debug)]
pub struct FlipController {
    sequence: Sequence,
    animation: AnimationEngine<FlipCompletion>,
    drag: DragRecognizer,
    taps: TapDisambiguator,
    motion: MotionSettings,
    state: SurfaceState,
    staging: Staging,
    preview: Option<usize>,
    edge_hint: EdgeHint,
    opacity: f32,
    chain: Option<GoToChain>,
    events: Vec<FlipEvent>,
}

impl FlipController {
    pub fn new(items: Vec<Item>, config: &FlipbookConfig) -> Result<Self, FlipbookError> {
        config.validate()?;
        let sequence = Sequence::new(items)?;
        let staging = rest_staging(&sequence);
        Ok(FlipController {
            sequence,
            animation: AnimationEngine::new(SettleProfile::from_settings(&config.motion)),
            drag: DragRecognizer::new(config.drag),
            taps: TapDisambiguator::new(config.tap),
            motion: config.motion,
            state: SurfaceState::Idle,
            staging,
            preview: None,
            edge_hint: EdgeHint::None,
            opacity: 1.0,
            chain: None,
            events: Vec::new(),
        })
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn position(&self) -> usize {
        self.sequence.position()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn rotation(&self) -> &RotationState {
        self.animation.state()
    }

    pub fn staging(&self) -> Staging {
        self.staging
    }

    /// An animation or cross-fade owns the surface.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SurfaceState::Animating(_) | SurfaceState::CrossFading(_)
        )
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SurfaceState::Tracking(_))
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.motion.reduced_motion = reduced;
    }

    pub(crate) fn emit(&mut self, event: FlipEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<FlipEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn flip_forward(&mut self, now: Timestamp) -> bool {
        self.flip(Direction::Forward, now)
    }

    pub fn flip_backward(&mut self, now: Timestamp) -> bool {
        self.flip(Direction::Backward, now)
    }

    /// Animated single step. No-op while busy, mid-drag, or at the boundary.
    pub fn flip(&mut self, direction: Direction, now: Timestamp) -> bool {
        if self.is_busy() || self.is_dragging() {
            debug!("flip {direction:?} ignored: surface busy");
            return false;
        }
        if !self.sequence.can_step(direction) {
            debug!(
                "flip {direction:?} ignored at position {}",
                self.sequence.position()
            );
            return false;
        }

        self.taps.clear_memory();
        self.preview = self.sequence.neighbour(direction);
        self.emit(FlipEvent::FlipStarted { direction });

        if self.motion.reduced_motion {
            self.state = SurfaceState::CrossFading(CrossFade {
                direction,
                started: now,
                swapped: false,
            });
            self.opacity = 0.0;
            return true;
        }

        self.stage(direction);
        self.animation.animate_with_settle(
            direction.terminal_angle(),
            direction,
            f64::from(self.motion.flip_ms),
            now,
            FlipCompletion::Commit(direction),
        );
        self.state = SurfaceState::Animating(FlipCompletion::Commit(direction));
        true
    }

    /// Instant jump, clamped. Cancels whatever the surface was doing.
    pub fn set_position(&mut self, target: i64) -> bool {
        if !self.sequence.set_position(target) {
            return false;
        }
        if self.is_busy() {
            self.animation.invalidate();
        }
        self.chain = None;
        self.render_idle();
        let position = self.sequence.position();
        self.emit(FlipEvent::PositionChanged { position });
        true
    }

    /// Animated jump: one flip per step, each starting after the previous settles.
    /// Out-of-range or current targets are ignored.
    pub fn go_to(&mut self, target: i64, now: Timestamp) -> bool {
        if target < 0 || target >= self.sequence.len() as i64 {
            debug!("go_to({target}) out of range");
            return false;
        }
        let target = target as usize;
        let position = self.sequence.position();
        if target == position {
            return false;
        }

        let direction = if target > position {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.chain = Some(GoToChain { target, direction });
        self.flip(direction, now);
        true
    }

    pub fn pointer_down(&mut self, sample: &PointerSample) -> bool {
        if self.is_busy() || self.is_dragging() {
            return false;
        }
        match self.drag.begin(sample) {
            Some(session) => {
                self.state = SurfaceState::Tracking(session);
                self.edge_hint = EdgeHint::None;
                true
            }
            None => false,
        }
    }

    pub fn pointer_move(&mut self, sample: &PointerSample) {
        match self.state {
            SurfaceState::Idle => {
                self.edge_hint = self.drag.edge_hint(sample);
            }
            SurfaceState::Tracking(mut session) => {
                match self.drag.update(&mut session, sample, &self.sequence) {
                    DragUpdate::Ignored | DragUpdate::Undecided => {
                        self.state = SurfaceState::Tracking(session);
                    }
                    DragUpdate::Aborted(_) => {
                        self.taps.clear_memory();
                        self.render_idle();
                    }
                    DragUpdate::Tracking {
                        direction,
                        locked_now,
                        pose,
                        lighting,
                        ..
                    } => {
                        self.state = SurfaceState::Tracking(session);
                        if locked_now {
                            self.taps.clear_memory();
                            self.edge_hint = EdgeHint::None;
                            self.stage(direction);
                            self.emit(FlipEvent::FlipStarted { direction });
                        }
                        self.animation.set_pose(pose, lighting);
                    }
                }
            }
            SurfaceState::Animating(_) | SurfaceState::CrossFading(_) => {}
        }
    }

    /// Pointer-up or pointer-cancel. Returns the tap classification when the
    /// session never became a drag; flips are already started here, opening the
    /// viewer is left to the caller.
    pub fn pointer_up(&mut self, sample: &PointerSample, now: Timestamp) -> TapAction {
        let SurfaceState::Tracking(session) = self.state else {
            return TapAction::Inert;
        };

        match self.drag.release(&session, sample) {
            DragRelease::Ignored => TapAction::Inert,
            DragRelease::Tap(tap) => {
                self.state = SurfaceState::Idle;
                let action = self.taps.classify(&tap);
                if let TapAction::Flip(direction) = action {
                    self.flip(direction, now);
                }
                action
            }
            DragRelease::Commit(direction) => {
                debug!("drag commit {direction:?} at progress {:.2}", session.progress);
                self.taps.clear_memory();
                self.preview = self.sequence.neighbour(direction);
                self.animation.animate_with_settle(
                    direction.terminal_angle(),
                    direction,
                    f64::from(self.motion.drag_commit_ms),
                    now,
                    FlipCompletion::Commit(direction),
                );
                self.state = SurfaceState::Animating(FlipCompletion::Commit(direction));
                TapAction::Inert
            }
            DragRelease::SnapBack(direction) => {
                debug!("drag snap back at progress {:.2}", session.progress);
                self.animation.animate_to(
                    0.0,
                    f64::from(self.motion.snap_back_ms),
                    now,
                    FlipCompletion::SnapBack(direction),
                );
                self.state = SurfaceState::Animating(FlipCompletion::SnapBack(direction));
                TapAction::Inert
            }
        }
    }

    /// Drops an open pointer session without a release, e.g. when another surface
    /// takes over input. A locked drag reports `FlipCancelled`.
    pub fn cancel_drag(&mut self) -> bool {
        let SurfaceState::Tracking(session) = self.state else {
            return false;
        };
        self.render_idle();
        if let Some(direction) = session.direction {
            debug!("drag {direction:?} cancelled");
            self.emit(FlipEvent::FlipCancelled { direction });
        }
        true
    }

    pub fn pointer_leave(&mut self) {
        if !self.is_dragging() {
            self.edge_hint = EdgeHint::None;
        }
    }

    pub fn clear_tap_memory(&mut self) {
        self.taps.clear_memory();
    }

    /// One frame. Advances the running animation or cross-fade, then continues
    /// any pending multi-step jump.
    pub fn tick(&mut self, now: Timestamp) {
        if let Some(done) = self.animation.tick(now) {
            if self.state == SurfaceState::Animating(done) {
                self.finish(done);
            }
        }
        if let SurfaceState::CrossFading(fade) = self.state {
            self.advance_fade(fade, now);
        }
        self.advance_chain(now);
    }

    fn finish(&mut self, done: FlipCompletion) {
        match done {
            FlipCompletion::Commit(direction) => {
                self.sequence.step(direction);
                self.render_idle();
                let position = self.sequence.position();
                debug!("flip {direction:?} committed at {position}");
                self.emit(FlipEvent::FlipCommitted { position });
            }
            FlipCompletion::SnapBack(direction) => {
                self.render_idle();
                self.emit(FlipEvent::FlipCancelled { direction });
            }
        }
    }

    fn advance_fade(&mut self, mut fade: CrossFade, now: Timestamp) {
        let elapsed = now.millis_since(fade.started);
        let fade_out = f64::from(self.motion.fade_out_ms);

        if !fade.swapped && elapsed >= fade_out {
            self.sequence.step(fade.direction);
            self.staging = rest_staging(&self.sequence);
            self.preview = None;
            self.opacity = 1.0;
            fade.swapped = true;
            self.state = SurfaceState::CrossFading(fade);
            let position = self.sequence.position();
            self.emit(FlipEvent::FlipCommitted { position });
        }

        if fade.swapped && elapsed >= fade_out + f64::from(self.motion.fade_in_ms) {
            self.state = SurfaceState::Idle;
        }
    }

    fn advance_chain(&mut self, now: Timestamp) {
        let Some(chain) = self.chain else {
            return;
        };
        if self.is_busy() || self.is_dragging() {
            return;
        }

        let position = self.sequence.position();
        let remaining = match chain.direction {
            Direction::Forward => position < chain.target,
            Direction::Backward => position > chain.target,
        };
        if !remaining || !self.flip(chain.direction, now) {
            self.chain = None;
        }
    }

    /// Put the adjacent item behind the sheet and on its reverse face.
    fn stage(&mut self, direction: Direction) {
        let position = self.sequence.position();
        let Some(target) = self.sequence.neighbour(direction) else {
            return;
        };
        self.staging = Staging {
            hinge: match direction {
                Direction::Forward => Hinge::Left,
                Direction::Backward => Hinge::Right,
            },
            base: target,
            front: position,
            back: target,
            preload: self.staging.preload,
        };
    }

    fn render_idle(&mut self) {
        self.state = SurfaceState::Idle;
        self.animation.reset();
        self.staging = rest_staging(&self.sequence);
        self.preview = None;
        self.opacity = 1.0;
    }

    pub fn frame(&self, viewer: ViewerFrame) -> SurfaceFrame {
        let rotation = self.animation.state();
        let indicator_position = self.preview.unwrap_or_else(|| self.sequence.position());
        SurfaceFrame {
            position: self.sequence.position(),
            count: self.sequence.len(),
            indicator_position,
            dot_progress: self.sequence.progress_of(indicator_position),
            can_advance: self.sequence.can_advance(),
            can_retreat: self.sequence.can_retreat(),
            pose: rotation.pose,
            lighting: rotation.lighting,
            staging: self.staging,
            edge_hint: self.edge_hint,
            dragging: self.is_dragging(),
            animating: self.is_busy(),
            opacity: self.opacity,
            viewer,
        }
    }
}

fn rest_staging(sequence: &Sequence) -> Staging {
    let position = sequence.position();
    let next = sequence.neighbour(Direction::Forward).unwrap_or(position);
    let previous = sequence.neighbour(Direction::Backward).unwrap_or(position);
    Staging {
        hinge: Hinge::Center,
        base: position,
        front: position,
        back: next,
        preload: (next, previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME_MS: u64 = 16;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_micros(v * 1000)
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("assets/pages/page-{}.jpg", i + 1), format!("Page {}", i + 1)))
            .collect()
    }

    fn controller(n: usize) -> FlipController {
        FlipController::new(items(n), &FlipbookConfig::default()).unwrap()
    }

    fn sample(x: f32, y: f32, at_ms: u64) -> PointerSample {
        PointerSample {
            pointer_id: PointerId(1),
            kind: PointerKind::Touch,
            button: 0,
            x,
            y,
            timestamp: ms(at_ms),
            on_control: false,
            rect: SurfaceRect::new(0.0, 0.0, 500.0, 700.0),
        }
    }

    /// Tick until the surface is idle with no chain pending. Returns the end time
    /// and the most extreme angle seen on the way.
    fn settle(ctrl: &mut FlipController, mut now: u64) -> (u64, f32) {
        let mut extreme = 0.0f32;
        for _ in 0..2000 {
            now += FRAME_MS;
            ctrl.tick(ms(now));
            if ctrl.rotation().angle().abs() > extreme.abs() {
                extreme = ctrl.rotation().angle();
            }
            if ctrl.state() == SurfaceState::Idle && ctrl.chain.is_none() {
                break;
            }
        }
        (now, extreme)
    }

    #[test]
    fn two_forward_flips() {
        let mut ctrl = controller(4);
        assert!(ctrl.flip_forward(ms(0)));
        assert_eq!(ctrl.staging().hinge, Hinge::Left);
        assert_eq!(ctrl.staging().back, 1);
        let (now, extreme) = settle(&mut ctrl, 0);
        assert_eq!(ctrl.position(), 1);
        assert!(extreme <= -180.0);
        assert_eq!(ctrl.rotation().angle(), 0.0);

        assert!(ctrl.flip_forward(ms(now)));
        settle(&mut ctrl, now);
        assert_eq!(ctrl.position(), 2);
        assert_eq!(ctrl.rotation().angle(), 0.0);

        let events = ctrl.drain_events();
        assert_eq!(
            events,
            vec![
                FlipEvent::FlipStarted { direction: Direction::Forward },
                FlipEvent::FlipCommitted { position: 1 },
                FlipEvent::FlipStarted { direction: Direction::Forward },
                FlipEvent::FlipCommitted { position: 2 },
            ]
        );
    }

    #[test]
    fn flip_at_boundary_is_noop() {
        let mut ctrl = controller(4);
        ctrl.set_position(3);
        ctrl.drain_events();
        assert!(!ctrl.flip_forward(ms(0)));
        assert_eq!(ctrl.position(), 3);
        assert_eq!(ctrl.rotation().angle(), 0.0);
        assert!(ctrl.drain_events().is_empty());
    }

    #[test]
    fn flip_rejected_while_animating() {
        let mut ctrl = controller(4);
        assert!(ctrl.flip_forward(ms(0)));
        ctrl.tick(ms(100));
        assert!(!ctrl.flip_forward(ms(100)));
        assert!(!ctrl.pointer_down(&sample(250.0, 300.0, 100)));
        settle(&mut ctrl, 100);
        assert_eq!(ctrl.position(), 1);
    }

    #[test]
    fn drag_past_threshold_commits() {
        let mut ctrl = controller(4);
        assert!(ctrl.pointer_down(&sample(400.0, 350.0, 0)));
        ctrl.pointer_move(&sample(390.0, 350.0, 16));
        // 225px of the 450px span: progress 0.5.
        ctrl.pointer_move(&sample(175.0, 350.0, 32));
        assert!(ctrl.is_dragging());
        assert!((ctrl.rotation().angle() + 90.0).abs() < 1e-3);
        assert!(ctrl.rotation().pose.lift_px > 9.9);

        assert_eq!(ctrl.pointer_up(&sample(175.0, 350.0, 48), ms(48)), TapAction::Inert);
        assert!(ctrl.is_busy());
        assert_eq!(ctrl.frame(ViewerFrame::default()).indicator_position, 1);
        settle(&mut ctrl, 48);
        assert_eq!(ctrl.position(), 1);
        assert_eq!(ctrl.rotation().angle(), 0.0);
        assert!(ctrl
            .drain_events()
            .contains(&FlipEvent::FlipCommitted { position: 1 }));
    }

    #[test]
    fn commit_threshold_boundaries() {
        // 0.34 of the 450px span commits.
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(400.0, 350.0, 0));
        ctrl.pointer_move(&sample(400.0 - 153.0, 350.0, 16));
        ctrl.pointer_up(&sample(400.0 - 153.0, 350.0, 32), ms(32));
        settle(&mut ctrl, 32);
        assert_eq!(ctrl.position(), 1);

        // 0.32 snaps back.
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(400.0, 350.0, 0));
        ctrl.pointer_move(&sample(400.0 - 144.0, 350.0, 16));
        ctrl.pointer_up(&sample(400.0 - 144.0, 350.0, 32), ms(32));
        assert_eq!(
            ctrl.state(),
            SurfaceState::Animating(FlipCompletion::SnapBack(Direction::Forward))
        );
        settle(&mut ctrl, 32);
        assert_eq!(ctrl.position(), 0);
        assert_eq!(ctrl.rotation().angle(), 0.0);
        assert!(ctrl
            .drain_events()
            .contains(&FlipEvent::FlipCancelled { direction: Direction::Forward }));
    }

    #[test]
    fn drag_towards_missing_item_aborts() {
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(100.0, 350.0, 0));
        ctrl.pointer_move(&sample(160.0, 350.0, 16));
        assert_eq!(ctrl.state(), SurfaceState::Idle);
        assert_eq!(ctrl.rotation().angle(), 0.0);
        // The release that follows belongs to no session.
        assert_eq!(ctrl.pointer_up(&sample(160.0, 350.0, 32), ms(32)), TapAction::Inert);
        assert_eq!(ctrl.position(), 0);
    }

    #[test]
    fn indicator_waits_for_commit() {
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(400.0, 350.0, 0));
        ctrl.pointer_move(&sample(385.0, 350.0, 16));
        assert!(ctrl.is_dragging());
        let frame = ctrl.frame(ViewerFrame::default());
        assert_eq!(frame.indicator_position, 0);
        assert_eq!(frame.dot_progress, 0.0);

        ctrl.pointer_up(&sample(385.0, 350.0, 32), ms(32));
        assert_eq!(ctrl.frame(ViewerFrame::default()).indicator_position, 0);
        settle(&mut ctrl, 32);
        assert_eq!(ctrl.frame(ViewerFrame::default()).indicator_position, 0);
    }

    #[test]
    fn aborted_drag_forgets_center_tap() {
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(250.0, 350.0, 0));
        assert_eq!(ctrl.pointer_up(&sample(250.0, 350.0, 30), ms(30)), TapAction::Inert);

        // Backward from the first item has nowhere to go.
        ctrl.pointer_down(&sample(250.0, 350.0, 80));
        ctrl.pointer_move(&sample(290.0, 350.0, 96));
        assert_eq!(ctrl.state(), SurfaceState::Idle);
        ctrl.pointer_up(&sample(290.0, 350.0, 112), ms(112));

        ctrl.pointer_down(&sample(250.0, 350.0, 200));
        assert_eq!(ctrl.pointer_up(&sample(250.0, 350.0, 230), ms(230)), TapAction::Inert);
    }

    #[test]
    fn cancel_drag_releases_session() {
        let mut ctrl = controller(4);
        assert!(!ctrl.cancel_drag());

        ctrl.pointer_down(&sample(400.0, 350.0, 0));
        ctrl.pointer_move(&sample(300.0, 350.0, 16));
        ctrl.drain_events();
        assert!(ctrl.cancel_drag());
        assert_eq!(ctrl.state(), SurfaceState::Idle);
        assert_eq!(ctrl.rotation().angle(), 0.0);
        assert_eq!(
            ctrl.drain_events(),
            vec![FlipEvent::FlipCancelled { direction: Direction::Forward }]
        );
        assert!(ctrl.flip_forward(ms(32)));

        // An undecided press cancels silently.
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(400.0, 350.0, 0));
        assert!(ctrl.cancel_drag());
        assert!(ctrl.drain_events().is_empty());
    }

    #[test]
    fn go_to_rejects_huge_targets() {
        let mut ctrl = controller(4);
        assert!(!ctrl.go_to(i64::from(u32::MAX) + 2, ms(0)));
        assert!(!ctrl.go_to(i64::MAX, ms(0)));
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn edge_tap_flips() {
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(460.0, 350.0, 0));
        assert_eq!(
            ctrl.pointer_up(&sample(461.0, 350.0, 50), ms(50)),
            TapAction::Flip(Direction::Forward)
        );
        assert!(ctrl.is_busy());
        settle(&mut ctrl, 50);
        assert_eq!(ctrl.position(), 1);
    }

    #[test]
    fn center_double_tap_requests_viewer() {
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(250.0, 350.0, 0));
        assert_eq!(ctrl.pointer_up(&sample(250.0, 350.0, 40), ms(40)), TapAction::Inert);
        ctrl.pointer_down(&sample(255.0, 352.0, 300));
        assert_eq!(
            ctrl.pointer_up(&sample(255.0, 352.0, 340), ms(340)),
            TapAction::OpenViewer
        );
        assert_eq!(ctrl.position(), 0);
    }

    #[test]
    fn slow_center_taps_stay_inert() {
        let mut ctrl = controller(4);
        ctrl.pointer_down(&sample(250.0, 350.0, 0));
        ctrl.pointer_up(&sample(250.0, 350.0, 40), ms(40));
        ctrl.pointer_down(&sample(250.0, 350.0, 400));
        assert_eq!(ctrl.pointer_up(&sample(250.0, 350.0, 440), ms(440)), TapAction::Inert);
    }

    #[test]
    fn go_to_chains_single_flips() {
        let mut ctrl = controller(4);
        assert!(ctrl.go_to(3, ms(0)));
        settle(&mut ctrl, 0);
        assert_eq!(ctrl.position(), 3);
        let commits: Vec<_> = ctrl
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, FlipEvent::FlipCommitted { .. }))
            .collect();
        assert_eq!(
            commits,
            vec![
                FlipEvent::FlipCommitted { position: 1 },
                FlipEvent::FlipCommitted { position: 2 },
                FlipEvent::FlipCommitted { position: 3 },
            ]
        );
    }

    #[test]
    fn go_to_ignores_invalid_targets() {
        let mut ctrl = controller(4);
        assert!(!ctrl.go_to(0, ms(0)));
        assert!(!ctrl.go_to(4, ms(0)));
        assert!(!ctrl.go_to(-1, ms(0)));
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn go_to_waits_for_running_flip() {
        let mut ctrl = controller(4);
        ctrl.flip_forward(ms(0));
        // The running flip has not committed yet, so this is a two-step request.
        assert!(ctrl.go_to(2, ms(10)));
        settle(&mut ctrl, 10);
        assert_eq!(ctrl.position(), 2);
    }

    #[test]
    fn set_position_same_target_is_silent() {
        let mut ctrl = controller(4);
        assert!(!ctrl.set_position(0));
        assert!(ctrl.drain_events().is_empty());
        assert!(ctrl.set_position(2));
        assert_eq!(
            ctrl.drain_events(),
            vec![FlipEvent::PositionChanged { position: 2 }]
        );
        assert_eq!(ctrl.staging().preload, (3, 1));
    }

    #[test]
    fn set_position_cancels_running_flip() {
        let mut ctrl = controller(4);
        ctrl.flip_forward(ms(0));
        ctrl.tick(ms(100));
        assert!(ctrl.set_position(3));
        assert_eq!(ctrl.state(), SurfaceState::Idle);
        settle(&mut ctrl, 100);
        assert_eq!(ctrl.position(), 3);
        assert_eq!(ctrl.rotation().angle(), 0.0);
    }

    #[test]
    fn reduced_motion_cross_fades() {
        let mut config = FlipbookConfig::default();
        config.motion.reduced_motion = true;
        let mut ctrl = FlipController::new(items(3), &config).unwrap();

        assert!(ctrl.flip_forward(ms(0)));
        assert_eq!(ctrl.frame(ViewerFrame::default()).opacity, 0.0);
        ctrl.tick(ms(100));
        assert_eq!(ctrl.position(), 0);
        ctrl.tick(ms(170));
        assert_eq!(ctrl.position(), 1);
        assert_eq!(ctrl.frame(ViewerFrame::default()).opacity, 1.0);
        assert!(ctrl.is_busy());
        assert!(!ctrl.flip_forward(ms(200)));
        ctrl.tick(ms(350));
        assert_eq!(ctrl.state(), SurfaceState::Idle);
        assert_eq!(ctrl.rotation().angle(), 0.0);
    }

    #[test]
    fn control_presses_do_not_open_sessions() {
        let mut ctrl = controller(4);
        let mut s = sample(480.0, 350.0, 0);
        s.on_control = true;
        assert!(!ctrl.pointer_down(&s));
        assert_eq!(ctrl.state(), SurfaceState::Idle);
    }

    #[test]
    fn hover_hint_tracks_edges() {
        let mut ctrl = controller(4);
        ctrl.pointer_move(&sample(10.0, 350.0, 0));
        assert_eq!(ctrl.frame(ViewerFrame::default()).edge_hint, EdgeHint::Left);
        ctrl.pointer_leave();
        assert_eq!(ctrl.frame(ViewerFrame::default()).edge_hint, EdgeHint::None);
    }

    #[derive(Debug, Clone)]
    enum Input {
        Down(f32, f32),
        Move(f32, f32),
        Up(f32, f32),
        Flip(bool),
        Jump(i64),
        GoTo(i64),
        Frames(u8),
    }

    fn input_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            (0.0f32..500.0, 0.0f32..700.0).prop_map(|(x, y)| Input::Down(x, y)),
            (-100.0f32..600.0, 0.0f32..700.0).prop_map(|(x, y)| Input::Move(x, y)),
            (-100.0f32..600.0, 0.0f32..700.0).prop_map(|(x, y)| Input::Up(x, y)),
            any::<bool>().prop_map(Input::Flip),
            (-3i64..8).prop_map(Input::Jump),
            (-3i64..8).prop_map(Input::GoTo),
            (1u8..40).prop_map(Input::Frames),
        ]
    }

    proptest! {
        /// No mix of pointer, keyboard-style and programmatic input moves the
        /// position out of range, and the surface always comes back to rest.
        #[test]
        fn position_stays_in_range(
            len in 1usize..6,
            inputs in prop::collection::vec(input_strategy(), 0..80)
        ) {
            let mut ctrl = controller(len);
            let mut now = 0u64;
            for input in inputs {
                now += FRAME_MS;
                match input {
                    Input::Down(x, y) => { ctrl.pointer_down(&sample(x, y, now)); }
                    Input::Move(x, y) => ctrl.pointer_move(&sample(x, y, now)),
                    Input::Up(x, y) => { ctrl.pointer_up(&sample(x, y, now), ms(now)); }
                    Input::Flip(forward) => {
                        if forward { ctrl.flip_forward(ms(now)); } else { ctrl.flip_backward(ms(now)); }
                    }
                    Input::Jump(t) => { ctrl.set_position(t); }
                    Input::GoTo(t) => { ctrl.go_to(t, ms(now)); }
                    Input::Frames(n) => {
                        for _ in 0..n {
                            now += FRAME_MS;
                            ctrl.tick(ms(now));
                        }
                    }
                }
                prop_assert!(ctrl.position() < len);
            }

            if ctrl.is_dragging() {
                ctrl.pointer_up(&sample(0.0, 0.0, now), ms(now));
            }
            settle(&mut ctrl, now);
            prop_assert!(ctrl.position() < len);
            prop_assert_eq!(ctrl.state(), SurfaceState::Idle);
            prop_assert_eq!(ctrl.rotation().angle(), 0.0);
        }
    }
}
