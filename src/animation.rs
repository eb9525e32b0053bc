// Token-identified, time-based rotation tweens.
// A frame request whose token no longer matches the live counter is dropped without touching state.
// The host drives time: `tick(now)` stands in for one requestAnimationFrame callback.

use log::trace;

use crate::pose::{Lighting, RotationState, SheetPose};
use crate::types::{Direction, MotionSettings, Timestamp};

/// Identity of one animation run. Strictly increasing over the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationToken(u64);

/// Overshoot-and-settle shape shared by every two-phase run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleProfile {
    pub overshoot_deg: f32,
    /// Share of the total duration spent reaching the overshoot.
    pub split: f32,
    pub min_settle_ms: f64,
}

impl SettleProfile {
    pub fn from_settings(settings: &MotionSettings) -> Self {
        SettleProfile {
            overshoot_deg: settings.overshoot_deg,
            split: settings.settle_split,
            min_settle_ms: f64::from(settings.settle_min_ms),
        }
    }

    /// `(overshoot_ms, settle_ms)` for a run of `duration_ms`.
    pub fn phases(&self, duration_ms: f64) -> (f64, f64) {
        let overshoot = (duration_ms * f64::from(self.split)).round();
        let settle = (duration_ms - overshoot).max(self.min_settle_ms);
        (overshoot, settle)
    }
}

impl Default for SettleProfile {
    fn default() -> Self {
        SettleProfile::from_settings(&MotionSettings::default())
    }
}

pub fn ease_out_quint(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(5)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    start: Timestamp,
    duration_ms: f64,
}

impl Tween {
    /// Angle at `now` and whether the tween has finished.
    /// Measured from the captured start, so dropped frames never cause drift.
    fn sample(&self, now: Timestamp) -> (f32, bool) {
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (now.millis_since(self.start) / self.duration_ms).clamp(0.0, 1.0) as f32
        };
        let angle = if t >= 1.0 {
            self.to
        } else {
            lerp(self.from, self.to, ease_out_quint(t))
        };
        (angle, t >= 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Continuation<T> {
    /// Start the settle phase, then finish with `done`.
    Settle {
        target: f32,
        duration_ms: f64,
        done: T,
    },
    Done(T),
}

#[derive(Debug, Clone, Copy)]
struct FrameRequest<T> {
    token: u64,
    tween: Tween,
    then: Continuation<T>,
}

/// Drives the sheet's rotation state.
///
/// `T` is the completion tag handed back from [`AnimationEngine::tick`] when a run
/// finishes; the engine itself attaches no meaning to it.
#[derive(Debug)]
pub struct AnimationEngine<T> {
    live_token: u64,
    pending: Vec<FrameRequest<T>>,
    state: RotationState,
    profile: SettleProfile,
}

impl<T: Copy> AnimationEngine<T> {
    pub fn new(profile: SettleProfile) -> Self {
        AnimationEngine {
            live_token: 0,
            pending: Vec::new(),
            state: RotationState::rest(),
            profile,
        }
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn angle(&self) -> f32 {
        self.state.angle()
    }

    pub fn token(&self) -> AnimationToken {
        AnimationToken(self.live_token)
    }

    /// True while the live run still has a frame scheduled.
    pub fn is_running(&self) -> bool {
        self.pending.iter().any(|r| r.token == self.live_token)
    }

    /// Single-frame setter used while a pointer is down. Does not start a run.
    pub fn set_pose(&mut self, pose: SheetPose, lighting: Lighting) {
        self.state = RotationState { pose, lighting };
    }

    /// Retire the live run without starting another. Its scheduled frame is
    /// dropped on the next tick like any other stale request.
    pub fn invalidate(&mut self) {
        self.live_token += 1;
    }

    /// Back to the flat rest pose.
    pub fn reset(&mut self) {
        self.state = RotationState::rest();
    }

    /// Ease from the current angle to `target` over `duration_ms`.
    /// Supersedes any in-flight run.
    pub fn animate_to(
        &mut self,
        target: f32,
        duration_ms: f64,
        now: Timestamp,
        done: T,
    ) -> AnimationToken {
        self.schedule(target, duration_ms, now, Continuation::Done(done))
    }

    /// Overshoot past `target` in the turning direction, then settle onto it.
    /// `done` is returned only after the settle phase completes.
    pub fn animate_with_settle(
        &mut self,
        target: f32,
        direction: Direction,
        duration_ms: f64,
        now: Timestamp,
        done: T,
    ) -> AnimationToken {
        let (overshoot_ms, settle_ms) = self.profile.phases(duration_ms);
        let overshoot = direction.sign() * self.profile.overshoot_deg;
        self.schedule(
            target + overshoot,
            overshoot_ms,
            now,
            Continuation::Settle {
                target,
                duration_ms: settle_ms,
                done,
            },
        )
    }

    fn schedule(
        &mut self,
        target: f32,
        duration_ms: f64,
        now: Timestamp,
        then: Continuation<T>,
    ) -> AnimationToken {
        self.live_token += 1;
        let request = FrameRequest {
            token: self.live_token,
            tween: Tween {
                from: self.state.angle(),
                to: target,
                start: now,
                duration_ms,
            },
            then,
        };
        self.pending.push(request);
        AnimationToken(self.live_token)
    }

    /// Run every scheduled frame callback once.
    /// Returns the completion tag if the live run finished on this frame.
    pub fn tick(&mut self, now: Timestamp) -> Option<T> {
        let requests = std::mem::take(&mut self.pending);
        let mut completed = None;

        for request in requests {
            if request.token != self.live_token {
                trace!(
                    "dropping stale frame for run {} (live {})",
                    request.token,
                    self.live_token
                );
                continue;
            }

            let (angle, finished) = request.tween.sample(now);
            self.state = RotationState {
                pose: SheetPose::flat(angle),
                lighting: Lighting::from_angle(angle),
            };

            if !finished {
                self.pending.push(request);
                continue;
            }

            match request.then {
                Continuation::Settle {
                    target,
                    duration_ms,
                    done,
                } => {
                    self.animate_to(target, duration_ms, now, done);
                }
                Continuation::Done(done) => completed = Some(done),
            }
        }

        completed
    }
}

impl<T: Copy> Default for AnimationEngine<T> {
    fn default() -> Self {
        Self::new(SettleProfile::default())
    }
}
