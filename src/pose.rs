// Instantaneous visual pose of the flipping sheet and the lighting derived from it.
// Pure functions of progress; nothing here feeds back into navigation.

use serde::{Deserialize, Serialize};

use crate::types::{Direction, DragSettings};

/// Rotation and realism offsets applied to the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SheetPose {
    /// Rotation around the hinge, degrees. Negative turns forward.
    pub angle: f32,
    /// Tilt around the horizontal axis, degrees.
    pub tilt_x: f32,
    /// Tilt in the screen plane, degrees.
    pub tilt_z: f32,
    /// Lift towards the viewer, px.
    pub lift_px: f32,
}

impl SheetPose {
    pub fn rest() -> Self {
        SheetPose::default()
    }

    /// Pure rotation with no tilt or lift, as used by the animation engine.
    pub fn flat(angle: f32) -> Self {
        SheetPose {
            angle,
            ..SheetPose::default()
        }
    }

    /// Pose while a finger drags the sheet.
    ///
    /// `ny` is the pointer's vertical position normalized to the surface; grabbing
    /// above center tilts the sheet one way, below the other.
    pub fn dragged(direction: Direction, progress: f32, ny: f32, settings: &DragSettings) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let t = ((ny.clamp(0.0, 1.0) - 0.5) * 2.0).clamp(-1.0, 1.0);
        let tilt_x = (-t * settings.max_tilt_x_deg)
            .clamp(-settings.max_tilt_x_deg, settings.max_tilt_x_deg);
        let tilt_z = (t * settings.max_tilt_z_deg)
            .clamp(-settings.max_tilt_z_deg, settings.max_tilt_z_deg);

        SheetPose {
            angle: direction.sign() * progress * 180.0,
            tilt_x,
            tilt_z,
            lift_px: midpoint_weight(progress) * settings.max_lift_px,
        }
    }
}

/// 1 at progress 0.5, 0 at both ends.
pub fn midpoint_weight(progress: f32) -> f32 {
    1.0 - (progress.clamp(0.0, 1.0) - 0.5).abs() * 2.0
}

/// Shading intensities for the renderer, each in `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Lighting {
    /// Darkening of the turning face.
    pub shade: f32,
    /// Darkening of the incoming face.
    pub shade2: f32,
    pub hinge: f32,
    pub glint: f32,
    pub cast: f32,
    pub lift_shadow: f32,
}

impl Lighting {
    pub fn from_progress(progress: f32) -> Self {
        let p = progress.clamp(0.0, 1.0);
        let mid = midpoint_weight(p);
        Lighting {
            shade: (p * 0.55).clamp(0.0, 0.55),
            shade2: ((1.0 - p) * 0.25).clamp(0.0, 0.25),
            hinge: (mid * 0.22).clamp(0.0, 0.22),
            glint: (mid * 0.16).clamp(0.0, 0.16),
            cast: (mid * 0.18).clamp(0.0, 0.18),
            lift_shadow: (mid * 0.22).clamp(0.0, 0.22),
        }
    }

    /// Lighting for a free-running rotation angle.
    pub fn from_angle(angle: f32) -> Self {
        Lighting::from_progress(angle.abs() / 180.0)
    }

    pub fn flat() -> Self {
        Lighting::from_progress(0.0)
    }
}

/// Pose plus lighting: the complete rotation state read by rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    pub pose: SheetPose,
    pub lighting: Lighting,
}

impl RotationState {
    pub fn rest() -> Self {
        RotationState {
            pose: SheetPose::rest(),
            lighting: Lighting::flat(),
        }
    }

    pub fn angle(&self) -> f32 {
        self.pose.angle
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::rest()
    }
}
