// Strong typing over strings. Newtypes for timestamps, pointers, and surface geometry.
// Config structs carry per-field serde defaults so the host can send partial JSON.

use serde::{Deserialize, Serialize};

use crate::error::FlipbookError;
use crate::pose::{Lighting, SheetPose};

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero.
    pub fn millis_since(&self, earlier: Timestamp) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / 1000.0
    }
}

/// A navigable item. Identity is its index in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque locator handed back to the renderer untouched.
    pub source: String,
    pub label: String,
}

impl Item {
    pub fn new(source: impl Into<String>, label: impl Into<String>) -> Self {
        Item {
            source: source.into(),
            label: label.into(),
        }
    }
}

/// Navigation direction of a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards higher positions ("next page").
    Forward,
    /// Towards lower positions ("previous page").
    Backward,
}

impl Direction {
    /// Dragging left pulls the next item in; dragging right pulls the previous one.
    pub fn from_drag_dx(dx: f32) -> Self {
        if dx < 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Angle of the sheet once it has fully turned.
    pub fn terminal_angle(&self) -> f32 {
        match self {
            Direction::Forward => -180.0,
            Direction::Backward => 180.0,
        }
    }

    /// Sign of the rotation for this direction.
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
        }
    }
}

/// Pointer hardware class, mapped from the DOM `pointerType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    pub fn from_pointer_type(value: &str) -> Self {
        match value {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }

    /// Double-tap detection only applies to non-mouse pointers; mice get `dblclick`.
    pub fn is_touch_like(&self) -> bool {
        !matches!(self, PointerKind::Mouse)
    }
}

/// Pointer identity as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub i32);

/// Bounding box of the interactive surface in client pixels.
/// Re-sent with every pointer sample, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        SurfaceRect {
            left,
            top,
            width,
            height,
        }
    }

    /// Client coordinates relative to the surface origin.
    pub fn local(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.left, y - self.top)
    }

    /// Client coordinates normalized to the surface box (unclamped).
    /// A degenerate box maps everything to its center.
    pub fn normalize(&self, x: f32, y: f32) -> (f32, f32) {
        let (lx, ly) = self.local(x, y);
        let nx = if self.width > 0.0 { lx / self.width } else { 0.5 };
        let ny = if self.height > 0.0 { ly / self.height } else { 0.5 };
        (nx, ny)
    }
}

/// One pointer event sample forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub pointer_id: PointerId,
    #[serde(default)]
    pub kind: PointerKind,
    /// DOM button index; 0 is the primary button.
    #[serde(default)]
    pub button: u8,
    pub x: f32,
    pub y: f32,
    pub timestamp: Timestamp,
    /// Pointer went down on a control (edge tap button) that handles its own click.
    #[serde(default)]
    pub on_control: bool,
    pub rect: SurfaceRect,
}

/// Hover affordance shown when the cursor rests near an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeHint {
    #[default]
    None,
    Left,
    Right,
}

/// Which edge the flipping sheet rotates around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Hinge {
    #[default]
    Center,
    Left,
    Right,
}

/// Item indices assigned to each rendered layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staging {
    pub hinge: Hinge,
    /// Layer visible behind the sheet.
    pub base: usize,
    /// Face of the sheet before it turns.
    pub front: usize,
    /// Face of the sheet after it turns.
    pub back: usize,
    /// Neighbours the renderer should warm up, `(next, previous)`.
    pub preload: (usize, usize),
}

// =============================================================================
// Configuration
// =============================================================================

/// Engine configuration passed from JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlipbookConfig {
    #[serde(default)]
    pub drag: DragSettings,
    #[serde(default)]
    pub tap: TapSettings,
    #[serde(default)]
    pub motion: MotionSettings,
    #[serde(default)]
    pub overlay: OverlaySettings,
}

impl FlipbookConfig {
    /// Reject values that would make the gesture math meaningless.
    pub fn validate(&self) -> Result<(), FlipbookError> {
        let d = &self.drag;
        check_positive("drag.dead_zone_px", d.dead_zone_px)?;
        check_fraction("drag.span_fraction", d.span_fraction)?;
        check_fraction("drag.commit_fraction", d.commit_fraction)?;
        check_fraction("drag.edge_zone", d.edge_zone)?;
        check_non_negative("drag.max_tilt_x_deg", d.max_tilt_x_deg.into())?;
        check_non_negative("drag.max_tilt_z_deg", d.max_tilt_z_deg.into())?;
        check_non_negative("drag.max_lift_px", d.max_lift_px.into())?;

        let t = &self.tap;
        for (name, value) in [
            ("tap.center_min_x", t.center_min_x),
            ("tap.center_max_x", t.center_max_x),
            ("tap.center_min_y", t.center_min_y),
            ("tap.center_max_y", t.center_max_y),
            ("tap.forward_min_x", t.forward_min_x),
            ("tap.backward_max_x", t.backward_max_x),
        ] {
            check_fraction(name, value)?;
        }
        if t.center_min_x >= t.center_max_x || t.center_min_y >= t.center_max_y {
            return Err(FlipbookError::InvalidConfig(
                "tap center zone is empty".to_string(),
            ));
        }
        if t.backward_max_x > t.forward_min_x {
            return Err(FlipbookError::InvalidConfig(
                "tap.backward_max_x must not exceed tap.forward_min_x".to_string(),
            ));
        }
        check_non_negative("tap.double_tap_window_ms", t.double_tap_window_ms.into())?;
        check_non_negative("tap.double_tap_slop_px", t.double_tap_slop_px.into())?;

        let m = &self.motion;
        for (name, value) in [
            ("motion.flip_ms", f64::from(m.flip_ms)),
            ("motion.drag_commit_ms", f64::from(m.drag_commit_ms)),
            ("motion.snap_back_ms", f64::from(m.snap_back_ms)),
            ("motion.settle_min_ms", f64::from(m.settle_min_ms)),
            ("motion.fade_out_ms", f64::from(m.fade_out_ms)),
            ("motion.fade_in_ms", f64::from(m.fade_in_ms)),
            ("motion.overshoot_deg", f64::from(m.overshoot_deg)),
        ] {
            check_non_negative(name, value)?;
        }
        check_fraction("motion.settle_split", m.settle_split)?;

        let o = &self.overlay;
        check_non_negative("overlay.swipe_min_px", o.swipe_min_px.into())?;
        check_positive("overlay.swipe_axis_ratio", o.swipe_axis_ratio)?;
        check_non_negative("overlay.tap_slop_px", o.tap_slop_px.into())?;
        Ok(())
    }
}

fn check_fraction(name: &str, value: f32) -> Result<(), FlipbookError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(FlipbookError::InvalidConfig(format!(
            "{name} must be in (0, 1], got {value}"
        )))
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), FlipbookError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlipbookError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<(), FlipbookError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FlipbookError::InvalidConfig(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

/// Drag gesture thresholds and visual ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSettings {
    /// Horizontal travel (px) before a direction locks.
    #[serde(default = "default_dead_zone_px")]
    pub dead_zone_px: f32,
    /// Share of the surface width that maps to a full turn.
    #[serde(default = "default_span_fraction")]
    pub span_fraction: f32,
    /// Release commits when progress exceeds this.
    #[serde(default = "default_commit_fraction")]
    pub commit_fraction: f32,
    /// Width share of each hover edge zone.
    #[serde(default = "default_edge_zone")]
    pub edge_zone: f32,
    #[serde(default = "default_max_tilt_x_deg")]
    pub max_tilt_x_deg: f32,
    #[serde(default = "default_max_tilt_z_deg")]
    pub max_tilt_z_deg: f32,
    #[serde(default = "default_max_lift_px")]
    pub max_lift_px: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        DragSettings {
            dead_zone_px: default_dead_zone_px(),
            span_fraction: default_span_fraction(),
            commit_fraction: default_commit_fraction(),
            edge_zone: default_edge_zone(),
            max_tilt_x_deg: default_max_tilt_x_deg(),
            max_tilt_z_deg: default_max_tilt_z_deg(),
            max_lift_px: default_max_lift_px(),
        }
    }
}

fn default_dead_zone_px() -> f32 {
    10.0
}

fn default_span_fraction() -> f32 {
    0.9
}

fn default_commit_fraction() -> f32 {
    0.33
}

fn default_edge_zone() -> f32 {
    0.18
}

fn default_max_tilt_x_deg() -> f32 {
    6.0
}

fn default_max_tilt_z_deg() -> f32 {
    2.2
}

fn default_max_lift_px() -> f32 {
    10.0
}

/// Tap regions (normalized to the surface box) and double-tap window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapSettings {
    #[serde(default = "default_center_min_x")]
    pub center_min_x: f32,
    #[serde(default = "default_center_max_x")]
    pub center_max_x: f32,
    #[serde(default = "default_center_min_y")]
    pub center_min_y: f32,
    #[serde(default = "default_center_max_y")]
    pub center_max_y: f32,
    #[serde(default = "default_forward_min_x")]
    pub forward_min_x: f32,
    #[serde(default = "default_backward_max_x")]
    pub backward_max_x: f32,
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u32,
    #[serde(default = "default_double_tap_slop_px")]
    pub double_tap_slop_px: f32,
}

impl Default for TapSettings {
    fn default() -> Self {
        TapSettings {
            center_min_x: default_center_min_x(),
            center_max_x: default_center_max_x(),
            center_min_y: default_center_min_y(),
            center_max_y: default_center_max_y(),
            forward_min_x: default_forward_min_x(),
            backward_max_x: default_backward_max_x(),
            double_tap_window_ms: default_double_tap_window_ms(),
            double_tap_slop_px: default_double_tap_slop_px(),
        }
    }
}

fn default_center_min_x() -> f32 {
    0.28
}

fn default_center_max_x() -> f32 {
    0.72
}

fn default_center_min_y() -> f32 {
    0.18
}

fn default_center_max_y() -> f32 {
    0.82
}

fn default_forward_min_x() -> f32 {
    0.55
}

fn default_backward_max_x() -> f32 {
    0.45
}

fn default_double_tap_window_ms() -> u32 {
    320
}

fn default_double_tap_slop_px() -> f32 {
    18.0
}

/// Animation timings. Durations are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSettings {
    /// Button/keyboard/tap flip.
    #[serde(default = "default_flip_ms")]
    pub flip_ms: u32,
    /// Finishing a committed drag.
    #[serde(default = "default_drag_commit_ms")]
    pub drag_commit_ms: u32,
    #[serde(default = "default_snap_back_ms")]
    pub snap_back_ms: u32,
    /// Angular bias past the terminal angle before settling.
    #[serde(default = "default_overshoot_deg")]
    pub overshoot_deg: f32,
    /// Share of the duration spent in the overshoot phase.
    #[serde(default = "default_settle_split")]
    pub settle_split: f32,
    /// Floor for the settle phase.
    #[serde(default = "default_settle_min_ms")]
    pub settle_min_ms: u32,
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u32,
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u32,
    /// Swap 3D flips for a cross-fade.
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for MotionSettings {
    fn default() -> Self {
        MotionSettings {
            flip_ms: default_flip_ms(),
            drag_commit_ms: default_drag_commit_ms(),
            snap_back_ms: default_snap_back_ms(),
            overshoot_deg: default_overshoot_deg(),
            settle_split: default_settle_split(),
            settle_min_ms: default_settle_min_ms(),
            fade_out_ms: default_fade_out_ms(),
            fade_in_ms: default_fade_in_ms(),
            reduced_motion: false,
        }
    }
}

fn default_flip_ms() -> u32 {
    460
}

fn default_drag_commit_ms() -> u32 {
    320
}

fn default_snap_back_ms() -> u32 {
    220
}

fn default_overshoot_deg() -> f32 {
    7.0
}

fn default_settle_split() -> f32 {
    0.82
}

fn default_settle_min_ms() -> u32 {
    40
}

fn default_fade_out_ms() -> u32 {
    170
}

fn default_fade_in_ms() -> u32 {
    180
}

/// Full-screen viewer gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlaySettings {
    #[serde(default = "default_swipe_min_px")]
    pub swipe_min_px: f32,
    /// Horizontal travel must exceed vertical travel by this factor.
    #[serde(default = "default_swipe_axis_ratio")]
    pub swipe_axis_ratio: f32,
    /// Max travel for a release to count as a tap.
    #[serde(default = "default_tap_slop_px")]
    pub tap_slop_px: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        OverlaySettings {
            swipe_min_px: default_swipe_min_px(),
            swipe_axis_ratio: default_swipe_axis_ratio(),
            tap_slop_px: default_tap_slop_px(),
        }
    }
}

fn default_swipe_min_px() -> f32 {
    55.0
}

fn default_swipe_axis_ratio() -> f32 {
    1.2
}

fn default_tap_slop_px() -> f32 {
    10.0
}

// =============================================================================
// Output
// =============================================================================

/// Discrete lifecycle signal for the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FlipEvent {
    FlipStarted { direction: Direction },
    FlipCommitted { position: usize },
    /// A drag was released below the commit threshold.
    FlipCancelled { direction: Direction },
    /// Instant jump; the idle state was re-rendered.
    PositionChanged { position: usize },
    ViewerOpened,
    ViewerClosed,
    /// Leaving zoom also means the host resets the scroll offset to origin.
    ZoomToggled { zoomed: bool },
}

/// Viewer overlay part of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewerFrame {
    pub open: bool,
    pub zoomed: bool,
}

/// Everything the renderer needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFrame {
    pub position: usize,
    pub count: usize,
    /// Position shown by the "N of M" indicator; runs ahead of `position` during a flip.
    pub indicator_position: usize,
    /// Paginator fill in `[0, 1]`.
    pub dot_progress: f32,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub pose: SheetPose,
    pub lighting: Lighting,
    pub staging: Staging,
    pub edge_hint: EdgeHint,
    pub dragging: bool,
    pub animating: bool,
    /// Target opacity of the surface; the cross-fade drives this.
    pub opacity: f32,
    pub viewer: ViewerFrame,
}
