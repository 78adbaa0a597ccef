//! Interactive-dismiss gesture policy.
//!
//! Pure decision functions over gesture snapshots and controller state; the
//! controller consults these from its gesture-delegate entry points. No
//! mutable state lives here.
//!
//! Gating at session start: the vertical velocity component must dominate
//! (|vx / vy| below the configured ratio), the motion must be downward, and
//! the touch must originate inside content bounds that would not trigger an
//! overscroll bounce instead.

use crate::model::{Point, Rect};

/// Phase of a continuous pan gesture, as reported by the host recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanState {
    /// Touch crossed the recognition threshold.
    Began,
    /// Touch moved while recognized.
    Changed,
    /// Touch lifted normally.
    Ended,
    /// Recognition was interrupted.
    Cancelled,
}

/// One sample of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSnapshot {
    /// Gesture phase.
    pub state: PanState,
    /// Touch location in viewport coordinates.
    pub location: Point,
    /// Instantaneous velocity in points per second.
    pub velocity: Point,
}

/// Where the touch landed relative to the detail content of the current
/// page, supplied by the host (only it knows its cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissGeometry {
    /// Frame of the page's detail content, in the content's own space.
    pub content_frame: Rect,
    /// Touch location in the content's own space.
    pub location_in_content: Point,
}

/// Classification of a competing gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Another continuous pan.
    Pan,
    /// Anything that is not a pan (tap, pinch, press).
    Other,
}

/// Snapshot of a competing recognizer for simultaneous-recognition
/// arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtherGesture {
    /// What kind of recognizer is competing.
    pub kind: GestureKind,
    /// Whether it belongs to a recognized inner scrollable surface.
    pub on_inner_scrollable: bool,
}

/// Whether the vertical velocity component dominates.
///
/// Zero vertical velocity never passes: the ratio degenerates to infinity
/// (or NaN for a zero vector), both of which compare false.
pub fn axis_ratio_acceptable(velocity: Point, max_ratio: f64) -> bool {
    (velocity.x / velocity.y).abs() < max_ratio
}

/// Recognizer-level gate: may the dismiss recognizer begin at all?
///
/// Requires a dominant vertical component and a touch inside the visible
/// page's content span (`None` geometry means no visible page — refuse).
pub fn should_begin(
    velocity: Point,
    viewport_height: f64,
    geometry: Option<&DismissGeometry>,
    max_ratio: f64,
) -> bool {
    if !axis_ratio_acceptable(velocity, max_ratio) {
        return false;
    }
    let Some(geometry) = geometry else {
        return false;
    };
    geometry.location_in_content.y - viewport_height <= 0.0
}

/// Session-level gate: does this sample start an interactive session?
///
/// Evaluated on the first sample of a recognized pan: downward motion,
/// dominant vertical component, and a touch position that cannot set off an
/// overscroll bounce (either the touch sits above the already-scrolled
/// content edge, or the content fits the viewport entirely).
pub fn should_start_session(
    snapshot: &PanSnapshot,
    viewport_height: f64,
    geometry: &DismissGeometry,
    max_ratio: f64,
) -> bool {
    if snapshot.velocity.y <= 0.0 {
        return false;
    }
    if !axis_ratio_acceptable(snapshot.velocity, max_ratio) {
        return false;
    }
    geometry.location_in_content.y - snapshot.location.y < 0.0
        || geometry.content_frame.height() <= viewport_height
}

/// Simultaneous-recognition arbitration for the dismiss recognizer.
///
/// Exclusive while a session runs. Otherwise non-pan gestures may always
/// recognize alongside; a competing pan may only when it belongs to an
/// inner scrollable surface.
pub fn should_recognize_simultaneously(session_running: bool, other: &OtherGesture) -> bool {
    if session_running {
        return false;
    }
    match other.kind {
        GestureKind::Other => true,
        GestureKind::Pan => other.on_inner_scrollable,
    }
}

/// Map a vertical drag distance to transition progress.
///
/// Full progress is reached at `distance_fraction` of the viewport height;
/// the result is clamped to `[0, 1]`. Degenerate geometry (zero viewport)
/// maps to zero progress.
pub fn dismiss_percent(vertical_delta: f64, viewport_height: f64, distance_fraction: f64) -> f64 {
    let span = viewport_height * distance_fraction;
    let percent = vertical_delta / span;
    if percent.is_finite() {
        percent.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Completion decision at session end: the gesture must have ended (not
/// been cancelled) while still moving downward or at rest.
pub fn should_complete(state: PanState, vertical_velocity: f64) -> bool {
    state == PanState::Ended && vertical_velocity >= 0.0
}
