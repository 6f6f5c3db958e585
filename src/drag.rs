use crate::model::{POSITION_MAX, POSITION_MIN};

/// On-screen preview rectangle, in device pixels. Pointer coordinates are
/// projected through this into the normalized percent space layers live in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Project a pointer position into percent coordinates. Returns `None`
    /// for a degenerate viewport.
    pub fn to_percent(&self, px: f32, py: f32) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((
            (px - self.left) / self.width * 100.0,
            (py - self.top) / self.height * 100.0,
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Text(String),
    Sticker(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        target: DragTarget,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragEvent {
    PointerDown { target: DragTarget, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// Pointer left the preview area; ends the gesture like a release.
    PointerLeave,
}

/// What the session should do in response to a transition. `Begin` snapshots
/// the current adjustments before the first movement; `MoveTo` carries an
/// already-clamped position.
#[derive(Clone, Debug, PartialEq)]
pub enum DragEffect {
    Begin { target: DragTarget },
    MoveTo { target: DragTarget, x: f32, y: f32 },
}

/// Layers may hang slightly off-canvas but never run away entirely.
pub fn clamp_position(v: f32) -> f32 {
    v.clamp(POSITION_MIN, POSITION_MAX)
}

/// Pure transition function. Moves while idle, releases while idle, and
/// presses while already dragging are all ignored.
pub fn transition(
    state: DragState,
    event: DragEvent,
    viewport: &Viewport,
) -> (DragState, Option<DragEffect>) {
    match (state, event) {
        (DragState::Idle, DragEvent::PointerDown { target, .. }) => (
            DragState::Dragging {
                target: target.clone(),
            },
            Some(DragEffect::Begin { target }),
        ),
        (DragState::Dragging { target }, DragEvent::PointerMove { x, y }) => {
            match viewport.to_percent(x, y) {
                Some((px, py)) => {
                    let effect = DragEffect::MoveTo {
                        target: target.clone(),
                        x: clamp_position(px),
                        y: clamp_position(py),
                    };
                    (DragState::Dragging { target }, Some(effect))
                }
                None => (DragState::Dragging { target }, None),
            }
        }
        (DragState::Dragging { .. }, DragEvent::PointerUp | DragEvent::PointerLeave) => {
            (DragState::Idle, None)
        }
        // Ignored combinations keep the current state.
        (state, _) => (state, None),
    }
}
