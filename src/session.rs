use crate::drag::{self, DragEffect, DragEvent, DragState, DragTarget, Viewport};
use crate::model::{
    self, Adjustments, AspectRatio, BLUR_MAX, StickerLayer, TextLayer, TextStyleTag,
};

/// Unbounded stack of deep-copied adjustment snapshots. Undo-only; there is
/// no redo.
#[derive(Debug, Default)]
pub struct UndoStack {
    snapshots: Vec<Adjustments>,
}

impl UndoStack {
    pub fn push(&mut self, snapshot: Adjustments) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Adjustments> {
        self.snapshots.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

/// Live editing state: the current adjustments, the undo stack, and the drag
/// gesture. Every reversible mutation snapshots the adjustments first, so
/// one undo steps back exactly one user action.
#[derive(Debug, Default)]
pub struct EditSession {
    adjustments: Adjustments,
    undo: UndoStack,
    drag: DragState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn snapshot(&mut self) {
        self.undo.push(self.adjustments.clone());
    }

    /// Start a continuous gesture (slider press, drag begin). One snapshot
    /// covers the whole gesture, however many value updates follow.
    pub fn begin_gesture(&mut self) {
        self.snapshot();
    }

    // Continuous slider updates. Values are clamped rather than rejected so
    // a scrubbing slider never errors mid-gesture.
    pub fn set_brightness(&mut self, value: f32) {
        self.adjustments.brightness = clamp_finite(value, 0.0, 200.0, 100.0);
    }

    pub fn set_contrast(&mut self, value: f32) {
        self.adjustments.contrast = clamp_finite(value, 0.0, 200.0, 100.0);
    }

    pub fn set_blur(&mut self, value: f32) {
        self.adjustments.blur = clamp_finite(value, 0.0, BLUR_MAX, 0.0);
    }

    // Discrete edits snapshot themselves.

    pub fn rotate_step(&mut self) {
        self.snapshot();
        self.adjustments.rotation = self.adjustments.rotation.step();
    }

    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        if self.adjustments.aspect == aspect {
            return;
        }
        self.snapshot();
        self.adjustments.aspect = aspect;
    }

    /// Add a text layer at the canvas center; returns its id.
    pub fn add_text(&mut self, content: impl Into<String>) -> String {
        self.snapshot();
        let layer = TextLayer::new(content);
        let id = layer.id.clone();
        self.adjustments.texts.push(layer);
        id
    }

    pub fn remove_text(&mut self, id: &str) -> bool {
        let Some(pos) = self.adjustments.texts.iter().position(|t| t.id == id) else {
            return false;
        };
        self.snapshot();
        self.adjustments.texts.remove(pos);
        true
    }

    pub fn set_text_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        let content = content.into();
        self.mutate_text(id, |t| t.content = content)
    }

    pub fn set_text_style(&mut self, id: &str, style: TextStyleTag) -> bool {
        self.mutate_text(id, |t| t.style = style)
    }

    pub fn set_text_scale(&mut self, id: &str, scale: f32) -> bool {
        let scale = clamp_finite(scale, 0.1, 10.0, 1.0);
        self.mutate_text(id, |t| t.font_scale = scale)
    }

    /// Edit one override field; forces the style tag to `Custom` so the
    /// override becomes visible.
    pub fn set_text_overrides(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut model::TextOverrides),
    ) -> bool {
        self.mutate_text(id, |t| {
            t.style = TextStyleTag::Custom;
            edit(&mut t.overrides);
        })
    }

    fn mutate_text(&mut self, id: &str, edit: impl FnOnce(&mut TextLayer)) -> bool {
        if self.adjustments.text_mut(id).is_none() {
            return false;
        }
        self.snapshot();
        if let Some(t) = self.adjustments.text_mut(id) {
            edit(t);
        }
        true
    }

    pub fn add_sticker(&mut self, content: impl Into<String>) -> String {
        self.snapshot();
        let layer = StickerLayer::new(content);
        let id = layer.id.clone();
        self.adjustments.stickers.push(layer);
        id
    }

    pub fn remove_sticker(&mut self, id: &str) -> bool {
        let Some(pos) = self.adjustments.stickers.iter().position(|s| s.id == id) else {
            return false;
        };
        self.snapshot();
        self.adjustments.stickers.remove(pos);
        true
    }

    pub fn set_sticker_scale(&mut self, id: &str, scale: f32) -> bool {
        let scale = clamp_finite(scale, 0.1, 10.0, 1.0);
        self.mutate_sticker(id, |s| s.scale = scale)
    }

    pub fn set_sticker_rotation(&mut self, id: &str, degrees: f32) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        self.mutate_sticker(id, |s| s.rotation_deg = degrees.rem_euclid(360.0))
    }

    fn mutate_sticker(&mut self, id: &str, edit: impl FnOnce(&mut StickerLayer)) -> bool {
        if self.adjustments.sticker_mut(id).is_none() {
            return false;
        }
        self.snapshot();
        if let Some(s) = self.adjustments.sticker_mut(id) {
            edit(s);
        }
        true
    }

    pub fn send_text_to_front(&mut self, id: &str) {
        self.snapshot();
        model::send_to_front(&mut self.adjustments.texts, id, |t| &t.id);
    }

    pub fn send_text_to_back(&mut self, id: &str) {
        self.snapshot();
        model::send_to_back(&mut self.adjustments.texts, id, |t| &t.id);
    }

    pub fn send_sticker_to_front(&mut self, id: &str) {
        self.snapshot();
        model::send_to_front(&mut self.adjustments.stickers, id, |s| &s.id);
    }

    pub fn send_sticker_to_back(&mut self, id: &str) {
        self.snapshot();
        model::send_to_back(&mut self.adjustments.stickers, id, |s| &s.id);
    }

    /// Run a pointer event through the drag machine and apply its effect.
    pub fn handle_pointer(&mut self, event: DragEvent, viewport: &Viewport) {
        let state = std::mem::take(&mut self.drag);
        let (next, effect) = drag::transition(state, event, viewport);
        self.drag = next;
        match effect {
            Some(DragEffect::Begin { .. }) => self.begin_gesture(),
            Some(DragEffect::MoveTo { target, x, y }) => self.move_target(&target, x, y),
            None => {}
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    fn move_target(&mut self, target: &DragTarget, x: f32, y: f32) {
        match target {
            DragTarget::Text(id) => {
                if let Some(t) = self.adjustments.text_mut(id) {
                    t.x = x;
                    t.y = y;
                }
            }
            DragTarget::Sticker(id) => {
                if let Some(s) = self.adjustments.sticker_mut(id) {
                    s.x = x;
                    s.y = y;
                }
            }
        }
    }

    /// Restore the most recent snapshot verbatim. Returns false when the
    /// stack is empty.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(snapshot) => {
                self.adjustments = snapshot;
                true
            }
            None => false,
        }
    }

    /// Back to neutral adjustments, reversibly.
    pub fn reset(&mut self) {
        self.snapshot();
        self.adjustments = Adjustments::default();
    }

    /// Drop all state, including undo history. Used when a new source image
    /// is loaded.
    pub fn clear(&mut self) {
        self.adjustments = Adjustments::default();
        self.undo.clear();
        self.drag = DragState::Idle;
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
