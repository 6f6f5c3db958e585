use crate::error::{PosterError, PosterResult};

/// Overlay positions are normalized percentages of the canvas. The range is
/// deliberately wider than [0,100] so an element can be dragged partly past
/// the canvas edge before release.
pub const POSITION_MIN: f32 = -10.0;
pub const POSITION_MAX: f32 = 110.0;

pub const BRIGHTNESS_NEUTRAL: f32 = 100.0;
pub const CONTRAST_NEUTRAL: f32 = 100.0;
pub const BLUR_MAX: f32 = 20.0;

/// The complete mutable description of one editing session: crop, rotation,
/// color, blur, and overlay state. Undo snapshots are deep copies of this.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Adjustments {
    pub brightness: f32,
    pub contrast: f32,
    pub rotation: Rotation,
    pub blur: f32,
    pub aspect: AspectRatio,
    #[serde(default)]
    pub texts: Vec<TextLayer>,
    #[serde(default)]
    pub stickers: Vec<StickerLayer>,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: BRIGHTNESS_NEUTRAL,
            contrast: CONTRAST_NEUTRAL,
            rotation: Rotation::Deg0,
            blur: 0.0,
            aspect: AspectRatio::Original,
            texts: Vec::new(),
            stickers: Vec::new(),
        }
    }
}

impl Adjustments {
    pub fn validate(&self) -> PosterResult<()> {
        for (name, v, max) in [
            ("brightness", self.brightness, 200.0),
            ("contrast", self.contrast, 200.0),
            ("blur", self.blur, BLUR_MAX),
        ] {
            if !v.is_finite() || v < 0.0 || v > max {
                return Err(PosterError::validation(format!(
                    "{name} must be in 0..={max}, got {v}"
                )));
            }
        }
        for text in &self.texts {
            text.validate()?;
        }
        for sticker in &self.stickers {
            sticker.validate()?;
        }
        Ok(())
    }

    pub fn text_mut(&mut self, id: &str) -> Option<&mut TextLayer> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    pub fn sticker_mut(&mut self, id: &str) -> Option<&mut StickerLayer> {
        self.stickers.iter_mut().find(|s| s.id == id)
    }
}

/// Quarter-turn rotation. Cumulative edits go through `step()`, so the value
/// is always one of the four legal states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "270")]
    Deg270,
}

impl Rotation {
    /// Advance by +90 degrees, wrapping at 360.
    pub fn step(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// True when the rotation swaps the canvas axes.
    pub fn swaps_axes(self) -> bool {
        self.degrees() % 180 != 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    #[default]
    Original,
    /// 1:1
    Square,
    /// 16:9
    Wide,
    /// 9:16
    Tall,
    /// 4:3
    Classic,
    /// 3:4
    Portrait,
}

impl AspectRatio {
    /// Target width/height ratio; `None` means no cropping.
    pub fn ratio(self) -> Option<f64> {
        match self {
            AspectRatio::Original => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::Wide => Some(16.0 / 9.0),
            AspectRatio::Tall => Some(9.0 / 16.0),
            AspectRatio::Classic => Some(4.0 / 3.0),
            AspectRatio::Portrait => Some(3.0 / 4.0),
        }
    }

    pub fn all() -> &'static [AspectRatio] {
        &[
            AspectRatio::Original,
            AspectRatio::Square,
            AspectRatio::Wide,
            AspectRatio::Tall,
            AspectRatio::Classic,
            AspectRatio::Portrait,
        ]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyleTag {
    Neon,
    #[default]
    Elegant,
    Bold,
    Traditional,
    Brush,
    Custom,
}

/// Explicit typography overrides, honored only when the layer's style tag is
/// `Custom`. Editing any of these through the session forces the tag to
/// `Custom`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<crate::fonts::FontClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<[u8; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<[u8; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow_color: Option<[u8; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow_size: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLayer {
    pub id: String,
    pub content: String,
    pub style: TextStyleTag,
    /// Normalized position, percent of canvas width/height.
    pub x: f32,
    pub y: f32,
    /// Multiplier over the canvas-relative base size.
    pub font_scale: f32,
    #[serde(default)]
    pub overrides: TextOverrides,
}

impl TextLayer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            style: TextStyleTag::Elegant,
            x: 50.0,
            y: 50.0,
            font_scale: 1.0,
            overrides: TextOverrides::default(),
        }
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.id.is_empty() {
            return Err(PosterError::validation("text layer id must be non-empty"));
        }
        if !(self.font_scale.is_finite() && self.font_scale > 0.0) {
            return Err(PosterError::validation(format!(
                "text layer '{}' font_scale must be > 0",
                self.id
            )));
        }
        validate_position(&self.id, self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerLayer {
    pub id: String,
    /// Glyph or emoji string.
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Continuous rotation in degrees, 0..360.
    pub rotation_deg: f32,
}

impl StickerLayer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            x: 50.0,
            y: 50.0,
            scale: 1.0,
            rotation_deg: 0.0,
        }
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.id.is_empty() {
            return Err(PosterError::validation("sticker id must be non-empty"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(PosterError::validation(format!(
                "sticker '{}' scale must be > 0",
                self.id
            )));
        }
        if !self.rotation_deg.is_finite() {
            return Err(PosterError::validation(format!(
                "sticker '{}' rotation must be finite",
                self.id
            )));
        }
        validate_position(&self.id, self.x, self.y)
    }
}

fn validate_position(id: &str, x: f32, y: f32) -> PosterResult<()> {
    for v in [x, y] {
        if !v.is_finite() || !(POSITION_MIN..=POSITION_MAX).contains(&v) {
            return Err(PosterError::validation(format!(
                "layer '{id}' position must be within {POSITION_MIN}..={POSITION_MAX}"
            )));
        }
    }
    Ok(())
}

/// Move the element with `id` to the end of the slice (drawn last, frontmost).
/// No-op when absent or already frontmost.
pub fn send_to_front<T, F: Fn(&T) -> &str>(layers: &mut Vec<T>, id: &str, id_of: F) {
    if let Some(pos) = layers.iter().position(|l| id_of(l) == id)
        && pos + 1 != layers.len()
    {
        let layer = layers.remove(pos);
        layers.push(layer);
    }
}

/// Move the element with `id` to the start of the slice (drawn first, rearmost).
pub fn send_to_back<T, F: Fn(&T) -> &str>(layers: &mut Vec<T>, id: &str, id_of: F) {
    if let Some(pos) = layers.iter().position(|l| id_of(l) == id)
        && pos != 0
    {
        let layer = layers.remove(pos);
        layers.insert(0, layer);
    }
}
