use crate::fonts::FontClass;
use crate::model::{TextLayer, TextStyleTag};

pub const CYAN_NEON: [u8; 4] = [0x00, 0xf2, 0xff, 0xff];
pub const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
pub const YELLOW: [u8; 4] = [0xff, 0xff, 0x00, 0xff];
pub const INK: [u8; 4] = [0x1a, 0x1a, 0x1a, 0xff];
pub const VERMILION: [u8; 4] = [0xd6, 0x30, 0x31, 0xff];
pub const BLACK: [u8; 4] = [0x00, 0x00, 0x00, 0xff];
pub const SOFT_SHADOW: [u8; 4] = [0x00, 0x00, 0x00, 0x80];

/// Vertical advance per character for the traditional style, as a multiple
/// of the resolved font size.
pub const VERTICAL_ADVANCE: f32 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: [u8; 4],
    pub radius_px: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
    pub color: [u8; 4],
    pub width_px: f32,
}

/// Fully resolved typography for one text layer at a given canvas width.
/// Everything downstream of the preset table is in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Typography {
    pub font: FontClass,
    pub size_px: f32,
    pub fill: [u8; 4],
    pub glow: Option<Glow>,
    pub outline: Option<Outline>,
    pub letter_spacing_px: f32,
    pub vertical: bool,
    pub synthetic_bold: bool,
    pub italic: bool,
}

/// Canvas-relative base size shared by text and sticker layers.
pub fn base_size(canvas_width: u32, scale: f32) -> f32 {
    canvas_width as f32 / 10.0 * scale
}

/// Resolve a layer's typography. Non-custom tags always come from the preset
/// table; override fields are read only for `Custom`.
pub fn resolve(layer: &TextLayer, canvas_width: u32) -> Typography {
    let base = base_size(canvas_width, layer.font_scale);
    match layer.style {
        TextStyleTag::Neon => Typography {
            font: FontClass::Sans,
            size_px: base,
            fill: CYAN_NEON,
            glow: Some(Glow {
                color: CYAN_NEON,
                radius_px: base / 3.0,
            }),
            outline: None,
            letter_spacing_px: 0.0,
            vertical: false,
            synthetic_bold: true,
            italic: false,
        },
        TextStyleTag::Elegant => Typography {
            font: FontClass::Serif,
            size_px: base,
            fill: WHITE,
            glow: None,
            outline: Some(Outline {
                color: SOFT_SHADOW,
                width_px: 4.0,
            }),
            letter_spacing_px: 4.0,
            vertical: false,
            synthetic_bold: false,
            italic: true,
        },
        TextStyleTag::Bold => {
            let size = base * 1.2;
            Typography {
                font: FontClass::Sans,
                size_px: size,
                fill: YELLOW,
                glow: None,
                // Hard outline always, regardless of any shadow-blur field.
                outline: Some(Outline {
                    color: BLACK,
                    width_px: size / 10.0,
                }),
                letter_spacing_px: 0.0,
                vertical: false,
                synthetic_bold: true,
                italic: false,
            }
        }
        TextStyleTag::Traditional => Typography {
            font: FontClass::Kai,
            size_px: base,
            fill: INK,
            glow: None,
            outline: None,
            letter_spacing_px: 0.0,
            vertical: true,
            synthetic_bold: true,
            italic: false,
        },
        TextStyleTag::Brush => Typography {
            font: FontClass::Cursive,
            size_px: base,
            fill: VERMILION,
            glow: None,
            outline: None,
            letter_spacing_px: 0.0,
            vertical: false,
            synthetic_bold: true,
            italic: false,
        },
        TextStyleTag::Custom => {
            let ov = &layer.overrides;
            Typography {
                font: ov.font.unwrap_or(FontClass::Sans),
                size_px: base,
                fill: ov.fill.unwrap_or(WHITE),
                glow: match ov.glow_size {
                    Some(size) if size > 0.0 => Some(Glow {
                        color: ov.glow_color.unwrap_or(WHITE),
                        radius_px: size,
                    }),
                    _ => None,
                },
                outline: match ov.shadow_blur {
                    Some(blur) if blur > 0.0 => Some(Outline {
                        color: ov.shadow_color.unwrap_or(BLACK),
                        width_px: blur,
                    }),
                    _ => None,
                },
                letter_spacing_px: 0.0,
                vertical: false,
                synthetic_bold: false,
                italic: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextOverrides;

    fn layer(style: TextStyleTag) -> TextLayer {
        let mut l = TextLayer::new("标题");
        l.style = style;
        l
    }

    #[test]
    fn bold_is_yellow_with_black_outline_regardless_of_overrides() {
        let mut l = layer(TextStyleTag::Bold);
        // Override fields must be ignored for non-custom tags.
        l.overrides = TextOverrides {
            fill: Some([1, 2, 3, 4]),
            shadow_blur: Some(0.0),
            ..TextOverrides::default()
        };
        let t = resolve(&l, 1000);
        assert_eq!(t.fill, YELLOW);
        let outline = t.outline.expect("bold always outlines");
        assert_eq!(outline.color, BLACK);
        assert!(outline.width_px > 0.0);
    }

    #[test]
    fn neon_glow_scales_with_canvas_and_font_scale() {
        let mut l = layer(TextStyleTag::Neon);
        l.font_scale = 2.0;
        let t = resolve(&l, 900);
        // base = 900/10 * 2 = 180
        assert_eq!(t.size_px, 180.0);
        assert_eq!(t.glow.unwrap().radius_px, 60.0);
        assert_eq!(t.fill, CYAN_NEON);
    }

    #[test]
    fn traditional_lays_out_vertically() {
        let t = resolve(&layer(TextStyleTag::Traditional), 500);
        assert!(t.vertical);
        assert_eq!(t.fill, INK);
        assert_eq!(t.font, FontClass::Kai);
    }

    #[test]
    fn custom_reads_override_fields() {
        let mut l = layer(TextStyleTag::Custom);
        l.overrides = TextOverrides {
            font: Some(FontClass::Serif),
            fill: Some([9, 9, 9, 255]),
            glow_color: Some([0, 255, 0, 255]),
            glow_size: Some(12.0),
            shadow_color: Some([5, 5, 5, 255]),
            shadow_blur: Some(3.0),
        };
        let t = resolve(&l, 1000);
        assert_eq!(t.font, FontClass::Serif);
        assert_eq!(t.fill, [9, 9, 9, 255]);
        assert_eq!(t.glow.unwrap().radius_px, 12.0);
        assert_eq!(t.outline.unwrap().width_px, 3.0);
    }

    #[test]
    fn custom_without_overrides_has_plain_white_fill() {
        let t = resolve(&layer(TextStyleTag::Custom), 1000);
        assert_eq!(t.fill, WHITE);
        assert!(t.glow.is_none());
        assert!(t.outline.is_none());
    }
}
