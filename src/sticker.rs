use ab_glyph::FontVec;

use crate::fonts::FontClass;
use crate::model::StickerLayer;
use crate::styles::{self, Typography};
use crate::text::{self, CoverageMask};

/// Typography used to rasterize sticker glyphs. Stickers reuse the text
/// raster path with a plain sans face and no decoration passes.
fn sticker_typography(canvas_width: u32, scale: f32) -> Typography {
    Typography {
        font: FontClass::Sans,
        size_px: styles::base_size(canvas_width, scale),
        fill: styles::BLACK,
        glow: None,
        outline: None,
        letter_spacing_px: 0.0,
        vertical: false,
        synthetic_bold: false,
        italic: false,
    }
}

/// Re-anchor a mask so its bounding-box center sits at the local origin.
/// Rotation then pivots around the sticker's visual center.
fn center(mask: &mut CoverageMask) {
    mask.origin_x = -(mask.width as i32 / 2);
    mask.origin_y = -(mask.height as i32 / 2);
}

/// Rotate a centered coverage mask by `degrees` (clockwise, matching screen
/// coordinates) via inverse-mapped bilinear sampling.
pub fn rotate_mask(mask: &CoverageMask, degrees: f32) -> CoverageMask {
    if degrees.rem_euclid(360.0) == 0.0 {
        return mask.clone();
    }
    let rad = degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    // Snap near-cardinal angles so quarter turns keep exact extents.
    let snap = |v: f32| {
        if v.abs() < 1e-6 {
            0.0
        } else if (v.abs() - 1.0).abs() < 1e-6 {
            v.signum()
        } else {
            v
        }
    };
    let (sin, cos) = (snap(sin), snap(cos));

    // Rotated bounding box of the source extents.
    let w = mask.width as f32;
    let h = mask.height as f32;
    let new_w = (w * cos.abs() + h * sin.abs()).ceil() as u32;
    let new_h = (w * sin.abs() + h * cos.abs()).ceil() as u32;

    let scx = w / 2.0;
    let scy = h / 2.0;
    let dcx = new_w as f32 / 2.0;
    let dcy = new_h as f32 / 2.0;

    let mut data = vec![0u8; new_w as usize * new_h as usize];
    for dy in 0..new_h {
        for dx in 0..new_w {
            let rx = dx as f32 + 0.5 - dcx;
            let ry = dy as f32 + 0.5 - dcy;
            // Inverse rotation back into source space.
            let sx = rx * cos + ry * sin + scx - 0.5;
            let sy = -rx * sin + ry * cos + scy - 0.5;
            let v = sample_bilinear(mask, sx, sy);
            data[dy as usize * new_w as usize + dx as usize] = v;
        }
    }
    CoverageMask {
        width: new_w,
        height: new_h,
        origin_x: -(new_w as i32 / 2),
        origin_y: -(new_h as i32 / 2),
        data,
    }
}

fn sample_bilinear(mask: &CoverageMask, x: f32, y: f32) -> u8 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let at = |px: i64, py: i64| -> f32 {
        if px < 0 || py < 0 || px >= i64::from(mask.width) || py >= i64::from(mask.height) {
            0.0
        } else {
            f32::from(mask.data[py as usize * mask.width as usize + px as usize])
        }
    };

    let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1, y0) * fx;
    let bot = at(x0, y0 + 1) * (1.0 - fx) + at(x0 + 1, y0 + 1) * fx;
    (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8
}

/// Draw one sticker onto a premultiplied canvas, centered at `(anchor_x,
/// anchor_y)` in canvas pixels.
pub fn draw_sticker(
    canvas: &mut [u8],
    canvas_w: u32,
    canvas_h: u32,
    font: &FontVec,
    layer: &StickerLayer,
    anchor_x: f32,
    anchor_y: f32,
) {
    let typo = sticker_typography(canvas_w, layer.scale);
    let glyphs = text::layout(font, &layer.content, &typo);
    let Some(mut mask) = text::rasterize(font, &glyphs, &typo, 0) else {
        return;
    };
    center(&mut mask);
    let mask = rotate_mask(&mask, layer.rotation_deg);
    text::blit_tinted(canvas, canvas_w, canvas_h, &mask, anchor_x, anchor_y, typo.fill);
}
