use ab_glyph::{Font, FontVec, GlyphId, ScaleFont, point};

use crate::blur;
use crate::composite;
use crate::error::PosterResult;
use crate::styles::{Typography, VERTICAL_ADVANCE};

/// Shear factor for synthesized italics.
const ITALIC_SHEAR: f32 = 0.2;

/// A glyph positioned relative to the layer anchor (baseline origin of the
/// first character).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    pub id: GlyphId,
    pub x: f32,
    pub y: f32,
}

/// Single-channel coverage tile positioned relative to the layer anchor.
/// `origin_x`/`origin_y` may be negative; blitting clips against the canvas.
#[derive(Clone, Debug)]
pub struct CoverageMask {
    pub width: u32,
    pub height: u32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub data: Vec<u8>,
}

/// The draw passes for one text layer, in back-to-front order. Pass planning
/// is pure so the ordering invariants are testable without any font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextPass {
    Glow,
    Outline,
    Fill,
}

pub fn passes(typo: &Typography) -> Vec<TextPass> {
    let mut out = Vec::with_capacity(3);
    if typo.glow.is_some() {
        out.push(TextPass::Glow);
    }
    if typo.outline.is_some() {
        out.push(TextPass::Outline);
    }
    out.push(TextPass::Fill);
    out
}

/// Lay out `content` under the resolved typography. Horizontal layout
/// advances by glyph advance + kerning + letter spacing; the traditional
/// vertical layout stacks one character per line, advancing downward by
/// `VERTICAL_ADVANCE` times the font size.
pub fn layout(font: &FontVec, content: &str, typo: &Typography) -> Vec<PositionedGlyph> {
    let scaled = font.as_scaled(typo.size_px);

    if typo.vertical {
        return content
            .chars()
            .enumerate()
            .map(|(i, ch)| PositionedGlyph {
                id: font.glyph_id(ch),
                x: 0.0,
                y: i as f32 * typo.size_px * VERTICAL_ADVANCE,
            })
            .collect();
    }

    let mut glyphs = Vec::new();
    let mut cursor_x = 0.0f32;
    let mut last: Option<GlyphId> = None;
    for ch in content.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor_x += scaled.kern(prev, id);
        }
        glyphs.push(PositionedGlyph {
            id,
            x: cursor_x,
            y: 0.0,
        });
        cursor_x += scaled.h_advance(id) + typo.letter_spacing_px;
        last = Some(id);
    }
    glyphs
}

/// Rasterize the layout into an anchor-relative coverage mask, padded by
/// `pad` pixels on every side so blur and outline passes have room to spill.
pub fn rasterize(
    font: &FontVec,
    glyphs: &[PositionedGlyph],
    typo: &Typography,
    pad: u32,
) -> Option<CoverageMask> {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    let mut outlined = Vec::new();
    for g in glyphs {
        let glyph = g.id.with_scale_and_position(typo.size_px, point(g.x, g.y));
        let Some(out) = font.outline_glyph(glyph) else {
            continue;
        };
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
        outlined.push((out, g.y));
    }
    if outlined.is_empty() {
        return None;
    }

    if typo.italic {
        // Shear moves pixels horizontally by up to ITALIC_SHEAR of the
        // vertical distance from the baseline.
        let reach = (max_y - min_y) * ITALIC_SHEAR;
        min_x -= reach;
        max_x += reach;
    }

    let pad = pad as f32 + 2.0;
    let origin_x = (min_x - pad).floor() as i32;
    let origin_y = (min_y - pad).floor() as i32;
    let width = ((max_x + pad).ceil() as i32 - origin_x).max(1) as u32 + 1;
    let height = ((max_y + pad).ceil() as i32 - origin_y).max(1) as u32 + 1;

    let mut data = vec![0u8; width as usize * height as usize];
    for (out, baseline_y) in &outlined {
        let b = out.px_bounds();
        out.draw(|px, py, cov| {
            let mut cx = b.min.x + px as f32;
            let cy = b.min.y + py as f32;
            if typo.italic {
                cx += (baseline_y - cy) * ITALIC_SHEAR;
            }
            let ix = cx.round() as i32 - origin_x;
            let iy = cy.round() as i32 - origin_y;
            stamp(&mut data, width, height, ix, iy, cov);
            if typo.synthetic_bold {
                stamp(&mut data, width, height, ix + 1, iy, cov);
            }
        });
    }

    Some(CoverageMask {
        width,
        height,
        origin_x,
        origin_y,
        data,
    })
}

fn stamp(data: &mut [u8], width: u32, height: u32, x: i32, y: i32, cov: f32) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let idx = y as usize * width as usize + x as usize;
    let v = (cov.clamp(0.0, 1.0) * 255.0).round() as u8;
    data[idx] = data[idx].max(v);
}

/// Dilate a coverage mask by `radius` pixels (max over a stamped disc).
/// Drawn beneath the fill pass this reads as a hard outline.
pub fn dilate(mask: &CoverageMask, radius: u32) -> CoverageMask {
    if radius == 0 {
        return mask.clone();
    }
    let r = radius as i32;
    let mut out = mask.clone();
    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            let mut best = 0u8;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    let sx = x + dx;
                    let sy = y + dy;
                    if sx < 0 || sy < 0 || sx >= mask.width as i32 || sy >= mask.height as i32 {
                        continue;
                    }
                    best = best.max(mask.data[sy as usize * mask.width as usize + sx as usize]);
                    if best == 255 {
                        break;
                    }
                }
                if best == 255 {
                    break;
                }
            }
            out.data[y as usize * mask.width as usize + x as usize] = best;
        }
    }
    out
}

/// Blur a coverage mask in place (for glow and soft shadows).
pub fn blur_mask(mask: &CoverageMask, radius: u32) -> PosterResult<CoverageMask> {
    let data = blur::blur_alpha8(
        &mask.data,
        mask.width,
        mask.height,
        radius,
        blur::sigma_for_radius(radius),
    )?;
    Ok(CoverageMask { data, ..mask.clone() })
}

/// Tint a coverage mask with a straight-alpha color and composite it onto a
/// premultiplied canvas at `(anchor_x, anchor_y)` (canvas px), clipping at
/// the edges.
pub fn blit_tinted(
    canvas: &mut [u8],
    canvas_w: u32,
    canvas_h: u32,
    mask: &CoverageMask,
    anchor_x: f32,
    anchor_y: f32,
    color: [u8; 4],
) {
    let base_x = anchor_x.round() as i64 + i64::from(mask.origin_x);
    let base_y = anchor_y.round() as i64 + i64::from(mask.origin_y);

    for my in 0..mask.height as i64 {
        let cy = base_y + my;
        if cy < 0 || cy >= i64::from(canvas_h) {
            continue;
        }
        for mx in 0..mask.width as i64 {
            let cx = base_x + mx;
            if cx < 0 || cx >= i64::from(canvas_w) {
                continue;
            }
            let cov = mask.data[my as usize * mask.width as usize + mx as usize];
            if cov == 0 {
                continue;
            }
            let a = ((u16::from(color[3]) * u16::from(cov) + 127) / 255) as u8;
            if a == 0 {
                continue;
            }
            let src = [
                ((u16::from(color[0]) * u16::from(a) + 127) / 255) as u8,
                ((u16::from(color[1]) * u16::from(a) + 127) / 255) as u8,
                ((u16::from(color[2]) * u16::from(a) + 127) / 255) as u8,
                a,
            ];
            let idx = (cy as usize * canvas_w as usize + cx as usize) * 4;
            let dst = [canvas[idx], canvas[idx + 1], canvas[idx + 2], canvas[idx + 3]];
            canvas[idx..idx + 4].copy_from_slice(&composite::over(dst, src));
        }
    }
}

/// Draw one text layer onto a premultiplied canvas: glow, then outline, then
/// fill, all derived from the same coverage mask.
pub fn draw_text(
    canvas: &mut [u8],
    canvas_w: u32,
    canvas_h: u32,
    font: &FontVec,
    content: &str,
    typo: &Typography,
    anchor_x: f32,
    anchor_y: f32,
) -> PosterResult<()> {
    let glyphs = layout(font, content, typo);
    let pad = typo
        .glow
        .map(|g| g.radius_px)
        .unwrap_or(0.0)
        .max(typo.outline.map(|o| o.width_px).unwrap_or(0.0))
        .ceil() as u32;
    let Some(mask) = rasterize(font, &glyphs, typo, pad) else {
        return Ok(());
    };

    for pass in passes(typo) {
        match pass {
            TextPass::Glow => {
                let Some(glow) = typo.glow else { continue };
                let radius = glow.radius_px.round().max(1.0) as u32;
                let soft = blur_mask(&mask, radius)?;
                blit_tinted(canvas, canvas_w, canvas_h, &soft, anchor_x, anchor_y, glow.color);
            }
            TextPass::Outline => {
                let Some(outline) = typo.outline else { continue };
                let radius = outline.width_px.round().max(1.0) as u32;
                let thick = dilate(&mask, radius);
                blit_tinted(
                    canvas, canvas_w, canvas_h, &thick, anchor_x, anchor_y, outline.color,
                );
            }
            TextPass::Fill => {
                blit_tinted(canvas, canvas_w, canvas_h, &mask, anchor_x, anchor_y, typo.fill);
            }
        }
    }
    Ok(())
}
