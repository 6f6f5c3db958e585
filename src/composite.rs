use crate::error::{PosterError, PosterResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 && src[0] == 0 && src[1] == 0 && src[2] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite `src` over `dst` in place. Both buffers are premultiplied RGBA8
/// of the same length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> PosterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PosterError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Straight-alpha RGBA8 to premultiplied, in place.
pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Premultiplied RGBA8 back to straight alpha, in place. Used just before
/// PNG encoding.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 || a == 0 {
            continue;
        }
        for c in 0..3 {
            let v = (u16::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
