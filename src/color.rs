/// Brightness/contrast as a single 256-entry lookup table, equivalent to the
/// CSS filter chain `brightness(b%) contrast(c%)`: scale by b/100, then pivot
/// about mid-gray by c/100. 100/100 is the identity.
pub fn color_lut(brightness: f32, contrast: f32) -> [u8; 256] {
    let b = brightness / 100.0;
    let c = contrast / 100.0;
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = i as f32 * b;
        let v = (v - 127.5) * c + 127.5;
        *slot = v.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply the table to the RGB channels of an RGBA8 buffer in place. Alpha is
/// untouched; callers run this before any overlay compositing, while the base
/// layer is still fully opaque.
pub fn apply_lut(rgba: &mut [u8], lut: &[u8; 256]) {
    for px in rgba.chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
}

pub fn is_neutral(brightness: f32, contrast: f32) -> bool {
    brightness == 100.0 && contrast == 100.0
}
