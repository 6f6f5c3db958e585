use crate::error::{PosterError, PosterResult};

/// Radial focus falloff used by the depth-of-field composite. Fractions are
/// relative to canvas width; the defaults reproduce the product's tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FocusParams {
    pub inner_frac: f32,
    pub outer_frac: f32,
}

impl Default for FocusParams {
    fn default() -> Self {
        Self {
            inner_frac: 0.2,
            outer_frac: 0.7,
        }
    }
}

impl FocusParams {
    pub fn validate(&self) -> PosterResult<()> {
        for (name, v) in [("inner_frac", self.inner_frac), ("outer_frac", self.outer_frac)] {
            if !v.is_finite() || v < 0.0 {
                return Err(PosterError::validation(format!(
                    "focus {name} must be finite and >= 0"
                )));
            }
        }
        if self.outer_frac <= self.inner_frac {
            return Err(PosterError::validation(
                "focus outer_frac must exceed inner_frac",
            ));
        }
        Ok(())
    }
}

/// Pure radial alpha map: 255 within `inner_frac * width` of the canvas
/// center, 0 beyond `outer_frac * width`, linear falloff in between.
pub fn radial_mask(width: u32, height: u32, params: FocusParams) -> Vec<u8> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let inner = params.inner_frac * width as f32;
    let outer = params.outer_frac * width as f32;
    let span = (outer - inner).max(f32::EPSILON);

    let mut mask = vec![0u8; width as usize * height as usize];
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let a = if dist <= inner {
                1.0
            } else if dist >= outer {
                0.0
            } else {
                1.0 - (dist - inner) / span
            };
            mask[(y * width + x) as usize] = (a * 255.0).round() as u8;
        }
    }
    mask
}

/// Multiply a premultiplied RGBA8 buffer by an alpha map. All four channels
/// scale together, so the result stays premultiplied.
pub fn apply_mask(rgba_premul: &mut [u8], mask: &[u8]) -> PosterResult<()> {
    if rgba_premul.len() != mask.len() * 4 {
        return Err(PosterError::validation(
            "mask length must match rgba buffer pixel count",
        ));
    }
    for (px, &m) in rgba_premul.chunks_exact_mut(4).zip(mask.iter()) {
        if m == 255 {
            continue;
        }
        if m == 0 {
            px.fill(0);
            continue;
        }
        for c in px.iter_mut() {
            *c = ((u16::from(*c) * u16::from(m) + 127) / 255) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_validate() {
        FocusParams::default().validate().unwrap();
    }

    #[test]
    fn inverted_params_are_rejected() {
        let p = FocusParams {
            inner_frac: 0.8,
            outer_frac: 0.2,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn center_is_opaque_and_far_corner_transparent() {
        let (w, h) = (100u32, 100u32);
        let mask = radial_mask(w, h, FocusParams::default());
        let center = mask[(50 * w + 50) as usize];
        assert_eq!(center, 255);
        // Corner distance ~70.7 px, just beyond outer radius 70.
        assert_eq!(mask[0], 0);
    }

    #[test]
    fn falloff_is_linear_between_radii() {
        let (w, h) = (200u32, 200u32);
        let params = FocusParams::default();
        let mask = radial_mask(w, h, params);
        // On the horizontal centerline, halfway between inner (40px) and
        // outer (140px) radii: expect ~50% alpha.
        let x = 100 + 90u32;
        let v = mask[(100 * w + x) as usize];
        assert!((i32::from(v) - 128).abs() <= 4, "got {v}");
    }

    #[test]
    fn apply_mask_scales_all_channels() {
        let mut buf = vec![200u8, 100, 50, 255, 200, 100, 50, 255];
        let mask = vec![255u8, 0];
        apply_mask(&mut buf, &mask).unwrap();
        assert_eq!(&buf[0..4], &[200, 100, 50, 255]);
        assert_eq!(&buf[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn apply_mask_rejects_length_mismatch() {
        let mut buf = vec![0u8; 8];
        assert!(apply_mask(&mut buf, &[255u8; 3]).is_err());
    }
}
