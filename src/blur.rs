use crate::error::{PosterError, PosterResult};

/// Default sigma for a given blur radius when the caller has no opinion.
pub fn sigma_for_radius(radius: u32) -> f32 {
    (radius as f32 / 2.0).max(0.5)
}

/// Separable Gaussian blur over a premultiplied RGBA8 buffer. Radius 0 is the
/// identity. Edges clamp to the nearest pixel.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> PosterResult<Vec<u8>> {
    blur_channels::<4>(src, width, height, radius, sigma)
}

/// Same blur over a single-channel alpha/coverage mask. Used for text glow
/// and soft-shadow passes.
pub fn blur_alpha8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> PosterResult<Vec<u8>> {
    blur_channels::<1>(src, width, height, radius, sigma)
}

fn blur_channels<const N: usize>(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> PosterResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(N))
        .ok_or_else(|| PosterError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(PosterError::validation(
            "blur expects src matching width*height*channels",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass::<N>(src, &mut tmp, width, height, &kernel);
    vertical_pass::<N>(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Q16 fixed-point Gaussian kernel whose weights sum exactly to 1<<16, so a
/// constant image blurs to itself.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PosterResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PosterError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(PosterError::validation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536i64 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        weights[mid] = (mid_val + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass<const N: usize>(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; N];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * N;
                for c in 0..N {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * N;
            for c in 0..N {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass<const N: usize>(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; N];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * N;
                for c in 0..N {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * N;
            for c in 0..N {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_radius_0_is_identity() {
        let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_constant_image_is_identity() {
        let (w, h) = (4u32, 3u32);
        let px = [10u8, 20u8, 30u8, 40u8];
        let src = px.repeat((w * h) as usize);
        let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_spreads_energy_from_single_pixel() {
        let (w, h) = (5u32, 5u32);
        let mut src = vec![0u8; (w * h * 4) as usize];
        let center = ((2 * w + 2) * 4) as usize;
        src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

        let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

        let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);

        let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
        assert!((sum_a as i32 - 255).abs() <= 4);
    }

    #[test]
    fn alpha8_blur_matches_length_and_spreads() {
        let (w, h) = (7u32, 1u32);
        let mut src = vec![0u8; (w * h) as usize];
        src[3] = 255;
        let out = blur_alpha8(&src, w, h, 2, 1.0).unwrap();
        assert_eq!(out.len(), src.len());
        assert!(out[2] > 0 && out[4] > 0);
        assert!(out[3] < 255);
    }

    #[test]
    fn bad_sigma_is_rejected() {
        let src = vec![0u8; 4];
        assert!(blur_rgba8_premul(&src, 1, 1, 1, 0.0).is_err());
        assert!(blur_rgba8_premul(&src, 1, 1, 1, f32::NAN).is_err());
    }
}
