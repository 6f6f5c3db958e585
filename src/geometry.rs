use crate::model::{AspectRatio, Rotation};

/// Center-crop rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered rectangle of the target ratio that fits inside the
/// source. `Original` is the identity crop.
pub fn crop_for(source_w: u32, source_h: u32, aspect: AspectRatio) -> CropRect {
    let full = CropRect {
        x: 0,
        y: 0,
        width: source_w,
        height: source_h,
    };
    let Some(target) = aspect.ratio() else {
        return full;
    };
    if source_w == 0 || source_h == 0 {
        return full;
    }

    let source_ratio = f64::from(source_w) / f64::from(source_h);
    if source_ratio > target {
        // Source is wider than the target: full height, centered horizontally.
        let crop_w = (f64::from(source_h) * target).round() as u32;
        let crop_w = crop_w.min(source_w);
        CropRect {
            x: (source_w - crop_w) / 2,
            y: 0,
            width: crop_w,
            height: source_h,
        }
    } else {
        // Full width, centered vertically.
        let crop_h = (f64::from(source_w) / target).round() as u32;
        let crop_h = crop_h.min(source_h);
        CropRect {
            x: 0,
            y: (source_h - crop_h) / 2,
            width: source_w,
            height: crop_h,
        }
    }
}

/// Output canvas dimensions for a cropped image under a quarter-turn
/// rotation: axes swap at 90 and 270 degrees.
pub fn canvas_size_for(crop_w: u32, crop_h: u32, rotation: Rotation) -> (u32, u32) {
    if rotation.swaps_axes() {
        (crop_h, crop_w)
    } else {
        (crop_w, crop_h)
    }
}
