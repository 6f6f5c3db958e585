use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage, imageops};

use crate::blur;
use crate::color;
use crate::composite;
use crate::error::{PosterError, PosterResult};
use crate::fonts::FontLibrary;
use crate::geometry;
use crate::mask::{self, FocusParams};
use crate::model::{Adjustments, Rotation};
use crate::sticker;
use crate::styles;
use crate::text;

/// Knobs that are not part of the per-poster adjustments.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub focus: FocusParams,
}

/// Renders a source photo plus adjustments into a finished poster. The
/// pipeline is pure with respect to its inputs: the same bytes and the same
/// adjustments always produce the same output.
pub struct Compositor<'a> {
    fonts: &'a FontLibrary,
    options: RenderOptions,
}

impl<'a> Compositor<'a> {
    pub fn new(fonts: &'a FontLibrary) -> Self {
        Self {
            fonts,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(fonts: &'a FontLibrary, options: RenderOptions) -> Self {
        Self { fonts, options }
    }

    /// Full pipeline to encoded PNG bytes.
    pub fn render(&self, image_bytes: &[u8], adjustments: &Adjustments) -> PosterResult<Vec<u8>> {
        let img = self.render_image(image_bytes, adjustments)?;
        encode_png(&img)
    }

    /// Full pipeline to a straight-alpha RGBA image.
    pub fn render_image(
        &self,
        image_bytes: &[u8],
        adjustments: &Adjustments,
    ) -> PosterResult<RgbaImage> {
        adjustments.validate()?;
        self.options.focus.validate()?;

        let decoded = decode(image_bytes)?;
        let base = crop_and_rotate(&decoded, adjustments);
        let (width, height) = base.dimensions();
        tracing::debug!(width, height, "composing poster");

        let mut canvas = base.into_raw();
        if !color::is_neutral(adjustments.brightness, adjustments.contrast) {
            let lut = color::color_lut(adjustments.brightness, adjustments.contrast);
            color::apply_lut(&mut canvas, &lut);
        }
        composite::premultiply_in_place(&mut canvas);

        if adjustments.blur > 0.0 {
            canvas = depth_of_field(canvas, width, height, adjustments.blur, self.options.focus)?;
        }

        for layer in &adjustments.stickers {
            let font = self.fonts.font_for(crate::fonts::FontClass::Sans)?;
            let anchor_x = layer.x / 100.0 * width as f32;
            let anchor_y = layer.y / 100.0 * height as f32;
            sticker::draw_sticker(&mut canvas, width, height, font, layer, anchor_x, anchor_y);
        }

        for layer in &adjustments.texts {
            if layer.content.is_empty() {
                continue;
            }
            let typo = styles::resolve(layer, width);
            let font = self.fonts.font_for(typo.font)?;
            let anchor_x = layer.x / 100.0 * width as f32;
            let anchor_y = layer.y / 100.0 * height as f32;
            text::draw_text(
                &mut canvas, width, height, font, &layer.content, &typo, anchor_x, anchor_y,
            )?;
        }

        composite::unpremultiply_in_place(&mut canvas);
        RgbaImage::from_raw(width, height, canvas)
            .ok_or_else(|| PosterError::validation("composed buffer has wrong length"))
    }
}

/// Decode any supported image format to RGBA8.
pub fn decode(bytes: &[u8]) -> PosterResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PosterError::image_load(format!("decode image: {e}")))?;
    Ok(img.to_rgba8())
}

/// Center-crop to the requested aspect ratio, then rotate. Rotation happens
/// after the crop so the crop window is always expressed in source axes.
fn crop_and_rotate(source: &RgbaImage, adjustments: &Adjustments) -> RgbaImage {
    let (sw, sh) = source.dimensions();
    let rect = geometry::crop_for(sw, sh, adjustments.aspect);
    let cropped =
        imageops::crop_imm(source, rect.x, rect.y, rect.width, rect.height).to_image();
    match adjustments.rotation {
        Rotation::Deg0 => cropped,
        Rotation::Deg90 => imageops::rotate90(&cropped),
        Rotation::Deg180 => imageops::rotate180(&cropped),
        Rotation::Deg270 => imageops::rotate270(&cropped),
    }
}

/// Depth of field: the fully blurred frame underneath, the sharp frame on
/// top faded out radially from the focus center.
fn depth_of_field(
    canvas: Vec<u8>,
    width: u32,
    height: u32,
    blur_radius: f32,
    focus: FocusParams,
) -> PosterResult<Vec<u8>> {
    let radius = blur_radius.round() as u32;
    let mut blurred = blur::blur_rgba8_premul(
        &canvas,
        width,
        height,
        radius,
        blur::sigma_for_radius(radius),
    )?;

    let mut sharp = canvas;
    let alpha = mask::radial_mask(width, height, focus);
    mask::apply_mask(&mut sharp, &alpha)?;
    composite::over_in_place(&mut blurred, &sharp)?;
    Ok(blurred)
}

/// Encode straight-alpha RGBA to PNG.
pub fn encode_png(img: &RgbaImage) -> PosterResult<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| PosterError::validation(format!("encode png: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AspectRatio;

    fn solid_png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, image::Rgba(px));
        encode_png(&img).unwrap()
    }

    fn fonts() -> FontLibrary {
        FontLibrary::empty()
    }

    #[test]
    fn garbage_bytes_are_an_image_load_error() {
        let lib = fonts();
        let comp = Compositor::new(&lib);
        let err = comp
            .render(b"not an image", &Adjustments::default())
            .unwrap_err();
        assert!(matches!(err, PosterError::ImageLoad(_)));
    }

    #[test]
    fn neutral_adjustments_preserve_pixels() {
        let lib = fonts();
        let comp = Compositor::new(&lib);
        let bytes = solid_png(20, 10, [40, 80, 120, 255]);
        let out = comp.render_image(&bytes, &Adjustments::default()).unwrap();
        assert_eq!(out.dimensions(), (20, 10));
        assert_eq!(out.get_pixel(5, 5).0, [40, 80, 120, 255]);
    }

    #[test]
    fn square_crop_and_quarter_turn_swap_dimensions() {
        let lib = fonts();
        let comp = Compositor::new(&lib);
        let bytes = solid_png(40, 30, [1, 2, 3, 255]);
        let adj = Adjustments {
            aspect: AspectRatio::Square,
            rotation: Rotation::Deg90,
            ..Adjustments::default()
        };
        let out = comp.render_image(&bytes, &adj).unwrap();
        // 40x30 square-cropped to 30x30; a quarter turn keeps it 30x30.
        assert_eq!(out.dimensions(), (30, 30));

        let adj = Adjustments {
            aspect: AspectRatio::Wide,
            rotation: Rotation::Deg90,
            ..Adjustments::default()
        };
        let out = comp.render_image(&bytes, &adj).unwrap();
        // 40x30 wide-cropped to 40x23 (30 * 16/9 exceeds 40), then rotated.
        let (w, h) = out.dimensions();
        assert!(h > w, "rotation must swap the long axis: {w}x{h}");
    }

    #[test]
    fn blur_keeps_focus_center_sharp() {
        let lib = fonts();
        let comp = Compositor::new(&lib);
        // White center pixel pattern on black: after depth of field the
        // center must stay white while the far edge picks up blur.
        let mut img = RgbaImage::from_pixel(100, 100, image::Rgba([0, 0, 0, 255]));
        for y in 40..60 {
            for x in 40..60 {
                img.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
            }
        }
        let bytes = encode_png(&img).unwrap();
        let adj = Adjustments {
            blur: 10.0,
            ..Adjustments::default()
        };
        let out = comp.render_image(&bytes, &adj).unwrap();
        assert_eq!(out.get_pixel(50, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn same_inputs_render_identically() {
        let lib = fonts();
        let comp = Compositor::new(&lib);
        let bytes = solid_png(32, 32, [9, 9, 9, 255]);
        let adj = Adjustments {
            brightness: 120.0,
            contrast: 90.0,
            blur: 4.0,
            ..Adjustments::default()
        };
        let a = comp.render(&bytes, &adj).unwrap();
        let b = comp.render(&bytes, &adj).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn brightness_lifts_midtones() {
        let lib = fonts();
        let comp = Compositor::new(&lib);
        let bytes = solid_png(8, 8, [100, 100, 100, 255]);
        let adj = Adjustments {
            brightness: 150.0,
            ..Adjustments::default()
        };
        let out = comp.render_image(&bytes, &adj).unwrap();
        assert_eq!(out.get_pixel(4, 4).0, [150, 150, 150, 255]);
    }
}
