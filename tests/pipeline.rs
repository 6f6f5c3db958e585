use posterforge::{
    Adjustments, AspectRatio, Compositor, FontClass, FontLibrary, Rotation, StickerLayer,
    TextLayer, TextStyleTag,
};

fn png_of(img: &image::RgbaImage) -> Vec<u8> {
    posterforge::compose::encode_png(img).unwrap()
}

fn gradient_png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, _| {
        let v = (x * 255 / w.max(1)) as u8;
        image::Rgba([v, v, v, 255])
    });
    png_of(&img)
}

#[test]
fn every_aspect_ratio_crops_to_its_shape() {
    let fonts = FontLibrary::empty();
    let comp = Compositor::new(&fonts);
    let src = gradient_png(1200, 800);

    for (aspect, ratio) in [
        (AspectRatio::Square, 1.0),
        (AspectRatio::Wide, 16.0 / 9.0),
        (AspectRatio::Tall, 9.0 / 16.0),
        (AspectRatio::Classic, 4.0 / 3.0),
        (AspectRatio::Portrait, 3.0 / 4.0),
    ] {
        let adj = Adjustments {
            aspect,
            ..Adjustments::default()
        };
        let out = comp.render_image(&src, &adj).unwrap();
        let (w, h) = out.dimensions();
        let got = f64::from(w) / f64::from(h);
        assert!(
            (got - ratio).abs() < 0.01,
            "{aspect:?}: got {w}x{h} (ratio {got}), want {ratio}"
        );
        assert!(w <= 1200 && h <= 800);
    }
}

#[test]
fn half_turn_mirrors_the_gradient() {
    let fonts = FontLibrary::empty();
    let comp = Compositor::new(&fonts);
    let src = gradient_png(100, 40);

    let adj = Adjustments {
        rotation: Rotation::Deg180,
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();
    assert_eq!(out.dimensions(), (100, 40));
    // The gradient rose left to right; after a half turn the left edge is
    // brighter than the right.
    assert!(out.get_pixel(5, 20).0[0] > out.get_pixel(95, 20).0[0]);
}

#[test]
fn depth_of_field_blurs_edges_but_not_the_center() {
    let fonts = FontLibrary::empty();
    let comp = Compositor::new(&fonts);

    // Vertical stripes: blur smears them, so adjacent-pixel contrast drops.
    let img = image::RgbaImage::from_fn(200, 200, |x, _| {
        if x % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    });
    let src = png_of(&img);

    let adj = Adjustments {
        blur: 8.0,
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();

    let contrast = |x: u32, y: u32| {
        (i32::from(out.get_pixel(x, y).0[0]) - i32::from(out.get_pixel(x + 1, y).0[0])).abs()
    };
    // Inside the focus radius the stripes survive untouched.
    assert_eq!(contrast(100, 100), 255);
    // At the corner the sharp layer is fully faded out.
    assert!(contrast(2, 2) < 60, "corner contrast {}", contrast(2, 2));
}

#[test]
fn contrast_extremes_flatten_or_split_midtones() {
    let fonts = FontLibrary::empty();
    let comp = Compositor::new(&fonts);
    let img = image::RgbaImage::from_fn(10, 10, |x, _| {
        if x < 5 {
            image::Rgba([100, 100, 100, 255])
        } else {
            image::Rgba([160, 160, 160, 255])
        }
    });
    let src = png_of(&img);

    let adj = Adjustments {
        contrast: 0.0,
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();
    // Zero contrast collapses everything to the pivot.
    assert_eq!(out.get_pixel(2, 5).0[0], out.get_pixel(8, 5).0[0]);

    let adj = Adjustments {
        contrast: 200.0,
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();
    let spread =
        i32::from(out.get_pixel(8, 5).0[0]) - i32::from(out.get_pixel(2, 5).0[0]);
    assert!(spread > 60, "contrast push should widen the gap: {spread}");
}

#[test]
fn text_layer_marks_pixels_near_its_anchor() {
    let fonts = FontLibrary::from_system();
    if fonts.font_for(FontClass::Sans).is_err() {
        eprintln!("skipping: no system font available");
        return;
    }
    let comp = Compositor::new(&fonts);
    let img = image::RgbaImage::from_pixel(400, 400, image::Rgba([0, 0, 0, 255]));
    let src = png_of(&img);

    let mut layer = TextLayer::new("HELLO");
    layer.style = TextStyleTag::Bold;
    layer.x = 25.0;
    layer.y = 50.0;
    let adj = Adjustments {
        texts: vec![layer],
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();

    // Bold is yellow: somewhere near the anchor red and green light up.
    let lit = out
        .enumerate_pixels()
        .filter(|&(x, y, p)| {
            (50..350).contains(&x) && (100..260).contains(&y) && p.0[0] > 200 && p.0[1] > 200
        })
        .count();
    assert!(lit > 0, "expected yellow fill pixels near the anchor");
}

#[test]
fn empty_text_layers_render_nothing() {
    let fonts = FontLibrary::empty();
    let comp = Compositor::new(&fonts);
    let src = gradient_png(50, 50);

    // An empty-content layer is skipped before any font lookup, so this
    // renders even with no fonts at all.
    let adj = Adjustments {
        texts: vec![TextLayer::new("")],
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();
    assert_eq!(out.dimensions(), (50, 50));
}

#[test]
fn sticker_layer_marks_pixels_near_its_anchor() {
    let fonts = FontLibrary::from_system();
    if fonts.font_for(FontClass::Sans).is_err() {
        eprintln!("skipping: no system font available");
        return;
    }
    let comp = Compositor::new(&fonts);
    let img = image::RgbaImage::from_pixel(300, 300, image::Rgba([255, 255, 255, 255]));
    let src = png_of(&img);

    let mut layer = StickerLayer::new("X");
    layer.x = 50.0;
    layer.y = 50.0;
    layer.rotation_deg = 45.0;
    let adj = Adjustments {
        stickers: vec![layer],
        ..Adjustments::default()
    };
    let out = comp.render_image(&src, &adj).unwrap();

    let dark = out
        .enumerate_pixels()
        .filter(|&(x, y, p)| (75..225).contains(&x) && (75..225).contains(&y) && p.0[0] < 64)
        .count();
    assert!(dark > 0, "expected dark sticker pixels near the center");
}

#[test]
fn rendered_png_round_trips_through_decode() {
    let fonts = FontLibrary::empty();
    let comp = Compositor::new(&fonts);
    let src = gradient_png(64, 48);
    let adj = Adjustments {
        brightness: 120.0,
        blur: 3.0,
        ..Adjustments::default()
    };

    let png = comp.render(&src, &adj).unwrap();
    let decoded = posterforge::compose::decode(&png).unwrap();
    assert_eq!(decoded.dimensions(), (64, 48));
}
