use super::*;

fn canvas(w: u32, h: u32) -> CpuCanvas {
    CpuCanvas::new(CpuCanvasOpts::new(w, h)).unwrap()
}

fn assert_px(frame: &FrameRGBA, x: u32, y: u32, want: [u8; 4]) {
    let got = frame.pixel(x, y).unwrap();
    for i in 0..4 {
        assert!(
            got[i].abs_diff(want[i]) <= 2,
            "pixel ({x},{y}) = {got:?}, want {want:?}"
        );
    }
}

#[test]
fn oversized_canvas_is_rejected() {
    let err = CpuCanvas::new(CpuCanvasOpts::new(70_000, 4)).unwrap_err();
    assert!(err.to_string().contains("u16"));
}

#[test]
fn clear_color_fills_the_initial_frame() {
    let mut c = CpuCanvas::new(CpuCanvasOpts::new(4, 4).with_clear_rgba([0, 0, 255, 255])).unwrap();
    let frame = c.finish();
    assert!(frame.premultiplied);
    assert_px(&frame, 0, 0, [0, 0, 255, 255]);
    assert_px(&frame, 3, 3, [0, 0, 255, 255]);
}

#[test]
fn fill_rect_paints_interior_only() {
    let mut c = canvas(16, 16);
    c.set_fill_color(Rgba8::RED);
    c.fill_rect(Rect::new(4.0, 4.0, 12.0, 12.0));
    let frame = c.finish();
    assert_px(&frame, 8, 8, [255, 0, 0, 255]);
    assert_px(&frame, 1, 1, [0, 0, 0, 0]);
    assert_px(&frame, 14, 8, [0, 0, 0, 0]);
}

#[test]
fn transform_moves_geometry() {
    let mut c = canvas(16, 16);
    c.translate(8.0, 0.0);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    let frame = c.finish();
    assert_px(&frame, 10, 2, [0, 0, 0, 255]);
    assert_px(&frame, 2, 2, [0, 0, 0, 0]);
}

#[test]
fn restore_brings_back_fill_color() {
    let mut c = canvas(16, 8);
    c.set_fill_color(Rgba8::RED);
    c.save();
    c.set_fill_color(Rgba8::rgb(0, 255, 0));
    c.restore();
    c.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    let frame = c.finish();
    assert_px(&frame, 4, 4, [255, 0, 0, 255]);
}

#[test]
fn unmatched_restore_is_ignored() {
    let mut c = canvas(4, 4);
    c.restore();
    assert_eq!(c.save_depth(), 0);
    c.save();
    assert_eq!(c.save_depth(), 1);
    c.restore();
    assert_eq!(c.save_depth(), 0);
}

#[test]
fn clear_rect_erases_settled_pixels() {
    let mut c = CpuCanvas::new(CpuCanvasOpts::new(8, 8).with_clear_rgba([255, 255, 255, 255])).unwrap();
    c.clear_rect(Rect::new(0.0, 0.0, 4.0, 8.0));
    let frame = c.finish();
    assert_px(&frame, 1, 4, [0, 0, 0, 0]);
    assert_px(&frame, 6, 4, [255, 255, 255, 255]);
}

#[test]
fn clip_limits_later_fills() {
    let mut c = canvas(16, 16);
    c.save();
    c.begin_path();
    c.rect(Rect::new(0.0, 0.0, 8.0, 16.0));
    c.clip(FillRule::NonZero);
    c.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0));
    c.restore();
    let frame = c.finish();
    assert_px(&frame, 4, 8, [0, 0, 0, 255]);
    assert_px(&frame, 12, 8, [0, 0, 0, 0]);
}

#[test]
fn clip_survives_a_pixel_write() {
    let mut c = canvas(16, 16);
    c.begin_path();
    c.rect(Rect::new(0.0, 0.0, 8.0, 16.0));
    c.clip(FillRule::NonZero);
    c.clear_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    c.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0));
    let frame = c.finish();
    assert_px(&frame, 4, 8, [0, 0, 0, 255]);
    assert_px(&frame, 12, 8, [0, 0, 0, 0]);
}

#[test]
fn put_image_data_replaces_pixels_without_blending() {
    let mut c = CpuCanvas::new(CpuCanvasOpts::new(4, 4).with_clear_rgba([255, 255, 255, 255])).unwrap();
    let img = PixelMap::filled(2, 2, Rgba8::rgba(0, 0, 0, 0)).unwrap();
    c.put_image_data(&img, Point::new(1.0, 1.0));
    let frame = c.finish();
    assert_px(&frame, 1, 1, [0, 0, 0, 0]);
    assert_px(&frame, 2, 2, [0, 0, 0, 0]);
    assert_px(&frame, 0, 0, [255, 255, 255, 255]);
    assert_px(&frame, 3, 3, [255, 255, 255, 255]);
}

#[test]
fn put_image_data_clips_to_the_frame() {
    let mut c = canvas(4, 4);
    let img = PixelMap::filled(3, 3, Rgba8::RED).unwrap();
    c.put_image_data(&img, Point::new(2.0, -1.0));
    let frame = c.finish();
    assert_px(&frame, 3, 0, [255, 0, 0, 255]);
    assert_px(&frame, 3, 1, [255, 0, 0, 255]);
    assert_px(&frame, 1, 1, [0, 0, 0, 0]);
}

#[test]
fn put_image_data_at_non_finite_or_huge_positions_clips() {
    let mut c = canvas(4, 4);
    let img = PixelMap::filled(2, 1, Rgba8::WHITE).unwrap();
    c.put_image_data(&img, Point::new(f64::INFINITY, 0.0));
    c.put_image_data(&img, Point::new(0.0, f64::NEG_INFINITY));
    c.put_image_data(&img, Point::new(f64::NAN, 1e300));
    c.put_image_data(&img, Point::new(-1e300, 2.0));
    let frame = c.finish();
    for y in 0..4 {
        for x in 0..4 {
            assert_px(&frame, x, y, [0, 0, 0, 0]);
        }
    }
}

#[test]
fn save_layer_composites_with_the_operator_current_at_save() {
    let mut c = CpuCanvas::new(CpuCanvasOpts::new(8, 4).with_clear_rgba([255, 0, 0, 255])).unwrap();
    c.set_composite_operation(CompositeOperation::DestinationOut);
    c.save_layer();
    c.set_composite_operation(CompositeOperation::SourceOver);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    c.restore_layer();
    assert_eq!(c.save_depth(), 0);
    let frame = c.finish();
    assert_px(&frame, 1, 2, [0, 0, 0, 0]);
    assert_px(&frame, 6, 2, [255, 0, 0, 255]);
}

#[test]
fn restore_layer_only_closes_layers() {
    let mut c = canvas(4, 4);
    c.save();
    c.restore_layer();
    assert_eq!(c.save_depth(), 1);
    c.save_layer();
    c.restore();
    assert_eq!(c.save_depth(), 1);
    c.restore();
    assert_eq!(c.save_depth(), 0);
}

#[test]
fn reset_restores_defaults_and_drops_saved_states() {
    let mut c = canvas(8, 8);
    c.set_fill_color(Rgba8::RED);
    c.translate(4.0, 0.0);
    c.save();
    c.begin_path();
    c.rect(Rect::new(0.0, 0.0, 2.0, 2.0));
    c.clip(FillRule::NonZero);
    c.save_layer();
    c.begin_path();
    c.rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    c.reset();
    assert_eq!(c.save_depth(), 0);

    c.fill(FillRule::NonZero);
    let frame = c.finish();
    assert_px(&frame, 6, 6, [0, 0, 0, 0]);

    c.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    let frame = c.finish();
    assert_px(&frame, 1, 1, [0, 0, 0, 255]);
    assert_px(&frame, 6, 6, [0, 0, 0, 255]);
}

#[test]
fn stroke_covers_the_outline_not_the_interior() {
    let mut c = canvas(32, 32);
    c.set_line_width(4.0);
    c.stroke_rect(Rect::new(8.0, 8.0, 24.0, 24.0));
    let frame = c.finish();
    assert_px(&frame, 8, 16, [0, 0, 0, 255]);
    assert_px(&frame, 16, 16, [0, 0, 0, 0]);
}

#[test]
fn invalid_line_width_is_ignored() {
    let mut c = canvas(32, 32);
    c.set_line_width(6.0);
    c.set_line_width(-1.0);
    c.set_line_width(f64::NAN);
    c.stroke_rect(Rect::new(8.0, 8.0, 24.0, 24.0));
    let frame = c.finish();
    assert_px(&frame, 10, 16, [0, 0, 0, 255]);
}

#[test]
fn global_alpha_scales_coverage() {
    let mut c = canvas(8, 8);
    c.set_global_alpha(0.5);
    c.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    let frame = c.finish();
    let a = frame.pixel(4, 4).unwrap()[3];
    assert!((120..=135).contains(&a), "alpha {a}");
}

#[test]
fn path_fill_uses_builder_geometry() {
    let mut c = canvas(16, 16);
    c.set_fill_color(Rgba8::RED);
    c.begin_path();
    c.move_to(Point::new(0.0, 0.0));
    c.line_to(Point::new(16.0, 0.0));
    c.line_to(Point::new(16.0, 8.0));
    c.line_to(Point::new(0.0, 8.0));
    c.close_path();
    c.fill(FillRule::NonZero);
    let frame = c.finish();
    assert_px(&frame, 8, 4, [255, 0, 0, 255]);
    assert_px(&frame, 8, 12, [0, 0, 0, 0]);
}

#[test]
fn linear_gradient_varies_across_the_fill() {
    let mut g = Gradient::linear(Point::new(0.0, 0.0), Point::new(32.0, 0.0));
    g.add_color_stop(0.0, Rgba8::rgb(0, 0, 0)).unwrap();
    g.add_color_stop(1.0, Rgba8::rgb(255, 255, 255)).unwrap();
    let mut c = canvas(32, 4);
    c.set_fill_gradient(&g);
    c.fill_rect(Rect::new(0.0, 0.0, 32.0, 4.0));
    let frame = c.finish();
    let left = frame.pixel(1, 2).unwrap();
    let right = frame.pixel(30, 2).unwrap();
    assert!(left[0] < 40, "{left:?}");
    assert!(right[0] > 215, "{right:?}");
    assert_eq!(left[3], 255);
}

#[test]
fn draw_image_scales_into_destination() {
    let img = PixelMap::filled(2, 2, Rgba8::RED).unwrap();
    let mut c = canvas(16, 16);
    c.draw_image(&img, None, Rect::new(0.0, 0.0, 8.0, 8.0));
    let frame = c.finish();
    assert_px(&frame, 4, 4, [255, 0, 0, 255]);
    assert_px(&frame, 12, 12, [0, 0, 0, 0]);
}

#[test]
fn finish_can_be_called_between_draws() {
    let mut c = canvas(8, 8);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 8.0));
    let first = c.finish();
    c.fill_rect(Rect::new(4.0, 0.0, 8.0, 8.0));
    let second = c.finish();
    assert_px(&first, 6, 4, [0, 0, 0, 0]);
    assert_px(&second, 2, 4, [0, 0, 0, 255]);
    assert_px(&second, 6, 4, [0, 0, 0, 255]);
}

#[test]
fn text_is_accepted_and_draws_nothing() {
    let mut c = canvas(8, 8);
    let families = vec![String::from("serif")];
    c.set_font(&FontSpec {
        families: &families,
        size: 12.0,
        weight: 400,
        style: crate::foundation::core::FontStyle::Normal,
    });
    c.fill_text("hi", Point::new(1.0, 6.0), None);
    let frame = c.finish();
    assert!(frame.data.iter().all(|&b| b == 0));
}
