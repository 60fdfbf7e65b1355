use super::*;

fn checker() -> Rc<PixelMap> {
    // 2x1: red, then blue.
    Rc::new(PixelMap::new(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap())
}

#[test]
fn repeat_wraps_both_axes() {
    let p = Pattern::new(checker(), Repetition::Repeat);
    assert_eq!(p.color_at(Point::new(0.5, 0.5)), Rgba8::rgb(255, 0, 0));
    assert_eq!(p.color_at(Point::new(1.5, 0.5)), Rgba8::rgb(0, 0, 255));
    assert_eq!(p.color_at(Point::new(2.5, 7.5)), Rgba8::rgb(255, 0, 0));
    assert_eq!(p.color_at(Point::new(-0.5, -3.5)), Rgba8::rgb(0, 0, 255));
}

#[test]
fn no_repeat_is_transparent_outside_the_image() {
    let p = Pattern::new(checker(), Repetition::NoRepeat);
    assert_eq!(p.color_at(Point::new(1.5, 0.5)), Rgba8::rgb(0, 0, 255));
    assert_eq!(p.color_at(Point::new(2.5, 0.5)), Rgba8::TRANSPARENT);
    assert_eq!(p.color_at(Point::new(0.5, 1.5)), Rgba8::TRANSPARENT);
}

#[test]
fn repeat_x_only_tiles_horizontally() {
    let p = Pattern::new(checker(), Repetition::RepeatX);
    assert_eq!(p.color_at(Point::new(3.5, 0.5)), Rgba8::rgb(0, 0, 255));
    assert_eq!(p.color_at(Point::new(3.5, 1.5)), Rgba8::TRANSPARENT);
}

#[test]
fn transform_maps_user_space_into_pattern_space() {
    let p = Pattern::new(checker(), Repetition::NoRepeat)
        .with_transform(Affine::translate((10.0, 0.0)));
    assert_eq!(p.color_at(Point::new(10.5, 0.5)), Rgba8::rgb(255, 0, 0));
    assert_eq!(p.color_at(Point::new(0.5, 0.5)), Rgba8::TRANSPARENT);
}

#[test]
fn empty_image_paints_nothing() {
    let p = Pattern::new(Rc::new(PixelMap::new(0, 0, Vec::new()).unwrap()), Repetition::Repeat);
    assert_eq!(p.color_at(Point::ZERO), Rgba8::TRANSPARENT);
}
