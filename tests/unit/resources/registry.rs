use super::*;

use crate::foundation::core::{Point, Repetition, Rgba8};

fn image() -> Rc<PixelMap> {
    Rc::new(PixelMap::filled(2, 2, Rgba8::WHITE).unwrap())
}

#[test]
fn typed_lookup_checks_the_variant() {
    let mut reg = ResourceRegistry::new();
    let g = reg.insert_gradient(Gradient::linear(Point::ZERO, Point::new(1.0, 0.0)));
    let i = reg.insert_image(image());
    assert!(reg.gradient(g).is_some());
    assert!(reg.image(g).is_none());
    assert!(reg.image(i).is_some());
    assert!(reg.pattern(i).is_none());
    assert_eq!(reg.len(), 2);
}

#[test]
fn removed_keys_stop_resolving() {
    let mut reg = ResourceRegistry::new();
    let p = reg.insert_pattern(Pattern::new(image(), Repetition::Repeat));
    assert!(reg.contains(p));
    assert!(matches!(reg.remove(p), Some(Resource::Pattern(_))));
    assert!(!reg.contains(p));
    assert!(reg.pattern(p).is_none());

    // A new resource in the same slot does not revive the stale key.
    let q = reg.insert_pattern(Pattern::new(image(), Repetition::NoRepeat));
    assert_ne!(p, q);
    assert!(reg.pattern(p).is_none());
}

#[test]
fn gradient_mut_adds_stops_in_place() {
    let mut reg = ResourceRegistry::new();
    let g = reg.insert_gradient(Gradient::linear(Point::ZERO, Point::new(1.0, 0.0)));
    reg.gradient_mut(g).unwrap().add_color_stop(0.5, Rgba8::RED).unwrap();
    assert_eq!(reg.gradient(g).unwrap().stops().len(), 1);
}

#[test]
fn clear_drops_shared_images() {
    let img = image();
    let mut reg = ResourceRegistry::new();
    reg.insert_image(Rc::clone(&img));
    assert_eq!(Rc::strong_count(&img), 2);
    reg.clear();
    assert!(reg.is_empty());
    assert_eq!(Rc::strong_count(&img), 1);
}
