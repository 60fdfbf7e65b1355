use super::*;

#[test]
fn argb_packing_roundtrips_channel_order() {
    let c = Rgba8::rgba(0x11, 0x22, 0x33, 0x44);
    assert_eq!(c.to_argb_u32(), 0x4411_2233);
    assert_eq!(Rgba8::from_argb_u32(0x4411_2233), c);
}

#[test]
fn premul_matches_rounding() {
    assert_eq!(Rgba8::RED.to_premul_array(), [255, 0, 0, 255]);
    assert_eq!(Rgba8::rgba(255, 128, 0, 128).to_premul_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::rgba(200, 200, 200, 0).to_premul_array(), [0, 0, 0, 0]);
}

#[test]
fn lerp_hits_endpoints_and_midpoint() {
    let a = Rgba8::rgba(0, 0, 0, 0);
    let b = Rgba8::rgba(200, 100, 50, 255);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::rgba(100, 50, 25, 128));
    assert_eq!(a.lerp(b, 7.0), b);
}

#[test]
fn alpha_factor_is_clamped() {
    assert_eq!(Rgba8::RED.with_alpha_factor(0.5).a, 128);
    assert_eq!(Rgba8::RED.with_alpha_factor(-1.0).a, 0);
    assert_eq!(Rgba8::RED.with_alpha_factor(3.0).a, 255);
}

#[test]
fn pixel_map_rejects_wrong_length() {
    assert!(PixelMap::new(2, 2, vec![0; 15]).is_err());
    let map = PixelMap::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(map.pixel(1, 0), Some(Rgba8::rgba(5, 6, 7, 8)));
    assert_eq!(map.pixel(2, 0), None);
    assert_eq!(map.bounds(), Rect::new(0.0, 0.0, 2.0, 1.0));
}

#[test]
fn filled_pixel_map_has_uniform_pixels() {
    let map = PixelMap::filled(3, 2, Rgba8::WHITE).unwrap();
    assert_eq!(map.data().len(), 24);
    assert_eq!(map.pixel(2, 1), Some(Rgba8::WHITE));
}

#[test]
fn style_enums_use_kebab_case_json() {
    let op: CompositeOperation = serde_json::from_str("\"destination-out\"").unwrap();
    assert_eq!(op, CompositeOperation::DestinationOut);
    assert_eq!(
        serde_json::to_string(&Repetition::RepeatX).unwrap(),
        "\"repeat-x\""
    );
}
