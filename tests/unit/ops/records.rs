use super::*;
use crate::ops::codec::Payload;
use crate::paint::Gradient;
use crate::render::trace::{CallRecorder, RenderCall};
use crate::resources::ResourceRegistry;

fn run<R: Record>(op: &R, resources: &ResourceRegistry, pool: &OwnedPool) -> Vec<RenderCall> {
    let mut rec = CallRecorder::new();
    let mut cx = ApplyContext::new(&mut rec, resources, pool);
    op.apply(&mut cx).unwrap();
    rec.take()
}

#[test]
fn arc_forwards_every_parameter() {
    let params = ArcParams {
        center: Point::new(5.0, 6.0),
        radius: 3.0,
        start_angle: 0.5,
        end_angle: 2.0,
        anticlockwise: true,
    };
    let calls = run(&ArcOp::from(params), &ResourceRegistry::new(), &OwnedPool::new());
    assert_eq!(calls, vec![RenderCall::Arc(params)]);
}

#[test]
fn line_dash_rejects_negative_and_non_finite() {
    assert!(SetLineDashOp::new(&[1.0, -2.0]).is_none());
    assert!(SetLineDashOp::new(&[f64::INFINITY]).is_none());
    assert!(SetLineDashOp::new(&[f64::NAN, 1.0]).is_none());
    assert_eq!(SetLineDashOp::new(&[]).unwrap().segments.len(), 0);
}

#[test]
fn odd_line_dash_is_repeated() {
    let op = SetLineDashOp::new(&[5.0, 15.0, 25.0]).unwrap();
    assert_eq!(op.segments.as_slice(), &[5.0, 15.0, 25.0, 5.0, 15.0, 25.0]);
    let calls = run(&op, &ResourceRegistry::new(), &OwnedPool::new());
    assert_eq!(
        calls,
        vec![RenderCall::SetLineDash(vec![5.0, 15.0, 25.0, 5.0, 15.0, 25.0])]
    );
}

#[test]
fn line_dash_payload_is_count_then_values() {
    let op = SetLineDashOp::new(&[1.0, 2.0]).unwrap();
    assert_eq!(op.payload_len(), 4 + 16);
    let mut buf = vec![0u8; op.payload_len()];
    op.encode(&mut PayloadWriter::new(&mut buf));
    assert_eq!(&buf[..4], &2u32.to_le_bytes());
    assert_eq!(
        SetLineDashOp::decode(&mut PayloadReader::new(&buf)).unwrap(),
        op
    );
}

#[test]
fn missing_gradient_makes_the_op_a_noop() {
    let mut resources = ResourceRegistry::new();
    let key = resources.insert_gradient(Gradient::linear(Point::ZERO, Point::new(1.0, 0.0)));
    resources.remove(key);
    let calls = run(
        &SetFillGradientOp { gradient: key },
        &resources,
        &OwnedPool::new(),
    );
    assert!(calls.is_empty());
}

#[test]
fn live_gradient_is_passed_by_reference() {
    let mut resources = ResourceRegistry::new();
    let mut g = Gradient::linear(Point::ZERO, Point::new(10.0, 0.0));
    g.add_color_stop(0.0, Rgba8::RED).unwrap();
    let key = resources.insert_gradient(g.clone());
    let calls = run(
        &SetStrokeGradientOp { gradient: key },
        &resources,
        &OwnedPool::new(),
    );
    assert_eq!(calls, vec![RenderCall::SetStrokeGradient(g)]);
}

#[test]
fn missing_image_skips_draw_image() {
    let calls = run(
        &DrawImageOp {
            image: ResourceKey::default(),
            src: None,
            dst: Rect::new(0.0, 0.0, 1.0, 1.0),
        },
        &ResourceRegistry::new(),
        &OwnedPool::new(),
    );
    assert!(calls.is_empty());
}

#[test]
fn fill_text_reads_its_string_from_the_pool() {
    let mut pool = OwnedPool::new();
    let text = pool.insert(String::from("hello")).unwrap();
    let op = FillTextOp {
        text,
        at: Point::new(1.0, 2.0),
        max_width: Some(40.0),
    };
    let calls = run(&op, &ResourceRegistry::new(), &pool);
    assert_eq!(
        calls,
        vec![RenderCall::FillText {
            text: String::from("hello"),
            at: Point::new(1.0, 2.0),
            max_width: Some(40.0),
        }]
    );
}

#[test]
fn font_families_come_from_the_pool() {
    let mut pool = OwnedPool::new();
    let families = pool
        .insert(vec![String::from("Inter"), String::from("sans-serif")])
        .unwrap();
    let op = SetFontOp {
        families,
        size: 14.0,
        weight: 700,
        style: FontStyle::Italic,
    };
    let calls = run(&op, &ResourceRegistry::new(), &pool);
    assert_eq!(
        calls,
        vec![RenderCall::SetFont {
            families: vec![String::from("Inter"), String::from("sans-serif")],
            size: 14.0,
            weight: 700,
            style: FontStyle::Italic,
        }]
    );
}

#[test]
fn released_slot_fails_playback_as_corruption() {
    let mut pool = OwnedPool::new();
    let filter = pool.insert(String::from("blur(2px)")).unwrap();
    let op = SetFilterOp { filter };
    op.release(&mut pool).unwrap();
    assert_eq!(pool.live(), 0);

    let mut rec = CallRecorder::new();
    let resources = ResourceRegistry::new();
    let mut cx = ApplyContext::new(&mut rec, &resources, &pool);
    assert!(op.apply(&mut cx).unwrap_err().is_corruption());
    assert!(rec.is_empty());
}

#[test]
fn put_image_data_release_drops_the_pixels() {
    let pixels = Rc::new(PixelMap::filled(2, 2, Rgba8::WHITE).unwrap());
    let mut pool = OwnedPool::new();
    let op = PutImageDataOp {
        image: pool.insert(Rc::clone(&pixels)).unwrap(),
        at: Point::new(3.0, 4.0),
    };
    let calls = run(&op, &ResourceRegistry::new(), &pool);
    assert_eq!(
        calls,
        vec![RenderCall::PutImageData {
            width: 2,
            height: 2,
            at: Point::new(3.0, 4.0),
        }]
    );
    assert_eq!(Rc::strong_count(&pixels), 2);
    op.release(&mut pool).unwrap();
    assert_eq!(Rc::strong_count(&pixels), 1);
}
