use std::rc::Rc;

use super::*;
use crate::foundation::core::{PixelMap, Point, Rect, Rgba8};
use crate::ops::header::MAX_SKIP;
use crate::ops::records::{
    FillRectOp, FillTextOp, PutImageDataOp, RestoreOp, SaveOp, SetFillColorOp, SetLineDashOp,
};
use crate::render::trace::{CallRecorder, RenderCall};

fn rect(n: f64) -> Rect {
    Rect::new(n, n, n + 1.0, n + 1.0)
}

#[test]
fn new_buffer_is_idle_and_unallocated() {
    let buf = OpBuffer::new();
    assert!(buf.is_empty());
    assert_eq!(buf.state(), BufferState::Idle);
    assert_eq!(buf.capacity(), 0);
    assert_eq!(buf.len(), 0);
    assert!(!buf.has_text());
}

#[test]
fn records_are_aligned_and_chained() {
    let mut buf = OpBuffer::new();
    buf.push(SaveOp {}).unwrap();
    buf.push(FillRectOp { rect: rect(1.0) }).unwrap();
    buf.push(RestoreOp {}).unwrap();
    assert_eq!(buf.state(), BufferState::Recorded);

    let recs: Vec<_> = buf.records().map(|r| r.unwrap()).collect();
    let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, [OpKind::Save, OpKind::FillRect, OpKind::Restore]);

    let mut expected_offset = 0;
    for r in &recs {
        assert_eq!(r.offset, expected_offset);
        assert_eq!(r.skip % RECORD_ALIGN, 0);
        expected_offset += r.skip;
    }
    assert_eq!(expected_offset, buf.used_size());
    assert_eq!(recs[1].skip, align_up(HEADER_SIZE + 32, RECORD_ALIGN).unwrap());
}

#[test]
fn trailing_region_is_zeroed_and_writable() {
    let mut buf = OpBuffer::new();
    buf.push(FillRectOp { rect: rect(0.0) }).unwrap();
    buf.reset();
    let tail = buf.push_with_trailing(SaveOp {}, 10).unwrap();
    assert_eq!(tail.len(), 10);
    assert!(tail.iter().all(|&b| b == 0));
    tail[0] = 0xAB;

    let rec = buf.records().next().unwrap().unwrap();
    assert_eq!(rec.skip, align_up(HEADER_SIZE + 10, RECORD_ALIGN).unwrap());
    assert_eq!(rec.payload[0], 0xAB);
}

#[test]
fn oversized_record_is_rejected_and_payloads_released() {
    let mut buf = OpBuffer::new();
    let text = buf.store(String::from("big")).unwrap();
    let err = buf
        .push_with_trailing(
            FillTextOp {
                text,
                at: Point::ZERO,
                max_width: None,
            },
            MAX_SKIP,
        )
        .unwrap_err();
    assert!(matches!(err, CanvasError::RecordTooLarge { kind: "FillText", .. }));
    assert!(buf.is_empty());
    assert_eq!(buf.live_payloads(), 0);
    assert!(!buf.has_text());
}

#[test]
fn apply_replays_in_push_order() {
    let mut buf = OpBuffer::new();
    buf.push(SaveOp {}).unwrap();
    buf.push(SetFillColorOp { color: Rgba8::RED }).unwrap();
    buf.push(SetLineDashOp::new(&[2.0]).unwrap()).unwrap();
    buf.push(FillRectOp { rect: rect(2.0) }).unwrap();
    buf.push(RestoreOp {}).unwrap();

    let mut rec = CallRecorder::new();
    buf.apply(&mut rec, &ResourceRegistry::new()).unwrap();
    assert_eq!(
        rec.take(),
        vec![
            RenderCall::Save,
            RenderCall::SetFillColor(Rgba8::RED),
            RenderCall::SetLineDash(vec![2.0, 2.0]),
            RenderCall::FillRect(rect(2.0)),
            RenderCall::Restore,
        ]
    );
    // Playback leaves the buffer intact.
    assert_eq!(buf.len(), 5);
}

#[test]
fn text_flag_tracks_text_records_until_reset() {
    let mut buf = OpBuffer::new();
    buf.push(FillRectOp { rect: rect(0.0) }).unwrap();
    assert!(!buf.has_text());
    let text = buf.store(String::from("a")).unwrap();
    buf.push(FillTextOp {
        text,
        at: Point::ZERO,
        max_width: None,
    })
    .unwrap();
    assert!(buf.has_text());
    buf.reset();
    assert!(!buf.has_text());
}

#[test]
fn reset_releases_payloads_and_keeps_capacity() {
    let pixels = Rc::new(PixelMap::filled(1, 1, Rgba8::WHITE).unwrap());
    let mut buf = OpBuffer::new();
    for _ in 0..3 {
        let image = buf.store(Rc::clone(&pixels)).unwrap();
        buf.push(PutImageDataOp {
            image,
            at: Point::ZERO,
        })
        .unwrap();
    }
    assert_eq!(Rc::strong_count(&pixels), 4);
    let capacity = buf.capacity();

    buf.reset();
    assert_eq!(Rc::strong_count(&pixels), 1);
    assert_eq!(buf.live_payloads(), 0);
    assert_eq!(buf.used_size(), 0);
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.state(), BufferState::Idle);
    assert_eq!(buf.capacity(), capacity);
}

#[test]
fn drop_releases_payloads() {
    let pixels = Rc::new(PixelMap::filled(1, 1, Rgba8::WHITE).unwrap());
    {
        let mut buf = OpBuffer::new();
        let image = buf.store(Rc::clone(&pixels)).unwrap();
        buf.push(PutImageDataOp {
            image,
            at: Point::ZERO,
        })
        .unwrap();
        assert_eq!(Rc::strong_count(&pixels), 2);
    }
    assert_eq!(Rc::strong_count(&pixels), 1);
}

#[test]
fn unknown_tag_aborts_the_walk() {
    let mut buf = OpBuffer::new();
    buf.push(SaveOp {}).unwrap();
    buf.push(RestoreOp {}).unwrap();
    let second = RECORD_ALIGN;
    buf.arena.data_mut()[second] = 0xEE;

    let mut it = buf.records();
    assert!(it.next().unwrap().is_ok());
    match it.next().unwrap().unwrap_err() {
        CanvasError::Corrupt { offset, reason } => {
            assert_eq!(offset, second);
            assert!(reason.contains("unknown op kind tag"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(it.next().is_none());

    let mut rec = CallRecorder::new();
    assert!(buf.apply(&mut rec, &ResourceRegistry::new()).is_err());
    assert_eq!(rec.calls(), &[RenderCall::Save]);
}

#[test]
fn skip_past_the_end_is_corruption() {
    let mut buf = OpBuffer::new();
    buf.push(SaveOp {}).unwrap();
    let bogus = OpHeader::new(OpKind::Save, RECORD_ALIGN * 4).unwrap();
    buf.arena.data_mut()[..HEADER_SIZE].copy_from_slice(&bogus.to_le_bytes());
    let err = buf.walk(|_| Ok(())).unwrap_err();
    assert!(err.to_string().contains("past used length"), "{err}");
}

#[test]
fn zero_skip_is_corruption() {
    let mut buf = OpBuffer::new();
    buf.push(SaveOp {}).unwrap();
    buf.arena.data_mut()[..HEADER_SIZE].copy_from_slice(&OpHeader::from_bits(0).to_le_bytes());
    let err = buf.records().next().unwrap().unwrap_err();
    assert!(err.to_string().contains("invalid skip 0"), "{err}");
}

#[test]
fn payload_corruption_reports_absolute_offset() {
    let mut buf = OpBuffer::new();
    buf.push(SaveOp {}).unwrap();
    let text = buf.store(String::from("x")).unwrap();
    buf.push(FillTextOp {
        text,
        at: Point::ZERO,
        max_width: None,
    })
    .unwrap();
    // Option presence byte of `max_width`: header, slot index, point.
    let record = RECORD_ALIGN;
    let flag = record + HEADER_SIZE + 4 + 16;
    buf.arena.data_mut()[flag] = 9;

    let mut rec = CallRecorder::new();
    match buf.apply(&mut rec, &ResourceRegistry::new()).unwrap_err() {
        CanvasError::Corrupt { offset, .. } => assert_eq!(offset, flag),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fingerprint_matches_for_identical_content() {
    let mut a = OpBuffer::new();
    let mut b = OpBuffer::new();
    for buf in [&mut a, &mut b] {
        buf.push(SetFillColorOp { color: Rgba8::RED }).unwrap();
        buf.push(FillRectOp { rect: rect(4.0) }).unwrap();
    }
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.push(SaveOp {}).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = OpBufferConfig::default().with_page_size(3);
    assert!(OpBuffer::with_config(&cfg).is_err());
}
