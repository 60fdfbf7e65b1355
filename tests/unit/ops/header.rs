use super::*;

#[test]
fn header_is_exactly_four_bytes() {
    assert_eq!(std::mem::size_of::<OpHeader>(), 4);
    assert_eq!(HEADER_SIZE, 4);
    assert_eq!(MAX_SKIP, 0x00FF_FFFF);
}

#[test]
fn kind_lives_in_low_byte_and_skip_in_high_bits() {
    let h = OpHeader::new(OpKind::FillRect, 40).unwrap();
    assert_eq!(h.bits() & 0xFF, u32::from(OpKind::FillRect.tag()));
    assert_eq!(h.bits() >> 8, 40);
    assert_eq!(h.tag(), OpKind::FillRect.tag());
    assert_eq!(h.kind(), Some(OpKind::FillRect));
    assert_eq!(h.skip(), 40);
}

#[test]
fn bit_layout_is_explicit() {
    let h = OpHeader::from_bits(0x0000_1203);
    assert_eq!(h.tag(), 0x03);
    assert_eq!(h.skip(), 0x12);
    assert_eq!(h.to_le_bytes(), [0x03, 0x12, 0x00, 0x00]);
}

#[test]
fn max_skip_is_accepted_and_one_more_is_rejected() {
    let h = OpHeader::new(OpKind::Save, MAX_SKIP).unwrap();
    assert_eq!(h.skip(), MAX_SKIP);
    assert_eq!(h.kind(), Some(OpKind::Save));

    let err = OpHeader::new(OpKind::Save, MAX_SKIP + 1).unwrap_err();
    assert!(matches!(err, CanvasError::RecordTooLarge { kind: "Save", .. }));
}

#[test]
fn read_requires_four_bytes() {
    let h = OpHeader::new(OpKind::Restore, 8).unwrap();
    let bytes = h.to_le_bytes();
    assert_eq!(OpHeader::read(&bytes, 0).unwrap(), h);
    assert!(OpHeader::read(&bytes[..3], 16).unwrap_err().is_corruption());
}

#[test]
fn unknown_tags_decode_to_none() {
    let h = OpHeader::from_bits(0x0000_08FF);
    assert_eq!(h.kind(), None);
}

#[test]
fn alignment_is_pointer_width() {
    assert_eq!(RECORD_ALIGN, std::mem::size_of::<*const u8>());
    assert!(RECORD_ALIGN.is_power_of_two());
}
