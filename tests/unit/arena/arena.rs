use super::*;

#[test]
fn align_up_rounds_to_power_of_two() {
    assert_eq!(align_up(0, 8), Some(0));
    assert_eq!(align_up(1, 8), Some(8));
    assert_eq!(align_up(8, 8), Some(8));
    assert_eq!(align_up(4097, 4096), Some(8192));
    assert_eq!(align_up(usize::MAX, 8), None);
}

#[test]
fn checked_size_detects_overflow_before_multiplying() {
    assert_eq!(checked_size(3, 8), Some(24));
    assert_eq!(checked_size(0, usize::MAX), Some(0));
    assert_eq!(checked_size(usize::MAX, 2), None);
    assert_eq!(checked_size(usize::MAX / 2 + 1, 2), None);
}

#[test]
fn zero_reserve_is_a_noop() {
    let mut arena = ByteArena::new(64);
    arena.reserve(0).unwrap();
    assert_eq!(arena.reserved(), 0);
    assert_eq!(arena.grow_events(), 0);
    assert!(arena.data().is_empty());
}

#[test]
fn reserve_rounds_up_to_page_multiple() {
    let mut arena = ByteArena::new(64);
    arena.reserve(1).unwrap();
    assert_eq!(arena.reserved(), 64);
    arena.reserve(64).unwrap();
    assert_eq!(arena.reserved(), 64);
    assert_eq!(arena.grow_events(), 1);
    arena.reserve(65).unwrap();
    assert_eq!(arena.reserved(), 128);
    assert_eq!(arena.grow_events(), 2);
}

#[test]
fn growth_preserves_existing_bytes() {
    let mut arena = ByteArena::new(16);
    arena.reserve(16).unwrap();
    for (i, b) in arena.data_mut().iter_mut().enumerate() {
        *b = i as u8;
    }
    arena.reserve(100).unwrap();
    assert_eq!(arena.reserved(), 112);
    let expected: Vec<u8> = (0..16).collect();
    assert_eq!(&arena.data()[..16], expected.as_slice());
    assert!(arena.data()[16..].iter().all(|&b| b == 0));
}

#[test]
fn impossible_sizes_surface_as_allocation_errors() {
    let mut arena = ByteArena::new(4096);
    let err = arena.reserve(usize::MAX).unwrap_err();
    assert!(matches!(err, CanvasError::Allocation { .. }));

    let err = arena.reserve(usize::MAX - 8191).unwrap_err();
    assert!(matches!(err, CanvasError::Allocation { .. }));

    let err = arena.reserve_elements(usize::MAX, 8).unwrap_err();
    assert!(matches!(err, CanvasError::Allocation { .. }));

    assert_eq!(arena.reserved(), 0);
    assert_eq!(arena.grow_events(), 0);
}

#[test]
fn config_reserves_initial_capacity() {
    let cfg = OpBufferConfig::default()
        .with_page_size(256)
        .with_initial_capacity(300);
    let arena = ByteArena::with_config(&cfg).unwrap();
    assert_eq!(arena.reserved(), 512);
    assert_eq!(arena.page_size(), 256);

    let bad = OpBufferConfig::default().with_page_size(100);
    assert!(ByteArena::with_config(&bad).is_err());
}

#[test]
fn release_frees_backing_memory() {
    let mut arena = ByteArena::new(64);
    arena.reserve(10).unwrap();
    arena.release();
    assert_eq!(arena.reserved(), 0);
}
