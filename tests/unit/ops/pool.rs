use super::*;

#[test]
fn insert_get_release_cycle() {
    let mut pool = OwnedPool::new();
    let a = pool.insert(String::from("hello")).unwrap();
    let b = pool.insert(vec![String::from("serif")]).unwrap();
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(pool.live(), 2);

    assert_eq!(pool.get(&a).unwrap(), "hello");
    assert_eq!(pool.get(&b).unwrap(), &vec![String::from("serif")]);

    pool.release(&a).unwrap();
    assert_eq!(pool.live(), 1);
    assert!(pool.get(&a).unwrap_err().is_corruption());
}

#[test]
fn releasing_twice_is_corruption() {
    let mut pool = OwnedPool::new();
    let s = pool.insert(String::from("x")).unwrap();
    pool.release(&s).unwrap();
    let err = pool.release(&s).unwrap_err();
    assert!(err.to_string().contains("released twice"));
    assert_eq!(pool.live(), 0);
}

#[test]
fn type_mismatch_is_corruption_and_keeps_value() {
    let mut pool = OwnedPool::new();
    let s = pool.insert(String::from("x")).unwrap();
    let wrong: Slot<Vec<String>> = Slot::from_index(s.index());
    assert!(pool.get(&wrong).unwrap_err().is_corruption());
    assert!(pool.release(&wrong).unwrap_err().is_corruption());
    assert_eq!(pool.live(), 1);
    assert_eq!(pool.get(&s).unwrap(), "x");
}

#[test]
fn release_drops_shared_handle_exactly_once() {
    let pixels = Rc::new(PixelMap::filled(1, 1, crate::foundation::core::Rgba8::RED).unwrap());
    let mut pool = OwnedPool::new();
    let slot = pool.insert(Rc::clone(&pixels)).unwrap();
    assert_eq!(Rc::strong_count(&pixels), 2);
    pool.release(&slot).unwrap();
    assert_eq!(Rc::strong_count(&pixels), 1);
}

#[test]
fn clear_drops_everything_and_restarts_indices() {
    let path = Rc::new(Path2D::new());
    let mut pool = OwnedPool::new();
    pool.insert(Rc::clone(&path)).unwrap();
    pool.insert(String::from("a")).unwrap();
    assert_eq!(Rc::strong_count(&path), 2);

    pool.clear();
    assert_eq!(pool.live(), 0);
    assert_eq!(Rc::strong_count(&path), 1);
    assert_eq!(pool.insert(String::from("b")).unwrap().index(), 0);
}

#[test]
fn out_of_range_slot_is_corruption() {
    let pool = OwnedPool::new();
    let slot: Slot<String> = Slot::from_index(7);
    assert!(pool.get(&slot).unwrap_err().to_string().contains("out of range"));
}
