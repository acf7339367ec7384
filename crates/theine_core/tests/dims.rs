use theine_core::dims::{Offset, Size, Stride};

#[test]
fn count() {
    let size = Size::new(2, 3, 4, 5);

    assert_eq!(size.count(), 120);
}

#[test]
fn row_major_stride() {
    let stride = Stride::from(Size::new(2, 3, 4, 5));

    assert_eq!(stride.num, 60);
    assert_eq!(stride.channels, 20);
    assert_eq!(stride.height, 5);
    assert_eq!(stride.width, 1);
}

#[test]
fn linear_offset() {
    let stride = Stride::from(Size::new(4, 3, 32, 32));
    let offset = Offset::new(1, 0, 0, 0);

    assert_eq!(offset.linear(&stride), 3 * 32 * 32);

    let offset = Offset::new(1, 2, 3, 4);
    assert_eq!(offset.linear(&stride), 3072 + 2 * 1024 + 3 * 32 + 4);
}

#[test]
fn offset_add() {
    let a = Offset::new(1, 0, 2, 0);
    let b = Offset::new(0, 1, 0, 3);

    assert_eq!(a + b, Offset::new(1, 1, 2, 3));
}
