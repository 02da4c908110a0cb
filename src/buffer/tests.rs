//! Tests for the buffer module

use super::*;
use crate::error::FlatError;

#[test]
fn new_buffer_is_empty_with_position_at_capacity() {
    let bb = ByteBuffer::with_capacity(32, Endian::Little);
    assert_eq!(bb.capacity(), 32);
    assert_eq!(bb.position(), 32);
    assert_eq!(bb.len(), 0);
    assert!(bb.is_empty());
    assert!(bb.written().is_empty());
}

#[test]
fn put_and_get_scalars_at_absolute_positions() {
    let mut bb = ByteBuffer::with_capacity(32, Endian::Little);
    bb.put::<u16>(0, 0xBEEF).unwrap();
    bb.put::<i64>(8, -42).unwrap();
    bb.put::<f32>(16, 1.5).unwrap();
    bb.put::<bool>(20, true).unwrap();

    assert_eq!(bb.get::<u16>(0).unwrap(), 0xBEEF);
    assert_eq!(bb.get::<i64>(8).unwrap(), -42);
    assert_eq!(bb.get::<f32>(16).unwrap(), 1.5);
    assert!(bb.get::<bool>(20).unwrap());
}

#[test]
fn little_endian_layout_is_least_significant_byte_first() {
    let mut bb = ByteBuffer::with_capacity(4, Endian::Little);
    bb.put::<u32>(0, 0x0102_0304).unwrap();
    assert_eq!(bb.bytes(0, 4).unwrap(), &[0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn big_endian_layout_is_most_significant_byte_first() {
    let mut bb = ByteBuffer::with_capacity(4, Endian::Big);
    bb.put::<u32>(0, 0x0102_0304).unwrap();
    assert_eq!(bb.bytes(0, 4).unwrap(), &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(bb.get::<u32>(0).unwrap(), 0x0102_0304);
}

#[test]
fn get_past_the_end_is_out_of_range() {
    let bb = ByteBuffer::with_capacity(8, Endian::Little);
    let err = bb.get::<u64>(1).unwrap_err();
    assert!(FlatError::is_out_of_range(&err));
    assert_eq!(
        FlatError::kind_of(&err),
        Some(&FlatError::OutOfRange {
            pos: 1,
            size: 8,
            len: 8
        })
    );
}

#[test]
fn put_past_the_end_is_out_of_range_and_leaves_bytes_alone() {
    let mut bb = ByteBuffer::with_capacity(4, Endian::Little);
    bb.put::<u32>(0, 0xFFFF_FFFF).unwrap();
    let err = bb.put::<u16>(3, 0).unwrap_err();
    assert!(FlatError::is_out_of_range(&err));
    assert_eq!(bb.get::<u32>(0).unwrap(), 0xFFFF_FFFF);
}

#[test]
fn position_overflow_does_not_panic() {
    let bb = ByteBuffer::with_capacity(4, Endian::Little);
    assert!(bb.get::<u32>(usize::MAX - 1).is_err());
}

#[test]
fn claim_moves_position_towards_the_start() {
    let mut bb = ByteBuffer::with_capacity(16, Endian::Little);
    let a = bb.claim(4).unwrap();
    let b = bb.claim(2).unwrap();
    assert_eq!(a, 12);
    assert_eq!(b, 10);
    assert_eq!(bb.len(), 6);
    assert_eq!(bb.space(), 10);
}

#[test]
fn grow_doubles_and_keeps_distance_from_end() {
    let mut bb = ByteBuffer::with_capacity(16, Endian::Little);
    let pos = bb.claim(4).unwrap();
    bb.put::<u32>(pos, 0xDEAD_BEEF).unwrap();
    let from_end = bb.capacity() - pos;

    bb.grow().unwrap();

    assert_eq!(bb.capacity(), 32);
    let new_pos = bb.capacity() - from_end;
    assert_eq!(bb.position(), new_pos);
    assert_eq!(bb.get::<u32>(new_pos).unwrap(), 0xDEAD_BEEF);
    assert_eq!(bb.written(), &0xDEAD_BEEFu32.to_le_bytes());
}

#[test]
fn claim_grows_as_many_times_as_needed() {
    let mut bb = ByteBuffer::with_capacity(16, Endian::Little);
    let pos = bb.claim(4).unwrap();
    bb.put_bytes(pos, &[1, 2, 3, 4]).unwrap();

    let big = bb.claim(100).unwrap();
    assert!(bb.capacity() >= 104);
    assert_eq!(bb.len(), 104);
    assert_eq!(big, bb.position());
    assert_eq!(&bb.written()[100..], &[1, 2, 3, 4]);
}

#[test]
fn zero_capacity_buffer_can_still_grow() {
    let mut bb = ByteBuffer::with_capacity(0, Endian::Little);
    let pos = bb.claim(1).unwrap();
    bb.put::<u8>(pos, 9).unwrap();
    assert_eq!(bb.written(), &[9]);
}

#[test]
fn set_position_rejects_positions_past_capacity() {
    let mut bb = ByteBuffer::with_capacity(8, Endian::Little);
    bb.set_position(4).unwrap();
    assert_eq!(bb.len(), 4);
    assert!(FlatError::is_out_of_range(&bb.set_position(9).unwrap_err()));
}

#[test]
fn clear_resets_written_region_and_zeroes_bytes() {
    let mut bb = ByteBuffer::with_capacity(8, Endian::Little);
    let pos = bb.claim(4).unwrap();
    bb.put::<u32>(pos, 77).unwrap();
    bb.clear();
    assert!(bb.is_empty());
    assert_eq!(bb.capacity(), 8);
    assert_eq!(bb.get::<u32>(4).unwrap(), 0);
}

#[test]
fn into_written_returns_only_written_bytes() {
    let mut bb = ByteBuffer::with_capacity(8, Endian::Little);
    let pos = bb.claim(2).unwrap();
    bb.put::<u16>(pos, 0x0201).unwrap();
    assert_eq!(bb.into_written(), vec![0x01, 0x02]);
}

#[test]
fn byte_view_reads_borrowed_slice() {
    let data = [0x04, 0x00, 0x00, 0x00, 0xAA, 0xBB];
    let view = ByteView::new(&data);
    assert_eq!(view.get::<u32>(0).unwrap(), 4);
    assert_eq!(view.follow_uoffset(0).unwrap(), 4);
    assert_eq!(view.bytes(4, 2).unwrap(), &[0xAA, 0xBB]);
    assert!(std::ptr::eq(view.data().as_ptr(), data.as_ptr()));
}

#[test]
fn byte_view_rejects_offsets_leaving_the_slice() {
    let data = [0xFF, 0x00, 0x00, 0x00];
    let view = ByteView::new(&data);
    assert!(FlatError::is_out_of_range(
        &view.follow_uoffset(0).unwrap_err()
    ));
    assert!(view.bytes(2, 3).is_err());
}

#[test]
fn byte_view_mut_writes_in_place() {
    let mut data = [0u8; 8];
    {
        let mut view = ByteViewMut::with_endian(&mut data, Endian::Big);
        view.put::<u16>(2, 0x0102).unwrap();
        assert_eq!(view.get::<u16>(2).unwrap(), 0x0102);
        assert!(view.put::<u64>(1, 0).is_err());
    }
    assert_eq!(data, [0, 0, 1, 2, 0, 0, 0, 0]);
}

#[test]
fn bool_reads_any_nonzero_byte_as_true() {
    let data = [0u8, 1, 2, 0xFF];
    let view = ByteView::new(&data);
    assert!(!view.get::<bool>(0).unwrap());
    assert!(view.get::<bool>(1).unwrap());
    assert!(view.get::<bool>(2).unwrap());
    assert!(view.get::<bool>(3).unwrap());
}

#[test]
fn scalar_sizes_match_wire_widths() {
    assert_eq!(<bool as Scalar>::SIZE, 1);
    assert_eq!(<i8 as Scalar>::SIZE, 1);
    assert_eq!(<u16 as Scalar>::SIZE, 2);
    assert_eq!(<i32 as Scalar>::SIZE, 4);
    assert_eq!(<f32 as Scalar>::SIZE, 4);
    assert_eq!(<u64 as Scalar>::SIZE, 8);
    assert_eq!(<f64 as Scalar>::SIZE, 8);
}
