//! Tests for the layout module

use super::*;
use crate::error::FlatError;

#[test]
fn voffsets_start_after_the_vtable_header() {
    assert_eq!(field_index_to_voffset(0), 4);
    assert_eq!(field_index_to_voffset(1), 6);
    assert_eq!(field_index_to_voffset(2), 8);
    assert_eq!(voffset_to_field_index(4), 0);
    assert_eq!(voffset_to_field_index(8), 2);
}

#[test]
fn vtable_size_counts_header_and_entries() {
    assert_eq!(vtable_size(0), 4);
    assert_eq!(vtable_size(3), 10);
}

#[test]
fn padding_rounds_up_to_alignment() {
    assert_eq!(padding_bytes(0, 4), 0);
    assert_eq!(padding_bytes(1, 4), 3);
    assert_eq!(padding_bytes(2, 4), 2);
    assert_eq!(padding_bytes(4, 4), 0);
    assert_eq!(padding_bytes(5, 8), 3);
    assert_eq!(padding_bytes(7, 1), 0);
}

#[test]
fn alignment_must_be_a_small_power_of_two() {
    assert!(check_alignment(1).is_ok());
    assert!(check_alignment(8).is_ok());
    assert!(check_alignment(16).is_ok());
    assert!(FlatError::is_schema_mismatch(&check_alignment(0).unwrap_err()));
    assert!(check_alignment(3).is_err());
    assert!(check_alignment(32).is_err());
}

#[test]
fn field_count_limit_matches_voffset_width() {
    assert!(check_field_count(0).is_ok());
    assert!(check_field_count(crate::config::MAX_FIELD_COUNT).is_ok());
    assert!(check_field_count(crate::config::MAX_FIELD_COUNT + 1).is_err());
}

#[test]
fn file_identifier_requires_four_bytes() {
    assert_eq!(file_identifier("MONS").unwrap(), *b"MONS");
    assert!(file_identifier("MON").is_err());
    assert!(file_identifier("MONST").is_err());
}

#[test]
fn struct_layout_pads_members_and_tail() {
    let layout = StructLayout::new(vec![
        StructMember::scalar(4),
        StructMember::scalar(4),
        StructMember::scalar(4),
        StructMember::scalar(1),
        StructMember::scalar(8),
    ])
    .unwrap();

    assert_eq!(layout.offsets(), &[0, 4, 8, 12, 16]);
    assert_eq!(layout.size(), 24);
    assert_eq!(layout.align(), 8);
}

#[test]
fn struct_layout_rounds_size_to_alignment() {
    let layout = StructLayout::new(vec![StructMember::scalar(2), StructMember::scalar(1)]).unwrap();
    assert_eq!(layout.offsets(), &[0, 2]);
    assert_eq!(layout.size(), 4);
    assert_eq!(layout.align(), 2);
    assert_eq!(layout.member_count(), 2);
    assert_eq!(layout.member(1), Some(&StructMember { size: 1, align: 1 }));
    assert_eq!(layout.offset(2), None);
}

#[test]
fn struct_layout_rejects_empty_and_misaligned_members() {
    assert!(StructLayout::new(vec![]).is_err());
    assert!(StructLayout::new(vec![StructMember { size: 3, align: 3 }]).is_err());
}
