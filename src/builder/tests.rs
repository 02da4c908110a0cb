//! Tests for the builder module

use super::*;
use crate::buffer::Endian;
use crate::error::FlatError;
use crate::layout::{file_identifier, StructLayout, StructMember};
use crate::reader::{
    buffer_has_identifier, root_table, root_table_with_endian, size_prefixed_root_table, Table,
};

fn build_stat(builder: &mut Builder, id: &str, val: i64, count: u16) -> Offset<TableTag> {
    let id = builder.create_string(id).unwrap();
    builder.start_object(3).unwrap();
    builder.add_field::<i64>(1, val, 0).unwrap();
    builder.add_field::<u16>(2, count, 0).unwrap();
    builder.add_offset(0, id).unwrap();
    builder.end_object().unwrap()
}

/// A table whose fields are all 4 bytes wide, so its vtable does not depend
/// on where in the buffer it starts.
fn build_tag(builder: &mut Builder, name: &str, n: u32) -> Offset<TableTag> {
    let name = builder.create_string(name).unwrap();
    builder.start_object(2).unwrap();
    builder.add_field::<u32>(1, n, 0).unwrap();
    builder.add_offset(0, name).unwrap();
    builder.end_object().unwrap()
}

fn finished_stat(builder: &mut Builder, val: i64) -> Vec<u8> {
    let root = build_stat(builder, "x", val, 7);
    builder.finish(root, None).unwrap();
    builder.finished_data().unwrap().to_vec()
}

#[test]
fn stat_buffer_bytes() {
    let mut builder = Builder::new();
    let bytes = finished_stat(&mut builder, 0);

    #[rustfmt::skip]
    let expected: [u8; 36] = [
        16, 0, 0, 0,                    // root uoffset -> 16
        0, 0,                           // padding
        10, 0, 12, 0,                   // vtable: size, object size
        4, 0, 0, 0, 10, 0,              // voffsets: id, val (absent), count
        10, 0, 0, 0,                    // table: soffset -> vtable at 6
        8, 0, 0, 0,                     // id uoffset -> 28
        0, 0,                           // padding
        7, 0,                           // count
        1, 0, 0, 0, b'x', 0,            // string
        0, 0,                           // padding
    ];
    assert_eq!(bytes, expected);

    let stat = root_table(&bytes).unwrap();
    assert_eq!(stat.get_str(0).unwrap(), Some("x"));
    assert_eq!(stat.get_i64(1, 0).unwrap(), 0);
    assert_eq!(stat.get_u16(2, 0).unwrap(), 7);
}

#[test]
fn field_equal_to_default_is_omitted() {
    let absent = finished_stat(&mut Builder::new(), 0);
    let present = finished_stat(&mut Builder::new(), 5);
    assert!(absent.len() < present.len());

    let stat = root_table(&present).unwrap();
    assert!(stat.is_present(1).unwrap());
    assert_eq!(stat.get_i64(1, 0).unwrap(), 5);
    assert!(!root_table(&absent).unwrap().is_present(1).unwrap());
}

#[test]
fn force_defaults_writes_every_scalar() {
    let mut builder = Builder::options().force_defaults(true).build();
    let bytes = finished_stat(&mut builder, 0);
    let stat = root_table(&bytes).unwrap();
    assert!(stat.is_present(1).unwrap());
    assert_eq!(stat.get_i64(1, 99).unwrap(), 0);
}

#[test]
fn add_field_forced_ignores_default() {
    let mut builder = Builder::new();
    builder.start_object(1).unwrap();
    builder.add_field_forced::<u32>(0, 0).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    let table = root_table(builder.finished_data().unwrap()).unwrap();
    assert!(table.is_present(0).unwrap());
}

#[test]
fn identical_vtables_are_shared() {
    let mut builder = Builder::new();
    let a = build_tag(&mut builder, "a", 1);
    let b = build_tag(&mut builder, "b", 2);
    let list = builder.create_vector_of_offsets(&[a, b]).unwrap();
    builder.start_object(1).unwrap();
    builder.add_offset(0, list).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();

    assert_eq!(builder.vtable_count(), 2);
    assert_eq!(builder.vtable_cache().hits(), 1);

    let bytes = builder.finished_data().unwrap();
    let stats = root_table(bytes)
        .unwrap()
        .get_vector::<Table>(0)
        .unwrap()
        .unwrap();
    let first = stats.get(0).unwrap().vtable().unwrap();
    let second = stats.get(1).unwrap().vtable().unwrap();
    assert_eq!(first.pos(), second.pos());
    assert_eq!(stats.get(1).unwrap().get_str(0).unwrap(), Some("b"));
}

#[test]
fn dedup_can_be_disabled() {
    let mut builder = Builder::options().dedup_vtables(false).build();
    let a = build_tag(&mut builder, "a", 1);
    let b = build_tag(&mut builder, "b", 2);
    let list = builder.create_vector_of_offsets(&[a, b]).unwrap();
    builder.start_object(1).unwrap();
    builder.add_offset(0, list).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    assert_eq!(builder.vtable_count(), 0);

    let bytes = builder.finished_data().unwrap();
    let stats = root_table(bytes)
        .unwrap()
        .get_vector::<Table>(0)
        .unwrap()
        .unwrap();
    let first = stats.get(0).unwrap().vtable().unwrap();
    let second = stats.get(1).unwrap().vtable().unwrap();
    assert_ne!(first.pos(), second.pos());
    assert_eq!(first.as_bytes().unwrap(), second.as_bytes().unwrap());
}

#[test]
fn different_layouts_get_different_vtables() {
    let mut builder = Builder::new();
    build_stat(&mut builder, "a", 1, 1);
    build_stat(&mut builder, "b", 0, 1);
    assert_eq!(builder.vtable_count(), 2);
    assert_eq!(builder.vtable_cache().hits(), 0);
}

#[test]
fn growth_does_not_change_output() {
    let mut tiny = Builder::with_capacity(1);
    let mut roomy = Builder::with_capacity(4096);
    let grown = finished_stat(&mut tiny, 123);
    let reference = finished_stat(&mut roomy, 123);
    assert_eq!(grown, reference);
    assert!(tiny.capacity() >= grown.len());
}

#[test]
fn growth_keeps_offsets_valid() {
    let mut builder = Builder::with_capacity(8);
    let strings: Vec<_> = (0..50)
        .map(|i| builder.create_string(&format!("name-{}", i)).unwrap())
        .collect();
    let list = builder.create_vector_of_offsets(&strings).unwrap();
    builder.start_object(1).unwrap();
    builder.add_offset(0, list).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();

    let names = root_table(builder.finished_data().unwrap())
        .unwrap()
        .get_vector::<&str>(0)
        .unwrap()
        .unwrap();
    assert_eq!(names.len(), 50);
    assert_eq!(names.get(0).unwrap(), "name-0");
    assert_eq!(names.get(49).unwrap(), "name-49");
}

#[test]
fn operations_after_finish_are_invalid() {
    let mut builder = Builder::new();
    let root = build_stat(&mut builder, "x", 1, 1);
    builder.finish(root, None).unwrap();
    assert!(builder.is_finished());

    assert!(FlatError::is_invalid_state(&builder.start_object(1).unwrap_err()));
    assert!(FlatError::is_invalid_state(&builder.create_string("y").unwrap_err()));
    assert!(FlatError::is_invalid_state(&builder.finish(root, None).unwrap_err()));
    assert!(FlatError::is_invalid_state(
        &builder.start_vector(4, 1, 4).unwrap_err()
    ));

    builder.reset();
    assert!(!builder.is_finished());
    assert_eq!(builder.offset(), 0);
    let bytes = finished_stat(&mut builder, 1);
    assert_eq!(root_table(&bytes).unwrap().get_i64(1, 0).unwrap(), 1);
}

#[test]
fn end_without_start_is_invalid() {
    let mut builder = Builder::new();
    assert!(FlatError::is_invalid_state(&builder.end_object().unwrap_err()));
    assert!(FlatError::is_invalid_state(
        &builder.end_vector::<u8>().unwrap_err()
    ));
}

#[test]
fn nesting_is_invalid() {
    let mut builder = Builder::new();
    builder.start_object(2).unwrap();
    assert!(FlatError::is_invalid_state(&builder.start_object(1).unwrap_err()));
    assert!(FlatError::is_invalid_state(&builder.create_string("s").unwrap_err()));
    assert!(FlatError::is_invalid_state(
        &builder.start_vector(1, 1, 1).unwrap_err()
    ));
    let table = builder.end_object().unwrap();
    assert!(FlatError::is_invalid_state(
        &builder.add_field::<u8>(0, 1, 0).unwrap_err()
    ));

    builder.start_vector(4, 1, 4).unwrap();
    assert!(FlatError::is_invalid_state(&builder.start_object(1).unwrap_err()));
    assert!(FlatError::is_invalid_state(&builder.finish(table, None).unwrap_err()));
    builder.push_element::<u32>(1).unwrap();
    builder.end_vector::<u32>().unwrap();
}

#[test]
fn finished_data_requires_finish() {
    let builder = Builder::new();
    assert!(FlatError::is_invalid_state(&builder.finished_data().unwrap_err()));
    assert!(FlatError::is_invalid_state(
        &builder.into_finished_data().unwrap_err()
    ));
}

#[test]
fn field_id_out_of_range() {
    let mut builder = Builder::new();
    builder.start_object(2).unwrap();
    assert!(FlatError::is_schema_mismatch(
        &builder.add_field::<u8>(2, 1, 0).unwrap_err()
    ));
}

#[test]
fn offset_must_point_backwards() {
    let mut builder = Builder::new();
    builder.start_object(1).unwrap();
    let bogus: Offset<StringTag> = Offset::new(1000);
    assert!(FlatError::is_out_of_range(
        &builder.add_offset(0, bogus).unwrap_err()
    ));
}

#[test]
fn null_offset_leaves_field_absent() {
    let mut builder = Builder::new();
    builder.start_object(1).unwrap();
    builder.add_offset(0, Offset::<StringTag>::null()).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    let table = root_table(builder.finished_data().unwrap()).unwrap();
    assert_eq!(table.get_str(0).unwrap(), None);
    assert_eq!(table.vtable().unwrap().size(), 4);
}

#[test]
fn scalars_are_aligned_to_their_size() {
    let mut builder = Builder::new();
    builder.start_object(3).unwrap();
    builder.add_field::<u8>(0, 1, 0).unwrap();
    builder.add_field::<i64>(1, -1, 0).unwrap();
    builder.add_field::<u16>(2, 2, 0).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();

    let bytes = builder.finished_data().unwrap();
    assert_eq!(bytes.len() % 8, 0);
    let table = root_table(bytes).unwrap();
    assert_eq!(table.field_pos(1).unwrap().unwrap() % 8, 0);
    assert_eq!(table.field_pos(2).unwrap().unwrap() % 2, 0);
    assert_eq!(table.get_u8(0, 0).unwrap(), 1);
    assert_eq!(table.get_i64(1, 0).unwrap(), -1);
    assert_eq!(table.get_u16(2, 0).unwrap(), 2);
}

#[test]
fn shared_strings_are_written_once() {
    let mut builder = Builder::new();
    let a = builder.create_shared_string("goblin").unwrap();
    let b = builder.create_shared_string("goblin").unwrap();
    let c = builder.create_shared_string("orc").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    let d = builder.create_string("goblin").unwrap();
    let e = builder.create_string("goblin").unwrap();
    assert_ne!(d, e);
}

#[test]
fn required_checks_written_table() {
    let mut builder = Builder::new();
    let root = build_stat(&mut builder, "x", 0, 1);
    builder.required(root, 0).unwrap();
    builder.required(root, 2).unwrap();
    let err = builder.required(root, 1).unwrap_err();
    assert!(FlatError::is_schema_mismatch(&err));
    assert!(err.to_string().contains("required field 1 is missing"));
}

#[test]
fn vector_element_count_must_match() {
    let mut builder = Builder::new();
    builder.start_vector(4, 2, 4).unwrap();
    builder.push_element::<u32>(1).unwrap();
    assert!(FlatError::is_schema_mismatch(
        &builder.end_vector::<u32>().unwrap_err()
    ));
}

#[test]
fn scalar_vectors_round_trip() {
    let mut builder = Builder::new();
    let small = builder.create_vector::<u8>(&[1, 2, 3]).unwrap();
    let wide = builder.create_vector::<f64>(&[0.5, -2.0]).unwrap();
    let empty = builder.create_vector::<i32>(&[]).unwrap();
    builder.start_object(3).unwrap();
    builder.add_offset(0, small).unwrap();
    builder.add_offset(1, wide).unwrap();
    builder.add_offset(2, empty).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();

    let table = root_table(builder.finished_data().unwrap()).unwrap();
    let small = table.get_vector::<u8>(0).unwrap().unwrap();
    assert_eq!(small.as_bytes(), &[1, 2, 3]);
    let wide = table.get_vector::<f64>(1).unwrap().unwrap();
    assert_eq!(wide.pos() % 8, 4);
    assert_eq!(wide.to_vec().unwrap(), vec![0.5, -2.0]);
    assert!(table.get_vector::<i32>(2).unwrap().unwrap().is_empty());
}

#[test]
fn struct_fields_and_vectors() {
    let layout = StructLayout::new(vec![
        StructMember::scalar(2),
        StructMember::scalar(1),
        StructMember::scalar(4),
    ])
    .unwrap();
    assert_eq!(layout.size(), 8);

    let mut builder = Builder::new();
    let mut items = Vec::new();
    for i in 0..3u16 {
        let mut w = StructWriter::new(&layout, Endian::Little);
        w.set::<u16>(0, i).unwrap();
        w.set::<u8>(1, i as u8 * 10).unwrap();
        w.set::<f32>(2, i as f32 + 0.5).unwrap();
        items.push(w);
    }
    let list = builder.create_vector_of_structs(&layout, &items).unwrap();

    builder.start_object(2).unwrap();
    builder.add_offset(1, list).unwrap();
    builder.add_struct(0, &items[2]).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();

    let table = root_table(builder.finished_data().unwrap()).unwrap();
    let inline = table.get_struct(0).unwrap().unwrap();
    assert_eq!(inline.get::<u16>(0).unwrap(), 2);
    assert_eq!(inline.get::<u8>(2).unwrap(), 20);
    assert_eq!(inline.get::<f32>(4).unwrap(), 2.5);

    let list = table.get_struct_vector(1, &layout).unwrap().unwrap();
    assert_eq!(list.len(), 3);
    let values: Vec<u16> = list.iter().map(|s| s.get::<u16>(0).unwrap()).collect();
    assert_eq!(values, vec![0, 1, 2]);
}

#[test]
fn struct_writer_rejects_bad_members() {
    let layout = StructLayout::new(vec![StructMember::scalar(4)]).unwrap();
    let mut w = StructWriter::new(&layout, Endian::Little);
    assert!(FlatError::is_schema_mismatch(&w.set::<u16>(0, 1).unwrap_err()));
    assert!(FlatError::is_schema_mismatch(&w.set::<u32>(1, 1).unwrap_err()));
}

#[test]
fn struct_endian_must_match_builder() {
    let layout = StructLayout::new(vec![StructMember::scalar(4)]).unwrap();
    let w = StructWriter::new(&layout, Endian::Big);
    let mut builder = Builder::new();
    assert!(FlatError::is_schema_mismatch(
        &builder.create_struct(&w).unwrap_err()
    ));
}

#[test]
fn slot_struct_must_follow_create_struct() {
    let layout = StructLayout::new(vec![StructMember::scalar(4)]).unwrap();
    let w = StructWriter::new(&layout, Endian::Little);
    let mut builder = Builder::new();
    builder.start_object(2).unwrap();
    let written = builder.create_struct(&w).unwrap();
    builder.add_field::<u32>(1, 5, 0).unwrap();
    assert!(FlatError::is_invalid_state(
        &builder.slot_struct(0, written).unwrap_err()
    ));
}

#[test]
fn sorted_table_vector_supports_lookup() {
    let mut builder = Builder::new();
    let mut stats: Vec<_> = ["pear", "apple", "fig"]
        .iter()
        .enumerate()
        .map(|(i, name)| build_stat(&mut builder, name, i as i64 + 1, 1))
        .collect();
    let list = builder.create_vector_of_sorted_tables(&mut stats, 0).unwrap();
    builder.start_object(1).unwrap();
    builder.add_offset(0, list).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();

    let list = root_table(builder.finished_data().unwrap())
        .unwrap()
        .get_vector::<Table>(0)
        .unwrap()
        .unwrap();
    let names: Vec<&str> = list
        .iter()
        .map(|t| t.unwrap().get_str(0).unwrap().unwrap())
        .collect();
    assert_eq!(names, vec!["apple", "fig", "pear"]);

    let fig = list.lookup_by_key(0, "fig").unwrap().unwrap();
    assert_eq!(fig.get_i64(1, 0).unwrap(), 3);
    assert!(list.lookup_by_key(0, "kiwi").unwrap().is_none());
}

#[test]
fn file_identifier_follows_root() {
    let ident = file_identifier("STAT").unwrap();
    let mut builder = Builder::new();
    let root = build_stat(&mut builder, "x", 1, 1);
    builder.finish(root, Some(&ident)).unwrap();
    let bytes = builder.finished_data().unwrap();

    assert_eq!(&bytes[4..8], b"STAT");
    assert!(buffer_has_identifier(bytes, &ident, false));
    assert!(!buffer_has_identifier(bytes, b"MONS", false));
    assert_eq!(root_table(bytes).unwrap().get_i64(1, 0).unwrap(), 1);
}

#[test]
fn size_prefix_counts_remaining_bytes() {
    let ident = file_identifier("STAT").unwrap();
    let mut builder = Builder::new();
    let root = build_stat(&mut builder, "x", 9, 1);
    builder.finish_size_prefixed(root, Some(&ident)).unwrap();
    let bytes = builder.finished_data().unwrap();

    let prefix = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
    assert_eq!(prefix, bytes.len() - 4);
    assert!(buffer_has_identifier(bytes, &ident, true));
    let stat = size_prefixed_root_table(bytes).unwrap();
    assert_eq!(stat.get_i64(1, 0).unwrap(), 9);
}

#[test]
fn big_endian_round_trip() {
    let mut builder = Builder::options().endian(Endian::Big).build();
    let root = build_stat(&mut builder, "be", 0x0102, 3);
    builder.finish(root, None).unwrap();
    let bytes = builder.finished_data().unwrap();

    assert_eq!(bytes[0], 0);
    let stat = root_table_with_endian(bytes, Endian::Big).unwrap();
    assert_eq!(stat.get_str(0).unwrap(), Some("be"));
    assert_eq!(stat.get_i64(1, 0).unwrap(), 0x0102);
    assert_eq!(stat.get_u16(2, 0).unwrap(), 3);
}

#[test]
fn vtable_cache_counts_hits() {
    let mut cache = VtableCache::new();
    assert!(cache.is_empty());
    cache.insert(smallvec::smallvec![4, 0, 4, 0], 12);
    cache.insert(smallvec::smallvec![4, 0, 4, 0], 40);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.lookup(&[4, 0, 4, 0]), Some(12));
    assert_eq!(cache.lookup(&[6, 0, 4, 0, 0, 0]), None);
    assert_eq!(cache.hits(), 1);
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.hits(), 0);
}

#[test]
fn oversized_object_leaves_builder_usable() {
    let mut builder = Builder::new();
    builder.start_object(9000).unwrap();
    for id in 0..9000 {
        builder.add_field::<u64>(id, id as u64 + 1, 0).unwrap();
    }
    let before = builder.offset();
    let err = builder.end_object().unwrap_err();
    assert!(FlatError::is_schema_mismatch(&err));
    assert!(err.to_string().contains("exceeds"));
    assert_eq!(builder.offset(), before);

    assert!(FlatError::is_invalid_state(
        &builder.add_field::<u8>(0, 1, 0).unwrap_err()
    ));
    let root = build_tag(&mut builder, "after", 3);
    builder.finish(root, None).unwrap();

    let tag = root_table(builder.finished_data().unwrap()).unwrap();
    assert_eq!(tag.get_str(0).unwrap(), Some("after"));
    assert_eq!(tag.get_u32(1, 0).unwrap(), 3);
}
