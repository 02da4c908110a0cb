//! # Stat Scenario
//!
//! End-to-end run of the smallest useful record, `Stat { id: string,
//! val: long, count: ushort }`, through both the id-based API and the
//! schema-driven view. Set `RUST_LOG=flatlay=trace` to see builder events.

use flatlay::error::FlatError;
use flatlay::reader::{root_table, root_table_mut};
use flatlay::{
    Builder, FieldDef, FieldType, ScalarType, Schema, TableSchema, TableView, TableWriter, Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn stat_schema() -> Schema {
    let stat = TableSchema::new(
        "Stat",
        vec![
            FieldDef::new("id", FieldType::String),
            FieldDef::new("val", FieldType::Scalar(ScalarType::Int64)),
            FieldDef::new("count", FieldType::Scalar(ScalarType::UInt16)),
        ],
    )
    .unwrap();
    Schema::single(stat).unwrap()
}

fn build(val: i64) -> Vec<u8> {
    let mut builder = Builder::new();
    let id = builder.create_string("x").unwrap();
    builder.start_object(3).unwrap();
    builder.add_field::<i64>(1, val, 0).unwrap();
    builder.add_field::<u16>(2, 7, 0).unwrap();
    builder.add_offset(0, id).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    builder.into_finished_data().unwrap()
}

#[test]
fn stat_reads_back_with_default() {
    init_tracing();
    let bytes = build(0);
    let stat = root_table(&bytes).unwrap();
    assert_eq!(stat.get_str(0).unwrap(), Some("x"));
    assert_eq!(stat.get_i64(1, 0).unwrap(), 0);
    assert_eq!(stat.get_u16(2, 0).unwrap(), 7);
    assert!(!stat.is_present(1).unwrap());
}

#[test]
fn stat_with_val_is_larger() {
    init_tracing();
    let without = build(0);
    let with = build(1);
    assert!(with.len() > without.len());
    assert_eq!(root_table(&with).unwrap().get_i64(1, 0).unwrap(), 1);
}

#[test]
fn id_api_and_view_agree() {
    init_tracing();
    let schema = stat_schema();
    let by_id = build(0);

    let mut builder = Builder::new();
    let mut stat = TableWriter::new(&schema);
    stat.set("id", "x").unwrap().set("count", 7u16).unwrap();
    let root = stat.finish(&mut builder).unwrap();
    builder.finish(root, None).unwrap();
    let by_name = builder.finished_data().unwrap();

    let a = TableView::root(&by_id, &schema).unwrap();
    let b = TableView::root(by_name, &schema).unwrap();
    for field in ["id", "val", "count"] {
        assert_eq!(a.get(field).unwrap(), b.get(field).unwrap(), "{}", field);
    }
}

#[test]
fn mutate_present_and_absent() {
    init_tracing();
    let mut bytes = build(0);
    let before = bytes.clone();

    let mut stat = root_table_mut(&mut bytes).unwrap();
    assert!(!stat.mutate_i64(1, 9).unwrap());
    assert_eq!(bytes, before);

    let mut stat = root_table_mut(&mut bytes).unwrap();
    assert!(stat.mutate_u16(2, 8).unwrap());
    let schema = stat_schema();
    let view = TableView::root(&bytes, &schema).unwrap();
    assert_eq!(view.get("count").unwrap(), Value::UInt16(8));
    assert_eq!(view.get("val").unwrap(), Value::Int64(0));
}

#[test]
fn lifecycle_errors_surface_as_invalid_state() {
    init_tracing();
    let mut builder = Builder::new();
    let err = builder.end_object().unwrap_err();
    assert!(FlatError::is_invalid_state(&err));
    assert_eq!(
        FlatError::kind_of(&err),
        Some(&FlatError::InvalidState {
            op: "end an object",
            state: "no object is in progress",
        })
    );

    builder.start_object(1).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    assert!(FlatError::is_invalid_state(
        &builder.create_string("late").unwrap_err()
    ));
}
