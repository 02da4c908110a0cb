//! Reader benchmarks for flatlay
//!
//! These benchmarks measure zero-copy field access on finished buffers:
//! scalar and string getters, vector iteration, keyed lookup, and the
//! schema-driven view on top of them.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box as hint_black_box;
use flatlay::builder::Builder;
use flatlay::reader::{root_table, Table};
use flatlay::schema::{FieldDef, FieldType, ScalarType, Schema, TableSchema};
use flatlay::view::TableView;

fn stat_buffer() -> Vec<u8> {
    let mut builder = Builder::new();
    let id = builder.create_string("stat-id").unwrap();
    builder.start_object(3).unwrap();
    builder.add_field::<i64>(1, 1234, 0).unwrap();
    builder.add_field::<u16>(2, 7, 0).unwrap();
    builder.add_offset(0, id).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    builder.into_finished_data().unwrap()
}

fn keyed_buffer(count: usize) -> Vec<u8> {
    let mut builder = Builder::new();
    let mut tables: Vec<_> = (0..count)
        .map(|i| {
            let key = builder.create_string(&format!("key{:06}", i)).unwrap();
            builder.start_object(2).unwrap();
            builder.add_field::<u32>(1, i as u32, 0).unwrap();
            builder.add_offset(0, key).unwrap();
            builder.end_object().unwrap()
        })
        .collect();
    let list = builder.create_vector_of_sorted_tables(&mut tables, 0).unwrap();
    builder.start_object(1).unwrap();
    builder.add_offset(0, list).unwrap();
    let root = builder.end_object().unwrap();
    builder.finish(root, None).unwrap();
    builder.into_finished_data().unwrap()
}

fn bench_field_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_field_access");
    let bytes = stat_buffer();

    group.bench_function("root_table", |b| {
        b.iter(|| hint_black_box(root_table(black_box(&bytes)).unwrap()));
    });

    group.bench_function("get_i64", |b| {
        let stat = root_table(&bytes).unwrap();
        b.iter(|| hint_black_box(stat.get_i64(black_box(1), 0).unwrap()));
    });

    group.bench_function("get_absent", |b| {
        let stat = root_table(&bytes).unwrap();
        b.iter(|| hint_black_box(stat.get_u32(black_box(9), 0).unwrap()));
    });

    group.bench_function("get_str", |b| {
        let stat = root_table(&bytes).unwrap();
        b.iter(|| hint_black_box(stat.get_str(black_box(0)).unwrap()));
    });

    group.bench_function("view_get_by_name", |b| {
        let stat = TableSchema::new(
            "Stat",
            vec![
                FieldDef::new("id", FieldType::String),
                FieldDef::new("val", FieldType::Scalar(ScalarType::Int64)),
                FieldDef::new("count", FieldType::Scalar(ScalarType::UInt16)),
            ],
        )
        .unwrap();
        let schema = Schema::single(stat).unwrap();
        let view = TableView::root(&bytes, &schema).unwrap();
        b.iter(|| hint_black_box(view.get(black_box("val")).unwrap()));
    });

    group.finish();
}

fn bench_vectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_vectors");

    for count in [100usize, 10_000].iter() {
        let bytes = keyed_buffer(*count);
        let list = root_table(&bytes)
            .unwrap()
            .get_vector::<Table>(0)
            .unwrap()
            .unwrap();

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("iterate_tables", count), count, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for table in list.iter() {
                    sum += table.unwrap().get_u32(1, 0).unwrap() as u64;
                }
                hint_black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("lookup_by_key", count), count, |b, &count| {
            let key = format!("key{:06}", count / 2);
            b.iter(|| hint_black_box(list.lookup_by_key(0, black_box(&key)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field_access, bench_vectors);
criterion_main!(benches);
