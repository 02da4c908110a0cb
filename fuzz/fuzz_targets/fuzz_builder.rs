//! Fuzz testing for the builder.
//!
//! Random sequences of builder calls, valid or not, must never panic, and
//! every buffer that finishes must read back the scalars that were written.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use flatlay::builder::{Builder, Offset, StringTag};
use flatlay::reader::root_table;

#[derive(Debug, Arbitrary)]
struct BuilderInput {
    initial_capacity: u16,
    force_defaults: bool,
    operations: Vec<Operation>,
}

#[derive(Debug, Arbitrary)]
enum Operation {
    CreateString(String),
    CreateVector(Vec<u32>),
    StartObject(u8),
    AddU8(u8, u8),
    AddI32(u8, i32),
    AddF64(u8, f64),
    AddString(u8),
    EndObject,
    Finish,
}

fuzz_target!(|input: BuilderInput| {
    let mut builder = Builder::options()
        .initial_capacity(input.initial_capacity as usize)
        .force_defaults(input.force_defaults)
        .build();

    // a value equal to its default is only written when forced
    let forced = input.force_defaults;
    let mut strings: Vec<Offset<StringTag>> = Vec::new();
    let mut tables = Vec::new();
    let mut written: Vec<(usize, i32)> = Vec::new();

    for op in input.operations.iter().take(256) {
        match op {
            Operation::CreateString(s) => {
                if let Ok(offset) = builder.create_string(s) {
                    strings.push(offset);
                }
            }
            Operation::CreateVector(items) => {
                let _ = builder.create_vector::<u32>(items);
            }
            Operation::StartObject(fields) => {
                if builder.start_object(*fields as usize % 32).is_ok() {
                    written.clear();
                }
            }
            Operation::AddU8(id, v) => {
                if builder.add_field::<u8>(*id as usize, *v, 0).is_ok() && (*v != 0 || forced) {
                    written.retain(|(other, _)| *other != *id as usize);
                }
            }
            Operation::AddI32(id, v) => {
                if builder.add_field::<i32>(*id as usize, *v, 0).is_ok() && (*v != 0 || forced) {
                    written.retain(|(other, _)| *other != *id as usize);
                    written.push((*id as usize, *v));
                }
            }
            Operation::AddF64(id, v) => {
                if builder.add_field::<f64>(*id as usize, *v, 0.0).is_ok() && (*v != 0.0 || forced) {
                    written.retain(|(other, _)| *other != *id as usize);
                }
            }
            Operation::AddString(id) => {
                if let Some(&s) = strings.last() {
                    if builder.add_offset(*id as usize, s).is_ok() {
                        written.retain(|(other, _)| *other != *id as usize);
                    }
                }
            }
            Operation::EndObject => {
                if let Ok(table) = builder.end_object() {
                    tables.push((table, std::mem::take(&mut written)));
                }
            }
            Operation::Finish => {
                if let Some((root, fields)) = tables.last() {
                    if builder.finish(*root, None).is_ok() {
                        let bytes = builder.finished_data().unwrap();
                        let table = root_table(bytes).unwrap();
                        for (id, value) in fields {
                            assert_eq!(table.get_i32(*id, 0).unwrap(), *value);
                        }
                    }
                }
                break;
            }
        }
    }
});
