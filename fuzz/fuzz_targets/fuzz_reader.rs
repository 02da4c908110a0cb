//! Fuzz testing for reading untrusted buffers.
//!
//! Arbitrary bytes are treated as a finished buffer and every accessor is
//! exercised. Errors are expected; panics are bugs.

#![no_main]

use libfuzzer_sys::fuzz_target;

use flatlay::reader::{buffer_identifier, root_table, size_prefixed_root_table, Table};

fn walk(table: Table<'_>, depth: usize) {
    if depth > 4 {
        return;
    }
    let field_count = match table.vtable() {
        Ok(vtable) => vtable.field_count().min(16),
        Err(_) => return,
    };
    for id in 0..field_count {
        let _ = table.get_u8(id, 0);
        let _ = table.get_i64(id, 0);
        let _ = table.get_f64(id, 0.0);
        let _ = table.get_str(id);
        if let Ok(Some(v)) = table.get_vector::<u32>(id) {
            for item in v.iter().take(64) {
                let _ = item;
            }
        }
        if let Ok(Some(v)) = table.get_vector::<&str>(id) {
            for item in v.iter().take(64) {
                let _ = item;
            }
        }
        if let Ok(Some(v)) = table.get_vector::<Table>(id) {
            for child in v.iter().take(8).flatten() {
                walk(child, depth + 1);
            }
            let _ = v.lookup_by_key(0, "key");
        }
        if let Ok(Some(child)) = table.get_table(id) {
            walk(child, depth + 1);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let _ = buffer_identifier(data, false);
    let _ = buffer_identifier(data, true);

    if let Ok(table) = root_table(data) {
        walk(table, 0);
    }
    if let Ok(table) = size_prefixed_root_table(data) {
        walk(table, 0);
    }
});
