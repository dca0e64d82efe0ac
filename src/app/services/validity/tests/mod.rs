//! Tests for row validity flagging and compaction

use super::*;

mod compaction_tests;
mod flag_tests;

/// Five rows, column `a` = 0..5, column `b` = 10 * a, all rows valid
pub fn five_row_store() -> ColumnStore {
    let mut store = ColumnStore::new();
    store.resize(5).unwrap();
    store.set("a", vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
    store.set("b", vec![0.0, 10.0, 20.0, 30.0, 40.0]).unwrap();
    store.set(VALID_TOKEN, vec![1.0; 5]).unwrap();
    store
}

pub fn assert_lengths_consistent(store: &ColumnStore) {
    for (token, values) in store.columns() {
        assert_eq!(values.len(), store.size(), "column '{}' length", token);
    }
}
