//! Tests for removing, filtering and compacting rows

use super::*;
use crate::app::services::validity::{filter, mark_invalid, remove, remove_invalid};
use crate::constants::VALID_TOKEN;

#[test]
fn test_remove_invalid_compacts_all_columns() {
    let mut store = five_row_store();
    store.register_sensor_index("s");
    store.set("s", vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
    mark_invalid(&mut store, &[0, 2]).unwrap();

    let removed = remove_invalid(&mut store).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(store.size(), 3);
    assert_eq!(store.get("a").unwrap(), &[1.0, 3.0, 4.0]);
    assert_eq!(store.get("s").unwrap(), &[1.0, 3.0, 4.0]);
    assert_eq!(store.get(VALID_TOKEN).unwrap(), &[1.0, 1.0, 1.0]);
    assert_lengths_consistent(&store);
}

#[test]
fn test_filter_keeps_storage_order() {
    let mut store = five_row_store();
    filter(&mut store, &[3, 1]).unwrap();

    assert_eq!(store.size(), 2);
    assert_eq!(store.get("a").unwrap(), &[1.0, 3.0]);
    assert_eq!(store.get("b").unwrap(), &[10.0, 30.0]);
    assert_lengths_consistent(&store);
}

#[test]
fn test_filter_revalidates_selected_rows() {
    let mut store = five_row_store();
    mark_invalid(&mut store, &[1]).unwrap();

    filter(&mut store, &[1, 4]).unwrap();
    assert_eq!(store.get("a").unwrap(), &[1.0, 4.0]);
}

#[test]
fn test_filter_out_of_range_changes_nothing() {
    let mut store = five_row_store();
    assert!(filter(&mut store, &[1, 9]).is_err());
    assert_eq!(store.size(), 5);
    assert_eq!(store.get(VALID_TOKEN).unwrap(), &[1.0; 5]);
}

#[test]
fn test_remove_preserves_relative_order() {
    let mut store = five_row_store();
    remove(&mut store, &[3, 0]).unwrap();

    assert_eq!(store.size(), 3);
    assert_eq!(store.get("a").unwrap(), &[1.0, 2.0, 4.0]);
    assert_eq!(store.get("b").unwrap(), &[10.0, 20.0, 40.0]);
}

#[test]
fn test_remove_everything() {
    let mut store = five_row_store();
    remove(&mut store, &[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(store.size(), 0);
    assert!(store.is_empty());
    assert_lengths_consistent(&store);
}
