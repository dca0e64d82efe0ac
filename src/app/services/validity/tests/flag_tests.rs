//! Tests for validity flags, the non-finite scan and domain rules

use super::*;
use crate::Error;
use crate::app::services::column_store::ColumnStore;
use crate::app::services::validity::{
    ValidityReport, ValidityRule, check_data_validity, mark_valid, non_finite_rows,
};
use crate::constants::VALID_TOKEN;

#[test]
fn test_mark_valid_sets_flags() {
    let mut store = five_row_store();
    mark_valid(&mut store, &[1, 3], false).unwrap();
    assert_eq!(
        store.get(VALID_TOKEN).unwrap(),
        &[1.0, 0.0, 1.0, 0.0, 1.0]
    );

    mark_valid(&mut store, &[3], true).unwrap();
    assert_eq!(
        store.get(VALID_TOKEN).unwrap(),
        &[1.0, 0.0, 1.0, 1.0, 1.0]
    );
}

#[test]
fn test_mark_valid_out_of_range_changes_nothing() {
    let mut store = five_row_store();
    let result = mark_valid(&mut store, &[0, 7], false);

    assert!(matches!(
        result,
        Err(Error::IndexOutOfRange { index: 7, size: 5 })
    ));
    assert_eq!(store.get(VALID_TOKEN).unwrap(), &[1.0; 5]);
}

#[test]
fn test_non_finite_values_invalidate_whole_row() {
    let mut store = five_row_store();
    store.column_mut("a").unwrap()[1] = f64::NAN;
    store.column_mut("b").unwrap()[3] = f64::INFINITY;
    store.column_mut("b").unwrap()[4] = f64::NEG_INFINITY;

    let report = check_data_validity(&mut store, &[], 0, false).unwrap();

    assert_eq!(report.invalid_rows, 3);
    assert!(!report.removed);
    assert_eq!(
        store.get(VALID_TOKEN).unwrap(),
        &[1.0, 0.0, 1.0, 0.0, 0.0]
    );
    assert_eq!(store.size(), 5);
}

#[test]
fn test_check_data_validity_with_removal() {
    let mut store = five_row_store();
    store.column_mut("a").unwrap()[2] = f64::NAN;

    let report = check_data_validity(&mut store, &[], 0, true).unwrap();

    assert_eq!(report.invalid_rows, 1);
    assert!(report.removed);
    assert_eq!(store.size(), 4);
    assert_eq!(store.get("b").unwrap(), &[0.0, 10.0, 30.0, 40.0]);
    assert_lengths_consistent(&store);
}

#[test]
fn test_check_data_validity_clean_store() {
    let mut store = five_row_store();
    let report = check_data_validity(&mut store, &[], 0, true).unwrap();
    assert_eq!(report, ValidityReport::default());
    assert_eq!(store.size(), 5);
}

#[test]
fn test_domain_rule_flags_additional_rows() {
    let mut store = five_row_store();
    let large_b = |store: &ColumnStore, _sensor_count: usize| {
        store.find("b", |v| v >= 30.0).unwrap_or_default()
    };
    let out_of_range = |_store: &ColumnStore, _sensor_count: usize| vec![99];
    let rules: [&dyn ValidityRule; 2] = [&large_b, &out_of_range];

    let report = check_data_validity(&mut store, &rules, 0, false).unwrap();

    assert_eq!(report.invalid_rows, 2);
    assert_eq!(
        store.get(VALID_TOKEN).unwrap(),
        &[1.0, 1.0, 1.0, 0.0, 0.0]
    );
}

#[test]
fn test_domain_rule_receives_sensor_count() {
    let mut store = five_row_store();
    let rule = |store: &ColumnStore, sensor_count: usize| {
        store
            .find("a", |v| v >= sensor_count as f64)
            .unwrap_or_default()
    };

    let rules: [&dyn ValidityRule; 1] = [&rule];

    let report = check_data_validity(&mut store, &rules, 3, false).unwrap();
    assert_eq!(report.invalid_rows, 2);
}

#[test]
fn test_non_finite_rows() {
    let mut store = five_row_store();
    store.column_mut("a").unwrap()[0] = f64::NAN;
    store.column_mut("b").unwrap()[0] = f64::NAN;
    store.column_mut("b").unwrap()[2] = f64::INFINITY;
    assert_eq!(non_finite_rows(&store), vec![0, 2]);
}
