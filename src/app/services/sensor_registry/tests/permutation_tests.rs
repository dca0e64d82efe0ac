//! Tests for the old-id to new-id sensor mapping

use super::*;
use crate::app::services::sensor_registry::SensorPermutation;

#[test]
fn test_permutation_mapping() {
    let permutation = SensorPermutation::from_active(&[false, true, true, false]);

    assert_eq!(permutation.map(0), None);
    assert_eq!(permutation.map(1), Some(0));
    assert_eq!(permutation.map(2), Some(1));
    assert_eq!(permutation.map(3), None);
    assert_eq!(permutation.map(17), None);
    assert!(!permutation.is_identity());
}

#[test]
fn test_permutation_remap_value() {
    let permutation = SensorPermutation::from_active(&[false, true, true]);

    assert_eq!(permutation.remap_value(-1.0), -1.0);
    assert_eq!(permutation.remap_value(0.0), -1.0);
    assert_eq!(permutation.remap_value(1.0), 0.0);
    assert_eq!(permutation.remap_value(2.0), 1.0);
    // Stale ids beyond the old sensor count are left alone
    assert_eq!(permutation.remap_value(9.0), 9.0);
}

#[test]
fn test_identity_permutation() {
    let mut registry = registry_with_line(3);
    let permutation = registry.retain(&[true, true, true]);

    assert!(permutation.is_identity());
    assert_eq!(permutation.map(2), Some(2));
    assert_eq!(registry.sensor_count(), 3);
}
