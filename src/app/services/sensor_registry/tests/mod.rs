//! Tests for sensor registry deduplication and compaction

use super::SensorRegistry;
use crate::app::models::Pos;

mod permutation_tests;

pub fn registry_with_line(count: usize) -> SensorRegistry {
    let mut registry = SensorRegistry::new();
    for i in 0..count {
        registry.create_sensor(Pos::new(i as f64, 0.0, 0.0), 1e-6);
    }
    registry
}
