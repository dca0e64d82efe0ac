//! Sensor removal and registry compaction
//!
//! Removing sensors touches both halves of a container: rows referencing a
//! removed sensor are invalidated and compacted away, then the registry drops
//! every sensor no row refers to and all sensor-index columns are remapped
//! through the resulting [`SensorPermutation`].

use crate::app::services::column_store::ColumnStore;
use crate::app::services::sensor_registry::{SensorPermutation, SensorRegistry};
use crate::app::services::validity;
use crate::Result;
use tracing::{debug, info};

/// Flags, per sensor id, whether any row references it
pub fn active_sensors(store: &ColumnStore, sensor_count: usize) -> Vec<bool> {
    let mut active = vec![false; sensor_count];
    for (_, values) in store.sensor_index_columns() {
        for &value in values {
            if value >= 0.0 && value < sensor_count as f64 {
                active[value as usize] = true;
            }
        }
    }
    active
}

/// Drop sensors no row references and renumber all sensor-index columns
///
/// Callers must invalidate and compact rows that reference a sensor before
/// asking for its removal; this pass only sees what is still stored.
pub fn remove_unused_sensors(
    store: &mut ColumnStore,
    registry: &mut SensorRegistry,
) -> SensorPermutation {
    let active = active_sensors(store, registry.sensor_count());
    let permutation = registry.retain(&active);

    if !permutation.is_identity() {
        store.map_sensor_indices(|value| permutation.remap_value(value));
        info!(
            "Removed {} unused sensors, {} remain",
            permutation.removed_count(),
            permutation.new_count()
        );
    }

    permutation
}

/// Remove sensors by id together with every row that references them
///
/// Returns the permutation applied to the surviving sensor ids.
pub fn remove_sensor_indices(
    store: &mut ColumnStore,
    registry: &mut SensorRegistry,
    ids: &[usize],
) -> Result<SensorPermutation> {
    let mut rows: Vec<usize> = Vec::new();
    for (token, values) in store.sensor_index_columns() {
        let before = rows.len();
        rows.extend(
            values
                .iter()
                .enumerate()
                .filter(|(_, value)| ids.iter().any(|&id| **value == id as f64))
                .map(|(row, _)| row),
        );
        debug!(
            "Column '{}': {} rows reference removed sensors",
            token,
            rows.len() - before
        );
    }

    validity::mark_invalid(store, &rows)?;
    validity::remove_invalid(store)?;
    Ok(remove_unused_sensors(store, registry))
}

/// Invalidate rows whose sensor index is beyond the current sensor count
///
/// Returns the number of rows flagged.
pub fn mark_invalid_sensor_indices(store: &mut ColumnStore, sensor_count: usize) -> Result<usize> {
    let limit = sensor_count as f64;
    let mut rows: Vec<usize> = store
        .sensor_index_columns()
        .flat_map(|(_, values)| {
            values
                .iter()
                .enumerate()
                .filter(move |(_, value)| **value >= limit)
                .map(|(row, _)| row)
        })
        .collect();
    rows.sort_unstable();
    rows.dedup();

    if !rows.is_empty() {
        info!(
            "{} rows reference sensors beyond the sensor count {}",
            rows.len(),
            sensor_count
        );
    }
    validity::mark_invalid(store, &rows)?;
    Ok(rows.len())
}
