//! Sensor registry with tolerance-based deduplication
//!
//! Sensors are identified by their position in the registry: ids are dense,
//! 0-based and append-only until an explicit compaction. Compaction returns a
//! [`SensorPermutation`] that callers use to remap every stored sensor id.

use crate::app::models::Pos;
use crate::{Error, Result};
use tracing::debug;

pub mod permutation;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use permutation::SensorPermutation;

/// Ordered list of unique sensor positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorRegistry {
    /// Sensor positions indexed by sensor id
    pub(crate) sensors: Vec<Pos>,
}

impl SensorRegistry {
    /// Create a new empty sensor registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of a sensor at `pos`, creating it if needed
    ///
    /// Scans existing sensors in id order and returns the first one closer
    /// than `tolerance`; otherwise appends `pos` and returns the new id.
    pub fn create_sensor(&mut self, pos: Pos, tolerance: f64) -> usize {
        if let Some(id) = self
            .sensors
            .iter()
            .position(|existing| pos.distance(existing) < tolerance)
        {
            return id;
        }

        self.sensors.push(pos);
        self.sensors.len() - 1
    }

    /// Number of sensors
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Position of a sensor by id
    pub fn position(&self, id: usize) -> Option<&Pos> {
        self.sensors.get(id)
    }

    /// All sensor positions in id order
    pub fn positions(&self) -> &[Pos] {
        &self.sensors
    }

    /// Move an existing sensor
    ///
    /// No deduplication is applied; the caller owns the resulting geometry.
    pub fn set_position(&mut self, id: usize, pos: Pos) -> Result<()> {
        let count = self.sensors.len();
        let slot = self
            .sensors
            .get_mut(id)
            .ok_or_else(|| Error::index_out_of_range(id, count))?;
        *slot = pos;
        Ok(())
    }

    /// Keep only the sensors flagged in `active`, preserving relative order
    ///
    /// `active` must have one entry per sensor. Returns the old-id to new-id
    /// mapping built for this compaction.
    pub fn retain(&mut self, active: &[bool]) -> SensorPermutation {
        debug_assert_eq!(active.len(), self.sensors.len());

        let permutation = SensorPermutation::from_active(active);
        let old = std::mem::take(&mut self.sensors);
        self.sensors = old
            .into_iter()
            .zip(active.iter())
            .filter_map(|(pos, &keep)| keep.then_some(pos))
            .collect();

        debug!(
            "Sensor compaction: {} -> {} sensors",
            permutation.old_count(),
            self.sensors.len()
        );

        permutation
    }

    /// Remove all sensors
    pub fn clear(&mut self) {
        self.sensors.clear();
    }
}
