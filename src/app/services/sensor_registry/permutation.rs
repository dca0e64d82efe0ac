//! Old-id to new-id mapping produced by sensor compaction

/// Sensor id remapping built once per compaction
///
/// Entry `i` holds the new id of old sensor `i`, or `None` when the sensor
/// was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorPermutation {
    mapping: Vec<Option<usize>>,
    new_count: usize,
}

impl SensorPermutation {
    /// Build the mapping from a keep-flag per old sensor id
    pub fn from_active(active: &[bool]) -> Self {
        let mut next = 0;
        let mapping = active
            .iter()
            .map(|&keep| {
                keep.then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();

        Self {
            mapping,
            new_count: next,
        }
    }

    /// New id of an old sensor id, `None` if it was dropped or never existed
    pub fn map(&self, old_id: usize) -> Option<usize> {
        self.mapping.get(old_id).copied().flatten()
    }

    /// Remap a stored sensor-index value
    ///
    /// Values outside `[0, old_count)` are returned unchanged; ids of dropped
    /// sensors become -1.
    pub fn remap_value(&self, value: f64) -> f64 {
        if value < 0.0 || value >= self.mapping.len() as f64 {
            return value;
        }
        match self.mapping[value as usize] {
            Some(new_id) => new_id as f64,
            None => -1.0,
        }
    }

    /// Sensor count before compaction
    pub fn old_count(&self) -> usize {
        self.mapping.len()
    }

    /// Sensor count after compaction
    pub fn new_count(&self) -> usize {
        self.new_count
    }

    /// Number of dropped sensors
    pub fn removed_count(&self) -> usize {
        self.mapping.len() - self.new_count
    }

    /// Whether every id maps to itself
    pub fn is_identity(&self) -> bool {
        self.new_count == self.mapping.len()
    }
}
