//! Load and save statistics for the text format
//!
//! These types report what a load or save touched, for logging and for the
//! CLI summaries.

use crate::app::models::Pos;
use serde::{Deserialize, Serialize};

/// Column read from the data block, in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColumn {
    /// Token exactly as written in the column order line
    pub token: String,

    /// One value per data row
    pub values: Vec<f64>,
}

/// Content of one file before it is merged into a container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    /// Column order of the sensor block
    pub sensor_format: Vec<String>,

    /// Sensor positions in file order, snapped to the rounding grid
    pub sensors: Vec<Pos>,

    /// Column order of the data block, if the block had rows
    pub data_format: Option<Vec<String>>,

    /// Number of data rows
    pub record_count: usize,

    /// Data columns
    pub columns: Vec<ParsedColumn>,

    /// Topography points
    pub topography: Vec<Pos>,

    /// Number of non-fatal problems reported while parsing
    pub warnings: usize,
}

/// Statistics of a completed load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Sensors declared in the sensor block
    pub sensors_declared: usize,

    /// Sensors added to the registry; the rest matched existing positions
    pub sensors_created: usize,

    /// Data rows read
    pub records: usize,

    /// Rows flagged invalid by the validity check
    pub invalid_records: usize,

    /// Whether invalid rows were removed right after loading
    pub invalid_removed: bool,

    /// Topography points read
    pub topography_points: usize,

    /// Non-fatal problems reported while parsing
    pub warnings: usize,
}

impl LoadStats {
    /// Sensors merged into an existing registry entry
    pub fn sensors_merged(&self) -> usize {
        self.sensors_declared - self.sensors_created
    }
}

/// Statistics of a completed save
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveStats {
    /// Sensors written
    pub sensors: usize,

    /// Data rows written
    pub records: usize,

    /// Data columns written per row
    pub columns: usize,

    /// Topography points written
    pub topography_points: usize,
}
