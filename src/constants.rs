//! Application constants for the survey data container
//!
//! This module contains the format tokens, default values and numeric
//! thresholds used throughout the container, parser and writer.

// =============================================================================
// Column Tokens
// =============================================================================

/// Token of the distinguished row validity column
pub const VALID_TOKEN: &str = "valid";

/// Validity mask values
pub mod validity {
    /// Row is usable
    pub const VALID: f64 = 1.0;

    /// Row is flagged for removal
    pub const INVALID: f64 = 0.0;

    /// Lower bound that every row ever created exceeds
    pub const EXISTING_THRESHOLD: f64 = -1.0;
}

/// Fill values used when a column grows
pub mod fill {
    /// Plain numeric columns
    pub const NUMERIC: f64 = 0.0;

    /// Sensor-index columns ("no sensor")
    pub const SENSOR_INDEX: f64 = -1.0;
}

// =============================================================================
// Text Format
// =============================================================================

/// Comment marker that also introduces a column-order line
pub const COMMENT_MARKER: char = '#';

/// Default column order of the sensor and topography blocks
pub const DEFAULT_SENSOR_FORMAT: &str = "x y z";

/// Data selection keyword that writes every row ever created
pub const SELECT_ALL: &str = "all";

/// Block names used in error messages and warnings
pub mod blocks {
    pub const SENSOR: &str = "sensor";
    pub const DATA: &str = "data";
    pub const TOPOGRAPHY: &str = "topography";
}

/// Coordinate tokens accepted by the sensor and topography blocks
pub mod coordinates {
    pub const X: &[&str] = &["x", "X"];
    pub const Y: &[&str] = &["y", "Y"];
    pub const Z: &[&str] = &["z", "Z"];

    /// Millimetre variants, accepted in the sensor block only
    pub const X_MM: &[&str] = &["x/mm", "X/mm"];
    pub const Y_MM: &[&str] = &["y/mm", "Y/mm"];
    pub const Z_MM: &[&str] = &["z/mm", "Z/mm"];

    /// Divisor that converts millimetres to metres
    pub const MM_PER_M: f64 = 1000.0;
}

// =============================================================================
// Numeric Defaults
// =============================================================================

/// Grid that parsed sensor and topography positions are snapped to
pub const POSITION_ROUNDING: f64 = 1e-12;

/// Default distance below which two sensors are considered identical
pub const DEFAULT_SENSOR_TOLERANCE: f64 = 1e-6;

/// Digits after the decimal point in written floating point values
pub const DEFAULT_FLOAT_PRECISION: usize = 14;

/// Largest precision that still carries information for an f64
pub const MAX_FLOAT_PRECISION: usize = 17;

// =============================================================================
// Unit Translation
// =============================================================================

/// Alias name fragments marking raw milli-units
pub const MILLI_UNIT_MARKERS: &[&str] = &["mV", "mA", "ms"];

/// Scale applied to milli-unit aliases on ingest
pub const MILLI_UNIT_SCALE: f64 = 1.0 / 1000.0;

// =============================================================================
// Configuration
// =============================================================================

/// Directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "survey-data";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
