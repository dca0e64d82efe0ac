//! Survey Data Container Library
//!
//! A Rust library for holding sensor-based survey measurements in a columnar,
//! row-validated store and moving them to and from a line-oriented text format.
//!
//! This library provides tools for:
//! - Parsing the three-block text format (sensors, data, topography)
//! - Deduplicating sensor positions within a tolerance
//! - Storing measurement columns with a strict shared record count
//! - Flagging, filtering and compacting rows through a validity mask
//! - Removing sensors and renumbering every sensor-index column
//! - Writing the format back with a caller-chosen column order

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod container;
    pub mod models;
    pub mod services {
        pub mod alias_translator;
        pub mod column_store;
        pub mod data_format;
        pub mod sensor_maintenance;
        pub mod sensor_registry;
        pub mod validity;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::container::DataContainer;
pub use app::models::Pos;
pub use app::services::validity::{ValidityReport, ValidityRule};
pub use config::ContainerConfig;

/// Result type alias for survey data operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading, saving and mutating a data container
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed block header, count or field
    #[error("Format error in file '{file}': {message}")]
    Format { file: String, message: String },

    /// A block declared more rows than the stream holds
    #[error("Too few rows in {block} block: {expected} expected but {found} found")]
    TooFewRows {
        block: String,
        expected: usize,
        found: usize,
    },

    /// Column token that the block cannot interpret
    #[error("Unknown column token in {block} block: '{token}'")]
    UnknownColumnToken { block: String, token: String },

    /// Column length does not match the record count
    #[error("Wrong data size for '{token}': container holds {expected} records, got {found}")]
    SizeMismatch {
        token: String,
        expected: usize,
        found: usize,
    },

    /// Column lookup for a token that is not registered
    #[error("Unknown token '{token}', available are: {available}")]
    UnknownToken { token: String, available: String },

    /// Row index outside the record range
    #[error("Row index {index} out of range for {size} records")]
    IndexOutOfRange { index: usize, size: usize },

    /// Resize would drop rows
    #[error("Cannot resize from {current} to {requested} records without compaction")]
    InvalidResize { current: usize, requested: usize },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a format error
    pub fn format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a too-few-rows error
    pub fn too_few_rows(block: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::TooFewRows {
            block: block.into(),
            expected,
            found,
        }
    }

    /// Create an unknown column token error
    pub fn unknown_column_token(block: impl Into<String>, token: impl Into<String>) -> Self {
        Self::UnknownColumnToken {
            block: block.into(),
            token: token.into(),
        }
    }

    /// Create a size mismatch error
    pub fn size_mismatch(token: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::SizeMismatch {
            token: token.into(),
            expected,
            found,
        }
    }

    /// Create an unknown token error listing the tokens that do exist
    pub fn unknown_token(token: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownToken {
            token: token.into(),
            available: available.into(),
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, size: usize) -> Self {
        Self::IndexOutOfRange { index, size }
    }

    /// Create an invalid resize error
    pub fn invalid_resize(current: usize, requested: usize) -> Self {
        Self::InvalidResize { current, requested }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
