//! Line-oriented text format for survey data files
//!
//! A file holds up to three blocks, each starting with a count line:
//!
//! ```text
//! 2               # sensor count
//! # x z           # optional column order, defaults to "x y z"
//! 0 0
//! 5 0
//! 2               # data count
//! # a b           # column order, must follow the count line directly
//! 1 10
//! 2 20
//! 1               # optional topography count
//! # x y z
//! 2.5 0 0
//! ```
//!
//! Text after `#` is a comment; blank lines are skipped.
//!
//! ## Architecture
//!
//! - [`lines`] - Line cursor with comment stripping and order-line lookahead
//! - [`column_mapping`] - Coordinate tokens of the sensor and topography blocks
//! - [`parser`] - Block parsing into a [`ParsedFile`]
//! - [`writer`] - Column-order resolution and output
//! - [`number_format`] - Number rendering for written files
//! - [`stats`] - Parse results and load/save statistics

pub mod column_mapping;
pub mod lines;
pub mod number_format;
pub mod parser;
pub mod stats;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use parser::{DataFileParser, parse_file, parse_str};
pub use stats::{LoadStats, ParsedColumn, ParsedFile, SaveStats};
pub use writer::{WritePlan, write_file};
