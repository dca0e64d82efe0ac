//! Columnar storage for measurement data
//!
//! Every column is a sequence of `f64` keyed by its canonical token, and all
//! columns share one length: the record count. Columns come in two kinds:
//!
//! - plain numeric columns, padded with `0.0` on growth
//! - sensor-index columns, holding sensor ids or `-1` for "unset", padded
//!   with `-1.0` on growth
//!
//! The `valid` column always exists. Row count only shrinks through
//! [`ColumnStore::gather`], which rebuilds every column from one keep-index
//! set and swaps them in together.

use crate::constants::{VALID_TOKEN, fill};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, trace};

/// Token-keyed columns sharing one record count
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStore {
    /// Canonical token to column values, ordered by token
    columns: BTreeMap<String, Vec<f64>>,

    /// Length of every column
    record_count: usize,

    /// Tokens whose columns hold sensor ids
    sensor_index_tokens: BTreeSet<String>,

    /// Human-readable column descriptions
    descriptions: HashMap<String, String>,
}

impl Default for ColumnStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnStore {
    /// Create an empty store holding only the `valid` column
    pub fn new() -> Self {
        let mut columns = BTreeMap::new();
        columns.insert(VALID_TOKEN.to_string(), Vec::new());
        Self {
            columns,
            record_count: 0,
            sensor_index_tokens: BTreeSet::new(),
            descriptions: HashMap::new(),
        }
    }

    /// Number of records
    pub fn size(&self) -> usize {
        self.record_count
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Whether a column exists for the token
    pub fn exists(&self, token: &str) -> bool {
        self.columns.contains_key(token)
    }

    /// Column values for a token
    pub fn get(&self, token: &str) -> Result<&[f64]> {
        self.columns
            .get(token)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::unknown_token(token, self.token_list()))
    }

    /// Mutable view of a column
    ///
    /// The view has a fixed length, so it cannot break the shared record
    /// count, and it borrows the store so no resize can happen while it lives.
    pub fn column_mut(&mut self, token: &str) -> Result<&mut [f64]> {
        if !self.columns.contains_key(token) {
            return Err(Error::unknown_token(token, self.token_list()));
        }
        Ok(self
            .columns
            .get_mut(token)
            .map(Vec::as_mut_slice)
            .unwrap_or_default())
    }

    /// Insert or overwrite a column
    ///
    /// Fails with [`Error::SizeMismatch`] unless `values` has exactly one entry
    /// per record.
    pub fn set(&mut self, token: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.record_count {
            return Err(Error::size_mismatch(token, self.record_count, values.len()));
        }

        if !self.columns.contains_key(token) {
            debug!("Registering new column '{}'", token);
        }
        self.columns.insert(token.to_string(), values);
        Ok(())
    }

    /// Set a column and attach a description to it
    pub fn add(&mut self, token: &str, values: Vec<f64>, description: &str) -> Result<()> {
        self.set(token, values)?;
        self.set_description(token, description);
        Ok(())
    }

    /// Attach a description; ignored when the column does not exist
    pub fn set_description(&mut self, token: &str, description: &str) {
        if self.exists(token) {
            self.descriptions
                .insert(token.to_string(), description.to_string());
        }
    }

    /// Description of a column, empty when none was given
    pub fn description(&self, token: &str) -> &str {
        if !self.exists(token) {
            return "";
        }
        self.descriptions
            .get(token)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Mark a token as holding sensor ids
    ///
    /// A missing column is created and filled with `-1`; an existing column
    /// keeps its values.
    pub fn register_sensor_index(&mut self, token: &str) {
        self.sensor_index_tokens.insert(token.to_string());
        if !self.columns.contains_key(token) {
            debug!("Registering sensor index column '{}'", token);
            self.columns.insert(
                token.to_string(),
                vec![fill::SENSOR_INDEX; self.record_count],
            );
        }
    }

    /// Whether a token is registered as a sensor-index column
    pub fn is_sensor_index(&self, token: &str) -> bool {
        self.sensor_index_tokens.contains(token)
    }

    /// Registered sensor-index tokens
    pub fn sensor_index_tokens(&self) -> impl Iterator<Item = &str> {
        self.sensor_index_tokens.iter().map(String::as_str)
    }

    /// Padding value for a column of this token
    pub fn fill_value(&self, token: &str) -> f64 {
        if self.is_sensor_index(token) {
            fill::SENSOR_INDEX
        } else {
            fill::NUMERIC
        }
    }

    /// Grow every column to `new_count` records
    ///
    /// Sensor-index columns are padded with `-1.0`, all others with `0.0`.
    /// Shrinking is refused; rows are only dropped through compaction.
    pub fn resize(&mut self, new_count: usize) -> Result<()> {
        if new_count < self.record_count {
            return Err(Error::invalid_resize(self.record_count, new_count));
        }

        for (token, values) in self.columns.iter_mut() {
            let pad = if self.sensor_index_tokens.contains(token) {
                fill::SENSOR_INDEX
            } else {
                fill::NUMERIC
            };
            values.resize(new_count, pad);
        }
        self.record_count = new_count;
        Ok(())
    }

    /// Known tokens in storage order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Known tokens joined by single spaces
    pub fn token_list(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" ")
    }

    /// All columns in storage order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(token, values)| (token.as_str(), values.as_slice()))
    }

    /// Sensor-index columns in storage order
    pub fn sensor_index_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns()
            .filter(|(token, _)| self.sensor_index_tokens.contains(*token))
    }

    /// Row indices where `predicate` holds for the token's column
    pub fn find(&self, token: &str, predicate: impl Fn(f64) -> bool) -> Result<Vec<usize>> {
        Ok(self
            .get(token)?
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| predicate(v).then_some(i))
            .collect())
    }

    /// Rebuild every column from the rows listed in `keep`
    ///
    /// `keep` must hold valid row indices; the new record count is its length.
    /// All new columns are built before any is replaced.
    pub(crate) fn gather(&mut self, keep: &[usize]) -> Result<()> {
        if let Some(&bad) = keep.iter().find(|&&i| i >= self.record_count) {
            return Err(Error::index_out_of_range(bad, self.record_count));
        }

        let gathered: BTreeMap<String, Vec<f64>> = self
            .columns
            .iter()
            .map(|(token, values)| (token.clone(), keep.iter().map(|&i| values[i]).collect()))
            .collect();

        trace!(
            "Gathered {} columns: {} -> {} records",
            gathered.len(),
            self.record_count,
            keep.len()
        );

        self.columns = gathered;
        self.record_count = keep.len();
        Ok(())
    }

    /// Apply a value mapping to every sensor-index column
    pub(crate) fn map_sensor_indices(&mut self, mapping: impl Fn(f64) -> f64) {
        for (token, values) in self.columns.iter_mut() {
            if self.sensor_index_tokens.contains(token) {
                values.iter_mut().for_each(|v| *v = mapping(*v));
            }
        }
    }

    /// Replace every column with `count` fill values
    ///
    /// Used before ingesting a file; registered sensor-index columns survive
    /// as all `-1`.
    pub(crate) fn reset_rows(&mut self, count: usize) {
        for (token, values) in self.columns.iter_mut() {
            let pad = if self.sensor_index_tokens.contains(token) {
                fill::SENSOR_INDEX
            } else {
                fill::NUMERIC
            };
            *values = vec![pad; count];
        }
        self.record_count = count;
    }

    /// Drop all data columns and descriptions
    ///
    /// Leaves an empty `valid` column and empty registered sensor-index
    /// columns behind.
    pub fn clear(&mut self) {
        let registered = self.sensor_index_tokens.clone();
        self.columns
            .retain(|token, _| token == VALID_TOKEN || registered.contains(token));
        self.columns.values_mut().for_each(Vec::clear);
        self.descriptions.clear();
        self.record_count = 0;
    }
}
