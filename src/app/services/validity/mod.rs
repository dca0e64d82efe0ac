//! Row validity tracking and compaction
//!
//! Validity is row-level: the `valid` column holds `1.0` for usable rows and
//! `0.0` for rows flagged for removal. Flagging never drops data by itself;
//! rows disappear only when [`remove_invalid`] compacts the store, which
//! applies one keep-index set to every column at once.
//!
//! Beyond the built-in NaN/Infinity check, callers can plug in domain rules
//! through [`ValidityRule`].

use crate::app::services::column_store::ColumnStore;
use crate::constants::{VALID_TOKEN, validity};
use crate::{Error, Result};
use tracing::{debug, info, warn};

#[cfg(test)]
pub mod tests;

/// Domain-specific validity check run after the NaN/Infinity scan
///
/// Implementations return the rows they consider invalid; they never mutate
/// the store. Closures of the matching shape implement the trait.
pub trait ValidityRule {
    /// Rows to flag invalid
    fn invalid_rows(&self, store: &ColumnStore, sensor_count: usize) -> Vec<usize>;
}

impl<F> ValidityRule for F
where
    F: Fn(&ColumnStore, usize) -> Vec<usize>,
{
    fn invalid_rows(&self, store: &ColumnStore, sensor_count: usize) -> Vec<usize> {
        self(store, sensor_count)
    }
}

/// Outcome of a validity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityReport {
    /// Rows flagged invalid after the check
    pub invalid_rows: usize,

    /// Whether the invalid rows were compacted away
    pub removed: bool,
}

/// Set the validity flag of the given rows
///
/// All indices are checked before any flag changes.
pub fn mark_valid(store: &mut ColumnStore, indices: &[usize], state: bool) -> Result<()> {
    let size = store.size();
    if let Some(&bad) = indices.iter().find(|&&i| i >= size) {
        return Err(Error::index_out_of_range(bad, size));
    }

    let flag = if state {
        validity::VALID
    } else {
        validity::INVALID
    };
    let valid = store.column_mut(VALID_TOKEN)?;
    for &i in indices {
        valid[i] = flag;
    }
    Ok(())
}

/// Flag the given rows invalid
pub fn mark_invalid(store: &mut ColumnStore, indices: &[usize]) -> Result<()> {
    mark_valid(store, indices, false)
}

/// Rows whose flag is below valid
pub fn invalid_indices(store: &ColumnStore) -> Result<Vec<usize>> {
    store.find(VALID_TOKEN, |v| v < validity::VALID)
}

/// Rows that hold NaN or Infinity in any column
pub fn non_finite_rows(store: &ColumnStore) -> Vec<usize> {
    let mut flagged = vec![false; store.size()];
    for (_, values) in store.columns() {
        for (row, value) in values.iter().enumerate() {
            if !value.is_finite() {
                flagged[row] = true;
            }
        }
    }
    flagged
        .iter()
        .enumerate()
        .filter_map(|(row, &bad)| bad.then_some(row))
        .collect()
}

/// Flag non-finite rows and rows rejected by domain rules
///
/// Reports the number of invalid rows; when `remove_if_invalid` is set the
/// invalid rows are compacted right away.
pub fn check_data_validity(
    store: &mut ColumnStore,
    rules: &[&dyn ValidityRule],
    sensor_count: usize,
    remove_if_invalid: bool,
) -> Result<ValidityReport> {
    let non_finite = non_finite_rows(store);
    if !non_finite.is_empty() {
        debug!("{} rows hold NaN or Infinity values", non_finite.len());
    }
    mark_invalid(store, &non_finite)?;

    for rule in rules {
        let size = store.size();
        let (in_range, out_of_range): (Vec<usize>, Vec<usize>) = rule
            .invalid_rows(store, sensor_count)
            .into_iter()
            .partition(|&row| row < size);
        if !out_of_range.is_empty() {
            warn!(
                "Validity rule reported {} rows beyond the record count, ignored",
                out_of_range.len()
            );
        }
        mark_invalid(store, &in_range)?;
    }

    let mut report = ValidityReport {
        invalid_rows: invalid_indices(store)?.len(),
        removed: false,
    };

    if report.invalid_rows > 0 {
        info!(
            "Data validity check: found {} invalid data",
            report.invalid_rows
        );
        if remove_if_invalid {
            info!("Data validity check: remove invalid data");
            remove_invalid(store)?;
            report.removed = true;
        }
    }

    Ok(report)
}

/// Drop every row whose flag is not exactly valid
///
/// Returns the number of removed rows.
pub fn remove_invalid(store: &mut ColumnStore) -> Result<usize> {
    let keep = store.find(VALID_TOKEN, |v| v == validity::VALID)?;
    let removed = store.size() - keep.len();
    store.gather(&keep)?;
    if removed > 0 {
        debug!("Removed {} invalid rows, {} remain", removed, store.size());
    }
    Ok(removed)
}

/// Keep exactly the given rows
///
/// Surviving rows keep their storage order, not the order of `indices`.
pub fn filter(store: &mut ColumnStore, indices: &[usize]) -> Result<()> {
    let existing = store.find(VALID_TOKEN, |v| v > validity::EXISTING_THRESHOLD)?;
    // Validate before touching any flag
    let size = store.size();
    if let Some(&bad) = indices.iter().find(|&&i| i >= size) {
        return Err(Error::index_out_of_range(bad, size));
    }
    mark_valid(store, &existing, false)?;
    mark_valid(store, indices, true)?;
    remove_invalid(store)?;
    Ok(())
}

/// Drop the given rows, keeping the relative order of all others
pub fn remove(store: &mut ColumnStore, indices: &[usize]) -> Result<()> {
    mark_invalid(store, indices)?;
    remove_invalid(store)?;
    Ok(())
}
