//! Three-block text format writer
//!
//! A [`WritePlan`] resolves every requested token against the container
//! before anything is written, so an unknown token never leaves a partial
//! file behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use super::column_mapping::{CoordinateColumn, sensor_column};
use super::number_format::{format_integer, format_position, format_scientific};
use super::stats::SaveStats;
use crate::app::container::DataContainer;
use crate::app::models::Pos;
use crate::constants::{
    DEFAULT_SENSOR_FORMAT, SELECT_ALL, VALID_TOKEN, blocks, coordinates, validity,
};
use crate::{Error, Result};

const SEPARATOR: &str = "\t";

/// How a data column's values are rendered
#[derive(Debug, Clone, Copy, PartialEq)]
enum ValueKind {
    /// Sensor index, shifted to the index origin on file
    SensorIndex { offset: i64 },
    /// Validity flag
    Flag,
    /// Measurement value
    Float,
}

#[derive(Debug)]
struct PlannedColumn<'c> {
    values: &'c [f64],
    kind: ValueKind,
}

/// Fully resolved content of one save
#[derive(Debug)]
pub struct WritePlan<'c> {
    sensors: &'c [Pos],
    sensor_tokens: Vec<String>,
    sensor_columns: Vec<CoordinateColumn>,
    data_tokens: Vec<String>,
    data_columns: Vec<PlannedColumn<'c>>,
    rows: Vec<usize>,
    topography: &'c [Pos],
    precision: usize,
}

impl<'c> WritePlan<'c> {
    /// Resolve the column orders against a container
    ///
    /// `data_format` is a whitespace-separated token list, or `all` to write
    /// every column and every row ever created. Otherwise only valid rows are
    /// written. An empty `sensor_format` falls back to `x y z`.
    pub fn new(container: &'c DataContainer, data_format: &str, sensor_format: &str) -> Result<Self> {
        let sensor_format = if sensor_format.trim().is_empty() {
            DEFAULT_SENSOR_FORMAT
        } else {
            sensor_format
        };
        let sensor_tokens: Vec<String> =
            sensor_format.split_whitespace().map(str::to_string).collect();
        let sensor_columns = sensor_tokens
            .iter()
            .map(|token| {
                sensor_column(token).ok_or_else(|| Error::unknown_column_token(blocks::SENSOR, token))
            })
            .collect::<Result<Vec<_>>>()?;

        let store = container.store();
        let select_all = data_format.trim().eq_ignore_ascii_case(SELECT_ALL);
        let (data_tokens, rows): (Vec<String>, Vec<usize>) = if select_all {
            (
                store.tokens().map(str::to_string).collect(),
                store.find(VALID_TOKEN, |v| v > validity::EXISTING_THRESHOLD)?,
            )
        } else {
            (
                data_format.split_whitespace().map(str::to_string).collect(),
                store.find(VALID_TOKEN, |v| v == validity::VALID)?,
            )
        };

        let offset = i64::from(container.config().sensor_index_from_one);
        let translator = container.translator();
        let data_columns = data_tokens
            .iter()
            .map(|token| -> Result<PlannedColumn<'c>> {
                let name = translator.resolve(token);
                let kind = if store.is_sensor_index(name) {
                    ValueKind::SensorIndex { offset }
                } else if name == VALID_TOKEN {
                    ValueKind::Flag
                } else {
                    ValueKind::Float
                };
                Ok(PlannedColumn {
                    values: store.get(name)?,
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sensors: container.sensor_positions(),
            sensor_tokens,
            sensor_columns,
            data_tokens,
            data_columns,
            rows,
            topography: container.additional_points(),
            precision: container.config().float_precision,
        })
    }

    /// Number of data rows the plan writes
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// Write all blocks
    pub fn write_to(&self, out: &mut impl Write) -> Result<SaveStats> {
        // Sensor block
        writeln!(out, "{}", self.sensors.len())?;
        writeln!(out, "# {}", self.sensor_tokens.join(" "))?;
        for pos in self.sensors {
            let fields: Vec<String> = self
                .sensor_columns
                .iter()
                .map(|column| {
                    format_position(column.from_metres(column.axis.of(pos)), self.precision)
                })
                .collect();
            writeln!(out, "{}", fields.join(SEPARATOR))?;
        }

        // Data block
        writeln!(out, "{}", self.rows.len())?;
        let order_line = format!("# {}", self.data_tokens.join(" "));
        writeln!(out, "{}", order_line.trim_end())?;
        for &row in &self.rows {
            let fields: Vec<String> = self
                .data_columns
                .iter()
                .map(|column| self.format_value(column, row))
                .collect();
            writeln!(out, "{}", fields.join(SEPARATOR))?;
        }

        // Topography block
        writeln!(out, "{}", self.topography.len())?;
        if !self.topography.is_empty() {
            writeln!(
                out,
                "# {} {} {}",
                coordinates::X[0],
                coordinates::Y[0],
                coordinates::Z[0]
            )?;
            for pos in self.topography {
                writeln!(
                    out,
                    "{}{sep}{}{sep}{}",
                    format_position(pos.x, self.precision),
                    format_position(pos.y, self.precision),
                    format_position(pos.z, self.precision),
                    sep = SEPARATOR
                )?;
            }
        }

        Ok(SaveStats {
            sensors: self.sensors.len(),
            records: self.rows.len(),
            columns: self.data_columns.len(),
            topography_points: self.topography.len(),
        })
    }

    fn format_value(&self, column: &PlannedColumn<'_>, row: usize) -> String {
        let value = column.values[row];
        match column.kind {
            ValueKind::SensorIndex { offset } => format_integer(value, offset),
            ValueKind::Flag => format_integer(value, 0),
            ValueKind::Float => format_scientific(value, self.precision),
        }
    }
}

/// Save a container to a file
pub fn write_file(
    container: &DataContainer,
    path: &Path,
    data_format: &str,
    sensor_format: &str,
) -> Result<SaveStats> {
    let plan = WritePlan::new(container, data_format, sensor_format)?;
    debug!(
        "Writing {} sensors and {} data rows to {}",
        plan.sensors.len(),
        plan.record_count(),
        path.display()
    );

    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create file {}", path.display()), e))?;
    let mut out = BufWriter::new(file);
    let stats = plan.write_to(&mut out)?;
    out.flush()
        .map_err(|e| Error::io(format!("Failed to write file {}", path.display()), e))?;

    info!(
        "Saved {} sensors, {} data rows to {}",
        stats.sensors,
        stats.records,
        path.display()
    );
    Ok(stats)
}
