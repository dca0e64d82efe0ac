//! Three-block text format parser
//!
//! Reads the sensor block, the data block and the optional topography block
//! into a [`ParsedFile`]. The parser does not touch a container: dedup of
//! sensors, alias translation and index origin are applied by the caller when
//! it merges the result, so a failed parse leaves the container unchanged.

use std::path::Path;
use tracing::{debug, warn};

use super::column_mapping::{CoordinateColumn, sensor_column, topography_column};
use super::lines::LineReader;
use super::stats::{ParsedColumn, ParsedFile};
use crate::app::models::Pos;
use crate::constants::{DEFAULT_SENSOR_FORMAT, POSITION_ROUNDING, blocks};
use crate::{Error, Result};

/// Parser for one file's content
#[derive(Debug)]
pub struct DataFileParser<'a> {
    source: String,
    reader: LineReader<'a>,
    warnings: usize,
}

impl<'a> DataFileParser<'a> {
    /// Create a parser; `source` names the content in errors and logs
    pub fn new(content: &'a str, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            reader: LineReader::new(content),
            warnings: 0,
        }
    }

    /// Parse all blocks
    ///
    /// `fill_value` gives the value for data fields a row leaves out, keyed
    /// by the column token as written.
    pub fn parse(mut self, fill_value: impl Fn(&str) -> f64) -> Result<ParsedFile> {
        let mut parsed = ParsedFile::default();

        self.parse_sensor_block(&mut parsed)?;
        debug!(
            "{}: {} sensors in order '{}'",
            self.source,
            parsed.sensors.len(),
            parsed.sensor_format.join(" ")
        );

        self.parse_data_block(&mut parsed, &fill_value)?;
        debug!(
            "{}: {} data rows, {} columns",
            self.source,
            parsed.record_count,
            parsed.columns.len()
        );

        self.parse_topography_block(&mut parsed)?;

        parsed.warnings = self.warnings;
        Ok(parsed)
    }

    fn parse_sensor_block(&mut self, parsed: &mut ParsedFile) -> Result<()> {
        let row = self
            .reader
            .next_row()
            .ok_or_else(|| self.error("cannot determine data format, file holds no rows"))?;
        let count = self.parse_count(blocks::SENSOR, &row)?;
        if count < 1 {
            return Err(self.error(format!("cannot determine sensor count, read {}", count)));
        }
        let count = count as usize;

        parsed.sensor_format = match self.reader.take_format_line_after_blanks() {
            Some(tokens) if tokens.is_empty() => {
                return Err(self.error("empty column order line in sensor block"));
            }
            Some(tokens) => tokens.into_iter().map(str::to_string).collect(),
            None => DEFAULT_SENSOR_FORMAT
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        };

        let mut columns: Vec<Option<CoordinateColumn>> = Vec::new();
        for token in &parsed.sensor_format {
            let column = sensor_column(token);
            if column.is_none() {
                warn!(
                    "{}: ignoring unknown sensor column '{}'",
                    self.source, token
                );
                self.warnings += 1;
            }
            columns.push(column);
        }

        for found in 0..count {
            let row = self
                .reader
                .next_row()
                .ok_or_else(|| Error::too_few_rows(blocks::SENSOR, count, found))?;
            let pos = self.parse_position(&row, &columns)?;
            parsed.sensors.push(pos.round(POSITION_ROUNDING));
        }

        Ok(())
    }

    fn parse_data_block(
        &mut self,
        parsed: &mut ParsedFile,
        fill_value: &impl Fn(&str) -> f64,
    ) -> Result<()> {
        let row = self
            .reader
            .next_row()
            .ok_or_else(|| self.error("cannot determine data size, data block is missing"))?;
        let count = self.parse_count(blocks::DATA, &row)?;
        if count < 0 {
            return Err(self.error(format!("cannot determine data size, read {}", count)));
        }
        let count = count as usize;
        parsed.record_count = count;

        if count == 0 {
            return Ok(());
        }

        let format: Vec<String> = match self.reader.take_format_line() {
            Some(tokens) if tokens.is_empty() => {
                return Err(self.error("cannot determine data format, column order line is empty"));
            }
            Some(tokens) => tokens.into_iter().map(str::to_string).collect(),
            None => {
                // Compatibility: files without an order line reuse the sensor order
                warn!(
                    "{}: data block has no column order line, reusing sensor order '{}'",
                    self.source,
                    parsed.sensor_format.join(" ")
                );
                self.warnings += 1;
                parsed.sensor_format.clone()
            }
        };

        // Column per order position; repeated tokens share one column
        let mut slots: Vec<Option<usize>> = vec![None; format.len()];
        let mut columns: Vec<ParsedColumn> = Vec::new();
        let mut fills: Vec<f64> = Vec::new();
        let mut short_rows = 0usize;
        // Declared counts are untrusted; the content bounds the allocation
        let capacity = count.min(self.reader.remaining_lines());

        for row_index in 0..count {
            let row = self
                .reader
                .next_row()
                .ok_or_else(|| Error::too_few_rows(blocks::DATA, count, row_index))?;
            if row.len() < format.len() {
                short_rows += 1;
            }
            for (column, &fill) in columns.iter_mut().zip(&fills) {
                column.values.push(fill);
            }

            for (position, field) in row.iter().enumerate().take(format.len()) {
                let index = match slots[position] {
                    Some(index) => index,
                    None => {
                        let token = &format[position];
                        let index = match columns.iter().position(|c| &c.token == token) {
                            Some(index) => index,
                            None => {
                                let fill = fill_value(token);
                                let mut values = Vec::with_capacity(capacity);
                                values.resize(row_index + 1, fill);
                                columns.push(ParsedColumn {
                                    token: token.clone(),
                                    values,
                                });
                                fills.push(fill);
                                columns.len() - 1
                            }
                        };
                        slots[position] = Some(index);
                        index
                    }
                };
                let token = &format[position];
                columns[index].values[row_index] = match field.parse::<f64>() {
                    Ok(value) => value,
                    Err(_) => {
                        warn!(
                            "{}: unreadable value '{}' for '{}' on line {}, stored as NaN",
                            self.source,
                            field,
                            token,
                            self.reader.line_number()
                        );
                        self.warnings += 1;
                        f64::NAN
                    }
                };
            }
        }

        if short_rows > 0 {
            debug!(
                "{}: {} data rows hold fewer fields than the column order",
                self.source, short_rows
            );
        }

        parsed.data_format = Some(format);
        parsed.columns = columns;
        Ok(())
    }

    fn parse_topography_block(&mut self, parsed: &mut ParsedFile) -> Result<()> {
        let Some(row) = self.reader.next_row() else {
            return Ok(());
        };
        if row.len() != 1 {
            warn!(
                "{}: ignoring trailing content on line {}",
                self.source,
                self.reader.line_number()
            );
            self.warnings += 1;
            return Ok(());
        }

        let count = self.parse_count(blocks::TOPOGRAPHY, &row)?;
        if count < 0 {
            return Err(self.error(format!("cannot determine topography size, read {}", count)));
        }
        let count = count as usize;

        let format: Vec<String> = match self.reader.take_format_line_after_blanks() {
            Some(tokens) => tokens.into_iter().map(str::to_string).collect(),
            None => parsed
                .data_format
                .clone()
                .unwrap_or_else(|| parsed.sensor_format.clone()),
        };

        let mut columns = Vec::with_capacity(format.len());
        for found in 0..count {
            let row = self
                .reader
                .next_row()
                .ok_or_else(|| Error::too_few_rows(blocks::TOPOGRAPHY, count, found))?;
            // Tokens are checked as far as rows reach
            while columns.len() < row.len().min(format.len()) {
                let token = &format[columns.len()];
                let column = topography_column(token)
                    .ok_or_else(|| Error::unknown_column_token(blocks::TOPOGRAPHY, token))?;
                columns.push(Some(column));
            }
            let pos = self.parse_position(&row, &columns)?;
            parsed.topography.push(pos.round(POSITION_ROUNDING));
        }

        if count > 0 {
            debug!("{}: {} topography points", self.source, count);
        }
        Ok(())
    }

    /// Position from a row of coordinate fields
    fn parse_position(&self, row: &[&str], columns: &[Option<CoordinateColumn>]) -> Result<Pos> {
        let mut pos = Pos::default();
        for (field, column) in row.iter().zip(columns) {
            let Some(column) = column else {
                continue;
            };
            let value: f64 = field.parse().map_err(|_| {
                self.error(format!(
                    "invalid coordinate '{}' on line {}",
                    field,
                    self.reader.line_number()
                ))
            })?;
            column.axis.assign(&mut pos, column.to_metres(value));
        }
        Ok(pos)
    }

    fn parse_count(&self, block: &str, row: &[&str]) -> Result<i64> {
        if row.len() != 1 {
            return Err(self.error(format!(
                "expected a single {} count on line {}, found {} fields",
                block,
                self.reader.line_number(),
                row.len()
            )));
        }
        row[0].parse::<i64>().map_err(|_| {
            self.error(format!(
                "invalid {} count '{}' on line {}",
                block,
                row[0],
                self.reader.line_number()
            ))
        })
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::format(self.source.clone(), message)
    }
}

/// Parse a string's content
pub fn parse_str(
    content: &str,
    source: &str,
    fill_value: impl Fn(&str) -> f64,
) -> Result<ParsedFile> {
    DataFileParser::new(content, source).parse(fill_value)
}

/// Read and parse a file
pub fn parse_file(path: &Path, fill_value: impl Fn(&str) -> f64) -> Result<ParsedFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read file {}", path.display()), e))?;
    parse_str(&content, &path.display().to_string(), fill_value)
}
