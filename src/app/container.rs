//! Survey data container
//!
//! [`DataContainer`] ties the components together: a [`SensorRegistry`] of
//! deduplicated sensor positions, a [`ColumnStore`] of measurement columns
//! with a row validity mask, the alias translator used on ingest, and the
//! topography points of the last loaded files.
//!
//! ```no_run
//! use survey_data::{ContainerConfig, DataContainer};
//!
//! # fn example() -> survey_data::Result<()> {
//! let config = ContainerConfig::default()
//!     .with_sensor_index("s")
//!     .with_sensor_index("g");
//! let mut data = DataContainer::with_config(config);
//! let stats = data.load("line1.dat")?;
//! println!("{} rows, {} invalid", stats.records, stats.invalid_records);
//!
//! data.remove_invalid()?;
//! data.save("line1-clean.dat", "s g rho", "x z")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::models::Pos;
use crate::app::services::alias_translator::TokenAliasTranslator;
use crate::app::services::column_store::ColumnStore;
use crate::app::services::data_format::{self, LoadStats, ParsedFile, SaveStats};
use crate::app::services::sensor_maintenance;
use crate::app::services::sensor_registry::{SensorPermutation, SensorRegistry};
use crate::app::services::validity::{self, ValidityReport, ValidityRule};
use crate::config::ContainerConfig;
use crate::constants::VALID_TOKEN;
use crate::Result;

/// Shared domain validity rule
pub type SharedValidityRule = Arc<dyn ValidityRule + Send + Sync>;

/// Columnar survey data with sensors, validity mask and topography
#[derive(Clone)]
pub struct DataContainer {
    config: ContainerConfig,
    store: ColumnStore,
    registry: SensorRegistry,
    translator: TokenAliasTranslator,
    additional_points: Vec<Pos>,
    input_format: String,
    input_sensor_format: String,
    rules: Vec<SharedValidityRule>,
}

impl Default for DataContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataContainer")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("registry", &self.registry)
            .field("translator", &self.translator)
            .field("additional_points", &self.additional_points)
            .field("input_format", &self.input_format)
            .field("input_sensor_format", &self.input_sensor_format)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl DataContainer {
    /// Create an empty container with default settings
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create an empty container
    ///
    /// Sensor-index tokens and aliases of the configuration are registered
    /// right away.
    pub fn with_config(config: ContainerConfig) -> Self {
        let mut store = ColumnStore::new();
        for token in &config.sensor_index_tokens {
            store.register_sensor_index(token);
        }
        let translator = TokenAliasTranslator::from_config(&config.aliases);

        Self {
            config,
            store,
            registry: SensorRegistry::new(),
            translator,
            additional_points: Vec::new(),
            input_format: String::new(),
            input_sensor_format: String::new(),
            rules: Vec::new(),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn store(&self) -> &ColumnStore {
        &self.store
    }

    pub fn translator(&self) -> &TokenAliasTranslator {
        &self.translator
    }

    /// Register an alias applied to files loaded from now on
    pub fn register_alias(&mut self, alias: &str, token: &str) {
        self.translator.register(alias, token);
    }

    /// Add a domain rule run by every validity check
    pub fn add_validity_rule(&mut self, rule: impl ValidityRule + Send + Sync + 'static) {
        self.rules.push(Arc::new(rule));
    }

    // ---------------------------------------------------------------------
    // Load and save
    // ---------------------------------------------------------------------

    /// Load a file into the container
    ///
    /// Sensors are merged into the registry and the file's data columns
    /// replace all columns held so far; only registered sensor-index columns
    /// survive, refilled from the file or with `-1`. The validity check runs
    /// once all columns are in.
    /// On error the container is left as it was before the call.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadStats> {
        let path = path.as_ref();
        info!("Loading data file: {}", path.display());
        let parsed = data_format::parse_file(path, |token| self.fill_value_on_file(token))?;
        self.ingest(parsed, &path.display().to_string())
    }

    /// Load file content held in memory
    pub fn load_from_str(&mut self, content: &str, source: &str) -> Result<LoadStats> {
        let parsed = data_format::parse_str(content, source, |token| {
            self.fill_value_on_file(token)
        })?;
        self.ingest(parsed, source)
    }

    /// Save the container
    ///
    /// `data_format` lists the tokens to write, aliases allowed, or is `all`
    /// for every column and every row ever created; otherwise only valid
    /// rows are written. An empty `sensor_format` writes `x y z`.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        data_format: &str,
        sensor_format: &str,
    ) -> Result<SaveStats> {
        data_format::write_file(self, path.as_ref(), data_format, sensor_format)
    }

    fn fill_value_on_file(&self, token: &str) -> f64 {
        self.store.fill_value(self.translator.resolve(token))
    }

    fn ingest(&mut self, parsed: ParsedFile, source: &str) -> Result<LoadStats> {
        let ParsedFile {
            sensor_format,
            sensors,
            data_format,
            record_count,
            columns,
            topography,
            warnings,
        } = parsed;

        let mut stats = LoadStats {
            sensors_declared: sensors.len(),
            records: record_count,
            topography_points: topography.len(),
            warnings,
            ..LoadStats::default()
        };

        // File sensor position -> registry id
        let count_before = self.registry.sensor_count();
        let file_ids: Vec<usize> = sensors
            .into_iter()
            .map(|pos| self.registry.create_sensor(pos, self.config.sensor_tolerance))
            .collect();
        stats.sensors_created = self.registry.sensor_count() - count_before;
        if stats.sensors_merged() > 0 {
            warn!(
                "{}: {} sensors lie within {} of an existing sensor and were merged",
                source,
                stats.sensors_merged(),
                self.config.sensor_tolerance
            );
        }
        let identity = file_ids.iter().enumerate().all(|(i, &id)| i == id);

        // Columns of earlier files do not carry over
        self.store.clear();
        self.store.reset_rows(record_count);
        let from_one = self.config.sensor_index_from_one;
        for column in columns {
            let (token, scale) = match self.translator.translate(&column.token) {
                Some(translation) => (translation.token.clone(), translation.scale),
                None => (column.token, 1.0),
            };
            let mut values = column.values;
            if scale != 1.0 {
                values.iter_mut().for_each(|v| *v *= scale);
            }
            if self.store.is_sensor_index(&token) {
                if from_one {
                    values.iter_mut().for_each(|v| *v -= 1.0);
                }
                if !identity {
                    values
                        .iter_mut()
                        .for_each(|v| *v = remap_file_sensor(*v, &file_ids));
                }
            }
            self.store.set(&token, values)?;
        }
        self.store.set(VALID_TOKEN, vec![1.0; record_count])?;

        if let Some(format) = data_format {
            self.input_format = format.join(" ");
        }
        self.input_sensor_format = sensor_format.join(" ");
        self.additional_points.extend(topography);

        let report = self.check_data_validity(self.config.remove_invalid_on_load)?;
        stats.invalid_records = report.invalid_rows;
        stats.invalid_removed = report.removed;

        info!(
            "Loaded {}: {} sensors ({} new), {} data, {} topography points",
            source,
            stats.sensors_declared,
            stats.sensors_created,
            stats.records,
            stats.topography_points
        );
        Ok(stats)
    }

    // ---------------------------------------------------------------------
    // Columns
    // ---------------------------------------------------------------------

    /// Column values of a token
    pub fn get(&self, token: &str) -> Result<&[f64]> {
        self.store.get(token)
    }

    /// Mutable view of a column; its length cannot change through the view
    pub fn column_mut(&mut self, token: &str) -> Result<&mut [f64]> {
        self.store.column_mut(token)
    }

    /// Insert or overwrite a column of exactly [`size`](Self::size) values
    pub fn set(&mut self, token: &str, values: Vec<f64>) -> Result<()> {
        self.store.set(token, values)
    }

    /// Set a column together with its description
    pub fn add(&mut self, token: &str, values: Vec<f64>, description: &str) -> Result<()> {
        self.store.add(token, values, description)
    }

    pub fn description(&self, token: &str) -> &str {
        self.store.description(token)
    }

    pub fn exists(&self, token: &str) -> bool {
        self.store.exists(token)
    }

    /// Mark a token as holding sensor ids
    pub fn register_sensor_index(&mut self, token: &str) {
        self.store.register_sensor_index(token);
    }

    pub fn is_sensor_index(&self, token: &str) -> bool {
        self.store.is_sensor_index(token)
    }

    /// Known tokens joined by single spaces
    pub fn token_list(&self) -> String {
        self.store.token_list()
    }

    /// Number of records
    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// Grow all columns to `new_count` records
    pub fn resize(&mut self, new_count: usize) -> Result<()> {
        self.store.resize(new_count)
    }

    /// Column-order string of the last loaded data block
    pub fn input_format(&self) -> &str {
        &self.input_format
    }

    /// Column-order string of the last loaded sensor block
    pub fn input_sensor_format(&self) -> &str {
        &self.input_sensor_format
    }

    /// Drop all data columns; sensors and topography are kept
    pub fn clear(&mut self) {
        self.store.clear();
    }

    // ---------------------------------------------------------------------
    // Validity
    // ---------------------------------------------------------------------

    /// Set the validity flag of the given rows
    pub fn mark_valid(&mut self, indices: &[usize], state: bool) -> Result<()> {
        validity::mark_valid(&mut self.store, indices, state)
    }

    /// Flag non-finite rows and rows rejected by the registered rules
    pub fn check_data_validity(&mut self, remove_if_invalid: bool) -> Result<ValidityReport> {
        let rules: Vec<&dyn ValidityRule> = self
            .rules
            .iter()
            .map(|rule| rule.as_ref() as &dyn ValidityRule)
            .collect();
        validity::check_data_validity(
            &mut self.store,
            &rules,
            self.registry.sensor_count(),
            remove_if_invalid,
        )
    }

    /// Drop every row not flagged valid, returning how many went
    pub fn remove_invalid(&mut self) -> Result<usize> {
        validity::remove_invalid(&mut self.store)
    }

    /// Copy of the container holding only the given rows
    ///
    /// Rows keep their storage order regardless of the order of `indices`.
    pub fn filter(&self, indices: &[usize]) -> Result<DataContainer> {
        let mut filtered = self.clone();
        validity::filter(&mut filtered.store, indices)?;
        Ok(filtered)
    }

    /// Drop the given rows
    pub fn remove(&mut self, indices: &[usize]) -> Result<()> {
        validity::remove(&mut self.store, indices)
    }

    // ---------------------------------------------------------------------
    // Sensors
    // ---------------------------------------------------------------------

    /// Id of the first sensor within `tolerance` of `pos`, creating one if
    /// none is
    pub fn create_sensor(&mut self, pos: Pos, tolerance: f64) -> usize {
        self.registry.create_sensor(pos, tolerance)
    }

    pub fn sensor_count(&self) -> usize {
        self.registry.sensor_count()
    }

    pub fn sensor_positions(&self) -> &[Pos] {
        self.registry.positions()
    }

    pub fn sensor_position(&self, id: usize) -> Option<&Pos> {
        self.registry.position(id)
    }

    /// Move a sensor; no deduplication happens
    pub fn set_sensor_position(&mut self, id: usize, pos: Pos) -> Result<()> {
        self.registry.set_position(id, pos)
    }

    /// Remove sensors and every row referencing them
    pub fn remove_sensor_idx(&mut self, ids: &[usize]) -> Result<SensorPermutation> {
        sensor_maintenance::remove_sensor_indices(&mut self.store, &mut self.registry, ids)
    }

    /// Remove one sensor and every row referencing it
    pub fn remove_sensor(&mut self, id: usize) -> Result<SensorPermutation> {
        self.remove_sensor_idx(&[id])
    }

    /// Drop sensors no row references and renumber sensor-index columns
    pub fn remove_unused_sensors(&mut self) -> SensorPermutation {
        sensor_maintenance::remove_unused_sensors(&mut self.store, &mut self.registry)
    }

    /// Invalidate rows referencing sensors beyond the sensor count
    pub fn mark_invalid_sensor_indices(&mut self) -> Result<usize> {
        let sensor_count = self.registry.sensor_count();
        sensor_maintenance::mark_invalid_sensor_indices(&mut self.store, sensor_count)
    }

    // ---------------------------------------------------------------------
    // Topography
    // ---------------------------------------------------------------------

    pub fn additional_points(&self) -> &[Pos] {
        &self.additional_points
    }

    pub fn push_additional_point(&mut self, pos: Pos) {
        self.additional_points.push(pos);
    }

    /// One-line counts followed by the token list
    pub fn show_infos(&self) -> String {
        let mut summary = format!(
            "Sensors: {}, Data: {}",
            self.sensor_count(),
            self.size()
        );
        if !self.additional_points.is_empty() {
            summary.push_str(&format!(" Topopoints: {}", self.additional_points.len()));
        }
        info!("{}", summary);
        debug!("Tokens: {}", self.token_list());
        format!("{}\n{}", summary, self.token_list())
    }
}

/// Registry id for a sensor index read from file
///
/// Values outside the file's sensor range are kept as they are.
fn remap_file_sensor(value: f64, file_ids: &[usize]) -> f64 {
    if value >= 0.0 && value < file_ids.len() as f64 && value.fract() == 0.0 {
        file_ids[value as usize] as f64
    } else {
        value
    }
}
