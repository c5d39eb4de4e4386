//! Configuration structures for the separation simulator
//!
//! This module contains the simulation configuration structure, the command
//! line arguments, the optional JSON configuration file, and the validation
//! logic run before any simulation starts.

use super::{OutputFormat, StationId};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default values taken from the separation sheet the tool was built around
pub mod defaults {
    /// Average handling time per item, in seconds
    pub const TIME_PER_ITEM: f64 = 20.0;

    /// Time to move a box from one station to the next, in seconds
    pub const TRANSIT_TIME_PER_STATION: f64 = 5.0;

    /// Worker slots a station may hold before it counts as saturated
    pub const STATION_CAPACITY: usize = 10;

    /// People staffing each station (may be fractional)
    pub const WORKERS_PER_STATION: f64 = 1.0;

    /// Fixed extra time added once per box, in seconds
    pub const EXTRA_TIME_PER_BOX: f64 = 0.0;

    /// Number of past runs kept for comparison
    pub const HISTORY_LIMIT: usize = 5;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "box-separation-simulator",
    version = "0.1.0",
    about = "Box Separation Simulator - Estimates how long a batch of boxes takes to separate",
    long_about = "Simulates a batch of boxes moving through worker-limited stations. Boxes are ordered shortest-estimate-first, each station task goes to the earliest available worker, and the report shows total duration, per-station load and the first bottleneck.

EXAMPLES:
    # Simulate an input sheet with default settings
    box-separation-simulator --input orders.csv

    # Use a configuration file
    box-separation-simulator --input orders.csv --config config.json

    # Override specific settings
    box-separation-simulator --input orders.csv --workers-per-station 2.5 --station-capacity 2

    # Give one station its own worker slot count
    box-separation-simulator --input orders.csv --station-slots Packing=4

    # Keep a history file and compare with the previous run
    box-separation-simulator --input orders.csv --history runs.json --compare

    # Simulate a synthetic workload
    box-separation-simulator --synthetic-boxes 200 --seed 7

    # Generate configuration template
    box-separation-simulator --print-config > my-config.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)
    Supported input formats: CSV (.csv), JSON (.json), JSON Lines (.jsonl)"
)]
pub struct CliArgs {
    /// Input file with work item rows
    #[arg(
        short,
        long,
        help = "Input file with work item rows (CSV, JSON or JSON Lines)",
        long_help = "Input file whose rows carry package id, box id, station and item count. The format is picked from the extension unless --input-format is given."
    )]
    pub input: Option<String>,

    /// Force the input format instead of guessing from the extension
    #[arg(long, help = "Input format (csv, json or jsonl)")]
    pub input_format: Option<String>,

    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Average handling time per item, in seconds
    #[arg(long, help = "Time per item in seconds")]
    pub time_per_item: Option<f64>,

    /// Transit time between stations, in seconds
    #[arg(long, help = "Transit time per station in seconds")]
    pub transit_time_per_station: Option<f64>,

    /// Worker slots per station before bottleneck eligibility
    #[arg(
        long,
        help = "Station capacity (worker slots before a station counts as saturated)",
        long_help = "Number of simultaneous worker slots a station may hold before it is eligible to be reported as the bottleneck. Must be at least 1. Default: 10"
    )]
    pub station_capacity: Option<usize>,

    /// People per station, may be fractional
    #[arg(
        long,
        help = "Workers per station (may be fractional)",
        long_help = "People staffing each station. Divides the per-item handling cost; its floor (at least 1) is the number of worker slots per station. Must be greater than 0. Default: 1.0"
    )]
    pub workers_per_station: Option<f64>,

    /// Extra time per box, in seconds
    #[arg(long, help = "Extra time added once per box in seconds")]
    pub extra_time_per_box: Option<f64>,

    /// Explicit worker slot counts for individual stations
    #[arg(
        long = "station-slots",
        value_parser = parse_station_slot,
        help = "Worker slots for one station, as STATION=N (repeatable)"
    )]
    pub station_slots: Vec<(String, usize)>,

    /// Output format for the report
    #[arg(long, help = "Output format (text or json)")]
    pub output_format: Option<String>,

    /// History file for keeping past runs
    #[arg(long, help = "JSON file holding past simulation runs")]
    pub history: Option<String>,

    /// Number of runs to keep in the history file
    #[arg(long, help = "Number of past runs kept in the history file")]
    pub history_limit: Option<usize>,

    /// Compare with the previous run in the history
    #[arg(long, help = "Compare the new run with the previous one in the history")]
    pub compare: bool,

    /// Label used in the run id instead of the input file name
    #[arg(long, help = "Label used to build the run id")]
    pub label: Option<String>,

    /// Number of boxes in a generated workload
    #[arg(long, help = "Simulate a synthetic workload with this many boxes")]
    pub synthetic_boxes: Option<usize>,

    /// Random seed for reproducible synthetic workloads
    #[arg(long, help = "Random seed for synthetic workloads")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Directory for daily rolling log files
    #[arg(long, help = "Also write logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Emit logs as JSON
    #[arg(long, help = "Write console logs as JSON")]
    pub log_json: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Parse a `STATION=N` pair for `--station-slots`
fn parse_station_slot(value: &str) -> Result<(String, usize), String> {
    let (station, slots) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected STATION=N, got '{}'", value))?;
    let station = station.trim();
    if station.is_empty() {
        return Err(format!("missing station name in '{}'", value));
    }
    let slots = slots
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid slot count in '{}': {}", value, e))?;
    Ok((station.to_string(), slots))
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Average handling time per item, in seconds
    pub time_per_item: Option<f64>,

    /// Transit time between stations, in seconds
    pub transit_time_per_station: Option<f64>,

    /// Worker slots per station before bottleneck eligibility
    pub station_capacity: Option<usize>,

    /// People per station, may be fractional
    pub workers_per_station: Option<f64>,

    /// Extra time per box, in seconds
    pub extra_time_per_box: Option<f64>,

    /// Explicit worker slot counts for individual stations
    pub station_slots: Option<BTreeMap<StationId, usize>>,

    /// Output format for the report
    pub output_format: Option<String>,

    /// Number of runs to keep in the history file
    pub history_limit: Option<usize>,
}

/// Configuration for a separation simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Average handling time per item, in seconds
    pub time_per_item: f64,

    /// Transit time between stations, in seconds
    pub transit_time_per_station: f64,

    /// Worker slots a station may hold before it is eligible as the bottleneck
    pub station_capacity: usize,

    /// People per station. Divides the per-item cost and, floored to at
    /// least one, gives the worker slot count of every station without an
    /// explicit override.
    pub workers_per_station: f64,

    /// Extra time added once per box, in seconds
    pub extra_time_per_box: f64,

    /// Explicit worker slot counts for individual stations
    #[serde(default)]
    pub station_slots: BTreeMap<StationId, usize>,

    /// Output format for the report
    pub output_format: String,

    /// Number of runs to keep in the history file
    pub history_limit: usize,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Workers per station is zero, negative or not finite
    #[error("Workers per station must be greater than 0, got {0}")]
    InvalidWorkersPerStation(f64),

    /// Station capacity is zero
    #[error("Station capacity must be at least 1, got {0}")]
    InvalidStationCapacity(usize),

    /// A timing parameter is negative or not finite
    #[error("Invalid value for {field}: {value} (must be a finite number >= 0)")]
    InvalidTiming {
        /// Name of the timing field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// A per-station slot override is zero
    #[error("Worker slots for station {station} must be at least 1, got {slots}")]
    InvalidStationSlots {
        /// Station carrying the override
        station: String,
        /// The invalid slot count
        slots: usize,
    },

    /// History limit is zero
    #[error("History limit must be at least 1, got {0}")]
    InvalidHistoryLimit(usize),

    /// Output format is not recognised
    #[error("Unknown output format: {0}")]
    InvalidOutputFormat(String),
}

impl ConfigValidationError {
    /// Configuration key the error refers to
    pub fn key(&self) -> String {
        match self {
            Self::InvalidWorkersPerStation(_) => "workers_per_station".to_string(),
            Self::InvalidStationCapacity(_) => "station_capacity".to_string(),
            Self::InvalidTiming { field, .. } => field.clone(),
            Self::InvalidStationSlots { station, .. } => format!("station_slots.{}", station),
            Self::InvalidHistoryLimit(_) => "history_limit".to_string(),
            Self::InvalidOutputFormat(_) => "output_format".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_per_item: defaults::TIME_PER_ITEM,
            transit_time_per_station: defaults::TRANSIT_TIME_PER_STATION,
            station_capacity: defaults::STATION_CAPACITY,
            workers_per_station: defaults::WORKERS_PER_STATION,
            extra_time_per_box: defaults::EXTRA_TIME_PER_BOX,
            station_slots: BTreeMap::new(),
            output_format: "text".to_string(),
            history_limit: defaults::HISTORY_LIMIT,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            time_per_item: config_file.time_per_item.unwrap_or(defaults.time_per_item),
            transit_time_per_station: config_file
                .transit_time_per_station
                .unwrap_or(defaults.transit_time_per_station),
            station_capacity: config_file.station_capacity.unwrap_or(defaults.station_capacity),
            workers_per_station: config_file
                .workers_per_station
                .unwrap_or(defaults.workers_per_station),
            extra_time_per_box: config_file
                .extra_time_per_box
                .unwrap_or(defaults.extra_time_per_box),
            station_slots: config_file.station_slots.unwrap_or(defaults.station_slots),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            history_limit: config_file.history_limit.unwrap_or(defaults.history_limit),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.time_per_item {
            config.time_per_item = value;
        }
        if let Some(value) = args.transit_time_per_station {
            config.transit_time_per_station = value;
        }
        if let Some(value) = args.station_capacity {
            config.station_capacity = value;
        }
        if let Some(value) = args.workers_per_station {
            config.workers_per_station = value;
        }
        if let Some(value) = args.extra_time_per_box {
            config.extra_time_per_box = value;
        }
        for (station, slots) in args.station_slots {
            config.station_slots.insert(StationId::new(station), slots);
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.history_limit {
            config.history_limit = value;
        }
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.workers_per_station.is_finite() || self.workers_per_station <= 0.0 {
            return Err(ConfigValidationError::InvalidWorkersPerStation(self.workers_per_station));
        }

        if self.station_capacity < 1 {
            return Err(ConfigValidationError::InvalidStationCapacity(self.station_capacity));
        }

        self.validate_timing("time_per_item", self.time_per_item)?;
        self.validate_timing("transit_time_per_station", self.transit_time_per_station)?;
        self.validate_timing("extra_time_per_box", self.extra_time_per_box)?;

        if let Some((station, &slots)) = self.station_slots.iter().find(|&(_, &slots)| slots == 0) {
            return Err(ConfigValidationError::InvalidStationSlots {
                station: station.to_string(),
                slots,
            });
        }

        if self.history_limit == 0 {
            return Err(ConfigValidationError::InvalidHistoryLimit(self.history_limit));
        }

        if self.get_output_format().is_err() {
            return Err(ConfigValidationError::InvalidOutputFormat(self.output_format.clone()));
        }

        Ok(())
    }

    /// Helper method to validate timing values
    fn validate_timing(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigValidationError::InvalidTiming { field: field.to_string(), value });
        }
        Ok(())
    }

    /// Worker slot count derived from `workers_per_station`: its floor, at least one
    pub fn default_worker_slots(&self) -> usize {
        let floored = self.workers_per_station.floor();
        if floored >= 1.0 {
            floored as usize
        } else {
            1
        }
    }

    /// Worker slot count for a station, honouring explicit overrides
    pub fn worker_slots_for(&self, station: &StationId) -> usize {
        self.station_slots
            .get(station)
            .copied()
            .unwrap_or_else(|| self.default_worker_slots())
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_config_default() {
        let config = SimulationConfig::default();

        assert_eq!(config.time_per_item, 20.0);
        assert_eq!(config.transit_time_per_station, 5.0);
        assert_eq!(config.station_capacity, 10);
        assert_eq!(config.workers_per_station, 1.0);
        assert_eq!(config.extra_time_per_box, 0.0);
        assert!(config.station_slots.is_empty());
        assert_eq!(config.output_format, "text");
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "time_per_item": 12.5,
            "transit_time_per_station": 3.0,
            "station_capacity": 2,
            "workers_per_station": 2.5,
            "station_slots": { "Packing": 4 },
            "output_format": "json"
        }"#;

        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = SimulationConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.time_per_item, 12.5);
        assert_eq!(config.transit_time_per_station, 3.0);
        assert_eq!(config.station_capacity, 2);
        assert_eq!(config.workers_per_station, 2.5);
        assert_eq!(config.station_slots.get(&StationId::new("Packing")), Some(&4));
        assert_eq!(config.output_format, "json");
        // Missing keys keep their defaults
        assert_eq!(config.extra_time_per_box, 0.0);
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn test_config_file_missing() {
        let result = SimulationConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_config_file_unsupported_extension() {
        let temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let result = SimulationConfig::from_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"));
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::try_parse_from([
            "test",
            "--time-per-item",
            "8",
            "--workers-per-station",
            "0.5",
            "--station-capacity",
            "3",
            "--station-slots",
            "Packing=2",
            "--station-slots",
            "Labels=1",
        ])
        .unwrap();

        let config = SimulationConfig::from_cli_args(args).unwrap();

        assert_eq!(config.time_per_item, 8.0);
        assert_eq!(config.workers_per_station, 0.5);
        assert_eq!(config.station_capacity, 3);
        assert_eq!(config.station_slots.len(), 2);
        assert_eq!(config.worker_slots_for(&StationId::new("Packing")), 2);
        // Not overridden keeps the default
        assert_eq!(config.transit_time_per_station, 5.0);
    }

    #[test]
    fn test_station_slot_parser() {
        assert_eq!(parse_station_slot("A=3").unwrap(), ("A".to_string(), 3));
        assert_eq!(parse_station_slot(" Dock 1 = 2").unwrap(), ("Dock 1".to_string(), 2));
        assert!(parse_station_slot("A").is_err());
        assert!(parse_station_slot("=2").is_err());
        assert!(parse_station_slot("A=x").is_err());
    }

    #[test]
    fn test_simulation_config_validation_success() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_simulation_config_validation_workers() {
        let mut config = SimulationConfig::default();
        config.workers_per_station = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidWorkersPerStation(0.0))
        );

        config.workers_per_station = -1.0;
        assert!(config.validate().is_err());

        config.workers_per_station = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_simulation_config_validation_capacity() {
        let mut config = SimulationConfig::default();
        config.station_capacity = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err, ConfigValidationError::InvalidStationCapacity(0));
        assert_eq!(err.key(), "station_capacity");
    }

    #[test]
    fn test_simulation_config_validation_timing() {
        let mut config = SimulationConfig::default();
        config.transit_time_per_station = -0.5;
        let err = config.validate().unwrap_err();
        assert_eq!(err.key(), "transit_time_per_station");

        let mut config = SimulationConfig::default();
        config.extra_time_per_box = f64::INFINITY;
        assert_eq!(config.validate().unwrap_err().key(), "extra_time_per_box");
    }

    #[test]
    fn test_simulation_config_validation_station_slots() {
        let mut config = SimulationConfig::default();
        config.station_slots.insert(StationId::new("Dock"), 0);
        let err = config.validate().unwrap_err();
        assert_eq!(err.key(), "station_slots.Dock");
    }

    #[test]
    fn test_simulation_config_validation_output_format() {
        let mut config = SimulationConfig::default();
        config.output_format = "yaml".to_string();
        assert_eq!(config.validate().unwrap_err().key(), "output_format");
    }

    #[test]
    fn test_worker_slots_are_floored_with_minimum_one() {
        let mut config = SimulationConfig::default();

        config.workers_per_station = 0.4;
        assert_eq!(config.default_worker_slots(), 1);

        config.workers_per_station = 2.9;
        assert_eq!(config.default_worker_slots(), 2);

        config.workers_per_station = 3.0;
        assert_eq!(config.default_worker_slots(), 3);
    }

    #[test]
    fn test_worker_slots_override() {
        let mut config = SimulationConfig::default();
        config.workers_per_station = 1.5;
        config.station_slots.insert(StationId::new("Packing"), 4);

        assert_eq!(config.worker_slots_for(&StationId::new("Packing")), 4);
        assert_eq!(config.worker_slots_for(&StationId::new("Picking")), 1);
    }

    #[test]
    fn test_simulation_config_serialization() {
        let mut config = SimulationConfig::default();
        config.station_slots.insert(StationId::new("7"), 2);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_output_format_parsing() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.get_output_format().unwrap(), OutputFormat::Text);

        config.output_format = "JSON".to_string();
        assert_eq!(config.get_output_format().unwrap(), OutputFormat::Json);
    }
}
