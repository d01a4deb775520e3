//! CLI argument definitions for the `ozone` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

use ozone_core::config::OzoneConfig;
use ozone_core::error::{OzoneError, Result};
use ozone_core::types::LifestyleInput;

/// Ozone - personal carbon footprint estimator, seasonal tips and assistant.
#[derive(Parser, Debug)]
#[command(name = "ozone", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for the SQLite database.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Device whose history and plan to use.
    #[arg(long = "device", global = true)]
    pub device: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the local HTTP API.
    Serve {
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
    /// Estimate monthly emissions from lifestyle answers.
    Estimate(EstimateArgs),
    /// List saved calculations, or delete one.
    History {
        #[arg(long = "delete", value_name = "ID")]
        delete: Option<String>,
    },
    /// Print the text report for a saved calculation.
    Report {
        id: String,
        /// Write the report to a file instead of stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Show seasonal tips for a month (defaults to the current month).
    Tips {
        #[arg(short = 'm', long = "month")]
        month: Option<u32>,
    },
    /// Manage the saved-tip plan.
    Plan {
        #[command(subcommand)]
        action: Option<PlanAction>,
    },
    /// Ask the assistant a single question.
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    List,
    Add { tip_id: String },
    Remove { tip_id: String },
}

/// Lifestyle answers. Values are read with the same leniency as the form:
/// unknown choices fall back and unusable numbers count as zero.
#[derive(Args, Debug, Default)]
pub struct EstimateArgs {
    /// JSON file with a lifestyle form; flags override its fields.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// car, bus, train, flight, bike or walk.
    #[arg(long = "transport")]
    pub transport: Option<String>,
    /// Monthly kilometres travelled.
    #[arg(long = "distance")]
    pub distance: Option<String>,
    /// gasoline, diesel, hybrid or electric.
    #[arg(long = "fuel")]
    pub fuel: Option<String>,
    #[arg(long = "flight-hours")]
    pub flight_hours: Option<String>,
    /// Monthly kWh.
    #[arg(long = "electricity")]
    pub electricity: Option<String>,
    /// low, medium or high.
    #[arg(long = "meat")]
    pub meat: Option<String>,
    /// low, medium or high.
    #[arg(long = "dairy")]
    pub dairy: Option<String>,
    /// most, some or little.
    #[arg(long = "recycling")]
    pub recycling: Option<String>,
    /// low, moderate or high.
    #[arg(long = "shopping")]
    pub shopping: Option<String>,

    /// Do not append the result to history.
    #[arg(long = "no-save")]
    pub no_save: bool,
}

impl EstimateArgs {
    /// Merge the input file (if any) with the flags into a lifestyle form.
    pub fn to_input(&self) -> Result<LifestyleInput> {
        let mut form = match &self.input {
            Some(path) => read_form(path)?,
            None => Map::new(),
        };

        let flags = [
            ("transportationType", &self.transport),
            ("distanceKm", &self.distance),
            ("fuelType", &self.fuel),
            ("flightHours", &self.flight_hours),
            ("electricityUsageKwh", &self.electricity),
            ("meatConsumption", &self.meat),
            ("dairyConsumption", &self.dairy),
            ("wasteRecycled", &self.recycling),
            ("shoppingHabits", &self.shopping),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                // Drop the short alias so the flag is the only value for this field.
                match key {
                    "distanceKm" => {
                        form.remove("distance");
                    }
                    "electricityUsageKwh" => {
                        form.remove("electricityUsage");
                    }
                    _ => {}
                }
                form.insert(key.to_string(), Value::String(value.trim().to_lowercase()));
            }
        }

        Ok(serde_json::from_value(Value::Object(form))?)
    }
}

fn read_form(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(OzoneError::InvalidInput(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}

impl Cli {
    /// Priority: --config flag > OZONE_CONFIG env var > ~/.ozone/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("OZONE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --data-dir flag > config file value. `~/` is expanded.
    pub fn resolve_data_dir(&self, config: &OzoneConfig) -> PathBuf {
        match &self.data_dir {
            Some(p) => p.clone(),
            None => expand_home(&config.general.data_dir),
        }
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config: &OzoneConfig) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config.general.log_level.clone())
    }

    /// Priority: --device flag > config file value.
    pub fn resolve_device(&self, config: &OzoneConfig) -> String {
        self.device
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| config.general.device_id.clone())
    }
}

/// Priority: --port flag > OZONE_PORT env var > config file value.
pub fn resolve_port(flag: Option<u16>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Ok(val) = std::env::var("OZONE_PORT") {
        if let Ok(p) = val.parse::<u16>() {
            return p;
        }
    }
    config_port
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn default_config_path() -> PathBuf {
    home_dir()
        .map(|home| home.join(".ozone").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
