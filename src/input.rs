//! # Input Configuration Module
//!
//! A conversion job names the NetCDF file to read and the ARFF file to write,
//! plus a couple of reporting preferences. Jobs can be built in code, loaded
//! from JSON or YAML, or assembled by the CLI from flags and environment
//! variables (see [`crate::cli`]).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nc2arff::input::JobConfig;
//!
//! // Load from file (YAML when the extension is .yaml/.yml, JSON otherwise)
//! let config = JobConfig::from_file("job.yaml")?;
//!
//! // Load from JSON string
//! let json = r#"{ "input": "wrf.nc4", "output": "wrf.arff" }"#;
//! let config = JobConfig::from_json(json)?;
//! # Ok::<(), nc2arff::error::ConvertError>(())
//! ```

use crate::error::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "wrf.nc4";
pub const DEFAULT_OUTPUT: &str = "wrf.arff";

/// Configuration for one conversion run.
///
/// Every field is optional in a configuration file; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JobConfig {
    /// Path to the input NetCDF file
    pub input: PathBuf,
    /// Path for the output ARFF file
    pub output: PathBuf,
    /// Log filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: Option<String>,
    /// Draw a progress bar while writing rows
    pub progress: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            log_level: None,
            progress: true,
        }
    }
}

impl JobConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input: P, output: Q) -> Self {
        JobConfig {
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    /// Loads a job configuration from a JSON or YAML file.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, anything else as
    /// JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn from_json(json_str: &str) -> ConvertResult<Self> {
        serde_json::from_str(json_str).map_err(|e| ConvertError::Config(format!("invalid JSON: {}", e)))
    }

    pub fn from_yaml(yaml_str: &str) -> ConvertResult<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConvertError::Config(format!("invalid YAML: {}", e)))
    }
}
