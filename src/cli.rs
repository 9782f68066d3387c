//! # CLI Module
//!
//! This module provides the command-line interface for nc2arff:
//! - Argument parsing with clap (`-h`, `-i`, `-o`)
//! - Environment variable fallbacks with the NC2ARFF_ prefix
//! - An optional JSON/YAML job file named by `NC2ARFF_CONFIG`
//!
//! Priority when resolving a job: flag > environment variable > job file > default.

use crate::error::{ConvertError, ConvertResult};
use crate::input::JobConfig;
use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a JSON or YAML job file.
pub const CONFIG_ENV: &str = "NC2ARFF_CONFIG";
pub const INPUT_ENV: &str = "NC2ARFF_INPUT";
pub const OUTPUT_ENV: &str = "NC2ARFF_OUTPUT";
pub const LOG_LEVEL_ENV: &str = "NC2ARFF_LOG_LEVEL";

#[cfg(test)]
pub(crate) static ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Converts WRF NetCDF model output to ARFF
#[derive(Parser, Debug)]
#[command(name = "nc2arff")]
#[command(about = "Convert WRF NetCDF files to ARFF datasets for fog classification")]
#[command(disable_version_flag = true)]
#[command(long_about = "
nc2arff reads a WRF NetCDF file and writes one ARFF row per (x, y, time) cell with
fifteen measurements and a fog class derived from visibility.

ENVIRONMENT:
  NC2ARFF_INPUT       Input file when -i is not given
  NC2ARFF_OUTPUT      Output file when -o is not given
  NC2ARFF_CONFIG      JSON or YAML job file with input, output, log_level, progress
  NC2ARFF_LOG_LEVEL   Log filter (error, warn, info, debug, trace)

EXAMPLES:
  # Convert wrf.nc4 into wrf.arff
  nc2arff

  # Explicit paths
  nc2arff -i galicia_20170101.nc4 -o galicia_20170101.arff
")]
pub struct Cli {
    /// Input file, in NetCDF format [default: wrf.nc4]
    #[arg(short = 'i', value_name = "PATH", env = "NC2ARFF_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file, in ARFF format [default: wrf.arff]
    #[arg(short = 'o', value_name = "PATH", env = "NC2ARFF_OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Overlays the paths given on the command line onto `base`.
    pub fn resolve(&self, base: JobConfig) -> JobConfig {
        JobConfig {
            input: self.input.clone().unwrap_or(base.input),
            output: self.output.clone().unwrap_or(base.output),
            ..base
        }
    }
}

/// Why no job could be built from the command line and environment.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Usage request or malformed arguments, reported by clap.
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error(transparent)]
    Config(#[from] ConvertError),
}

/// `NC2ARFF_LOG_LEVEL`, trimmed, when set to something non-empty.
pub fn env_log_level() -> Option<String> {
    env::var(LOG_LEVEL_ENV)
        .ok()
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
}

/// Builds the job that command-line values are layered onto: the file named
/// by `NC2ARFF_CONFIG` if set, defaults otherwise, with `NC2ARFF_LOG_LEVEL`
/// taking precedence over the file's `log_level`.
pub fn load_base_config() -> ConvertResult<JobConfig> {
    let mut config = match env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => JobConfig::from_file(path.trim())?,
        _ => JobConfig::default(),
    };

    if let Some(level) = env_log_level() {
        config.log_level = Some(level);
    }

    Ok(config)
}

/// Parses `args`, then loads the base job and overlays the parsed paths.
///
/// The arguments are checked before `NC2ARFF_CONFIG` is read, so a usage
/// request or a malformed command line never touches the file system.
pub fn parse_job<I, T>(args: I) -> Result<JobConfig, StartupError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let base = load_base_config()?;
    Ok(cli.resolve(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind as ClapErrorKind;
    use std::fs;
    use tempfile::tempdir;

    fn clear_env() {
        unsafe {
            env::remove_var(CONFIG_ENV);
            env::remove_var(LOG_LEVEL_ENV);
            env::remove_var(INPUT_ENV);
            env::remove_var(OUTPUT_ENV);
        }
    }

    #[test]
    fn test_base_config_defaults_without_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = load_base_config().unwrap();
        assert_eq!(config, JobConfig::default());
    }

    #[test]
    fn test_base_config_from_config_file_and_log_level() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("job.yaml");
        fs::write(&path, "input: from_file.nc4\noutput: from_file.arff\nlog_level: warn\n").unwrap();

        unsafe {
            env::set_var(CONFIG_ENV, &path);
        }
        let config = load_base_config().unwrap();
        assert_eq!(config.input, PathBuf::from("from_file.nc4"));
        assert_eq!(config.output, PathBuf::from("from_file.arff"));
        assert_eq!(config.log_level.as_deref(), Some("warn"));

        unsafe {
            env::set_var(LOG_LEVEL_ENV, "debug");
        }
        let config = load_base_config().unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        clear_env();
    }

    #[test]
    fn test_base_config_missing_file_is_config_error() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        unsafe {
            env::set_var(CONFIG_ENV, "/nonexistent/nc2arff.json");
        }
        let result = load_base_config();
        clear_env();

        assert!(matches!(result, Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        unsafe {
            env::set_var(INPUT_ENV, "env.nc4");
            env::set_var(OUTPUT_ENV, "env.arff");
        }
        let base = JobConfig::new("file.nc4", "file.arff");

        let from_env = Cli::try_parse_from(["nc2arff"]).unwrap().resolve(base.clone());
        assert_eq!(from_env.input, PathBuf::from("env.nc4"));
        assert_eq!(from_env.output, PathBuf::from("env.arff"));

        let from_flags = Cli::try_parse_from(["nc2arff", "-i", "flag.nc4"])
            .unwrap()
            .resolve(base);
        assert_eq!(from_flags.input, PathBuf::from("flag.nc4"));
        assert_eq!(from_flags.output, PathBuf::from("env.arff"));

        clear_env();
    }

    #[test]
    fn test_env_log_level_ignores_blank_values() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        assert_eq!(env_log_level(), None);
        unsafe {
            env::set_var(LOG_LEVEL_ENV, "   ");
        }
        assert_eq!(env_log_level(), None);
        unsafe {
            env::set_var(LOG_LEVEL_ENV, " trace ");
        }
        assert_eq!(env_log_level().as_deref(), Some("trace"));

        clear_env();
    }

    #[test]
    fn test_parse_job_checks_arguments_before_reading_config() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        unsafe {
            env::set_var(CONFIG_ENV, "/nonexistent/nc2arff.json");
        }
        let help = parse_job(["nc2arff", "-h"]);
        let malformed = parse_job(["nc2arff", "-x"]);
        let valid = parse_job(["nc2arff", "-i", "wrf.nc4"]);
        clear_env();

        assert!(matches!(help, Err(StartupError::Args(ref e)) if e.kind() == ClapErrorKind::DisplayHelp));
        assert!(matches!(malformed, Err(StartupError::Args(ref e)) if e.kind() == ClapErrorKind::UnknownArgument));
        assert!(matches!(valid, Err(StartupError::Config(ConvertError::Config(_)))));
    }

    #[test]
    fn test_parse_job_layers_flags_onto_config_file() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("job.json");
        fs::write(&path, r#"{"input": "from_file.nc4", "output": "from_file.arff", "progress": false}"#).unwrap();

        unsafe {
            env::set_var(CONFIG_ENV, &path);
        }
        let config = parse_job(["nc2arff", "-o", "flag.arff"]);
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.input, PathBuf::from("from_file.nc4"));
        assert_eq!(config.output, PathBuf::from("flag.arff"));
        assert!(!config.progress);
    }
}
