//! # nc2arff
//!
//! A Rust library for turning WRF weather-model output stored as NetCDF into
//! ARFF datasets for fog classification.
//!
//! ## Features
//!
//! - **Fixed schema**: fifteen surface and upper-air measurements per grid cell and time step
//! - **Derived class**: `fog` is `Yes` unless visibility exceeds 5000
//! - **All-or-nothing validation**: a dataset missing any required variable produces no rows
//! - **Locale-independent output**: numbers always use `.` and at most five decimals
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nc2arff::{process_conversion_job, input::JobConfig};
//!
//! let config = JobConfig::new("wrf.nc4", "wrf.arff");
//! let summary = process_conversion_job(&config).expect("Failed to convert WRF file");
//! println!("{} rows written", summary.rows);
//! ```
//!
//! ## Configuration Example
//!
//! ```yaml
//! input: wrf.nc4
//! output: wrf.arff
//! log_level: info
//! progress: true
//! ```

pub mod cli;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod input;
pub mod log;
pub mod output;
pub mod schema;


use crate::dataset::{Dataset, NetcdfDataset};
use crate::error::ConvertResult;
use crate::extract::{WrfData, load_wrf_data};
use crate::input::JobConfig;
use crate::log::{show_dataset_info, show_dimensions};
use crate::output::{RowStats, write_arff};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub x_len: usize,
    pub y_len: usize,
    pub time_len: usize,
    /// Data rows written; always `x_len * y_len * time_len`.
    pub rows: usize,
    /// Rows labelled `fog = Yes`.
    pub fog_rows: usize,
}

impl ConversionSummary {
    fn new(data: &WrfData, stats: RowStats) -> Self {
        let [time_len, x_len, y_len] = data.extents();
        ConversionSummary {
            x_len,
            y_len,
            time_len,
            rows: stats.rows,
            fog_rows: stats.fog_rows,
        }
    }
}

/// Converts any [`Dataset`] into an ARFF document written to `writer`.
///
/// The dataset is validated and fully read before the first byte is written,
/// so a malformed dataset leaves `writer` untouched.
pub fn convert<D: Dataset, W: Write>(dataset: &D, writer: W, show_progress: bool) -> ConvertResult<ConversionSummary> {
    let data = load_wrf_data(dataset)?;
    let stats = write_arff(&data, writer, show_progress)?;
    Ok(ConversionSummary::new(&data, stats))
}

/// Converts the NetCDF file named by `config.input` into the ARFF file named
/// by `config.output`.
///
/// This function orchestrates the entire conversion pipeline:
/// 1. Opens the NetCDF file
/// 2. Resolves and validates all 19 required variables
/// 3. Reads every variable into memory and closes the input
/// 4. Creates the output file, writes the header and one row per `(x, y, time)`
///
/// The input is closed on every path. A failure to close it is logged and
/// does not change the result.
///
/// # Errors
///
/// This function will return an error if:
/// - The NetCDF file cannot be opened or a variable cannot be read
/// - A required variable is missing or has an unexpected shape
/// - The output file cannot be created or written
pub fn process_conversion_job(config: &JobConfig) -> ConvertResult<ConversionSummary> {
    let dataset = NetcdfDataset::open(&config.input)?;
    show_dimensions(&dataset.dimensions());
    show_dataset_info(&dataset);

    let loaded = load_wrf_data(&dataset);
    let input = dataset.path().to_path_buf();
    if let Err(e) = dataset.close() {
        ::log::warn!("Failed to close input file {}: {}", input.display(), e);
    }
    let data = loaded?;

    let file = File::create(&config.output)?;
    let stats = write_arff(&data, BufWriter::new(file), config.progress)?;
    Ok(ConversionSummary::new(&data, stats))
}
