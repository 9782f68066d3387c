//! # ARFF Output Module
//!
//! Formats the materialized WRF buffers as ARFF data rows and streams them,
//! after the static header, to any [`Write`] sink.
//!
//! Rows are generated with `x` as the slowest index and `time` as the fastest,
//! so all time steps of one grid cell are contiguous in the output.

use crate::extract::WrfData;
use crate::schema::{FIELDS_PER_ROW, FogLabel, LINE_SEPARATOR, write_header};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::io::Write;

/// Maximum digits kept after the decimal point.
pub const FRACTION_DIGITS: usize = 5;

/// ARFF marker for a missing value.
pub const MISSING_VALUE: &str = "?";

/// Formats a measurement with at most [`FRACTION_DIGITS`] fractional digits,
/// trailing zeros trimmed.
///
/// Output never depends on the host locale: `.` is always the decimal
/// separator. Non-finite values are written as [`MISSING_VALUE`].
///
/// # Examples
///
/// ```rust
/// use nc2arff::output::format_measurement;
///
/// assert_eq!(format_measurement(1.234567), "1.23457");
/// assert_eq!(format_measurement(273.0), "273");
/// assert_eq!(format_measurement(0.5), "0.5");
/// assert_eq!(format_measurement(f64::NAN), "?");
/// ```
pub fn format_measurement(value: f64) -> String {
    if !value.is_finite() {
        return MISSING_VALUE.to_string();
    }

    let mut text = format!("{:.*}", FRACTION_DIGITS, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Counts gathered while writing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    pub rows: usize,
    pub fog_rows: usize,
}

/// Builds the data row for one `(time, x, y)` cell, without line terminator.
pub fn format_row(data: &WrfData, time: usize, x: usize, y: usize) -> (String, FogLabel) {
    let mut fields = Vec::with_capacity(FIELDS_PER_ROW);
    fields.push(data.time[time].to_string());
    for grid in &data.measurements {
        fields.push(format_measurement(grid.get(time, x, y)));
    }

    let label = FogLabel::from_visibility(data.visibility.get(time, x, y));
    fields.push(label.as_str().to_string());
    (fields.join(","), label)
}

/// Progress bar over the rows of a conversion; hidden when `enabled` is false.
pub fn row_progress(total: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Writes one row per `(x, y, time)` cell, `x` outermost and `time` innermost.
pub fn write_rows<W: Write>(data: &WrfData, writer: &mut W, progress: &ProgressBar) -> std::io::Result<RowStats> {
    let [time_len, x_len, y_len] = data.extents();
    let mut stats = RowStats::default();

    for x in 0..x_len {
        for y in 0..y_len {
            for time in 0..time_len {
                let (row, label) = format_row(data, time, x, y);
                writer.write_all(row.as_bytes())?;
                writer.write_all(LINE_SEPARATOR.as_bytes())?;

                stats.rows += 1;
                if label == FogLabel::Yes {
                    stats.fog_rows += 1;
                }
            }
            progress.inc(time_len as u64);
        }
    }

    Ok(stats)
}

/// Writes the complete ARFF document: header, then every data row.
pub fn write_arff<W: Write>(data: &WrfData, mut writer: W, show_progress: bool) -> std::io::Result<RowStats> {
    write_header(&mut writer)?;

    let progress = row_progress(data.row_count(), show_progress);
    let stats = write_rows(data, &mut writer, &progress)?;
    progress.finish_and_clear();

    writer.flush()?;
    debug!("Wrote {} rows ({} with fog)", stats.rows, stats.fog_rows);
    Ok(stats)
}
