use crate::dataset::{Dataset, VariableHandle};
use crate::input::JobConfig;
use crate::ConversionSummary;
use log::{debug, info};
use std::time::Duration;

pub fn show_greeting() {
    info!("=== NetCDF to ARFF Converter ===");
}

pub fn config_echo(config: &JobConfig) {
    info!("Input NetCDF: {}", config.input.display());
    info!("Output ARFF: {}", config.output.display());
}

pub fn show_dimensions(dimensions: &[(String, usize)]) {
    debug!("Dimensions:");
    for (name, len) in dimensions {
        debug!("  {}: {}", name, len);
    }
}

pub fn show_dataset_info<D: Dataset>(dataset: &D) {
    debug!("Variables:");
    for name in dataset.variable_names() {
        if let Some(var) = dataset.variable(&name) {
            debug!("  {}: {:?}", name, var.shape());
        }
    }
}

pub fn show_summary(summary: &ConversionSummary) {
    info!(
        "Grid: {} x {} cells, {} time steps",
        summary.x_len, summary.y_len, summary.time_len
    );
    info!("Rows written: {} ({} with fog)", summary.rows, summary.fog_rows);
}

pub fn show_farewell_with_timing(elapsed: Duration) {
    info!("The WRF file has been converted to ARFF in {:.2?}", elapsed);
}
