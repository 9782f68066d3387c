//! # ARFF Schema
//!
//! The output schema is fixed: one integer `time` attribute, fifteen numeric
//! measurements read from WRF variables and the nominal `fog` class derived
//! from `visibility`. The header text depends on nothing but this table.

use std::io::Write;

/// Line terminator used for every line of the output file.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

pub const RELATION_NAME: &str = "wrf";

pub const X_VARIABLE: &str = "x";
pub const Y_VARIABLE: &str = "y";
pub const TIME_VARIABLE: &str = "time";
pub const VISIBILITY_VARIABLE: &str = "visibility";

/// Name of the attribute emitted for the time coordinate.
pub const TIME_ATTRIBUTE: &str = "time";
pub const CLASS_ATTRIBUTE: &str = "fog";

/// Visibility above this value (source units) means no fog.
pub const FOG_VISIBILITY_THRESHOLD: f64 = 5000.0;

/// A measurement column: the variable it is read from and the attribute it
/// is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub source: &'static str,
    pub attribute: &'static str,
}

/// Measurement columns in output order.
pub const MEASUREMENTS: [Measurement; 15] = [
    Measurement { source: "prec", attribute: "rain_prec" },
    Measurement { source: "snow_prec", attribute: "snow_prec" },
    Measurement { source: "topo", attribute: "terrain_height" },
    Measurement { source: "wind_gust", attribute: "wind_gust" },
    Measurement { source: "snowlevel", attribute: "snow_level" },
    Measurement { source: "T850", attribute: "temperature_850mb" },
    Measurement { source: "T500", attribute: "temperature_500mb" },
    Measurement { source: "temp", attribute: "temperature" },
    Measurement { source: "rh", attribute: "relative_humidity" },
    Measurement { source: "cft", attribute: "cloud_cover_low" },
    Measurement { source: "cfl", attribute: "cloud_area_low" },
    Measurement { source: "cfm", attribute: "cloud_area_mid" },
    Measurement { source: "cfh", attribute: "cloud_area_high" },
    Measurement { source: "shflx", attribute: "hot_air_flow_sensible" },
    Measurement { source: "lhflx", attribute: "hot_air_flow_latent" },
];

/// Fields per data row: time, the measurements and the class label.
pub const FIELDS_PER_ROW: usize = MEASUREMENTS.len() + 2;

/// Value of the `fog` class attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogLabel {
    Yes,
    No,
}

impl FogLabel {
    /// Classifies a visibility reading. Only a value strictly above
    /// [`FOG_VISIBILITY_THRESHOLD`] counts as clear.
    pub fn from_visibility(visibility: f64) -> Self {
        if visibility > FOG_VISIBILITY_THRESHOLD {
            FogLabel::No
        } else {
            FogLabel::Yes
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FogLabel::Yes => "Yes",
            FogLabel::No => "No",
        }
    }
}

/// Every variable the dataset must expose, dimension variables first.
pub fn required_variables() -> Vec<&'static str> {
    let mut names = vec![X_VARIABLE, Y_VARIABLE, TIME_VARIABLE];
    names.extend(MEASUREMENTS.iter().map(|m| m.source));
    names.push(VISIBILITY_VARIABLE);
    names
}

/// Names of the numeric attributes in declaration order.
pub fn numeric_attributes() -> Vec<&'static str> {
    let mut names = vec![TIME_ATTRIBUTE];
    names.extend(MEASUREMENTS.iter().map(|m| m.attribute));
    names
}

/// Builds the ARFF header, up to and including the `@data` marker.
pub fn header() -> String {
    let mut text = String::new();
    text.push_str(&format!("@relation {}{}", RELATION_NAME, LINE_SEPARATOR));
    text.push_str(LINE_SEPARATOR);
    for name in numeric_attributes() {
        text.push_str(&format!("@attribute {} numeric{}", name, LINE_SEPARATOR));
    }
    text.push_str(&format!(
        "@attribute {} {{{},{}}}{}",
        CLASS_ATTRIBUTE,
        FogLabel::Yes.as_str(),
        FogLabel::No.as_str(),
        LINE_SEPARATOR
    ));
    text.push_str(LINE_SEPARATOR);
    text.push_str("@data");
    text.push_str(LINE_SEPARATOR);
    text
}

pub fn write_header<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writer.write_all(header().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_variables_count_and_order() {
        let names = required_variables();
        assert_eq!(names.len(), 19);
        assert_eq!(&names[..3], &["x", "y", "time"]);
        assert_eq!(names[3], "prec");
        assert_eq!(names[18], "visibility");
    }

    #[test]
    fn test_header_declares_attributes_in_order() {
        let header = header();
        let lines: Vec<&str> = header.lines().collect();

        assert_eq!(lines[0], "@relation wrf");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "@attribute time numeric");
        assert_eq!(lines[3], "@attribute rain_prec numeric");
        assert_eq!(lines[8], "@attribute temperature_850mb numeric");
        assert_eq!(lines[17], "@attribute hot_air_flow_latent numeric");
        assert_eq!(lines[18], "@attribute fog {Yes,No}");
        assert_eq!(lines[19], "");
        assert_eq!(lines[20], "@data");
        assert_eq!(lines.len(), 21);
        assert!(header.ends_with(LINE_SEPARATOR));
    }

    #[test]
    fn test_fog_threshold_is_strict() {
        assert_eq!(FogLabel::from_visibility(4000.0), FogLabel::Yes);
        assert_eq!(FogLabel::from_visibility(5000.0), FogLabel::Yes);
        assert_eq!(FogLabel::from_visibility(5000.001), FogLabel::No);
        assert_eq!(FogLabel::from_visibility(24000.0), FogLabel::No);
        assert_eq!(FogLabel::from_visibility(f64::NAN), FogLabel::Yes);
    }
}
