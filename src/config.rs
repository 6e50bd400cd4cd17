use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ops::NO_OP;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Results are computed but not printed.
    #[default]
    None,
    Wkt,
    /// Hex-encoded WKB for geometry results.
    Wkb,
    GeoJson,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(OutputFormat::None),
            "txt" | "wkt" => Ok(OutputFormat::Wkt),
            "wkb" => Ok(OutputFormat::Wkb),
            "geojson" => Ok(OutputFormat::GeoJson),
            other => Err(Error::InvalidFormat(other.to_string())),
        }
    }
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct OpArgs {
    /// Input descriptor: a literal, a file name, or a stdin sentinel.
    pub src_a: String,
    /// Maximum number of geometries to read; negative reads all.
    pub limit_a: i64,
    /// Merge all inputs into one collection before running the operation.
    pub collect: bool,
    pub format: OutputFormat,
    pub show_time: bool,
    pub verbose: bool,
    pub op_name: String,
    pub op_arg: f64,
}

impl Default for OpArgs {
    fn default() -> Self {
        Self {
            src_a: String::new(),
            limit_a: -1,
            collect: true,
            format: OutputFormat::None,
            show_time: false,
            verbose: false,
            op_name: NO_OP.to_string(),
            op_arg: 0.0,
        }
    }
}

/// Parses the numeric operation argument.
pub fn parse_op_arg(s: &str) -> Result<f64> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(s.to_string()))
}
