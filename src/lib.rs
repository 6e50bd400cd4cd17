use std::io;

use geo::Geometry;

pub mod config;
pub mod engine;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod reader;
pub mod result;
pub mod source;
pub mod stats;
pub mod wkb;

pub use config::{OpArgs, OutputFormat};
pub use error::{Error, Result};
pub use ops::{dispatch, Operation, OPERATIONS};
pub use pipeline::GeosOp;
pub use result::OpResult;

/// Geometry encodings understood on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Wkt,
    Wkb,
}

/// Loads the geometries named by `descriptor`, reading at most `limit`
/// records from a stream (negative for all).
pub fn load_geometries(descriptor: &str, limit: i64) -> Result<Vec<Geometry<f64>>> {
    reader::load(source::Source::open(descriptor)?, limit)
}

/// Runs one operation over one input, printing to stdout.
pub fn run(args: OpArgs) -> Result<()> {
    let stdout = io::stdout();
    GeosOp::new(args, stdout.lock()).run()
}
