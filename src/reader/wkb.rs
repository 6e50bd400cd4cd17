use std::io::BufRead;

use geo::Geometry;
use tracing::trace;

use super::GeometryReader;
use crate::error::{Error, Result};
use crate::{engine, wkb};

/// Reads hex-encoded WKB, one record per line. Blank lines are skipped.
pub struct WkbStreamReader<R> {
    input: R,
    line: String,
    record: usize,
}

impl<R: BufRead> WkbStreamReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
            record: 0,
        }
    }
}

impl<R: BufRead> GeometryReader for WkbStreamReader<R> {
    fn next_geometry(&mut self) -> Result<Option<Geometry<f64>>> {
        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            let hex = self.line.trim();
            if hex.is_empty() {
                continue;
            }
            self.record += 1;
            let geom = wkb::read_hex(hex).map_err(|e| Error::decode(self.record, e.to_string()))?;
            trace!(record = self.record, kind = engine::geometry_type(&geom), "decoded WKB record");
            return Ok(Some(geom));
        }
    }
}
