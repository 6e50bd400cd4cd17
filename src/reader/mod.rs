//! Forward-only geometry readers, one per encoding.

use std::io::BufRead;

use geo::Geometry;

use crate::engine;
use crate::error::{Error, Result};
use crate::source::Source;
use crate::Encoding;

pub mod wkb;
pub mod wkt;

pub use self::wkb::WkbStreamReader;
pub use self::wkt::WktStreamReader;

pub trait GeometryReader {
    /// Decodes the next record. `Ok(None)` marks the end of the stream.
    fn next_geometry(&mut self) -> Result<Option<Geometry<f64>>>;
}

/// Opens a reader of the given encoding over `input`.
pub fn stream_reader<'a>(encoding: Encoding, input: Box<dyn BufRead + 'a>) -> Box<dyn GeometryReader + 'a> {
    match encoding {
        Encoding::Wkt => Box::new(WktStreamReader::new(input)),
        Encoding::Wkb => Box::new(WkbStreamReader::new(input)),
    }
}

/// Pulls records until the stream ends or `limit` geometries are read.
/// A negative limit reads everything.
pub fn read_all<R: GeometryReader + ?Sized>(
    reader: &mut R,
    limit: i64,
) -> Result<Vec<Geometry<f64>>> {
    let mut geoms = Vec::new();
    while limit < 0 || (geoms.len() as i64) < limit {
        match reader.next_geometry()? {
            Some(geom) => geoms.push(geom),
            None => break,
        }
    }
    Ok(geoms)
}

pub fn read_literal(encoding: Encoding, text: &str) -> Result<Geometry<f64>> {
    match encoding {
        Encoding::Wkt => engine::parse_wkt(text).map_err(|e| Error::decode(1, e)),
        Encoding::Wkb => crate::wkb::read_hex(text).map_err(|e| Error::decode(1, e.to_string())),
    }
}

/// Loads everything a source yields. Literals produce exactly one geometry
/// and ignore the limit.
pub fn load(source: Source, limit: i64) -> Result<Vec<Geometry<f64>>> {
    match source {
        Source::Literal { encoding, text } => Ok(vec![read_literal(encoding, &text)?]),
        Source::Stream { encoding, reader } => {
            let mut reader = stream_reader(encoding, reader);
            read_all(reader.as_mut(), limit)
        }
    }
}
