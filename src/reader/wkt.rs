use std::io::BufRead;

use geo::Geometry;
use tracing::trace;

use super::GeometryReader;
use crate::engine;
use crate::error::{Error, Result};

/// Reads whitespace-separated WKT records from a stream.
///
/// A record ends when its parentheses balance, or at a top-level `EMPTY`
/// keyword. The stream is consumed exactly up to the end of each record.
pub struct WktStreamReader<R> {
    input: R,
    record: usize,
}

impl<R: BufRead> WktStreamReader<R> {
    pub fn new(input: R) -> Self {
        Self { input, record: 0 }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.input.fill_buf()?.first().copied())
    }

    fn bump(&mut self) {
        self.input.consume(1);
    }

    fn next_record(&mut self) -> Result<Option<String>> {
        loop {
            match self.peek()? {
                Some(b) if b.is_ascii_whitespace() => self.bump(),
                Some(_) => break,
                None => return Ok(None),
            }
        }
        self.record += 1;

        let mut text = Vec::new();
        let mut word = Vec::new();
        let mut depth = 0usize;
        while let Some(b) = self.peek()? {
            self.bump();
            text.push(b);
            match b {
                b'(' => {
                    depth += 1;
                    word.clear();
                }
                b')' => {
                    if depth == 0 {
                        return Err(Error::decode(self.record, "unbalanced ')'"));
                    }
                    depth -= 1;
                    if depth == 0 {
                        return self.finish(text).map(Some);
                    }
                }
                _ if depth > 0 => {}
                _ if b.is_ascii_alphanumeric() => {
                    word.push(b.to_ascii_uppercase());
                    let at_word_end = !matches!(self.peek()?, Some(n) if n.is_ascii_alphanumeric());
                    if at_word_end && word == b"EMPTY" {
                        return self.finish(text).map(Some);
                    }
                }
                _ => word.clear(),
            }
        }
        Err(Error::decode(self.record, "unexpected end of input"))
    }

    fn finish(&self, text: Vec<u8>) -> Result<String> {
        String::from_utf8(text).map_err(|_| Error::decode(self.record, "record is not valid UTF-8"))
    }
}

impl<R: BufRead> GeometryReader for WktStreamReader<R> {
    fn next_geometry(&mut self) -> Result<Option<Geometry<f64>>> {
        let Some(text) = self.next_record()? else {
            return Ok(None);
        };
        let geom = engine::parse_wkt(&text).map_err(|e| Error::decode(self.record, e))?;
        trace!(record = self.record, kind = engine::geometry_type(&geom), "decoded WKT record");
        Ok(Some(geom))
    }
}
