//! Well-Known Binary codec and its hex text form.
//!
//! Reads both byte orders and the ISO / EWKB flavours of the type code
//! (Z and M ordinates are read and dropped, an EWKB SRID is skipped).
//! Writes 2D little-endian WKB.

use std::io::{self, Cursor, Read, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use thiserror::Error;

const WKB_POINT: u32 = 1;
const WKB_LINESTRING: u32 = 2;
const WKB_POLYGON: u32 = 3;
const WKB_MULTIPOINT: u32 = 4;
const WKB_MULTILINESTRING: u32 = 5;
const WKB_MULTIPOLYGON: u32 = 6;
const WKB_GEOMETRYCOLLECTION: u32 = 7;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

#[derive(Debug, Error)]
pub enum WkbError {
    #[error("unexpected end of WKB data")]
    UnexpectedEof,

    #[error("unknown byte order marker {0}")]
    ByteOrder(u8),

    #[error("unknown WKB geometry type {0}")]
    GeometryType(u32),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("{0} trailing bytes after geometry")]
    Trailing(usize),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for WkbError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            WkbError::UnexpectedEof
        } else {
            WkbError::Io(e)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Big,
    Little,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    order: ByteOrder,
    kind: u32,
    dims: usize,
}

struct WkbReader<R> {
    inner: R,
}

impl<R: Read> WkbReader<R> {
    fn header(&mut self) -> Result<Header, WkbError> {
        let order = match self.inner.read_u8()? {
            0 => ByteOrder::Big,
            1 => ByteOrder::Little,
            other => return Err(WkbError::ByteOrder(other)),
        };
        let code = self.u32(order)?;
        let mut has_z = code & EWKB_Z != 0;
        let mut has_m = code & EWKB_M != 0;
        if code & EWKB_SRID != 0 {
            self.u32(order)?;
        }
        let iso = code & 0x0FFF_FFFF;
        match iso / 1000 {
            1 => has_z = true,
            2 => has_m = true,
            3 => {
                has_z = true;
                has_m = true;
            }
            _ => {}
        }
        let kind = iso % 1000;
        if !(WKB_POINT..=WKB_GEOMETRYCOLLECTION).contains(&kind) {
            return Err(WkbError::GeometryType(code));
        }
        Ok(Header {
            order,
            kind,
            dims: 2 + has_z as usize + has_m as usize,
        })
    }

    /// Reads the header of a multi-geometry member, which must be `kind`.
    fn member(&mut self, kind: u32) -> Result<Header, WkbError> {
        let h = self.header()?;
        if h.kind != kind {
            return Err(WkbError::GeometryType(h.kind));
        }
        Ok(h)
    }

    fn u32(&mut self, order: ByteOrder) -> Result<u32, WkbError> {
        Ok(match order {
            ByteOrder::Big => self.inner.read_u32::<BigEndian>()?,
            ByteOrder::Little => self.inner.read_u32::<LittleEndian>()?,
        })
    }

    fn f64(&mut self, order: ByteOrder) -> Result<f64, WkbError> {
        Ok(match order {
            ByteOrder::Big => self.inner.read_f64::<BigEndian>()?,
            ByteOrder::Little => self.inner.read_f64::<LittleEndian>()?,
        })
    }

    fn coord(&mut self, h: Header) -> Result<Coord<f64>, WkbError> {
        let x = self.f64(h.order)?;
        let y = self.f64(h.order)?;
        for _ in 2..h.dims {
            self.f64(h.order)?;
        }
        Ok(Coord { x, y })
    }

    fn line_string(&mut self, h: Header) -> Result<LineString<f64>, WkbError> {
        let n = self.u32(h.order)?;
        let coords = (0..n)
            .map(|_| self.coord(h))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LineString::new(coords))
    }

    fn polygon(&mut self, h: Header) -> Result<Polygon<f64>, WkbError> {
        let rings = self.u32(h.order)?;
        if rings == 0 {
            return Ok(Polygon::new(LineString::new(vec![]), vec![]));
        }
        let exterior = self.line_string(h)?;
        let interiors = (1..rings)
            .map(|_| self.line_string(h))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    /// An empty point is encoded with NaN ordinates.
    fn point(&mut self, h: Header) -> Result<Option<Point<f64>>, WkbError> {
        let c = self.coord(h)?;
        if c.x.is_nan() && c.y.is_nan() {
            Ok(None)
        } else {
            Ok(Some(Point(c)))
        }
    }

    fn geometry(&mut self) -> Result<Geometry<f64>, WkbError> {
        let h = self.header()?;
        let geom = match h.kind {
            WKB_POINT => match self.point(h)? {
                Some(p) => Geometry::Point(p),
                None => Geometry::MultiPoint(MultiPoint(vec![])),
            },
            WKB_LINESTRING => Geometry::LineString(self.line_string(h)?),
            WKB_POLYGON => Geometry::Polygon(self.polygon(h)?),
            WKB_MULTIPOINT => {
                let n = self.u32(h.order)?;
                let mut points = Vec::with_capacity((n as usize).min(1024));
                for _ in 0..n {
                    let ph = self.member(WKB_POINT)?;
                    if let Some(p) = self.point(ph)? {
                        points.push(p);
                    }
                }
                Geometry::MultiPoint(MultiPoint(points))
            }
            WKB_MULTILINESTRING => {
                let n = self.u32(h.order)?;
                let mut lines = Vec::with_capacity((n as usize).min(1024));
                for _ in 0..n {
                    let lh = self.member(WKB_LINESTRING)?;
                    lines.push(self.line_string(lh)?);
                }
                Geometry::MultiLineString(MultiLineString(lines))
            }
            WKB_MULTIPOLYGON => {
                let n = self.u32(h.order)?;
                let mut polygons = Vec::with_capacity((n as usize).min(1024));
                for _ in 0..n {
                    let ph = self.member(WKB_POLYGON)?;
                    polygons.push(self.polygon(ph)?);
                }
                Geometry::MultiPolygon(MultiPolygon(polygons))
            }
            _ => {
                let n = self.u32(h.order)?;
                let members = (0..n)
                    .map(|_| self.geometry())
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::GeometryCollection(GeometryCollection(members))
            }
        };
        Ok(geom)
    }
}

/// Decodes exactly one geometry from `bytes`.
pub fn read_geometry(bytes: &[u8]) -> Result<Geometry<f64>, WkbError> {
    let mut reader = WkbReader {
        inner: Cursor::new(bytes),
    };
    let geom = reader.geometry()?;
    let consumed = reader.inner.position() as usize;
    if consumed < bytes.len() {
        return Err(WkbError::Trailing(bytes.len() - consumed));
    }
    Ok(geom)
}

/// Decodes one geometry from its hex text form.
pub fn read_hex(text: &str) -> Result<Geometry<f64>, WkbError> {
    read_geometry(&hex::decode(text)?)
}

fn write_coord<W: Write>(w: &mut W, c: Coord<f64>) -> io::Result<()> {
    w.write_f64::<LittleEndian>(c.x)?;
    w.write_f64::<LittleEndian>(c.y)
}

fn write_header<W: Write>(w: &mut W, kind: u32) -> io::Result<()> {
    w.write_u8(1)?;
    w.write_u32::<LittleEndian>(kind)
}

fn write_ring<W: Write>(w: &mut W, ring: &LineString<f64>) -> io::Result<()> {
    w.write_u32::<LittleEndian>(ring.0.len() as u32)?;
    ring.0.iter().try_for_each(|c| write_coord(w, *c))
}

fn write_polygon<W: Write>(w: &mut W, polygon: &Polygon<f64>) -> io::Result<()> {
    write_header(w, WKB_POLYGON)?;
    if polygon.exterior().0.is_empty() {
        return w.write_u32::<LittleEndian>(0);
    }
    w.write_u32::<LittleEndian>(1 + polygon.interiors().len() as u32)?;
    write_ring(w, polygon.exterior())?;
    polygon.interiors().iter().try_for_each(|r| write_ring(w, r))
}

fn write_geometry<W: Write>(w: &mut W, geom: &Geometry<f64>) -> io::Result<()> {
    match geom {
        Geometry::Point(p) => {
            write_header(w, WKB_POINT)?;
            write_coord(w, p.0)
        }
        Geometry::Line(line) => {
            write_header(w, WKB_LINESTRING)?;
            write_ring(w, &LineString::new(vec![line.start, line.end]))
        }
        Geometry::LineString(ls) => {
            write_header(w, WKB_LINESTRING)?;
            write_ring(w, ls)
        }
        Geometry::Polygon(polygon) => write_polygon(w, polygon),
        Geometry::Rect(rect) => write_polygon(w, &rect.to_polygon()),
        Geometry::Triangle(tri) => write_polygon(w, &tri.to_polygon()),
        Geometry::MultiPoint(mp) => {
            write_header(w, WKB_MULTIPOINT)?;
            w.write_u32::<LittleEndian>(mp.0.len() as u32)?;
            mp.0.iter().try_for_each(|p| {
                write_header(w, WKB_POINT)?;
                write_coord(w, p.0)
            })
        }
        Geometry::MultiLineString(mls) => {
            write_header(w, WKB_MULTILINESTRING)?;
            w.write_u32::<LittleEndian>(mls.0.len() as u32)?;
            mls.0.iter().try_for_each(|ls| {
                write_header(w, WKB_LINESTRING)?;
                write_ring(w, ls)
            })
        }
        Geometry::MultiPolygon(mp) => {
            write_header(w, WKB_MULTIPOLYGON)?;
            w.write_u32::<LittleEndian>(mp.0.len() as u32)?;
            mp.0.iter().try_for_each(|p| write_polygon(w, p))
        }
        Geometry::GeometryCollection(gc) => {
            write_header(w, WKB_GEOMETRYCOLLECTION)?;
            w.write_u32::<LittleEndian>(gc.0.len() as u32)?;
            gc.0.iter().try_for_each(|g| write_geometry(w, g))
        }
    }
}

pub fn to_bytes(geom: &Geometry<f64>) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_geometry(&mut buf, geom);
    buf
}

/// Uppercase hex WKB, the form the binary output format prints.
pub fn to_hex(geom: &Geometry<f64>) -> String {
    hex::encode_upper(to_bytes(geom))
}

pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}
