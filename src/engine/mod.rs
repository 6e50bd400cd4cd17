//! Geometry engine facade.
//!
//! Everything the pipeline needs from a geometry library goes through here:
//! naming, vertex counting, WKT text, and the operations themselves. Most
//! operations map straight onto `geo` algorithms; the ones `geo` does not
//! provide live in the submodules.

use geo::{
    BoundingRect, Centroid, ConvexHull, Coord, CoordsIter, Geometry, GeometryCollection,
    InteriorPoint, LineString, MultiPolygon, Point, Polygon,
};
use wkt::{ToWkt, TryFromWkt};

pub mod boundary;
pub mod buffer;
pub mod measure;
pub mod union;
pub mod validity;

pub use boundary::boundary;
pub use buffer::buffer;
pub use measure::{area, length};
pub use union::unary_union;
pub use validity::is_valid;

/// The OGC type name of a geometry, e.g. `"Polygon"`.
pub fn geometry_type(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) | Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

pub fn num_points(geom: &Geometry<f64>) -> usize {
    geom.coords_count()
}

pub fn to_wkt(geom: &Geometry<f64>) -> String {
    geom.wkt_string()
}

pub fn parse_wkt(text: &str) -> Result<Geometry<f64>, String> {
    Geometry::<f64>::try_from_wkt_str(text).map_err(|e| e.to_string())
}

pub fn empty() -> Geometry<f64> {
    Geometry::GeometryCollection(GeometryCollection(vec![]))
}

pub(crate) fn empty_polygon() -> Polygon<f64> {
    Polygon::new(LineString::new(vec![]), vec![])
}

/// Merges copies of `geoms` into one collection. The inputs stay untouched.
pub fn collect(geoms: &[Geometry<f64>]) -> Geometry<f64> {
    Geometry::GeometryCollection(GeometryCollection(geoms.to_vec()))
}

pub fn centroid(geom: &Geometry<f64>) -> Geometry<f64> {
    geom.centroid().map(Geometry::Point).unwrap_or_else(empty)
}

pub fn interior_point(geom: &Geometry<f64>) -> Geometry<f64> {
    geom.interior_point().map(Geometry::Point).unwrap_or_else(empty)
}

/// Bounding box, collapsed to a point or a line when it has no area.
pub fn envelope(geom: &Geometry<f64>) -> Geometry<f64> {
    let Some(rect) = geom.bounding_rect() else {
        return empty();
    };
    match (rect.width() == 0.0, rect.height() == 0.0) {
        (true, true) => Geometry::Point(Point(rect.min())),
        (true, false) | (false, true) => {
            Geometry::LineString(LineString::new(vec![rect.min(), rect.max()]))
        }
        (false, false) => Geometry::Polygon(rect.to_polygon()),
    }
}

/// Convex hull, collapsed to a point or a line for degenerate inputs.
pub fn convex_hull(geom: &Geometry<f64>) -> Geometry<f64> {
    let hull = geom.convex_hull();
    let mut distinct: Vec<Coord<f64>> = Vec::new();
    for c in hull.exterior().coords() {
        if !distinct.contains(c) {
            distinct.push(*c);
        }
    }
    match distinct.len() {
        0 => empty(),
        1 => Geometry::Point(Point(distinct[0])),
        2 => Geometry::LineString(LineString::new(distinct)),
        _ => Geometry::Polygon(hull),
    }
}

/// The simple parts of a geometry, with collections flattened.
#[derive(Debug, Default)]
pub(crate) struct Components {
    pub points: Vec<Point<f64>>,
    pub lines: Vec<LineString<f64>>,
    pub polygons: Vec<Polygon<f64>>,
}

impl Components {
    pub fn of(geom: &Geometry<f64>) -> Self {
        let mut parts = Components::default();
        parts.add(geom);
        parts
    }

    fn add(&mut self, geom: &Geometry<f64>) {
        match geom {
            Geometry::Point(p) => self.points.push(*p),
            Geometry::Line(l) => self.lines.push(LineString::new(vec![l.start, l.end])),
            Geometry::LineString(ls) => self.lines.push(ls.clone()),
            Geometry::Polygon(p) => self.polygons.push(p.clone()),
            Geometry::Rect(r) => self.polygons.push(r.to_polygon()),
            Geometry::Triangle(t) => self.polygons.push(t.to_polygon()),
            Geometry::MultiPoint(mp) => self.points.extend(mp.0.iter().copied()),
            Geometry::MultiLineString(mls) => self.lines.extend(mls.0.iter().cloned()),
            Geometry::MultiPolygon(mp) => self.polygons.extend(mp.0.iter().cloned()),
            Geometry::GeometryCollection(gc) => gc.0.iter().for_each(|g| self.add(g)),
        }
    }
}

/// Wraps a polygon set as the narrowest polygonal geometry.
pub(crate) fn polygonal(mut mp: MultiPolygon<f64>) -> Geometry<f64> {
    match mp.0.len() {
        0 => Geometry::Polygon(empty_polygon()),
        1 => Geometry::Polygon(mp.0.remove(0)),
        _ => Geometry::MultiPolygon(mp),
    }
}
