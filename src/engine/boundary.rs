use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, Point, Polygon};

use super::empty;
use crate::error::{Error, Result};

/// OGC boundary. Multi-line endpoints follow the mod-2 rule: an endpoint
/// shared by an even number of lines is interior.
pub fn boundary(geom: &Geometry<f64>) -> Result<Geometry<f64>> {
    let result = match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => empty(),
        Geometry::Line(l) => line_boundary(&[LineString::new(vec![l.start, l.end])]),
        Geometry::LineString(ls) => line_boundary(std::slice::from_ref(ls)),
        Geometry::MultiLineString(mls) => line_boundary(&mls.0),
        Geometry::Polygon(p) => polygon_boundary(p),
        Geometry::Rect(r) => polygon_boundary(&r.to_polygon()),
        Geometry::Triangle(t) => polygon_boundary(&t.to_polygon()),
        Geometry::MultiPolygon(mp) => Geometry::MultiLineString(MultiLineString(
            mp.0.iter().flat_map(rings).cloned().collect(),
        )),
        Geometry::GeometryCollection(_) => {
            return Err(Error::Engine {
                op: "boundary",
                message: "GeometryCollection arguments are not supported".to_string(),
            })
        }
    };
    Ok(result)
}

fn rings(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .filter(|ring| !ring.0.is_empty())
}

fn polygon_boundary(polygon: &Polygon<f64>) -> Geometry<f64> {
    if polygon.interiors().is_empty() && !polygon.exterior().0.is_empty() {
        return Geometry::LineString(polygon.exterior().clone());
    }
    Geometry::MultiLineString(MultiLineString(rings(polygon).cloned().collect()))
}

fn line_boundary(lines: &[LineString<f64>]) -> Geometry<f64> {
    let mut endpoints: Vec<(Coord<f64>, usize)> = Vec::new();
    for line in lines.iter().filter(|l| !l.is_closed()) {
        let (Some(first), Some(last)) = (line.0.first(), line.0.last()) else {
            continue;
        };
        for c in [*first, *last] {
            match endpoints.iter_mut().find(|(seen, _)| *seen == c) {
                Some((_, count)) => *count += 1,
                None => endpoints.push((c, 1)),
            }
        }
    }
    Geometry::MultiPoint(MultiPoint(
        endpoints
            .into_iter()
            .filter(|(_, count)| count % 2 == 1)
            .map(|(c, _)| Point(c))
            .collect(),
    ))
}
