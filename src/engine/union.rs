use geo::{
    BooleanOps, Geometry, GeometryCollection, Intersects, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point,
};

use super::{empty, polygonal, Components};

/// Unions polygon sets pairwise until one remains.
pub(crate) fn cascaded_union(mut parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while parts.len() > 1 {
        let mut merged = Vec::with_capacity((parts.len() + 1) / 2);
        let mut iter = parts.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => merged.push(a.union(&b)),
                None => merged.push(a),
            }
        }
        parts = merged;
    }
    parts.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Dissolves a geometry into itself: polygons are merged, repeated lines
/// and points are dropped, and points already covered by another part
/// disappear.
pub fn unary_union(geom: &Geometry<f64>) -> Geometry<f64> {
    let parts = Components::of(geom);

    let polygons = cascaded_union(
        parts
            .polygons
            .into_iter()
            .filter(|p| !p.exterior().0.is_empty())
            .map(|p| MultiPolygon::new(vec![p]))
            .collect(),
    );

    let mut lines: Vec<LineString<f64>> = Vec::new();
    for line in parts.lines.into_iter().filter(|l| !l.0.is_empty()) {
        let reversed: Vec<_> = line.0.iter().rev().copied().collect();
        if !lines.iter().any(|seen| *seen == line || seen.0 == reversed) {
            lines.push(line);
        }
    }

    let mut points: Vec<Point<f64>> = Vec::new();
    for point in parts.points {
        let covered = points.contains(&point)
            || polygons.intersects(&point)
            || lines.iter().any(|l| l.intersects(&point));
        if !covered {
            points.push(point);
        }
    }

    let mut members = Vec::new();
    if !points.is_empty() {
        members.push(match points.len() {
            1 => Geometry::Point(points[0]),
            _ => Geometry::MultiPoint(MultiPoint(points)),
        });
    }
    if !lines.is_empty() {
        members.push(match lines.len() {
            1 => Geometry::LineString(lines.remove(0)),
            _ => Geometry::MultiLineString(MultiLineString(lines)),
        });
    }
    if !polygons.0.is_empty() {
        members.push(polygonal(polygons));
    }

    match members.len() {
        0 => empty(),
        1 => members.remove(0),
        _ => Geometry::GeometryCollection(GeometryCollection(members)),
    }
}
