//! Round-join buffer built from boolean unions of circles and segment
//! rectangles.

use std::f64::consts::PI;

use geo::{BooleanOps, Coord, Geometry, LineString, MultiPolygon, Polygon};

use super::union::cascaded_union;
use super::{empty_polygon, polygonal, Components};

/// Segments used to approximate a quarter circle.
pub const QUADRANT_SEGMENTS: usize = 8;

pub fn buffer(geom: &Geometry<f64>, distance: f64) -> Geometry<f64> {
    let parts = Components::of(geom);
    let shells: Vec<Polygon<f64>> = parts
        .polygons
        .into_iter()
        .filter(|p| !p.exterior().0.is_empty())
        .collect();

    if distance <= 0.0 {
        if shells.is_empty() {
            return Geometry::Polygon(empty_polygon());
        }
        let base = cascaded_union(shells.iter().map(|p| single(p.clone())).collect());
        if distance == 0.0 {
            return polygonal(base);
        }
        let rings: Vec<&LineString<f64>> = shells
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .collect();
        let band = cascaded_union(sweep(&rings, -distance));
        return polygonal(base.difference(&band));
    }

    let mut pieces: Vec<MultiPolygon<f64>> = shells.iter().map(|p| single(p.clone())).collect();
    pieces.extend(parts.points.iter().map(|p| single(circle(p.0, distance))));
    let linework: Vec<&LineString<f64>> = parts
        .lines
        .iter()
        .chain(
            shells
                .iter()
                .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors())),
        )
        .collect();
    pieces.extend(sweep(&linework, distance));
    polygonal(cascaded_union(pieces))
}

fn single(polygon: Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon])
}

/// Circles at every vertex plus a rectangle along every segment.
fn sweep(lines: &[&LineString<f64>], distance: f64) -> Vec<MultiPolygon<f64>> {
    let mut pieces = Vec::new();
    for line in lines {
        for c in line.coords() {
            pieces.push(single(circle(*c, distance)));
        }
        for segment in line.lines() {
            if let Some(rect) = segment_rect(segment.start, segment.end, distance) {
                pieces.push(single(rect));
            }
        }
    }
    pieces
}

fn circle(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let steps = QUADRANT_SEGMENTS * 4;
    let mut ring: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / steps as f64;
            Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);
    Polygon::new(LineString::new(ring), vec![])
}

fn segment_rect(a: Coord<f64>, b: Coord<f64>, distance: f64) -> Option<Polygon<f64>> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return None;
    }
    let n = Coord {
        x: -dy / len * distance,
        y: dx / len * distance,
    };
    Some(Polygon::new(
        LineString::new(vec![a + n, b + n, b - n, a - n, a + n]),
        vec![],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{area, geometry_type};
    use geo::{line_string, point, polygon};

    fn regular_polygon_area(radius: f64) -> f64 {
        let n = (QUADRANT_SEGMENTS * 4) as f64;
        0.5 * n * radius * radius * (2.0 * PI / n).sin()
    }

    #[test]
    fn point_buffer_is_a_circle() {
        let buffered = buffer(&Geometry::Point(point!(x: 0., y: 0.)), 1.0);
        assert_eq!(geometry_type(&buffered), "Polygon");
        assert!((area(&buffered) - regular_polygon_area(1.0)).abs() < 1e-9);
    }

    #[test]
    fn line_buffer_covers_the_corridor() {
        let line = Geometry::LineString(line_string![(x: 0., y: 0.), (x: 10., y: 0.)]);
        let buffered = buffer(&line, 1.0);
        let a = area(&buffered);
        assert!(a > 20.0 && a < 20.0 + PI);
    }

    #[test]
    fn negative_buffer_shrinks_polygons() {
        let square = Geometry::Polygon(polygon![
            (x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.), (x: 0., y: 0.)
        ]);
        let shrunk = buffer(&square, -1.0);
        assert!((area(&shrunk) - 64.0).abs() < 1e-6);
    }

    #[test]
    fn non_positive_buffer_of_point_is_empty() {
        let buffered = buffer(&Geometry::Point(point!(x: 0., y: 0.)), 0.0);
        assert_eq!(area(&buffered), 0.0);
        assert_eq!(geometry_type(&buffered), "Polygon");
    }
}
