//! Simple-features validity.
//!
//! Covers the checks that matter for the inputs this tool sees: finite
//! coordinates, minimum vertex counts, closed rings, ring self-intersection,
//! crossing rings, holes inside their shell and non-overlapping
//! multipolygon members. Segment pairs are found through an R-tree.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Contains, Coord, Geometry, Intersects, Line, LineString, Point, Polygon};
use rstar::{RTree, RTreeObject, AABB};

pub fn is_valid(geom: &Geometry<f64>) -> bool {
    match geom {
        Geometry::Point(p) => finite(p.0),
        Geometry::Line(l) => finite(l.start) && finite(l.end) && l.start != l.end,
        Geometry::LineString(ls) => line_ok(ls),
        Geometry::Polygon(p) => polygon_ok(p),
        Geometry::Rect(r) => finite(r.min()) && finite(r.max()),
        Geometry::Triangle(t) => polygon_ok(&t.to_polygon()),
        Geometry::MultiPoint(mp) => mp.0.iter().all(|p| finite(p.0)),
        Geometry::MultiLineString(mls) => mls.0.iter().all(line_ok),
        Geometry::MultiPolygon(mp) => mp.0.iter().all(polygon_ok) && members_disjoint(&mp.0),
        Geometry::GeometryCollection(gc) => gc.0.iter().all(is_valid),
    }
}

fn finite(c: Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

fn distinct_count(ls: &LineString<f64>) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::new();
    for c in ls.coords() {
        if !seen.contains(c) {
            seen.push(*c);
        }
    }
    seen.len()
}

fn line_ok(ls: &LineString<f64>) -> bool {
    ls.0.is_empty() || (ls.coords().all(|c| finite(*c)) && distinct_count(ls) >= 2)
}

fn ring_ok(ring: &LineString<f64>) -> bool {
    ring.coords().all(|c| finite(*c))
        && ring.0.len() >= 4
        && ring.is_closed()
        && distinct_count(ring) >= 3
}

fn polygon_ok(polygon: &Polygon<f64>) -> bool {
    let shell = polygon.exterior();
    if shell.0.is_empty() {
        return polygon.interiors().is_empty();
    }
    let rings: Vec<&LineString<f64>> = std::iter::once(shell)
        .chain(polygon.interiors())
        .collect();
    if !rings.iter().all(|r| ring_ok(r)) || has_bad_intersection(&rings, true) {
        return false;
    }

    let shell_area = Polygon::new(shell.clone(), vec![]);
    let holes: Vec<Polygon<f64>> = polygon
        .interiors()
        .iter()
        .map(|h| Polygon::new(h.clone(), vec![]))
        .collect();
    for (i, hole) in holes.iter().enumerate() {
        if !inside(hole.exterior(), &shell_area) {
            return false;
        }
        let nested = holes
            .iter()
            .enumerate()
            .any(|(j, other)| i != j && strictly_inside_any(hole.exterior(), other));
        if nested {
            return false;
        }
    }
    true
}

/// True when `ring` lies inside `area`, judged by its first vertex that is
/// not on the boundary of `area`.
fn inside(ring: &LineString<f64>, area: &Polygon<f64>) -> bool {
    for c in ring.coords() {
        let p = Point(*c);
        if area.contains(&p) {
            return true;
        }
        if !area.exterior().intersects(&p) {
            return false;
        }
    }
    true
}

fn strictly_inside_any(ring: &LineString<f64>, area: &Polygon<f64>) -> bool {
    ring.coords().any(|c| area.contains(&Point(*c)))
}

fn members_disjoint(polygons: &[Polygon<f64>]) -> bool {
    let shells: Vec<&LineString<f64>> = polygons
        .iter()
        .map(|p| p.exterior())
        .filter(|r| !r.0.is_empty())
        .collect();
    if has_bad_intersection(&shells, false) {
        return false;
    }
    for (i, a) in polygons.iter().enumerate() {
        for (j, b) in polygons.iter().enumerate() {
            if i != j && strictly_inside_any(a.exterior(), b) {
                return false;
            }
        }
    }
    true
}

struct Segment {
    line: Line<f64>,
    ring: usize,
    index: usize,
    ring_segments: usize,
}

impl RTreeObject for Segment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.line.start.x, self.line.start.y],
            [self.line.end.x, self.line.end.y],
        )
    }
}

impl Segment {
    fn adjacent(&self, other: &Segment) -> bool {
        let last = self.ring_segments - 1;
        self.ring == other.ring
            && (self.index.abs_diff(other.index) == 1
                || (self.index == 0 && other.index == last)
                || (self.index == last && other.index == 0))
    }
}

/// Looks for segment pairs that cross or overlap. Within one ring only
/// adjacent segments may meet, and only at their shared vertex. Segments
/// of different rings may touch at a point but never cross. With
/// `check_self` off, pairs from the same ring are skipped.
fn has_bad_intersection(rings: &[&LineString<f64>], check_self: bool) -> bool {
    let segments: Vec<Segment> = rings
        .iter()
        .enumerate()
        .flat_map(|(ring, ls)| {
            let ring_segments = ls.0.len().saturating_sub(1);
            ls.lines().enumerate().map(move |(index, line)| Segment {
                line,
                ring,
                index,
                ring_segments,
            })
        })
        .collect();
    let tree = RTree::bulk_load(segments);

    for a in tree.iter() {
        for b in tree.locate_in_envelope_intersecting(&a.envelope()) {
            if (b.ring, b.index) <= (a.ring, a.index) {
                continue;
            }
            if a.ring == b.ring && !check_self {
                continue;
            }
            let Some(hit) = line_intersection(a.line, b.line) else {
                continue;
            };
            let bad = match hit {
                LineIntersection::Collinear { .. } => true,
                LineIntersection::SinglePoint {
                    intersection,
                    is_proper,
                } => {
                    if a.ring != b.ring {
                        is_proper
                    } else {
                        !(a.adjacent(b) && shared_vertex(a.line, b.line) == Some(intersection))
                    }
                }
            };
            if bad {
                return true;
            }
        }
    }
    false
}

fn shared_vertex(a: Line<f64>, b: Line<f64>) -> Option<Coord<f64>> {
    [a.start, a.end]
        .into_iter()
        .find(|c| *c == b.start || *c == b.end)
}
