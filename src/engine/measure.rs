use geo::{Area, EuclideanLength, Geometry, Polygon};

pub fn area(geom: &Geometry<f64>) -> f64 {
    geom.unsigned_area()
}

/// Length of linework; polygons contribute their perimeter.
pub fn length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
        Geometry::Line(l) => l.euclidean_length(),
        Geometry::LineString(ls) => ls.euclidean_length(),
        Geometry::MultiLineString(mls) => mls.euclidean_length(),
        Geometry::Polygon(p) => perimeter(p),
        Geometry::Rect(r) => perimeter(&r.to_polygon()),
        Geometry::Triangle(t) => perimeter(&t.to_polygon()),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(perimeter).sum(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(length).sum(),
    }
}

fn perimeter(polygon: &Polygon<f64>) -> f64 {
    polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>()
}
