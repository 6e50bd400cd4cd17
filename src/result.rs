use std::fmt;

use geo::Geometry;

use crate::engine;

/// The value produced by one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OpResult {
    Bool(bool),
    Int(i64),
    Double(f64),
    Geometry(Geometry<f64>),
}

impl OpResult {
    pub fn is_geometry(&self) -> bool {
        matches!(self, OpResult::Geometry(_))
    }

    pub fn as_geometry(&self) -> Option<&Geometry<f64>> {
        match self {
            OpResult::Geometry(g) => Some(g),
            _ => None,
        }
    }

    /// Short type tag: `bool`, `int`, `double`, or `<Type>( <vertices> )`.
    pub fn metadata(&self) -> String {
        match self {
            OpResult::Bool(_) => "bool".to_string(),
            OpResult::Int(_) => "int".to_string(),
            OpResult::Double(_) => "double".to_string(),
            OpResult::Geometry(g) => describe(g),
        }
    }
}

/// `<Type>( <vertices> )`, as used in verbose log lines.
pub fn describe(geom: &Geometry<f64>) -> String {
    format!(
        "{}( {} )",
        engine::geometry_type(geom),
        engine::num_points(geom)
    )
}

impl fmt::Display for OpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpResult::Bool(v) => write!(f, "{}", v),
            OpResult::Int(v) => write!(f, "{}", v),
            OpResult::Double(v) => write!(f, "{}", v),
            OpResult::Geometry(g) => f.write_str(&engine::to_wkt(g)),
        }
    }
}

impl From<bool> for OpResult {
    fn from(v: bool) -> Self {
        OpResult::Bool(v)
    }
}

impl From<i64> for OpResult {
    fn from(v: i64) -> Self {
        OpResult::Int(v)
    }
}

impl From<f64> for OpResult {
    fn from(v: f64) -> Self {
        OpResult::Double(v)
    }
}

impl From<Geometry<f64>> for OpResult {
    fn from(g: Geometry<f64>) -> Self {
        OpResult::Geometry(g)
    }
}
