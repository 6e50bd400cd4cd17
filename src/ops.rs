//! Named geometry operations.
//!
//! `OPERATIONS` is the one table behind both the help listing and
//! dispatch, so a listed name is always an accepted one.

use geo::Geometry;

use crate::engine;
use crate::error::{Error, Result};
use crate::result::OpResult;

pub type OpFn = fn(&Geometry<f64>, f64) -> Result<OpResult>;

pub const NO_OP: &str = "no-op";

pub struct Operation {
    pub name: &'static str,
    /// Name of the numeric argument, for operations that take one.
    pub arg: Option<&'static str>,
    pub description: &'static str,
    run: OpFn,
}

pub static OPERATIONS: &[Operation] = &[
    Operation {
        name: NO_OP,
        arg: None,
        description: "copy of the input",
        run: |g, _| Ok(g.clone().into()),
    },
    Operation {
        name: "area",
        arg: None,
        description: "area of the input",
        run: |g, _| Ok(engine::area(g).into()),
    },
    Operation {
        name: "boundary",
        arg: None,
        description: "boundary of the input",
        run: |g, _| Ok(engine::boundary(g)?.into()),
    },
    Operation {
        name: "buffer",
        arg: Some("D"),
        description: "buffer of the input by distance D",
        run: |g, d| Ok(engine::buffer(g, d).into()),
    },
    Operation {
        name: "centroid",
        arg: None,
        description: "centroid of the input",
        run: |g, _| Ok(engine::centroid(g).into()),
    },
    Operation {
        name: "convexHull",
        arg: None,
        description: "convex hull of the input",
        run: |g, _| Ok(engine::convex_hull(g).into()),
    },
    Operation {
        name: "envelope",
        arg: None,
        description: "bounding box of the input",
        run: |g, _| Ok(engine::envelope(g).into()),
    },
    Operation {
        name: "interiorPoint",
        arg: None,
        description: "a point inside the input",
        run: |g, _| Ok(engine::interior_point(g).into()),
    },
    Operation {
        name: "isValid",
        arg: None,
        description: "whether the input is valid",
        run: |g, _| Ok(engine::is_valid(g).into()),
    },
    Operation {
        name: "length",
        arg: None,
        description: "length or perimeter of the input",
        run: |g, _| Ok(engine::length(g).into()),
    },
    Operation {
        name: "union",
        arg: None,
        description: "unary union of the input",
        run: |g, _| Ok(engine::unary_union(g).into()),
    },
];

impl Operation {
    /// Looks up an operation by name. The empty name means `no-op`.
    pub fn find(name: &str) -> Result<&'static Operation> {
        let key = if name.is_empty() { NO_OP } else { name };
        OPERATIONS
            .iter()
            .find(|op| op.name == key)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))
    }

    pub fn execute(&self, geom: &Geometry<f64>, arg: f64) -> Result<OpResult> {
        (self.run)(geom, arg)
    }

    /// Name plus argument placeholder, e.g. `buffer D`.
    pub fn signature(&self) -> String {
        match self.arg {
            Some(arg) => format!("{} {}", self.name, arg),
            None => self.name.to_string(),
        }
    }
}

/// Runs the named operation on one geometry.
pub fn dispatch(name: &str, geom: &Geometry<f64>, arg: f64) -> Result<OpResult> {
    Operation::find(name)?.execute(geom, arg)
}
