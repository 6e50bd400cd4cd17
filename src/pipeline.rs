//! Load, optionally collect, execute, report.

use std::io::Write;

use geo::Geometry;
use tracing::debug;

use crate::config::{OpArgs, OutputFormat};
use crate::engine;
use crate::error::Result;
use crate::ops::Operation;
use crate::reader;
use crate::result::{describe, OpResult};
use crate::source::Source;
use crate::stats::{format_micros, RunStats, Stopwatch};
use crate::wkb;

/// Replaces more than one geometry with a single collection of copies.
pub fn collect_inputs(geoms: Vec<Geometry<f64>>, collect: bool) -> Vec<Geometry<f64>> {
    if collect && geoms.len() > 1 {
        vec![engine::collect(&geoms)]
    } else {
        geoms
    }
}

/// One run of an operation over an input, writing results and diagnostics
/// to `out`.
pub struct GeosOp<W: Write> {
    args: OpArgs,
    out: W,
    stats: RunStats,
}

impl<W: Write> GeosOp<W> {
    pub fn new(args: OpArgs, out: W) -> Self {
        Self {
            args,
            out,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self) -> Result<()> {
        // Resolved up front so a bad name fails before any output.
        let op = Operation::find(&self.args.op_name)?;

        if self.args.verbose {
            let line = format!("Input A: {}", self.args.src_a);
            self.log(&line);
        }
        let geoms = self.load()?;
        let geoms = collect_inputs(geoms, self.args.collect);
        self.execute(op, &geoms)?;

        if self.args.show_time || self.args.verbose {
            let read = self.stats.read_summary();
            let exec = self.stats.exec_summary(op.name);
            self.log(&read);
            self.log(&exec);
        }
        self.out.flush()?;
        Ok(())
    }

    fn load(&mut self) -> Result<Vec<Geometry<f64>>> {
        self.stats.read_time.start();
        let source = Source::open(&self.args.src_a)?;
        debug!(
            descriptor = %self.args.src_a,
            encoding = ?source.encoding(),
            limit = self.args.limit_a,
            "reading input"
        );
        let geoms = reader::load(source, self.args.limit_a)?;
        self.stats.read_time.stop();

        self.stats.read_count = geoms.len();
        self.stats.read_vertices = geoms.iter().map(engine::num_points).sum();
        debug!(
            geometries = self.stats.read_count,
            vertices = self.stats.read_vertices,
            "input loaded"
        );
        Ok(geoms)
    }

    fn execute(&mut self, op: &Operation, geoms: &[Geometry<f64>]) -> Result<()> {
        self.stats.exec_time.start();
        for geom in geoms {
            let result = self.execute_op(op, geom)?;
            self.output(&result)?;
        }
        self.stats.exec_time.stop();
        debug!(op = op.name, count = self.stats.op_count, "execution finished");
        Ok(())
    }

    fn execute_op(&mut self, op: &Operation, geom: &Geometry<f64>) -> Result<OpResult> {
        let mut timer = Stopwatch::default();
        timer.start();
        let result = op.execute(geom, self.args.op_arg)?;
        let elapsed = timer.stop();

        self.stats.op_count += 1;
        self.stats.op_vertices += engine::num_points(geom);
        if self.args.verbose {
            let line = format!(
                "[{}] {}: {} -> {}  -- {}",
                self.stats.op_count,
                op.name,
                describe(geom),
                result.metadata(),
                format_micros(elapsed)
            );
            self.log(&line);
        }
        Ok(result)
    }

    fn output(&mut self, result: &OpResult) -> Result<()> {
        let text = match (self.args.format, result) {
            (OutputFormat::None, _) => return Ok(()),
            (OutputFormat::Wkb, OpResult::Geometry(g)) => wkb::to_hex(g),
            (OutputFormat::GeoJson, OpResult::Geometry(g)) => {
                serde_json::to_string(&geojson::Geometry::new(geojson::Value::from(g)))?
            }
            _ => result.to_string(),
        };
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    /// Diagnostic lines are best effort; a failed write never stops the run.
    fn log(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use geo::point;

    fn run(args: OpArgs) -> Result<(String, RunStats)> {
        let mut op = GeosOp::new(args, Vec::new());
        op.run()?;
        let stats = std::mem::take(&mut op.stats);
        let out = String::from_utf8(op.into_output()).unwrap();
        Ok((out, stats))
    }

    fn args(src: &str, op: &str, format: OutputFormat) -> OpArgs {
        OpArgs {
            src_a: src.to_string(),
            op_name: op.to_string(),
            format,
            ..OpArgs::default()
        }
    }

    #[test]
    fn area_of_point_prints_zero() {
        let (out, _) = run(args("POINT (1 2)", "area", OutputFormat::Wkt)).unwrap();
        assert_eq!(out, "0\n");
    }

    #[test]
    fn default_format_prints_nothing() {
        let (out, stats) = run(args("POINT (1 2)", "centroid", OutputFormat::None)).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.op_count, 1);
    }

    #[test]
    fn wkb_format_prints_hex_for_geometries_only() {
        let (out, _) = run(args("POINT (1 2)", "no-op", OutputFormat::Wkb)).unwrap();
        assert_eq!(out, "0101000000000000000000F03F0000000000000040\n");
        let (out, _) = run(args("POINT (1 2)", "isValid", OutputFormat::Wkb)).unwrap();
        assert_eq!(out, "true\n");
    }

    #[test]
    fn geojson_format() {
        let (out, _) = run(args("POINT (1 2)", "no-op", OutputFormat::GeoJson)).unwrap();
        let json: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"], serde_json::json!([1.0, 2.0]));
    }

    #[test]
    fn hex_literal_input() {
        let (out, _) = run(args(
            "0101000000000000000000F03F0000000000000040",
            "length",
            OutputFormat::Wkt,
        ))
        .unwrap();
        assert_eq!(out, "0\n");
    }

    #[test]
    fn unknown_operation_produces_no_output() {
        let mut op = GeosOp::new(args("POINT (1 2)", "explode", OutputFormat::Wkt), Vec::new());
        assert!(matches!(op.run(), Err(Error::UnknownOperation(_))));
        assert!(op.into_output().is_empty());
    }

    #[test]
    fn verbose_logs_each_invocation() {
        let mut a = args("POINT (1 2)", "buffer", OutputFormat::None);
        a.op_arg = 1.0;
        a.verbose = true;
        let (out, _) = run(a).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Input A: POINT (1 2)");
        assert!(lines[1].starts_with("[1] buffer: Point( 1 ) -> Polygon( 33 )"));
        assert!(lines[2].starts_with("Read 1 geometries, 1 vertices"));
        assert!(lines[3].starts_with("Executed buffer: 1 ops, 1 vertices"));
    }

    #[test]
    fn verbose_counter_increases_per_record() {
        let mut file = tempfile::Builder::new().suffix(".wkt").tempfile().unwrap();
        file.write_all(b"POINT (0 0)\nPOINT (1 1)\nPOINT (2 2)\n").unwrap();
        file.flush().unwrap();

        let mut a = args(file.path().to_str().unwrap(), "area", OutputFormat::None);
        a.collect = false;
        a.verbose = true;
        let (out, stats) = run(a).unwrap();
        let invocations: Vec<&str> = out.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(invocations.len(), 3);
        for (i, line) in invocations.iter().enumerate() {
            assert!(line.starts_with(&format!("[{}] area: Point( 1 ) -> double  -- ", i + 1)));
        }
        assert_eq!(stats.op_count, 3);
    }

    #[test]
    fn collect_keeps_single_geometry_unwrapped() {
        let p = Geometry::Point(point!(x: 1., y: 2.));
        assert_eq!(collect_inputs(vec![p.clone()], true), vec![p]);
    }

    #[test]
    fn collect_merges_many() {
        let geoms = vec![
            Geometry::Point(point!(x: 1., y: 2.)),
            Geometry::Point(point!(x: 3., y: 4.)),
        ];
        let merged = collect_inputs(geoms.clone(), true);
        assert_eq!(merged.len(), 1);
        assert_eq!(engine::num_points(&merged[0]), 2);
        assert_eq!(collect_inputs(geoms, false).len(), 2);
    }
}
