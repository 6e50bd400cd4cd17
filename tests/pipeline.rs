use std::io::Write;

use geosop::{engine, load_geometries, wkb, Error, GeosOp, OpArgs, OutputFormat};
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run(args: OpArgs) -> Result<String, Error> {
    let mut op = GeosOp::new(args, Vec::new());
    op.run()?;
    Ok(String::from_utf8(op.into_output()).unwrap())
}

fn args_for(src: &str, op: &str) -> OpArgs {
    OpArgs {
        src_a: src.to_string(),
        op_name: op.to_string(),
        format: OutputFormat::Wkt,
        ..OpArgs::default()
    }
}

const FIVE_POINTS: &str = "POINT (0 0)\nPOINT (1 1)\nPOINT (2 2)\nPOINT (3 3)\nPOINT (4 4)\n";

#[test]
fn limit_caps_records_read_from_file() {
    let file = temp_file(".wkt", FIVE_POINTS);
    let path = file.path().to_str().unwrap();
    assert_eq!(load_geometries(path, 2).unwrap().len(), 2);
    assert_eq!(load_geometries(path, -1).unwrap().len(), 5);
    assert_eq!(load_geometries(path, 10).unwrap().len(), 5);
}

#[test]
fn limit_ignores_bad_records_past_it() {
    let file = temp_file(".wkt", "POINT (0 0)\nPOINT (1 1)\nPOINT (x y)\nPOINT (3 3)\nPOINT (4 4)\n");
    let path = file.path().to_str().unwrap();
    assert_eq!(load_geometries(path, 2).unwrap().len(), 2);
    assert!(matches!(
        load_geometries(path, -1),
        Err(Error::Decode { record: 3, .. })
    ));
}

#[test]
fn collected_points_yield_one_envelope() {
    let file = temp_file(".wkt", "POINT (0 0)\nPOINT (4 2)\n");
    let out = run(args_for(file.path().to_str().unwrap(), "envelope")).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("POLYGON"));
}

#[test]
fn uncollected_points_yield_one_result_each() {
    let file = temp_file(".wkt", "POINT (0 0)\nPOINT (4 2)\n");
    let mut args = args_for(file.path().to_str().unwrap(), "area");
    args.collect = false;
    assert_eq!(run(args).unwrap(), "0\n0\n");
}

#[test]
fn wkb_file_input() {
    let squares = [
        "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))",
        "POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))",
    ];
    let hex: String = squares
        .iter()
        .map(|s| format!("{}\n", wkb::to_hex(&engine::parse_wkt(s).unwrap())))
        .collect();
    let file = temp_file(".wkb", &hex);
    let mut args = args_for(file.path().to_str().unwrap(), "area");
    args.collect = false;
    assert_eq!(run(args).unwrap(), "1\n4\n");
}

#[test]
fn text_round_trip() {
    let original = engine::parse_wkt("LINESTRING (0 0, 1.5 2, 3 -1)").unwrap();
    let out = run(args_for("LINESTRING (0 0, 1.5 2, 3 -1)", "no-op")).unwrap();
    assert_eq!(engine::parse_wkt(out.trim()).unwrap(), original);
}

#[test]
fn missing_file_is_fatal() {
    let err = run(args_for("/definitely/not/here.wkt", "area")).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
}

#[test]
fn bad_record_aborts_before_any_output() {
    let file = temp_file(".wkt", "POINT (0 0)\nPOINT (1\n");
    let mut args = args_for(file.path().to_str().unwrap(), "area");
    args.collect = false;
    let mut op = GeosOp::new(args, Vec::new());
    assert!(op.run().is_err());
    assert!(op.into_output().is_empty());
}

#[test]
fn timing_summary_is_printed_on_request() {
    let file = temp_file(".wkt", FIVE_POINTS);
    let mut args = args_for(file.path().to_str().unwrap(), "centroid");
    args.format = OutputFormat::None;
    args.show_time = true;
    let out = run(args).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Read 5 geometries, 5 vertices  -- "));
    assert!(lines[1].starts_with("Executed centroid: 1 ops, 5 vertices  -- "));
    assert!(lines[1].ends_with(" usec"));
}

#[test]
fn collect_counts_every_vertex() {
    let file = temp_file(
        ".wkt",
        "LINESTRING (0 0, 1 1, 2 2)\nPOLYGON ((0 0, 1 0, 1 1, 0 0))\nPOINT (5 5)\n",
    );
    let geoms = load_geometries(file.path().to_str().unwrap(), -1).unwrap();
    let expected: usize = geoms.iter().map(engine::num_points).sum();
    let merged = engine::collect(&geoms);
    assert_eq!(engine::num_points(&merged), expected);
    assert_eq!(expected, 8);
}
