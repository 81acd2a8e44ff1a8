use chartdrop::ir::{CanvasSize, ChartKind, DrawCommand};
use chartdrop::loader::load_path;
use chartdrop::normalize::normalize;
use chartdrop::palette::FieldColorMap;
use chartdrop::selection::{ChartSelection, SelectionPolicy};
use chartdrop::session::ChartSession;
use chartdrop::value::{Dataset, Row, Value};
use chartdrop::view::ViewTransform;
use chartdrop::{compute_layout, LoadError};
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test").join(name)
}

/// Run the chartdrop binary, returning stdout on success and stderr on failure
fn run_chartdrop(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_chartdrop"))
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_normalize_scenario_from_json() {
    let data = chartdrop::loader::parse_json(
        r#"[{"Year":2020,"Sales":10},{"Year":2020,"Sales":15},{"Year":2021,"Sales":5}]"#,
    )
    .unwrap();
    let out = normalize(&data, "Year");
    let expected = Dataset::new(vec![
        Row::new().with("Year", 2020.0).with("Sales", 25.0),
        Row::new().with("Year", 2021.0).with("Sales", 5.0),
    ]);
    assert_eq!(out, expected);
}

#[test]
fn test_single_row_line_layout() {
    let data = chartdrop::loader::parse_json(r#"[{"Year":2020,"Sales":10}]"#).unwrap();
    let sel = ChartSelection::with_fields(SelectionPolicy::Exclusive, &["Year"], &["Sales"]);
    let mut colors = FieldColorMap::default();
    let plan = compute_layout(
        &normalize(&data, "Year"),
        ChartKind::Line,
        &sel,
        CanvasSize::new(800, 600),
        &ViewTransform::default(),
        0,
        &mut colors,
    );
    assert_eq!(plan.commands.len(), 1);
    match &plan.commands[0] {
        DrawCommand::Polyline { points, .. } => {
            assert_eq!(points.len(), 1);
            assert!(points[0].0.is_finite() && points[0].1.is_finite());
        }
        other => panic!("Expected Polyline, got {:?}", other),
    }
}

#[test]
fn test_csv_fixture_pipeline() {
    let data = load_path(&fixture("sales.csv")).unwrap();
    assert_eq!(data.len(), 5);

    let normalized = normalize(&data, "Year");
    // The row without a Year is dropped
    assert_eq!(normalized.len(), 3);
    assert_eq!(normalized.rows[0].get("Sales"), Some(&Value::Numeric(25.0)));
    assert_eq!(normalized.rows[0].get("Profit"), Some(&Value::Numeric(5.0)));
    assert_eq!(normalized.rows[2].get("Profit"), Some(&Value::Missing));
}

#[test]
fn test_json_and_csv_fixtures_agree() {
    let from_json = normalize(&load_path(&fixture("sales.json")).unwrap(), "Year");
    let from_csv = normalize(&load_path(&fixture("sales.csv")).unwrap(), "Year");
    assert_eq!(from_json.rows[0].get("Sales"), from_csv.rows[0].get("Sales"));
    assert_eq!(from_json.rows[1], from_csv.rows[1]);
}

#[test]
fn test_session_bar_chart_from_fixture() {
    let mut session = ChartSession::default();
    session.load_path(&fixture("sales.csv")).unwrap();
    session.set_kind(ChartKind::Bar);
    session.select_x("Year");
    session.select_y("Sales");
    session.select_y("Profit");
    let plan = session.draw();

    assert_eq!(plan.max_value, 30.0);
    let labels: Vec<&str> = plan.x_labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(labels, vec!["2020", "2021", "2022"]);
    // 2022 has no Profit value, so five bars rather than six
    assert_eq!(plan.commands.len(), 5);
    assert_eq!(plan.legend.len(), 2);
}

#[test]
fn test_session_rejects_bad_inputs_without_losing_state() {
    let mut session = ChartSession::default();
    session.load_path(&fixture("sales.json")).unwrap();
    let before = session.dataset().cloned();

    let err = session.load_path(&fixture("notes.txt")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFileType(_)));
    let err = session.load_path(&fixture("malformed.json")).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));

    assert_eq!(session.dataset().cloned(), before);
}

#[test]
fn test_end_to_end_line_chart() {
    let file = fixture("sales.csv");
    let result = run_chartdrop(&[file.to_str().unwrap(), "-x", "Year", "-y", "Sales,Profit"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_bar_chart_svg() {
    let file = fixture("sales.json");
    let result = run_chartdrop(&[
        file.to_str().unwrap(),
        "--kind",
        "bar",
        "-x",
        "Year",
        "-y",
        "Sales",
        "--format",
        "svg",
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_end_to_end_pie_with_gestures() {
    let file = fixture("sales.csv");
    let result = run_chartdrop(&[
        file.to_str().unwrap(),
        "--kind",
        "pie",
        "-y",
        "Sales,Profit",
        "--pie-index",
        "4",
        "--zoom",
        "-0.25",
        "--pan-x",
        "-10",
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_list_fields() {
    let file = fixture("sales.csv");
    let out = run_chartdrop(&[file.to_str().unwrap(), "--list-fields"]).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Year", "Region", "Sales", "Profit"]);
}

#[test]
fn test_end_to_end_no_value_fields() {
    let file = fixture("sales.csv");
    let result = run_chartdrop(&[file.to_str().unwrap(), "-x", "Year"]);
    assert!(result.unwrap_err().contains("Nothing to chart"));
}

#[test]
fn test_end_to_end_disallowed_file_type() {
    let file = fixture("notes.txt");
    let result = run_chartdrop(&[file.to_str().unwrap(), "-y", "Sales"]);
    assert!(result.unwrap_err().contains("File type not allowed"));
}

#[test]
fn test_end_to_end_malformed_json() {
    let file = fixture("malformed.json");
    let result = run_chartdrop(&[file.to_str().unwrap(), "-y", "Sales"]);
    assert!(result.is_err(), "Should have failed with parse error");
}

#[test]
fn test_end_to_end_spreadsheet() {
    let file = fixture("sales.xlsx");
    let result = run_chartdrop(&[file.to_str().unwrap(), "--kind", "bar", "-x", "Year", "-y", "Sales"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_mime_for_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("upload.bin");
    std::fs::copy(fixture("sales.csv"), &upload).unwrap();
    let upload = upload.to_str().unwrap();

    let rejected = run_chartdrop(&[upload, "-y", "Sales"]);
    assert!(rejected.unwrap_err().contains("File type not allowed"));

    let result = run_chartdrop(&[upload, "--mime", "text/csv", "-x", "Year", "-y", "Sales"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_oversized_canvas_is_an_error() {
    let file = fixture("sales.csv");
    let result = run_chartdrop(&[
        file.to_str().unwrap(),
        "-y",
        "Sales",
        "--width",
        "70000",
        "--height",
        "70000",
    ]);
    let err = result.unwrap_err();
    assert!(err.contains("Invalid chart options"), "{}", err);
    assert!(!err.contains("panicked"));
}
