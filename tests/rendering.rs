use std::fs;

use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::Document;
use sales_report::builder::ReportAssembler;
use sales_report::chart::{self, ChartSpec};
use sales_report::data;
use sales_report::report::{self, ReportConfig};

fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes)
        .expect("parse rendered pdf")
        .get_pages()
        .len()
}

#[test]
fn chart_file_is_written_and_non_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("chart.png");

    chart::render_line_chart(&ChartSpec::default(), &path).expect("render chart");

    let bytes = fs::read(&path).expect("read chart");
    assert!(bytes.starts_with(b"\x89PNG"), "chart should be a PNG");
    let decoded = image::load_from_memory(&bytes).expect("decode chart");
    assert_eq!((decoded.width(), decoded.height()), (600, 400));
}

#[test]
fn assembled_document_has_three_pages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let chart_path = dir.path().join("chart.png");
    chart::render_line_chart(&ChartSpec::default(), &chart_path).expect("render chart");

    let report = ReportAssembler::new()
        .assemble(
            &chart_path,
            &data::generate_ledger(),
            &data::generate_placeholder_grid(),
        )
        .expect("assemble report");

    assert_eq!(report.page_count, 3);
    assert_eq!(page_count(&report.bytes), 3);
}

fn page_operations(document: &Document, page: u32) -> Vec<Operation> {
    let page_id = document.get_pages()[&page];
    let content = document.get_page_content(page_id).expect("page content");
    Content::decode(&content).expect("decode page content").operations
}

fn count_operator(operations: &[Operation], operator: &str) -> usize {
    operations
        .iter()
        .filter(|operation| operation.operator == operator)
        .count()
}

fn sets_color(operations: &[Operation], operator: &str, rgb: [u8; 3]) -> bool {
    operations.iter().any(|operation| {
        operation.operator == operator
            && operation.operands.len() == 3
            && operation
                .operands
                .iter()
                .zip(rgb)
                .all(|(operand, channel)| {
                    operand
                        .as_float()
                        .map(|value| (value - f32::from(channel) / 255.0).abs() < 0.01)
                        .unwrap_or(false)
                })
    })
}

fn assembled_report() -> Document {
    let dir = tempfile::tempdir().expect("temp dir");
    let chart_path = dir.path().join("chart.png");
    chart::render_line_chart(&ChartSpec::default(), &chart_path).expect("render chart");

    let report = ReportAssembler::new()
        .assemble(
            &chart_path,
            &data::generate_ledger(),
            &data::generate_placeholder_grid(),
        )
        .expect("assemble report");
    Document::load_mem(&report.bytes).expect("parse rendered pdf")
}

#[test]
fn chart_page_holds_only_the_image() {
    let document = assembled_report();
    let operations = page_operations(&document, 1);

    assert_eq!(count_operator(&operations, "Do"), 1);
    assert_eq!(count_operator(&operations, "BT"), 0);
}

#[test]
fn ledger_page_prints_header_and_thirty_rows() {
    let document = assembled_report();
    let operations = page_operations(&document, 2);

    // One text section per cell: 3 header captions + 30 rows of 3 values.
    assert_eq!(count_operator(&operations, "BT"), 93);
    assert!(sets_color(&operations, "RG", [128, 128, 128]), "grey header fill");
    assert!(sets_color(&operations, "rg", [245, 245, 245]), "white smoke captions");
    assert!(sets_color(&operations, "RG", [0, 0, 0]), "black grid");
    assert!(!sets_color(&operations, "RG", [0, 0, 255]));
}

#[test]
fn placeholder_page_prints_a_blue_twenty_by_ten_grid() {
    let document = assembled_report();
    let operations = page_operations(&document, 3);

    assert_eq!(count_operator(&operations, "BT"), 200);
    assert!(sets_color(&operations, "RG", [0, 0, 255]), "blue grid");
    assert!(!sets_color(&operations, "RG", [128, 128, 128]), "no header fill");
}

#[test]
fn missing_chart_image_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = ReportAssembler::new().assemble(
        dir.path().join("does-not-exist.png"),
        &data::generate_ledger(),
        &data::generate_placeholder_grid(),
    );
    assert!(result.is_err());
}

#[test]
fn fresh_output_directory_receives_exactly_two_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ReportConfig::with_output_dir(dir.path().join("out"));

    let output = report::run(&config).expect("run report");

    let mut names: Vec<_> = fs::read_dir(dir.path().join("out"))
        .expect("list output")
        .map(|entry| entry.expect("dir entry").file_name().into_string().expect("utf-8 name"))
        .collect();
    names.sort();
    assert_eq!(names, ["sales_graph.png", "sales_report.pdf"]);
    assert_eq!(output.page_count, 3);
    assert!(fs::metadata(&output.chart_path).expect("chart metadata").len() > 0);
}

#[test]
fn reruns_keep_the_page_structure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ReportConfig::with_output_dir(dir.path());

    let first = report::run(&config).expect("first run");
    let first_bytes = fs::read(&first.report_path).expect("read first report");
    let second = report::run(&config).expect("second run");
    let second_bytes = fs::read(&second.report_path).expect("read second report");

    assert_eq!(first.page_count, second.page_count);
    assert_eq!(page_count(&first_bytes), page_count(&second_bytes));
}

#[test]
fn seeded_runs_produce_the_same_ledger_page() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ReportConfig {
        seed: Some(2023),
        ..ReportConfig::with_output_dir(dir.path())
    };

    let first = report::run(&config).expect("first run");
    let first_bytes = fs::read(&first.report_path).expect("read first report");
    let second = report::run(&config).expect("second run");
    let second_bytes = fs::read(&second.report_path).expect("read second report");

    let ledger_page = |bytes: &[u8]| {
        let document = Document::load_mem(bytes).expect("parse report");
        let page = document.get_pages()[&2];
        document.get_page_content(page).expect("ledger page content")
    };
    assert_eq!(ledger_page(&first_bytes), ledger_page(&second_bytes));
}

#[test]
fn unwritable_output_directory_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").expect("create blocker file");

    let result = report::run(&ReportConfig::with_output_dir(blocker.join("out")));
    assert!(matches!(result, Err(sales_report::ReportError::Io { .. })));
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_add_one_outline_entry_per_page() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ReportConfig {
        bookmarks: true,
        ..ReportConfig::with_output_dir(dir.path())
    };

    let output = report::run(&config).expect("run report");
    let bytes = fs::read(&output.report_path).expect("read report");
    let document = Document::load_mem(&bytes).expect("parse report");

    let catalog = document.catalog().expect("catalog");
    let outlines_id = catalog
        .get(b"Outlines")
        .and_then(lopdf::Object::as_reference)
        .expect("outlines reference");
    let outlines = document.get_dictionary(outlines_id).expect("outlines dictionary");
    assert_eq!(outlines.get(b"Count").and_then(lopdf::Object::as_i64).ok(), Some(3));
    assert_eq!(document.get_pages().len(), 3);
    assert_eq!(output.page_count, 3);
}
