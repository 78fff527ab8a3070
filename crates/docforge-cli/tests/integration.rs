//! Integration tests for the docforge CLI
//!
//! These tests drive the build and inspect commands over real files:
//! JSON content -> DOCX -> summary

use std::fs;
use std::path::PathBuf;

use docforge_cli::{build_command, inspect_command, render_summary, OutputFormat};
use docforge_ooxml::{BlockSummary, PackageSummary};
use tempfile::TempDir;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

const SMALL_CONTENT: &str = r#"{
    "meta": {"title": "Small"},
    "sections": [{"blocks": [
        {"type": "paragraph", "style": "Heading1", "runs": ["Report"]},
        {"type": "table", "column_widths": [2000, 4000], "rows": [
            {"is_header": true, "cells": [
                {"shading": {"fill": "D5E8F0"}, "blocks": [{"type": "paragraph", "runs": ["Component"]}]},
                {"shading": {"fill": "D5E8F0"}, "blocks": [{"type": "paragraph", "runs": ["Status"]}]}
            ]},
            {"cells": [
                {"blocks": [{"type": "paragraph", "runs": ["Database"]}]},
                {"blocks": [{"type": "paragraph", "runs": ["Active"]}]}
            ]}
        ]}
    ]}]
}"#;

#[test]
fn test_build_and_inspect_small_document() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("small.json");
    fs::write(&input, SMALL_CONTENT).unwrap();

    let built = build_command(&input, None, None).unwrap();
    let output = dir.path().join("small.docx");
    assert!(output.exists());
    assert_eq!(fs::read(&output).unwrap(), built.bytes);

    let summary = PackageSummary::from_bytes(&built.bytes).unwrap();
    assert_eq!(summary.title.as_deref(), Some("Small"));
    assert_eq!(summary.headings(), vec![(0, "Report")]);
    assert_eq!(
        summary.sections[0].blocks[1],
        BlockSummary::Table {
            rows: 2,
            columns: 2
        }
    );

    assert!(inspect_command(&output, OutputFormat::Text).is_ok());
    assert!(inspect_command(&output, OutputFormat::Json).is_ok());
}

#[test]
fn test_build_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("small.json");
    fs::write(&input, SMALL_CONTENT).unwrap();

    let first = build_command(&input, None, Some(&dir.path().join("a.docx"))).unwrap();
    let second = build_command(&input, None, Some(&dir.path().join("b.docx"))).unwrap();
    assert_eq!(first.digest(), second.digest());
    assert_eq!(
        fs::read(dir.path().join("a.docx")).unwrap(),
        fs::read(dir.path().join("b.docx")).unwrap()
    );
}

#[test]
fn test_demo_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.docx");

    let built = build_command(&demo("report.json"), None, Some(&output)).unwrap();
    assert_eq!(built.page_count(), 3);

    let summary = PackageSummary::from_bytes(&built.bytes).unwrap();
    assert_eq!(summary.sections.len(), 2);
    assert_eq!(summary.sections[1].width, 15840);
    assert_eq!(
        summary.headings(),
        vec![
            (0, "System Status Report"),
            (1, "Component Overview"),
            (1, "Key Features"),
            (0, "Appendix"),
        ]
    );
    assert_eq!(summary.table_count(), 1);

    let text = render_summary(&summary);
    assert!(text.contains("Table: 3 rows x 3 columns"));
    assert!(text.contains("Page break"));
}

#[test]
fn test_demo_report_with_config() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report-a4.docx");

    let built = build_command(
        &demo("report.json"),
        Some(&demo("docforge.toml")),
        Some(&output),
    )
    .unwrap();

    let summary = PackageSummary::from_bytes(&built.bytes).unwrap();
    assert_eq!(summary.sections[0].width, 11906);
    // Heading2 inherits from Heading1 in this catalog
    assert!(summary
        .styles
        .iter()
        .any(|s| s.id == "Heading2" && s.based_on.as_deref() == Some("Heading1")));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let err = build_command(&dir.path().join("absent.json"), None, None).unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_overflowing_table_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("wide.json");
    fs::write(
        &input,
        r#"{"sections": [{"blocks": [
            {"type": "table", "column_widths": [6000, 6000], "rows": []}
        ]}]}"#,
    )
    .unwrap();

    let err = build_command(&input, None, None).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("12000"), "{}", message);
    assert!(!dir.path().join("wide.docx").exists());
}

#[test]
fn test_inspect_rejects_non_package() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("not-a-docx.docx");
    fs::write(&input, "plain text").unwrap();

    assert!(inspect_command(&input, OutputFormat::Text).is_err());
}
