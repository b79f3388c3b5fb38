//! Runs the batch command end-to-end against an on-disk fixture file.

use std::fs;
use std::path::{Path, PathBuf};

use nfse_core::{IssRate, WithholdingFlags, WithholdingKind};
use nfse_sim::{commands, csv_loader};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_invoices.csv")
}

#[test]
fn fixture_loads_three_invoices() {
    let rows = csv_loader::load_from_file(&fixture_path()).expect("fixture should load");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].input.withholdings, WithholdingFlags::all());
    assert_eq!(rows[1].input.gross_value, dec!(1000.00));
    assert_eq!(rows[1].input.iss_rate, IssRate::Three);
    assert_eq!(
        rows[2].input.withholdings,
        WithholdingFlags::none()
            .with(WithholdingKind::Pis)
            .with(WithholdingKind::Cofins)
            .with(WithholdingKind::Csll)
    );
}

#[test]
fn batch_writes_one_row_per_invoice() {
    let mut output = Vec::new();
    commands::batch(&fixture_path(), &mut output).expect("batch should succeed");

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("id,gross_value,iss_rate"));
    assert_eq!(
        lines[1],
        "NF-001,10000.00,5,500.00,true,150.00,65.00,300.00,100.00,1100.00,2215.00,7785.00"
    );
    assert_eq!(lines[2], "NF-002,1000.00,3,30.00,true,0.00,0.00,0.00,0.00,0.00,30.00,970.00");
    assert_eq!(lines[3], "NF-003,0.50,2,0.01,false,0.00,0.00,0.02,0.01,0.00,0.02,0.48");
}

#[test]
fn batch_summary_totals_exact_amounts() {
    let summary = commands::batch(&fixture_path(), std::io::sink()).unwrap();

    assert_eq!(summary.invoices, 3);
    assert_eq!(summary.gross_value, dec!(11000.50));
    assert_eq!(summary.withheld(WithholdingKind::Iss), dec!(530.00));
    assert_eq!(summary.withheld(WithholdingKind::Pis), dec!(65.00325));
    assert_eq!(summary.total_withheld, dec!(2245.02325));
    assert_eq!(summary.net_value, dec!(8755.47675));
    assert_eq!(summary.negative_net, 0);
}

#[test]
fn missing_batch_file_fails_with_context() {
    let err = commands::batch(Path::new("/nonexistent/invoices.csv"), std::io::sink())
        .unwrap_err();

    assert!(err.to_string().contains("Failed to load batch file"));
}

#[test]
fn batch_to_file_writes_results() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");

    let summary = commands::batch_to_file(&fixture_path(), &output).unwrap();

    assert_eq!(summary.invoices, 3);
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn failed_batch_leaves_existing_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    let output = dir.path().join("results.csv");
    fs::write(&input, "id,gross_value,iss_rate\nNF-1,100.00,7\n").unwrap();
    fs::write(&output, "previous results\n").unwrap();

    let err = commands::batch_to_file(&input, &output).unwrap_err();

    assert!(err.to_string().contains("Failed to load batch file"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous results\n");
}

#[test]
fn failed_batch_does_not_create_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");

    assert!(commands::batch_to_file(Path::new("/nonexistent/invoices.csv"), &output).is_err());
    assert!(!output.exists());
}
