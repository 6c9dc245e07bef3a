//! CLI Smoke Test
//!
//! Runs the built `bmap-decoder` binary against temporary input files and checks
//! the JSON it prints.

use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use crate::common::fixtures::{bmap_post_tx, TXID};

fn run_cli(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_bmap-decoder"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

fn write_temp(contents: &str, suffix: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is valid UTF-8")
}

#[test]
fn test_decode_single_transaction() -> Result<()> {
    let input = write_temp(&bmap_post_tx().to_string(), ".json")?;
    let output = run_cli(&["decode", "--input", path_arg(input.path())])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let decoded: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(decoded["tx"]["h"], json!(TXID));
    assert_eq!(decoded["MAP"]["app"], json!("bmap-demo"));
    Ok(())
}

#[test]
fn test_decode_envelope_pretty() -> Result<()> {
    let envelope = json!({"c": [bmap_post_tx()], "u": []});
    let input = write_temp(&envelope.to_string(), ".json")?;
    let output = run_cli(&["decode", "--pretty", "--input", path_arg(input.path())])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains('\n'));
    let decoded: Value = serde_json::from_str(&stdout)?;
    assert_eq!(decoded["c"].as_array().map(Vec::len), Some(1));
    assert_eq!(decoded["u"], json!([]));
    Ok(())
}

#[test]
fn test_decode_failure_exits_nonzero() -> Result<()> {
    let input = write_temp(&json!([bmap_post_tx(), {"in": []}]).to_string(), ".json")?;

    let output = run_cli(&["decode", "--input", path_arg(input.path())])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));

    let output = run_cli(&["decode", "--skip-invalid", "--input", path_arg(input.path())])?;
    assert!(output.status.success());
    let decoded: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(decoded.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_config_file_disables_quirks() -> Result<()> {
    let config = write_temp("[decoder]\nlegacy_quirks = false\n", ".toml")?;
    let tx = crate::common::fixtures::single_carrier_tx(
        bmap_decoder::types::DataCarrierBuilder::op_false_op_return()
            .push_str(bmap_decoder::types::protocols::constants::BITSV_PREFIX)
            .build(),
    );
    let input = write_temp(&tx.to_string(), ".json")?;

    let output = run_cli(&[
        "--config",
        path_arg(config.path()),
        "decode",
        "--input",
        path_arg(input.path()),
    ])?;
    assert!(output.status.success());
    let decoded: Value = serde_json::from_slice(&output.stdout)?;
    assert!(decoded.get("undefined").is_some());
    Ok(())
}

#[test]
fn test_protocols_listing() -> Result<()> {
    let output = run_cli(&["protocols", "--json"])?;
    assert!(output.status.success());

    let listing: Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = listing
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|row| row["name"].as_str())
        .collect();
    assert_eq!(names, vec!["B", "MAP", "METANET", "AIP", "Bit.sv"]);
    Ok(())
}
