// Dweve CDL - netCDF Common Data Language compiler
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI integration tests

use assert_cmd::Command;
use cdl_test::fixtures;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

fn cdlc() -> Command {
    Command::cargo_bin("cdlc").expect("Failed to find cdlc binary")
}

fn create_temp_file(content: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".cdl")
        .tempfile()
        .expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write temp file");
    file
}

// ===== Help and Version =====

#[test]
fn test_help_output() {
    cdlc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cdlc - netCDF CDL compiler"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_output() {
    cdlc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cdlc"));
}

#[test]
fn test_no_subcommand_fails() {
    cdlc().assert().failure();
}

// ===== validate =====

#[test]
fn test_validate_valid_file() {
    let file = create_temp_file(fixtures::basics().source);
    cdlc()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"))
        .stdout(predicate::str::contains("Dataset: basics"))
        .stdout(predicate::str::contains("Dimensions: 4"))
        .stdout(predicate::str::contains("Variables: 2"))
        .stdout(predicate::str::contains("Attributes: 6"));
}

#[test]
fn test_validate_reports_position() {
    let file = create_temp_file("netcdf r {\nvariables:\n    ubyte v ;\n    v:a = 256UB ;\n}\n");
    cdlc()
        .args(["validate", "--variant", "cdf5"])
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stderr(predicate::str::contains("RangeError"))
        .stderr(predicate::str::contains(":4:"));
}

#[test]
fn test_validate_variant_matters() {
    let file = create_temp_file(fixtures::cdf5_constants().source);
    cdlc().arg("validate").arg(file.path()).assert().failure();
    cdlc()
        .args(["validate", "--variant", "cdf5"])
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn test_validate_unknown_variant() {
    let file = create_temp_file(fixtures::empty().source);
    cdlc()
        .args(["validate", "--variant", "hdf9"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_validate_bad_fill() {
    let file = create_temp_file(fixtures::empty().source);
    cdlc()
        .args(["validate", "--fill", "ubyte=300"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_validate_no_groups() {
    let file = create_temp_file(fixtures::groups().source);
    cdlc()
        .args(["validate", "--variant", "netcdf4"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups: 4"));
    cdlc()
        .args(["validate", "--variant", "netcdf4", "--no-groups"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("SyntaxError"));
}

#[test]
fn test_validate_missing_file() {
    cdlc()
        .args(["validate", "/nonexistent/input.cdl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_file_size_limit() {
    let file = create_temp_file(fixtures::basics().source);
    cdlc()
        .env("CDLC_MAX_FILE_SIZE", "16")
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let file = create_temp_file(fixtures::basics().source);
    cdlc()
        .args(["-v", "validate"])
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("define variable"));
}

// ===== inspect =====

#[test]
fn test_inspect_groups() {
    let file = create_temp_file(fixtures::groups().source);
    cdlc()
        .args(["inspect", "--variant", "netcdf4"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("netCDF Dataset"))
        .stdout(predicate::str::contains("forecast"))
        .stdout(predicate::str::contains("UNLIMITED (3 currently)"))
        .stdout(predicate::str::contains("/forecast/member"));
}

// ===== format =====

#[test]
fn test_format_to_stdout_matches_library() {
    let fixture = fixtures::charvars();
    let file = create_temp_file(fixture.source);
    let expected = cdl_c14n::canonicalize(&fixture.parse().unwrap()).unwrap();
    cdlc()
        .arg("format")
        .arg(file.path())
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_format_output_then_check() {
    let input = create_temp_file(fixtures::fill_values().source);
    let output = NamedTempFile::new().unwrap();
    cdlc()
        .arg("format")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success();

    cdlc()
        .args(["format", "--check"])
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("File is in canonical form"));

    cdlc()
        .args(["format", "--check"])
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in canonical form"));
}

// ===== to-json =====

#[test]
fn test_to_json_with_fill_override() {
    let file = create_temp_file(fixtures::ushort_fill().source);
    let out = cdlc()
        .args(["to-json", "--variant", "cdf5", "--fill", "ushort=65534", "--compact"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        json["root"]["variables"][0]["data"],
        serde_json::json!([13398, 65534, 65535, 65530, 65534])
    );
}

#[test]
fn test_to_json_compact_without_data() {
    let file = create_temp_file(fixtures::basics().source);
    let out = cdlc()
        .args(["to-json", "--compact", "--no-data"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(!text.contains("\"data\""));
}

// ===== ops =====

#[test]
fn test_ops_streams_one_line_per_operation() {
    let file = create_temp_file(fixtures::basics().source);
    let out = cdlc().arg("ops").arg(file.path()).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // dataset + 4 dimensions + 2 variables + 6 attributes + 2 data + finalize
    assert_eq!(lines.len(), 16);
    assert!(lines[0].contains("\"op\":\"begin_dataset\""));
    assert!(lines[15].contains("\"op\":\"finalize\""));
}

#[test]
fn test_ops_keeps_lines_before_error() {
    let file = create_temp_file("netcdf e {\ndimensions:\n    n = 2 ;\n    n = 3 ;\n}\n");
    cdlc()
        .arg("ops")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("create_dimension"))
        .stderr(predicate::str::contains("DuplicateNameError"));
}
