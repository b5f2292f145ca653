// Dweve Resize Bench - Image resize strategy benchmarking
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

//! Binary-level tests for resize-bench and resize-compare.

use assert_cmd::Command;
use image::{GenericImageView, Rgb, RgbImage};
use predicates::prelude::*;
use resize_bench::core::{MemorySample, ProcessResult};
use resize_bench::{ResultStore, TestResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn bench_cmd() -> Command {
    Command::cargo_bin("resize-bench").expect("Failed to find resize-bench binary")
}

fn compare_cmd() -> Command {
    Command::cargo_bin("resize-compare").expect("Failed to find resize-compare binary")
}

fn write_jpeg(dir: &Path) -> PathBuf {
    let path = dir.join("tiny.jpg");
    RgbImage::from_fn(64, 32, |x, y| Rgb([(x * 4) as u8, (y * 8) as u8, 90]))
        .save(&path)
        .expect("Failed to write test image");
    path
}

fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(prefix) && name.ends_with(".json"))
        .collect();
    names.sort();
    names
}

/// A result whose averages are exactly `heap_used`, `external` and `rss`.
fn synthetic_result(time: f64, heap_used: i64, external: i64, rss: i64) -> TestResult {
    let sample = MemorySample {
        timestamp: 100,
        heap_used,
        heap_total: 64,
        external,
        rss,
    };
    TestResult::from_iterations(
        "synthetic",
        vec![ProcessResult {
            time,
            samples: vec![sample],
        }],
        Vec::new(),
    )
    .expect("Failed to build result")
}

// ===== resize-bench =====

#[test]
fn test_help_output() {
    bench_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--sample-interval-ms"));
}

#[test]
fn test_missing_strategy_lists_choices() {
    bench_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: No strategy given"))
        .stderr(predicate::str::contains("buffer, stream, path, sequential-stream"));
}

#[test]
fn test_unknown_strategy_lists_choices() {
    bench_cmd()
        .arg("teleport")
        .assert()
        .failure()
        .stderr(predicate::str::contains("teleport"))
        .stderr(predicate::str::contains("buffer, stream, path, sequential-stream"));
}

#[test]
fn test_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    bench_cmd()
        .current_dir(temp.path())
        .args(["buffer", "--input", "nowhere.jpg", "--iterations", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: I/O error for 'nowhere.jpg'"));
}

#[test]
fn test_zero_iterations_rejected() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path());
    bench_cmd()
        .current_dir(temp.path())
        .arg("buffer")
        .arg("--input")
        .arg(&input)
        .args(["--iterations", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("iterations"));
}

#[test]
fn test_run_writes_result_file() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path());
    let results = temp.path().join("results");

    bench_cmd()
        .current_dir(temp.path())
        .arg("stream")
        .arg("--input")
        .arg(&input)
        .arg("--results-dir")
        .arg(&results)
        .args(["--iterations", "2", "--width", "16", "--sample-interval-ms", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEST SUMMARY: stream"))
        .stdout(predicate::str::contains("Iterations: 2 (0 failed)"));

    let files = files_with_prefix(&results, "stream-");
    assert_eq!(files.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(results.join(&files[0])).unwrap()).unwrap();
    assert_eq!(json["rawResults"].as_array().unwrap().len(), 2);
    assert!(json["avgTime"].as_f64().unwrap() >= 0.0);
}

#[test]
fn test_path_strategy_writes_output_image() {
    let temp = TempDir::new().unwrap();
    let input = write_jpeg(temp.path());
    let output_dir = temp.path().join("out");

    bench_cmd()
        .current_dir(temp.path())
        .arg("path")
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(&output_dir)
        .args(["--iterations", "1", "--width", "16", "--no-stabilize"])
        .assert()
        .success();

    let written = image::open(output_dir.join("output.jpg")).unwrap();
    assert_eq!(written.dimensions(), (16, 8));
    assert_eq!(files_with_prefix(&temp.path().join("results"), "path-").len(), 1);
}

// ===== resize-compare =====

#[test]
fn test_compare_empty_dir_fails() {
    let temp = TempDir::new().unwrap();
    compare_cmd()
        .arg("--results-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: No results found for strategies"));
}

#[test]
fn test_compare_writes_comparison_file() {
    let temp = TempDir::new().unwrap();
    let store = ResultStore::new(temp.path());
    store.save_result("buffer", &synthetic_result(10.0, 2, 1, 2)).unwrap();
    store.save_result("stream", &synthetic_result(20.0, 4, 2, 4)).unwrap();

    compare_cmd()
        .env("RUST_LOG", "resize_bench=info")
        .arg("--results-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PERFORMANCE COMPARISON"))
        .stdout(predicate::str::contains(
            "Baseline Method (lowest memory usage): BUFFER",
        ))
        .stdout(predicate::str::contains("Total Memory: +100.00%"))
        .stderr(predicate::str::contains("No results found for path method"));

    let comparisons = files_with_prefix(temp.path(), "comparison-");
    assert_eq!(comparisons.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join(&comparisons[0])).unwrap())
            .unwrap();
    assert!(json.get("buffer").is_some());
    assert!(json.get("stream").is_some());
    assert!(json.get("path").is_none());
}

#[test]
fn test_compare_no_save() {
    let temp = TempDir::new().unwrap();
    let store = ResultStore::new(temp.path());
    store.save_result("buffer", &synthetic_result(10.0, 2, 1, 2)).unwrap();

    compare_cmd()
        .arg("--results-dir")
        .arg(temp.path())
        .args(["--strategies", "buffer", "--memory-deviation", "pool", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BUFFER Method:"));

    assert!(files_with_prefix(temp.path(), "comparison-").is_empty());
}

#[test]
fn test_compare_rejects_unknown_deviation() {
    compare_cmd()
        .args(["--memory-deviation", "median"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("summary, pool"));
}
