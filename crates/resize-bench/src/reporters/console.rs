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
//! Console reporter for run summaries and comparisons.
//!
//! The `format_*` functions build the report text; the `print_*` functions
//! write it to stdout.

use crate::core::measurement::{MemoryStats, TestResult};
use crate::harness::comparator::{ComparisonResult, RelativeReport, Spread};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Renders a signed percentage, or `undefined` when it has no value.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(value) if value > 0.0 => format!("+{value:.2}%"),
        Some(value) => format!("{value:.2}%"),
        None => "undefined".to_string(),
    }
}

fn format_share(share: Option<f64>) -> String {
    share.map_or_else(|| "n/a".to_string(), |pct| format!("{pct:.1}%"))
}

fn memory_line(out: &mut String, label: &str, stats: &MemoryStats) {
    let _ = writeln!(
        out,
        "{label}: {:.2}MB (min: {:.2}MB, max: {:.2}MB)",
        stats.avg, stats.min, stats.max
    );
}

fn spread_block(out: &mut String, indent: &str, spread: &Spread) {
    let _ = writeln!(out, "{indent}Average: {:.2}", spread.average);
    let _ = writeln!(out, "{indent}Min:     {:.2}", spread.min);
    let _ = writeln!(out, "{indent}Max:     {:.2}", spread.max);
    let _ = writeln!(out, "{indent}StdDev:  {:.2}", spread.std_dev);
}

/// Formats the summary printed after a run.
pub fn format_run_summary(strategy: &str, result: &TestResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "=".repeat(60));
    let _ = writeln!(out, "TEST SUMMARY: {strategy}");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "Iterations: {} ({} failed)",
        result.attempted(),
        result.failed_iterations.len()
    );
    let _ = writeln!(out, "Average Time: {:.2}ms", result.avg_time);
    let _ = writeln!(out, "Min Time: {:.2}ms", result.min_time);
    let _ = writeln!(out, "Max Time: {:.2}ms", result.max_time);

    let _ = writeln!(out, "\nMemory Usage:");
    let m = &result.memory_samples;
    memory_line(&mut out, "Heap Used", &m.heap_used);
    memory_line(&mut out, "Heap Total", &m.heap_total);
    memory_line(&mut out, "External", &m.external);
    memory_line(&mut out, "RSS", &m.rss);
    out
}

/// Formats the full comparison report.
pub fn format_comparison(
    comparisons: &BTreeMap<String, ComparisonResult>,
    relative: Option<&RelativeReport>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "=".repeat(80));
    let _ = writeln!(out, "PERFORMANCE COMPARISON");
    let _ = writeln!(out, "{}", "=".repeat(80));

    let _ = writeln!(out, "\nProcessing Time (ms):");
    let _ = writeln!(out, "{}", "-".repeat(80));
    for (method, data) in comparisons {
        let _ = writeln!(out, "\n{} Method:", method.to_uppercase());
        spread_block(&mut out, "  ", &data.processing_time);
    }

    let _ = writeln!(out, "\nMemory Usage (MB):");
    let _ = writeln!(out, "{}", "-".repeat(80));
    for (method, data) in comparisons {
        let m = &data.memory_usage;
        let shares = data.distribution();
        let _ = writeln!(out, "\n{} Method:", method.to_uppercase());
        let _ = writeln!(out, "  Total Memory Footprint: {:.2} MB", data.footprint());
        let _ = writeln!(out, "  Memory Distribution:");
        let _ = writeln!(
            out,
            "    Heap Used:    {:.2} MB ({})",
            m.heap_used.average,
            format_share(shares.heap_used)
        );
        let _ = writeln!(
            out,
            "    External:     {:.2} MB ({})",
            m.external.average,
            format_share(shares.external)
        );
        let _ = writeln!(
            out,
            "    RSS:          {:.2} MB ({})",
            m.rss.average,
            format_share(shares.rss)
        );

        let _ = writeln!(out, "\n  Detailed Memory Stats:");
        for (label, spread) in [
            ("Heap Used", &m.heap_used),
            ("Heap Total", &m.heap_total),
            ("External", &m.external),
            ("RSS", &m.rss),
        ] {
            let _ = writeln!(out, "  {label}:");
            spread_block(&mut out, "    ", spread);
        }
    }

    if let Some(report) = relative {
        let baseline = report.baseline.to_uppercase();
        let _ = writeln!(out, "\nRelative Performance:");
        let _ = writeln!(out, "{}", "-".repeat(80));
        let _ = writeln!(out, "Baseline Method (lowest memory usage): {baseline}");
        for (method, delta) in &report.deltas {
            let _ = writeln!(out, "\n{} vs {baseline}:", method.to_uppercase());
            let _ = writeln!(out, "  Processing Time: {}", format_delta(delta.processing_time));
            let _ = writeln!(out, "  Total Memory: {}", format_delta(delta.memory));
            let _ = writeln!(out, "  Heap Usage: {}", format_delta(delta.heap_used));
            let _ = writeln!(out, "  External Memory: {}", format_delta(delta.external));
            let _ = writeln!(out, "  RSS: {}", format_delta(delta.rss));
        }
    }

    let _ = writeln!(out, "{}", "=".repeat(80));
    out
}

/// Prints the summary of a run.
pub fn print_run_summary(strategy: &str, result: &TestResult) {
    print!("{}", format_run_summary(strategy, result));
}

/// Prints the comparison report.
pub fn print_comparison(
    comparisons: &BTreeMap<String, ComparisonResult>,
    relative: Option<&RelativeReport>,
) {
    print!("{}", format_comparison(comparisons, relative));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::{MemorySample, ProcessResult};
    use crate::harness::aggregator::MemoryDeviation;
    use crate::harness::comparator::{compare_results, relative_report};

    fn result(time: f64, rss: i64) -> TestResult {
        TestResult::from_iterations(
            "test",
            vec![ProcessResult {
                time,
                samples: vec![MemorySample {
                    timestamp: 100,
                    heap_used: 0,
                    heap_total: 4,
                    external: 0,
                    rss,
                }],
            }],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(Some(12.5)), "+12.50%");
        assert_eq!(format_delta(Some(-3.0)), "-3.00%");
        assert_eq!(format_delta(Some(0.0)), "0.00%");
        assert_eq!(format_delta(None), "undefined");
    }

    #[test]
    fn test_run_summary() {
        let text = format_run_summary("buffer", &result(12.5, 30));
        assert!(text.contains("TEST SUMMARY: buffer"));
        assert!(text.contains("Average Time: 12.50ms"));
        assert!(text.contains("RSS: 30.00MB (min: 30.00MB, max: 30.00MB)"));
    }

    #[test]
    fn test_comparison_report() {
        let mut results = BTreeMap::new();
        results.insert("buffer".to_string(), result(10.0, 20));
        results.insert("path".to_string(), result(20.0, 10));
        let comparisons = compare_results(&results, MemoryDeviation::SummaryProxy).unwrap();
        let relative = relative_report(&comparisons);

        let text = format_comparison(&comparisons, relative.as_ref());
        assert!(text.contains("Baseline Method (lowest memory usage): PATH"));
        assert!(text.contains("BUFFER vs PATH:"));
        assert!(text.contains("Processing Time: -50.00%"));
        assert!(text.contains("Total Memory: +100.00%"));
        assert!(text.contains("Heap Usage: undefined"));
        assert!(text.contains("RSS:          20.00 MB (100.0%)"));
    }
}
