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
//! Cross-strategy comparison.
//!
//! Turns one [`TestResult`] per strategy into a [`ComparisonResult`], picks
//! the strategy with the smallest memory footprint as the baseline and
//! expresses every other strategy relative to it.

use crate::core::measurement::{MemoryStats, TestResult};
use crate::core::sampler::SampleMode;
use crate::error::{BenchError, Result};
use crate::harness::aggregator::{std_dev, summary_std_dev, DimensionPools, MemoryDeviation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{average, min, max, stdDev}` of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spread {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl Spread {
    fn from_stats(stats: &MemoryStats, std_dev: f64) -> Self {
        Self {
            average: stats.avg,
            min: stats.min,
            max: stats.max,
            std_dev,
        }
    }
}

/// One [`Spread`] per memory dimension, in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub heap_used: Spread,
    pub heap_total: Spread,
    pub external: Spread,
    pub rss: Spread,
}

/// Comparison record of one strategy.
///
/// Derived from a single [`TestResult`]; cross-strategy deltas live in
/// [`RelativeReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub method: String,
    /// Iteration times in milliseconds.
    pub processing_time: Spread,
    pub memory_usage: MemoryUsage,
}

impl ComparisonResult {
    /// Builds the record for one strategy.
    ///
    /// The time deviation is taken over every iteration time. The memory
    /// deviation follows `deviation`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::EmptyInput`] when `result` holds no iterations.
    pub fn from_test_result(
        method: impl Into<String>,
        result: &TestResult,
        deviation: MemoryDeviation,
    ) -> Result<Self> {
        let times = result.times();
        let time_sd = std_dev(&times)?;
        let processing_time = Spread {
            average: result.avg_time,
            min: result.min_time,
            max: result.max_time,
            std_dev: time_sd,
        };

        let m = &result.memory_samples;
        let memory_usage = match deviation {
            MemoryDeviation::SummaryProxy => MemoryUsage {
                heap_used: Spread::from_stats(&m.heap_used, summary_std_dev(&m.heap_used)),
                heap_total: Spread::from_stats(&m.heap_total, summary_std_dev(&m.heap_total)),
                external: Spread::from_stats(&m.external, summary_std_dev(&m.external)),
                rss: Spread::from_stats(&m.rss, summary_std_dev(&m.rss)),
            },
            MemoryDeviation::FullPool => {
                let pools = DimensionPools::collect(result.samples());
                let pooled = |values: &[f64], stats: &MemoryStats| {
                    let sd = if values.is_empty() { 0.0 } else { std_dev(values)? };
                    Ok::<_, BenchError>(Spread::from_stats(stats, sd))
                };
                MemoryUsage {
                    heap_used: pooled(&pools.heap_used, &m.heap_used)?,
                    heap_total: pooled(&pools.heap_total, &m.heap_total)?,
                    external: pooled(&pools.external, &m.external)?,
                    rss: pooled(&pools.rss, &m.rss)?,
                }
            }
        };

        Ok(Self {
            method: method.into(),
            processing_time,
            memory_usage,
        })
    }

    /// Average heap used + external + RSS.
    ///
    /// Reserved heap capacity is not part of the footprint.
    pub fn footprint(&self) -> f64 {
        let m = &self.memory_usage;
        m.heap_used.average + m.external.average + m.rss.average
    }

    /// Share of each footprint dimension in the footprint, in percent.
    pub fn distribution(&self) -> FootprintShares {
        let total = self.footprint();
        let share = |part: f64| {
            (total != 0.0)
                .then(|| part / total * 100.0)
                .filter(|pct| pct.is_finite())
        };
        let m = &self.memory_usage;
        FootprintShares {
            heap_used: share(m.heap_used.average),
            external: share(m.external.average),
            rss: share(m.rss.average),
        }
    }
}

/// Per-dimension shares of a footprint, in percent.
///
/// `None` when the footprint is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintShares {
    pub heap_used: Option<f64>,
    pub external: Option<f64>,
    pub rss: Option<f64>,
}

/// Builds a comparison record for every strategy.
///
/// # Errors
///
/// Returns [`BenchError::InvalidConfig`] when the results were sampled in
/// different [`SampleMode`]s, since deltas and absolute readings do not
/// compare.
pub fn compare_results(
    results: &BTreeMap<String, TestResult>,
    deviation: MemoryDeviation,
) -> Result<BTreeMap<String, ComparisonResult>> {
    ensure_uniform_mode(results)?;
    results
        .iter()
        .map(|(name, result)| {
            ComparisonResult::from_test_result(name.clone(), result, deviation)
                .map(|comparison| (name.clone(), comparison))
        })
        .collect()
}

fn ensure_uniform_mode(results: &BTreeMap<String, TestResult>) -> Result<()> {
    let Some(first) = results.values().next().map(|r| r.sample_mode) else {
        return Ok(());
    };
    if results.values().all(|r| r.sample_mode == first) {
        return Ok(());
    }
    let listed: Vec<String> = results
        .iter()
        .map(|(name, r)| format!("{name}: {}", r.sample_mode))
        .collect();
    Err(BenchError::invalid_config(
        "sampleMode",
        format!("results mix sample modes ({})", listed.join(", ")),
    ))
}

/// Returns the strategy with the smallest footprint.
///
/// Exact ties go to the name that sorts first.
pub fn select_baseline(comparisons: &BTreeMap<String, ComparisonResult>) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (name, comparison) in comparisons {
        let footprint = comparison.footprint();
        match best {
            Some((_, lowest)) if footprint >= lowest => {}
            // NaN never displaces an existing candidate.
            Some(_) if footprint.is_nan() => {}
            _ => best = Some((name.as_str(), footprint)),
        }
    }
    best.map(|(name, _)| name)
}

/// Signed percentage change of `current` relative to `baseline`.
///
/// Returns `None` when the change is undefined: a baseline that is not
/// strictly positive or not finite, or a non-finite result. A negative
/// baseline would flip the sign of every delta.
pub fn relative_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline <= 0.0 || !baseline.is_finite() {
        return None;
    }
    let change = (current - baseline) / baseline * 100.0;
    change.is_finite().then_some(change)
}

/// Deltas of one strategy against the baseline, in percent.
///
/// `None` marks an undefined delta and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeDelta {
    pub processing_time: Option<f64>,
    /// Footprint delta.
    pub memory: Option<f64>,
    pub heap_used: Option<f64>,
    pub external: Option<f64>,
    pub rss: Option<f64>,
}

impl RelativeDelta {
    /// Computes the deltas of `current` against `baseline`.
    pub fn between(current: &ComparisonResult, baseline: &ComparisonResult) -> Self {
        let (c, b) = (&current.memory_usage, &baseline.memory_usage);
        Self {
            processing_time: relative_change(
                current.processing_time.average,
                baseline.processing_time.average,
            ),
            memory: relative_change(current.footprint(), baseline.footprint()),
            heap_used: relative_change(c.heap_used.average, b.heap_used.average),
            external: relative_change(c.external.average, b.external.average),
            rss: relative_change(c.rss.average, b.rss.average),
        }
    }
}

/// Baseline and the deltas of every other strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeReport {
    pub baseline: String,
    pub deltas: BTreeMap<String, RelativeDelta>,
}

/// Builds the relative report, or `None` when there is nothing to compare.
pub fn relative_report(comparisons: &BTreeMap<String, ComparisonResult>) -> Option<RelativeReport> {
    let baseline_name = select_baseline(comparisons)?;
    let baseline = comparisons.get(baseline_name)?;
    let deltas = comparisons
        .iter()
        .filter(|(name, _)| name.as_str() != baseline_name)
        .map(|(name, current)| (name.clone(), RelativeDelta::between(current, baseline)))
        .collect();
    Some(RelativeReport {
        baseline: baseline_name.to_string(),
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::{MemorySample, ProcessResult};

    fn sample(heap_used: i64, external: i64, rss: i64) -> MemorySample {
        MemorySample {
            timestamp: 100,
            heap_used,
            heap_total: 99,
            external,
            rss,
        }
    }

    fn result(times: &[f64], samples: Vec<MemorySample>) -> TestResult {
        let mut raw: Vec<ProcessResult> = times
            .iter()
            .map(|&time| ProcessResult {
                time,
                samples: Vec::new(),
            })
            .collect();
        raw[0].samples = samples;
        TestResult::from_iterations("test", raw, Vec::new()).unwrap()
    }

    fn comparisons(entries: &[(&str, f64)]) -> BTreeMap<String, ComparisonResult> {
        let results: BTreeMap<String, TestResult> = entries
            .iter()
            .map(|&(name, footprint)| {
                let rss = footprint as i64;
                (name.to_string(), result(&[10.0, 20.0], vec![sample(0, 0, rss)]))
            })
            .collect();
        compare_results(&results, MemoryDeviation::SummaryProxy).unwrap()
    }

    #[test]
    fn test_processing_time_spread() {
        let c = ComparisonResult::from_test_result(
            "buffer",
            &result(&[10.0, 20.0, 30.0], Vec::new()),
            MemoryDeviation::SummaryProxy,
        )
        .unwrap();
        assert_eq!(c.method, "buffer");
        assert_eq!(c.processing_time.average, 20.0);
        let expected = (200.0f64 / 3.0).sqrt();
        assert!((c.processing_time.std_dev - expected).abs() < 1e-9);
        assert_eq!(c.memory_usage, MemoryUsage::default());
    }

    #[test]
    fn test_memory_deviation_policies_differ() {
        let r = result(
            &[1.0],
            vec![sample(0, 0, 0), sample(0, 0, 0), sample(0, 0, 0), sample(12, 0, 0)],
        );
        let summary = ComparisonResult::from_test_result("a", &r, MemoryDeviation::SummaryProxy)
            .unwrap();
        let pool = ComparisonResult::from_test_result("a", &r, MemoryDeviation::FullPool).unwrap();

        // Points {0, 12, 3} vs pool {0, 0, 0, 12}.
        assert!((summary.memory_usage.heap_used.std_dev - 26.0f64.sqrt()).abs() < 1e-9);
        assert!((pool.memory_usage.heap_used.std_dev - 27.0f64.sqrt()).abs() < 1e-9);
        assert_eq!(pool.memory_usage.heap_total.std_dev, 0.0);
    }

    #[test]
    fn test_footprint_excludes_heap_total() {
        let c = ComparisonResult::from_test_result(
            "a",
            &result(&[1.0], vec![sample(2, 3, 4)]),
            MemoryDeviation::SummaryProxy,
        )
        .unwrap();
        assert_eq!(c.footprint(), 9.0);
    }

    #[test]
    fn test_baseline_is_lowest_footprint() {
        let c = comparisons(&[("A", 10.0), ("B", 5.0), ("C", 20.0)]);
        assert_eq!(select_baseline(&c), Some("B"));

        let report = relative_report(&c).unwrap();
        assert_eq!(report.baseline, "B");
        assert_eq!(report.deltas["A"].memory, Some(100.0));
        assert_eq!(report.deltas["C"].memory, Some(300.0));
        assert_eq!(report.deltas["A"].processing_time, Some(0.0));
        assert!(!report.deltas.contains_key("B"));
    }

    #[test]
    fn test_baseline_tie_goes_to_first_name() {
        let c = comparisons(&[("stream", 5.0), ("buffer", 5.0), ("path", 7.0)]);
        assert_eq!(select_baseline(&c), Some("buffer"));
        assert_eq!(select_baseline(&BTreeMap::new()), None);
    }

    #[test]
    fn test_zero_baseline_is_undefined() {
        assert_eq!(relative_change(5.0, 0.0), None);
        assert_eq!(relative_change(5.0, f64::NAN), None);
        assert_eq!(relative_change(15.0, 10.0), Some(50.0));
        assert_eq!(relative_change(5.0, 10.0), Some(-50.0));
        assert_eq!(relative_change(2.0, -2.0), None);

        let c = comparisons(&[("A", 0.0), ("B", 5.0)]);
        let report = relative_report(&c).unwrap();
        assert_eq!(report.baseline, "A");
        assert_eq!(report.deltas["B"].rss, None);
        assert_eq!(report.deltas["B"].memory, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["deltas"]["B"]["rss"].is_null());
    }

    #[test]
    fn test_negative_baseline_is_undefined() {
        // Relative samples can drop below the pre-run reading.
        let mut results = BTreeMap::new();
        results.insert("lean".to_string(), result(&[1.0], vec![sample(-1, 0, -1)]));
        results.insert("heavy".to_string(), result(&[1.0], vec![sample(1, 0, 1)]));
        let c = compare_results(&results, MemoryDeviation::SummaryProxy).unwrap();

        let report = relative_report(&c).unwrap();
        assert_eq!(report.baseline, "lean");
        assert_eq!(report.deltas["heavy"].memory, None);
        assert_eq!(report.deltas["heavy"].rss, None);
        assert_eq!(report.deltas["heavy"].processing_time, Some(0.0));
    }

    #[test]
    fn test_mixed_sample_modes_rejected() {
        let mut results = BTreeMap::new();
        results.insert("buffer".to_string(), result(&[1.0], vec![sample(1, 0, 1)]));
        results.insert(
            "path".to_string(),
            result(&[1.0], vec![sample(1, 0, 1)]).with_sample_mode(SampleMode::Relative),
        );

        let err = compare_results(&results, MemoryDeviation::SummaryProxy).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Invalid configuration parameter 'sampleMode': results mix sample modes \
             (buffer: absolute, path: relative)"
        );

        let relative: BTreeMap<String, TestResult> = results
            .into_iter()
            .map(|(name, r)| (name, r.with_sample_mode(SampleMode::Relative)))
            .collect();
        assert!(compare_results(&relative, MemoryDeviation::SummaryProxy).is_ok());
    }

    #[test]
    fn test_footprint_distribution() {
        let c = ComparisonResult::from_test_result(
            "a",
            &result(&[1.0], vec![sample(1, 1, 2)]),
            MemoryDeviation::SummaryProxy,
        )
        .unwrap();
        let shares = c.distribution();
        assert_eq!(shares.heap_used, Some(25.0));
        assert_eq!(shares.external, Some(25.0));
        assert_eq!(shares.rss, Some(50.0));

        let zero = comparisons(&[("A", 0.0)]);
        assert_eq!(zero["A"].distribution(), FootprintShares::default());
    }

    #[test]
    fn test_json_shape() {
        let c = comparisons(&[("buffer", 1.0)]);
        let json = serde_json::to_value(&c).unwrap();
        let entry = &json["buffer"];
        assert_eq!(entry["method"], "buffer");
        assert!(entry["processingTime"].get("stdDev").is_some());
        assert!(entry["memoryUsage"]["heapUsed"].get("average").is_some());
    }
}
