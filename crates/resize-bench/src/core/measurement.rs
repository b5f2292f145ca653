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

//! Measurement records.
//!
//! These are the values that flow through the pipeline: one
//! [`MemorySample`] per sampler tick, one [`ProcessResult`] per iteration and
//! one [`TestResult`] per strategy run. None of them is mutated after
//! construction. Field names serialize in camelCase, which is the persisted
//! result file format.

use crate::core::probe::MemoryReading;
use crate::core::sampler::SampleMode;
use crate::error::{BenchError, Result};
use crate::harness::aggregator::{sample_stats, stats};
use serde::{Deserialize, Serialize};

/// One memory reading taken by the sampler.
///
/// Values are whole megabytes. In relative mode they are deltas from the
/// baseline and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySample {
    /// Milliseconds since sampling started.
    pub timestamp: u64,
    pub heap_used: i64,
    pub heap_total: i64,
    pub external: i64,
    pub rss: i64,
}

impl MemorySample {
    /// Builds a baseline-relative sample.
    pub fn delta(timestamp: u64, reading: MemoryReading, baseline: MemoryReading) -> Self {
        let diff = |now: u64, base: u64| signed(now).saturating_sub(signed(base));
        Self {
            timestamp,
            heap_used: diff(reading.heap_used, baseline.heap_used),
            heap_total: diff(reading.heap_total, baseline.heap_total),
            external: diff(reading.external, baseline.external),
            rss: diff(reading.rss, baseline.rss),
        }
    }

    /// Builds a sample holding the reading as-is.
    pub fn absolute(timestamp: u64, reading: MemoryReading) -> Self {
        Self {
            timestamp,
            heap_used: signed(reading.heap_used),
            heap_total: signed(reading.heap_total),
            external: signed(reading.external),
            rss: signed(reading.rss),
        }
    }
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// `{min, max, avg}` reduction of a numeric series.
///
/// For non-empty input `min <= avg <= max`. An all-zero value is only
/// produced for empty input through
/// [`stats_or_zero`](crate::harness::aggregator::stats_or_zero).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// One [`MemoryStats`] per memory dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySampleStats {
    pub heap_used: MemoryStats,
    pub heap_total: MemoryStats,
    pub external: MemoryStats,
    pub rss: MemoryStats,
}

/// Outcome of a single iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Wall-clock time of the work unit in milliseconds.
    pub time: f64,
    /// Samples in timestamp order.
    pub samples: Vec<MemorySample>,
}

/// An iteration skipped under [`FailurePolicy::Skip`](crate::harness::runner::FailurePolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationFailure {
    /// Zero-based iteration index.
    pub iteration: u32,
    /// Error message of the failed work unit.
    pub message: String,
}

/// Aggregated outcome of all iterations of one strategy.
///
/// `raw_results` is kept so that anything derived from it (time deviation,
/// pooled memory statistics) can be recomputed from a persisted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub avg_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    pub memory_samples: MemorySampleStats,
    pub raw_results: Vec<ProcessResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_iterations: Vec<IterationFailure>,
    /// How the samples were recorded. Files without the key load as
    /// absolute readings.
    #[serde(default)]
    pub sample_mode: SampleMode,
}

impl TestResult {
    /// Reduces the successful iterations of a run.
    ///
    /// Times are reduced over `raw_results` only, so skipped iterations never
    /// enter a denominator. Memory statistics pool every sample of every
    /// iteration, unweighted by iteration or time offset.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::NoSuccessfulIterations`] when `raw_results` is
    /// empty.
    pub fn from_iterations(
        strategy: &str,
        raw_results: Vec<ProcessResult>,
        failed_iterations: Vec<IterationFailure>,
    ) -> Result<Self> {
        if raw_results.is_empty() {
            let attempted = u32::try_from(failed_iterations.len()).unwrap_or(u32::MAX);
            return Err(BenchError::NoSuccessfulIterations {
                strategy: strategy.to_string(),
                attempted,
            });
        }

        let times: Vec<f64> = raw_results.iter().map(|r| r.time).collect();
        let time_stats = stats(&times)?;
        let memory_samples = sample_stats(raw_results.iter().flat_map(|r| r.samples.iter()));

        Ok(Self {
            avg_time: time_stats.avg,
            min_time: time_stats.min,
            max_time: time_stats.max,
            memory_samples,
            raw_results,
            failed_iterations,
            sample_mode: SampleMode::default(),
        })
    }

    /// Records the mode the samples were taken in.
    pub fn with_sample_mode(mut self, mode: SampleMode) -> Self {
        self.sample_mode = mode;
        self
    }

    /// Iteration times in iteration order.
    pub fn times(&self) -> Vec<f64> {
        self.raw_results.iter().map(|r| r.time).collect()
    }

    /// Every sample of every iteration.
    pub fn samples(&self) -> impl Iterator<Item = &MemorySample> {
        self.raw_results.iter().flat_map(|r| r.samples.iter())
    }

    /// Recomputes the pooled memory statistics from `raw_results`.
    pub fn pooled_memory_stats(&self) -> MemorySampleStats {
        sample_stats(self.samples())
    }

    /// Number of iterations that were attempted, successful or not.
    pub fn attempted(&self) -> usize {
        self.raw_results.len() + self.failed_iterations.len()
    }
}
