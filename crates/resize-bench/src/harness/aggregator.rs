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

//! Statistics over timing and memory series.
//!
//! Pure functions, no state. Reductions over a series that must not be empty
//! return [`BenchError::EmptyInput`]; [`stats_or_zero`] is the one place an
//! empty series is accepted, and it yields all zeros.

use crate::core::measurement::{MemorySample, MemoryStats, MemorySampleStats};
use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the comparator derives a memory standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MemoryDeviation {
    /// Deviation of the three points `{min, max, avg}`.
    ///
    /// A coarse proxy, not sample-to-sample variance.
    #[default]
    #[serde(rename = "summary")]
    SummaryProxy,
    /// Deviation of every pooled sample.
    #[serde(rename = "pool")]
    FullPool,
}

impl MemoryDeviation {
    /// Returns the policy as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryDeviation::SummaryProxy => "summary",
            MemoryDeviation::FullPool => "pool",
        }
    }
}

impl fmt::Display for MemoryDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryDeviation {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summary" => Ok(MemoryDeviation::SummaryProxy),
            "pool" => Ok(MemoryDeviation::FullPool),
            other => Err(BenchError::invalid_config(
                "memoryDeviation",
                format!("'{other}' is not one of summary, pool"),
            )),
        }
    }
}

/// Running mean and squared-deviation sum.
#[derive(Debug, Clone, Copy, Default)]
struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn population_variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).max(0.0)
        }
    }
}

/// Computes `{min, max, avg}` of a series.
///
/// The average is clamped into `[min, max]`, so floating-point rounding can
/// not break `min <= avg <= max`.
///
/// # Errors
///
/// Returns [`BenchError::EmptyInput`] for an empty series.
pub fn stats(values: &[f64]) -> Result<MemoryStats> {
    let (first, rest) = values
        .split_first()
        .ok_or(BenchError::EmptyInput { context: "stats" })?;

    let mut min = *first;
    let mut max = *first;
    let mut acc = Welford::default();
    acc.push(*first);
    for &x in rest {
        min = min.min(x);
        max = max.max(x);
        acc.push(x);
    }

    Ok(MemoryStats {
        min,
        max,
        avg: acc.mean.clamp(min, max),
    })
}

/// Like [`stats`], but an empty series yields `{0, 0, 0}`.
///
/// Used for memory sample pools, which are legitimately empty when an
/// operation finishes before the first sampler tick.
pub fn stats_or_zero(values: &[f64]) -> MemoryStats {
    stats(values).unwrap_or_default()
}

/// Population standard deviation (divides by N).
///
/// Exactly `0.0` when every element is equal, and positive otherwise. The
/// series is divided by its largest magnitude first, so squared deviations
/// of tiny values do not underflow and those of huge values do not
/// overflow.
///
/// # Errors
///
/// Returns [`BenchError::EmptyInput`] for an empty series.
pub fn std_dev(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(BenchError::EmptyInput {
            context: "standard deviation",
        });
    }
    Ok(scaled_std_dev(values))
}

/// Standard deviation of the three summary points `{min, max, avg}`.
pub fn summary_std_dev(summary: &MemoryStats) -> f64 {
    scaled_std_dev(&[summary.min, summary.max, summary.avg])
}

fn scaled_std_dev(values: &[f64]) -> f64 {
    let scale = values.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    let divisor = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };

    let mut acc = Welford::default();
    for &x in values {
        acc.push(x / divisor);
    }
    acc.population_variance().sqrt() * divisor
}

/// Pools samples into one series per dimension and reduces each.
pub fn sample_stats<'a, I>(samples: I) -> MemorySampleStats
where
    I: IntoIterator<Item = &'a MemorySample>,
{
    let pools = DimensionPools::collect(samples);
    MemorySampleStats {
        heap_used: stats_or_zero(&pools.heap_used),
        heap_total: stats_or_zero(&pools.heap_total),
        external: stats_or_zero(&pools.external),
        rss: stats_or_zero(&pools.rss),
    }
}

/// Per-dimension sample values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionPools {
    pub heap_used: Vec<f64>,
    pub heap_total: Vec<f64>,
    pub external: Vec<f64>,
    pub rss: Vec<f64>,
}

impl DimensionPools {
    /// Splits samples into one pool per dimension.
    pub fn collect<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a MemorySample>,
    {
        let mut pools = Self::default();
        for sample in samples {
            pools.heap_used.push(sample.heap_used as f64);
            pools.heap_total.push(sample.heap_total as f64);
            pools.external.push(sample.external as f64);
            pools.rss.push(sample.rss as f64);
        }
        pools
    }
}
