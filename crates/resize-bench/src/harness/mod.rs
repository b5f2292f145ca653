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
//! Benchmark harness.
//!
//! # Modules
//!
//! - `executor`: Times one strategy invocation alongside the sampler
//! - `runner`: Repeats the executor and aggregates a run
//! - `aggregator`: Statistics over timing and memory series
//! - `comparator`: Baseline selection and relative deltas

pub mod aggregator;
pub mod comparator;
pub mod executor;
pub mod runner;

pub use aggregator::{sample_stats, stats, stats_or_zero, std_dev, MemoryDeviation};
pub use comparator::{
    compare_results, relative_change, relative_report, select_baseline, ComparisonResult,
    RelativeDelta, RelativeReport,
};
pub use executor::{AllocatorPurge, NoopStabilizer, Stabilizer, StrategyExecutor};
pub use runner::{FailurePolicy, IterationRunner, RunnerConfig};
