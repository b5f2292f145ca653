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
//! Compares two synthetic strategies without touching any image.
//!
//! This example demonstrates:
//! - Implementing the `Strategy` trait
//! - Running strategies through the executor and iteration runner
//! - Comparing the runs and printing the relative report
//!
//! Run with:
//! ```bash
//! cargo run --package resize-bench --example synthetic_comparison
//! ```

use resize_bench::core::{ResourceProbe, SamplerConfig, SystemProbe};
use resize_bench::harness::{
    compare_results, relative_report, AllocatorPurge, IterationRunner, MemoryDeviation,
    RunnerConfig, StrategyExecutor,
};
use resize_bench::reporters::print_comparison;
use resize_bench::{ResizeOptions, Result, Strategy, WorkInput};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Holds `megabytes` of touched memory for `hold`.
struct Allocate {
    name: &'static str,
    megabytes: usize,
    hold: Duration,
}

impl Strategy for Allocate {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&self, _input: &WorkInput, _options: &ResizeOptions) -> Result<()> {
        let buffer = vec![1u8; self.megabytes * 1024 * 1024];
        thread::sleep(self.hold);
        std::hint::black_box(&buffer);
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Synthetic Comparison Example ===\n");

    let probe: Arc<dyn ResourceProbe> = Arc::new(SystemProbe::new());
    let sampler = SamplerConfig {
        interval: Duration::from_millis(20),
        ..SamplerConfig::default()
    };
    let runner_config = RunnerConfig {
        iterations: 5,
        progress_every: 5,
        ..RunnerConfig::default()
    };

    let strategies = [
        Allocate {
            name: "small",
            megabytes: 8,
            hold: Duration::from_millis(60),
        },
        Allocate {
            name: "large",
            megabytes: 64,
            hold: Duration::from_millis(90),
        },
    ];

    let input = WorkInput::new("unused");
    let options = ResizeOptions::default();
    let mut results = BTreeMap::new();

    for strategy in strategies {
        let name = strategy.name.to_string();
        let executor = StrategyExecutor::new(Box::new(strategy), Arc::clone(&probe), sampler)
            .with_stabilizer(Box::new(AllocatorPurge));
        let result = IterationRunner::new(executor, runner_config).run(&input, &options)?;
        println!(
            "{name}: avg {:.2}ms over {} iterations",
            result.avg_time,
            result.raw_results.len()
        );
        results.insert(name, result);
    }

    let comparisons = compare_results(&results, MemoryDeviation::SummaryProxy)?;
    print_comparison(&comparisons, relative_report(&comparisons).as_ref());
    Ok(())
}
