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
//! Iteration runner for executing a strategy repeatedly.

use crate::core::measurement::{IterationFailure, ProcessResult, TestResult};
use crate::error::Result;
use crate::harness::executor::StrategyExecutor;
use crate::strategies::{ResizeOptions, WorkInput};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// What to do when an iteration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Record the failure and continue with the next iteration.
    Skip,
}

impl FailurePolicy {
    /// Returns the policy as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = crate::BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(crate::BenchError::invalid_config(
                "failurePolicy",
                format!("'{other}' is not one of abort, skip"),
            )),
        }
    }
}

/// Runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub iterations: u32,
    pub failure_policy: FailurePolicy,
    /// Iterations between progress events.
    pub progress_every: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: crate::core::config::DEFAULT_ITERATIONS,
            failure_policy: FailurePolicy::Abort,
            progress_every: crate::core::config::DEFAULT_PROGRESS_EVERY,
        }
    }
}

/// Runs one strategy a fixed number of times, strictly one after another.
pub struct IterationRunner {
    executor: StrategyExecutor,
    config: RunnerConfig,
}

impl IterationRunner {
    /// Creates a runner around an executor.
    pub fn new(executor: StrategyExecutor, config: RunnerConfig) -> Self {
        Self { executor, config }
    }

    /// Returns the runner settings.
    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// Runs all iterations and aggregates them.
    ///
    /// The strategy cache is cleared before every iteration. Under
    /// [`FailurePolicy::Abort`] the first failure is returned; under
    /// [`FailurePolicy::Skip`] failed iterations are recorded and left out of
    /// the aggregation.
    pub fn run(&self, input: &WorkInput, options: &ResizeOptions) -> Result<TestResult> {
        let strategy = self.executor.strategy();
        let name = strategy.name().to_string();
        let total = self.config.iterations;
        let every = self.config.progress_every.max(1);

        info!(strategy = %name, iterations = total, "starting run");

        let mut raw_results: Vec<ProcessResult> = Vec::with_capacity(total as usize);
        let mut failures: Vec<IterationFailure> = Vec::new();
        let mut window: Vec<f64> = Vec::with_capacity(every as usize);

        for iteration in 0..total {
            strategy.clear_cache();

            match self.executor.execute(input, options) {
                Ok(result) => {
                    window.push(result.time);
                    raw_results.push(result);
                }
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Skip => {
                        warn!(strategy = %name, iteration, error = %err, "iteration failed, skipping");
                        failures.push(IterationFailure {
                            iteration,
                            message: err.to_string(),
                        });
                    }
                },
            }

            let done = iteration + 1;
            if done % every == 0 {
                let rolling_avg = if window.is_empty() {
                    None
                } else {
                    Some(window.iter().sum::<f64>() / window.len() as f64)
                };
                info!(
                    strategy = %name,
                    completed = done,
                    total,
                    percent = f64::from(done) * 100.0 / f64::from(total),
                    rolling_avg_ms = ?rolling_avg,
                    "progress"
                );
                window.clear();
            }
        }

        TestResult::from_iterations(&name, raw_results, failures)
            .map(|result| result.with_sample_mode(self.executor.sampler_config().mode))
    }
}
