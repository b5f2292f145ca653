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

//! Centralized benchmark configuration.
//!
//! Provides standardized configuration for a benchmark run: iteration count,
//! resize parameters, sampling cadence and failure handling. Values come from
//! the defaults below, optionally overlaid by a JSON or YAML file, and finally
//! by command-line flags.

use crate::core::sampler::{SampleMode, SamplerConfig};
use crate::error::{BenchError, Result};
use crate::harness::runner::{FailurePolicy, RunnerConfig};
use crate::strategies::ResizeOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default number of iterations per strategy.
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Default output width in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 1920;

/// Default memory sampling period in milliseconds.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 100;

/// Default number of iterations between progress reports.
pub const DEFAULT_PROGRESS_EVERY: u32 = 100;

/// How the resized image is fitted into the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Preserve aspect ratio, fit entirely within the box.
    #[default]
    Inside,
    /// Preserve aspect ratio, cover the box and crop the overflow.
    Cover,
    /// Preserve aspect ratio, fit within the box and pad to its exact size.
    Contain,
    /// Ignore aspect ratio and stretch to the box.
    Fill,
}

impl FitMode {
    /// All fit modes, in declaration order.
    pub const ALL: [FitMode; 4] = [
        FitMode::Inside,
        FitMode::Cover,
        FitMode::Contain,
        FitMode::Fill,
    ];

    /// Returns the fit mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Inside => "inside",
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Fill => "fill",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        FitMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                BenchError::invalid_config(
                    "fitMode",
                    format!("'{s}' is not one of inside, cover, contain, fill"),
                )
            })
    }
}

/// Centralized benchmark configuration.
///
/// # Example
///
/// ```no_run
/// use resize_bench::core::config::{BenchConfig, FitMode};
///
/// let config = BenchConfig::default()
///     .with_iterations(10)
///     .with_fit_mode(FitMode::Cover);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Number of iterations per strategy.
    pub iterations: u32,
    /// Output width in pixels.
    pub target_width: u32,
    /// Optional output height in pixels. When absent the height follows the
    /// source aspect ratio.
    pub target_height: Option<u32>,
    /// How the image is fitted into the target box.
    pub fit_mode: FitMode,
    /// Whether images smaller than the target may be upscaled.
    pub allow_enlargement: bool,
    /// Sampler period in milliseconds.
    pub sample_interval_ms: u64,
    /// Whether samples are deltas from the baseline or absolute readings.
    pub sample_mode: SampleMode,
    /// What to do when an iteration fails.
    pub failure_policy: FailurePolicy,
    /// Iterations between progress reports.
    pub progress_every: u32,
    /// Whether to purge allocator caches before taking the baseline.
    pub stabilize: bool,
}

impl BenchConfig {
    /// Creates a configuration populated with the defaults.
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: None,
            fit_mode: FitMode::Inside,
            allow_enlargement: false,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            sample_mode: SampleMode::Absolute,
            failure_policy: FailurePolicy::Abort,
            progress_every: DEFAULT_PROGRESS_EVERY,
            stabilize: true,
        }
    }

    /// Loads a configuration file, filling absent keys with defaults.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
    /// as JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| BenchError::io_error(path, e))?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yaml" | "yml"));

        let config: Self = if is_yaml {
            serde_yaml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the target width.
    pub fn with_target_width(mut self, width: u32) -> Self {
        self.target_width = width;
        self
    }

    /// Sets the target height.
    pub fn with_target_height(mut self, height: Option<u32>) -> Self {
        self.target_height = height;
        self
    }

    /// Sets the fit mode.
    pub fn with_fit_mode(mut self, fit_mode: FitMode) -> Self {
        self.fit_mode = fit_mode;
        self
    }

    /// Sets whether upscaling is allowed.
    pub fn with_allow_enlargement(mut self, allow: bool) -> Self {
        self.allow_enlargement = allow;
        self
    }

    /// Sets the sampler period.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the sampling mode.
    pub fn with_sample_mode(mut self, mode: SampleMode) -> Self {
        self.sample_mode = mode;
        self
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Sets the progress report period.
    pub fn with_progress_every(mut self, every: u32) -> Self {
        self.progress_every = every;
        self
    }

    /// Sets whether the allocator is purged before each baseline.
    pub fn with_stabilize(mut self, stabilize: bool) -> Self {
        self.stabilize = stabilize;
        self
    }

    /// Returns the sampler period.
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Returns the resize parameters passed to every work unit.
    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            width: self.target_width,
            height: self.target_height,
            fit: self.fit_mode,
            allow_enlargement: self.allow_enlargement,
        }
    }

    /// Returns the sampler settings.
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            interval: self.sample_interval(),
            mode: self.sample_mode,
        }
    }

    /// Returns the iteration runner settings.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            iterations: self.iterations,
            failure_policy: self.failure_policy,
            progress_every: self.progress_every,
        }
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::invalid_config(
                "iterations",
                "must be at least 1",
            ));
        }
        if self.target_width == 0 {
            return Err(BenchError::invalid_config(
                "targetWidth",
                "must be at least 1 pixel",
            ));
        }
        if self.target_height == Some(0) {
            return Err(BenchError::invalid_config(
                "targetHeight",
                "must be at least 1 pixel when set",
            ));
        }
        if self.sample_interval_ms == 0 {
            return Err(BenchError::invalid_config(
                "sampleIntervalMs",
                "must be at least 1 millisecond",
            ));
        }
        if self.progress_every == 0 {
            return Err(BenchError::invalid_config(
                "progressEvery",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new()
    }
}
