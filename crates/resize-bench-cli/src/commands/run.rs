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

//! The `resize-bench` command: benchmark one strategy.

use crate::error::{CliError, Result};
use clap::Parser;
use resize_bench::core::config::FitMode;
use resize_bench::core::{ResourceProbe, SampleMode, SystemProbe};
use resize_bench::harness::{
    AllocatorPurge, FailurePolicy, IterationRunner, NoopStabilizer, Stabilizer, StrategyExecutor,
};
use resize_bench::reporters::print_run_summary;
use resize_bench::{BenchConfig, ResultStore, StrategyKind, WorkInput};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Image resized when `--input` is not given.
pub const DEFAULT_INPUT: &str = "test-images/bigger-image.jpg";

/// Directory receiving files written by the `path` strategy.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Benchmark one image resize strategy.
///
/// Settings are layered: built-in defaults, then `--config`, then flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "resize-bench")]
#[command(author = "Dweve B.V.")]
#[command(version)]
#[command(about = "Benchmark one image resize strategy", long_about = None)]
pub struct RunArgs {
    /// Strategy to run: buffer, stream, path or sequential-stream
    #[arg(value_name = "STRATEGY")]
    pub strategy: Option<StrategyKind>,

    /// Number of iterations
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Target width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels (defaults to the source aspect ratio)
    #[arg(long)]
    pub height: Option<u32>,

    /// Fit mode: inside, cover, contain or fill
    #[arg(long)]
    pub fit: Option<FitMode>,

    /// Allow upscaling images smaller than the target
    #[arg(long)]
    pub allow_enlargement: bool,

    /// Memory sampling period in milliseconds
    #[arg(long, value_name = "MS")]
    pub sample_interval_ms: Option<u64>,

    /// Sample mode: relative or absolute
    #[arg(long)]
    pub sample_mode: Option<SampleMode>,

    /// What to do when an iteration fails: abort or skip
    #[arg(long, value_name = "POLICY")]
    pub on_failure: Option<FailurePolicy>,

    /// Log progress every N iterations
    #[arg(long, value_name = "N")]
    pub progress_every: Option<u32>,

    /// Skip the allocator purge before each baseline reading
    #[arg(long)]
    pub no_stabilize: bool,

    /// Image to resize
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory for files written by the path strategy
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Directory receiving result files
    #[arg(long, default_value = resize_bench::core::store::DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Configuration file (.json, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Returns the selected strategy.
    pub fn strategy(&self) -> Result<StrategyKind> {
        self.strategy
            .ok_or_else(|| CliError::missing_strategy(&StrategyKind::names()))
    }

    /// Builds the effective configuration.
    ///
    /// Flags override the configuration file, which overrides the defaults.
    pub fn resolve_config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_file(path)?,
            None => BenchConfig::default(),
        };

        if let Some(iterations) = self.iterations {
            config = config.with_iterations(iterations);
        }
        if let Some(width) = self.width {
            config = config.with_target_width(width);
        }
        if self.height.is_some() {
            config = config.with_target_height(self.height);
        }
        if let Some(fit) = self.fit {
            config = config.with_fit_mode(fit);
        }
        if self.allow_enlargement {
            config = config.with_allow_enlargement(true);
        }
        if let Some(ms) = self.sample_interval_ms {
            config = config.with_sample_interval(Duration::from_millis(ms));
        }
        if let Some(mode) = self.sample_mode {
            config = config.with_sample_mode(mode);
        }
        if let Some(policy) = self.on_failure {
            config = config.with_failure_policy(policy);
        }
        if let Some(every) = self.progress_every {
            config = config.with_progress_every(every);
        }
        if self.no_stabilize {
            config = config.with_stabilize(false);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Output file for the path strategy: `output.png` for PNG input,
/// `output.jpg` otherwise.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let is_png = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    output_dir.join(if is_png { "output.png" } else { "output.jpg" })
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| CliError::io_error(path, e))
}

/// Runs the benchmark and returns the saved result file.
pub fn run(args: &RunArgs) -> Result<PathBuf> {
    let kind = args.strategy()?;
    let config = args.resolve_config()?;

    fs::metadata(&args.input).map_err(|e| CliError::io_error(&args.input, e))?;
    ensure_dir(&args.output_dir)?;
    ensure_dir(&args.results_dir)?;

    let mut input = WorkInput::new(&args.input);
    if kind.writes_output() {
        input = input.with_output(output_path_for(&args.input, &args.output_dir));
    }

    let stabilizer: Box<dyn Stabilizer> = if config.stabilize {
        Box::new(AllocatorPurge)
    } else {
        Box::new(NoopStabilizer)
    };
    let probe: Arc<dyn ResourceProbe> = Arc::new(SystemProbe::new());
    let executor = StrategyExecutor::new(kind.build(), probe, config.sampler_config())
        .with_stabilizer(stabilizer);
    let runner = IterationRunner::new(executor, config.runner_config());

    info!(
        input = %args.input.display(),
        width = config.target_width,
        fit = %config.fit_mode,
        sample_interval_ms = config.sample_interval_ms,
        sample_mode = %config.sample_mode,
        "configuration resolved"
    );
    let result = runner.run(&input, &config.resize_options())?;

    let store = ResultStore::new(&args.results_dir);
    let path = store.save_result(kind.as_str(), &result)?;
    print_run_summary(kind.as_str(), &result);
    println!("\nResults saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> RunArgs {
        RunArgs::try_parse_from(std::iter::once("resize-bench").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["buffer"]);
        assert_eq!(args.strategy().unwrap(), StrategyKind::Buffer);
        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(args.resolve_config().unwrap(), BenchConfig::default());
    }

    #[test]
    fn test_missing_strategy() {
        let err = parse(&[]).strategy().unwrap_err();
        assert!(matches!(err, CliError::MissingStrategy { .. }));
        assert!(err.to_string().contains("sequential-stream"));
    }

    #[test]
    fn test_unknown_strategy_rejected_by_parser() {
        let err = RunArgs::try_parse_from(["resize-bench", "teleport"]).unwrap_err();
        assert!(err.to_string().contains("buffer, stream, path, sequential-stream"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"iterations": 7, "targetWidth": 640, "fitMode": "cover"}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let args = parse(&["path", "--config", path, "--iterations", "3", "--no-stabilize"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.target_width, 640);
        assert_eq!(config.fit_mode, FitMode::Cover);
        assert!(!config.stabilize);
    }

    #[test]
    fn test_policy_and_mode_flags() {
        let args = parse(&[
            "stream",
            "--on-failure",
            "skip",
            "--sample-mode",
            "relative",
            "--fit",
            "fill",
            "--height",
            "200",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.sample_mode, SampleMode::Relative);
        assert_eq!(config.target_height, Some(200));
    }

    #[test]
    fn test_invalid_flag_value_fails_validation() {
        let err = parse(&["buffer", "--iterations", "0"]).resolve_config().unwrap_err();
        assert!(err.to_string().contains("iterations"));
    }

    #[test]
    fn test_output_path_follows_input_format() {
        let dir = Path::new("out");
        assert_eq!(output_path_for(Path::new("a/b.PNG"), dir), dir.join("output.png"));
        assert_eq!(output_path_for(Path::new("a/b.jpeg"), dir), dir.join("output.jpg"));
        assert_eq!(output_path_for(Path::new("noext"), dir), dir.join("output.jpg"));
    }
}
