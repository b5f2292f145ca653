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

//! The `resize-compare` command: compare the latest result of each strategy.

use crate::error::Result;
use clap::Parser;
use resize_bench::harness::{compare_results, relative_report, MemoryDeviation};
use resize_bench::reporters::print_comparison;
use resize_bench::{ResultStore, StrategyKind};
use std::path::PathBuf;
use tracing::info;

/// Compare the latest saved results of the resize strategies.
#[derive(Parser, Debug, Clone)]
#[command(name = "resize-compare")]
#[command(author = "Dweve B.V.")]
#[command(version)]
#[command(about = "Compare saved resize benchmark results", long_about = None)]
pub struct CompareArgs {
    /// Directory holding result files
    #[arg(long, default_value = resize_bench::core::store::DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Comma-separated strategies to compare (defaults to all)
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub strategies: Vec<StrategyKind>,

    /// Memory standard deviation: summary or pool
    #[arg(long, default_value_t = MemoryDeviation::SummaryProxy)]
    pub memory_deviation: MemoryDeviation,

    /// Print the report without writing a comparison file
    #[arg(long)]
    pub no_save: bool,
}

impl CompareArgs {
    /// Strategy names to load, in listing order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        if self.strategies.is_empty() {
            StrategyKind::names()
        } else {
            self.strategies.iter().map(StrategyKind::as_str).collect()
        }
    }
}

/// Prints the comparison and returns the saved comparison file, if any.
///
/// Strategies without results are skipped with a warning; the command only
/// fails when none of them has a result.
pub fn compare(args: &CompareArgs) -> Result<Option<PathBuf>> {
    let store = ResultStore::new(&args.results_dir);
    let results = store.load_all(&args.strategy_names())?;
    let comparisons = compare_results(&results, args.memory_deviation)?;
    let report = relative_report(&comparisons);

    print_comparison(&comparisons, report.as_ref());

    if args.no_save {
        return Ok(None);
    }
    let path = store.save_comparison(&comparisons)?;
    info!(path = %path.display(), deviation = %args.memory_deviation, "comparison written");
    println!("\nComparison saved to {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use resize_bench::BenchError;

    #[test]
    fn test_defaults_cover_all_strategies() {
        let args = CompareArgs::try_parse_from(["resize-compare"]).unwrap();
        assert_eq!(args.strategy_names(), StrategyKind::names());
        assert_eq!(args.memory_deviation, MemoryDeviation::SummaryProxy);
        assert!(!args.no_save);
    }

    #[test]
    fn test_strategy_list() {
        let args = CompareArgs::try_parse_from([
            "resize-compare",
            "--strategies",
            "stream,sequential-stream",
            "--memory-deviation",
            "pool",
        ])
        .unwrap();
        assert_eq!(args.strategy_names(), vec!["stream", "sequential-stream"]);
        assert_eq!(args.memory_deviation, MemoryDeviation::FullPool);
    }

    #[test]
    fn test_unknown_strategy_in_list() {
        assert!(CompareArgs::try_parse_from(["resize-compare", "--strategies", "buffer,warp"]).is_err());
    }

    #[test]
    fn test_empty_results_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompareArgs::try_parse_from([
            "resize-compare",
            "--results-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let err = compare(&args).unwrap_err();
        assert!(matches!(err, CliError::Bench(BenchError::NoResultsFound { .. })));
    }
}
