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
//! Result persistence.
//!
//! Results are stored as pretty-printed JSON, one file per run:
//!
//! - `{strategy}-{timestamp}.json` holds a [`TestResult`];
//! - `comparison-{timestamp}.json` maps strategy names to
//!   [`ComparisonResult`]s.
//!
//! Timestamps are UTC instants with millisecond precision in which `:` and
//! `.` are replaced by `-`, for example `2025-01-31T12-00-00-123Z`. They sort
//! lexicographically in time order, so the last matching file name is the
//! most recent run.

use crate::core::measurement::TestResult;
use crate::error::{BenchError, Result};
use crate::harness::comparator::ComparisonResult;
use crate::reporters::json::export_json;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default directory for result files.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Name prefix of comparison files.
pub const COMPARISON_PREFIX: &str = "comparison";

/// Formats an instant as a file-name-safe timestamp.
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// Returns whether `file_name` is a result file of `strategy`.
///
/// The strategy name must be followed by `-` and a digit, so `stream` does
/// not claim the files of `sequential-stream` or of a hypothetical
/// `stream-fast`.
pub fn is_result_file(file_name: &str, strategy: &str) -> bool {
    file_name
        .strip_prefix(strategy)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|rest| {
            rest.starts_with(|c: char| c.is_ascii_digit()) && rest.ends_with(".json")
        })
}

/// Directory-backed store of result and comparison files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists a run result under the current time.
    pub fn save_result(&self, strategy: &str, result: &TestResult) -> Result<PathBuf> {
        self.save_result_at(strategy, result, Utc::now())
    }

    /// Persists a run result under the given time.
    pub fn save_result_at(
        &self,
        strategy: &str,
        result: &TestResult,
        at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let path = self.path_for(strategy, at);
        self.write(&path, result)?;
        info!(strategy, path = %path.display(), "results saved");
        Ok(path)
    }

    /// Persists a comparison under the current time.
    pub fn save_comparison(
        &self,
        comparisons: &BTreeMap<String, ComparisonResult>,
    ) -> Result<PathBuf> {
        self.save_comparison_at(comparisons, Utc::now())
    }

    /// Persists a comparison under the given time.
    pub fn save_comparison_at(
        &self,
        comparisons: &BTreeMap<String, ComparisonResult>,
        at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let path = self.path_for(COMPARISON_PREFIX, at);
        self.write(&path, comparisons)?;
        info!(path = %path.display(), "comparison saved");
        Ok(path)
    }

    /// Loads the most recent result of `strategy`, if any.
    ///
    /// A missing store directory counts as no results.
    pub fn load_latest(&self, strategy: &str) -> Result<Option<(PathBuf, TestResult)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BenchError::io_error(&self.dir, e)),
        };

        let mut latest: Option<String> = None;
        for entry in entries {
            let entry = entry.map_err(|e| BenchError::io_error(&self.dir, e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_result_file(&name, strategy) && latest.as_ref().map_or(true, |l| name > *l) {
                latest = Some(name);
            }
        }

        let Some(name) = latest else {
            return Ok(None);
        };
        let path = self.dir.join(name);
        let contents = fs::read_to_string(&path).map_err(|e| BenchError::io_error(&path, e))?;
        let result = serde_json::from_str(&contents)?;
        Ok(Some((path, result)))
    }

    /// Loads the most recent result of each strategy.
    ///
    /// Strategies without a result are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::NoResultsFound`] naming every requested strategy
    /// when none of them has a result.
    pub fn load_all<S: AsRef<str>>(&self, strategies: &[S]) -> Result<BTreeMap<String, TestResult>> {
        let mut results = BTreeMap::new();
        let mut missing = Vec::new();

        for strategy in strategies {
            let strategy = strategy.as_ref();
            match self.load_latest(strategy)? {
                Some((path, result)) => {
                    info!(strategy, path = %path.display(), "loaded results");
                    results.insert(strategy.to_string(), result);
                }
                None => {
                    warn!(strategy, "No results found for {strategy} method");
                    missing.push(strategy.to_string());
                }
            }
        }

        if results.is_empty() {
            return Err(BenchError::NoResultsFound { missing });
        }
        Ok(results)
    }

    fn path_for(&self, prefix: &str, at: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("{prefix}-{}.json", file_timestamp(at)))
    }

    fn write<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| BenchError::io_error(&self.dir, e))?;
        export_json(value, path)
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR)
    }
}
