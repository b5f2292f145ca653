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

//! Structured error types for the benchmark binaries.
//!
//! Library failures arrive as [`BenchError`] and are wrapped unchanged;
//! the remaining variants cover what only the command line can get wrong.

use resize_bench::BenchError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CLI operations.
///
/// Every variant renders as a single line, which the binaries print after
/// `Error: `.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CliError {
    /// No strategy argument was given.
    #[error("No strategy given. Valid choices: {}", valid.join(", "))]
    MissingStrategy {
        /// Names the user may pick from
        valid: Vec<String>,
    },

    /// A directory the run needs could not be created.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The directory that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Error reported by the benchmark library.
    #[error(transparent)]
    Bench(#[from] BenchError),
}

impl CliError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a missing-strategy error listing `valid`.
    pub fn missing_strategy<S: AsRef<str>>(valid: &[S]) -> Self {
        Self::MissingStrategy {
            valid: valid.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
