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

//! Error types for benchmark operations.
//!
//! Every fallible operation in the harness returns [`Result<T>`]. Probe
//! failures are not represented here: a dimension the host cannot report
//! degrades to zero and is only logged.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while running or comparing benchmarks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    /// Invalid configuration parameter.
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A strategy selector did not name a known strategy.
    #[error("Unknown strategy '{name}'. Valid choices: {}", valid.join(", "))]
    UnknownStrategy {
        /// The name that was given
        name: String,
        /// All accepted names
        valid: Vec<String>,
    },

    /// The work unit of a strategy failed.
    #[error("Strategy '{strategy}' failed: {message}")]
    WorkUnit {
        /// Strategy name
        strategy: String,
        /// Underlying failure
        message: String,
    },

    /// Every iteration of a run failed, so there is nothing to aggregate.
    #[error("Strategy '{strategy}' produced no successful iterations out of {attempted}")]
    NoSuccessfulIterations {
        /// Strategy name
        strategy: String,
        /// Number of iterations attempted
        attempted: u32,
    },

    /// A reduction was invoked on an empty series.
    #[error("Cannot compute {context} of an empty series")]
    EmptyInput {
        /// Name of the reduction
        context: &'static str,
    },

    /// The result store holds no results for the requested strategies.
    #[error("No results found for strategies: {}", missing.join(", "))]
    NoResultsFound {
        /// Strategies without a result file
        missing: Vec<String>,
    },

    /// I/O error with the offending path.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// JSON or YAML (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The sampling thread could not be started or joined.
    #[error("Sampler error: {0}")]
    Sampler(String),
}

impl BenchError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a work-unit error for a strategy.
    pub fn work_unit(strategy: impl Into<String>, message: impl ToString) -> Self {
        Self::WorkUnit {
            strategy: strategy.into(),
            message: message.to_string(),
        }
    }

    /// Returns whether this error comes from bad user input rather than a
    /// failed measurement.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BenchError::InvalidConfig { .. } | BenchError::UnknownStrategy { .. }
        )
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for BenchError {
    fn from(err: serde_yaml::Error) -> Self {
        BenchError::Serialization(err.to_string())
    }
}
