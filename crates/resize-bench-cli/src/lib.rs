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

//! Command-line front end for the resize strategy benchmark.
//!
//! Two binaries are built from this crate:
//!
//! - **resize-bench**: runs one strategy for a number of iterations, prints
//!   a summary and saves the result under the results directory.
//! - **resize-compare**: loads the latest saved result of each strategy,
//!   prints the comparison report and saves it next to the results.
//!
//! Progress and diagnostics go to stderr through `tracing`; reports go to
//! stdout.

pub mod commands;
pub mod error;
pub mod logging;

pub use error::{CliError, Result};
